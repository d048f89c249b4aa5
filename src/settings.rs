//! Game settings and preferences
//!
//! Read from LocalStorage on the web, a JSON file in the working directory natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the game variants to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Free-flying ship, box hitboxes, blaster
    #[default]
    Dodger,
    /// Dodger with armored asteroids and bosses
    Siege,
    /// Lane runner with a mount roster and power-ups
    Runner,
    /// Lane runner spawning whole rows with one gap
    Stampede,
}

/// How the player moves sideways
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Held keys slide the player within a clamped range
    Continuous,
    /// Key presses hop between discrete lanes
    Lanes,
}

/// Collision geometry used for obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hitbox {
    /// Axis-aligned box intersection
    Box,
    /// Euclidean distance against a size-derived radius
    Radius,
    /// Separate X/Z distance thresholds
    Axis,
}

/// What an active shield does to incoming hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShieldPolicy {
    /// Hits are absorbed, hit area unchanged
    Nullify,
    /// Hit area grows and every hit inside it is absorbed
    Widen,
}

/// Fixed rule set for a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub movement: Movement,
    pub hitbox: Hitbox,
    pub shield: ShieldPolicy,
    pub weapons: bool,
    pub bosses: bool,
    pub sized_health: bool,
    pub power_ups: bool,
    /// Selectable roster size (0 skips the selection screen)
    pub roster: usize,
    /// Spawn whole rows leaving a single free lane
    pub rows: bool,
}

impl Variant {
    pub fn rules(&self) -> Rules {
        match self {
            Variant::Dodger => Rules {
                movement: Movement::Continuous,
                hitbox: Hitbox::Box,
                shield: ShieldPolicy::Nullify,
                weapons: true,
                bosses: false,
                sized_health: false,
                power_ups: false,
                roster: 0,
                rows: false,
            },
            Variant::Siege => Rules {
                movement: Movement::Continuous,
                hitbox: Hitbox::Radius,
                shield: ShieldPolicy::Widen,
                weapons: true,
                bosses: true,
                sized_health: true,
                power_ups: false,
                roster: 0,
                rows: false,
            },
            Variant::Runner => Rules {
                movement: Movement::Lanes,
                hitbox: Hitbox::Axis,
                shield: ShieldPolicy::Nullify,
                weapons: false,
                bosses: false,
                sized_health: false,
                power_ups: true,
                roster: ROSTER.len(),
                rows: false,
            },
            Variant::Stampede => Rules {
                movement: Movement::Lanes,
                hitbox: Hitbox::Axis,
                shield: ShieldPolicy::Nullify,
                weapons: false,
                bosses: false,
                sized_health: false,
                power_ups: true,
                roster: ROSTER.len(),
                rows: true,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Dodger => "Dodger",
            Variant::Siege => "Siege",
            Variant::Runner => "Runner",
            Variant::Stampede => "Stampede",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dodger" => Some(Variant::Dodger),
            "siege" => Some(Variant::Siege),
            "runner" => Some(Variant::Runner),
            "stampede" => Some(Variant::Stampede),
            _ => None,
        }
    }
}

/// Mount roster for the lane variants
pub const ROSTER: [&str; 3] = ["Stallion", "Zebra", "Camel"];

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Number of lanes for the lane variants
    pub fn lane_count(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Normal => 5,
            Difficulty::Hard => 10,
        }
    }

    /// Fastest allowed spawn cadence in ticks
    pub fn spawn_floor(&self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Normal => 10,
            Difficulty::Hard => 5,
        }
    }
}

/// Errors reading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    pub difficulty: Difficulty,
    /// Fixed run seed (None = seed from the clock)
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Draw debris and dust, flash on damage
    pub effects: bool,
    /// Reduced motion (no menu orbit, no flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Dodger,
            difficulty: Difficulty::Normal,
            seed: None,
            effects: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective cosmetic effects (respects reduced_motion for the flash)
    pub fn effective_flash(&self) -> bool {
        self.effects && !self.reduced_motion
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key / native file stem
    const STORAGE_KEY: &'static str = "astrolane_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path() -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Load settings from the working directory, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"variant":"Runner"}"#).unwrap();
        assert_eq!(settings.variant, Variant::Runner);
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert!(settings.effects);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_seed() {
        let settings = Settings {
            seed: Some(42),
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        let back = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(back.seed, Some(42));
        assert_eq!(back.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_lane_variants_have_roster() {
        assert_eq!(Variant::Runner.rules().roster, ROSTER.len());
        assert_eq!(Variant::Dodger.rules().roster, 0);
        assert!(Variant::Stampede.rules().rows);
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(Variant::from_str("SIEGE"), Some(Variant::Siege));
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("extreme"), None);
    }

    #[test]
    fn test_reduced_motion_disables_flash() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_flash());
    }
}
