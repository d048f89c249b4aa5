//! High score slot
//!
//! One integer, read at startup and written back when a run beats it.
//! Persisted to LocalStorage on the web and a small JSON file natively.

use serde::{Deserialize, Serialize};

/// Best score so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key / native file stem
    const STORAGE_KEY: &'static str = "astrolane_highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a finished run, returns true if it set a new best
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(score) = serde_json::from_str::<HighScore>(&json) {
                    log::info!("Loaded high score {}", score.best);
                    return score;
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High score saved ({})", self.best);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path() -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(&Self::path());
    }

    /// Read from a file; missing or corrupt files give a zero score
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            log::info!("No high score found, starting fresh");
            return Self::default();
        };
        match serde_json::from_str::<HighScore>(&json) {
            Ok(score) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            Err(e) => {
                log::warn!("Ignoring corrupt high score file: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        let result = serde_json::to_string(self)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }
}

/// Where improved high scores are written
pub trait ScoreStore: std::fmt::Debug {
    fn store(&mut self, score: &HighScore);
}

/// The platform slot: LocalStorage on the web, the working directory natively
#[derive(Debug, Default)]
pub struct SlotStore;

impl ScoreStore for SlotStore {
    fn store(&mut self, score: &HighScore) {
        score.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_improves() {
        let mut high = HighScore::new(500);
        assert!(!high.submit(500));
        assert!(!high.submit(100));
        assert_eq!(high.best, 500);
        assert!(high.submit(501));
        assert_eq!(high.best, 501);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("astrolane_hs_{}.json", std::process::id()));
        HighScore::new(4321).save_to(&path);
        assert_eq!(HighScore::load_from(&path).best, 4321);

        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(HighScore::load_from(&path).best, 0);
        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_is_zero() {
        let path = std::env::temp_dir().join("astrolane_definitely_missing.json");
        assert_eq!(HighScore::load_from(&path), HighScore::default());
    }
}
