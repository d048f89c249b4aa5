//! Asset load gate
//!
//! The host starts loads (e.g. glTF models) and reports each outcome here.
//! `Loading` mode polls [`AssetGate::is_settled`] every tick; a failed load
//! still counts as settled and its slot is drawn with a fallback primitive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
    #[error("unknown asset handle {0}")]
    UnknownHandle(usize),
    #[error("asset handle {0} already settled")]
    AlreadySettled(usize),
}

/// Handle returned by [`AssetGate::request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub usize);

/// Load status of one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed(AssetError),
}

#[derive(Debug, Clone)]
struct AssetEntry {
    path: String,
    status: AssetStatus,
}

/// Tracks outstanding asset requests
#[derive(Debug, Clone, Default)]
pub struct AssetGate {
    entries: Vec<AssetEntry>,
}

impl AssetGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset the game waits for
    pub fn request(&mut self, path: &str) -> AssetHandle {
        self.entries.push(AssetEntry {
            path: path.to_string(),
            status: AssetStatus::Pending,
        });
        AssetHandle(self.entries.len() - 1)
    }

    /// Record the outcome of a load (success or failure both settle it)
    pub fn resolve(
        &mut self,
        handle: AssetHandle,
        outcome: Result<(), AssetError>,
    ) -> Result<(), AssetError> {
        let entry = self
            .entries
            .get_mut(handle.0)
            .ok_or(AssetError::UnknownHandle(handle.0))?;
        if entry.status != AssetStatus::Pending {
            return Err(AssetError::AlreadySettled(handle.0));
        }
        entry.status = match outcome {
            Ok(()) => {
                log::info!("Loaded {}", entry.path);
                AssetStatus::Loaded
            }
            Err(e) => {
                log::warn!("{}, using fallback", e);
                AssetStatus::Failed(e)
            }
        };
        Ok(())
    }

    /// Convenience for hosts reporting a failure as a plain message
    pub fn fail(&mut self, handle: AssetHandle, reason: &str) -> Result<(), AssetError> {
        let path = self
            .entries
            .get(handle.0)
            .map(|e| e.path.clone())
            .ok_or(AssetError::UnknownHandle(handle.0))?;
        self.resolve(
            handle,
            Err(AssetError::LoadFailed {
                path,
                reason: reason.to_string(),
            }),
        )
    }

    pub fn status(&self, handle: AssetHandle) -> Option<&AssetStatus> {
        self.entries.get(handle.0).map(|e| &e.status)
    }

    /// True when every requested asset has reported back
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| e.status != AssetStatus::Pending)
    }

    /// Whether a slot must be drawn with its fallback primitive
    ///
    /// Pending and unknown slots use the fallback too.
    pub fn uses_fallback(&self, handle: AssetHandle) -> bool {
        !matches!(self.status(handle), Some(AssetStatus::Loaded))
    }

    /// Text for the HUD error indicator, if anything failed
    pub fn error_text(&self) -> Option<String> {
        let errors: Vec<String> = self
            .entries
            .iter()
            .filter_map(|e| match &e.status {
                AssetStatus::Failed(err) => Some(err.to_string()),
                _ => None,
            })
            .collect();
        if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_gate_is_settled() {
        assert!(AssetGate::new().is_settled());
    }

    #[test]
    fn test_failure_still_settles() {
        let mut gate = AssetGate::new();
        let ship = gate.request("models/ship.gltf");
        let rock = gate.request("models/rock.gltf");
        assert!(!gate.is_settled());

        gate.resolve(ship, Ok(())).unwrap();
        assert!(!gate.is_settled());
        gate.fail(rock, "404").unwrap();

        assert!(gate.is_settled());
        assert!(!gate.uses_fallback(ship));
        assert!(gate.uses_fallback(rock));
        assert_eq!(
            gate.error_text().as_deref(),
            Some("failed to load models/rock.gltf: 404")
        );
    }

    #[test]
    fn test_double_resolve_rejected() {
        let mut gate = AssetGate::new();
        let ship = gate.request("ship");
        gate.resolve(ship, Ok(())).unwrap();
        assert_eq!(
            gate.resolve(ship, Ok(())),
            Err(AssetError::AlreadySettled(0))
        );
    }

    #[test]
    fn test_unknown_handle() {
        let mut gate = AssetGate::new();
        assert_eq!(
            gate.resolve(AssetHandle(3), Ok(())),
            Err(AssetError::UnknownHandle(3))
        );
        assert!(gate.uses_fallback(AssetHandle(3)));
    }
}
