//! UI state types.

use std::path::PathBuf;

/// What the cropper window hands back to its caller once it closes.
#[derive(Clone, Debug, Default)]
pub struct CropResult {
    /// Every file written during the session, oldest first.
    pub exported: Vec<PathBuf>,
}

/// Status line shown under the controls.
///
/// `Idle` -> `Exported` or `Error` on each export attempt; any new drag goes
/// back to `Idle`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum UiState {
    #[default]
    Idle,
    Exported(PathBuf),
    Error(String),
}

impl UiState {
    pub fn message(&self) -> Option<String> {
        match self {
            UiState::Idle => None,
            UiState::Exported(path) => Some(format!("Saved {}", path.display())),
            UiState::Error(err) => Some(format!("Error: {err}")),
        }
    }
}
