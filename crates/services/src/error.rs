//! Shared error types for the services crate.

use thiserror::Error;

use finlit_core::model::{AvatarError, SetupError};
use finlit_core::quiz::EngineError;

/// Errors emitted by `AvatarSelector`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SelectorError {
    #[error("no catalog emoji at position {index}")]
    OutOfCatalog { index: usize },
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error(transparent)]
    Setup(#[from] SetupError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    /// True when setup was submitted without a username or avatar.
    #[must_use]
    pub fn is_setup_incomplete(&self) -> bool {
        matches!(
            self,
            SessionError::Setup(SetupError::MissingUsername | SetupError::MissingAvatar)
        )
    }
}
