//! Domain-level error types for configuration and startup.
//!
//! Per-refresh failures never surface here: the refresh controller converts
//! them into notifications and [`super::EventOutcome`] values.

use super::ports::{MapSurfaceError, TruckApiError};

/// Missing or invalid startup configuration. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration could not be fetched or decoded.
    #[error("failed to load configuration: {0}")]
    Fetch(#[from] TruckApiError),
    /// The map provider key is absent or blank.
    #[error("invalid or missing config: map provider key is required")]
    MissingMapProviderKey,
}

/// Reasons the viewer session could not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartupError {
    /// Configuration was unavailable or incomplete; no map was created.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The map surface refused to initialise.
    #[error(transparent)]
    Map(#[from] MapSurfaceError),
}
