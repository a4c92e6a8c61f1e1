//! Viewer settings loaded via OrthoConfig.
//!
//! Values come from `TRUCK_VIEWER_*` environment variables, command-line
//! flags, or a configuration file. The timeout and zoom carry defaults in
//! the derive; the remaining fields are optional and accessors interpret them.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{Coordinate, CoordinateError, QueryMode, RefreshControllerConfig};

/// Failures while interpreting otherwise well-formed settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    /// A zero timeout would fail every request before it is sent.
    #[error("request_timeout_ms must be greater than zero")]
    ZeroRequestTimeout,
    /// Only one of latitude and longitude was given.
    #[error("device_latitude and device_longitude must be set together")]
    PartialDevicePosition,
    /// The device position is out of range.
    #[error("invalid device position: {0}")]
    DevicePosition(#[from] CoordinateError),
}

/// Configuration values for the terminal viewer.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRUCK_VIEWER")]
pub struct ViewerSettings {
    /// Explicit backend base URL; resolved from the origin when unset.
    pub api_base_url: Option<String>,
    /// Client-side request timeout in milliseconds.
    #[ortho_config(default = 10_000)]
    pub request_timeout_ms: u64,
    /// Fixed search radius; the backend picks one when unset.
    pub search_radius_meters: Option<u32>,
    /// Simulated device latitude.
    pub device_latitude: Option<f64>,
    /// Simulated device longitude.
    pub device_longitude: Option<f64>,
    /// Zoom applied after each refresh.
    #[ortho_config(default = 15)]
    pub default_zoom: u8,
}

impl ViewerSettings {
    /// Explicit backend base URL, if any.
    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    /// Client-side request timeout (ten seconds unless configured).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroRequestTimeout`] for a zero timeout.
    pub const fn request_timeout(&self) -> Result<Duration, SettingsError> {
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::ZeroRequestTimeout);
        }
        Ok(Duration::from_millis(self.request_timeout_ms))
    }

    /// Query mode implied by the search radius.
    #[must_use]
    pub fn query_mode(&self) -> QueryMode {
        self.search_radius_meters
            .map_or(QueryMode::Near, |meters| QueryMode::WithinRadius { meters })
    }

    /// Zoom level applied after each refresh.
    #[must_use]
    pub const fn zoom(&self) -> u8 {
        self.default_zoom
    }

    /// Simulated device position; `None` when neither component is set.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when only one component is set or the
    /// position is out of range.
    pub fn device_position(&self) -> Result<Option<Coordinate>, SettingsError> {
        match (self.device_latitude, self.device_longitude) {
            (None, None) => Ok(None),
            (Some(latitude), Some(longitude)) => Ok(Some(Coordinate::new(latitude, longitude)?)),
            _ => Err(SettingsError::PartialDevicePosition),
        }
    }

    /// Refresh controller configuration derived from these settings.
    #[must_use]
    pub fn controller_config(&self) -> RefreshControllerConfig {
        RefreshControllerConfig {
            query_mode: self.query_mode(),
            zoom: self.zoom(),
            ..RefreshControllerConfig::default()
        }
    }
}
