//! Driven port for the device's own position.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::Coordinate;

define_port_error! {
    /// Errors surfaced while locating the device.
    pub enum GeolocationError {
        /// The user or platform refused location access.
        PermissionDenied { message: String } =>
            "location permission denied: {message}",
        /// No position source is available.
        Unavailable { message: String } =>
            "location unavailable: {message}",
        /// The position source did not answer in time.
        Timeout { message: String } =>
            "location request timed out: {message}",
    }
}

/// Port for asking where the device is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// Resolve the current device position.
    async fn locate(&self) -> Result<Coordinate, GeolocationError>;
}
