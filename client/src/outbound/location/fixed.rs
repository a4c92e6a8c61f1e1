//! Device locator backed by a configured position.

use async_trait::async_trait;

use crate::domain::Coordinate;
use crate::domain::ports::{DeviceLocator, GeolocationError};

/// Reports a fixed position, or `Unavailable` when none was configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDeviceLocator {
    position: Option<Coordinate>,
}

impl FixedDeviceLocator {
    /// Locator for `position`; `None` simulates a device without a fix.
    #[must_use]
    pub const fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl DeviceLocator for FixedDeviceLocator {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        self.position.ok_or_else(|| {
            GeolocationError::unavailable("no device position configured")
        })
    }
}
