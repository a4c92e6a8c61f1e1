//! Driven port for the food truck backend.
//!
//! The domain owns the request shapes and the failure contract; adapters own
//! URLs, HTTP and JSON. Every call is a single idempotent attempt.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Coordinate, RemoteConfig, Status, Truck};

define_port_error! {
    /// Errors surfaced while calling the truck backend.
    pub enum TruckApiError {
        /// The backend answered with a status outside the success range.
        Status { status: u16, message: String } =>
            "request failed with status {status}: {message}",
        /// No response arrived within the client timeout.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// Network transport failed before a response was received.
        Transport { message: String } =>
            "request transport failed: {message}",
        /// The response body was not the expected JSON.
        Decode { message: String } =>
            "response decode failed: {message}",
        /// The adapter could not build the request.
        InvalidRequest { message: String } =>
            "request invalid: {message}",
    }
}

impl TruckApiError {
    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a request-level failure rather than a decode failure.
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        !matches!(self, Self::Decode { .. })
    }
}

/// Port for querying the truck backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TruckApi: Send + Sync {
    /// Find trucks near `position`; the backend widens its search until it
    /// has a handful of results.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let trucks = api.find_near(Coordinate::new(37.7758, -122.4205)?).await?;
    /// assert!(trucks.len() >= 5);
    /// ```
    async fn find_near(&self, position: Coordinate) -> Result<Vec<Truck>, TruckApiError>;

    /// Find trucks within `radius_meters` of `position`. The radius is
    /// advisory and forwarded unvalidated.
    async fn find_in_radius(
        &self,
        position: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<Truck>, TruckApiError>;

    /// Fetch the startup configuration document.
    async fn get_config(&self) -> Result<RemoteConfig, TruckApiError>;

    /// Fetch a fresh backend health snapshot.
    async fn get_status(&self) -> Result<Status, TruckApiError>;
}
