//! Geographic coordinates and the points of interest placed on them.

use std::fmt;

/// Validation failures raised by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// Latitude or longitude is NaN or infinite.
    #[error("coordinate must be finite (got {latitude}, {longitude})")]
    NonFinite {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },
    /// Latitude outside `[-90, 90]`.
    #[error("latitude must be within [-90, 90] (got {latitude})")]
    LatitudeOutOfRange {
        /// Rejected latitude.
        latitude: f64,
    },
    /// Longitude outside `[-180, 180]`.
    #[error("longitude must be within [-180, 180] (got {longitude})")]
    LongitudeOutOfRange {
        /// Rejected longitude.
        longitude: f64,
    },
}

/// WGS84 position.
///
/// ## Invariants
/// - both components are finite;
/// - `latitude` lies in `[-90, 90]` and `longitude` in `[-180, 180]`.
///
/// # Examples
/// ```
/// use client::domain::Coordinate;
///
/// let san_francisco = Coordinate::new(37.7758, -122.4205)?;
/// assert_eq!(san_francisco.latitude(), 37.7758);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok::<(), client::domain::CoordinateError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range components.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is invalid.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange { longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from literals already known to be in range.
    pub(crate) const fn from_trusted(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A food truck returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Truck {
    /// Backend identifier.
    pub id: String,
    /// Display name rendered next to the marker.
    pub name: String,
    /// Where the truck is parked.
    pub position: Coordinate,
    /// Free-text description, when the backend has one.
    pub description: Option<String>,
    /// Human-readable street address, when the backend has one.
    pub address: Option<String>,
}

impl Truck {
    /// Build a truck with only the fields needed for display.
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            description: None,
            address: None,
        }
    }
}
