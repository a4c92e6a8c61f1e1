//! Typed triggers consumed by the refresh controller and the outcomes it
//! reports back.

use crate::domain::ports::{GeolocationError, MapEvent, TruckApiError};
use crate::domain::{Coordinate, Status};

/// Everything that can ask the controller to do something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// An event raised by the map widget.
    Map(MapEvent),
    /// "Locate me": re-request the device position.
    LocateMe,
    /// Jump to the fixed teleport target.
    Teleport,
    /// Show the backend status.
    ShowStatus,
}

impl From<MapEvent> for ViewerEvent {
    fn from(event: MapEvent) -> Self {
        Self::Map(event)
    }
}

/// Why an event produced no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The map has not reported `Ready` yet.
    MapNotReady,
    /// The map reported `Ready` a second time.
    DuplicateReady,
}

/// Result of handling one [`ViewerEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Markers now show the trucks found around `focus`.
    Refreshed {
        /// Focus point the markers belong to.
        focus: Coordinate,
        /// Number of markers placed.
        truck_count: usize,
    },
    /// The backend query for `focus` failed; the marker set is empty.
    RefreshFailed {
        /// Focus point that could not be refreshed.
        focus: Coordinate,
        /// Failure reported by the API client.
        error: TruckApiError,
    },
    /// A newer focus point arrived before this refresh completed; its
    /// result was discarded.
    Superseded {
        /// Focus point whose result was dropped.
        focus: Coordinate,
    },
    /// The device position could not be determined.
    LocationUnavailable {
        /// Failure reported by the locator.
        error: GeolocationError,
        /// Whether the message was shown as a blocking error (startup).
        blocking: bool,
    },
    /// The backend status was shown to the user.
    StatusShown(Status),
    /// The backend status could not be fetched.
    StatusFailed(TruckApiError),
    /// Nothing was done.
    Ignored(IgnoreReason),
}
