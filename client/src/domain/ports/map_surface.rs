//! Driven port wrapping the map widget.
//!
//! The adapter owns the rendered marker set and performs no business logic.
//! Widget events travel the other way as [`MapEvent`] values.

use super::define_port_error;
use crate::domain::{Coordinate, Truck};

/// Opaque handle returned once the map has been created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHandle {
    /// Adapter-specific identifier of the created map.
    pub id: String,
}

/// Camera placement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Point to centre the viewport on.
    pub center: Coordinate,
    /// Zoom level; `None` keeps the current zoom.
    pub zoom: Option<u8>,
}

/// Events emitted by the map widget.
///
/// `Ready` fires at most once per map; `Click` any number of times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map finished loading and can accept markers.
    Ready,
    /// The user clicked the map at the given coordinate.
    Click(Coordinate),
}

define_port_error! {
    /// Errors surfaced while creating the map.
    pub enum MapSurfaceError {
        /// The widget rejected the provider key.
        Unauthorized { message: String } =>
            "map provider rejected the key: {message}",
        /// The map was already initialised.
        AlreadyInitialized =>
            "map surface is already initialised",
        /// The widget failed to start for another reason.
        Unavailable { message: String } =>
            "map surface unavailable: {message}",
    }
}

/// Port for drawing on the map.
#[cfg_attr(test, mockall::automock)]
pub trait MapSurface: Send + Sync {
    /// Create the map, authenticating with the provider key.
    ///
    /// # Errors
    ///
    /// Returns [`MapSurfaceError`] when the widget cannot be created.
    fn initialize(&self, auth_key: &str) -> Result<MapHandle, MapSurfaceError>;

    /// Move the viewport.
    fn set_camera(&self, camera: Camera);

    /// Remove every truck marker.
    fn clear_markers(&self);

    /// Add one truck marker.
    fn add_marker(&self, truck: &Truck);

    /// Move the "you are here" marker to the focus point.
    fn mark_focus(&self, focus: Coordinate);
}
