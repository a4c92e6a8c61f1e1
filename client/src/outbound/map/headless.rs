//! In-memory map surface for terminal sessions.
//!
//! Keeps the marker set, focus marker and camera in memory, logs every change
//! through `tracing`, and emits the map's `Ready` event into the session
//! channel exactly once when initialised.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::domain::ports::{Camera, MapEvent, MapHandle, MapSurface, MapSurfaceError};
use crate::domain::{Coordinate, Truck, ViewerEvent};

#[derive(Debug, Default)]
struct Scene {
    handle: Option<MapHandle>,
    markers: Vec<Truck>,
    focus: Option<Coordinate>,
    camera: Option<Camera>,
}

/// Map surface that renders into the log.
pub struct HeadlessMapSurface {
    scene: Mutex<Scene>,
    events: Mutex<Option<UnboundedSender<ViewerEvent>>>,
}

impl HeadlessMapSurface {
    /// Build a surface that reports widget events into `events`.
    #[must_use]
    pub fn new(events: UnboundedSender<ViewerEvent>) -> Self {
        Self {
            scene: Mutex::new(Scene::default()),
            events: Mutex::new(Some(events)),
        }
    }

    /// Markers currently shown.
    #[must_use]
    pub fn markers(&self) -> Vec<Truck> {
        self.lock_scene().markers.clone()
    }

    /// Position of the "you are here" marker.
    #[must_use]
    pub fn focus(&self) -> Option<Coordinate> {
        self.lock_scene().focus
    }

    /// Current camera placement.
    #[must_use]
    pub fn camera(&self) -> Option<Camera> {
        self.lock_scene().camera
    }

    fn lock_scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit_ready_once(&self) {
        let sender = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender
            && sender.send(MapEvent::Ready.into()).is_err()
        {
            warn!("session channel closed before the map became ready");
        }
    }
}

impl MapSurface for HeadlessMapSurface {
    fn initialize(&self, auth_key: &str) -> Result<MapHandle, MapSurfaceError> {
        if auth_key.trim().is_empty() {
            return Err(MapSurfaceError::unauthorized("map provider key is blank"));
        }
        let handle = {
            let mut scene = self.lock_scene();
            if scene.handle.is_some() {
                return Err(MapSurfaceError::already_initialized());
            }
            let handle = MapHandle {
                id: "headless-map".to_owned(),
            };
            scene.handle = Some(handle.clone());
            handle
        };
        info!(map = %handle.id, "headless map created");
        self.emit_ready_once();
        Ok(handle)
    }

    fn set_camera(&self, camera: Camera) {
        info!(center = %camera.center, zoom = ?camera.zoom, "camera moved");
        self.lock_scene().camera = Some(camera);
    }

    fn clear_markers(&self) {
        let mut scene = self.lock_scene();
        debug!(removed = scene.markers.len(), "markers cleared");
        scene.markers.clear();
    }

    fn add_marker(&self, truck: &Truck) {
        info!(
            id = %truck.id,
            name = %truck.name,
            position = %truck.position,
            address = truck.address.as_deref().unwrap_or_default(),
            "truck marker"
        );
        self.lock_scene().markers.push(truck.clone());
    }

    fn mark_focus(&self, focus: Coordinate) {
        info!(%focus, "focus marker moved");
        self.lock_scene().focus = Some(focus);
    }
}
