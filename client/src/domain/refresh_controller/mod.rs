//! Domain state machine driving the location/query/render cycle.
//!
//! The controller owns the focus point and its generation counter. Every
//! trigger bumps the generation and clears the marker set before the backend
//! is queried; a completion whose generation is no longer current is
//! discarded, so the map always reflects the most recently requested focus
//! regardless of network completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::{self, BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::domain::Coordinate;
use crate::domain::ports::{
    Camera, DeviceLocator, MapEvent, MapHandle, MapSurface, Notification, NotificationSink,
    TruckApi, TruckApiError,
};

mod events;
mod state;

pub use events::{EventOutcome, IgnoreReason, ViewerEvent};
pub use state::{RefreshPhase, RefreshSnapshot};
use state::{ControllerState, RefreshTicket};

const DEFAULT_ZOOM: u8 = 15;
const SAN_FRANCISCO: Coordinate = Coordinate::from_trusted(37.7758, -122.4205);

/// Port bundle required by the refresh controller and the startup sequence.
#[derive(Clone)]
pub struct ViewerPorts {
    /// Backend API client.
    pub api: Arc<dyn TruckApi>,
    /// Map widget adapter.
    pub map: Arc<dyn MapSurface>,
    /// User-facing message sink.
    pub notifier: Arc<dyn NotificationSink>,
    /// Device position source.
    pub locator: Arc<dyn DeviceLocator>,
}

/// How the backend is queried for each focus point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Let the backend pick a radius that yields a handful of trucks.
    #[default]
    Near,
    /// Only trucks within a fixed radius.
    WithinRadius {
        /// Search radius in meters.
        meters: u32,
    },
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshControllerConfig {
    /// Query mode used for every refresh.
    pub query_mode: QueryMode,
    /// Zoom applied when recentring on a refreshed focus point.
    pub zoom: u8,
    /// Destination of the teleport shortcut.
    pub teleport_target: Coordinate,
    /// How long the "trucks found" toast stays up.
    pub success_toast: Duration,
    /// How long error toasts stay up.
    pub error_toast: Duration,
    /// How long the status toast stays up.
    pub status_toast: Duration,
}

impl Default for RefreshControllerConfig {
    fn default() -> Self {
        Self {
            query_mode: QueryMode::Near,
            zoom: DEFAULT_ZOOM,
            teleport_target: SAN_FRANCISCO,
            success_toast: Duration::from_millis(2000),
            error_toast: Duration::from_millis(5000),
            status_toast: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocateReason {
    Startup,
    UserRequest,
}

/// Session-scoped owner of the focus point and refresh lifecycle.
pub struct RefreshController {
    ports: ViewerPorts,
    map_handle: MapHandle,
    config: RefreshControllerConfig,
    state: Mutex<ControllerState>,
}

impl RefreshController {
    /// Build a controller for an initialised map.
    /// ```rust,ignore
    /// let controller = RefreshController::new(ports, handle, RefreshControllerConfig::default());
    /// assert_eq!(controller.snapshot().phase, RefreshPhase::Uninitialized);
    /// ```
    #[must_use]
    pub fn new(ports: ViewerPorts, map_handle: MapHandle, config: RefreshControllerConfig) -> Self {
        Self {
            ports,
            map_handle,
            config,
            state: Mutex::new(ControllerState::new()),
        }
    }

    /// Handle of the map this controller draws on.
    #[must_use]
    pub const fn map_handle(&self) -> &MapHandle {
        &self.map_handle
    }

    /// Current phase, focus point and generation.
    #[must_use]
    pub fn snapshot(&self) -> RefreshSnapshot {
        self.lock_state().snapshot()
    }

    /// Handle one trigger.
    ///
    /// Focus changes that need no device lookup (clicks, teleport) take
    /// effect before this returns: the generation is bumped and the marker
    /// set cleared synchronously. The returned future performs the backend
    /// query and reconciles the map, and may be polled concurrently with
    /// futures from later events.
    pub fn handle_event(&self, event: ViewerEvent) -> BoxFuture<'_, EventOutcome> {
        match event {
            ViewerEvent::Map(MapEvent::Ready) => {
                if !self.lock_state().mark_map_ready() {
                    warn!("map reported ready twice; ignoring");
                    return ignored(IgnoreReason::DuplicateReady);
                }
                info!(map = %self.map_handle.id, "map ready; locating device");
                self.locate_and_refresh(LocateReason::Startup).boxed()
            }
            ViewerEvent::Map(MapEvent::Click(position)) => self.trigger(position),
            ViewerEvent::Teleport => self.trigger(self.config.teleport_target),
            ViewerEvent::LocateMe => {
                if !self.lock_state().is_map_ready() {
                    debug!("locate requested before map ready; ignoring");
                    return ignored(IgnoreReason::MapNotReady);
                }
                self.locate_and_refresh(LocateReason::UserRequest).boxed()
            }
            ViewerEvent::ShowStatus => self.show_status().boxed(),
        }
    }

    /// Refresh the map for `focus` and wait for the result.
    pub async fn refresh(&self, focus: Coordinate) -> EventOutcome {
        self.trigger(focus).await
    }

    fn trigger(&self, focus: Coordinate) -> BoxFuture<'_, EventOutcome> {
        match self.begin_refresh(focus) {
            Some(ticket) => self.finish_refresh(ticket).boxed(),
            None => {
                debug!(%focus, "refresh requested before map ready; ignoring");
                ignored(IgnoreReason::MapNotReady)
            }
        }
    }

    fn begin_refresh(&self, focus: Coordinate) -> Option<RefreshTicket> {
        let ticket = {
            let mut state = self.lock_state();
            if !state.is_map_ready() {
                return None;
            }
            state.begin(focus)
        };
        self.ports.map.clear_markers();
        self.ports.map.mark_focus(focus);
        debug!(%focus, generation = ticket.generation, "refresh started");
        Some(ticket)
    }

    async fn finish_refresh(&self, ticket: RefreshTicket) -> EventOutcome {
        let result = self.query(ticket.focus).await;

        let phase = {
            let mut state = self.lock_state();
            if !state.is_current(&ticket) {
                debug!(
                    focus = %ticket.focus,
                    generation = ticket.generation,
                    "discarding stale refresh result"
                );
                return EventOutcome::Superseded {
                    focus: ticket.focus,
                };
            }
            let phase = if result.is_ok() {
                RefreshPhase::Ready
            } else {
                RefreshPhase::Failed
            };
            state.settle(phase);
            phase
        };
        debug!(focus = %ticket.focus, ?phase, "refresh settled");

        match result {
            Ok(trucks) => {
                for truck in &trucks {
                    self.ports.map.add_marker(truck);
                }
                self.ports.map.set_camera(Camera {
                    center: ticket.focus,
                    zoom: Some(self.config.zoom),
                });
                self.deliver(Notification::top_right(
                    format!("Located {} food trucks!", trucks.len()),
                    self.config.success_toast,
                ));
                EventOutcome::Refreshed {
                    focus: ticket.focus,
                    truck_count: trucks.len(),
                }
            }
            Err(error) => {
                warn!(focus = %ticket.focus, error = %error, kind = error.kind(), "refresh failed");
                self.deliver(Notification::top_right(
                    format!("API error: {error}"),
                    self.config.error_toast,
                ));
                EventOutcome::RefreshFailed {
                    focus: ticket.focus,
                    error,
                }
            }
        }
    }

    async fn query(&self, focus: Coordinate) -> Result<Vec<crate::domain::Truck>, TruckApiError> {
        match self.config.query_mode {
            QueryMode::Near => self.ports.api.find_near(focus).await,
            QueryMode::WithinRadius { meters } => {
                self.ports.api.find_in_radius(focus, meters).await
            }
        }
    }

    async fn locate_and_refresh(&self, reason: LocateReason) -> EventOutcome {
        match self.ports.locator.locate().await {
            Ok(position) => self.trigger(position).await,
            Err(error) => {
                let message = format!("Unable to get location: {error}");
                let blocking = reason == LocateReason::Startup;
                warn!(error = %error, kind = error.kind(), blocking, "device location failed");
                if blocking {
                    self.deliver_blocking(&message);
                } else {
                    self.deliver(Notification::top_right(message, self.config.error_toast));
                }
                EventOutcome::LocationUnavailable { error, blocking }
            }
        }
    }

    async fn show_status(&self) -> EventOutcome {
        match self.ports.api.get_status().await {
            Ok(status) => {
                self.deliver(Notification::top_right(
                    status.summary(),
                    self.config.status_toast,
                ));
                EventOutcome::StatusShown(status)
            }
            Err(error) => {
                warn!(error = %error, kind = error.kind(), "status request failed");
                self.deliver(Notification::top_right(
                    format!("API error: {error}"),
                    self.config.error_toast,
                ));
                EventOutcome::StatusFailed(error)
            }
        }
    }

    fn deliver(&self, notification: Notification) {
        if let Err(error) = self.ports.notifier.notify(&notification) {
            warn!(error = %error, message = %notification.message, "notification dropped");
        }
    }

    fn deliver_blocking(&self, message: &str) {
        if let Err(error) = self.ports.notifier.show_error(message) {
            warn!(error = %error, message, "blocking error message dropped");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        // State updates never panic mid-way, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ignored<'a>(reason: IgnoreReason) -> BoxFuture<'a, EventOutcome> {
    future::ready(EventOutcome::Ignored(reason)).boxed()
}
