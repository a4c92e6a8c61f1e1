//! Test utilities for the client crate.
//!
//! Shared doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::ports::{
    Camera, DeviceLocator, GeolocationError, MapHandle, MapSurface, MapSurfaceError,
    Notification, NotificationSink, NotificationSinkError, TruckApi, TruckApiError,
};
use crate::domain::{
    Coordinate, RefreshController, RefreshControllerConfig, RemoteConfig, Status, Truck, Uptime,
    ViewerPorts,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(position: Coordinate) -> String {
    format!("{}/{}", position.latitude(), position.longitude())
}

/// Build `count` trucks clustered around `center`.
///
/// # Panics
///
/// Panics when `center` sits so close to a pole or the antimeridian that the
/// offsets leave the valid range.
#[must_use]
pub fn sample_trucks(center: Coordinate, count: usize) -> Vec<Truck> {
    (0..count)
        .map(|index| {
            let offset = 0.001 * f64::from(u32::try_from(index + 1).unwrap_or(u32::MAX));
            let position = Coordinate::new(center.latitude() + offset, center.longitude() - offset)
                .unwrap_or_else(|err| panic!("sample truck out of range: {err}"));
            let mut truck = Truck::new(format!("truck-{index}"), format!("Truck {index}"), position);
            truck.address = Some(format!("{index} Market St"));
            truck
        })
        .collect()
}

/// Healthy status snapshot used by status tests.
#[must_use]
pub fn sample_status() -> Status {
    Status {
        healthy: true,
        version: "1.4.2".to_owned(),
        hostname: "trucks-api-0".to_owned(),
        uptime: Uptime::Text("3h12m5s".to_owned()),
        runtime_version: "go1.22.1".to_owned(),
    }
}

/// Build a validated coordinate or panic.
///
/// # Panics
///
/// Panics when the components are out of range.
#[must_use]
pub fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude)
        .unwrap_or_else(|err| panic!("invalid test coordinate: {err}"))
}

/// One call observed by [`StubTruckApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `find_near`.
    Near(Coordinate),
    /// `find_in_radius`.
    InRadius(Coordinate, u32),
    /// `get_config`.
    Config,
    /// `get_status`.
    Status,
}

type TruckResult = Result<Vec<Truck>, TruckApiError>;

#[derive(Default)]
struct ResponseScript {
    queued: VecDeque<TruckResult>,
    last: Option<TruckResult>,
}

impl ResponseScript {
    fn next(&mut self) -> TruckResult {
        if let Some(result) = self.queued.pop_front() {
            self.last = Some(result);
        }
        self.last.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Scriptable [`TruckApi`] keyed by the queried coordinate.
///
/// Each coordinate has a queue of responses; once it runs dry the last
/// response repeats. Unknown coordinates answer with an empty list. A
/// coordinate can be held behind a gate so tests control completion order.
pub struct StubTruckApi {
    trucks: Mutex<HashMap<String, ResponseScript>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    config: Mutex<Result<RemoteConfig, TruckApiError>>,
    status: Mutex<Result<Status, TruckApiError>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl Default for StubTruckApi {
    fn default() -> Self {
        Self {
            trucks: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            config: Mutex::new(Ok(RemoteConfig {
                map_provider_key: Some("test-key".to_owned()),
                ..RemoteConfig::default()
            })),
            status: Mutex::new(Ok(sample_status())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubTruckApi {
    /// Queue a response for queries at `position`.
    pub fn respond(&self, position: Coordinate, result: TruckResult) {
        lock(&self.trucks)
            .entry(key(position))
            .or_default()
            .queued
            .push_back(result);
    }

    /// Hold the next query at `position` until the returned sender fires or
    /// is dropped.
    pub fn hold(&self, position: Coordinate) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        lock(&self.gates).insert(key(position), gate);
        release
    }

    /// Replace the configuration response.
    pub fn set_config(&self, result: Result<RemoteConfig, TruckApiError>) {
        *lock(&self.config) = result;
    }

    /// Replace the status response.
    pub fn set_status(&self, result: Result<Status, TruckApiError>) {
        *lock(&self.status) = result;
    }

    /// Calls observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    async fn answer(&self, position: Coordinate) -> TruckResult {
        let gate = lock(&self.gates).remove(&key(position));
        if let Some(gate) = gate {
            // A dropped sender releases the gate too.
            let _ = gate.await;
        }
        lock(&self.trucks)
            .get_mut(&key(position))
            .map_or_else(|| Ok(Vec::new()), ResponseScript::next)
    }
}

#[async_trait]
impl TruckApi for StubTruckApi {
    async fn find_near(&self, position: Coordinate) -> Result<Vec<Truck>, TruckApiError> {
        lock(&self.calls).push(ApiCall::Near(position));
        self.answer(position).await
    }

    async fn find_in_radius(
        &self,
        position: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<Truck>, TruckApiError> {
        lock(&self.calls).push(ApiCall::InRadius(position, radius_meters));
        self.answer(position).await
    }

    async fn get_config(&self) -> Result<RemoteConfig, TruckApiError> {
        lock(&self.calls).push(ApiCall::Config);
        lock(&self.config).clone()
    }

    async fn get_status(&self) -> Result<Status, TruckApiError> {
        lock(&self.calls).push(ApiCall::Status);
        lock(&self.status).clone()
    }
}

/// One operation observed by [`RecordingMapSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    /// `initialize` with the given key.
    Initialize(String),
    /// `set_camera`.
    SetCamera(Camera),
    /// `clear_markers`.
    ClearMarkers,
    /// `add_marker` with the truck id.
    AddMarker(String),
    /// `mark_focus`.
    MarkFocus(Coordinate),
}

/// [`MapSurface`] that records every operation and tracks the marker set.
#[derive(Default)]
pub struct RecordingMapSurface {
    ops: Mutex<Vec<MapOp>>,
    markers: Mutex<Vec<Truck>>,
    refuse_key: Option<String>,
}

impl RecordingMapSurface {
    /// Surface that rejects `key` as unauthorised.
    #[must_use]
    pub fn refusing(key: impl Into<String>) -> Self {
        Self {
            refuse_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Operations observed so far.
    #[must_use]
    pub fn ops(&self) -> Vec<MapOp> {
        lock(&self.ops).clone()
    }

    /// Markers currently shown.
    #[must_use]
    pub fn markers(&self) -> Vec<Truck> {
        lock(&self.markers).clone()
    }

    /// Whether `initialize` was ever called.
    #[must_use]
    pub fn was_initialized(&self) -> bool {
        self.ops()
            .iter()
            .any(|op| matches!(op, MapOp::Initialize(_)))
    }

    /// Most recent camera placement.
    #[must_use]
    pub fn last_camera(&self) -> Option<Camera> {
        self.ops().iter().rev().find_map(|op| match op {
            MapOp::SetCamera(camera) => Some(*camera),
            _ => None,
        })
    }

    /// Current position of the focus marker.
    #[must_use]
    pub fn focus_marker(&self) -> Option<Coordinate> {
        self.ops().iter().rev().find_map(|op| match op {
            MapOp::MarkFocus(focus) => Some(*focus),
            _ => None,
        })
    }
}

impl MapSurface for RecordingMapSurface {
    fn initialize(&self, auth_key: &str) -> Result<MapHandle, MapSurfaceError> {
        lock(&self.ops).push(MapOp::Initialize(auth_key.to_owned()));
        if self.refuse_key.as_deref() == Some(auth_key) {
            return Err(MapSurfaceError::unauthorized("key rejected"));
        }
        Ok(MapHandle {
            id: "recording-map".to_owned(),
        })
    }

    fn set_camera(&self, camera: Camera) {
        lock(&self.ops).push(MapOp::SetCamera(camera));
    }

    fn clear_markers(&self) {
        lock(&self.ops).push(MapOp::ClearMarkers);
        lock(&self.markers).clear();
    }

    fn add_marker(&self, truck: &Truck) {
        lock(&self.ops).push(MapOp::AddMarker(truck.id.clone()));
        lock(&self.markers).push(truck.clone());
    }

    fn mark_focus(&self, focus: Coordinate) {
        lock(&self.ops).push(MapOp::MarkFocus(focus));
    }
}

/// [`NotificationSink`] that records messages, optionally failing every call.
#[derive(Default)]
pub struct RecordingNotificationSink {
    toasts: Mutex<Vec<Notification>>,
    errors: Mutex<Vec<String>>,
    closed: bool,
}

impl RecordingNotificationSink {
    /// Sink whose every delivery fails with `Closed`.
    #[must_use]
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::default()
        }
    }

    /// Toasts delivered so far.
    #[must_use]
    pub fn toasts(&self) -> Vec<Notification> {
        lock(&self.toasts).clone()
    }

    /// Toast texts delivered so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .map(|toast| toast.message)
            .collect()
    }

    /// Blocking errors shown so far.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, notification: &Notification) -> Result<(), NotificationSinkError> {
        if self.closed {
            return Err(NotificationSinkError::closed());
        }
        lock(&self.toasts).push(notification.clone());
        Ok(())
    }

    fn show_error(&self, message: &str) -> Result<(), NotificationSinkError> {
        if self.closed {
            return Err(NotificationSinkError::closed());
        }
        lock(&self.errors).push(message.to_owned());
        Ok(())
    }
}

/// [`DeviceLocator`] answering from a script; the last answer repeats.
pub struct ScriptedLocator {
    answers: Mutex<VecDeque<Result<Coordinate, GeolocationError>>>,
}

impl ScriptedLocator {
    /// Locator that always reports `position`.
    #[must_use]
    pub fn at(position: Coordinate) -> Self {
        Self::script([Ok(position)])
    }

    /// Locator that always fails with `error`.
    #[must_use]
    pub fn failing(error: GeolocationError) -> Self {
        Self::script([Err(error)])
    }

    /// Locator answering with `answers` in order.
    pub fn script(answers: impl IntoIterator<Item = Result<Coordinate, GeolocationError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl DeviceLocator for ScriptedLocator {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        let mut answers = lock(&self.answers);
        let answer = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        answer.unwrap_or_else(|| Err(GeolocationError::unavailable("no scripted position")))
    }
}

/// The four recording doubles wired together.
pub struct TestViewer {
    /// Backend double.
    pub api: Arc<StubTruckApi>,
    /// Map double.
    pub map: Arc<RecordingMapSurface>,
    /// Notification double.
    pub notifier: Arc<RecordingNotificationSink>,
    /// Locator double.
    pub locator: Arc<ScriptedLocator>,
}

impl TestViewer {
    /// Doubles with the device located at `device`.
    #[must_use]
    pub fn located_at(device: Coordinate) -> Self {
        Self::with_locator(ScriptedLocator::at(device))
    }

    /// Doubles using the given locator.
    #[must_use]
    pub fn with_locator(locator: ScriptedLocator) -> Self {
        Self {
            api: Arc::new(StubTruckApi::default()),
            map: Arc::new(RecordingMapSurface::default()),
            notifier: Arc::new(RecordingNotificationSink::default()),
            locator: Arc::new(locator),
        }
    }

    /// Port bundle backed by these doubles.
    #[must_use]
    pub fn ports(&self) -> ViewerPorts {
        ViewerPorts {
            api: self.api.clone(),
            map: self.map.clone(),
            notifier: self.notifier.clone(),
            locator: self.locator.clone(),
        }
    }

    /// Controller drawing on the recording map, not yet `Ready`.
    #[must_use]
    pub fn controller(&self, config: RefreshControllerConfig) -> RefreshController {
        RefreshController::new(
            self.ports(),
            MapHandle {
                id: "recording-map".to_owned(),
            },
            config,
        )
    }
}
