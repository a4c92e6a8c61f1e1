//! Domain primitives, ports and the refresh cycle.
//!
//! Purpose: turn a coordinate into a backend query and the query's result
//! into map state, without knowing which transport or map engine sits behind
//! the ports.
//!
//! Public surface:
//! - Coordinate, Truck: validated value types.
//! - ViewerConfig, Status: startup configuration and backend health.
//! - RefreshController: the focus-point state machine.
//! - start_session: the config-before-map startup sequence.

pub mod config;
pub mod coordinate;
pub mod error;
pub mod ports;
pub mod refresh_controller;
pub mod startup;

pub use self::config::{RemoteConfig, Status, Uptime, ViewerConfig};
pub use self::coordinate::{Coordinate, CoordinateError, Truck};
pub use self::error::{ConfigError, StartupError};
pub use self::refresh_controller::{
    EventOutcome, IgnoreReason, QueryMode, RefreshController, RefreshControllerConfig,
    RefreshPhase, RefreshSnapshot, ViewerEvent, ViewerPorts,
};
pub use self::startup::start_session;
