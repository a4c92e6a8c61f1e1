//! Truck backend HTTP adapters.
//!
//! This module provides a thin reqwest implementation of the `TruckApi` port
//! plus the base URL resolution it is configured with.

mod dto;
mod endpoint;
mod http_truck_api;

pub use endpoint::{EndpointError, ORIGIN_ENV, resolve_api_base, select_api_base};
pub use http_truck_api::{DEFAULT_REQUEST_TIMEOUT, HttpTruckApi};
