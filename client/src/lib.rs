//! Truck viewer client library.
//!
//! The crate is laid out as a small hexagon: `domain` owns the refresh
//! cycle and the ports it drives, `inbound` feeds it user and map events, and
//! `outbound` implements the ports against HTTP, `tracing` and in-memory
//! state.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
