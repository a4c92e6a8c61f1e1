//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed truck backend client
//! - **map**: in-memory map surface that renders into the log
//! - **notify**: notification sink writing structured log events
//! - **location**: device locator with a configured position
//!
//! Adapters are thin translators between domain types and their transport.
//! They contain no business logic.

pub mod http;
pub mod location;
pub mod map;
pub mod notify;
