//! Inbound adapters driving the domain.
//!
//! - **cli**: terminal command parsing and forwarding
//! - **session**: the single-task event loop feeding the refresh controller

pub mod cli;
pub mod session;
