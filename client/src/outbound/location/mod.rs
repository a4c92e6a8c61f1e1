//! Device locator adapters.

mod fixed;

pub use fixed::FixedDeviceLocator;
