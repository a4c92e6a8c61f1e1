//! Map surface adapters.

mod headless;

pub use headless::HeadlessMapSurface;
