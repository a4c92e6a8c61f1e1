//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod device_locator;
mod map_surface;
mod notification_sink;
mod truck_api;

#[cfg(test)]
pub use device_locator::MockDeviceLocator;
pub use device_locator::{DeviceLocator, GeolocationError};
#[cfg(test)]
pub use map_surface::MockMapSurface;
pub use map_surface::{Camera, MapEvent, MapHandle, MapSurface, MapSurfaceError};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{Notification, NotificationSink, NotificationSinkError, ToastPosition};
#[cfg(test)]
pub use truck_api::MockTruckApi;
pub use truck_api::{TruckApi, TruckApiError};
