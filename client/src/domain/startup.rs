//! Config-before-map startup sequence.
//!
//! The map provider key comes from the backend, so the map cannot be created
//! until the configuration has been fetched and validated. Any failure here
//! is fatal for the session and is shown through the persistent error
//! channel.

use tracing::{error, info, warn};

use super::error::{ConfigError, StartupError};
use super::refresh_controller::{RefreshController, RefreshControllerConfig, ViewerPorts};
use super::ViewerConfig;

/// Fetch and validate the configuration, initialise the map, and build the
/// refresh controller.
///
/// The returned controller is still `Uninitialized`; it becomes `Ready` when
/// the map's `Ready` event is handled.
///
/// # Errors
///
/// Returns [`StartupError::Config`] when the configuration cannot be fetched
/// or lacks the map provider key (no map is created in that case), and
/// [`StartupError::Map`] when the map surface refuses to initialise.
pub async fn start_session(
    ports: ViewerPorts,
    config: RefreshControllerConfig,
) -> Result<RefreshController, StartupError> {
    let viewer_config = match load_config(&ports).await {
        Ok(viewer_config) => viewer_config,
        Err(err) => {
            error!(error = %err, "startup configuration rejected");
            show_blocking(&ports, &format!("Config error: {err}"));
            return Err(err.into());
        }
    };

    let handle = match ports.map.initialize(viewer_config.map_provider_key()) {
        Ok(handle) => handle,
        Err(err) => {
            error!(error = %err, kind = err.kind(), "map initialisation failed");
            show_blocking(&ports, &format!("Map error: {err}"));
            return Err(err.into());
        }
    };
    info!(map = %handle.id, "map initialised");

    Ok(RefreshController::new(ports, handle, config))
}

async fn load_config(ports: &ViewerPorts) -> Result<ViewerConfig, ConfigError> {
    let remote = ports.api.get_config().await?;
    ViewerConfig::try_from(remote)
}

fn show_blocking(ports: &ViewerPorts, message: &str) {
    if let Err(err) = ports.notifier.show_error(message) {
        warn!(error = %err, message, "blocking error message dropped");
    }
}

#[cfg(test)]
mod tests {
    //! Ordering guarantees of the startup sequence.

    use std::sync::Arc;

    use mockall::predicate::eq;

    use super::*;
    use crate::domain::RemoteConfig;
    use crate::domain::ports::{
        MapHandle, MapSurfaceError, MockDeviceLocator, MockMapSurface, MockNotificationSink,
        MockTruckApi, TruckApiError,
    };
    use crate::domain::refresh_controller::RefreshPhase;

    fn ports(api: MockTruckApi, map: MockMapSurface, notifier: MockNotificationSink) -> ViewerPorts {
        ViewerPorts {
            api: Arc::new(api),
            map: Arc::new(map),
            notifier: Arc::new(notifier),
            locator: Arc::new(MockDeviceLocator::new()),
        }
    }

    fn remote(key: Option<&str>) -> RemoteConfig {
        RemoteConfig {
            map_provider_key: key.map(str::to_owned),
            ..RemoteConfig::default()
        }
    }

    #[tokio::test]
    async fn initialises_map_with_the_fetched_key() {
        let mut api = MockTruckApi::new();
        api.expect_get_config()
            .times(1)
            .returning(|| Ok(remote(Some("abc123"))));
        let mut map = MockMapSurface::new();
        map.expect_initialize()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(MapHandle { id: "map-1".to_owned() }));

        let session_ports = ports(api, map, MockNotificationSink::new());
        let controller = start_session(session_ports, RefreshControllerConfig::default())
            .await
            .expect("startup should succeed");

        assert_eq!(controller.map_handle().id, "map-1");
        assert_eq!(controller.snapshot().phase, RefreshPhase::Uninitialized);
    }

    #[tokio::test]
    async fn missing_key_halts_before_the_map_exists() {
        let mut api = MockTruckApi::new();
        api.expect_get_config().returning(|| Ok(remote(None)));
        let mut map = MockMapSurface::new();
        map.expect_initialize().times(0);
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_show_error()
            .withf(|message| message.starts_with("Config error:"))
            .times(1)
            .returning(|_| Ok(()));

        let error = start_session(ports(api, map, notifier), RefreshControllerConfig::default())
            .await
            .err()
            .expect("startup must fail");

        assert_eq!(
            error,
            StartupError::Config(ConfigError::MissingMapProviderKey)
        );
    }

    #[tokio::test]
    async fn config_fetch_failure_is_a_config_error() {
        let mut api = MockTruckApi::new();
        api.expect_get_config()
            .returning(|| Err(TruckApiError::status(503_u16, "unavailable")));
        let mut map = MockMapSurface::new();
        map.expect_initialize().times(0);
        let mut notifier = MockNotificationSink::new();
        notifier.expect_show_error().times(1).returning(|_| Ok(()));

        let error = start_session(ports(api, map, notifier), RefreshControllerConfig::default())
            .await
            .err()
            .expect("startup must fail");

        assert!(matches!(
            error,
            StartupError::Config(ConfigError::Fetch(TruckApiError::Status { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn map_refusal_is_reported() {
        let mut api = MockTruckApi::new();
        api.expect_get_config()
            .returning(|| Ok(remote(Some("bad-key"))));
        let mut map = MockMapSurface::new();
        map.expect_initialize()
            .returning(|_| Err(MapSurfaceError::unauthorized("401")));
        let mut notifier = MockNotificationSink::new();
        notifier.expect_show_error().times(1).returning(|_| Ok(()));

        let error = start_session(ports(api, map, notifier), RefreshControllerConfig::default())
            .await
            .err()
            .expect("startup must fail");

        assert_eq!(error, StartupError::Map(MapSurfaceError::unauthorized("401")));
    }
}
