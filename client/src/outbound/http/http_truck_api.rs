//! Reqwest-backed truck backend adapter.
//!
//! This adapter owns transport details only: URL building, timeout and HTTP
//! error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::dto::{ConfigDto, ErrorDto, StatusDto, TruckDto, into_domain_trucks};
use crate::domain::ports::{TruckApi, TruckApiError};
use crate::domain::{Coordinate, RemoteConfig, Status, Truck};

/// Default client-side request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Truck backend adapter issuing one GET per call against a base URL.
pub struct HttpTruckApi {
    client: Client,
    base: Url,
}

impl HttpTruckApi {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let api = HttpTruckApi::new(Url::parse("http://localhost:8080/")?, DEFAULT_REQUEST_TIMEOUT)?;
    /// let trucks = api.find_near(position).await?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    /// Base URL every request is resolved against.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, TruckApiError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref())
            .map_err(|error| TruckApiError::decode(format!("invalid JSON payload: {error}")))
    }

    async fn get_trucks(&self, url: Url) -> Result<Vec<Truck>, TruckApiError> {
        let decoded: Vec<TruckDto> = self.get_json(url).await?;
        into_domain_trucks(decoded).map_err(TruckApiError::decode)
    }
}

#[async_trait]
impl TruckApi for HttpTruckApi {
    async fn find_near(&self, position: Coordinate) -> Result<Vec<Truck>, TruckApiError> {
        let url = trucks_url(&self.base, position, None)?;
        self.get_trucks(url).await
    }

    async fn find_in_radius(
        &self,
        position: Coordinate,
        radius_meters: u32,
    ) -> Result<Vec<Truck>, TruckApiError> {
        let url = trucks_url(&self.base, position, Some(radius_meters))?;
        self.get_trucks(url).await
    }

    async fn get_config(&self) -> Result<RemoteConfig, TruckApiError> {
        let url = join(&self.base, "config")?;
        let decoded: ConfigDto = self.get_json(url).await?;
        Ok(decoded.into())
    }

    async fn get_status(&self) -> Result<Status, TruckApiError> {
        let url = join(&self.base, "status")?;
        let decoded: StatusDto = self.get_json(url).await?;
        Ok(decoded.into())
    }
}

/// `trucks/{lat}/{long}` relative to `base`, with an optional `radius` query.
fn trucks_url(
    base: &Url,
    position: Coordinate,
    radius_meters: Option<u32>,
) -> Result<Url, TruckApiError> {
    // `{}` on f64 is the shortest representation that round-trips.
    let path = format!("trucks/{}/{}", position.latitude(), position.longitude());
    let mut url = join(base, &path)?;
    if let Some(radius) = radius_meters {
        url.query_pairs_mut()
            .append_pair("radius", &radius.to_string());
    }
    Ok(url)
}

fn join(base: &Url, path: &str) -> Result<Url, TruckApiError> {
    base.join(path).map_err(|error| {
        TruckApiError::invalid_request(format!("cannot build URL for '{path}': {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> TruckApiError {
    if error.is_timeout() {
        TruckApiError::timeout(error.to_string())
    } else if error.is_decode() {
        TruckApiError::decode(error.to_string())
    } else {
        TruckApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TruckApiError {
    let detail = serde_json::from_slice::<ErrorDto>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body_preview(body));
    let message = if detail.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        detail
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TruckApiError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => TruckApiError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use rstest::rstest;

    use super::*;
    use crate::domain::Uptime;

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("valid base")
    }

    fn point(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).expect("valid coordinate")
    }

    #[rstest]
    #[case::san_francisco(37.7758, -122.4205, "http://localhost:8080/trucks/37.7758/-122.4205")]
    #[case::london(51.403_278, 0.056_169, "http://localhost:8080/trucks/51.403278/0.056169")]
    #[case::whole_degrees(10.0, -20.0, "http://localhost:8080/trucks/10/-20")]
    #[case::tiny(0.000_001, 1e-7, "http://localhost:8080/trucks/0.000001/0.0000001")]
    fn renders_coordinates_without_precision_loss(
        #[case] latitude: f64,
        #[case] longitude: f64,
        #[case] expected: &str,
    ) {
        let url = trucks_url(&base("http://localhost:8080/"), point(latitude, longitude), None)
            .expect("url builds");
        assert_eq!(url.as_str(), expected);

        let segments: Vec<_> = url.path_segments().expect("has segments").collect();
        let parsed_lat: f64 = segments.get(1).expect("lat").parse().expect("float");
        let parsed_lon: f64 = segments.get(2).expect("long").parse().expect("float");
        assert_eq!(parsed_lat, latitude);
        assert_eq!(parsed_lon, longitude);
    }

    #[test]
    fn appends_radius_query() {
        let url = trucks_url(&base("https://trucks.example.com/api/"), point(1.5, 2.5), Some(0))
            .expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://trucks.example.com/api/trucks/1.5/2.5?radius=0"
        );
    }

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"");
        assert!(matches!(error, TruckApiError::Timeout { .. }));
    }

    #[test]
    fn uses_backend_error_message_when_present() {
        let error = map_status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"code": 500, "message": "database offline"}"#,
        );
        assert_eq!(error, TruckApiError::status(500_u16, "database offline"));
    }

    #[test]
    fn falls_back_to_compacted_body_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"<html>\n  upstream   down\n</html>");
        assert_eq!(
            error,
            TruckApiError::status(502_u16, "<html> upstream down </html>")
        );
    }

    #[test]
    fn empty_body_uses_canonical_reason() {
        let error = map_status_error(StatusCode::NOT_FOUND, b"");
        assert_eq!(error, TruckApiError::status(404_u16, "Not Found"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn decodes_trucks_and_drops_blank_optionals() {
        let body = r#"[
            {"id": "t1", "name": "Tacos", "description": "", "lat": 37.77, "long": -122.42, "address": "1 Market St"},
            {"id": "t2", "name": "Dumplings", "lat": 37.78, "long": -122.41}
        ]"#;
        let decoded: Vec<TruckDto> = serde_json::from_str(body).expect("JSON decodes");
        let trucks = into_domain_trucks(decoded).expect("trucks map");

        assert_eq!(trucks.len(), 2);
        let first = trucks.first().expect("first truck");
        assert_eq!(first.description, None);
        assert_eq!(first.address.as_deref(), Some("1 Market St"));
        assert_eq!(first.position, point(37.77, -122.42));
    }

    #[test]
    fn rejects_trucks_outside_wgs84() {
        let body = r#"[{"id": "bad", "name": "Nowhere", "lat": 95.0, "long": 0.0}]"#;
        let decoded: Vec<TruckDto> = serde_json::from_str(body).expect("JSON decodes");
        let error = into_domain_trucks(decoded).expect_err("position must be rejected");
        assert!(error.contains("bad"));
    }

    #[test]
    fn decodes_config_key_and_extras() {
        let body = r#"{"azureMapsKey": "abc123", "theme": "dark"}"#;
        let config: RemoteConfig = serde_json::from_str::<ConfigDto>(body)
            .expect("JSON decodes")
            .into();
        assert_eq!(config.map_provider_key.as_deref(), Some("abc123"));
        assert_eq!(config.extra.get("theme"), Some(&serde_json::Value::from("dark")));
        assert!(!config.extra.contains_key("azureMapsKey"));
    }

    #[rstest]
    #[case::numeric(r#"{"healthy": true, "version": "1.0", "hostname": "h", "uptime": 42.5, "runtimeVersion": "rust"}"#, Uptime::Seconds(42.5), "rust")]
    #[case::legacy(r#"{"healthy": true, "version": "1.0", "hostname": "h", "uptime": "3h2m", "goVersion": "go1.22"}"#, Uptime::Text("3h2m".to_owned()), "go1.22")]
    fn decodes_status_variants(
        #[case] body: &str,
        #[case] uptime: Uptime,
        #[case] runtime: &str,
    ) {
        let status: Status = serde_json::from_str::<StatusDto>(body)
            .expect("JSON decodes")
            .into();
        assert!(status.healthy);
        assert_eq!(status.uptime, uptime);
        assert_eq!(status.runtime_version, runtime);
    }
}
