//! DTOs for decoding truck backend JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records in one pass.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Coordinate, RemoteConfig, Status, Truck, Uptime};

#[derive(Debug, Deserialize)]
pub(super) struct TruckDto {
    #[serde(default)]
    pub(super) id: Option<String>,
    pub(super) name: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    pub(super) lat: f64,
    pub(super) long: f64,
    #[serde(default)]
    pub(super) address: Option<String>,
}

impl TruckDto {
    /// Backends that omit `id` identify trucks by name.
    pub(super) fn into_domain_truck(self) -> Result<Truck, String> {
        let id = non_blank(self.id).unwrap_or_else(|| self.name.clone());
        let position = Coordinate::new(self.lat, self.long)
            .map_err(|error| format!("truck {id} has an invalid position: {error}"))?;
        Ok(Truck {
            id,
            name: self.name,
            position,
            description: non_blank(self.description),
            address: non_blank(self.address),
        })
    }
}

pub(super) fn into_domain_trucks(trucks: Vec<TruckDto>) -> Result<Vec<Truck>, String> {
    trucks.into_iter().map(TruckDto::into_domain_truck).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub(super) struct ConfigDto {
    #[serde(rename = "azureMapsKey", alias = "mapProviderKey", default)]
    pub(super) map_provider_key: Option<String>,
    #[serde(flatten)]
    pub(super) extra: BTreeMap<String, Value>,
}

impl From<ConfigDto> for RemoteConfig {
    fn from(dto: ConfigDto) -> Self {
        Self {
            map_provider_key: dto.map_provider_key,
            extra: dto.extra,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UptimeDto {
    Seconds(f64),
    Text(String),
}

impl Default for UptimeDto {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusDto {
    pub(super) healthy: bool,
    #[serde(default)]
    pub(super) version: String,
    #[serde(default)]
    pub(super) hostname: String,
    #[serde(default)]
    pub(super) uptime: UptimeDto,
    #[serde(default, alias = "goVersion")]
    pub(super) runtime_version: String,
}

impl From<StatusDto> for Status {
    fn from(dto: StatusDto) -> Self {
        Self {
            healthy: dto.healthy,
            version: dto.version,
            hostname: dto.hostname,
            uptime: match dto.uptime {
                UptimeDto::Seconds(seconds) => Uptime::Seconds(seconds),
                UptimeDto::Text(text) => Uptime::Text(text),
            },
            runtime_version: dto.runtime_version,
        }
    }
}

/// Error body returned by the backend alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    pub(super) message: String,
}

#[cfg(test)]
mod tests {
    //! Decoding rules for truck documents.

    use super::*;
    use rstest::rstest;

    fn decode(body: &str) -> Result<Truck, String> {
        let dto: TruckDto = serde_json::from_str(body).expect("truck JSON parses");
        dto.into_domain_truck()
    }

    #[rstest]
    #[case::missing(r#"{"name":"Tacos","lat":37.776,"long":-122.42}"#, "Tacos")]
    #[case::blank(r#"{"id":" ","name":"Tacos","lat":37.776,"long":-122.42}"#, "Tacos")]
    #[case::present(r#"{"id":"t-1","name":"Tacos","lat":37.776,"long":-122.42}"#, "t-1")]
    fn id_falls_back_to_name(#[case] body: &str, #[case] expected: &str) {
        let truck = decode(body).expect("truck decodes");
        assert_eq!(truck.id, expected);
        assert_eq!(truck.name, "Tacos");
    }

    #[rstest]
    fn out_of_range_positions_are_rejected() {
        let error = decode(r#"{"name":"Adrift","lat":91.0,"long":0.0}"#)
            .expect_err("latitude 91 is invalid");
        assert!(error.starts_with("truck Adrift has an invalid position"), "{error}");
    }
}
