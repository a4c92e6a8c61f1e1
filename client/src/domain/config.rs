//! Startup configuration and backend status records.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::error::ConfigError;

/// Configuration document exactly as returned by the backend.
///
/// Nothing is validated here; see [`ViewerConfig`] for the checked form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteConfig {
    /// Map provider subscription key, if the backend sent one.
    pub map_provider_key: Option<String>,
    /// Any further keys, kept verbatim.
    pub extra: BTreeMap<String, Value>,
}

/// Validated, process-wide configuration. Read-only once built.
///
/// # Examples
/// ```
/// use client::domain::{RemoteConfig, ViewerConfig};
///
/// let remote = RemoteConfig {
///     map_provider_key: Some("abc123".to_owned()),
///     ..RemoteConfig::default()
/// };
/// let config = ViewerConfig::try_from(remote)?;
/// assert_eq!(config.map_provider_key(), "abc123");
/// # Ok::<(), client::domain::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    map_provider_key: String,
    extra: BTreeMap<String, Value>,
}

impl ViewerConfig {
    /// Key used to authenticate the map surface.
    #[must_use]
    pub fn map_provider_key(&self) -> &str {
        self.map_provider_key.as_str()
    }

    /// Look up an optional, unvalidated configuration value.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl TryFrom<RemoteConfig> for ViewerConfig {
    type Error = ConfigError;

    fn try_from(remote: RemoteConfig) -> Result<Self, Self::Error> {
        let key = remote
            .map_provider_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingMapProviderKey)?;
        Ok(Self {
            map_provider_key: key,
            extra: remote.extra,
        })
    }
}

/// Backend uptime as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Uptime {
    /// Numeric uptime in seconds.
    Seconds(f64),
    /// Preformatted duration such as `3h12m5s`.
    Text(String),
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(seconds) => write!(f, "{seconds}s"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Backend health snapshot. Fetched on demand and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Whether the backend reports itself healthy.
    pub healthy: bool,
    /// Backend version string.
    pub version: String,
    /// Host serving the request.
    pub hostname: String,
    /// Time since the backend started.
    pub uptime: Uptime,
    /// Runtime the backend was built with.
    pub runtime_version: String,
}

impl Status {
    /// Render the status as a single toast line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "API status: healthy={}, version={}, host={}, uptime={}, runtime={}",
            self.healthy, self.version, self.hostname, self.uptime, self.runtime_version
        )
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for configuration records.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(""))]
    #[case::blank(Some("   "))]
    fn missing_map_key_is_a_config_error(#[case] key: Option<&str>) {
        let remote = RemoteConfig {
            map_provider_key: key.map(str::to_owned),
            ..RemoteConfig::default()
        };
        let error = ViewerConfig::try_from(remote).expect_err("config must be rejected");
        assert_eq!(error, ConfigError::MissingMapProviderKey);
    }

    #[test]
    fn keeps_extra_keys() {
        let mut extra = BTreeMap::new();
        extra.insert("theme".to_owned(), Value::from("dark"));
        let config = ViewerConfig::try_from(RemoteConfig {
            map_provider_key: Some(" key ".to_owned()),
            extra,
        })
        .expect("config should validate");

        assert_eq!(config.map_provider_key(), "key");
        assert_eq!(config.extra("theme"), Some(&Value::from("dark")));
    }

    #[test]
    fn status_summary_lists_every_field() {
        let status = Status {
            healthy: true,
            version: "1.2.3".to_owned(),
            hostname: "api-0".to_owned(),
            uptime: Uptime::Text("2h1m".to_owned()),
            runtime_version: "go1.17".to_owned(),
        };
        assert_eq!(
            status.summary(),
            "API status: healthy=true, version=1.2.3, host=api-0, uptime=2h1m, runtime=go1.17"
        );
    }
}
