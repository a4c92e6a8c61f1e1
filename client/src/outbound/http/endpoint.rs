//! Backend base URL resolution.
//!
//! An explicit base URL always wins. Otherwise the page origin decides: local
//! development origins talk to the backend on port 8080, anything else is a
//! same-origin deployment served from the origin root.

use mockable::Env;
use tracing::debug;
use url::Url;

/// Environment variable carrying the origin the viewer was served from.
pub const ORIGIN_ENV: &str = "TRUCK_VIEWER_ORIGIN";

const LOCAL_BACKEND: &str = "http://localhost:8080/";
const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Failures while resolving the backend base URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    /// The explicit base URL could not be parsed.
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Rejected value.
        value: String,
        /// Parser message.
        reason: String,
    },
    /// The URL cannot carry a path, e.g. `mailto:`.
    #[error("API base URL '{value}' cannot be used as a base")]
    NotABase {
        /// Rejected value.
        value: String,
    },
}

/// Resolve the backend base URL from an explicit setting or the origin
/// indicator in `env`.
///
/// # Examples
///
/// ```rust
/// use client::outbound::http::resolve_api_base;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(|_| Some("https://trucks.example.com/app".to_owned()));
///
/// let base = resolve_api_base(None, &env)?;
/// assert_eq!(base.as_str(), "https://trucks.example.com/");
/// # Ok::<(), client::outbound::http::EndpointError>(())
/// ```
///
/// # Errors
///
/// Returns [`EndpointError`] when the explicit base URL is unusable.
pub fn resolve_api_base<E: Env>(explicit: Option<&str>, env: &E) -> Result<Url, EndpointError> {
    if let Some(value) = explicit {
        return parse_explicit(value);
    }
    let origin = env.string(ORIGIN_ENV);
    let base = select_api_base(origin.as_deref())?;
    debug!(origin = ?origin, base = %base, "resolved API base from origin");
    Ok(base)
}

/// Pick the backend base for an origin; `None` behaves like local development.
///
/// # Errors
///
/// Returns [`EndpointError`] only if the built-in local backend URL is
/// unusable.
pub fn select_api_base(origin: Option<&str>) -> Result<Url, EndpointError> {
    let parsed = origin.and_then(|value| Url::parse(value.trim()).ok());
    match parsed {
        Some(mut root) if !is_local(&root) && !root.cannot_be_a_base() => {
            root.set_path("/");
            root.set_query(None);
            root.set_fragment(None);
            Ok(root)
        }
        _ => parse_explicit(LOCAL_BACKEND),
    }
}

fn is_local(url: &Url) -> bool {
    url.host_str()
        .is_none_or(|host| LOCAL_HOSTS.contains(&host))
}

fn parse_explicit(value: &str) -> Result<Url, EndpointError> {
    let mut url = Url::parse(value.trim()).map_err(|error| EndpointError::InvalidBaseUrl {
        value: value.to_owned(),
        reason: error.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(EndpointError::NotABase {
            value: value.to_owned(),
        });
    }
    // `Url::join` replaces the last segment unless the path ends with '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
