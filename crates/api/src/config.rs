//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;

use axum::http::HeaderName;

/// Environment variable holding the listen address.
pub const BIND_ADDR_ENV: &str = "ERPBENCH_BIND_ADDR";

/// Environment variable naming the correlation-id request header.
pub const REQUEST_ID_HEADER_ENV: &str = "ERPBENCH_REQUEST_ID_HEADER";

const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub request_id_header: HeaderName,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_id_header: HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values fall back to the
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(BIND_ADDR_ENV) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "{BIND_ADDR_ENV} is not a socket address; using {}",
                    config.bind_addr
                ),
            }
        }

        if let Some(raw) = lookup(REQUEST_ID_HEADER_ENV) {
            match HeaderName::try_from(raw.trim().to_ascii_lowercase()) {
                Ok(name) => config.request_id_header = name,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "{REQUEST_ID_HEADER_ENV} is not a header name; using {DEFAULT_REQUEST_ID_HEADER}"
                ),
            }
        }

        config
    }
}
