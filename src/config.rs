//! Client configuration resolved at build time.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bundle runs in the browser with no process environment, so the API
//! endpoint is baked in from `SHIPTRACK_API_BASE_URL` when the WASM artifact is
//! compiled. Everything else falls back to constants below.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_CREDENTIAL_COOKIE: &str = "token";

/// Endpoint and storage names shared by the session and request layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash.
    pub base_url: String,
    /// Cookie that carries the bearer token between page loads.
    pub cookie_name: String,
}

impl ClientConfig {
    /// Build config from the compile-time environment.
    ///
    /// Optional:
    /// - `SHIPTRACK_API_BASE_URL`: default `http://localhost:3000`
    pub fn from_build_env() -> Self {
        Self::resolve(option_env!("SHIPTRACK_API_BASE_URL"))
    }

    /// Build config from an optional base URL override.
    pub fn resolve(base_url: Option<&str>) -> Self {
        let base_url = normalize_base_url(
            base_url
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .unwrap_or(DEFAULT_API_BASE_URL),
        );
        Self { base_url, cookie_name: DEFAULT_CREDENTIAL_COOKIE.to_owned() }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim_end_matches('/').to_owned()
}
