//! Client configuration
//!
//! Keys:
//! - `GECKO_API_URL`: base URL of the REST API (default `http://localhost:3001/api`)
//! - `GECKO_SERVER_URL`: origin serving uploaded photos (default: API URL without `/api`)
//! - `GECKO_REQUEST_TIMEOUT_SECS`: request timeout on native targets (default 10)

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_URL_KEY: &str = "GECKO_API_URL";
pub const SERVER_URL_KEY: &str = "GECKO_SERVER_URL";
pub const TIMEOUT_KEY: &str = "GECKO_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub server_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    /// Config for `api_url`, deriving the photo server from it
    pub fn with_api_url(api_url: &str) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        Self {
            server_url: server_from_api(&api_url),
            api_url,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from the process environment, reading `.env` first
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Values captured when the browser bundle was compiled
    pub fn from_build_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| {
            match key {
                API_URL_KEY => option_env!("GECKO_API_URL"),
                SERVER_URL_KEY => option_env!("GECKO_SERVER_URL"),
                TIMEOUT_KEY => option_env!("GECKO_REQUEST_TIMEOUT_SECS"),
                _ => None,
            }
            .map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let present = |key| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = match present(API_URL_KEY) {
            Some(url) => Self::with_api_url(&url),
            None => Self::default(),
        };
        if let Some(server) = present(SERVER_URL_KEY) {
            config.server_url = server.trim_end_matches('/').to_string();
        }
        if let Some(secs) = present(TIMEOUT_KEY) {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ApiError::InvalidInput(format!("{TIMEOUT_KEY} must be a whole number of seconds")))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Resolve a stored photo path; absolute URLs pass through
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.server_url, path)
        } else {
            format!("{}/{}", self.server_url, path)
        }
    }
}

fn server_from_api(api_url: &str) -> String {
    api_url.strip_suffix("/api").unwrap_or(api_url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_points_at_dev_server() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:3001/api");
        assert_eq!(config.server_url, "http://localhost:3001");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.endpoint("/racks"), "http://localhost:3001/api/racks");
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_KEY, "https://geckos.example.com/api/"),
            (TIMEOUT_KEY, "30"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://geckos.example.com/api");
        assert_eq!(config.server_url, "https://geckos.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        let config = ClientConfig::from_lookup(lookup(&[(SERVER_URL_KEY, "https://cdn.example.com")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.server_url, "https://cdn.example.com");
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_KEY, "soon")])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_image_url() {
        let config = ClientConfig::default();
        assert_eq!(
            config.image_url("/uploads/a.jpg"),
            "http://localhost:3001/uploads/a.jpg"
        );
        assert_eq!(config.image_url("uploads/a.jpg"), "http://localhost:3001/uploads/a.jpg");
        assert_eq!(config.image_url("https://img.example.com/a.jpg"), "https://img.example.com/a.jpg");
    }
}
