use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

const DEFAULT_PROVIDER_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Provider credential. Never printed, not even through `Debug`.
#[derive(Clone, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub convert_base_url: String,
    pub codes_base_url: String,
    pub api_host: IpAddr,
    pub api_port: u16,
    pub static_dir: PathBuf,
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            convert_base_url: DEFAULT_PROVIDER_URL.to_string(),
            codes_base_url: DEFAULT_PROVIDER_URL.to_string(),
            api_host: IpAddr::from([0, 0, 0, 0]),
            api_port: 8080,
            static_dir: PathBuf::from("."),
            upstream_timeout: Duration::from_secs(10),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source, falling back to
    /// defaults for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_key = get("EXCHANGE_API_KEY").map(ApiKey::new).unwrap_or_default();

        let convert_base_url = get("EXCHANGE_API_CONVERT_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.convert_base_url);

        let codes_base_url = get("EXCHANGE_API_CODES_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or(defaults.codes_base_url);

        let api_host = match get("API_HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                name: "API_HOST",
                value: raw,
            })?,
            None => defaults.api_host,
        };

        let api_port = match get("API_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "API_PORT",
                value: raw,
            })?,
            None => defaults.api_port,
        };

        let static_dir = get("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => defaults.upstream_timeout,
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            api_key,
            convert_base_url,
            codes_base_url,
            api_host,
            api_port,
            static_dir,
            upstream_timeout,
            log_format,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.convert_base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.codes_base_url, DEFAULT_PROVIDER_URL);
        assert_eq!(config.static_dir, PathBuf::from("."));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.api_key.is_empty());
        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_overrides_and_trims_base_urls() {
        let config = from_pairs(&[
            ("EXCHANGE_API_KEY", "secret"),
            ("EXCHANGE_API_CONVERT_URL", "http://localhost:9000/v6/"),
            ("EXCHANGE_API_CODES_URL", "http://localhost:9001"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("STATIC_DIR", "public"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.api_key.expose(), "secret");
        assert_eq!(config.convert_base_url, "http://localhost:9000/v6");
        assert_eq!(config.codes_base_url, "http://localhost:9001");
        assert_eq!(config.addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_port() {
        let err = from_pairs(&[("API_PORT", "99999")]).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(from_pairs(&[("UPSTREAM_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(from_pairs(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = from_pairs(&[("EXCHANGE_API_KEY", "super-secret-key")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-key"));
        assert!(printed.contains("ApiKey(***)"));
    }
}
