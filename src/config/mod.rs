//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/mob-acesso/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream service endpoints
    #[serde(default)]
    pub services: ServicesConfig,

    /// Forward search behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Routing behaviour
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Reverse geocoding behaviour
    #[serde(default)]
    pub reverse: ReverseConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// OSRM base URL
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// User-Agent header for geocoding requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Routing request timeout in milliseconds
    #[serde(default = "default_route_timeout_ms")]
    pub route_timeout_ms: u64,
}

/// Forward search behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results requested per search
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// Shorter queries return nothing without a network call
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Viewbox half-width in degrees
    #[serde(default = "default_viewbox_degrees")]
    pub viewbox_degrees: f64,

    /// Cache freshness window in seconds
    #[serde(default = "default_search_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Minimum spacing between geocoding requests in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

/// Routing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Cache freshness window in seconds
    #[serde(default = "default_route_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Simplification tolerance in degrees
    #[serde(default = "default_simplify_tolerance")]
    pub simplify_tolerance: f64,
}

/// Reverse geocoding behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseConfig {
    /// Returned instead of an address when the lookup fails
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
}

/// Location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, searches without a location are biased to the initial map region
    #[serde(default)]
    pub default_bias: bool,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_osrm_url() -> String {
    DEFAULT_OSRM_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_route_timeout_ms() -> u64 {
    DEFAULT_ROUTE_TIMEOUT_MS
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_viewbox_degrees() -> f64 {
    DEFAULT_VIEWBOX_DEGREES
}
fn default_search_cache_ttl() -> u64 {
    DEFAULT_SEARCH_CACHE_TTL_SECS
}
fn default_min_interval_ms() -> u64 {
    DEFAULT_MIN_INTERVAL_MS
}
fn default_route_cache_ttl() -> u64 {
    DEFAULT_ROUTE_CACHE_TTL_SECS
}
fn default_simplify_tolerance() -> f64 {
    DEFAULT_SIMPLIFY_TOLERANCE
}
fn default_fallback_label() -> String {
    DEFAULT_FALLBACK_LABEL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            osrm_url: default_osrm_url(),
            user_agent: default_user_agent(),
            route_timeout_ms: default_route_timeout_ms(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
            min_query_chars: default_min_query_chars(),
            viewbox_degrees: default_viewbox_degrees(),
            cache_ttl_secs: default_search_cache_ttl(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_route_cache_ttl(),
            simplify_tolerance: default_simplify_tolerance(),
        }
    }
}

impl Default for ReverseConfig {
    fn default() -> Self {
        Self {
            fallback_label: default_fallback_label(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Parse a config value, naming the key on failure
fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "nominatim_url"] => Some(self.services.nominatim_url.clone()),
            ["services", "osrm_url"] => Some(self.services.osrm_url.clone()),
            ["services", "user_agent"] => Some(self.services.user_agent.clone()),
            ["services", "route_timeout_ms"] => Some(self.services.route_timeout_ms.to_string()),

            ["search", "limit"] => Some(self.search.limit.to_string()),
            ["search", "min_query_chars"] => Some(self.search.min_query_chars.to_string()),
            ["search", "viewbox_degrees"] => Some(self.search.viewbox_degrees.to_string()),
            ["search", "cache_ttl_secs"] => Some(self.search.cache_ttl_secs.to_string()),
            ["search", "min_interval_ms"] => Some(self.search.min_interval_ms.to_string()),

            ["routing", "cache_ttl_secs"] => Some(self.routing.cache_ttl_secs.to_string()),
            ["routing", "simplify_tolerance"] => Some(self.routing.simplify_tolerance.to_string()),

            ["reverse", "fallback_label"] => Some(self.reverse.fallback_label.clone()),

            ["location", "default_bias"] => Some(self.location.default_bias.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["services", "nominatim_url"] => self.services.nominatim_url = value.to_string(),
            ["services", "osrm_url"] => self.services.osrm_url = value.to_string(),
            ["services", "user_agent"] => self.services.user_agent = value.to_string(),
            ["services", "route_timeout_ms"] => {
                self.services.route_timeout_ms = parse_value(key, value)?
            }

            ["search", "limit"] => self.search.limit = parse_value(key, value)?,
            ["search", "min_query_chars"] => self.search.min_query_chars = parse_value(key, value)?,
            ["search", "viewbox_degrees"] => self.search.viewbox_degrees = parse_value(key, value)?,
            ["search", "cache_ttl_secs"] => self.search.cache_ttl_secs = parse_value(key, value)?,
            ["search", "min_interval_ms"] => self.search.min_interval_ms = parse_value(key, value)?,

            ["routing", "cache_ttl_secs"] => self.routing.cache_ttl_secs = parse_value(key, value)?,
            ["routing", "simplify_tolerance"] => {
                self.routing.simplify_tolerance = parse_value(key, value)?
            }

            ["reverse", "fallback_label"] => self.reverse.fallback_label = value.to_string(),

            ["location", "default_bias"] => self.location.default_bias = parse_value(key, value)?,

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "services.nominatim_url",
            "services.osrm_url",
            "services.user_agent",
            "services.route_timeout_ms",
            "search.limit",
            "search.min_query_chars",
            "search.viewbox_degrees",
            "search.cache_ttl_secs",
            "search.min_interval_ms",
            "routing.cache_ttl_secs",
            "routing.simplify_tolerance",
            "reverse.fallback_label",
            "location.default_bias",
            "server.host",
            "server.port",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
