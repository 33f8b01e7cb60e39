//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Compiled-table cache settings.
    pub cache: CacheConfig,

    /// Extra placeholder aliases, merged over the built-in table.
    pub sugar: IndexMap<String, String>,

    /// Top-level routes, registered in order.
    pub routes: Vec<RouteConfig>,

    /// Prefixed route groups, registered after top-level routes.
    pub groups: Vec<GroupConfig>,

    /// Fallback handlers used when nothing matches.
    pub errors: Vec<ErrorConfig>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format of the fmt layer.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Compiled-table cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable loading and saving the compiled table.
    pub enabled: bool,

    /// Cache file path (JSON).
    pub path: Option<String>,

    /// Maximum age of a cached table in seconds.
    pub expire_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            expire_secs: 30,
        }
    }
}

/// A single route definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// HTTP methods; `"*"` registers every supported method.
    #[serde(default = "default_route_methods")]
    pub methods: Vec<String>,

    /// Route template, e.g. `/user/{id:i}[/{tab}]`.
    pub pattern: String,

    /// Opaque handler identifier returned on match.
    pub handler: String,
}

/// Routes sharing a path prefix. Groups nest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupConfig {
    /// Prefix prepended to every template in the group.
    pub prefix: String,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,

    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Fallback handler definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorConfig {
    /// Methods the fallback applies to; `"*"` covers all but PATCH.
    #[serde(default = "default_error_methods")]
    pub methods: Vec<String>,

    pub handler: String,
}

fn default_route_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

fn default_error_methods() -> Vec<String> {
    vec!["*".to_string()]
}
