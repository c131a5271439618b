//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the route
//! server. All types derive Serde traits for deserialization from config files.
//! The defaults describe the cliniccio application: two views and a redirect
//! to `/network`.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Application module declaration.
    pub app: AppModuleConfig,

    /// Modules the application may depend on.
    pub modules: Vec<ModuleConfig>,

    /// Known controller identifiers.
    pub controllers: Vec<String>,

    /// Route definitions mapping paths to views.
    pub routes: Vec<RouteConfig>,

    /// Redirect applied when no route matches.
    pub otherwise: OtherwiseConfig,

    /// Path matching options.
    pub routing: RoutingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route manifest endpoint.
    pub manifest: ManifestConfig,

    pub security: SecurityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            app: AppModuleConfig::default(),
            modules: [
                "cliniccio.filters",
                "cliniccio.services",
                "cliniccio.directives",
                "ngGrid",
                "$strap.directives",
            ]
            .into_iter()
            .map(ModuleConfig::leaf)
            .collect(),
            controllers: vec!["AnalysesCtrl".to_string(), "NetworkCtrl".to_string()],
            routes: vec![
                RouteConfig::new("/analysis", "partials/analysis.html", "AnalysesCtrl"),
                RouteConfig::new("/network", "partials/network.html", "NetworkCtrl"),
            ],
            otherwise: OtherwiseConfig::default(),
            routing: RoutingConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            manifest: ManifestConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_connections: 1024,
        }
    }
}

/// The application module and its direct dependencies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppModuleConfig {
    /// Application module name.
    pub name: String,

    /// Modules required by the application, in declaration order.
    pub requires: Vec<String>,

    /// Directory template references are resolved against.
    pub templates_dir: String,
}

impl Default for AppModuleConfig {
    fn default() -> Self {
        Self {
            name: "cliniccio".to_string(),
            requires: vec![
                "cliniccio.filters".to_string(),
                "cliniccio.services".to_string(),
                "cliniccio.directives".to_string(),
                "ngGrid".to_string(),
                "$strap.directives".to_string(),
            ],
            templates_dir: "app".to_string(),
        }
    }
}

/// A module that can be required by the application or by other modules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleConfig {
    pub name: String,

    #[serde(default)]
    pub requires: Vec<String>,
}

impl ModuleConfig {
    /// A module with no dependencies of its own.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
        }
    }
}

/// Route configuration mapping a path to a template and controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Request path to match (exact).
    pub path: String,

    /// Template reference, relative to `app.templates_dir`.
    pub template: String,

    /// Controller identifier; must appear in `controllers`.
    pub controller: String,
}

impl RouteConfig {
    pub fn new(
        path: impl Into<String>,
        template: impl Into<String>,
        controller: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
            controller: controller.into(),
        }
    }
}

/// Fallback redirect.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtherwiseConfig {
    /// Target path; must be one of the configured routes.
    pub redirect_to: String,
}

impl Default for OtherwiseConfig {
    fn default() -> Self {
        Self {
            redirect_to: "/network".to_string(),
        }
    }
}

/// Path matching options.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Ignore ASCII case when matching paths.
    pub case_insensitive: bool,

    /// Redirect `/route/` to `/route` rather than to the default.
    pub trailing_slash_redirect: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Route manifest endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub enabled: bool,

    /// Path the manifest is served on.
    pub path: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/_app/manifest".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add `X-Content-Type-Options` and `X-Frame-Options` to responses.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
        }
    }
}
