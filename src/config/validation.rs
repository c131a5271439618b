//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes reference known controllers,
//!   the default redirect names a route, required modules are declared)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate and reserved paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Module cycles are left to `app::ModuleGraph`, which reports the cycle path

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::http::HEALTH_PATH;
use crate::routing::matcher::{is_valid_path, MatchOptions};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("app.name must not be empty")]
    EmptyAppName,

    #[error("at least one route is required")]
    NoRoutes,

    #[error("route path {0:?} must start with '/' and carry no query or fragment")]
    InvalidRoutePath(String),

    #[error("route path {0:?} is defined more than once")]
    DuplicateRoute(String),

    #[error("route path {0:?} is reserved by the server")]
    ReservedPath(String),

    #[error("route {0:?} has an empty template reference")]
    EmptyTemplate(String),

    #[error("route {path:?} references unknown controller {controller:?}")]
    UnknownController { path: String, controller: String },

    #[error("controller {0:?} is declared more than once")]
    DuplicateController(String),

    #[error("otherwise.redirect_to {0:?} is not a valid path")]
    InvalidRedirect(String),

    #[error("otherwise.redirect_to {0:?} does not name a configured route")]
    UnresolvedRedirect(String),

    #[error("module {0:?} is declared more than once")]
    DuplicateModule(String),

    #[error("module {module:?} required by {required_by:?} is not declared")]
    UnknownModule { module: String, required_by: String },

    #[error("manifest.path {0:?} is not a valid path")]
    InvalidManifestPath(String),

    #[error("observability.log_level {0:?} is not a log level")]
    InvalidLogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_listener(config, &mut errors);
    validate_routes(config, &mut errors);
    validate_modules(config, &mut errors);
    validate_observability(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_listener(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
}

fn validate_routes(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let options = MatchOptions::from(&config.routing);

    let mut controllers = HashSet::new();
    for name in &config.controllers {
        if !controllers.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateController(name.clone()));
        }
    }

    let health_key = options.lookup_key(HEALTH_PATH).into_owned();
    let mut reserved = vec![health_key.clone()];
    if config.manifest.enabled {
        let manifest_path = &config.manifest.path;
        if !is_valid_path(manifest_path) || manifest_path.contains(['{', '}', '*', ':']) {
            errors.push(ValidationError::InvalidManifestPath(manifest_path.clone()));
        } else if options.lookup_key(manifest_path) == health_key.as_str() {
            // Both handlers would be mounted on the same path
            errors.push(ValidationError::ReservedPath(manifest_path.clone()));
        } else {
            reserved.push(options.lookup_key(manifest_path).into_owned());
        }
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut paths = HashSet::new();
    for route in &config.routes {
        if !is_valid_path(&route.path) {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
            continue;
        }
        let key = options.lookup_key(&route.path).into_owned();
        if reserved.contains(&key) {
            errors.push(ValidationError::ReservedPath(route.path.clone()));
        }
        if !paths.insert(key) {
            errors.push(ValidationError::DuplicateRoute(route.path.clone()));
        }
        if route.template.trim().is_empty() {
            errors.push(ValidationError::EmptyTemplate(route.path.clone()));
        }
        if !controllers.contains(route.controller.as_str()) {
            errors.push(ValidationError::UnknownController {
                path: route.path.clone(),
                controller: route.controller.clone(),
            });
        }
    }

    let redirect_to = &config.otherwise.redirect_to;
    if !is_valid_path(redirect_to) {
        errors.push(ValidationError::InvalidRedirect(redirect_to.clone()));
    } else if !paths.contains(options.lookup_key(redirect_to).as_ref()) {
        errors.push(ValidationError::UnresolvedRedirect(redirect_to.clone()));
    }
}

fn validate_modules(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    if config.app.name.trim().is_empty() {
        errors.push(ValidationError::EmptyAppName);
    }

    let mut declared = HashSet::new();
    declared.insert(config.app.name.as_str());
    for module in &config.modules {
        if !declared.insert(module.name.as_str()) {
            errors.push(ValidationError::DuplicateModule(module.name.clone()));
        }
    }

    let requirements = std::iter::once((&config.app.name, &config.app.requires))
        .chain(config.modules.iter().map(|m| (&m.name, &m.requires)));
    for (owner, requires) in requirements {
        for module in requires {
            if !declared.contains(module.as_str()) {
                errors.push(ValidationError::UnknownModule {
                    module: module.clone(),
                    required_by: owner.clone(),
                });
            }
        }
    }
}

fn validate_observability(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let observability = &config.observability;
    if observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }
}
