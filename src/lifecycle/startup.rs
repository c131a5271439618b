//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the controller registry and module graph from config
//! - Register routes and freeze the route table
//! - Load every referenced template
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The result is immutable and shared via `Arc`

use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::app::{ControllerRegistry, ModuleError, ModuleGraph};
use crate::config::{AppConfig, ConfigError};
use crate::routing::{MatchOptions, RouteError, RouteRegistrar, RouteTable};
use crate::template::{TemplateError, TemplateStore};

/// Any error that prevents the application from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("route {path:?} references unknown controller {controller:?}")]
    UnknownController { path: String, controller: String },

    #[error("template {0:?} is referenced by a route but was not provided")]
    MissingTemplate(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the server needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Application {
    pub routes: Arc<RouteTable>,
    pub controllers: Arc<ControllerRegistry>,
    pub modules: Arc<ModuleGraph>,
    pub templates: Arc<TemplateStore>,
}

impl Application {
    /// Plain-text listing of the module graph, controllers and routes.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "app {}", self.modules.app_name());
        let _ = writeln!(out, "modules {}", self.modules.load_order().join(" -> "));
        for module in self.modules.load_order() {
            match self.modules.requires_of(module) {
                Some(requires) if !requires.is_empty() => {
                    let _ = writeln!(out, "  {module} requires {}", requires.join(", "));
                }
                _ => {}
            }
        }
        let _ = writeln!(
            out,
            "controllers {}",
            self.controllers.names().collect::<Vec<_>>().join(", ")
        );
        for route in self.routes.routes() {
            let _ = writeln!(out, "{} => {} ({})", route.path, route.template, route.controller);
        }
        let _ = writeln!(out, "otherwise => {}", self.routes.default_redirect());
        out
    }
}

/// Build the application, loading templates from `app.templates_dir`.
pub fn build_application(config: &AppConfig) -> Result<Application, StartupError> {
    let root = Path::new(&config.app.templates_dir);
    let templates = TemplateStore::load(root, config.routes.iter().map(|r| r.template.as_str()))?;
    build_application_with_templates(config, templates)
}

/// Build the application with an already populated template store.
///
/// Every template referenced by a route must be present in `templates`.
pub fn build_application_with_templates(
    config: &AppConfig,
    templates: TemplateStore,
) -> Result<Application, StartupError> {
    let controllers = ControllerRegistry::from_names(config.controllers.iter().cloned());
    let modules = ModuleGraph::new(&config.app.name, &config.app.requires, &config.modules)?;

    let mut registrar = RouteRegistrar::with_options(MatchOptions::from(&config.routing));
    for route in &config.routes {
        if !controllers.contains(&route.controller) {
            return Err(StartupError::UnknownController {
                path: route.path.clone(),
                controller: route.controller.clone(),
            });
        }
        if !templates.contains(&route.template) {
            return Err(StartupError::MissingTemplate(route.template.clone()));
        }
        registrar.register(&route.path, &route.template, &route.controller);
    }
    registrar.set_default(&config.otherwise.redirect_to);
    let routes = registrar.build()?;

    tracing::info!(
        app = %modules.app_name(),
        modules = modules.load_order().len(),
        routes = routes.len(),
        controllers = controllers.len(),
        default_redirect = %routes.default_redirect(),
        "Application configured"
    );

    Ok(Application {
        routes: Arc::new(routes),
        controllers: Arc::new(controllers),
        modules: Arc::new(modules),
        templates: Arc::new(templates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;

    fn cliniccio_templates() -> TemplateStore {
        TemplateStore::from_entries([
            ("partials/analysis.html", "<div>analysis</div>"),
            ("partials/network.html", "<div>network</div>"),
        ])
    }

    #[test]
    fn test_default_config_builds() {
        let app = build_application_with_templates(&AppConfig::default(), cliniccio_templates()).unwrap();
        assert_eq!(app.routes.len(), 2);
        assert_eq!(app.routes.default_redirect(), "/network");
        assert_eq!(app.modules.load_order().last().map(String::as_str), Some("cliniccio"));
        assert!(app.controllers.contains("AnalysesCtrl"));
    }

    #[test]
    fn test_unknown_controller_is_fatal() {
        let mut config = AppConfig::default();
        config.routes[0].controller = "MissingCtrl".into();
        let err = build_application_with_templates(&config, cliniccio_templates()).unwrap_err();
        assert!(matches!(
            err,
            StartupError::UnknownController { ref controller, .. } if controller == "MissingCtrl"
        ));
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let mut config = AppConfig::default();
        config.controllers.push("GraphCtrl".into());
        config.routes.push(RouteConfig::new("/graph", "partials/graph.html", "GraphCtrl"));
        let err = build_application_with_templates(&config, cliniccio_templates()).unwrap_err();
        assert!(matches!(err, StartupError::MissingTemplate(ref t) if t == "partials/graph.html"));
    }

    #[test]
    fn test_route_errors_propagate() {
        let mut config = AppConfig::default();
        config.otherwise.redirect_to = "/elsewhere".into();
        let err = build_application_with_templates(&config, cliniccio_templates()).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Route(RouteError::UnresolvedRedirect(_))
        ));
    }

    #[test]
    fn test_module_errors_propagate() {
        let mut config = AppConfig::default();
        config.app.requires.push("ui.router".into());
        let err = build_application_with_templates(&config, cliniccio_templates()).unwrap_err();
        assert!(matches!(err, StartupError::Module(ModuleError::Unknown { .. })));
    }

    #[test]
    fn test_summary_lists_cliniccio_table() {
        let app = build_application_with_templates(&AppConfig::default(), cliniccio_templates()).unwrap();
        let expected = "\
app cliniccio
modules cliniccio.filters -> cliniccio.services -> cliniccio.directives -> ngGrid -> $strap.directives -> cliniccio
  cliniccio requires cliniccio.filters, cliniccio.services, cliniccio.directives, ngGrid, $strap.directives
controllers AnalysesCtrl, NetworkCtrl
/analysis => partials/analysis.html (AnalysesCtrl)
/network => partials/network.html (NetworkCtrl)
otherwise => /network
";
        assert_eq!(app.summary(), expected);
    }

    #[test]
    fn test_shipped_templates_load() {
        let mut config = AppConfig::default();
        config.app.templates_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/app").into();
        let app = build_application(&config).unwrap();
        assert_eq!(app.templates.len(), 2);
        assert!(app.templates.contains("partials/network.html"));
    }

    #[test]
    fn test_missing_templates_dir() {
        let mut config = AppConfig::default();
        config.app.templates_dir = "/nonexistent/cliniccio".into();
        let err = build_application(&config).unwrap_err();
        assert!(matches!(err, StartupError::Template(TemplateError::Read { .. })));
    }
}
