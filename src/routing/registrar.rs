//! Route registration.
//!
//! The registrar collects routes and the default redirect during startup.
//! `build()` is the only transition out of the unconfigured state: it checks
//! the invariants and freezes everything into a [`RouteTable`].

use std::collections::HashSet;

use thiserror::Error;

use crate::routing::matcher::{is_valid_path, MatchOptions};
use crate::routing::table::{Route, RouteTable};

/// Errors detected when building a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no default redirect configured")]
    MissingDefault,

    #[error("route path {0:?} registered more than once")]
    DuplicatePath(String),

    #[error("invalid route path {0:?}: must start with '/' and carry no query or fragment")]
    InvalidPath(String),

    #[error("default redirect {0:?} does not name a registered route")]
    UnresolvedRedirect(String),
}

/// Collects route registrations before the table is frozen.
#[derive(Debug, Default)]
pub struct RouteRegistrar {
    routes: Vec<Route>,
    default_redirect: Option<String>,
    options: MatchOptions,
}

impl RouteRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Register a route mapping `path` to a template and controller.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        template: impl Into<String>,
        controller: impl Into<String>,
    ) -> &mut Self {
        let route = Route {
            path: path.into(),
            template: template.into(),
            controller: controller.into(),
        };
        tracing::debug!(
            path = %route.path,
            template = %route.template,
            controller = %route.controller,
            "Route registered"
        );
        self.routes.push(route);
        self
    }

    /// Set the redirect applied when no route matches.
    ///
    /// Calling this again replaces the previous target.
    pub fn set_default(&mut self, redirect_to: impl Into<String>) -> &mut Self {
        let redirect_to = redirect_to.into();
        if let Some(previous) = &self.default_redirect {
            tracing::debug!(previous = %previous, redirect_to = %redirect_to, "Default redirect replaced");
        }
        self.default_redirect = Some(redirect_to);
        self
    }

    /// Check invariants and freeze the table.
    pub fn build(self) -> Result<RouteTable, RouteError> {
        let mut seen = HashSet::with_capacity(self.routes.len());
        for route in &self.routes {
            if !is_valid_path(&route.path) {
                return Err(RouteError::InvalidPath(route.path.clone()));
            }
            if !seen.insert(self.options.lookup_key(&route.path).into_owned()) {
                return Err(RouteError::DuplicatePath(route.path.clone()));
            }
        }

        let default_redirect = self.default_redirect.ok_or(RouteError::MissingDefault)?;
        if !is_valid_path(&default_redirect) {
            return Err(RouteError::InvalidPath(default_redirect));
        }
        if !seen.contains(self.options.lookup_key(&default_redirect).as_ref()) {
            return Err(RouteError::UnresolvedRedirect(default_redirect));
        }

        tracing::info!(
            routes = self.routes.len(),
            default_redirect = %default_redirect,
            "Route table built"
        );

        Ok(RouteTable::new(self.routes, default_redirect, self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_default() {
        let mut registrar = RouteRegistrar::new();
        registrar.register("/network", "partials/network.html", "NetworkCtrl");
        assert_eq!(registrar.build().unwrap_err(), RouteError::MissingDefault);
    }

    #[test]
    fn test_build_rejects_duplicate_paths() {
        let mut registrar = RouteRegistrar::new();
        registrar
            .register("/network", "partials/network.html", "NetworkCtrl")
            .register("/network", "partials/other.html", "OtherCtrl")
            .set_default("/network");
        assert_eq!(
            registrar.build().unwrap_err(),
            RouteError::DuplicatePath("/network".into())
        );
    }

    #[test]
    fn test_duplicates_follow_case_mode() {
        let mut sensitive = RouteRegistrar::new();
        sensitive
            .register("/Network", "a.html", "A")
            .register("/network", "b.html", "B")
            .set_default("/network");
        assert!(sensitive.build().is_ok());

        let mut insensitive = RouteRegistrar::with_options(MatchOptions {
            case_insensitive: true,
            ..Default::default()
        });
        insensitive
            .register("/Network", "a.html", "A")
            .register("/network", "b.html", "B")
            .set_default("/network");
        assert_eq!(
            insensitive.build().unwrap_err(),
            RouteError::DuplicatePath("/network".into())
        );
    }

    #[test]
    fn test_build_rejects_invalid_paths() {
        let mut registrar = RouteRegistrar::new();
        registrar
            .register("network", "partials/network.html", "NetworkCtrl")
            .set_default("/network");
        assert_eq!(
            registrar.build().unwrap_err(),
            RouteError::InvalidPath("network".into())
        );

        let mut registrar = RouteRegistrar::new();
        registrar
            .register("/network", "partials/network.html", "NetworkCtrl")
            .set_default("");
        assert_eq!(registrar.build().unwrap_err(), RouteError::InvalidPath(String::new()));
    }

    #[test]
    fn test_build_rejects_redirect_to_unknown_route() {
        let mut registrar = RouteRegistrar::new();
        registrar
            .register("/analysis", "partials/analysis.html", "AnalysesCtrl")
            .set_default("/network");
        assert_eq!(
            registrar.build().unwrap_err(),
            RouteError::UnresolvedRedirect("/network".into())
        );
    }

    #[test]
    fn test_set_default_replaces_previous() {
        let mut registrar = RouteRegistrar::new();
        registrar
            .register("/analysis", "partials/analysis.html", "AnalysesCtrl")
            .register("/network", "partials/network.html", "NetworkCtrl")
            .set_default("/analysis")
            .set_default("/network");
        let table = registrar.build().unwrap();
        assert_eq!(table.default_redirect(), "/network");
    }
}
