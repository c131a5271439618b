//! Route lookup.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up the route for a request path
//! - Fall back to the default redirect when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap keyed by the match-mode key
//! - Resolution never fails: no route means redirect

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::matcher::{trailing_slash_canonical, MatchOptions};

/// A registered route: path, view template and controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// URL path, e.g. `/analysis`.
    pub path: String,
    /// Template reference relative to the templates root.
    pub template: String,
    /// Controller identifier.
    pub controller: String,
}

/// Why a path was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No route matched; the default redirect applies.
    Otherwise,
    /// The path only differed from a route by trailing slashes.
    TrailingSlash,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::Otherwise => "otherwise",
            RedirectReason::TrailingSlash => "trailing_slash",
        }
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched(&'a Route),
    Redirect { to: &'a str, reason: RedirectReason },
}

impl<'a> Resolution<'a> {
    /// The matched route, if any.
    pub fn route(&self) -> Option<&'a Route> {
        match *self {
            Resolution::Matched(route) => Some(route),
            Resolution::Redirect { .. } => None,
        }
    }

    /// The redirect target, if any.
    pub fn redirect_target(&self) -> Option<&'a str> {
        match *self {
            Resolution::Matched(_) => None,
            Resolution::Redirect { to, .. } => Some(to),
        }
    }
}

/// Immutable route table produced by [`RouteRegistrar::build`](crate::routing::RouteRegistrar::build).
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
    default_redirect: String,
    options: MatchOptions,
}

impl RouteTable {
    /// Assembles a table. The registrar has already checked every invariant.
    pub(crate) fn new(routes: Vec<Route>, default_redirect: String, options: MatchOptions) -> Self {
        let index = routes
            .iter()
            .enumerate()
            .map(|(i, route)| (options.lookup_key(&route.path).into_owned(), i))
            .collect();

        Self {
            routes,
            index,
            default_redirect,
            options,
        }
    }

    /// Resolve a request path to a route or a redirect.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        if let Some(route) = self.get(path) {
            return Resolution::Matched(route);
        }

        if self.options.trailing_slash_redirect {
            if let Some(route) = trailing_slash_canonical(path).and_then(|p| self.get(p)) {
                return Resolution::Redirect {
                    to: &route.path,
                    reason: RedirectReason::TrailingSlash,
                };
            }
        }

        Resolution::Redirect {
            to: &self.default_redirect,
            reason: RedirectReason::Otherwise,
        }
    }

    /// Exact lookup under the table's match options.
    pub fn get(&self, path: &str) -> Option<&Route> {
        self.index
            .get(self.options.lookup_key(path).as_ref())
            .map(|&i| &self.routes[i])
    }

    /// Routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn default_redirect(&self) -> &str {
        &self.default_redirect
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteRegistrar;

    fn cliniccio_table(options: MatchOptions) -> RouteTable {
        let mut registrar = RouteRegistrar::with_options(options);
        registrar
            .register("/analysis", "partials/analysis.html", "AnalysesCtrl")
            .register("/network", "partials/network.html", "NetworkCtrl")
            .set_default("/network");
        registrar.build().unwrap()
    }

    #[test]
    fn test_analysis_resolves_to_analysis_view() {
        let table = cliniccio_table(MatchOptions::default());
        let route = table.resolve("/analysis").route().unwrap();
        assert_eq!(route.template, "partials/analysis.html");
        assert_eq!(route.controller, "AnalysesCtrl");
    }

    #[test]
    fn test_network_resolves_to_network_view() {
        let table = cliniccio_table(MatchOptions::default());
        let route = table.resolve("/network").route().unwrap();
        assert_eq!(route.template, "partials/network.html");
        assert_eq!(route.controller, "NetworkCtrl");
    }

    #[test]
    fn test_unmatched_paths_redirect_to_network() {
        let table = cliniccio_table(MatchOptions::default());
        for path in ["/", "", "/unknown", "/analysis/", "/Analysis", "/network/x", "/analysisx"] {
            assert_eq!(
                table.resolve(path),
                Resolution::Redirect {
                    to: "/network",
                    reason: RedirectReason::Otherwise
                },
                "path {path:?}"
            );
        }
    }

    #[test]
    fn test_case_insensitive_matching() {
        let table = cliniccio_table(MatchOptions {
            case_insensitive: true,
            ..Default::default()
        });
        let route = table.resolve("/ANALYSIS").route().unwrap();
        assert_eq!(route.path, "/analysis");
        assert_eq!(table.resolve("/Network").route().unwrap().controller, "NetworkCtrl");
    }

    #[test]
    fn test_trailing_slash_redirects_to_canonical_route() {
        let table = cliniccio_table(MatchOptions {
            trailing_slash_redirect: true,
            ..Default::default()
        });
        assert_eq!(
            table.resolve("/analysis/"),
            Resolution::Redirect {
                to: "/analysis",
                reason: RedirectReason::TrailingSlash
            }
        );
        // Unknown paths still use the default
        assert_eq!(table.resolve("/other/").redirect_target(), Some("/network"));
    }

    #[test]
    fn test_routes_keep_registration_order() {
        let table = cliniccio_table(MatchOptions::default());
        let paths: Vec<_> = table.routes().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["/analysis", "/network"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.default_redirect(), "/network");
    }
}
