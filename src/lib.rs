//! Route table server for the cliniccio application.
//!
//! Maps request paths to view templates and controllers, redirecting
//! everything else to a default route. The table is built once at startup
//! from configuration and never changes afterwards.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod template;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{build_application, Application, Shutdown, StartupError};
pub use routing::{Resolution, Route, RouteRegistrar, RouteTable};
