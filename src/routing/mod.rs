//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     RouteConfig[] + OtherwiseConfig
//!     → registrar.rs (register / set_default)
//!     → build(): check paths, duplicates, default target
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path)
//!     → table.rs (route lookup)
//!     → matcher.rs (lookup key for the configured match mode)
//!     → Return: Matched(route) or Redirect(target)
//! ```
//!
//! # Design Decisions
//! - Table built once at startup, immutable at runtime
//! - Exact path match, no patterns or regex in the hot path
//! - Every path resolves: unmatched paths redirect to the default route
//! - The default must name a registered route (no redirect loops)

pub mod matcher;
pub mod registrar;
pub mod table;

pub use matcher::MatchOptions;
pub use registrar::{RouteError, RouteRegistrar};
pub use table::{RedirectReason, Resolution, Route, RouteTable};
