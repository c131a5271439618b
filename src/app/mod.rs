//! Application module declaration.
//!
//! An application module names the modules it depends on and the
//! controllers its routes use. Both are checked once at startup.

pub mod controller;
pub mod module;

pub use controller::ControllerRegistry;
pub use module::{ModuleError, ModuleGraph};
