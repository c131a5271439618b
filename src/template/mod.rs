//! View templates.
//!
//! Templates are opaque bytes: they are loaded once at startup and served
//! as-is. Nothing in this crate interprets them.

pub mod store;

pub use store::{TemplateError, TemplateStore};
