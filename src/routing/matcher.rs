//! Path matching rules.
//!
//! # Responsibilities
//! - Decide whether a string is an acceptable route path
//! - Produce the lookup key for a path under the configured match mode
//! - Find the canonical form of a trailing-slash path
//!
//! # Design Decisions
//! - Path matching is case-sensitive unless `case_insensitive` is set
//! - Only ASCII case folding, no Unicode normalization
//! - Query strings never reach the matcher (callers pass `uri.path()`)

use std::borrow::Cow;

use crate::config::RoutingConfig;

/// Options controlling how request paths are compared with route paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Ignore ASCII case when comparing paths.
    pub case_insensitive: bool,
    /// Redirect `"/route/"` to `"/route"` instead of to the default.
    pub trailing_slash_redirect: bool,
}

impl MatchOptions {
    /// Lookup key for `path`.
    ///
    /// Borrows when no folding is needed.
    pub fn lookup_key<'a>(&self, path: &'a str) -> Cow<'a, str> {
        if self.case_insensitive && path.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(path.to_ascii_lowercase())
        } else {
            Cow::Borrowed(path)
        }
    }
}

impl From<&RoutingConfig> for MatchOptions {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            case_insensitive: config.case_insensitive,
            trailing_slash_redirect: config.trailing_slash_redirect,
        }
    }
}

/// Returns true if `path` can be registered as a route or used as a redirect target.
///
/// A valid path is non-empty, starts with `/`, and carries no query,
/// fragment, whitespace or control characters.
pub fn is_valid_path(path: &str) -> bool {
    path.starts_with('/')
        && !path
            .chars()
            .any(|c| c == '?' || c == '#' || c.is_whitespace() || c.is_control())
}

/// Strips trailing slashes from `path`.
///
/// Returns `None` when there is nothing to strip or when only `/` would remain.
pub fn trailing_slash_canonical(path: &str) -> Option<&str> {
    if !path.ends_with('/') {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
