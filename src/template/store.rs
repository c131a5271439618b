//! In-memory template store.
//!
//! # Responsibilities
//! - Read every referenced template from the templates root at startup
//! - Reject references that would escape the root
//! - Serve template bodies without touching the filesystem per request
//!
//! # Design Decisions
//! - Missing or unreadable templates are startup-fatal
//! - Bodies are stored as `Bytes`, so each response clones a refcount
//! - References are relative paths made only of normal components

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template reference {0:?} must be a relative path inside the templates root")]
    OutsideRoot(String),

    #[error("failed to read template {reference:?} from {path}: {source}")]
    Read {
        reference: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable map from template reference to template body.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Bytes>,
}

impl TemplateStore {
    /// Load each reference relative to `root`.
    pub fn load<I, S>(root: &Path, references: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut templates = HashMap::new();
        for reference in references {
            let reference = reference.as_ref();
            if templates.contains_key(reference) {
                continue;
            }
            if !is_contained(reference) {
                return Err(TemplateError::OutsideRoot(reference.to_string()));
            }

            let path = root.join(reference);
            let body = fs::read(&path).map_err(|source| TemplateError::Read {
                reference: reference.to_string(),
                path: path.clone(),
                source,
            })?;

            tracing::debug!(template = %reference, path = ?path, bytes = body.len(), "Template loaded");
            templates.insert(reference.to_string(), Bytes::from(body));
        }

        tracing::info!(root = ?root, templates = templates.len(), "Templates loaded");
        Ok(Self { templates })
    }

    /// Build a store from in-memory bodies.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        Self {
            templates: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, reference: &str) -> Option<&Bytes> {
        self.templates.get(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.templates.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn is_contained(reference: &str) -> bool {
    let path = Path::new(reference);
    !reference.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}
