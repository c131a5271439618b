//! Application module dependency graph.
//!
//! # Responsibilities
//! - Resolve the modules required by the application, transitively
//! - Reject unknown modules and dependency cycles
//! - Produce a load order with dependencies before dependents
//!
//! # Design Decisions
//! - Depth-first traversal in declaration order, so the load order is stable
//! - Declared modules that nothing requires are left out of the load order
//! - The application module is always last

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ModuleConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("module {module:?} required by {required_by:?} is not declared")]
    Unknown { module: String, required_by: String },

    #[error("module {0:?} is declared more than once")]
    Duplicate(String),

    #[error("module dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Resolved module graph for one application module.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    app: String,
    requires: HashMap<String, Vec<String>>,
    load_order: Vec<String>,
}

impl ModuleGraph {
    /// Resolve `app` and everything it requires against `modules`.
    pub fn new(
        app: &str,
        app_requires: &[String],
        modules: &[ModuleConfig],
    ) -> Result<Self, ModuleError> {
        let mut requires: HashMap<String, Vec<String>> = HashMap::with_capacity(modules.len() + 1);
        requires.insert(app.to_string(), app_requires.to_vec());
        for module in modules {
            if requires
                .insert(module.name.clone(), module.requires.clone())
                .is_some()
            {
                return Err(ModuleError::Duplicate(module.name.clone()));
            }
        }

        let mut marks = HashMap::new();
        let mut stack = Vec::new();
        let mut load_order = Vec::new();
        visit(app, app, &requires, &mut marks, &mut stack, &mut load_order)?;

        tracing::debug!(app = %app, modules = ?load_order, "Module graph resolved");

        Ok(Self {
            app: app.to_string(),
            requires,
            load_order,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app
    }

    /// Modules in load order; the application module comes last.
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }

    /// Direct dependencies of `module`, if it is declared.
    pub fn requires_of(&self, module: &str) -> Option<&[String]> {
        self.requires.get(module).map(Vec::as_slice)
    }
}

fn visit(
    name: &str,
    required_by: &str,
    requires: &HashMap<String, Vec<String>>,
    marks: &mut HashMap<String, Mark>,
    stack: &mut Vec<String>,
    load_order: &mut Vec<String>,
) -> Result<(), ModuleError> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|m| m == name).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(name.to_string());
            return Err(ModuleError::Cycle(cycle));
        }
        None => {}
    }

    let deps = requires.get(name).ok_or_else(|| ModuleError::Unknown {
        module: name.to_string(),
        required_by: required_by.to_string(),
    })?;

    marks.insert(name.to_string(), Mark::Visiting);
    stack.push(name.to_string());
    for dep in deps {
        visit(dep, name, requires, marks, stack, load_order)?;
    }
    stack.pop();
    marks.insert(name.to_string(), Mark::Done);
    load_order.push(name.to_string());
    Ok(())
}
