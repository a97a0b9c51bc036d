//! Fixes and findings produced by the analysis frontend.
//!
//! A [`Finding`] is one reported issue with zero or more candidate [`Fix`]es
//! ordered by preference. The engine never inspects how the frontend resolved
//! source positions; frontends whose positions are resolved late implement
//! [`FixProvider`] and receive the opaque context token back unchanged.

use crate::replacement::Replacement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A bundle of textual replacements plus import additions and removals,
/// proposed as a remedy for one finding. Scoped to a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    #[serde(default)]
    replacements: Vec<Replacement>,
    #[serde(default)]
    imports_to_add: BTreeSet<String>,
    #[serde(default)]
    imports_to_remove: BTreeSet<String>,
}

impl Fix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `[start, end)` with `text`.
    pub fn replace(mut self, start: usize, end: usize, text: impl Into<String>) -> Self {
        self.replacements.push(Replacement::new(start, end, text));
        self
    }

    /// Insert `text` at `offset` without deleting anything.
    pub fn insert(self, offset: usize, text: impl Into<String>) -> Self {
        self.replace(offset, offset, text)
    }

    /// Delete `[start, end)`.
    pub fn delete(self, start: usize, end: usize) -> Self {
        self.replace(start, end, "")
    }

    /// Request that the fully-qualified name be imported.
    pub fn add_import(mut self, name: impl Into<String>) -> Self {
        self.imports_to_add.insert(name.into());
        self
    }

    /// Request that the fully-qualified name's import be dropped.
    pub fn remove_import(mut self, name: impl Into<String>) -> Self {
        self.imports_to_remove.insert(name.into());
        self
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    pub fn imports_to_add(&self) -> &BTreeSet<String> {
        &self.imports_to_add
    }

    pub fn imports_to_remove(&self) -> &BTreeSet<String> {
        &self.imports_to_remove
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
            && self.imports_to_add.is_empty()
            && self.imports_to_remove.is_empty()
    }
}

/// A candidate fix whose replacements are resolved against an opaque
/// position context `P`.
///
/// The engine threads `positions` through unchanged and never looks inside
/// it, so any frontend can substitute its own position model. A fully
/// resolved [`Fix`] is its own provider for every context type.
pub trait FixProvider<P: ?Sized> {
    fn fix(&self, positions: &P) -> Fix;
}

impl<P: ?Sized> FixProvider<P> for Fix {
    fn fix(&self, _positions: &P) -> Fix {
        self.clone()
    }
}

/// One reported issue from the analysis frontend, carrying candidate fixes
/// ordered by preference (most preferred first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    check_name: String,
    #[serde(default)]
    fixes: Vec<Fix>,
}

impl Finding {
    pub fn new(check_name: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            fixes: Vec::new(),
        }
    }

    /// Append a candidate fix; earlier fixes are preferred.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn check_name(&self) -> &str {
        &self.check_name
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    /// The most-preferred candidate, if any.
    pub fn preferred_fix(&self) -> Option<&Fix> {
        self.fixes.first()
    }
}
