//! An ordered collection of non-overlapping replacements for one file.

use crate::replacement::Replacement;
use std::collections::BTreeMap;
use std::ops::Bound;
use thiserror::Error;

/// Two distinct replacements whose ranges overlap.
///
/// Carries both edits and, when known, the name of the check that
/// contributed each, so a failed file can be reported precisely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "replacement [{}..{}) (from {}) overlaps existing [{}..{}) (from {})",
    .incoming.start(),
    .incoming.end(),
    .incoming_origin.as_deref().unwrap_or("unknown"),
    .existing.start(),
    .existing.end(),
    .existing_origin.as_deref().unwrap_or("unknown")
)]
pub struct Conflict {
    /// The member already in the set.
    pub existing: Replacement,
    /// Check that contributed the existing member, if known.
    pub existing_origin: Option<String>,
    /// The replacement whose insertion was rejected.
    pub incoming: Replacement,
    /// Check that contributed the rejected replacement, if known.
    pub incoming_origin: Option<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    replacement: Replacement,
    origin: Option<String>,
}

/// The set of replacements accumulated for one file, ordered by start offset.
///
/// Invariant: no two distinct members overlap. Adding an exact duplicate is a
/// no-op; adding a genuinely overlapping replacement fails with [`Conflict`]
/// rather than being dropped or merged.
#[derive(Debug, Clone, Default)]
pub struct ReplacementSet {
    entries: BTreeMap<(usize, usize), Entry>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a replacement with no recorded origin.
    pub fn add(&mut self, replacement: Replacement) -> Result<(), Conflict> {
        self.add_from(replacement, None)
    }

    /// Insert a replacement contributed by the named check.
    pub fn add_from(
        &mut self,
        replacement: Replacement,
        origin: Option<&str>,
    ) -> Result<(), Conflict> {
        let key = (replacement.start(), replacement.end());
        if let Some(existing) = self.entries.get(&key) {
            if existing.replacement == replacement {
                // Exact duplicate, tolerated.
                return Ok(());
            }
            return Err(Conflict {
                existing: existing.replacement.clone(),
                existing_origin: existing.origin.clone(),
                incoming: replacement,
                incoming_origin: origin.map(str::to_string),
            });
        }

        // Members are pairwise disjoint, so only the incoming range's
        // nearest neighbors can overlap it: the last member starting at or
        // before it (which may extend across it) and the first member
        // starting after it (anything past that starts even later).
        let below = self
            .entries
            .range(..=(replacement.start(), usize::MAX))
            .next_back();
        let above = self
            .entries
            .range((
                Bound::Excluded((replacement.start(), usize::MAX)),
                Bound::Unbounded,
            ))
            .next();
        for (_, entry) in below.into_iter().chain(above) {
            if replacement.conflicts_with(&entry.replacement) {
                return Err(Conflict {
                    existing: entry.replacement.clone(),
                    existing_origin: entry.origin.clone(),
                    incoming: replacement,
                    incoming_origin: origin.map(str::to_string),
                });
            }
        }

        self.entries.insert(
            key,
            Entry {
                replacement,
                origin: origin.map(str::to_string),
            },
        );
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Members in ascending start-offset order (ties by end offset).
    pub fn iter(&self) -> impl Iterator<Item = &Replacement> {
        self.entries.values().map(|e| &e.replacement)
    }

    /// Members sorted by descending start offset.
    ///
    /// Applying edits from the end of the file toward the beginning keeps
    /// every recorded offset valid against the original text: an edit never
    /// shifts the offsets of the edits still to be applied.
    pub fn descending(&self) -> impl Iterator<Item = &Replacement> {
        self.entries.values().rev().map(|e| &e.replacement)
    }
}
