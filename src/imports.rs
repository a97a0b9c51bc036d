//! Canonical rendering of a file's import block.
//!
//! The import section of a file is treated as a single renderable unit: we
//! capture the names already present and the byte span they occupy, merge in
//! requested additions and removals, and render one canonical block that
//! replaces the whole span. Rendering never fails; unknown or malformed names
//! pass through verbatim.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

/// Ordering and formatting policy for the rendered import block.
///
/// This is a style decision, not a correctness requirement of the diff
/// engine, so it is pluggable. Implementations must be deterministic:
/// the same name set always renders the same block.
pub trait ImportOrganizer: fmt::Debug + Send + Sync {
    /// Render the canonical block for the effective import names, one
    /// statement per line with no trailing newline.
    fn organize(&self, names: &BTreeSet<String>) -> String;
}

/// Default organizer: `import name;` lines, with `static `-prefixed names
/// grouped before regular imports, each group sorted alphabetically.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOrganizer;

impl ImportOrganizer for StandardOrganizer {
    fn organize(&self, names: &BTreeSet<String>) -> String {
        // BTreeSet iteration is already sorted, so each partition stays
        // alphabetical.
        let (statics, regular): (Vec<&String>, Vec<&String>) =
            names.iter().partition(|name| name.starts_with("static "));

        let mut lines = Vec::with_capacity(names.len());
        for name in statics.into_iter().chain(regular) {
            lines.push(format!("import {name};"));
        }
        lines.join("\n")
    }
}

/// The import section of one file plus pending additions and removals.
#[derive(Debug)]
pub struct ImportStatements {
    base: BTreeSet<String>,
    span: Range<usize>,
    to_add: BTreeSet<String>,
    to_remove: BTreeSet<String>,
    organizer: Box<dyn ImportOrganizer>,
}

impl ImportStatements {
    /// Capture the file's existing import names and the byte span they
    /// occupy. For a file with no imports, pass the empty span at the
    /// offset where an import block would conventionally be inserted.
    pub fn create(
        base: impl IntoIterator<Item = impl Into<String>>,
        span: Range<usize>,
    ) -> Self {
        Self::with_organizer(base, span, StandardOrganizer)
    }

    /// Capture imports with a custom rendering policy.
    pub fn with_organizer(
        base: impl IntoIterator<Item = impl Into<String>>,
        span: Range<usize>,
        organizer: impl ImportOrganizer + 'static,
    ) -> Self {
        Self {
            base: base.into_iter().map(Into::into).collect(),
            span,
            to_add: BTreeSet::new(),
            to_remove: BTreeSet::new(),
            organizer: Box::new(organizer),
        }
    }

    /// Request that the named imports be present in the rendered block.
    /// Adding a name already in the base set is a no-op.
    pub fn add_all(&mut self, names: impl IntoIterator<Item = impl Into<String>>) {
        self.to_add.extend(names.into_iter().map(Into::into));
    }

    /// Request that the named imports be absent from the rendered block.
    /// Removing a name that was also requested as an addition cancels both.
    pub fn remove_all(&mut self, names: impl IntoIterator<Item = impl Into<String>>) {
        self.to_remove.extend(names.into_iter().map(Into::into));
    }

    /// True if any addition or removal has been requested, whether or not
    /// the requests net out to a change.
    pub fn has_requests(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }

    /// True if the effective import set differs from what the file already
    /// has. An addition cancelled by a removal (or vice versa) nets to no
    /// change.
    pub fn have_changed(&self) -> bool {
        self.effective() != self.base
    }

    /// Render the canonical block replacing `[span_start, span_end)`.
    ///
    /// Deterministic and idempotent: the same (base, add, remove) triple
    /// always yields byte-identical output, independent of the order the
    /// requests arrived in. With no requests this is a canonical re-sort of
    /// the existing imports.
    pub fn render(&self) -> String {
        self.organizer.organize(&self.effective())
    }

    /// Offset in the original text where the rendered block starts.
    pub fn span_start(&self) -> usize {
        self.span.start
    }

    /// Offset in the original text where the rendered block ends.
    pub fn span_end(&self) -> usize {
        self.span.end
    }

    fn effective(&self) -> BTreeSet<String> {
        self.base
            .union(&self.to_add)
            .filter(|name| !self.to_remove.contains(*name))
            .cloned()
            .collect()
    }
}
