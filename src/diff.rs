//! Per-file accumulation of fixes and application of the merged diff.
//!
//! One [`DiffAggregator`] is bound to one source file. The analysis frontend
//! feeds it findings as they are discovered, in any order; at the end the
//! aggregator is asked once to apply its accumulated state to the file's
//! text. Conflicting edits are never silently reconciled: picking a winner
//! risks producing a file no finding actually intended.

use crate::buffer::{BufferError, SourceBuffer, TextBuffer};
use crate::fix::{Finding, Fix, FixProvider};
use crate::imports::ImportStatements;
use crate::replacement::Replacement;
use crate::replacements::{Conflict, ReplacementSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Origin label attached to the synthesized import-block replacement.
const IMPORT_BLOCK_ORIGIN: &str = "import block";

/// Which of a finding's candidate fixes is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixSelection {
    /// Record the most-preferred fix (index 0); the remaining candidates are
    /// discarded unconditionally, even if the preferred one conflicts.
    #[default]
    First,
    /// Record the first candidate that does not conflict with the edits
    /// accumulated so far.
    LeastConflicting,
}

/// What happens to a finding whose selected fix conflicts with edits
/// recorded earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail the whole file: `record` returns the conflict and the caller is
    /// expected to abandon this file's diff.
    #[default]
    Abort,
    /// Drop that one finding's fix and keep accumulating. Skipped conflicts
    /// stay inspectable through [`DiffAggregator::skipped`].
    Skip,
}

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("conflicting fix from `{check}` in {file}: {source}")]
    Conflict {
        file: String,
        check: String,
        #[source]
        source: Conflict,
    },

    #[error("diff for {file} already applied; cannot record further fixes")]
    Consumed { file: String },
}

/// The accumulated diff cannot be applied to the file's text.
#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("diff for {file} not applicable: {source}")]
    Conflict {
        file: String,
        #[source]
        source: Conflict,
    },

    #[error("diff for {file} not applicable: {source}")]
    Buffer {
        file: String,
        #[source]
        source: BufferError,
    },

    #[error("diff for {file} already applied")]
    AlreadyApplied { file: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Accumulating,
    Applied,
}

/// Accumulates the fixes proposed for one source file and applies the merged
/// result as a single consistent change set.
///
/// Single-use: after [`apply`](Self::apply) the aggregator is consumed and
/// rejects further `record` or `apply` calls.
#[derive(Debug)]
pub struct DiffAggregator {
    source_path: String,
    imports: ImportStatements,
    pending: ReplacementSet,
    selection: FixSelection,
    policy: ConflictPolicy,
    skipped: Vec<Conflict>,
    state: State,
}

impl DiffAggregator {
    /// Create an empty aggregator bound to one file, given the file's
    /// current import section.
    pub fn for_file(source_path: impl Into<String>, imports: ImportStatements) -> Self {
        Self {
            source_path: source_path.into(),
            imports,
            pending: ReplacementSet::new(),
            selection: FixSelection::default(),
            policy: ConflictPolicy::default(),
            skipped: Vec::new(),
            state: State::Accumulating,
        }
    }

    pub fn with_selection(mut self, selection: FixSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The file this diff pertains to, for reporting and routing.
    pub fn relevant_file_name(&self) -> &str {
        &self.source_path
    }

    /// True iff no import change and no replacement has been recorded.
    /// Callers use this to skip writing unchanged files.
    pub fn is_empty(&self) -> bool {
        !self.imports.has_requests() && self.pending.is_empty()
    }

    /// Conflicts dropped under [`ConflictPolicy::Skip`], in the order they
    /// were encountered.
    pub fn skipped(&self) -> &[Conflict] {
        &self.skipped
    }

    /// Record a finding whose fixes are already position-resolved.
    pub fn record(&mut self, finding: &Finding) -> Result<(), RecordError> {
        self.record_with(finding.check_name(), finding.fixes(), &())
    }

    /// Record a finding whose candidate fixes resolve their replacements
    /// against the opaque `positions` token. The token is passed through
    /// unchanged; the engine never inspects it.
    pub fn record_with<P: ?Sized, F: FixProvider<P>>(
        &mut self,
        check: &str,
        candidates: &[F],
        positions: &P,
    ) -> Result<(), RecordError> {
        if self.state == State::Applied {
            return Err(RecordError::Consumed {
                file: self.source_path.clone(),
            });
        }

        let Some((preferred, alternatives)) = candidates.split_first() else {
            return Ok(());
        };

        match self.selection {
            FixSelection::First => {
                if !alternatives.is_empty() {
                    debug!(
                        check,
                        discarded = alternatives.len(),
                        "using most-preferred fix only"
                    );
                }
                match self.try_fix(check, &preferred.fix(positions)) {
                    Ok(()) => Ok(()),
                    Err(conflict) => self.on_conflict(check, conflict),
                }
            }
            FixSelection::LeastConflicting => {
                let mut first_conflict = None;
                for candidate in candidates {
                    match self.try_fix(check, &candidate.fix(positions)) {
                        Ok(()) => return Ok(()),
                        Err(conflict) => {
                            first_conflict.get_or_insert(conflict);
                        }
                    }
                }
                match first_conflict {
                    Some(conflict) => self.on_conflict(check, conflict),
                    None => Ok(()),
                }
            }
        }
    }

    /// Record one fix directly, bypassing candidate selection but honoring
    /// the conflict policy.
    pub fn record_fix(&mut self, check: &str, fix: &Fix) -> Result<(), RecordError> {
        if self.state == State::Applied {
            return Err(RecordError::Consumed {
                file: self.source_path.clone(),
            });
        }
        match self.try_fix(check, fix) {
            Ok(()) => Ok(()),
            Err(conflict) => self.on_conflict(check, conflict),
        }
    }

    /// Attempt a fix atomically: either every replacement lands in the
    /// pending set and the import requests are merged, or nothing does.
    fn try_fix(&mut self, check: &str, fix: &Fix) -> Result<(), Conflict> {
        let mut staged = self.pending.clone();
        for replacement in fix.replacements() {
            staged.add_from(replacement.clone(), Some(check))?;
        }
        self.pending = staged;
        self.imports.add_all(fix.imports_to_add().iter().cloned());
        self.imports
            .remove_all(fix.imports_to_remove().iter().cloned());
        Ok(())
    }

    fn on_conflict(&mut self, check: &str, conflict: Conflict) -> Result<(), RecordError> {
        match self.policy {
            ConflictPolicy::Abort => Err(RecordError::Conflict {
                file: self.source_path.clone(),
                check: check.to_string(),
                source: conflict,
            }),
            ConflictPolicy::Skip => {
                warn!(
                    file = %self.source_path,
                    check,
                    %conflict,
                    "skipping conflicting fix"
                );
                self.skipped.push(conflict);
                Ok(())
            }
        }
    }

    /// Apply the accumulated change set to the file's text.
    ///
    /// If the import requests net to a change, exactly one extra replacement
    /// spanning the import section is synthesized first; it conflicts like
    /// any other edit if a body edit touches the same offsets. Every range
    /// is then validated against the buffer (bounds and addressing, via
    /// [`SourceBuffer::validate_range`]) before the first write, so a
    /// rejected diff leaves the buffer untouched. Edits are applied in
    /// descending start order, keeping all recorded offsets valid against
    /// the original text.
    ///
    /// Consumes the aggregator's single use: a second call fails with
    /// [`ApplyError::AlreadyApplied`] whether or not this call succeeded.
    pub fn apply(&mut self, buffer: &mut impl SourceBuffer) -> Result<(), ApplyError> {
        if self.state == State::Applied {
            return Err(ApplyError::AlreadyApplied {
                file: self.source_path.clone(),
            });
        }
        // Single-use regardless of outcome.
        self.state = State::Applied;

        if self.imports.have_changed() {
            let block = Replacement::new(
                self.imports.span_start(),
                self.imports.span_end(),
                self.imports.render(),
            );
            self.pending
                .add_from(block, Some(IMPORT_BLOCK_ORIGIN))
                .map_err(|source| ApplyError::Conflict {
                    file: self.source_path.clone(),
                    source,
                })?;
        }

        for replacement in self.pending.iter() {
            buffer
                .validate_range(replacement.start(), replacement.end())
                .map_err(|source| ApplyError::Buffer {
                    file: self.source_path.clone(),
                    source,
                })?;
        }

        for replacement in self.pending.descending() {
            buffer
                .replace_chars(replacement.start(), replacement.end(), replacement.text())
                .map_err(|source| ApplyError::Buffer {
                    file: self.source_path.clone(),
                    source,
                })?;
        }

        debug!(
            file = %self.source_path,
            edits = self.pending.len(),
            "applied diff"
        );
        Ok(())
    }

    /// Pure variant of [`apply`](Self::apply): returns the edited text
    /// instead of mutating a caller-owned buffer.
    pub fn apply_to_source(&mut self, source: &str) -> Result<String, ApplyError> {
        let mut buffer = TextBuffer::new(source);
        self.apply(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}
