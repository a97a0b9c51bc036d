//! Fixmerge: diff aggregation and application for automated source rewriting
//!
//! Given suggested edits to a single source file discovered independently by
//! many checks, fixmerge merges them into one consistent, non-contradictory
//! change set and applies it to the file's text without corrupting unrelated
//! regions.
//!
//! # Architecture
//!
//! All suggested fixes compile down to a single primitive: [`Replacement`], a
//! byte-span replacement against the original text. A per-file
//! [`DiffAggregator`] accumulates replacements and import changes from a
//! stream of [`Finding`]s, rejects overlapping edits, renders a canonical
//! import block, and applies the final set bottom-to-top so no edit ever
//! invalidates another edit's offsets.
//!
//! # Guarantees
//!
//! - No two distinct edits in an applied diff touch overlapping text
//! - Conflicts are reported, never silently resolved by picking a winner
//! - A rejected diff leaves the file text untouched (no partial apply)
//! - Import-block rendering is deterministic and idempotent
//!
//! # Example
//!
//! ```
//! use fixmerge::{DiffAggregator, Finding, Fix, ImportStatements};
//!
//! let source = "import com.foo.Baz;\n\nclass A { int x = 1; }\n";
//! let imports = ImportStatements::create(["com.foo.Baz"], 0..19);
//!
//! let mut diff = DiffAggregator::for_file("A.java", imports);
//! diff.record(
//!     &Finding::new("FieldRename")
//!         .with_fix(Fix::new().replace(35, 36, "y").add_import("com.foo.Bar")),
//! )?;
//!
//! let rewritten = diff.apply_to_source(source)?;
//! assert_eq!(
//!     rewritten,
//!     "import com.foo.Bar;\nimport com.foo.Baz;\n\nclass A { int y = 1; }\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod buffer;
pub mod diff;
pub mod fix;
pub mod imports;
pub mod replacement;
pub mod replacements;

// Re-exports
pub use buffer::{BufferError, SourceBuffer, TextBuffer};
pub use diff::{ApplyError, ConflictPolicy, DiffAggregator, FixSelection, RecordError};
pub use fix::{Finding, Fix, FixProvider};
pub use imports::{ImportOrganizer, ImportStatements, StandardOrganizer};
pub use replacement::{InvertedRange, Replacement};
pub use replacements::{Conflict, ReplacementSet};
