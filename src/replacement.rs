use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// An inverted byte range, which has no meaning as an edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("inverted replacement range [{start}..{end})")]
pub struct InvertedRange {
    pub start: usize,
    pub end: usize,
}

/// The fundamental edit primitive: delete the half-open byte range
/// `[start, end)` and insert `text` in its place.
///
/// All high-level operations (suggested fixes, import rewrites) compile down
/// to this single primitive. Offsets are byte offsets into the original UTF-8
/// text of one file; a zero-length range is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawReplacement")]
pub struct Replacement {
    start: usize,
    end: usize,
    text: String,
}

/// Wire shape of a [`Replacement`]; deserialization goes through
/// [`TryFrom`] so an inverted range from a frontend is rejected at the
/// boundary instead of surfacing as a malformed edit later.
#[derive(Deserialize)]
struct RawReplacement {
    start: usize,
    end: usize,
    text: String,
}

impl TryFrom<RawReplacement> for Replacement {
    type Error = InvertedRange;

    fn try_from(raw: RawReplacement) -> Result<Self, Self::Error> {
        if raw.start > raw.end {
            return Err(InvertedRange {
                start: raw.start,
                end: raw.end,
            });
        }
        Ok(Self {
            start: raw.start,
            end: raw.end,
            text: raw.text,
        })
    }
}

impl Replacement {
    /// Create a replacement for `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`; an inverted range has no meaning as an edit.
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        assert!(
            start <= end,
            "inverted replacement range [{start}..{end})"
        );
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Pure insertion at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text)
    }

    /// Starting byte offset (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Ending byte offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// The text inserted in place of the range.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The replaced byte range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// True if the range is empty, i.e. this edit inserts without deleting.
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    /// True if the two ranges share any offset.
    ///
    /// Two insertions at the same offset overlap: their relative order would
    /// be undefined. An insertion exactly at another range's start or end
    /// boundary does not overlap it.
    pub fn overlaps(&self, other: &Replacement) -> bool {
        if self.is_insertion() && other.is_insertion() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }

    /// True if the two replacements cannot coexist in one change set:
    /// their ranges overlap and they are not the exact same edit.
    pub fn conflicts_with(&self, other: &Replacement) -> bool {
        self != other && self.overlaps(other)
    }
}
