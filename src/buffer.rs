use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("range [{start}..{end}) out of bounds for buffer of length {len}")]
    OutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("offset {offset} is not a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

/// A mutable, randomly addressable store over one file's contents.
///
/// The engine's only requirement of a buffer is an offset-range replace.
/// During one apply pass it is called with a validated, non-overlapping
/// sequence of ranges in descending offset order, all expressed against the
/// buffer's pre-edit text.
pub trait SourceBuffer {
    /// Current length of the contents in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check, without mutating anything, that `[start, end)` is a range
    /// this buffer can replace. The engine runs this for every edit of an
    /// apply pass before performing the first write, so a rejected edit
    /// leaves the buffer untouched. Implementations with stricter
    /// addressing than plain bounds must override this to match their
    /// `replace_chars`.
    fn validate_range(&self, start: usize, end: usize) -> Result<(), BufferError> {
        if start > end || end > self.len() {
            return Err(BufferError::OutOfBounds {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Replace the byte range `[start, end)` with `text`, in place.
    fn replace_chars(&mut self, start: usize, end: usize, text: &str) -> Result<(), BufferError>;
}

/// String-backed [`SourceBuffer`] with bounds and char-boundary checking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_inner(self) -> String {
        self.text
    }
}

impl SourceBuffer for TextBuffer {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn validate_range(&self, start: usize, end: usize) -> Result<(), BufferError> {
        if start > end || end > self.text.len() {
            return Err(BufferError::OutOfBounds {
                start,
                end,
                len: self.text.len(),
            });
        }
        for offset in [start, end] {
            if !self.text.is_char_boundary(offset) {
                return Err(BufferError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }

    fn replace_chars(&mut self, start: usize, end: usize, text: &str) -> Result<(), BufferError> {
        self.validate_range(start, end)?;
        self.text.replace_range(start..end, text);
        Ok(())
    }
}
