use crate::SourcePosition;
use serde::Deserialize;
use serde::Serialize;

/// A half-open range of docblock text: `[start_inclusive, end_exclusive)`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct DocSourceSpan {
    pub start_inclusive: SourcePosition,
    pub end_exclusive: SourcePosition,
}

impl DocSourceSpan {
    pub fn new(
        start_inclusive: SourcePosition,
        end_exclusive: SourcePosition,
    ) -> Self {
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Returns `true` if `other` begins exactly where this span ends, with
    /// nothing (not even whitespace) in between.
    pub fn is_directly_followed_by(&self, other: &DocSourceSpan) -> bool {
        self.end_exclusive.byte_offset()
            == other.start_inclusive.byte_offset()
    }

    /// Length of the span in bytes.
    pub fn byte_len(&self) -> usize {
        self.end_exclusive
            .byte_offset()
            .saturating_sub(self.start_inclusive.byte_offset())
    }
}
