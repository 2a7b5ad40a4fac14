use serde::Deserialize;
use serde::Serialize;

/// A position within docblock text.
///
/// All values are 0-based. `col` counts characters (not bytes) from the
/// start of the line; `byte_offset` counts bytes from the start of the whole
/// text that was handed to the lexer, even when lexing began part-way in.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SourcePosition {
    line: usize,
    col: usize,
    byte_offset: usize,
}

impl SourcePosition {
    pub fn new(line: usize, col: usize, byte_offset: usize) -> Self {
        Self {
            line,
            col,
            byte_offset,
        }
    }

    /// Computes the position of `byte_offset` by scanning `source` from its
    /// start.
    ///
    /// `\r\n` counts as a single line break. Offsets past the end of
    /// `source` are clamped to its length.
    pub fn locate(source: &str, byte_offset: usize) -> Self {
        let byte_offset = byte_offset.min(source.len());
        let mut line = 0;
        let mut col = 0;
        let mut last_was_cr = false;
        for (idx, ch) in source.char_indices() {
            if idx >= byte_offset {
                break;
            }
            match ch {
                '\n' if last_was_cr => last_was_cr = false,
                '\n' => {
                    line += 1;
                    col = 0;
                },
                '\r' => {
                    line += 1;
                    col = 0;
                    last_was_cr = true;
                },
                _ => {
                    col += 1;
                    last_was_cr = false;
                },
            }
        }
        Self::new(line, col, byte_offset)
    }

    /// Returns the 0-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 0-based character column within the line.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Returns the 0-based byte offset from the start of the text.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }
}
