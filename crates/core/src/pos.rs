//! Byte offset to line/column conversion.
//!
//! Sourcemap consumers in the JavaScript ecosystem measure columns in UTF-16
//! code units, while everything else in this crate is byte-based. A
//! [`PositionIndex`] is built once per text and converts in both directions.
//!
//! Lines exclude their terminator: the `\n`, and for CRLF input the `\r` too,
//! never count toward columns. ASCII-only lines (the overwhelmingly common
//! case) take a direct arithmetic path; other lines carry a per-character
//! column table that is binary-searched. Offsets that land inside a
//! multi-byte sequence, and columns that land inside a surrogate pair, clamp
//! to the start of the containing character.

/// Precomputed line/column index for one text.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    line_starts: Vec<usize>,
    lines: Vec<Line>,
}

#[derive(Debug, Clone)]
struct Line {
    /// Absolute byte offset (inclusive) of the line start.
    start: usize,
    /// Absolute byte offset (exclusive) of the line content end.
    end: usize,
    /// `None` for ASCII-only lines; otherwise one entry per character plus a
    /// trailing sentinel at the line end.
    cols: Option<Vec<CharCol>>,
}

/// Column table entry: a character's line-relative start byte and the UTF-16
/// column at that character.
#[derive(Debug, Clone, Copy)]
struct CharCol {
    byte: u32,
    col: u32,
}

impl PositionIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }

        let lines = line_starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let mut end = line_starts.get(i + 1).map_or(text.len(), |&next| next - 1);
                if end > start && text.as_bytes()[end - 1] == b'\r' {
                    end -= 1;
                }
                let slice = &text[start..end];
                let cols = if slice.is_ascii() {
                    None
                } else {
                    let mut table = Vec::new();
                    let mut col = 0u32;
                    for (rel, ch) in slice.char_indices() {
                        table.push(CharCol {
                            byte: rel as u32,
                            col,
                        });
                        col += ch.len_utf16() as u32;
                    }
                    table.push(CharCol {
                        byte: slice.len() as u32,
                        col,
                    });
                    Some(table)
                };
                Line { start, end, cols }
            })
            .collect();

        PositionIndex { line_starts, lines }
    }

    /// Byte offsets where each line starts; always begins with 0.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// The 0-based line containing `byte`; offsets past the end fall on the
    /// final line.
    pub fn line_of(&self, byte: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= byte) - 1
    }

    /// Convert an absolute byte offset to `(line, utf16_column)`.
    pub fn position_of(&self, byte: usize) -> (usize, usize) {
        let line_no = self.line_of(byte);
        let line = &self.lines[line_no];
        let rel = byte.clamp(line.start, line.end) - line.start;
        let col = match &line.cols {
            None => rel,
            Some(table) => {
                let idx = table.partition_point(|c| c.byte as usize <= rel) - 1;
                table[idx].col as usize
            }
        };
        (line_no, col)
    }

    /// Convert `(line, utf16_column)` back to an absolute byte offset.
    ///
    /// Out-of-range lines return `None`; columns beyond the line clamp to the
    /// line end.
    pub fn byte_of(&self, line: usize, utf16_col: usize) -> Option<usize> {
        let line = self.lines.get(line)?;
        let byte = match &line.cols {
            None => line.start + utf16_col.min(line.end - line.start),
            Some(table) => {
                let idx = table.partition_point(|c| (c.col as usize) <= utf16_col) - 1;
                line.start + table[idx].byte as usize
            }
        };
        Some(byte)
    }
}
