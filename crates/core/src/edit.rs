//! The edit model and the rewriter.
//!
//! An [`Edit`] replaces one byte range of the input with new bytes. The full
//! edit list for a transform is sorted by start offset and pairwise disjoint;
//! [`apply`] then rebuilds the output in a single linear pass, copying
//! unedited spans verbatim. Applying the same list to the same input yields
//! byte-identical output, unconditionally.
//!
//! Offsets are byte offsets throughout (tree-sitter's model). Sourcemap
//! columns are converted to UTF-16 code units later, in `mapping`.

use crate::TransformError;

/// A single byte-range replacement over the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive) in the input.
    pub start: usize,
    /// End byte offset (exclusive) in the input.
    pub end: usize,
    /// Bytes that replace `input[start..end]` in the output.
    pub replacement: String,
    /// Per output byte of `replacement`, the input byte it originated from.
    ///
    /// `Some(offset)` marks a moved byte; `None` marks an inserted byte with
    /// no origin. Relocations are pure permutations, so their origin lists
    /// contain no `None`.
    pub origins: Vec<Option<usize>>,
    /// If non-zero, the final `moved_suffix_len` bytes of `replacement` are a
    /// delimiter moved from the front of the edited span. The sourcemap
    /// builder places extra anchors around such a suffix so its mapping does
    /// not bleed into the following token.
    pub moved_suffix_len: usize,
}

impl Edit {
    /// Length of the replaced input range.
    pub fn replaced_len(&self) -> usize {
        self.end - self.start
    }
}

/// Check the structural contract of an edit list.
///
/// Verified here: ranges are well-formed and inside the input, edits are
/// disjoint and ascending, origin lists line up with replacements, origins
/// point into the input, and moved suffixes fit their replacement. Whether
/// replacement bytes actually equal the bytes their origins reference is the
/// planner's responsibility.
pub fn check(input_len: usize, edits: &[Edit]) -> Result<(), TransformError> {
    let mut prev: Option<&Edit> = None;
    for (idx, edit) in edits.iter().enumerate() {
        if edit.start > edit.end {
            return Err(TransformError::BadEdit(format!(
                "range reversed at index {idx}: [{},{})",
                edit.start, edit.end
            )));
        }
        if edit.end > input_len {
            return Err(TransformError::BadEdit(format!(
                "range out of bounds at index {idx}: end {} > input length {input_len}",
                edit.end
            )));
        }
        if let Some(prev) = prev
            && edit.start < prev.end
        {
            return Err(TransformError::EditOverlap {
                first_start: prev.start,
                first_end: prev.end,
                second_start: edit.start,
                second_end: edit.end,
            });
        }
        if edit.origins.len() != edit.replacement.len() {
            return Err(TransformError::BadEdit(format!(
                "origin list length {} does not match replacement length {} at index {idx}",
                edit.origins.len(),
                edit.replacement.len()
            )));
        }
        if edit.moved_suffix_len > edit.replacement.len() {
            return Err(TransformError::BadEdit(format!(
                "moved suffix {} exceeds replacement length {} at index {idx}",
                edit.moved_suffix_len,
                edit.replacement.len()
            )));
        }
        if let Some(bad) = edit.origins.iter().flatten().find(|&&o| o >= input_len) {
            return Err(TransformError::BadEdit(format!(
                "origin {bad} out of bounds at index {idx}"
            )));
        }
        prev = Some(edit);
    }
    Ok(())
}

/// Apply a checked edit list to `input` in one pass.
pub fn apply(input: &str, edits: &[Edit]) -> String {
    let src = input.as_bytes();
    let mut out = Vec::<u8>::with_capacity(src.len());
    let mut cursor = 0usize;

    for edit in edits {
        if cursor < edit.start {
            out.extend_from_slice(&src[cursor..edit.start]);
        }
        out.extend_from_slice(edit.replacement.as_bytes());
        cursor = edit.end;
    }
    if cursor < src.len() {
        out.extend_from_slice(&src[cursor..]);
    }

    // Edit boundaries are node boundaries and replacements are rearranged
    // source bytes, so the result is valid UTF-8 whenever the input was.
    String::from_utf8(out).expect("rewritten output must be utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(start: usize, end: usize) -> Edit {
        Edit {
            start,
            end,
            replacement: String::new(),
            origins: Vec::new(),
            moved_suffix_len: 0,
        }
    }

    #[test]
    fn apply_copies_unedited_spans_verbatim() {
        let edits = [delete(1, 3), delete(5, 6)];
        check(7, &edits).unwrap();
        assert_eq!(apply("abcdefg", &edits), "adeg");
    }

    #[test]
    fn apply_handles_replacements_and_empty_list() {
        assert_eq!(apply("abc", &[]), "abc");

        let edit = Edit {
            start: 1,
            end: 2,
            replacement: "XY".to_string(),
            origins: vec![Some(1), None],
            moved_suffix_len: 0,
        };
        check(3, std::slice::from_ref(&edit)).unwrap();
        assert_eq!(apply("abc", &[edit]), "aXYc");
    }

    #[test]
    fn check_rejects_overlap() {
        let edits = [delete(1, 3), delete(2, 4)];
        let err = check(10, &edits).unwrap_err();
        assert!(matches!(err, TransformError::EditOverlap { .. }));
    }

    #[test]
    fn check_rejects_out_of_bounds_range() {
        let err = check(2, &[delete(1, 3)]).unwrap_err();
        assert!(matches!(err, TransformError::BadEdit(_)));
    }

    #[test]
    fn check_rejects_reversed_range() {
        let err = check(10, &[delete(3, 1)]).unwrap_err();
        assert!(matches!(err, TransformError::BadEdit(_)));
    }

    #[test]
    fn check_rejects_origin_mismatches() {
        let edit = Edit {
            start: 0,
            end: 1,
            replacement: "ab".to_string(),
            origins: vec![Some(0)],
            moved_suffix_len: 0,
        };
        assert!(matches!(
            check(5, &[edit]),
            Err(TransformError::BadEdit(_))
        ));

        let edit = Edit {
            start: 0,
            end: 1,
            replacement: "a".to_string(),
            origins: vec![Some(9)],
            moved_suffix_len: 0,
        };
        assert!(matches!(
            check(5, &[edit]),
            Err(TransformError::BadEdit(_))
        ));
    }

    #[test]
    fn check_rejects_oversized_moved_suffix() {
        let edit = Edit {
            start: 0,
            end: 1,
            replacement: "a".to_string(),
            origins: vec![Some(0)],
            moved_suffix_len: 2,
        };
        assert!(matches!(
            check(5, &[edit]),
            Err(TransformError::BadEdit(_))
        ));
    }

    #[test]
    fn touching_edits_are_not_an_overlap() {
        let edits = [delete(1, 3), delete(3, 4)];
        check(10, &edits).unwrap();
        assert_eq!(apply("abcdefghij", &edits), "aefghij");
    }
}
