//! Edit planning.
//!
//! Every gap gets one of three verdicts:
//!
//! - **Strip**: both neighbors are markup (tags, comments, expressions), so
//!   the gap can be deleted outright; no text node is involved on either side.
//! - **Relocate**: a text run borders the gap. Deleting would splice the text
//!   directly against its neighbor, so instead the whitespace is moved across
//!   the nearest tag delimiter. The line breaks stay visible in the source but
//!   end up inside delimiter syntax, where no compiler emits them.
//! - **Skip**: no safe relocation target exists (Svelte block tags reject
//!   whitespace after their `{`, text-to-text gaps are content). Leaving a gap
//!   alone is always correct; rewriting one wrongly never is.
//!
//! Relocation is modeled as a single move edit covering delimiter plus gap,
//! with a per-byte origin map so both sides of the move stay addressable in
//! sourcemaps. The two rotation flavors:
//!
//! - right: `delim + ws` becomes `(stolen indent) + ws + delim`, stealing up
//!   to one indentation byte (two for `/>`) from the gap's final line so the
//!   following node keeps its column where possible;
//! - left: `ws + prefix` becomes `prefix + ws`, pulling an opener such as
//!   `<!--`, `{`, or `<tag` back against the preceding text.

use crate::{
    edit::Edit,
    scan::Gap,
    tree::{NodeId, NodeKind, SyntaxTree},
};

/// Decision for a single gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Strip,
    Relocate,
    Skip,
}

/// Classify a gap by its neighbor kinds.
///
/// The verdict is a pure function of the tree, never of other edits, so
/// re-running the planner on the same input always reproduces it.
pub fn verdict(tree: &SyntaxTree, gap: &Gap) -> Verdict {
    let prev_text = tree.node(gap.prev).kind.is_text();
    let next_text = tree.node(gap.next).kind.is_text();
    match (prev_text, next_text) {
        (true, true) => Verdict::Skip,
        (false, false) => Verdict::Strip,
        _ => Verdict::Relocate,
    }
}

/// Turn gaps into a sorted, non-overlapping edit list.
pub fn plan(tree: &SyntaxTree, source: &str, gaps: &[Gap]) -> Vec<Edit> {
    let mut edits: Vec<Edit> = gaps
        .iter()
        .filter_map(|gap| plan_gap(tree, source, gap))
        .collect();

    edits.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then(a.replacement.len().cmp(&b.replacement.len()))
    });

    // Relocation targets reach outside the gap itself, so two gaps can in
    // principle claim the same bytes on adversarial trees. First claim wins;
    // the loser falls back to an effective Skip.
    let mut kept: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if kept.last().is_none_or(|prev| edit.start >= prev.end) {
            kept.push(edit);
        }
    }
    kept
}

fn plan_gap(tree: &SyntaxTree, source: &str, gap: &Gap) -> Option<Edit> {
    match verdict(tree, gap) {
        Verdict::Skip => None,
        Verdict::Strip => Some(Edit {
            start: gap.start,
            end: gap.end,
            replacement: String::new(),
            origins: Vec::new(),
            moved_suffix_len: 0,
        }),
        Verdict::Relocate => {
            if tree.node(gap.prev).kind.is_text() {
                relocate_left(tree, source, gap)
            } else {
                relocate_right(tree, source, gap)
            }
        }
    }
}

/// Trailing delimiters that may rotate rightwards across a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Gt,
    SlashGt,
    CommentEnd,
    Brace,
}

impl Delim {
    fn bytes(self) -> &'static [u8] {
        match self {
            Delim::Gt => b">",
            Delim::SlashGt => b"/>",
            Delim::CommentEnd => b"-->",
            Delim::Brace => b"}",
        }
    }

    /// How many indentation bytes the rotation may pull in front of the gap.
    /// `/>` gets two so the following node keeps its exact column.
    fn max_steal(self) -> usize {
        match self {
            Delim::SlashGt => 2,
            _ => 1,
        }
    }
}

/// The delimiter a node ends with, found by kind and verified against source
/// bytes by the caller. Containers delegate to their last child.
fn trailing_delimiter(tree: &SyntaxTree, id: NodeId) -> Option<Delim> {
    let mut id = id;
    loop {
        match tree.node(id).kind {
            NodeKind::StartTag | NodeKind::EndTag => return Some(Delim::Gt),
            NodeKind::SelfClosingTag => return Some(Delim::SlashGt),
            NodeKind::Comment => return Some(Delim::CommentEnd),
            NodeKind::Expression | NodeKind::BlockTag => return Some(Delim::Brace),
            NodeKind::Element | NodeKind::Block | NodeKind::RawText => {
                id = *tree.children(id).last()?;
            }
            _ => return None,
        }
    }
}

/// End offset of the opener prefix of `id`, the part that may rotate leftwards
/// across a gap: `<!--`, the `{` of an expression, or `<` plus the tag name.
fn opener_prefix_end(tree: &SyntaxTree, source: &str, id: NodeId) -> Option<usize> {
    let node = tree.node(id);
    let start = node.start;
    let bytes = source.as_bytes();
    match node.kind {
        NodeKind::Expression => (bytes.get(start) == Some(&b'{')).then_some(start + 1),
        NodeKind::Comment => {
            (bytes.get(start..start + 4) == Some(b"<!--".as_slice())).then_some(start + 4)
        }
        NodeKind::Element | NodeKind::RawText => {
            let tag = tree.find_child(id, |k| {
                matches!(k, NodeKind::StartTag | NodeKind::SelfClosingTag)
            })?;
            opener_prefix_end(tree, source, tag)
        }
        NodeKind::StartTag | NodeKind::EndTag | NodeKind::SelfClosingTag => {
            if bytes.get(start) != Some(&b'<') {
                return None;
            }
            let name = tree.find_child(id, |k| k == NodeKind::TagName)?;
            let end = tree.node(name).end;
            (end > start).then_some(end)
        }
        _ => None,
    }
}

fn relocate_right(tree: &SyntaxTree, source: &str, gap: &Gap) -> Option<Edit> {
    let delim = trailing_delimiter(tree, gap.prev)?;
    let delim_bytes = delim.bytes();
    let at = tree.node(gap.prev).end.checked_sub(delim_bytes.len())?;
    if source.as_bytes().get(at..gap.start) != Some(delim_bytes) {
        return None;
    }

    let ws = &source[gap.start..gap.end];
    let (replacement, segment_origins) = rotate_right(delim, ws);
    Some(Edit {
        start: at,
        end: gap.end,
        replacement,
        origins: segment_origins.into_iter().map(|off| Some(at + off)).collect(),
        moved_suffix_len: delim_bytes.len(),
    })
}

fn relocate_left(tree: &SyntaxTree, source: &str, gap: &Gap) -> Option<Edit> {
    let prefix_end = opener_prefix_end(tree, source, gap.next)?;
    if prefix_end <= gap.end {
        return None;
    }
    let prefix = source.as_bytes().get(gap.end..prefix_end)?;

    let ws = &source[gap.start..gap.end];
    let (replacement, segment_origins) = rotate_left(prefix, ws);
    Some(Edit {
        start: gap.start,
        end: prefix_end,
        replacement,
        origins: segment_origins
            .into_iter()
            .map(|off| Some(gap.start + off))
            .collect(),
        moved_suffix_len: 0,
    })
}

/// Rotate a trailing delimiter across a whitespace run.
///
/// Input segment: `delim + ws`. Output: `(stolen indent) + ws' + delim`.
/// Returns the replacement plus, per output byte, its offset within the input
/// segment (always a permutation; rotation never inserts or drops bytes).
fn rotate_right(delim: Delim, ws: &str) -> (String, Vec<usize>) {
    let delim_bytes = delim.bytes();
    let dlen = delim_bytes.len();
    let ws = ws.as_bytes();

    // Stealable indentation: trailing space/tab bytes on the final line.
    let line_start = ws
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let stolen = ws[line_start..]
        .iter()
        .rev()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count()
        .min(delim.max_steal());
    let kept = ws.len() - stolen;

    // Segment layout on the input side: delimiter at 0..dlen, whitespace at
    // dlen..dlen+ws.len().
    let mut out = Vec::with_capacity(dlen + ws.len());
    let mut origins = Vec::with_capacity(dlen + ws.len());
    for (i, &b) in ws.iter().enumerate().skip(kept) {
        out.push(b);
        origins.push(dlen + i);
    }
    for (i, &b) in ws.iter().enumerate().take(kept) {
        out.push(b);
        origins.push(dlen + i);
    }
    for (i, &b) in delim_bytes.iter().enumerate() {
        out.push(b);
        origins.push(i);
    }

    let out = String::from_utf8(out).expect("rotated segment must stay utf-8");
    (out, origins)
}

/// Rotate an opener prefix across a whitespace run.
///
/// Input segment: `ws + prefix`. Output: `prefix + ws`. Same origin contract
/// as [`rotate_right`].
fn rotate_left(prefix: &[u8], ws: &str) -> (String, Vec<usize>) {
    let ws = ws.as_bytes();

    // Segment layout on the input side: whitespace at 0..ws.len(), prefix at
    // ws.len()..ws.len()+prefix.len().
    let mut out = Vec::with_capacity(ws.len() + prefix.len());
    let mut origins = Vec::with_capacity(ws.len() + prefix.len());
    for (i, &b) in prefix.iter().enumerate() {
        out.push(b);
        origins.push(ws.len() + i);
    }
    for (i, &b) in ws.iter().enumerate() {
        out.push(b);
        origins.push(i);
    }

    let out = String::from_utf8(out).expect("rotated segment must stay utf-8");
    (out, origins)
}
