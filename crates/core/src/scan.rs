//! Gap scanning.
//!
//! A gap is the byte range between two adjacent named siblings of a container
//! node whose content is entirely whitespace. Gaps are recomputed on every
//! transform; nothing here persists.
//!
//! Skip rules enforced during the scan, in priority order:
//!
//! 1. Raw-text contexts (`<script>`, `<style>`, frontmatter, and `pre`-like
//!    elements) exempt their whole subtree; whitespace there is content.
//! 2. Attribute values and expression interiors are never visited because
//!    they are not container kinds.
//! 3. With `preserve_blank_lines`, gaps containing an empty line are treated
//!    as intentional section breaks and dropped here.
//!
//! Traversal is a preorder walk over the arena, so gap order is a pure
//! function of tree structure and is stable across runs.

use crate::{
    transform::Config,
    tree::{NodeId, NodeKind, SyntaxTree},
};

/// Elements whose content keeps author whitespace verbatim even when the
/// grammar models them as plain elements.
const RAW_TEXT_TAGS: [&str; 4] = ["pre", "textarea", "script", "style"];

/// A whitespace-only range between two sibling nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    /// Start byte offset (inclusive); equals the left neighbor's end.
    pub start: usize,
    /// End byte offset (exclusive); equals the right neighbor's start.
    pub end: usize,
    /// The container both neighbors belong to.
    pub parent: NodeId,
    /// Left neighbor.
    pub prev: NodeId,
    /// Right neighbor.
    pub next: NodeId,
    /// True if the gap contains two consecutive line breaks.
    pub blank_line: bool,
}

/// Collect every candidate gap in document order.
pub fn scan(tree: &SyntaxTree, source: &str, config: &Config) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let mut stack: Vec<(NodeId, bool)> = vec![(tree.root(), false)];

    while let Some((id, inherited_raw)) = stack.pop() {
        let node = tree.node(id);
        let raw = inherited_raw
            || node.kind == NodeKind::RawText
            || is_raw_element(tree, source, id);

        if !raw && node.kind.is_container() {
            sibling_gaps(tree, source, config, id, &mut gaps);
        }

        // Reverse push keeps pop order equal to document order.
        for &child in tree.children(id).iter().rev() {
            stack.push((child, raw));
        }
    }

    gaps
}

fn sibling_gaps(
    tree: &SyntaxTree,
    source: &str,
    config: &Config,
    parent: NodeId,
    gaps: &mut Vec<Gap>,
) {
    for pair in tree.children(parent).windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        let start = tree.node(prev).end;
        let end = tree.node(next).start;
        if start >= end {
            // Adjacent or overlapping (error recovery can produce both).
            continue;
        }
        // `get` also guards against ranges that do not fall on char
        // boundaries in pathological recovery trees.
        let Some(slice) = source.get(start..end) else {
            continue;
        };
        if !slice.chars().all(char::is_whitespace) {
            continue;
        }
        let blank_line = has_blank_line(slice);
        if config.preserve_blank_lines && blank_line {
            continue;
        }
        gaps.push(Gap {
            start,
            end,
            parent,
            prev,
            next,
            blank_line,
        });
    }
}

/// True if a whitespace run contains an empty line, i.e. two consecutive
/// line breaks (`\n\n` or `\r\n\r\n`).
pub fn has_blank_line(ws: &str) -> bool {
    let bytes = ws.as_bytes();
    bytes.windows(2).any(|w| w == b"\n\n") || bytes.windows(4).any(|w| w == b"\r\n\r\n")
}

/// Whether `id` is an element whose tag name marks its content as verbatim.
fn is_raw_element(tree: &SyntaxTree, source: &str, id: NodeId) -> bool {
    if tree.node(id).kind != NodeKind::Element {
        return false;
    }
    let Some(tag) = tree.find_child(id, |k| {
        matches!(k, NodeKind::StartTag | NodeKind::SelfClosingTag)
    }) else {
        return false;
    };
    let Some(name) = tree.find_child(tag, |k| k == NodeKind::TagName) else {
        return false;
    };
    let name = tree.text(name, source);
    RAW_TEXT_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, dialect::parse};

    fn scan_src(source: &str, dialect: Dialect, preserve_blank_lines: bool) -> Vec<Gap> {
        let ts = parse(source, dialect).unwrap();
        let tree = SyntaxTree::lower(&ts, dialect);
        let config = Config {
            preserve_blank_lines,
        };
        scan(&tree, source, &config)
    }

    #[test]
    fn finds_gaps_between_tags_and_children() {
        let gaps = scan_src("<div>\n  <span>ok</span>\n</div>", Dialect::Astro, false);
        let ranges: Vec<(usize, usize)> = gaps.iter().map(|g| (g.start, g.end)).collect();
        assert_eq!(ranges, [(5, 8), (23, 24)]);
        assert!(gaps.iter().all(|g| !g.blank_line));
    }

    #[test]
    fn adjacent_nodes_produce_no_gap() {
        assert!(scan_src("<a>x</a>", Dialect::Astro, false).is_empty());
        assert!(scan_src("<a/><b/>", Dialect::Astro, false).is_empty());
    }

    #[test]
    fn flags_blank_lines_and_honors_preserve_policy() {
        let gaps = scan_src("<a></a>\n\n<b></b>", Dialect::Astro, false);
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].blank_line);

        assert!(scan_src("<a></a>\n\n<b></b>", Dialect::Astro, true).is_empty());
        // A gap without an empty line survives the policy.
        assert_eq!(scan_src("<a></a>\n<b></b>", Dialect::Astro, true).len(), 1);
    }

    #[test]
    fn blank_line_detection_handles_crlf() {
        assert!(has_blank_line("\n\n"));
        assert!(has_blank_line(" \n\n  "));
        assert!(has_blank_line("\r\n\r\n"));
        assert!(!has_blank_line("\n  \n"));
        assert!(!has_blank_line("\r\n"));
    }

    #[test]
    fn pre_content_is_exempt() {
        assert!(scan_src("<pre>  \n  </pre>", Dialect::Astro, false).is_empty());
        // Nested markup inside pre stays exempt too.
        assert!(scan_src("<pre><b>x</b>\n<b>y</b>\n</pre>", Dialect::Astro, false).is_empty());
        // An uppercase tag name still counts.
        assert!(scan_src("<PRE>  \n  </PRE>", Dialect::Astro, false).is_empty());
    }

    #[test]
    fn script_and_style_content_is_exempt() {
        for dialect in [Dialect::Astro, Dialect::Svelte] {
            assert!(scan_src("<script>\n  let x = 1;\n</script>", dialect, false).is_empty());
            assert!(scan_src("<style>\n  a { color: red; }\n</style>", dialect, false).is_empty());
        }
    }

    #[test]
    fn gap_neighbors_point_at_the_right_nodes() {
        let source = "<a></a>\n<b></b>";
        let ts = parse(source, Dialect::Astro).unwrap();
        let tree = SyntaxTree::lower(&ts, Dialect::Astro);
        let gaps = scan(&tree, source, &Config::default());
        assert_eq!(gaps.len(), 1);
        let gap = gaps[0];
        assert_eq!(gap.parent, tree.root());
        assert_eq!(tree.node(gap.prev).end, gap.start);
        assert_eq!(tree.node(gap.next).start, gap.end);
    }
}
