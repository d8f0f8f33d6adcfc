//! Index-addressed syntax tree arena.
//!
//! The tree-sitter CST is lowered into a flat arena of [`SyntaxNode`]s
//! addressed by [`NodeId`]. Parents exclusively own their children (ids only
//! ever point forward, so the structure is acyclic by construction), the tree
//! is immutable once lowered, and the whole thing serializes to JSON for
//! fixture dumps.
//!
//! Only named grammar nodes are lowered; anonymous tokens are skipped and any
//! named descendants they carry are attached to the nearest named ancestor.

use serde::Serialize;

use crate::dialect::{self, Dialect};

/// Arena index of a [`SyntaxNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dialect-independent node taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Element,
    StartTag,
    EndTag,
    SelfClosingTag,
    TagName,
    Text,
    Expression,
    Comment,
    /// Verbatim content: script/style elements, Astro frontmatter, raw text.
    RawText,
    /// A control-flow container whose children are markup (Svelte `{#if}`...).
    Block,
    /// A control-flow delimiter tag such as `{#if x}` or `{/each}`.
    BlockTag,
    Attribute,
    Other,
}

impl NodeKind {
    /// Containers are the only nodes whose child gaps are scanned.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element | NodeKind::Block)
    }

    /// True for nodes that compile to character data.
    pub fn is_text(self) -> bool {
        matches!(self, NodeKind::Text)
    }
}

/// One lowered node: kind, byte range, ordered children.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Start byte offset (inclusive) in the source.
    pub start: usize,
    /// End byte offset (exclusive) in the source.
    pub end: usize,
    pub children: Vec<NodeId>,
}

/// The lowered tree. Index 0 is always the root.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Lower a tree-sitter tree into an arena.
    ///
    /// The traversal is iterative (a `TreeCursor` plus an explicit ancestor
    /// stack) so deeply nested or adversarial input cannot overflow the call
    /// stack, and children are never indexed by integer.
    pub fn lower(ts: &tree_sitter::Tree, dialect: Dialect) -> Self {
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        let mut cursor = ts.root_node().walk();

        let root = cursor.node();
        nodes.push(SyntaxNode {
            kind: dialect::classify(dialect, root.kind()),
            start: root.start_byte(),
            end: root.end_byte(),
            children: Vec::new(),
        });

        // `ancestors` holds arena ids of named ancestors of the cursor
        // position; `entered` records, per visited tree level, whether that
        // level allocated an arena node (anonymous tokens do not).
        let mut ancestors: Vec<NodeId> = vec![NodeId(0)];
        let mut entered: Vec<bool> = Vec::new();

        fn enter(
            nodes: &mut Vec<SyntaxNode>,
            ancestors: &mut Vec<NodeId>,
            entered: &mut Vec<bool>,
            dialect: Dialect,
            ts: tree_sitter::Node<'_>,
        ) {
            if !ts.is_named() {
                entered.push(false);
                return;
            }
            let id = NodeId(nodes.len() as u32);
            let parent = *ancestors.last().expect("arena root is always on the stack");
            nodes.push(SyntaxNode {
                kind: dialect::classify(dialect, ts.kind()),
                start: ts.start_byte(),
                end: ts.end_byte(),
                children: Vec::new(),
            });
            nodes[parent.index()].children.push(id);
            ancestors.push(id);
            entered.push(true);
        }

        'walk: loop {
            if cursor.goto_first_child() {
                enter(&mut nodes, &mut ancestors, &mut entered, dialect, cursor.node());
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    if entered.pop().unwrap_or(false) {
                        ancestors.pop();
                    }
                    enter(&mut nodes, &mut ancestors, &mut entered, dialect, cursor.node());
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
                if entered.pop().unwrap_or(false) {
                    ancestors.pop();
                }
            }
        }

        SyntaxTree { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Number of lowered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First child of `id` whose kind satisfies `pred`.
    pub fn find_child(&self, id: NodeId, pred: impl Fn(NodeKind) -> bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| pred(self.node(c).kind))
    }

    /// Source text covered by `id`.
    pub fn text<'s>(&self, id: NodeId, source: &'s str) -> &'s str {
        let node = self.node(id);
        source.get(node.start..node.end).unwrap_or("")
    }
}
