//! Dialect selection and grammar integration.
//!
//! This module is the only place that talks to tree-sitter directly and the
//! only place that knows grammar-specific node kind strings. Everything
//! downstream works on the dialect-independent [`NodeKind`] taxonomy assigned
//! here.
//!
//! Parser instances are thread-local so the language object is loaded once per
//! thread and concurrent callers never contend on a shared parser.

use std::{cell::RefCell, fmt, str::FromStr};

use tree_sitter::Parser;

use crate::{TransformError, tree::NodeKind};

/// A supported template dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// HTML-flavored Astro templates (`.astro`).
    Astro,
    /// Svelte component templates (`.svelte`).
    Svelte,
}

impl Dialect {
    /// The canonical lowercase tag for this dialect.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Astro => "astro",
            Dialect::Svelte => "svelte",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = TransformError;

    /// Parses the string tags used by CLI tooling and foreign bindings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "astro" => Ok(Dialect::Astro),
            "svelte" => Ok(Dialect::Svelte),
            other => Err(TransformError::UnknownDialect(other.to_string())),
        }
    }
}

thread_local! {
    /// Reused Tree-sitter parser for Astro sources.
    static ASTRO_PARSER: RefCell<Parser> = RefCell::new(load_parser(
        &tree_sitter_astro::LANGUAGE.into(),
        "astro",
    ));

    /// Reused Tree-sitter parser for Svelte sources.
    static SVELTE_PARSER: RefCell<Parser> = RefCell::new(load_parser(
        &tree_sitter_svelte_ng::LANGUAGE.into(),
        "svelte",
    ));
}

/// Builds a parser with `language` installed.
///
/// Language loading can only fail on an ABI mismatch between the grammar and
/// the linked tree-sitter runtime, which is a build configuration bug.
fn load_parser(language: &tree_sitter::Language, name: &str) -> Parser {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(language) {
        panic!("tree-sitter {name} grammar failed to load: {e}");
    }
    parser
}

/// Parse `source` with the grammar for `dialect`.
///
/// Tree-sitter recovers from malformed input, so this returns a best-effort
/// tree for almost any byte sequence; `Err` only occurs when the parser gives
/// up entirely.
pub fn parse(source: &str, dialect: Dialect) -> Result<tree_sitter::Tree, TransformError> {
    match dialect {
        Dialect::Astro => ASTRO_PARSER.with(|p| p.borrow_mut().parse(source, None)),
        Dialect::Svelte => SVELTE_PARSER.with(|p| p.borrow_mut().parse(source, None)),
    }
    .ok_or(TransformError::Parse { dialect })
}

/// Maps a grammar node kind string onto the engine taxonomy.
pub(crate) fn classify(dialect: Dialect, kind: &str) -> NodeKind {
    match dialect {
        Dialect::Astro => classify_astro(kind),
        Dialect::Svelte => classify_svelte(kind),
    }
}

fn classify_astro(kind: &str) -> NodeKind {
    match kind {
        "document" => NodeKind::Document,
        "element" => NodeKind::Element,
        "start_tag" => NodeKind::StartTag,
        "end_tag" => NodeKind::EndTag,
        "self_closing_tag" => NodeKind::SelfClosingTag,
        "tag_name" => NodeKind::TagName,
        // Entities render as character data, so for gap purposes they behave
        // like text.
        "text" | "entity" => NodeKind::Text,
        "html_interpolation" => NodeKind::Expression,
        "comment" => NodeKind::Comment,
        // Frontmatter is fenced JavaScript; script/style carry verbatim code.
        "frontmatter" | "script_element" | "style_element" | "raw_text" => NodeKind::RawText,
        "attribute" => NodeKind::Attribute,
        _ => NodeKind::Other,
    }
}

fn classify_svelte(kind: &str) -> NodeKind {
    match kind {
        "document" => NodeKind::Document,
        "element" => NodeKind::Element,
        "start_tag" => NodeKind::StartTag,
        "end_tag" => NodeKind::EndTag,
        "self_closing_tag" => NodeKind::SelfClosingTag,
        "tag_name" => NodeKind::TagName,
        "text" | "entity" => NodeKind::Text,
        "expression" => NodeKind::Expression,
        "comment" => NodeKind::Comment,
        "script_element" | "style_element" | "raw_text" => NodeKind::RawText,
        // Control-flow blocks contain markup children between their tags.
        "if_statement" | "each_statement" | "await_statement" | "key_statement"
        | "snippet_statement" | "else_block" | "else_if_block" | "then_block" | "catch_block" => {
            NodeKind::Block
        }
        // Block tags and special tags all close with `}`, but none of them
        // tolerates whitespace directly after their `{`.
        "if_start" | "if_end" | "each_start" | "each_end" | "await_start" | "await_end"
        | "key_start" | "key_end" | "snippet_start" | "snippet_end" | "html_tag" | "const_tag"
        | "debug_tag" | "render_tag" => NodeKind::BlockTag,
        "attribute" => NodeKind::Attribute,
        _ => NodeKind::Other,
    }
}
