//! Inter-node whitespace stripping for Astro and Svelte templates.
//!
//! Both template compilers turn whitespace-only runs between markup nodes into
//! runtime text nodes. This crate rewrites the source ahead of compilation so
//! those text nodes never come into existence, while keeping every other byte
//! and, where possible, the visual layout of the file intact.
//!
//! The pipeline is a pure function of `(source, dialect, config)`:
//!
//! 1. [`dialect`] parses the source with the dialect's tree-sitter grammar.
//! 2. [`tree`] lowers the CST into an index-addressed arena.
//! 3. [`scan`] walks the arena and collects whitespace-only gaps between
//!    sibling nodes.
//! 4. [`plan`] decides, per gap, whether to delete it or relocate its bytes
//!    across a tag delimiter, and emits a non-overlapping edit list.
//! 5. [`edit`] applies the edits in one pass.
//! 6. [`mapping`] builds (or rewrites) a sourcemap over the same edit list.
//!
//! Entry points live in [`transform`] and are re-exported at the crate root.

pub mod dialect;
pub mod edit;
pub mod mapping;
pub mod plan;
pub mod pos;
pub mod scan;
pub mod transform;
pub mod tree;

pub use dialect::Dialect;
pub use transform::{Config, TransformOutput, transform, transform_no_map, transform_remap};

/// Errors surfaced by the transform entry points.
///
/// Parse failures are recoverable from the caller's point of view: the input
/// is returned untouched or the file is skipped, at the caller's discretion.
/// The edit-list variants indicate an internal contract violation and exist so
/// that a broken plan can never silently corrupt output.
#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("{dialect} grammar produced no syntax tree")]
    Parse { dialect: Dialect },

    #[error("unknown dialect tag {0:?} (expected \"astro\" or \"svelte\")")]
    UnknownDialect(String),

    #[error("malformed edit: {0}")]
    BadEdit(String),

    #[error("overlapping edits: [{first_start},{first_end}) and [{second_start},{second_end})")]
    EditOverlap {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("sourcemap error: {0}")]
    SourceMap(#[from] sourcemap::Error),
}
