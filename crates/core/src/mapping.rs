//! Sourcemap construction and rewriting.
//!
//! Both paths walk the applied edit list in lockstep with the rewritten
//! output:
//!
//! - [`build`] fabricates a fresh map from scratch, mapping the output back to
//!   the pre-transform input (with the input embedded as source contents);
//! - [`remap`] threads an existing map (from an earlier compile step) through
//!   the edits, so tooling keeps resolving to the true original sources.
//!
//! Mapping model: unedited bytes map 1:1; moved bytes map through each edit's
//! per-byte origin list; inserted bytes are emitted as explicitly unmapped.
//! Moved delimiter suffixes get extra anchors (at the suffix start, its last
//! byte, and the byte after the edit) so a relocated `>` or `-->` never
//! inherits or leaks mappings across the following token.
//!
//! Everything here is deterministic: identical `(input, edits)` produce
//! byte-identical serialized maps. If `output` disagrees with what the edits
//! imply (which would be a planner bug), the map covers the common prefix
//! rather than failing.

use std::cmp::Ordering;

use sourcemap::{SourceMap, SourceMapBuilder};

use crate::{TransformError, edit::Edit, pos::PositionIndex};

/// Sentinel line/column for unmapped positions.
const NO_POSITION: u32 = u32::MAX;

/// One destination-to-source point mapping.
#[derive(Debug, Clone, Copy)]
struct Mapping<'a> {
    dst_line: u32,
    dst_col: u32,
    src_line: u32,
    src_col: u32,
    source: Option<&'a str>,
    name: Option<&'a str>,
}

/// Create a fresh sourcemap for `output`, mapping back to `input`.
pub(crate) fn build(
    input: &str,
    output: &str,
    source_name: &str,
    edits: &[Edit],
) -> Result<String, TransformError> {
    let in_index = PositionIndex::new(input);
    let out_index = PositionIndex::new(output);

    let (spans, expected_len) = output_spans(input.len(), edits);
    let map_len = output.len().min(expected_len);
    let (out_to_in, _) = offset_maps(input.len(), map_len, edits, &spans);

    let mut mappings: Vec<Mapping<'_>> = Vec::new();

    // Anchor every output line start so whole-line lookups resolve even far
    // away from any edit.
    for &line_start in out_index.line_starts() {
        if line_start >= map_len {
            break;
        }
        mappings.push(fresh_anchor(
            line_start,
            &out_index,
            &in_index,
            &out_to_in,
            source_name,
        ));
    }

    for (edit, &(out_start, out_end)) in edits.iter().zip(&spans) {
        let mut anchors: Vec<usize> = Vec::new();
        if out_start < map_len {
            anchors.push(out_start);
        }
        if edit.moved_suffix_len > 0 {
            if out_end >= edit.moved_suffix_len {
                let suffix_start = out_end - edit.moved_suffix_len;
                if suffix_start < map_len {
                    anchors.push(suffix_start);
                }
                // Multi-byte delimiters also anchor their final byte so the
                // trailing `>` of `-->` maps to its own origin.
                if edit.moved_suffix_len > 1 && out_end - 1 < map_len {
                    anchors.push(out_end - 1);
                }
            }
            if out_end < map_len {
                anchors.push(out_end);
            }
        }
        for out_byte in anchors {
            mappings.push(fresh_anchor(
                out_byte,
                &out_index,
                &in_index,
                &out_to_in,
                source_name,
            ));
        }
    }

    sort_dedup(&mut mappings);
    serialize(&mappings, Some((source_name, input)))
}

/// Rewrite `input_map_json` (a map for `input`) so it applies to `output`.
///
/// Tokens whose position was deleted by an edit are dropped; inserted bytes
/// come out unmapped. Columns are UTF-16 code units on both sides.
pub(crate) fn remap(
    input: &str,
    output: &str,
    input_map_json: &str,
    edits: &[Edit],
) -> Result<String, TransformError> {
    let input_map = SourceMap::from_slice(input_map_json.as_bytes())?;

    let in_index = PositionIndex::new(input);
    let out_index = PositionIndex::new(output);

    let (spans, expected_len) = output_spans(input.len(), edits);
    let map_len = output.len().min(expected_len);
    let (out_to_in, in_to_out) = offset_maps(input.len(), map_len, edits, &spans);

    let mut mappings: Vec<Mapping<'_>> = Vec::new();

    for token in input_map.tokens() {
        let Some(in_byte) =
            in_index.byte_of(token.get_dst_line() as usize, token.get_dst_col() as usize)
        else {
            continue;
        };
        let Some(out_byte) = in_to_out.get(in_byte).copied().flatten() else {
            // The byte this token pointed at no longer exists in the output.
            continue;
        };
        let (dst_line, dst_col) = out_index.position_of(out_byte);
        mappings.push(Mapping {
            dst_line: dst_line as u32,
            dst_col: dst_col as u32,
            src_line: token.get_src_line(),
            src_col: token.get_src_col(),
            source: token.get_source(),
            name: token.get_name(),
        });
    }

    // Re-anchor around moved delimiter suffixes, looking each position up in
    // the incoming map.
    for (edit, &(out_start, out_end)) in edits.iter().zip(&spans) {
        if edit.moved_suffix_len == 0 {
            continue;
        }
        let mut anchors: Vec<usize> = Vec::new();
        if out_start < map_len {
            anchors.push(out_start);
        }
        if out_end >= edit.moved_suffix_len {
            let suffix_start = out_end - edit.moved_suffix_len;
            if suffix_start < map_len {
                anchors.push(suffix_start);
            }
            if edit.moved_suffix_len > 1 && out_end - 1 < map_len {
                anchors.push(out_end - 1);
            }
        }
        if out_end < map_len {
            anchors.push(out_end);
        }
        for out_byte in anchors {
            mappings.push(remap_anchor(
                out_byte,
                &out_index,
                &in_index,
                &out_to_in,
                &input_map,
            ));
        }
    }

    sort_dedup(&mut mappings);
    serialize(&mappings, None)
}

/// Resolve one output byte into a fresh-map anchor.
fn fresh_anchor<'a>(
    out_byte: usize,
    out_index: &PositionIndex,
    in_index: &PositionIndex,
    out_to_in: &[Option<usize>],
    source_name: &'a str,
) -> Mapping<'a> {
    let (dst_line, dst_col) = out_index.position_of(out_byte);
    match out_to_in.get(out_byte).copied().flatten() {
        Some(in_byte) => {
            let (src_line, src_col) = in_index.position_of(in_byte);
            Mapping {
                dst_line: dst_line as u32,
                dst_col: dst_col as u32,
                src_line: src_line as u32,
                src_col: src_col as u32,
                source: Some(source_name),
                name: None,
            }
        }
        None => unmapped(dst_line as u32, dst_col as u32),
    }
}

/// Resolve one output byte into an anchor by consulting the incoming map.
fn remap_anchor<'a>(
    out_byte: usize,
    out_index: &PositionIndex,
    in_index: &PositionIndex,
    out_to_in: &[Option<usize>],
    input_map: &'a SourceMap,
) -> Mapping<'a> {
    let (dst_line, dst_col) = out_index.position_of(out_byte);
    let Some(in_byte) = out_to_in.get(out_byte).copied().flatten() else {
        return unmapped(dst_line as u32, dst_col as u32);
    };
    let (src_line, src_col) = in_index.position_of(in_byte);
    match input_map.lookup_token(src_line as u32, src_col as u32) {
        Some(token) => Mapping {
            dst_line: dst_line as u32,
            dst_col: dst_col as u32,
            src_line: token.get_src_line(),
            src_col: token.get_src_col(),
            source: token.get_source(),
            name: token.get_name(),
        },
        None => unmapped(dst_line as u32, dst_col as u32),
    }
}

fn unmapped(dst_line: u32, dst_col: u32) -> Mapping<'static> {
    Mapping {
        dst_line,
        dst_col,
        src_line: NO_POSITION,
        src_col: NO_POSITION,
        source: None,
        name: None,
    }
}

/// Each edit's span in the output, plus the output length the edits imply.
fn output_spans(input_len: usize, edits: &[Edit]) -> (Vec<(usize, usize)>, usize) {
    let mut spans = Vec::with_capacity(edits.len());
    let mut delta = 0isize;
    for edit in edits {
        let out_start = (edit.start as isize + delta) as usize;
        let out_end = out_start + edit.replacement.len();
        spans.push((out_start, out_end));
        delta += edit.replacement.len() as isize - edit.replaced_len() as isize;
    }
    let expected_len = (input_len as isize + delta).max(0) as usize;
    (spans, expected_len)
}

/// Byte-level correspondence in both directions.
///
/// `out_to_in[ob] = Some(ib)` means output byte `ob` came from input byte
/// `ib`; `in_to_out` is the reverse. `None` marks inserted respectively
/// deleted bytes. Both maps are best-effort within `output_len`.
fn offset_maps(
    input_len: usize,
    output_len: usize,
    edits: &[Edit],
    spans: &[(usize, usize)],
) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
    let mut out_to_in: Vec<Option<usize>> = vec![None; output_len];
    let mut in_to_out: Vec<Option<usize>> = vec![None; input_len];

    let mut link = |ib: usize, ob: usize| {
        if ib < input_len && ob < output_len {
            out_to_in[ob] = Some(ib);
            in_to_out[ib] = Some(ob);
        }
    };

    let mut in_cursor = 0usize;
    let mut out_cursor = 0usize;

    for (edit, &(out_start, out_end)) in edits.iter().zip(spans) {
        for i in 0..edit.start.saturating_sub(in_cursor) {
            link(in_cursor + i, out_cursor + i);
        }
        out_cursor = out_start;
        for (offset, origin) in edit.origins.iter().copied().enumerate() {
            if let Some(ib) = origin {
                link(ib, out_cursor + offset);
            }
        }
        in_cursor = edit.end;
        out_cursor = out_end;
    }

    for (i, ib) in (in_cursor..input_len).enumerate() {
        link(ib, out_cursor + i);
    }

    (out_to_in, in_to_out)
}

/// Order mappings by destination and collapse duplicates, preferring mapped
/// entries over unmapped ones at the same position.
fn sort_dedup(mappings: &mut Vec<Mapping<'_>>) {
    mappings.sort_by(|a, b| {
        match (a.dst_line, a.dst_col).cmp(&(b.dst_line, b.dst_col)) {
            Ordering::Equal => {
                let a_mapped = a.src_line != NO_POSITION;
                let b_mapped = b.src_line != NO_POSITION;
                b_mapped.cmp(&a_mapped)
            }
            other => other,
        }
    });
    mappings.dedup_by(|a, b| a.dst_line == b.dst_line && a.dst_col == b.dst_col);
}

/// Serialize mappings as sourcemap JSON. For fresh maps, `inline_source`
/// carries the source name and its full contents.
fn serialize(
    mappings: &[Mapping<'_>],
    inline_source: Option<(&str, &str)>,
) -> Result<String, TransformError> {
    let mut builder = SourceMapBuilder::new(None);
    if let Some((name, contents)) = inline_source {
        let id = builder.add_source(name);
        builder.set_source_contents(id, Some(contents));
    }
    for m in mappings {
        // Point mappings only; spans are implied by adjacent entries.
        builder.add(
            m.dst_line, m.dst_col, m.src_line, m.src_col, m.source, m.name, false,
        );
    }
    let map = builder.into_sourcemap();
    let mut buf: Vec<u8> = Vec::new();
    map.to_writer(&mut buf)?;
    Ok(String::from_utf8(buf).expect("sourcemap JSON must be utf-8"))
}
