use std::path::PathBuf;

use gapstrip::{Config, Dialect, transform, transform_no_map};

const CASES: &[(&str, &str)] = &[
    ("simple.astro", "simple.out.astro"),
    ("text.astro", "text.out.astro"),
    ("blank.astro", "blank.out.astro"),
    ("raw.astro", "raw.out.astro"),
    ("unicode.astro", "unicode.out.astro"),
    ("simple.svelte", "simple.out.svelte"),
    ("list.svelte", "list.out.svelte"),
];

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("read fixture")
}

fn dialect_for(filename: &str) -> Dialect {
    if filename.ends_with(".astro") {
        Dialect::Astro
    } else if filename.ends_with(".svelte") {
        Dialect::Svelte
    } else {
        panic!("unknown fixture extension: {filename}")
    }
}

#[test]
fn fixtures_match_expected_output() {
    for &(input_name, expected_name) in CASES {
        let input = read_fixture(input_name);
        let expected = read_fixture(expected_name);
        let dialect = dialect_for(input_name);

        let actual = transform_no_map(&input, dialect, &Config::default()).unwrap();
        assert_eq!(actual, expected, "fixture mismatch: {input_name}");

        // Re-applying to already-stripped output must be a no-op.
        let again = transform_no_map(&actual, dialect, &Config::default()).unwrap();
        assert_eq!(again, actual, "not idempotent: {input_name}");
    }
}

#[test]
fn fixtures_emit_parseable_sourcemaps() {
    for &(input_name, expected_name) in CASES {
        let input = read_fixture(input_name);
        let expected = read_fixture(expected_name);
        let dialect = dialect_for(input_name);

        let res = transform(&input, input_name, dialect, &Config::default()).unwrap();
        assert_eq!(res.code, expected, "code mismatch: {input_name}");

        let map = sourcemap::SourceMap::from_slice(res.map.as_bytes())
            .expect("sourcemap JSON must parse");
        assert_eq!(map.get_source(0), Some(input_name));
    }
}

#[test]
fn fixture_maps_resolve_into_the_original_input() {
    for &(input_name, _) in CASES {
        let input = read_fixture(input_name);
        let dialect = dialect_for(input_name);

        let res = transform(&input, input_name, dialect, &Config::default()).unwrap();
        let map = sourcemap::SourceMap::from_slice(res.map.as_bytes()).unwrap();

        let input_lines: Vec<&str> = input.split('\n').collect();
        for token in map.tokens() {
            let line = token.get_src_line();
            if line == u32::MAX {
                continue;
            }
            let line = line as usize;
            assert!(line < input_lines.len(), "src line out of range: {input_name}");
            let utf16_len: usize = input_lines[line]
                .trim_end_matches('\r')
                .chars()
                .map(char::len_utf16)
                .sum();
            assert!(
                (token.get_src_col() as usize) <= utf16_len,
                "src col out of range: {input_name}"
            );
        }
    }
}

#[test]
fn fixtures_are_deterministic_across_calls() {
    for &(input_name, _) in CASES {
        let input = read_fixture(input_name);
        let dialect = dialect_for(input_name);

        let first = transform(&input, input_name, dialect, &Config::default()).unwrap();
        let second = transform(&input, input_name, dialect, &Config::default()).unwrap();
        assert_eq!(first.code, second.code, "code differs: {input_name}");
        assert_eq!(first.map, second.map, "map differs: {input_name}");
    }
}
