#![no_main]

use gapstrip::{Config, Dialect, transform_no_map};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast and avoid OOM in pathological
    // cases.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    // Parse errors are expected outcomes and must never crash.
    for dialect in [Dialect::Astro, Dialect::Svelte] {
        for preserve_blank_lines in [false, true] {
            let config = Config {
                preserve_blank_lines,
            };
            let _ = transform_no_map(&source, dialect, &config);
        }
    }
});
