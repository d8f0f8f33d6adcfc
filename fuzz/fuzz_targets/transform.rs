#![no_main]

use gapstrip::{Config, Dialect, transform};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    for dialect in [Dialect::Astro, Dialect::Svelte] {
        for preserve_blank_lines in [false, true] {
            let config = Config {
                preserve_blank_lines,
            };
            let source_name = match dialect {
                Dialect::Astro => "input.astro",
                Dialect::Svelte => "input.svelte",
            };

            if let Ok(out) = transform(&source, source_name, dialect, &config) {
                // A successful transform must always ship valid JSON; a panic
                // here is exactly what the fuzzer is hunting for.
                let _ = serde_json::from_str::<serde_json::Value>(&out.map)
                    .expect("map must be valid JSON when transform returns Ok");
            }
        }
    }
});
