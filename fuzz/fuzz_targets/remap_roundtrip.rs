#![no_main]

use gapstrip::{Config, Dialect, transform, transform_remap};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    for dialect in [Dialect::Astro, Dialect::Svelte] {
        let config = Config::default();

        // Build a fresh map, then feed it back through the remap path.
        // Both corrupt and valid maps must come back as Ok/Err, never a crash.
        if let Ok(created) = transform(&source, "fuzz.in", dialect, &config) {
            let _ = transform_remap(&source, &created.map, dialect, &config);

            let corrupted = if created.map.len() > 2 {
                // The map embeds source contents, so halving the byte length
                // may land inside a UTF-8 sequence; back up to a boundary.
                let mut cut = created.map.len() / 2;
                while !created.map.is_char_boundary(cut) {
                    cut -= 1;
                }
                created.map[..cut].to_string()
            } else {
                "{".to_string()
            };
            let _ = transform_remap(&source, &corrupted, dialect, &config);
        }
    }
});
