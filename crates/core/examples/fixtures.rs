use std::{fs, path::PathBuf};

use clap::Parser;
use gapstrip::{Config, Dialect, transform_no_map};

#[derive(Parser, Debug)]
#[command(name = "fixtures")]
#[command(about = "Validate or regenerate the golden fixture outputs", long_about = None)]
struct Args {
    /// Write the .out. files instead of validating them
    #[arg(long, short)]
    write: bool,

    /// Path to the fixtures directory
    #[arg(long, default_value = "fixtures")]
    dir: PathBuf,
}

fn dialect_for(filename: &str) -> Option<Dialect> {
    if filename.ends_with(".astro") {
        Some(Dialect::Astro)
    } else if filename.ends_with(".svelte") {
        Some(Dialect::Svelte)
    } else {
        None
    }
}

fn out_name(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}.out.{ext}"),
        None => format!("{filename}.out"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut inputs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(&args.dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if filename.contains(".out.") || dialect_for(filename).is_none() {
            continue;
        }
        inputs.push(path);
    }
    inputs.sort();

    let mut failures = 0usize;
    for path in inputs {
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let dialect = dialect_for(filename).expect("filtered above");
        let source = fs::read_to_string(&path)?;

        let actual = transform_no_map(&source, dialect, &Config::default())
            .map_err(std::io::Error::other)?;
        let out_path = path.with_file_name(out_name(filename));

        if args.write {
            fs::write(&out_path, &actual)?;
            println!("wrote {}", out_path.display());
        } else {
            let expected = fs::read_to_string(&out_path)?;
            if actual == expected {
                println!("ok    {filename}");
            } else {
                println!("FAIL  {filename}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} fixture(s) out of date").into());
    }
    Ok(())
}
