use std::{fs, path::PathBuf};

use clap::Parser;
use gapstrip::{Config, Dialect, transform, transform_no_map, transform_remap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum DialectArg {
    Astro,
    Svelte,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Astro => Dialect::Astro,
            DialectArg::Svelte => Dialect::Svelte,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "transform")]
#[command(about = "Strip inter-node whitespace from a template file", long_about = None)]
struct Args {
    /// Path to the source file to transform
    input: PathBuf,

    /// Output path for the transformed source (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Output path for the sourcemap (defaults to <out>.map if --out is set)
    #[arg(long)]
    out_map: Option<PathBuf>,

    /// Rewrite this existing sourcemap instead of creating a fresh one
    #[arg(long)]
    input_map: Option<PathBuf>,

    /// Override the dialect instead of inferring it from the file extension
    #[arg(long, short)]
    dialect: Option<DialectArg>,

    /// Preserve blank-line gaps ("\n\n" / "\r\n\r\n") between nodes
    #[arg(long)]
    preserve_blank_lines: bool,
}

fn infer_dialect(args: &Args) -> Result<Dialect, std::io::Error> {
    if let Some(dialect) = args.dialect {
        return Ok(dialect.into());
    }
    match args.input.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext
            .parse()
            .map_err(|_| std::io::Error::other(format!("cannot infer dialect from extension .{ext}"))),
        None => Err(std::io::Error::other(
            "cannot infer dialect: no file extension and --dialect not provided",
        )),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;
    let dialect = infer_dialect(&args)?;
    let config = Config {
        preserve_blank_lines: args.preserve_blank_lines,
    };

    let out_map_path = args.out_map.clone().or_else(|| {
        args.out
            .as_ref()
            .map(|out| PathBuf::from(format!("{}.map", out.display())))
    });

    let code = match (&out_map_path, &args.input_map) {
        (Some(map_path), Some(input_map)) => {
            let input_map = fs::read_to_string(input_map)?;
            let res = transform_remap(&source, &input_map, dialect, &config)
                .map_err(std::io::Error::other)?;
            fs::write(map_path, res.map)?;
            res.code
        }
        (Some(map_path), None) => {
            let source_name = args
                .input
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or("input file must have a valid filename")?;
            let res = transform(&source, source_name, dialect, &config)
                .map_err(std::io::Error::other)?;
            fs::write(map_path, res.map)?;
            res.code
        }
        (None, _) => transform_no_map(&source, dialect, &config).map_err(std::io::Error::other)?,
    };

    match &args.out {
        None => print!("{code}"),
        Some(out) => fs::write(out, code)?,
    }

    Ok(())
}
