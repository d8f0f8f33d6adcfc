use std::{fs, path::PathBuf};

use clap::Parser;
use gapstrip::{Dialect, dialect, tree::SyntaxTree};

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
#[command(name = "parse")]
#[command(about = "Parse a template and dump the lowered syntax tree", long_about = None)]
struct Args {
    /// Path to the source file to parse
    input: PathBuf,

    /// Override the dialect instead of inferring it from the file extension
    #[arg(long, short)]
    dialect: Option<DialectArg>,

    /// Print the raw tree-sitter S-expression instead of the lowered arena
    #[arg(long, short)]
    sexp: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let dialect: Dialect = if let Some(dialect) = args.dialect {
        dialect.into()
    } else {
        let ext = args
            .input
            .extension()
            .and_then(|e| e.to_str())
            .ok_or("cannot infer dialect: no file extension and --dialect not provided")?;
        ext.parse()
            .map_err(|_| std::io::Error::other(format!("cannot infer dialect from extension .{ext}")))?
    };

    let source = fs::read_to_string(&args.input)?;
    let ts = dialect::parse(&source, dialect).map_err(std::io::Error::other)?;

    if args.sexp {
        println!("{}", ts.root_node().to_sexp());
    } else {
        let tree = SyntaxTree::lower(&ts, dialect);
        println!("{}", serde_json::to_string_pretty(&tree)?);
    }

    Ok(())
}
