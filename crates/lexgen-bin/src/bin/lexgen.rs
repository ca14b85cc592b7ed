use std::{path::PathBuf, process::exit};

use anyhow::Context;
use clap::Parser;
use lexgen::{generate, load_tables, GenOptions, GenRequest};
use log::LevelFilter;

/// Expands the `///LEX_*` markers of a lexer template from keyword and symbol tables.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Directory containing the lex.hpp and lex.cpp templates.
    template_dir: PathBuf,

    /// Directory containing keywords.def and symbols.def.
    #[arg(short, long, default_value = ".")]
    config: PathBuf,

    /// Where the generated lex.hpp and lex.cpp are written.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Variable holding the accumulated identifier text.
    #[arg(long, default_value = "buffer")]
    buffer: String,

    /// Variable the keyword check assigns to.
    #[arg(long, default_value = "t")]
    result: String,

    /// Input stream used to read and unread the lookahead character.
    #[arg(long, default_value = "reader")]
    reader: String,

    /// Token returned when a symbol prefix matches nothing.
    #[arg(long, default_value = "t_none")]
    no_match: String,

    /// Raw text buffer that also receives the second character of two-character symbols.
    #[arg(long)]
    capture: Option<String>,

    /// Log progress (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

fn start(args: Args) -> anyhow::Result<()> {
    let tables = load_tables(&args.config)
        .with_context(|| format!("failed to load token tables from {}", args.config.display()))?;

    let request = GenRequest {
        template_dir: args.template_dir,
        out_dir: args.out_dir,
        tables,
        options: GenOptions {
            buffer_var: args.buffer,
            result_var: args.result,
            reader_var: args.reader,
            no_match_token: args.no_match,
            capture_buffer: args.capture,
        },
    };

    generate(&request).with_context(|| {
        format!(
            "failed to generate lexer from {}",
            request.template_dir.display()
        )
    })?;

    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = start(args) {
        eprintln!("error: {:#}", e);
        exit(1);
    }
}
