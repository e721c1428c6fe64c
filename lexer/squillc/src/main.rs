//! Squill lexer CLI
//!
//! Reads SQL from a file (or stdin with `-`), feeds it through the
//! two-layer pipeline in chunks, and prints one token per line. The chunk
//! size is configurable so the suspension path gets exercised on real
//! input; `--trace` turns on the protocol-level trace events.

use std::io::Read;

use squill_lexer::{LexError, Pipeline, Progress, Token};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut chunk_size = 4096usize;
    let mut trace = false;
    let mut path: Option<&str> = None;

    for arg in args.iter().skip(1) {
        if let Some(value) = arg.strip_prefix("--chunk=") {
            match value.parse::<usize>() {
                Ok(size) if size > 0 => chunk_size = size,
                _ => {
                    eprintln!("error: --chunk wants a positive integer, got {value:?}");
                    std::process::exit(1);
                }
            }
        } else if arg == "--trace" {
            trace = true;
        } else if arg == "--help" || arg == "-h" {
            print_usage();
            return;
        } else if arg == "-" || !arg.starts_with('-') {
            if path.is_some() {
                eprintln!("error: more than one input given");
                std::process::exit(1);
            }
            path = Some(arg.as_str());
        } else {
            eprintln!("error: unknown option {arg}");
            print_usage();
            std::process::exit(1);
        }
    }

    init_tracing(trace);

    let Some(path) = path else {
        print_usage();
        std::process::exit(1);
    };

    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {path}: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = lex_source(&source, chunk_size) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: squill [options] <file.sql | ->");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --chunk=<n>   Feed the lexer <n> characters at a time (default 4096)");
    eprintln!("  --trace       Log every matcher protocol step to stderr");
    eprintln!("  -h, --help    Show this help");
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("squill_lexer_core=trace,squill_lexer=trace,squillc=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Feed the pipeline chunk by chunk, printing tokens as they complete.
fn lex_source(source: &str, chunk_size: usize) -> Result<(), LexError> {
    let mut pipeline = Pipeline::new();
    let mut chars = source.chars();
    let mut count = 0usize;
    loop {
        let chunk: String = chars.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            pipeline.end();
        } else {
            tracing::debug!(chars = chunk.chars().count(), "feeding chunk");
            pipeline.feed(&chunk);
        }
        loop {
            match pipeline.poll()? {
                Progress::Token(token) => {
                    print_token(&token);
                    count += 1;
                }
                Progress::NeedInput => break,
                Progress::Done => {
                    tracing::debug!(tokens = count, "stream complete");
                    return Ok(());
                }
            }
        }
    }
}

fn print_token(token: &Token) {
    println!(
        "{:>4}..{:<4} {:<26} {:?}",
        token.span.start,
        token.span.end,
        token.name.as_str(),
        token.value()
    );
}
