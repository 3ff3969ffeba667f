//! Parse one instrument file and print its tree
//!
//! Run with: cargo run --example parse_file -- path/to/file.instr [--json]
//! Set RUST_LOG=mcinstr=debug to see parser progress.

use anyhow::{bail, Context};
use mcinstr::{dump, parse_instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcinstr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: parse_file <file.instr> [--json]");
    };
    let json = args.any(|arg| arg == "--json");

    let source =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;

    let instr = match parse_instrument(&source) {
        Ok(instr) => instr,
        Err(e) => {
            eprintln!("{}", e.render(&source));
            bail!("{} failed to parse", path);
        }
    };

    if json {
        println!("{}", dump::to_json(&instr)?);
    } else {
        print!("{}", dump::render(&instr));
    }

    Ok(())
}
