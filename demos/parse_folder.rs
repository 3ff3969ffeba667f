//! Parse every instrument file in a folder in parallel
//!
//! Run with: cargo run --example parse_folder -- path/to/folder [--recursive]

use anyhow::bail;
use mcinstr::{parse_folder, BatchConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcinstr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(root) = args.iter().find(|arg| !arg.starts_with("--")) else {
        bail!("usage: parse_folder <folder> [--recursive]");
    };

    let config = BatchConfig {
        recursive: args.iter().any(|arg| arg == "--recursive"),
        ..Default::default()
    };
    info!("Parsing {} with {} threads", root, config.max_parallelism);

    let results = parse_folder(root, &config)?;
    let mut failed = 0;
    for parsed in &results {
        match &parsed.result {
            Ok(instr) => println!(
                "ok    {}  {} ({} components)",
                parsed.path.display(),
                instr.name,
                instr.components().count()
            ),
            Err(e) => {
                failed += 1;
                println!("error {}  {}", parsed.path.display(), e);
            }
        }
    }

    println!("\n{} files, {} failed", results.len(), failed);
    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, results.len());
    }
    Ok(())
}
