//! Parallel parsing of instrument folders
//!
//! Files are discovered with walkdir, sorted for deterministic output and
//! parsed on a Rayon pool. Every file is parsed independently: one file
//! failing never affects the tree of another.

use crate::config::{BatchConfig, ParseOptions};
use crate::error::{Error, Result};
use crate::parser::{InstrDef, InstrParser};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of parsing one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileParse {
    /// Path the source was read from
    pub path: PathBuf,
    /// Parsed tree or the error that aborted the parse
    pub result: Result<InstrDef>,
}

impl FileParse {
    /// Whether the file parsed cleanly
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Find instrument files under `root`, sorted by path.
///
/// Only regular files whose extension equals `config.extension` are
/// returned. Subdirectories are searched when `config.recursive` is set.
pub fn discover<P: AsRef<Path>>(root: P, config: &BatchConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut walker = WalkDir::new(root);
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).display().to_string();
            Error::Io {
                path,
                message: e.to_string(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext == config.extension.as_str())
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "discovered instrument files");
    Ok(files)
}

/// Read and parse a single instrument file
pub fn parse_file<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<InstrDef> {
    let path = path.as_ref();
    let source =
        std::fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), &e))?;

    tracing::trace!(path = %path.display(), bytes = source.len(), "parsing file");
    InstrParser::from_source(&source, options)?.parse()
}

/// Parse many files in parallel, preserving the order of `paths`.
///
/// With `fail_fast` the first failure is returned as the error; otherwise
/// every file gets a [`FileParse`] and failures are logged.
pub fn parse_files(paths: &[PathBuf], config: &BatchConfig) -> Result<Vec<FileParse>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_parallelism.max(1).min(paths.len()))
        .build()
        .map_err(|e| Error::Batch(format!("Failed to create thread pool: {}", e)))?;

    let parse_one = |path: &PathBuf| FileParse {
        path: path.clone(),
        result: parse_file(path, config.options),
    };

    let results = pool.install(|| {
        if config.fail_fast {
            paths
                .par_iter()
                .map(|path| {
                    parse_file(path, config.options).map(|instr| FileParse {
                        path: path.clone(),
                        result: Ok(instr),
                    })
                })
                .collect::<Result<Vec<FileParse>>>()
        } else {
            Ok(paths.par_iter().map(parse_one).collect::<Vec<FileParse>>())
        }
    })?;

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    for parsed in &results {
        if let Err(err) = &parsed.result {
            tracing::warn!(path = %parsed.path.display(), error = %err, "failed to parse");
        }
    }
    tracing::info!(files = results.len(), failed, "batch parse finished");

    Ok(results)
}

/// Discover and parse every instrument file under `root`
pub fn parse_folder<P: AsRef<Path>>(root: P, config: &BatchConfig) -> Result<Vec<FileParse>> {
    let files = discover(root, config)?;
    parse_files(&files, config)
}
