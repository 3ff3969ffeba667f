//! Parser and batch configuration

/// Grammar compatibility switches for a single parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Track nested delimiter pairs when capturing verbatim blocks.
    ///
    /// With `false` the first end delimiter closes the block, so
    /// `WHEN ((a > 0) && b)` captures only `(a > 0`.
    pub nested_blocks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            nested_blocks: true,
        }
    }
}

impl ParseOptions {
    /// Options with flat block capture
    pub fn flat_blocks() -> Self {
        Self {
            nested_blocks: false,
        }
    }
}

/// Configuration for parsing a folder of instrument files
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// File extension to pick up, without the dot
    pub extension: String,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Maximum number of files parsed concurrently (default: num_cpus)
    pub max_parallelism: usize,
    /// Stop at the first failing file instead of reporting all of them
    pub fail_fast: bool,
    /// Options applied to every file
    pub options: ParseOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: "instr".to_string(),
            recursive: false,
            max_parallelism: num_cpus::get(),
            fail_fast: false,
            options: ParseOptions::default(),
        }
    }
}
