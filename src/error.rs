//! Error types for instrument parsing

use thiserror::Error;

/// Instrument parser errors
///
/// Parsing aborts on the first error; there is no recovery and no partial
/// tree is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Syntax error encountered during scanning or parsing
    ///
    /// **Triggered by:** An expected token or keyword that is not there
    /// **Example:** `COMPONENT a Arm() AT (0,0,0) ABSOLUTE` (missing `=`)
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        col: usize,
        /// Error description
        message: String,
    },

    /// A value is present but not acceptable
    ///
    /// **Triggered by:** Well-formed syntax carrying an invalid value
    /// **Example:** `SPLIT 0 COMPONENT ...` (split count must be positive)
    #[error("Invalid value at line {line}, column {col}: {message}")]
    InvalidValue {
        /// Line number where error occurred
        line: usize,
        /// Column number where error occurred
        col: usize,
        /// Error description
        message: String,
    },

    /// Input ended before a required terminator
    ///
    /// **Triggered by:** Unterminated `%{` blocks, string literals or comments
    #[error("Unexpected end of file at line {line}, column {col} while reading {context}")]
    UnexpectedEof {
        /// Line number where the unterminated construct started
        line: usize,
        /// Column number where the unterminated construct started
        col: usize,
        /// What was being read
        context: String,
    },

    /// Source file could not be read
    #[error("Cannot read {path}: {message}")]
    Io {
        /// Path of the file
        path: String,
        /// Error message from the OS
        message: String,
    },

    /// Batch parsing could not be set up
    #[error("Batch error: {0}")]
    Batch(String),
}

impl Error {
    /// Create a syntax error at a position
    pub fn syntax(line: usize, col: usize, message: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            col,
            message: message.into(),
        }
    }

    /// Create an I/O error for a path
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Line and column of the error, if it points into source text
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::SyntaxError { line, col, .. }
            | Error::InvalidValue { line, col, .. }
            | Error::UnexpectedEof { line, col, .. } => Some((*line, *col)),
            Error::Io { .. } | Error::Batch(_) => None,
        }
    }

    /// Render the error the way a compiler would: message, offending line,
    /// and a caret under the column.
    pub fn render(&self, source: &str) -> String {
        let mut out = self.to_string();

        let Some((line, col)) = self.position() else {
            return out;
        };
        let Some(text) = source.lines().nth(line.saturating_sub(1)) else {
            return out;
        };

        let gutter = line.to_string();
        out.push('\n');
        out.push_str(&format!("{} | {}\n", gutter, text));
        out.push_str(&format!(
            "{} | {}^",
            " ".repeat(gutter.len()),
            " ".repeat(col.saturating_sub(1))
        ));
        out
    }
}

/// Result type for instrument parsing
pub type Result<T> = std::result::Result<T, Error>;
