//! # mcinstr - McStas instrument definition parser
//!
//! Parses McStas instrument files (`.instr`) into a typed syntax tree. The
//! crate is the front end of an instrument toolchain: it reads the header,
//! the declaration blocks, the verbatim code sections and the component
//! trace, and leaves every embedded C expression or code fragment as text.
//!
//! ## Quick Start
//!
//! ```rust
//! use mcinstr::{parse_instrument, Frame};
//!
//! # fn main() -> mcinstr::Result<()> {
//! let source = r#"
//! DEFINE INSTRUMENT Simple(double L = 1.5, n = 3)
//! DECLARE
//! %{
//!   double speed = 0;
//! %}
//! TRACE
//! COMPONENT origin = Progress_bar() AT (0, 0, 0) ABSOLUTE
//! COMPONENT slit = Slit(xwidth = 0.01, yheight = 0.02) AT (0, 0, L) RELATIVE origin
//! END
//! "#;
//!
//! let instr = parse_instrument(source)?;
//!
//! assert_eq!(instr.name, "Simple");
//! assert_eq!(instr.params[1].effective_type(), "double");
//! assert_eq!(instr.declare.members[0].default_value.as_deref(), Some("0"));
//!
//! let slit = instr.component("slit").unwrap();
//! assert_eq!(slit.param("yheight"), Some("0.02"));
//! assert_eq!(slit.at_frame, Frame::Relative("origin".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ### Step by step
//!
//! ```rust
//! use mcinstr::{Parser, Scanner};
//!
//! # fn main() -> mcinstr::Result<()> {
//! let source = "DEFINE INSTRUMENT T() TRACE COMPONENT a = Arm() AT (0,0,0) ABSOLUTE END";
//!
//! let tokens = Scanner::new(source).scan_tokens()?;
//! let mut parser = Parser::new(source, tokens);
//! let instr = parser.parse()?;
//!
//! assert_eq!(instr.trace.entries.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Text → Scanner → Tokens → Parser → InstrDef → dump / emit
//! ```
//!
//! - [`Scanner`] - Tokenizes instrument source, including `%{ %}` delimiters
//! - [`Parser`] - Recursive descent over the token stream
//! - [`InstrDef`] - The syntax tree
//! - [`dump`] - Diagnostic text and JSON rendering
//! - [`emit`] - Instrument source generation from a tree
//! - [`batch`] - Parallel parsing of many files
//!
//! ## Error Handling
//!
//! The first grammar violation aborts the parse with a positioned [`Error`]:
//!
//! ```rust
//! let source = "DEFINE INSTRUMENT T() TRACE COMPONENT a = Arm() AT (0,0,0) SIDEWAYS";
//! let err = mcinstr::parse_instrument(source).unwrap_err();
//!
//! assert_eq!(err.position(), Some((1, 60)));
//! assert!(err.to_string().contains("Expected RELATIVE [compname/PREVIOUS] or ABSOLUTE"));
//! ```
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

/// Version of the parser
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod batch;
pub mod config;
pub mod dump;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export main types
pub use batch::{discover, parse_file, parse_files, parse_folder, FileParse};
pub use config::{BatchConfig, ParseOptions};
pub use error::{Error, Result};
pub use lexer::{InstrScanner, Token, TokenKind};
pub use parser::{
    CodeBlock, CompDecl, CompParam, ComponentSource, DeclareDef, FinalizeDef, Frame,
    InitializeDef, InstrDef, InstrParam, InstrParser, MemberBlock, Rotation, StructMember,
    TraceDef, TraceEntry, UservarsDef, Vector3,
};

/// Type alias for the instrument scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = InstrScanner;

/// Type alias for the instrument parser.
/// Converts tokens into an [`InstrDef`].
pub type Parser = InstrParser;

/// Parse a complete instrument from source text with default options
pub fn parse_instrument(source: &str) -> Result<InstrDef> {
    parse_instrument_with(source, ParseOptions::default())
}

/// Parse a complete instrument from source text
pub fn parse_instrument_with(source: &str, options: ParseOptions) -> Result<InstrDef> {
    InstrParser::from_source(source, options)?.parse()
}
