//! Lexical analysis for instrument files
//!
//! Converts source text into a stream of tokens that keep their char
//! offsets, so the parser can slice verbatim text back out of the source.

mod scanner;
mod token;

pub use scanner::InstrScanner;
pub use token::{Token, TokenKind};
