use super::ast::{CodeBlock, InstrDef, MemberBlock};
use super::blocks::Delimiters;
use super::cursor::TokenCursor;
use crate::config::ParseOptions;
use crate::error::Result;
use crate::lexer::{InstrScanner, Token, TokenKind};

/// Recursive descent parser for McStas instrument files
///
/// One parser parses one file. The grammar is driven top to bottom with
/// one-token lookahead; backtracking only happens for the dual capture of
/// `DECLARE` and `USERVARS`. The first error aborts the parse.
pub struct InstrParser {
    pub(super) cursor: TokenCursor,
    pub(super) options: ParseOptions,
}

impl InstrParser {
    /// Creates a parser over tokens scanned from `source`
    pub fn new(source: &str, tokens: Vec<Token>) -> Self {
        Self::with_options(source, tokens, ParseOptions::default())
    }

    /// Creates a parser with explicit grammar options
    pub fn with_options(source: &str, tokens: Vec<Token>, options: ParseOptions) -> Self {
        InstrParser {
            cursor: TokenCursor::new(source, tokens),
            options,
        }
    }

    /// Scans `source` and creates a parser over the result
    pub fn from_source(source: &str, options: ParseOptions) -> Result<Self> {
        let tokens = InstrScanner::new(source).scan_tokens()?;
        Ok(Self::with_options(source, tokens, options))
    }

    /// Parses a complete instrument definition
    ///
    /// ```text
    /// DEFINE INSTRUMENT <name> ( <params> )
    /// [DECLARE %{ ... %}]
    /// [USERVARS %{ ... %}]
    /// [INITIALIZE %{ ... %}]
    /// TRACE <components>
    /// [FINALLY %{ ... %}]
    /// [END]
    /// ```
    pub fn parse(&mut self) -> Result<InstrDef> {
        self.cursor.take_word("DEFINE")?;
        self.cursor.take_word("INSTRUMENT")?;
        let name = self.cursor.take_identifier("instrument name")?;

        self.cursor.take(TokenKind::LeftParen)?;
        let params = self.parse_instr_params()?;
        self.cursor.take(TokenKind::RightParen)?;
        tracing::debug!(instrument = %name, params = params.len(), "parsed header");

        let mut instr = InstrDef {
            name,
            params,
            ..InstrDef::default()
        };

        if self.cursor.take_word_if("DECLARE") {
            instr.declare = self.parse_member_block()?;
            tracing::debug!(members = instr.declare.members.len(), "parsed DECLARE");
        }

        if self.cursor.take_word_if("USERVARS") {
            instr.uservars = self.parse_member_block()?;
            tracing::debug!(members = instr.uservars.members.len(), "parsed USERVARS");
        }

        if self.cursor.take_word_if("INITIALIZE") {
            instr.init = self.parse_code_block()?;
            tracing::debug!("parsed INITIALIZE");
        }

        self.cursor.take_word("TRACE")?;
        instr.trace = self.parse_trace()?;

        if self.cursor.take_word_if("FINALLY") {
            instr.finalize = self.parse_code_block()?;
            tracing::debug!("parsed FINALLY");
        }

        self.cursor.take_word_if("END");

        Ok(instr)
    }

    /// `%{ members %}`, captured both as raw text and as members
    fn parse_member_block(&mut self) -> Result<MemberBlock> {
        let text = self.capture_block(&Delimiters::CODE, true, true)?;

        self.cursor.take(TokenKind::CodeOpen)?;
        let members = self.parse_struct_members()?;
        self.cursor.take(TokenKind::CodeClose)?;

        Ok(MemberBlock { text, members })
    }

    fn parse_code_block(&mut self) -> Result<CodeBlock> {
        let text = self.capture_block(&Delimiters::CODE, true, false)?;
        Ok(CodeBlock { text })
    }
}
