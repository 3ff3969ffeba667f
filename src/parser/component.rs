//! One `COMPONENT` declaration or `%include` slot of the trace section

use super::ast::{CompDecl, ComponentSource, Rotation, TraceEntry};
use super::blocks::Delimiters;
use super::cursor::token_text;
use super::instrument::InstrParser;
use crate::error::Result;
use crate::lexer::TokenKind;

impl InstrParser {
    /// Parse one trace entry.
    ///
    /// ```text
    /// %include "<path>"
    /// | [SPLIT [n]] [REMOVABLE]
    ///   COMPONENT <name> = (COPY(<instance>) | <type>) ( <params> )
    ///   [WHEN ( <condition> )]
    ///   AT ( x, y, z ) <frame>
    ///   [ROTATED ( x, y, z ) <frame>]
    ///   [GROUP <name>]
    ///   [EXTEND %{ ... %}]
    /// ```
    pub(crate) fn parse_trace_entry(&mut self) -> Result<TraceEntry> {
        if self.cursor.take_if(&TokenKind::Percent, None).is_some() {
            self.cursor.take_word("include")?;
            let path = self.cursor.take(TokenKind::String(String::new()))?;
            tracing::debug!(path = %token_text(&path), "parsed %include");
            return Ok(TraceEntry::Include(token_text(&path)));
        }

        self.parse_component().map(TraceEntry::Component)
    }

    fn parse_component(&mut self) -> Result<CompDecl> {
        let split = self.parse_split()?;
        let removable = self.cursor.take_word_if("REMOVABLE");

        self.cursor.take_word("COMPONENT")?;
        let name = self.cursor.take_identifier("component instance name")?;
        self.cursor.take(TokenKind::Assign)?;
        let source = self.parse_component_source()?;

        self.cursor.take(TokenKind::LeftParen)?;
        let params = self.parse_comp_params()?;
        self.cursor.take(TokenKind::RightParen)?;

        let when = if self.cursor.take_word_if("WHEN") {
            self.capture_block(&Delimiters::PARENS, true, false)?
        } else {
            None
        };

        self.cursor.take_word("AT")?;
        let at = self.parse_placement_vector()?;
        let at_frame = self.parse_frame()?;

        let rotation = if self.cursor.take_word_if("ROTATED") {
            let angles = self.parse_placement_vector()?;
            let frame = self.parse_frame()?;
            Some(Rotation { angles, frame })
        } else {
            None
        };

        let group = if self.cursor.take_word_if("GROUP") {
            Some(self.cursor.take_identifier("group name")?)
        } else {
            None
        };

        let extend = if self.cursor.take_word_if("EXTEND") {
            self.capture_block(&Delimiters::CODE, true, false)?
        } else {
            None
        };

        tracing::debug!(component = %name, params = params.len(), "parsed component");

        Ok(CompDecl {
            name,
            source,
            params,
            when,
            at,
            at_frame,
            rotation,
            group,
            extend,
            removable,
            split,
        })
    }

    /// `SPLIT [n]`: 0 when absent, 1 without a count, otherwise a positive `n`
    fn parse_split(&mut self) -> Result<u32> {
        if !self.cursor.take_word_if("SPLIT") {
            return Ok(0);
        }

        let count = match self.cursor.peek().kind {
            TokenKind::Integer(n) => n,
            _ => return Ok(1),
        };
        let token = self.cursor.advance();

        match u32::try_from(count) {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(self
                .cursor
                .invalid_value(&token, "Expected a positive integer")),
        }
    }

    /// `COPY(<instance>)` or a component type name
    fn parse_component_source(&mut self) -> Result<ComponentSource> {
        let type_name = self.cursor.take_identifier("component type or `COPY`")?;
        if type_name != "COPY" {
            return Ok(ComponentSource::Type(type_name));
        }

        self.cursor.take(TokenKind::LeftParen)?;
        let instance = self.cursor.take_identifier("component instance to copy")?;
        self.cursor.take(TokenKind::RightParen)?;

        Ok(ComponentSource::Copy(instance))
    }
}
