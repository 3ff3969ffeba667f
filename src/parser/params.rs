//! Instrument and component parameter lists

use super::ast::{CompParam, InstrParam};
use super::instrument::InstrParser;
use crate::error::Result;
use crate::lexer::{Token, TokenKind};

impl InstrParser {
    /// Parse `[type] name [= default]` entries up to the closing `)`.
    ///
    /// A lone identifier is the name. When two identifiers follow each other
    /// the first one is the type: `double p1, p2 = 3` gives `p1` the type
    /// `double` and leaves `p2` with the implicit one.
    pub(crate) fn parse_instr_params(&mut self) -> Result<Vec<InstrParam>> {
        let mut params = Vec::with_capacity(count_comma_separated(self.cursor.remaining()));

        while !self.cursor.peek_is(&TokenKind::RightParen) && !self.cursor.is_at_end() {
            let first = self.cursor.take_identifier("parameter name")?;

            let (type_name, name) = match &self.cursor.peek().kind {
                TokenKind::Identifier(second) => {
                    let second = second.clone();
                    self.cursor.advance();
                    (Some(first), second)
                }
                _ => (None, first),
            };

            let default_value = if self.cursor.take_if(&TokenKind::Assign, None).is_some() {
                match self.cursor.parse_expression() {
                    Some(value) => Some(value),
                    None => return Err(self.cursor.expected_error("parameter value", None)),
                }
            } else {
                None
            };

            params.push(InstrParam {
                name,
                type_name,
                default_value,
            });

            if self.cursor.take_if(&TokenKind::Comma, None).is_none() {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `name = value` entries up to the closing `)`; the value is
    /// mandatory and the comma after the last entry optional.
    pub(crate) fn parse_comp_params(&mut self) -> Result<Vec<CompParam>> {
        let mut params = Vec::with_capacity(count_comma_separated(self.cursor.remaining()));

        while !self.cursor.peek_is(&TokenKind::RightParen) && !self.cursor.is_at_end() {
            let name = self.cursor.take_identifier("parameter name")?;

            if self.cursor.take_if(&TokenKind::Assign, None).is_none() {
                return Err(self.cursor.expected_error(
                    "`=`",
                    Some("Component parameters are passed by name: `xwidth = 0.1`"),
                ));
            }

            let value = match self.cursor.parse_expression() {
                Some(value) => value,
                None => return Err(self.cursor.expected_error("parameter value", None)),
            };

            params.push(CompParam { name, value });

            if self.cursor.take_if(&TokenKind::Comma, None).is_none() {
                break;
            }
        }

        Ok(params)
    }
}

/// Count comma separated expression groups before the `)` closing the list.
///
/// Delimiters inside the groups nest, so `a = f(1, 2), b = [3, 4]` counts
/// as two.
pub fn count_comma_separated(tokens: &[Token]) -> usize {
    let mut depth = 0usize;
    let mut count = 0usize;
    let mut pending = false;

    for token in tokens {
        match &token.kind {
            TokenKind::Eof | TokenKind::CodeOpen | TokenKind::CodeClose => break,
            k if k.is_closer() => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            k if k.is_opener() => {
                depth += 1;
                pending = true;
            }
            TokenKind::Comma if depth == 0 => {
                if pending {
                    count += 1;
                }
                pending = false;
            }
            _ => pending = true,
        }
    }

    if pending {
        count += 1;
    }
    count
}
