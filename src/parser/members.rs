//! `type name [= default]` member lists of DECLARE and USERVARS blocks

use super::ast::StructMember;
use super::instrument::InstrParser;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Member being accumulated between terminators
#[derive(Default)]
struct MemberBuilder {
    type_name: Option<String>,
    name: Option<String>,
    default_value: Option<String>,
}

impl MemberBuilder {
    /// Builder for the next name after a comma: same type, nothing else
    fn repeat_type(&self) -> Self {
        MemberBuilder {
            type_name: self.type_name.clone(),
            ..MemberBuilder::default()
        }
    }
}

impl InstrParser {
    /// Parse the body of a member list up to (not including) `%}`.
    ///
    /// `int a, b = 2;` declares two `int` members: a comma keeps the type and
    /// clears name and default. Tokens other than identifiers, `=`, `,` and
    /// `;` (pointer stars, array sizes) are skipped.
    pub(crate) fn parse_struct_members(&mut self) -> Result<Vec<StructMember>> {
        let mut members = Vec::with_capacity(self.count_members());
        let mut member = MemberBuilder::default();

        loop {
            let token = self.cursor.peek().clone();
            match &token.kind {
                TokenKind::Eof | TokenKind::CodeClose => break,

                TokenKind::Semicolon => {
                    self.cursor.advance();
                    if let Some(done) = Self::finish_member(member) {
                        members.push(done);
                    }
                    member = MemberBuilder::default();
                }

                TokenKind::Comma => {
                    self.cursor.advance();
                    let next = member.repeat_type();
                    if let Some(done) = Self::finish_member(member) {
                        members.push(done);
                    }
                    member = next;
                }

                TokenKind::Assign => {
                    if member.type_name.is_none() || member.name.is_none() {
                        return Err(self.cursor.syntax_error("Unexpected assignment"));
                    }
                    self.cursor.advance();
                    match self.cursor.parse_expression() {
                        Some(value) => member.default_value = Some(value),
                        None => return Err(self.cursor.expected_error("value", None)),
                    }
                }

                TokenKind::Identifier(word) => {
                    if member.type_name.is_some() && member.name.is_some() {
                        return Err(self.cursor.expected_error("`=`, `,` or `;`", None));
                    }
                    if member.type_name.is_some() {
                        member.name = Some(word.clone());
                    } else {
                        member.type_name = Some(word.clone());
                    }
                    self.cursor.advance();
                }

                _ => {
                    self.cursor.advance();
                }
            }
        }

        Ok(members)
    }

    /// A lone identifier before the terminator is the type; the member is
    /// kept without a name.
    fn finish_member(member: MemberBuilder) -> Option<StructMember> {
        let type_name = member.type_name?;
        Some(StructMember {
            type_name,
            name: member.name,
            default_value: member.default_value,
        })
    }

    /// Upper bound on the number of members before the closing `%}`
    pub(crate) fn count_members(&self) -> usize {
        self.cursor.count_forward_until(
            |t| matches!(t.kind, TokenKind::Semicolon | TokenKind::Comma),
            |t| t.kind == TokenKind::CodeClose,
        )
    }
}
