//! Verbatim text block capture

use super::instrument::InstrParser;
use crate::error::Result;
use crate::lexer::TokenKind;

/// Start and end delimiter of a verbatim block
#[derive(Debug, Clone, PartialEq)]
pub struct Delimiters {
    /// Opening delimiter
    pub open: TokenKind,
    /// Closing delimiter
    pub close: TokenKind,
}

impl Delimiters {
    /// `%{ ... %}` code blocks
    pub const CODE: Delimiters = Delimiters {
        open: TokenKind::CodeOpen,
        close: TokenKind::CodeClose,
    };

    /// `( ... )` condition blocks
    pub const PARENS: Delimiters = Delimiters {
        open: TokenKind::LeftParen,
        close: TokenKind::RightParen,
    };
}

impl InstrParser {
    /// Capture the source text between a pair of delimiters.
    ///
    /// With `consume_open` the opening delimiter is required and consumed
    /// first; without it the caller already consumed it and capture starts
    /// right after the last consumed token. The text is trimmed on both ends.
    /// A block without tokens yields `None`. With `restore` the cursor is put
    /// back where it was, so the same span can be parsed again.
    ///
    /// Nested delimiter pairs are tracked unless `ParseOptions::nested_blocks`
    /// is off, in which case the first closing delimiter ends the block.
    pub(crate) fn capture_block(
        &mut self,
        delims: &Delimiters,
        consume_open: bool,
        restore: bool,
    ) -> Result<Option<String>> {
        let save = self.cursor.checkpoint();

        let anchor = if consume_open {
            self.cursor.take(delims.open.clone())?
        } else {
            match self.cursor.previous() {
                Some(open) => open.clone(),
                None => self.cursor.peek().clone(),
            }
        };
        let text_start = self.cursor.consumed_offset();

        let mut depth = 0usize;
        let mut inner_tokens = 0usize;
        loop {
            if self.cursor.is_at_end() {
                return Err(self.cursor.eof_error(&anchor, "verbatim block"));
            }
            if self.cursor.peek_is(&delims.close) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if self.options.nested_blocks && self.cursor.peek_is(&delims.open) {
                depth += 1;
            }
            self.cursor.advance();
            inner_tokens += 1;
        }

        let close = self.cursor.advance();
        let text = if inner_tokens == 0 {
            None
        } else {
            let raw = self.cursor.text_between(text_start, close.start);
            Some(raw.trim().to_string())
        };

        if restore {
            self.cursor.restore(save);
        }

        tracing::trace!(tokens = inner_tokens, restore, "captured verbatim block");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::error::Error;

    fn parser(source: &str) -> InstrParser {
        InstrParser::from_source(source, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_code_block_is_trimmed() {
        let mut p = parser("%{\n   x = 1;\n   y = 2;   \n%} NEXT");
        let text = p.capture_block(&Delimiters::CODE, true, false).unwrap();

        assert_eq!(text.as_deref(), Some("x = 1;\n   y = 2;"));
        assert!(p.cursor.peek_word("NEXT"));
    }

    #[test]
    fn test_empty_block_is_none() {
        let mut p = parser("%{ %} NEXT");
        assert_eq!(p.capture_block(&Delimiters::CODE, true, false).unwrap(), None);
        assert!(p.cursor.peek_word("NEXT"));
    }

    #[test]
    fn test_comment_only_block_is_none() {
        let mut p = parser("%{ /* nothing here */ %}");
        assert_eq!(p.capture_block(&Delimiters::CODE, true, false).unwrap(), None);
    }

    #[test]
    fn test_restore_allows_second_pass() {
        let mut p = parser("%{ double a; %}");
        let text = p.capture_block(&Delimiters::CODE, true, true).unwrap();

        assert_eq!(text.as_deref(), Some("double a;"));
        assert!(p.cursor.peek_is(&TokenKind::CodeOpen));
    }

    #[test]
    fn test_without_start_delimiter() {
        let mut p = parser("( a > 0 ) NEXT");
        p.cursor.advance();
        let text = p.capture_block(&Delimiters::PARENS, false, false).unwrap();

        assert_eq!(text.as_deref(), Some("a > 0"));
        assert!(p.cursor.peek_word("NEXT"));
    }

    #[test]
    fn test_nested_parens_are_tracked() {
        let mut p = parser("((a > 0) && (b < 1)) AT");
        let text = p.capture_block(&Delimiters::PARENS, true, false).unwrap();

        assert_eq!(text.as_deref(), Some("(a > 0) && (b < 1)"));
        assert!(p.cursor.peek_word("AT"));
    }

    #[test]
    fn test_flat_blocks_stop_at_first_closer() {
        let mut p = InstrParser::from_source("((a > 0) && b) AT", ParseOptions::flat_blocks())
            .unwrap();
        let text = p.capture_block(&Delimiters::PARENS, true, false).unwrap();

        assert_eq!(text.as_deref(), Some("(a > 0"));
        assert!(p.cursor.peek_is(&TokenKind::Symbol(String::new())));
    }

    #[test]
    fn test_missing_terminator_is_fatal() {
        let mut p = parser("%{ int x;\n x = 2;");
        let err = p.capture_block(&Delimiters::CODE, true, false).unwrap_err();

        assert!(matches!(err, Error::UnexpectedEof { line: 1, col: 1, .. }));
    }

    #[test]
    fn test_unterminated_block_points_at_consumed_opener() {
        let mut p = parser("x\n  ( a > 0 AT");
        p.cursor.advance();
        p.cursor.advance();
        let err = p.capture_block(&Delimiters::PARENS, false, false).unwrap_err();

        assert!(matches!(err, Error::UnexpectedEof { line: 2, col: 3, .. }));
    }

    #[test]
    fn test_missing_start_delimiter() {
        let mut p = parser("NEXT %{ %}");
        assert!(matches!(
            p.capture_block(&Delimiters::CODE, true, false),
            Err(Error::SyntaxError { .. })
        ));
    }
}
