//! Token cursor with lookahead, backtracking and verbatim text capture

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};

/// Cursor over a scanned token stream
///
/// Keeps the source characters next to the tokens so that expressions and
/// code blocks can be captured exactly as written, comments included.
/// Whitespace and comments never reach the cursor; the scanner drops them.
pub struct TokenCursor {
    source: Vec<char>,
    tokens: Vec<Token>,
    current: usize,
}

impl TokenCursor {
    /// Creates a cursor over `tokens` scanned from `source`
    pub fn new(source: &str, mut tokens: Vec<Token>) -> Self {
        let source: Vec<char> = source.chars().collect();

        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.len()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(
                TokenKind::Eof,
                String::new(),
                line,
                column,
                source.len(),
                source.len(),
            ));
        }

        TokenCursor {
            source,
            tokens,
            current: 0,
        }
    }

    // Lookahead

    /// True once only the `Eof` token is left
    pub fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Next token, not consumed
    pub fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Last consumed token
    pub fn previous(&self) -> Option<&Token> {
        self.current
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
    }

    /// Check if the next token has the same kind as `kind` (payload ignored)
    pub fn peek_is(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    /// Check if the next token is the identifier `word`
    pub fn peek_word(&self, word: &str) -> bool {
        self.peek().is_word(word)
    }

    /// Remaining tokens, `Eof` included
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.current..]
    }

    // Consumption

    /// Consume the next token and return it
    pub fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
            self.tokens[self.current - 1].clone()
        } else {
            self.peek().clone()
        }
    }

    /// Consume the next token if it has `kind` and, when given, spells `literal`
    pub fn take_if(&mut self, kind: &TokenKind, literal: Option<&str>) -> Option<Token> {
        if !self.peek_is(kind) {
            return None;
        }
        if let Some(literal) = literal {
            if !token_equals(self.peek(), literal) {
                return None;
            }
        }
        Some(self.advance())
    }

    /// Consume the identifier `word` if it is next
    pub fn take_word_if(&mut self, word: &str) -> bool {
        if self.peek_word(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind`, or fail with an expected-vs-found error
    pub fn take(&mut self, kind: TokenKind) -> Result<Token> {
        if self.peek_is(&kind) {
            Ok(self.advance())
        } else {
            Err(self.expected_error(&kind.describe(), None))
        }
    }

    /// Consume the keyword `word`, or fail
    pub fn take_word(&mut self, word: &str) -> Result<Token> {
        if self.peek_word(word) {
            Ok(self.advance())
        } else {
            Err(self.expected_error(&format!("`{}`", word), None))
        }
    }

    /// Consume any identifier and return its text
    pub fn take_identifier(&mut self, what: &str) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.expected_error(what, None)),
        }
    }

    // Backtracking

    /// Save the current position
    pub fn checkpoint(&self) -> usize {
        self.current
    }

    /// Return to a saved position
    pub fn restore(&mut self, checkpoint: usize) {
        self.current = checkpoint.min(self.tokens.len() - 1);
    }

    // Forward scans

    /// Count tokens matching `counted` before the first token matching `stop`
    /// (or `Eof`). Does not move the cursor.
    pub fn count_forward_until<C, S>(&self, counted: C, stop: S) -> usize
    where
        C: Fn(&Token) -> bool,
        S: Fn(&Token) -> bool,
    {
        self.remaining()
            .iter()
            .take_while(|t| t.kind != TokenKind::Eof && !stop(t))
            .filter(|t| counted(t))
            .count()
    }

    /// Number of tokens up to and including the first one of `kind`;
    /// 0 when `Eof` comes first
    pub fn length_until(&self, kind: &TokenKind) -> usize {
        let target = std::mem::discriminant(kind);
        for (idx, token) in self.remaining().iter().enumerate() {
            if std::mem::discriminant(&token.kind) == target {
                return idx + 1;
            }
            if token.kind == TokenKind::Eof {
                break;
            }
        }
        0
    }

    /// Move forward until the next token is of `kind` (or `Eof`)
    pub fn advance_until(&mut self, kind: &TokenKind) {
        while !self.is_at_end() && !self.peek_is(kind) {
            self.current += 1;
        }
    }

    // Text capture

    /// Capture one expression verbatim.
    ///
    /// The expression runs up to the first `,` or `;` at nesting depth 0, an
    /// unbalanced closing delimiter, a code block delimiter or `Eof`.
    /// Parentheses, brackets and braces nest. Returns `None` when no token was
    /// consumed.
    pub fn parse_expression(&mut self) -> Option<String> {
        let first = self.current;
        let mut depth = 0usize;

        loop {
            let kind = &self.peek().kind;
            match kind {
                TokenKind::Eof | TokenKind::CodeOpen | TokenKind::CodeClose => break,
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => break,
                k if k.is_closer() => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                k if k.is_opener() => depth += 1,
                _ => {}
            }
            self.current += 1;
        }

        if self.current == first {
            return None;
        }

        let start = self.tokens[first].start;
        let end = self.tokens[self.current - 1].end;
        Some(self.text_between(start, end))
    }

    /// Source text between two char offsets
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.source.len());
        let start = start.min(end);
        self.source[start..end].iter().collect()
    }

    /// Char offset just past the last consumed token
    pub fn consumed_offset(&self) -> usize {
        self.previous().map(|t| t.end).unwrap_or(0)
    }

    // Errors

    /// Syntax error at the next token
    pub fn syntax_error(&self, message: impl Into<String>) -> Error {
        let token = self.peek();
        Error::SyntaxError {
            line: token.line,
            col: token.column,
            message: message.into(),
        }
    }

    /// Syntax error with the expected/found pattern
    pub fn expected_error(&self, expected: &str, hint: Option<&str>) -> Error {
        let token = self.peek();
        let mut message = format!("Expected {}, found {}", expected, token.kind.describe());

        if let Some(hint) = hint {
            message.push_str("\n\nHelp: ");
            message.push_str(hint);
        }

        self.syntax_error(message)
    }

    /// Invalid value error at `token`
    pub fn invalid_value(&self, token: &Token, message: impl Into<String>) -> Error {
        Error::InvalidValue {
            line: token.line,
            col: token.column,
            message: message.into(),
        }
    }

    /// Unexpected end of input while reading `context` that started at `token`
    pub fn eof_error(&self, token: &Token, context: &str) -> Error {
        Error::UnexpectedEof {
            line: token.line,
            col: token.column,
            context: context.to_string(),
        }
    }
}

/// Compare a token's spelling with `literal`
pub fn token_equals(token: &Token, literal: &str) -> bool {
    token.lexeme == literal
}

/// Owned text of a token: the decoded value for string literals, the
/// lexeme otherwise
pub fn token_text(token: &Token) -> String {
    match &token.kind {
        TokenKind::String(value) => value.clone(),
        _ => token.lexeme.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::InstrScanner;

    fn cursor(source: &str) -> TokenCursor {
        let tokens = InstrScanner::new(source).scan_tokens().unwrap();
        TokenCursor::new(source, tokens)
    }

    #[test]
    fn test_take_and_take_if() {
        let mut c = cursor("AT ( 1");

        assert!(c.take_if(&TokenKind::Identifier(String::new()), Some("ROTATED")).is_none());
        assert!(c.take_if(&TokenKind::Identifier(String::new()), Some("AT")).is_some());
        assert!(c.take(TokenKind::LeftParen).is_ok());

        let err = c.take(TokenKind::Comma).unwrap_err();
        assert!(err.to_string().contains("Expected `,`, found integer"));
    }

    #[test]
    fn test_expression_stops_at_depth_zero() {
        let mut c = cursor("sin(a, b) * 2, next");
        assert_eq!(c.parse_expression().as_deref(), Some("sin(a, b) * 2"));
        assert!(c.peek_is(&TokenKind::Comma));
    }

    #[test]
    fn test_expression_keeps_inner_comments() {
        let mut c = cursor("a /* mid */ + b /* tail */ )");
        assert_eq!(c.parse_expression().as_deref(), Some("a /* mid */ + b"));
        assert!(c.peek_is(&TokenKind::RightParen));
    }

    #[test]
    fn test_empty_expression() {
        let mut c = cursor(", x");
        assert_eq!(c.parse_expression(), None);
        assert_eq!(c.checkpoint(), 0);
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut c = cursor("A B C");
        let save = c.checkpoint();
        c.advance();
        c.advance();
        assert!(c.peek_word("C"));
        c.restore(save);
        assert!(c.peek_word("A"));
    }

    #[test]
    fn test_forward_scans() {
        let c = cursor("x ; y ; %} z ;");
        let semis = c.count_forward_until(
            |t| t.kind == TokenKind::Semicolon,
            |t| t.kind == TokenKind::CodeClose,
        );
        assert_eq!(semis, 2);
        assert_eq!(c.length_until(&TokenKind::CodeClose), 5);
        assert_eq!(c.length_until(&TokenKind::CodeOpen), 0);
    }

    #[test]
    fn test_advance_until() {
        let mut c = cursor("a b %} c");
        c.advance_until(&TokenKind::CodeClose);
        assert!(c.peek_is(&TokenKind::CodeClose));
        c.advance_until(&TokenKind::CodeOpen);
        assert!(c.is_at_end());
    }

    #[test]
    fn test_token_text() {
        let mut c = cursor("\"file.dat\" name");
        assert_eq!(token_text(&c.advance()), "file.dat");
        assert_eq!(token_text(&c.advance()), "name");
    }

    #[test]
    fn test_missing_eof_is_added() {
        let c = TokenCursor::new("", Vec::new());
        assert!(c.is_at_end());
    }
}
