use super::token::{Token, TokenKind};
use crate::error::{Error, Result};

/// Two-character operators kept together as one `Symbol` token
const COMPOUND_SYMBOLS: &[&str] = &[
    "->", "&&", "||", "++", "--", "<=", ">=", "!=", "+=", "-=", "*=", "/=", "<<", ">>", "::",
    "##",
];

/// Scanner for McStas instrument source
///
/// Produces the whole token stream up front. Verbatim C code inside `%{ %}`
/// blocks goes through the same scanner, so unknown characters never fail:
/// they become `Symbol` tokens.
pub struct InstrScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Line where the current token started
    start_line: usize,
    /// Column where the current token started
    start_column: usize,
}

impl InstrScanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        InstrScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// The last token is always `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
            self.current,
            self.current,
        ));

        tracing::trace!(count = self.tokens.len(), "scanned instrument source");
        Ok(std::mem::take(&mut self.tokens))
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' | '\n' | '\x0c' => {}

            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else if self.match_char('*') {
                    self.skip_block_comment()?;
                } else {
                    self.scan_symbol(c);
                }
            }

            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '[' => self.add_token(TokenKind::LeftBracket),
            ']' => self.add_token(TokenKind::RightBracket),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            ';' => self.add_token(TokenKind::Semicolon),

            '%' => {
                if self.match_char('{') {
                    self.add_token(TokenKind::CodeOpen);
                } else if self.match_char('}') {
                    self.add_token(TokenKind::CodeClose);
                } else {
                    self.add_token(TokenKind::Percent);
                }
            }

            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Symbol("==".to_string()));
                } else {
                    self.add_token(TokenKind::Assign);
                }
            }

            '"' => self.scan_string()?,
            '\'' => self.scan_char()?,

            c if c.is_ascii_digit() => self.scan_number(false),
            '.' if self.peek().is_ascii_digit() => self.scan_number(true),

            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),

            c if c.is_whitespace() => {}

            _ => self.scan_symbol(c),
        }

        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(self.unterminated("block comment"))
    }

    fn scan_string(&mut self) -> Result<()> {
        let value = self.scan_quoted('"', "string literal")?;
        self.add_token(TokenKind::String(value));
        Ok(())
    }

    fn scan_char(&mut self) -> Result<()> {
        let value = self.scan_quoted('\'', "character literal")?;
        self.add_token(TokenKind::Char(value));
        Ok(())
    }

    /// Reads up to the closing `quote`, decoding the common C escapes.
    /// Unknown escapes are kept verbatim with their backslash.
    fn scan_quoted(&mut self, quote: char, context: &str) -> Result<String> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            let c = self.advance();
            if c != '\\' {
                value.push(c);
                continue;
            }
            if self.is_at_end() {
                break;
            }
            match self.advance() {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '0' => value.push('\0'),
                '\\' => value.push('\\'),
                '"' => value.push('"'),
                '\'' => value.push('\''),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            }
        }

        if self.is_at_end() {
            return Err(self.unterminated(context));
        }

        self.advance(); // closing quote
        Ok(value)
    }

    fn scan_number(&mut self, leading_dot: bool) {
        let mut is_float = leading_dot;
        let mut suffixed = false;

        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if !is_float && self.peek() == '.' {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if matches!(self.peek(), 'e' | 'E') {
            let next = self.peek_next();
            let signed_digit = matches!(next, '+' | '-') && self.peek_at(2).is_ascii_digit();
            if next.is_ascii_digit() || signed_digit {
                is_float = true;
                self.advance();
                if signed_digit {
                    self.advance();
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        // C suffixes (1.0f, 10UL) and radix prefixes (0x1F)
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            suffixed = true;
            self.advance();
        }

        let text = self.current_text();
        let kind = if suffixed {
            TokenKind::Number(text)
        } else if is_float {
            match text.parse::<f64>() {
                Ok(value) => TokenKind::Float(value),
                Err(_) => TokenKind::Number(text),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => TokenKind::Integer(value),
                Err(_) => TokenKind::Number(text),
            }
        };

        self.add_token(kind);
    }

    fn scan_identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.current_text();
        self.add_token(TokenKind::Identifier(text));
    }

    fn scan_symbol(&mut self, first: char) {
        let second = self.peek();
        if second != '\0' {
            let pair: String = [first, second].iter().collect();
            if COMPOUND_SYMBOLS.contains(&pair.as_str()) {
                self.advance();
            }
        }

        let text = self.current_text();
        self.add_token(TokenKind::Symbol(text));
    }

    fn unterminated(&self, context: &str) -> Error {
        Error::UnexpectedEof {
            line: self.start_line,
            col: self.start_column,
            context: context.to_string(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.source
            .get(self.current + offset)
            .copied()
            .unwrap_or('\0')
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn current_text(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.current_text();
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.start_line,
            self.start_column,
            self.start,
            self.current,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = InstrScanner::new(source);
        scanner
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_component_line() {
        let tokens = kinds("COMPONENT a = Arm() AT (0, 0, 0.5) ABSOLUTE");

        assert_eq!(tokens.len(), 16);
        assert_eq!(tokens[0], TokenKind::Identifier("COMPONENT".to_string()));
        assert_eq!(tokens[2], TokenKind::Assign);
        assert_eq!(tokens[4], TokenKind::LeftParen);
        assert_eq!(tokens[5], TokenKind::RightParen);
        assert_eq!(tokens[12], TokenKind::Float(0.5));
        assert_eq!(tokens[15], TokenKind::Eof);
    }

    #[test]
    fn test_code_block_delimiters() {
        let tokens = kinds("DECLARE %{ double x = 5 % 2; %}");

        assert_eq!(tokens[1], TokenKind::CodeOpen);
        assert!(tokens.contains(&TokenKind::Percent));
        assert_eq!(tokens[tokens.len() - 2], TokenKind::CodeClose);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = kinds("// header\nTRACE /* block\n comment */ END");

        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("TRACE".to_string()),
                TokenKind::Identifier("END".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let mut scanner = InstrScanner::new("DEFINE\n  INSTRUMENT T");
        let tokens = scanner.scan_tokens().unwrap();

        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].start, tokens[2].end), (20, 21));
        assert_eq!(tokens[1].lexeme, "INSTRUMENT");
    }

    #[test]
    fn test_string_and_char_literals() {
        let tokens = kinds(r#"%include "sub/part.instr" 'a' "tab\there""#);

        assert_eq!(tokens[0], TokenKind::Percent);
        assert_eq!(tokens[2], TokenKind::String("sub/part.instr".to_string()));
        assert_eq!(tokens[3], TokenKind::Char("a".to_string()));
        assert_eq!(tokens[4], TokenKind::String("tab\there".to_string()));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 1e-3 .5 2.0f 0xff");

        assert_eq!(tokens[0], TokenKind::Integer(42));
        assert_eq!(tokens[1], TokenKind::Float(0.001));
        assert_eq!(tokens[2], TokenKind::Float(0.5));
        assert_eq!(tokens[3], TokenKind::Number("2.0f".to_string()));
        assert_eq!(tokens[4], TokenKind::Number("0xff".to_string()));
    }

    #[test]
    fn test_c_operators_never_fail() {
        let tokens = kinds("#include <math.h>\nif (p->x != 0 && !flag) y = ~z;");

        assert_eq!(tokens[0], TokenKind::Symbol("#".to_string()));
        assert!(tokens.contains(&TokenKind::Symbol("->".to_string())));
        assert!(tokens.contains(&TokenKind::Symbol("!=".to_string())));
        assert!(tokens.contains(&TokenKind::Symbol("&&".to_string())));
        assert!(tokens.contains(&TokenKind::Symbol("~".to_string())));
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = InstrScanner::new("x = \"never closed");
        let err = scanner.scan_tokens().unwrap_err();

        assert!(matches!(
            err,
            Error::UnexpectedEof { line: 1, col: 5, ref context } if context == "string literal"
        ));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut scanner = InstrScanner::new("TRACE /* open");
        assert!(matches!(
            scanner.scan_tokens(),
            Err(Error::UnexpectedEof { .. })
        ));
    }
}
