use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
    /// Char offset of the first character in the source
    pub start: usize,
    /// Char offset one past the last character in the source
    pub end: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(
        kind: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
        start: usize,
        end: usize,
    ) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
            start,
            end,
        }
    }

    /// Number of source characters covered by the token
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True only for the zero-width end of file marker
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this is an identifier spelled exactly `word`
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(name) if name == word)
    }
}

/// All token types of the instrument language
///
/// The scanner has no keywords: `DEFINE`, `COMPONENT`, `AT` and friends are
/// plain identifiers, recognised by the parser by spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    Integer(i64),
    /// Floating-point literal
    Float(f64),
    /// Numeric literal with a C suffix or radix prefix (`10UL`, `0xff`)
    Number(String),
    /// String literal, escapes decoded, without quotes
    String(String),
    /// Character literal, without quotes
    Char(String),

    /// Identifier or keyword
    Identifier(String),

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left bracket [
    LeftBracket,
    /// Right bracket ]
    RightBracket,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Opening code block delimiter %{
    CodeOpen,
    /// Closing code block delimiter %}
    CodeClose,
    /// Percent sign of a directive such as `%include`
    Percent,
    /// Comma delimiter
    Comma,
    /// Semicolon delimiter
    Semicolon,
    /// Assignment operator (=)
    Assign,
    /// Any other operator or punctuation (`==`, `->`, `*`, `#`, ...)
    Symbol(String),

    // Special
    /// End of file marker
    Eof,
}

impl TokenKind {
    /// Check if token opens a nesting level inside expressions
    pub fn is_opener(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace
        )
    }

    /// Check if token closes a nesting level inside expressions
    pub fn is_closer(&self) -> bool {
        matches!(
            self,
            TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
        )
    }

    /// Human-readable name used in error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LeftParen => "`(`".to_string(),
            TokenKind::RightParen => "`)`".to_string(),
            TokenKind::LeftBracket => "`[`".to_string(),
            TokenKind::RightBracket => "`]`".to_string(),
            TokenKind::LeftBrace => "`{`".to_string(),
            TokenKind::RightBrace => "`}`".to_string(),
            TokenKind::CodeOpen => "`%{`".to_string(),
            TokenKind::CodeClose => "`%}`".to_string(),
            TokenKind::Percent => "`%`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Semicolon => "`;`".to_string(),
            TokenKind::Assign => "`=`".to_string(),
            TokenKind::Integer(_) => "integer".to_string(),
            TokenKind::Float(_) | TokenKind::Number(_) => "number".to_string(),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Char(_) => "character literal".to_string(),
            TokenKind::Identifier(name) => format!("identifier `{}`", name),
            TokenKind::Symbol(s) => format!("`{}`", s),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Float(fl) => write!(f, "{}", fl),
            TokenKind::Number(text) => write!(f, "{}", text),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Char(c) => write!(f, "'{}'", c),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Symbol(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.describe().trim_matches('`')),
        }
    }
}
