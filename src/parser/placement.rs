//! Position/rotation vectors and their coordinate frames

use super::ast::{Frame, Vector3};
use super::instrument::InstrParser;
use crate::error::{Error, Result};
use crate::lexer::TokenKind;

impl InstrParser {
    /// Parse `x, y, z)`: three expressions and the mandatory closing `)`.
    /// The opening `(` belongs to the caller.
    pub(crate) fn parse_vector3(&mut self) -> Result<Vector3> {
        let x = self.vector_element()?;
        self.cursor.take(TokenKind::Comma)?;
        let y = self.vector_element()?;
        self.cursor.take(TokenKind::Comma)?;
        let z = self.vector_element()?;
        self.cursor.take(TokenKind::RightParen)?;

        Ok(Vector3 { x, y, z })
    }

    /// Parse `(x, y, z)` after `AT` or `ROTATED`; the opening `(` may be left out
    pub(crate) fn parse_placement_vector(&mut self) -> Result<Vector3> {
        self.cursor.take_if(&TokenKind::LeftParen, None);
        self.parse_vector3()
    }

    fn vector_element(&mut self) -> Result<String> {
        match self.cursor.parse_expression() {
            Some(value) => Ok(value),
            None => Err(self.cursor.syntax_error("Expected value")),
        }
    }

    /// Parse `ABSOLUTE` or `RELATIVE <component>`; both keywords match
    /// regardless of case.
    pub(crate) fn parse_frame(&mut self) -> Result<Frame> {
        let keyword = self.cursor.peek().clone();
        let word = self
            .cursor
            .take_identifier("`ABSOLUTE` or `RELATIVE <component>`")?;

        if word.eq_ignore_ascii_case("ABSOLUTE") {
            Ok(Frame::Absolute)
        } else if word.eq_ignore_ascii_case("RELATIVE") {
            let target = self.cursor.take_identifier("component name after `RELATIVE`")?;
            Ok(Frame::Relative(target))
        } else {
            Err(Error::syntax(
                keyword.line,
                keyword.column,
                format!(
                    "Expected RELATIVE [compname/PREVIOUS] or ABSOLUTE, found {}",
                    keyword.kind.describe()
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn parser(source: &str) -> InstrParser {
        InstrParser::from_source(source, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_vector_with_expressions() {
        let mut p = parser("(0, -d/2, L + sin(th)) RELATIVE arm");
        let v = p.parse_placement_vector().unwrap();

        assert_eq!(v, Vector3::new("0", "-d/2", "L + sin(th)"));
        assert_eq!(p.parse_frame().unwrap(), Frame::Relative("arm".to_string()));
    }

    #[test]
    fn test_vector_missing_element() {
        let mut p = parser("(0, , 1)");
        let err = p.parse_placement_vector().unwrap_err();

        assert!(matches!(err, Error::SyntaxError { col: 5, ref message, .. }
            if message == "Expected value"));
    }

    #[test]
    fn test_vector_requires_closing_paren() {
        let mut p = parser("(0, 0, 0 ABSOLUTE");
        assert!(p.parse_placement_vector().is_err());
    }

    #[test]
    fn test_vector_two_elements_is_fatal() {
        let mut p = parser("(0, 0) ABSOLUTE");
        let err = p.parse_placement_vector().unwrap_err();
        assert!(err.to_string().contains("Expected `,`, found `)`"));
    }

    #[test]
    fn test_frame_keywords_ignore_case() {
        assert_eq!(parser("absolute").parse_frame().unwrap(), Frame::Absolute);
        assert_eq!(
            parser("Relative PREVIOUS").parse_frame().unwrap(),
            Frame::Relative("PREVIOUS".to_string())
        );
    }

    #[test]
    fn test_relative_without_target() {
        let err = parser("RELATIVE (").parse_frame().unwrap_err();
        assert!(err.to_string().contains("component name after `RELATIVE`"));
    }

    #[test]
    fn test_unknown_frame_keyword() {
        let err = parser("ABOVE arm").parse_frame().unwrap_err();
        assert!(err
            .to_string()
            .contains("Expected RELATIVE [compname/PREVIOUS] or ABSOLUTE"));
    }
}
