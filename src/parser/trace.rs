//! The TRACE section: components in placement order

use super::ast::TraceDef;
use super::instrument::InstrParser;
use crate::error::Result;

/// Keywords that close the component list
const TRACE_TERMINATORS: &[&str] = &["FINALLY", "FINALIZE", "END"];

impl InstrParser {
    /// Parse trace entries until `FINALLY`, `FINALIZE`, `END` or end of input.
    ///
    /// Running out of input between entries is not an error; the entries
    /// read so far form the trace.
    pub(crate) fn parse_trace(&mut self) -> Result<TraceDef> {
        let mut entries = Vec::with_capacity(self.count_components());

        while !self.at_trace_end() {
            entries.push(self.parse_trace_entry()?);
        }

        tracing::debug!(entries = entries.len(), "parsed TRACE");
        Ok(TraceDef { entries })
    }

    fn at_trace_end(&self) -> bool {
        self.cursor.is_at_end()
            || TRACE_TERMINATORS
                .iter()
                .any(|word| self.cursor.peek_word(word))
    }

    /// Count `COMPONENT` identifiers ahead of the cursor, up to `FINALIZE`
    /// or `END`.
    ///
    /// This is a capacity hint only. It counts the word wherever it appears,
    /// including inside `EXTEND` or `FINALLY` code, so it can overshoot the
    /// number of declarations; `%include` slots are not counted.
    pub fn count_components(&self) -> usize {
        self.cursor.count_forward_until(
            |t| t.is_word("COMPONENT"),
            |t| t.is_word("FINALIZE") || t.is_word("END"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::parser::ast::TraceEntry;

    fn parser(source: &str) -> InstrParser {
        InstrParser::from_source(source, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_stops_at_finally() {
        let mut p = parser(
            "COMPONENT a = Arm() AT (0,0,0) ABSOLUTE
             COMPONENT b = Arm() AT (0,0,1) RELATIVE a
             FINALLY %{ %}",
        );
        let trace = p.parse_trace().unwrap();

        assert_eq!(trace.entries.len(), 2);
        assert!(p.cursor.peek_word("FINALLY"));
    }

    #[test]
    fn test_end_of_input_is_benign() {
        let mut p = parser("COMPONENT a = Arm() AT (0,0,0) ABSOLUTE");
        assert_eq!(p.parse_trace().unwrap().entries.len(), 1);
    }

    #[test]
    fn test_include_takes_its_own_slot() {
        let mut p = parser(
            "%include \"a.instr\"
             COMPONENT a = Arm() AT (0,0,0) ABSOLUTE
             COMPONENT b = Arm() AT (0,0,0) ABSOLUTE
             END",
        );
        let trace = p.parse_trace().unwrap();

        assert_eq!(trace.entries.len(), 3);
        assert!(matches!(trace.entries[0], TraceEntry::Include(_)));
        assert_eq!(trace.components().count(), 2);
    }

    #[test]
    fn test_count_overshoots_on_code_blocks() {
        let p = parser(
            "COMPONENT a = Arm() AT (0,0,0) ABSOLUTE
             EXTEND %{ int COMPONENT = 1; COMPONENT++; %}
             END",
        );
        assert_eq!(p.count_components(), 3);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut p = parser(
            "COMPONENT z = Arm() AT (0,0,0) ABSOLUTE
             COMPONENT y = Arm() AT (0,0,0) ABSOLUTE
             COMPONENT x = Arm() AT (0,0,0) ABSOLUTE
             END",
        );
        let trace = p.parse_trace().unwrap();
        let names: Vec<&str> = trace.components().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_error_aborts_trace() {
        let mut p = parser(
            "COMPONENT a = Arm() AT (0,0,0) ABSOLUTE
             COMPONENT b = Arm() AT (0,0,0) SIDEWAYS
             END",
        );
        assert!(p.parse_trace().is_err());
    }
}
