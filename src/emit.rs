//! Instrument source generation
//!
//! Writes a tree back out as `.instr` text. Parsing the output again yields
//! an equal tree; the original layout and comments are not preserved.

use crate::parser::{CompDecl, ComponentSource, InstrDef, InstrParam, MemberBlock, TraceEntry};
use std::fmt::Write;

/// Generate the source text of a whole instrument
pub fn instrument_source(instr: &InstrDef) -> String {
    let mut out = String::new();

    let params: Vec<String> = instr.params.iter().map(instr_param).collect();
    let _ = writeln!(out, "DEFINE INSTRUMENT {}({})", instr.name, params.join(", "));

    member_section(&mut out, "DECLARE", &instr.declare);
    member_section(&mut out, "USERVARS", &instr.uservars);
    code_section(&mut out, "INITIALIZE", instr.init.text.as_deref());

    out.push_str("\nTRACE\n");
    for entry in &instr.trace.entries {
        out.push('\n');
        match entry {
            TraceEntry::Component(comp) => out.push_str(&component_source(comp)),
            TraceEntry::Include(path) => {
                let _ = writeln!(out, "%include \"{}\"", escape(path));
            }
        }
    }

    code_section(&mut out, "FINALLY", instr.finalize.text.as_deref());
    out.push_str("\nEND\n");
    out
}

/// Generate the declaration of one component, ending in a newline
pub fn component_source(comp: &CompDecl) -> String {
    let mut out = String::new();

    if comp.split > 0 {
        let _ = write!(out, "SPLIT {} ", comp.split);
    }
    if comp.removable {
        out.push_str("REMOVABLE ");
    }

    let source = match &comp.source {
        ComponentSource::Type(name) => name.clone(),
        ComponentSource::Copy(name) => format!("COPY({})", name),
    };
    let params: Vec<String> = comp
        .params
        .iter()
        .map(|p| format!("{} = {}", p.name, p.value))
        .collect();
    let _ = writeln!(
        out,
        "COMPONENT {} = {}({})",
        comp.name,
        source,
        params.join(", ")
    );

    if let Some(when) = &comp.when {
        // A trailing line comment would swallow a closing `)` on the same line
        if when.contains("//") {
            let _ = writeln!(out, "  WHEN ({}\n  )", when);
        } else {
            let _ = writeln!(out, "  WHEN ({})", when);
        }
    }
    let _ = writeln!(out, "  AT {} {}", comp.at, comp.at_frame);
    if let Some(rotation) = &comp.rotation {
        let _ = writeln!(
            out,
            "  ROTATED {} {}",
            rotation.angles, rotation.frame
        );
    }
    if let Some(group) = &comp.group {
        let _ = writeln!(out, "  GROUP {}", group);
    }
    if let Some(extend) = &comp.extend {
        let _ = writeln!(out, "  EXTEND\n%{{\n{}\n%}}", extend);
    }

    out
}

fn instr_param(param: &InstrParam) -> String {
    let mut text = match &param.type_name {
        Some(ty) => format!("{} {}", ty, param.name),
        None => param.name.clone(),
    };
    if let Some(default) = &param.default_value {
        let _ = write!(text, " = {}", default);
    }
    text
}

// Raw text wins; a block built in code without text is written from its members
fn member_section(out: &mut String, keyword: &str, block: &MemberBlock) {
    if let Some(text) = &block.text {
        code_section(out, keyword, Some(text));
        return;
    }
    if block.members.is_empty() {
        return;
    }

    let lines: Vec<String> = block
        .members
        .iter()
        .map(|m| match (&m.name, &m.default_value) {
            (Some(name), Some(default)) => format!("  {} {} = {};", m.type_name, name, default),
            (Some(name), None) => format!("  {} {};", m.type_name, name),
            (None, _) => format!("  {};", m.type_name),
        })
        .collect();
    let _ = writeln!(out, "\n{}\n%{{\n{}\n%}}", keyword, lines.join("\n"));
}

fn code_section(out: &mut String, keyword: &str, text: Option<&str>) {
    if let Some(text) = text {
        let _ = writeln!(out, "\n{}\n%{{\n{}\n%}}", keyword, text);
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_instrument;
    use crate::parser::{CompParam, Frame, Rotation, StructMember, Vector3};

    #[test]
    fn test_component_source_layout() {
        let mut comp = CompDecl::new("slit", ComponentSource::Type("Slit".to_string()));
        comp.params.push(CompParam {
            name: "xwidth".to_string(),
            value: "0.01".to_string(),
        });
        comp.at = Vector3::new("0", "0", "L");
        comp.at_frame = Frame::Relative("origin".to_string());
        comp.rotation = Some(Rotation {
            angles: Vector3::new("0", "90", "0"),
            frame: Frame::Absolute,
        });
        comp.split = 2;

        assert_eq!(
            component_source(&comp),
            "SPLIT 2 COMPONENT slit = Slit(xwidth = 0.01)\n  \
             AT (0, 0, L) RELATIVE origin\n  \
             ROTATED (0, 90, 0) ABSOLUTE\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let source = r#"
DEFINE INSTRUMENT RoundTrip(double L = 2, string file = "in.dat", n)
DECLARE
%{
  double a = 1, b;
  int flags[4];
%}
INITIALIZE
%{
  a = L / 2;
%}
TRACE
%include "source.instr"
COMPONENT origin = Progress_bar() AT (0, 0, 0) ABSOLUTE
SPLIT REMOVABLE COMPONENT c = COPY(origin) (percent = 10)
  WHEN (n > 0 && (L < 3))
  AT (0, 0, L) RELATIVE PREVIOUS
  ROTATED (0, a, 0) RELATIVE origin
  GROUP g1
  EXTEND %{ if (SCATTERED) b++; %}
FINALLY
%{
  printf("%g\n", b);
%}
END
"#;
        let first = parse_instrument(source).unwrap();
        let emitted = instrument_source(&first);
        let second = parse_instrument(&emitted).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_with_comments_in_expressions() {
        let source = "DEFINE INSTRUMENT C()
TRACE
COMPONENT a = Arm(r = 1 /* m */ + 2, s = t // trailing
  ) WHEN (x > 0 // on
  ) AT (0, 0, 0) ABSOLUTE
END";
        let first = parse_instrument(source).unwrap();
        let comp = first.component("a").unwrap();
        assert_eq!(comp.when.as_deref(), Some("x > 0 // on"));
        assert_eq!(comp.param("r"), Some("1 /* m */ + 2"));
        assert_eq!(comp.param("s"), Some("t"));

        let emitted = component_source(comp);
        assert!(emitted.contains("WHEN (x > 0 // on\n  )"));

        let second = parse_instrument(&instrument_source(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_members_without_text() {
        let mut instr = InstrDef {
            name: "Built".to_string(),
            ..InstrDef::default()
        };
        instr.declare.members.push(StructMember {
            type_name: "double".to_string(),
            name: Some("x".to_string()),
            default_value: Some("3".to_string()),
        });
        instr.declare.members.push(StructMember {
            type_name: "MCSTAS_MACRO".to_string(),
            name: None,
            default_value: None,
        });

        let reparsed = parse_instrument(&instrument_source(&instr)).unwrap();
        assert_eq!(reparsed.declare.members, instr.declare.members);
        assert_eq!(
            reparsed.declare.text.as_deref(),
            Some("double x = 3;\n  MCSTAS_MACRO;")
        );
    }
}
