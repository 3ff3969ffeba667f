//! Diagnostic rendering of parsed instruments
//!
//! [`render`] prints every field of every entity in a fixed layout, absent
//! values as `(null)`. Golden-output tests compare against it, so the layout
//! only changes together with those files.

use crate::parser::{CompDecl, Frame, InstrDef, StructMember, TraceEntry, Vector3};
use std::fmt::Write;

const NULL: &str = "(null)";

/// Render the whole instrument tree as text
pub fn render(instr: &InstrDef) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "instr name: {}", instr.name);
    let _ = writeln!(out, "instr params:");
    for p in &instr.params {
        let _ = writeln!(
            out,
            "  {} {} = {}",
            or_null(p.type_name.as_deref()),
            p.name,
            or_null(p.default_value.as_deref())
        );
    }
    out.push('\n');

    let _ = writeln!(out, "declare members:");
    render_members(&mut out, &instr.declare.members);
    out.push('\n');

    let _ = writeln!(out, "uservars members:");
    render_members(&mut out, &instr.uservars.members);
    out.push('\n');

    let _ = writeln!(out, "init text:\n{}\n", or_null(instr.init.text.as_deref()));

    let _ = writeln!(out, "components:");
    for entry in &instr.trace.entries {
        match entry {
            TraceEntry::Component(comp) => render_component(&mut out, comp),
            TraceEntry::Include(path) => {
                let _ = writeln!(out, "\n  include: {}", path);
            }
        }
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "finalize text:\n{}\n",
        or_null(instr.finalize.text.as_deref())
    );

    out
}

/// Render a single component in the same layout as [`render`]
pub fn render_component(out: &mut String, comp: &CompDecl) {
    let _ = writeln!(out, "\n  type: {}", or_null(comp.type_name()));
    let _ = writeln!(out, "  copy: {}", or_null(comp.copy_source()));
    let _ = writeln!(out, "  name: {}", comp.name);
    let _ = writeln!(out, "  split: {}", comp.split);
    let _ = writeln!(out, "  removable: {}", u8::from(comp.removable));
    let _ = writeln!(out, "  params:");
    for param in &comp.params {
        let _ = writeln!(out, "    {} = {}", param.name, param.value);
    }
    let _ = writeln!(out, "  group: {}", or_null(comp.group.as_deref()));
    let _ = writeln!(out, "  when: {}", or_null(comp.when.as_deref()));
    let _ = writeln!(
        out,
        "  at:      {} {}",
        vector(Some(&comp.at)),
        frame(Some(&comp.at_frame))
    );
    let _ = writeln!(
        out,
        "  rotated: {} {}",
        vector(comp.rotation.as_ref().map(|r| &r.angles)),
        frame(comp.rotation_frame())
    );
    let _ = writeln!(out, "  extend:\n{}", or_null(comp.extend.as_deref()));
}

/// Serialize the tree as pretty-printed JSON
pub fn to_json(instr: &InstrDef) -> serde_json::Result<String> {
    serde_json::to_string_pretty(instr)
}

fn render_members(out: &mut String, members: &[StructMember]) {
    for m in members {
        let _ = writeln!(
            out,
            "  {} {} = {}",
            m.type_name,
            or_null(m.name.as_deref()),
            or_null(m.default_value.as_deref())
        );
    }
}

fn or_null(text: Option<&str>) -> &str {
    text.unwrap_or(NULL)
}

fn vector(v: Option<&Vector3>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => format!("({}, {}, {})", NULL, NULL, NULL),
    }
}

// The frame prints as the reference name alone, `ABSOLUTE` otherwise
fn frame(f: Option<&Frame>) -> &str {
    match f {
        Some(Frame::Absolute) => "ABSOLUTE",
        Some(Frame::Relative(name)) => name.as_str(),
        None => NULL,
    }
}
