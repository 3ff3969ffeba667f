//! Instrument parser module
//!
//! Parses the token stream of a `.instr` file into an [`InstrDef`]. The
//! grammar is split by section: parameter lists, member lists, verbatim
//! blocks, placement vectors, component declarations and the trace list all
//! extend the one [`InstrParser`].

mod ast;
mod blocks;
mod component;
mod cursor;
mod instrument;
mod members;
mod params;
mod placement;
mod trace;

pub use ast::{
    CodeBlock, CompDecl, CompParam, ComponentSource, DeclareDef, FinalizeDef, Frame,
    InitializeDef, InstrDef, InstrParam, MemberBlock, Rotation, StructMember, TraceDef,
    TraceEntry, UservarsDef, Vector3,
};
pub use cursor::{token_equals, token_text, TokenCursor};
pub use instrument::InstrParser;
pub use params::count_comma_separated;
