use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete instrument definition, one per `.instr` file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstrDef {
    /// Instrument name from `DEFINE INSTRUMENT <name>`
    pub name: String,
    /// Formal instrument parameters, in source order
    pub params: Vec<InstrParam>,
    /// `DECLARE %{ ... %}` section
    pub declare: DeclareDef,
    /// `USERVARS %{ ... %}` section
    pub uservars: UservarsDef,
    /// `INITIALIZE %{ ... %}` section
    pub init: InitializeDef,
    /// `TRACE` section
    pub trace: TraceDef,
    /// `FINALLY %{ ... %}` section
    pub finalize: FinalizeDef,
}

impl InstrDef {
    /// Iterate over the real components of the trace, skipping `%include` slots
    pub fn components(&self) -> impl Iterator<Item = &CompDecl> {
        self.trace.components()
    }

    /// Find a component instance by name
    pub fn component(&self, name: &str) -> Option<&CompDecl> {
        self.components().find(|comp| comp.name == name)
    }
}

/// One field of a `DECLARE` or `USERVARS` block: `type [name] [= default]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructMember {
    /// C type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Field name; `None` for a lone identifier such as a macro call `MCSTAS_MACRO;`
    pub name: Option<String>,
    /// Initializer expression, verbatim
    pub default_value: Option<String>,
}

/// Formal instrument parameter: `[type] name [= default]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrParam {
    /// Parameter name
    pub name: String,
    /// Explicit type; `None` means the implicit numeric type
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Default value expression, verbatim
    pub default_value: Option<String>,
}

impl InstrParam {
    /// Type of the parameter, falling back to the implicit `double`
    pub fn effective_type(&self) -> &str {
        self.type_name.as_deref().unwrap_or("double")
    }
}

/// Actual component parameter: `name = value`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompParam {
    /// Parameter name
    pub name: String,
    /// Value expression, verbatim
    pub value: String,
}

/// Three expression texts forming a point or a rotation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X expression
    pub x: String,
    /// Y expression
    pub y: String,
    /// Z expression
    pub z: String,
}

impl Vector3 {
    /// Create a vector from three expression texts
    pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
        Vector3 {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Coordinate frame a position or rotation is expressed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    /// `ABSOLUTE`
    Absolute,
    /// `RELATIVE <component>`; the name is not resolved here and may be `PREVIOUS`
    Relative(String),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Frame::Absolute => write!(f, "ABSOLUTE"),
            Frame::Relative(name) => write!(f, "RELATIVE {}", name),
        }
    }
}

/// `ROTATED (<vector>) <frame>` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation angles
    pub angles: Vector3,
    /// Frame the angles are relative to
    pub frame: Frame,
}

/// Where a component's type comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentSource {
    /// Explicit component type, e.g. `Arm`
    Type(String),
    /// `COPY(<instance>)`: type taken from an earlier instance by a later pass
    Copy(String),
}

/// One component instantiation in the trace section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompDecl {
    /// Unique instance name
    pub name: String,
    /// Component type or copy source
    pub source: ComponentSource,
    /// Actual parameters, in source order
    pub params: Vec<CompParam>,
    /// `WHEN (...)` condition, verbatim
    pub when: Option<String>,
    /// `AT` position
    pub at: Vector3,
    /// Frame of the `AT` position
    pub at_frame: Frame,
    /// `ROTATED` clause
    pub rotation: Option<Rotation>,
    /// `GROUP <name>`
    pub group: Option<String>,
    /// `EXTEND %{ ... %}` code, verbatim
    pub extend: Option<String>,
    /// `REMOVABLE` flag
    pub removable: bool,
    /// `SPLIT [n]` factor, 0 when absent
    pub split: u32,
}

impl CompDecl {
    /// Create a component at the absolute origin with no modifiers
    pub fn new(name: impl Into<String>, source: ComponentSource) -> Self {
        CompDecl {
            name: name.into(),
            source,
            params: Vec::new(),
            when: None,
            at: Vector3::new("0", "0", "0"),
            at_frame: Frame::Absolute,
            rotation: None,
            group: None,
            extend: None,
            removable: false,
            split: 0,
        }
    }

    /// Explicit component type, `None` for `COPY(...)` instances
    pub fn type_name(&self) -> Option<&str> {
        match &self.source {
            ComponentSource::Type(name) => Some(name),
            ComponentSource::Copy(_) => None,
        }
    }

    /// Copy source instance, `None` for explicitly typed instances
    pub fn copy_source(&self) -> Option<&str> {
        match &self.source {
            ComponentSource::Copy(name) => Some(name),
            ComponentSource::Type(_) => None,
        }
    }

    /// Frame of the rotation, present only with `ROTATED`
    pub fn rotation_frame(&self) -> Option<&Frame> {
        self.rotation.as_ref().map(|rot| &rot.frame)
    }

    /// Look up an actual parameter value by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// One slot of the trace section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEntry {
    /// A component instantiation
    Component(CompDecl),
    /// `%include "path"` directive
    Include(String),
}

impl TraceEntry {
    /// The component in this slot, if it is one
    pub fn as_component(&self) -> Option<&CompDecl> {
        match self {
            TraceEntry::Component(comp) => Some(comp),
            TraceEntry::Include(_) => None,
        }
    }
}

/// Declaration block with both raw text and decomposed members
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemberBlock {
    /// Whole block text between the delimiters, trimmed
    pub text: Option<String>,
    /// Structured members parsed from the same span
    pub members: Vec<StructMember>,
}

/// `DECLARE` section
pub type DeclareDef = MemberBlock;
/// `USERVARS` section
pub type UservarsDef = MemberBlock;

/// Opaque verbatim code section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Code between the delimiters, trimmed; `None` when empty or absent
    pub text: Option<String>,
}

/// `INITIALIZE` section
pub type InitializeDef = CodeBlock;
/// `FINALLY` section
pub type FinalizeDef = CodeBlock;

/// `TRACE` section
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceDef {
    /// Entries in placement order
    pub entries: Vec<TraceEntry>,
}

impl TraceDef {
    /// Iterate over the components, skipping `%include` slots
    pub fn components(&self) -> impl Iterator<Item = &CompDecl> {
        self.entries.iter().filter_map(TraceEntry::as_component)
    }

    /// Iterate over `%include` paths
    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            TraceEntry::Include(path) => Some(path.as_str()),
            TraceEntry::Component(_) => None,
        })
    }
}
