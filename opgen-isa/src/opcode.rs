use std::fmt;

/// Width in bytes of the opcode slot at the start of every instruction.
pub const OPCODE_WIDTH: u8 = 2;

/// A 16-bit opcode id.
///
/// Ids are stored little-endian in the first [`OPCODE_WIDTH`] bytes of an
/// instruction.
///
/// ```
/// use opgen_isa::Opcode;
///
/// let op = Opcode(0x2a);
/// assert_eq!(op.raw(), 42);
/// assert_eq!(op.to_string(), "0x002a");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Raw numeric id.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Little-endian byte representation, as laid out in a bytecode buffer.
    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opcode({self})")
    }
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

bitflags::bitflags! {
    /// Per-opcode properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OpcodeFlags: u32 {
        /// Only dispatched when instrumentation is enabled.
        const INSTRUMENTATION_ONLY = 1 << 0;
        /// Transfers control to a label operand.
        const BRANCH = 1 << 1;
        /// Leaves the current frame.
        const RETURN = 1 << 2;
        /// May raise a guest exception.
        const THROW = 1 << 3;
        /// Specialized variant rewritten in place at runtime.
        const QUICKENED = 1 << 4;
    }
}

impl OpcodeFlags {
    /// Look up a single flag by its catalog spelling (`instrumentation_only`,
    /// `branch`, `return`, `throw`, `quickened`).
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        match name {
            "instrumentation_only" => Some(Self::INSTRUMENTATION_ONLY),
            "branch" => Some(Self::BRANCH),
            "return" => Some(Self::RETURN),
            "throw" => Some(Self::THROW),
            "quickened" => Some(Self::QUICKENED),
            _ => None,
        }
    }
}

/// Slot kinds of a generated interpreter frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Object,
    Boolean,
    Byte,
    Int,
    Float,
    Long,
    Double,
}

impl FrameKind {
    pub const ALL: [FrameKind; 7] = [
        FrameKind::Object,
        FrameKind::Boolean,
        FrameKind::Byte,
        FrameKind::Int,
        FrameKind::Float,
        FrameKind::Long,
        FrameKind::Double,
    ];

    /// Name used in generated frame accessors and `FRAME_TYPE_*` constants.
    pub const fn frame_name(self) -> &'static str {
        match self {
            FrameKind::Object => "Object",
            FrameKind::Boolean => "Boolean",
            FrameKind::Byte => "Byte",
            FrameKind::Int => "Int",
            FrameKind::Float => "Float",
            FrameKind::Long => "Long",
            FrameKind::Double => "Double",
        }
    }

    /// Parse the lowercase catalog spelling (`object`, `int`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.frame_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.frame_name())
    }
}

/// Convert a camelCase or dotted name to `SCREAMING_SNAKE` case.
///
/// An underscore is inserted between a lowercase ASCII letter and a
/// following uppercase one; dots become underscores.
///
/// ```
/// use opgen_isa::to_scream_case;
///
/// assert_eq!(to_scream_case("loadArgument.boxed"), "LOAD_ARGUMENT_BOXED");
/// ```
pub fn to_scream_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('_');
        }
        if c == '.' {
            out.push('_');
        } else {
            out.extend(c.to_uppercase());
        }
        prev = Some(c);
    }
    out
}

/// Descriptor of a single opcode in a [`Catalog`](crate::Catalog).
///
/// Besides the id and flags, a descriptor carries data that only body
/// generators interpret: the instruction length, the frame kinds the
/// instruction produces, and optional raw `execute` source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeInfo {
    opcode: Opcode,
    name: String,
    flags: OpcodeFlags,
    length: u8,
    results: Vec<FrameKind>,
    execute: Option<Vec<String>>,
}

impl OpcodeInfo {
    /// New descriptor with no flags, no results, no body, and an
    /// instruction length of just the opcode slot.
    pub fn new(name: impl Into<String>, id: u16) -> Self {
        Self {
            opcode: Opcode(id),
            name: name.into(),
            flags: OpcodeFlags::empty(),
            length: OPCODE_WIDTH,
            results: Vec::new(),
            execute: None,
        }
    }

    pub fn with_flags(mut self, flags: OpcodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_length(mut self, length: u8) -> Self {
        self.length = length;
        self
    }

    pub fn with_results(mut self, results: Vec<FrameKind>) -> Self {
        self.results = results;
        self
    }

    pub fn with_execute<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.execute = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn flags(&self) -> OpcodeFlags {
        self.flags
    }

    #[inline]
    pub fn is_instrumentation_only(&self) -> bool {
        self.flags.contains(OpcodeFlags::INSTRUMENTATION_ONLY)
    }

    /// Total instruction size in bytes, opcode slot included.
    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn results(&self) -> &[FrameKind] {
        &self.results
    }

    /// Raw source lines executing this opcode, if the catalog provides any.
    pub fn execute(&self) -> Option<&[String]> {
        self.execute.as_deref()
    }

    /// Name of the generated constant holding this opcode's id, e.g.
    /// `INSTR_LOAD_CONSTANT` for `loadConstant`.
    pub fn constant_name(&self) -> String {
        format!("INSTR_{}", to_scream_case(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scream_case_camel() {
        assert_eq!(to_scream_case("loadConstant"), "LOAD_CONSTANT");
        assert_eq!(to_scream_case("c.SLAdd"), "C_SLADD");
        assert_eq!(to_scream_case("branchFalse"), "BRANCH_FALSE");
    }

    #[test]
    fn scream_case_already_upper() {
        assert_eq!(to_scream_case("POP"), "POP");
        assert_eq!(to_scream_case("pop"), "POP");
    }

    #[test]
    fn scream_case_digits_do_not_split() {
        assert_eq!(to_scream_case("load2Args"), "LOAD2ARGS");
    }

    #[test]
    fn constant_name_uses_scream_case() {
        let info = OpcodeInfo::new("storeLocal.boxed", 7);
        assert_eq!(info.constant_name(), "INSTR_STORE_LOCAL_BOXED");
    }

    #[test]
    fn frame_kind_names() {
        assert_eq!(FrameKind::from_name("int"), Some(FrameKind::Int));
        assert_eq!(FrameKind::from_name("Object"), Some(FrameKind::Object));
        assert_eq!(FrameKind::from_name("short"), None);
        assert_eq!(FrameKind::Double.frame_name(), "Double");
    }

    #[test]
    fn flag_names() {
        assert_eq!(
            OpcodeFlags::from_catalog_name("instrumentation_only"),
            Some(OpcodeFlags::INSTRUMENTATION_ONLY)
        );
        assert_eq!(OpcodeFlags::from_catalog_name("jump"), None);
        // The bitflags-generated lookup still takes the constant's own name.
        assert_eq!(OpcodeFlags::from_name("BRANCH"), Some(OpcodeFlags::BRANCH));
    }

    #[test]
    fn opcode_le_bytes() {
        assert_eq!(Opcode(0x1234).to_le_bytes(), [0x34, 0x12]);
    }
}
