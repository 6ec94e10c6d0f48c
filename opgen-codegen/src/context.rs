use opgen_ir::Expr;

/// Working variables of a generated `execute` method.
///
/// The dispatch builder passes these through without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionVars {
    /// The bytecode buffer (`byte[]`).
    pub bc: Expr,
    /// Byte offset of the current instruction.
    pub bci: Expr,
}

impl ExecutionVars {
    pub fn new(bc: impl Into<String>, bci: impl Into<String>) -> Self {
        Self {
            bc: Expr::var(bc),
            bci: Expr::var(bci),
        }
    }
}

impl Default for ExecutionVars {
    fn default() -> Self {
        Self::new("bc", "$bci")
    }
}

/// Working variables of a generated bytecode builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderVars {
    /// The bytecode buffer being filled.
    pub bc: Expr,
    /// Next free byte offset in `bc`.
    pub bci: Expr,
}

impl BuilderVars {
    pub fn new(bc: impl Into<String>, bci: impl Into<String>) -> Self {
        Self {
            bc: Expr::var(bc),
            bci: Expr::var(bci),
        }
    }
}

impl Default for BuilderVars {
    fn default() -> Self {
        Self::new("bc", "bci")
    }
}
