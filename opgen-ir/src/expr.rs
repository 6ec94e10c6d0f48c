/// Expression tree nodes for generated interpreter code.
///
/// Equality is structural: two expressions are equal when they have the
/// same shape and the same embedded literals and names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Integer literal.
    IntLit(i64),
    /// A bound variable or named constant.
    Var(String),
    /// Verbatim source text, e.g. `$bci + 2`.
    Raw(String),
    /// Binary operation: `lhs op rhs`
    BinaryOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Primitive or reference cast: `(ty) expr`
    Cast { ty: Type, expr: Box<Expr> },
    /// Call: `receiver.method(args...)` or `method(args...)`
    Call {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::IntLit(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Expr::Raw(text.into())
    }

    pub fn binary(op: BinOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Expr::BinaryOp {
            op,
            lhs: Box::new(lhs.into()),
            rhs: Box::new(rhs.into()),
        }
    }

    pub fn add(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinOp::Add, lhs, rhs)
    }

    pub fn cast(ty: Type, expr: impl Into<Expr>) -> Self {
        Expr::Cast {
            ty,
            expr: Box::new(expr.into()),
        }
    }

    /// Call a free function or a method on the enclosing object.
    pub fn call(method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: None,
            method: method.into(),
            args,
        }
    }

    /// Call `method` on a named receiver, e.g. `LE_BYTES.getShort(..)`.
    pub fn method_call(receiver: impl Into<String>, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            receiver: Some(Box::new(Expr::Var(receiver.into()))),
            method: method.into(),
            args,
        }
    }

    /// True for leaves that never need parentheses.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Expr::IntLit(_) | Expr::Var(_) | Expr::Call { .. }
        )
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::IntLit(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::IntLit(value.into())
    }
}

impl From<u16> for Expr {
    fn from(value: u16) -> Self {
        Expr::IntLit(value.into())
    }
}

/// Types that can appear in casts and declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Byte,
    Short,
    Char,
    Int,
    Long,
    /// Any reference type, spelled as written.
    Named(String),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Type::Byte => "byte",
            Type::Short => "short",
            Type::Char => "char",
            Type::Int => "int",
            Type::Long => "long",
            Type::Named(name) => name,
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
        };
        f.write_str(s)
    }
}
