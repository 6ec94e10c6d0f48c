use crate::expr::{Expr, Type};

/// A sequence of statements.
pub type Block = Vec<Stmt>;

/// Statement nodes for generated interpreter code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    /// Expression statement: `expr;`
    Expr(Expr),
    /// Constant declaration: `static final ty name = init;`
    Constant { ty: Type, name: String, init: Expr },
    /// Assignment: `target = value;`
    Assign { target: Expr, value: Expr },
    /// Return statement: `return expr;`
    Return(Option<Expr>),
    /// Switch statement.
    Switch {
        discriminant: Expr,
        arms: Vec<SwitchArm>,
    },
    /// Break.
    Break,
    /// Block of statements.
    Block(Block),
    /// Verbatim statement text, emitted on its own line.
    Raw(String),
}

/// One arm of a switch: every label falls into the same body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwitchArm {
    pub labels: Vec<CaseLabel>,
    pub body: Block,
}

/// A label selecting a switch arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CaseLabel {
    /// `case value:`
    Value(Expr),
    /// `default:`
    Default,
}

impl Stmt {
    pub fn raw(text: impl Into<String>) -> Self {
        Stmt::Raw(text.into())
    }

    pub fn assign(target: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        Stmt::Assign {
            target: target.into(),
            value: value.into(),
        }
    }
}

impl SwitchArm {
    pub fn is_default(&self) -> bool {
        self.labels.contains(&CaseLabel::Default)
    }
}
