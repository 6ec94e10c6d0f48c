use crate::expr::Expr;
use crate::stmt::{Block, Stmt};

/// Fluent construction of a [`Block`].
///
/// ```
/// use opgen_ir::{BlockBuilder, Expr, Stmt};
///
/// let block = BlockBuilder::new()
///     .assign(Expr::var("sp"), Expr::add(Expr::var("sp"), 1))
///     .push(Stmt::Break)
///     .build();
/// assert_eq!(block.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockBuilder {
    stmts: Block,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, stmt: Stmt) -> Self {
        self.stmts.push(stmt);
        self
    }

    pub fn assign(self, target: impl Into<Expr>, value: impl Into<Expr>) -> Self {
        self.push(Stmt::assign(target, value))
    }

    pub fn raw(self, text: impl Into<String>) -> Self {
        self.push(Stmt::raw(text))
    }

    pub fn build(self) -> Block {
        self.stmts
    }
}

/// One [`Stmt::Raw`] per source line.
pub fn raw_lines<I, S>(lines: I) -> Block
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines.into_iter().map(|line| Stmt::Raw(line.into())).collect()
}
