//! Generated-source fragments for interpreter code generation.
//!
//! Fragments are plain values. Equality and hashing are structural, so two
//! independently built fragments with the same shape compare equal.

pub mod builder;
pub mod expr;
pub mod stmt;

pub use builder::{BlockBuilder, raw_lines};
pub use expr::{BinOp, Expr, Type};
pub use stmt::{Block, CaseLabel, Stmt, SwitchArm};
