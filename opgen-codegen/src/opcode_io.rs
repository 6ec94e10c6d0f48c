//! Fixed-width opcode access in generated code.
//!
//! Opcodes occupy a 16-bit little-endian slot. Reads go through
//! `LE_BYTES.getShort`, writes through `LE_BYTES.putShort` with an explicit
//! `(short)` narrowing of the stored value.

use opgen_ir::{Expr, Stmt, Type};

use crate::context::{BuilderVars, ExecutionVars};

/// Receiver of the little-endian byte access helpers in generated code.
pub const LE_BYTES: &str = "LE_BYTES";
pub const GET_SHORT: &str = "getShort";
pub const PUT_SHORT: &str = "putShort";

/// `LE_BYTES.getShort(buffer, offset)`
///
/// `offset` may be a bound variable ([`Expr::var`]) or verbatim text
/// ([`Expr::raw`]).
pub fn build_read(buffer: impl Into<Expr>, offset: impl Into<Expr>) -> Expr {
    Expr::method_call(LE_BYTES, GET_SHORT, vec![buffer.into(), offset.into()])
}

/// `LE_BYTES.putShort(buffer, offset, (short) value);`
///
/// The cast is always emitted, whatever the width of `value`.
pub fn build_write(
    buffer: impl Into<Expr>,
    offset: impl Into<Expr>,
    value: impl Into<Expr>,
) -> Stmt {
    Stmt::Expr(Expr::method_call(
        LE_BYTES,
        PUT_SHORT,
        vec![buffer.into(), offset.into(), Expr::cast(Type::Short, value)],
    ))
}

/// Decode the opcode at the current instruction.
pub fn read_opcode(vars: &ExecutionVars) -> Expr {
    build_read(vars.bc.clone(), vars.bci.clone())
}

/// Store `value` as the opcode at the builder's current offset.
pub fn write_opcode(vars: &BuilderVars, value: impl Into<Expr>) -> Stmt {
    build_write(vars.bc.clone(), vars.bci.clone(), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_shape() {
        let expr = build_read(Expr::var("bc"), Expr::var("bci"));
        let Expr::Call {
            receiver,
            method,
            args,
        } = expr
        else {
            panic!("expected call");
        };
        assert_eq!(receiver.as_deref(), Some(&Expr::var(LE_BYTES)));
        assert_eq!(method, GET_SHORT);
        assert_eq!(args, vec![Expr::var("bc"), Expr::var("bci")]);
    }

    #[test]
    fn write_always_narrows() {
        let stmt = build_write(Expr::var("bc"), Expr::raw("bci + 2"), Expr::var("op"));
        let Stmt::Expr(Expr::Call { args, .. }) = stmt else {
            panic!("expected call statement");
        };
        assert_eq!(args[1], Expr::raw("bci + 2"));
        assert_eq!(args[2], Expr::cast(Type::Short, Expr::var("op")));
    }

    #[test]
    fn context_wrappers_use_context_variables() {
        let vars = ExecutionVars::new("code", "pc");
        assert_eq!(read_opcode(&vars), build_read(Expr::var("code"), Expr::var("pc")));

        let vars = BuilderVars::new("out", "pos");
        assert_eq!(
            write_opcode(&vars, 3),
            build_write(Expr::var("out"), Expr::var("pos"), 3)
        );
    }
}
