//! Small fragment builders shared by the generated builder and interpreter.

use opgen_ir::{Block, BlockBuilder, CaseLabel, Expr, Stmt, Type};
use opgen_isa::{FrameKind, OpcodeInfo, opcode::OPCODE_WIDTH};

pub use opgen_isa::to_scream_case;

use crate::context::{BuilderVars, ExecutionVars};
use crate::opcode_io::{build_write, write_opcode};

/// Reference to the generated constant holding `info`'s id.
pub fn opcode_constant(info: &OpcodeInfo) -> Expr {
    Expr::Var(info.constant_name())
}

/// `case INSTR_X:` for `info`.
pub fn opcode_label(info: &OpcodeInfo) -> CaseLabel {
    CaseLabel::Value(opcode_constant(info))
}

/// `static final short INSTR_X = <id>;` for every opcode, in catalog order.
///
/// Ids above `i16::MAX` are written through a `(short)` cast.
pub fn build_opcode_constants<'a>(catalog: impl IntoIterator<Item = &'a OpcodeInfo>) -> Block {
    catalog
        .into_iter()
        .map(|info| {
            let raw = info.opcode().raw();
            let init = if raw > i16::MAX as u16 {
                Expr::cast(Type::Short, Expr::from(raw))
            } else {
                Expr::from(raw)
            };
            Stmt::Constant {
                ty: Type::Short,
                name: info.constant_name(),
                init,
            }
        })
        .collect()
}

/// `(BuilderOperationLabel) createLabel()`
pub fn build_create_label() -> Expr {
    Expr::cast(
        Type::named("BuilderOperationLabel"),
        Expr::call("createLabel", Vec::new()),
    )
}

/// `doEmitLabel(bci, label);`
pub fn build_emit_label(vars: &BuilderVars, label: impl Into<Expr>) -> Stmt {
    Stmt::Expr(Expr::call(
        "doEmitLabel",
        vec![vars.bci.clone(), label.into()],
    ))
}

/// Emit one instruction into the builder's buffer.
///
/// Writes the opcode constant at `bci`, each operand into the following
/// 16-bit slots, then advances `bci` by the instruction length.
pub fn build_emit_instruction(vars: &BuilderVars, info: &OpcodeInfo, operands: Vec<Expr>) -> Block {
    let width = i64::from(OPCODE_WIDTH);
    debug_assert!(
        width * (operands.len() as i64 + 1) <= i64::from(info.length()),
        "{} operands do not fit in {} bytes of {}",
        operands.len(),
        info.length(),
        info.name()
    );

    let mut block = BlockBuilder::new().push(write_opcode(vars, opcode_constant(info)));
    for (slot, operand) in operands.into_iter().enumerate() {
        let offset = Expr::add(vars.bci.clone(), width * (slot as i64 + 1));
        block = block.push(build_write(vars.bc.clone(), offset, operand));
    }
    block
        .assign(
            vars.bci.clone(),
            Expr::add(vars.bci.clone(), i64::from(info.length())),
        )
        .build()
}

/// `FRAME_TYPE_<NAME>` for `kind`.
pub fn frame_type_constant(kind: FrameKind) -> Expr {
    Expr::raw(format!("FRAME_TYPE_{}", kind.frame_name().to_uppercase()))
}

/// `doSetResultBoxed(bc, bci, <offset>, FRAME_TYPE_<KIND>);`
///
/// `offset` is verbatim text relative to the current instruction.
pub fn build_set_result_boxed(vars: &ExecutionVars, offset: &str, kind: FrameKind) -> Stmt {
    build_set_result_boxed_with(vars, offset, frame_type_constant(kind))
}

/// [`build_set_result_boxed`] with an arbitrary kind expression.
pub fn build_set_result_boxed_with(vars: &ExecutionVars, offset: &str, kind: Expr) -> Stmt {
    Stmt::Expr(Expr::call(
        "doSetResultBoxed",
        vec![vars.bc.clone(), vars.bci.clone(), Expr::raw(offset), kind],
    ))
}
