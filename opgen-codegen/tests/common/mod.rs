#![allow(dead_code)]

use opgen_ir::{Block, CaseLabel, Expr, Stmt, SwitchArm};
use opgen_isa::{Catalog, OpcodeFlags, OpcodeInfo, to_scream_case};

/// `[A(1), B(2), C(3, instrumentation-only)]`
pub fn abc() -> Catalog {
    Catalog::new(vec![
        OpcodeInfo::new("a", 1),
        OpcodeInfo::new("b", 2),
        OpcodeInfo::new("c", 3).with_flags(OpcodeFlags::INSTRUMENTATION_ONLY),
    ])
    .unwrap()
}

pub fn body(text: &str) -> Block {
    vec![Stmt::raw(text)]
}

pub fn label(name: &str) -> CaseLabel {
    CaseLabel::Value(Expr::var(format!("INSTR_{}", to_scream_case(name))))
}

pub fn arms(stmt: &Stmt) -> &[SwitchArm] {
    match stmt {
        Stmt::Switch { arms, .. } => arms,
        other => panic!("expected switch, got {other:?}"),
    }
}

/// The body an arm was built from, without the wrapping block.
pub fn arm_body(arm: &SwitchArm) -> &Block {
    match arm.body.as_slice() {
        [Stmt::Block(body)] => body,
        other => panic!("expected a single wrapped block, got {other:?}"),
    }
}

/// Catalog of `n` opcodes, every fifth one instrumentation-only.
pub fn numbered(n: u16) -> Catalog {
    Catalog::new(
        (0..n)
            .map(|i| {
                let info = OpcodeInfo::new(format!("op{i}"), i);
                if i % 5 == 4 {
                    info.with_flags(OpcodeFlags::INSTRUMENTATION_ONLY)
                } else {
                    info
                }
            })
            .collect(),
    )
    .unwrap()
}
