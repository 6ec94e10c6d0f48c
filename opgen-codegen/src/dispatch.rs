//! Opcode dispatch tables with structurally deduplicated branches.
//!
//! A body function is asked for a default body and for one body per opcode.
//! Opcodes whose bodies are structurally equal share a single switch arm,
//! so each distinct body is emitted once no matter how many opcodes select
//! it.

use opgen_ir::{Block, CaseLabel, Stmt, SwitchArm};
use opgen_isa::OpcodeInfo;

use crate::context::ExecutionVars;
use crate::helpers::opcode_label;
use crate::opcode_io::read_opcode;

/// One distinct body and the opcodes that select it.
///
/// Groups live only for the duration of a single build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchGroup<'a> {
    /// The catch-all group, created from the default body.
    pub is_default: bool,
    /// Opcodes selecting this body, in the order they joined.
    pub opcodes: Vec<&'a OpcodeInfo>,
    pub body: Block,
}

impl<'a> BranchGroup<'a> {
    fn new(is_default: bool, opcodes: Vec<&'a OpcodeInfo>, body: Block) -> Self {
        Self {
            is_default,
            opcodes,
            body,
        }
    }

    /// Render as a switch arm whose body is wrapped in its own block.
    pub fn into_arm(self) -> SwitchArm {
        let mut labels = Vec::with_capacity(self.opcodes.len() + 1);
        if self.is_default {
            labels.push(CaseLabel::Default);
        }
        labels.extend(self.opcodes.iter().map(|info| opcode_label(info)));
        SwitchArm {
            labels,
            body: vec![Stmt::Block(self.body)],
        }
    }
}

/// Body given to an opcode with no body of its own while a default exists.
///
/// Without it the opcode's label would fall through into whatever arm
/// follows it in the emitted switch.
pub fn no_op_terminator() -> Block {
    vec![Stmt::Break]
}

/// Group the bodies produced by `body_fn` without rendering them.
///
/// `body_fn(None)` is called once first for the default body, then
/// `body_fn(Some(op))` once per included opcode in catalog order.
/// Instrumentation-only opcodes are skipped entirely unless
/// `include_instrumentation_only` is set. An opcode without a body gets
/// [`no_op_terminator`] if a default exists and is omitted otherwise.
///
/// Groups are ordered by creation, the default group first; each body joins
/// the first existing group it is structurally equal to. A substituted
/// no-op terminator only ever joins a non-default group.
pub fn group_branches<'a, I, F>(
    catalog: I,
    include_instrumentation_only: bool,
    mut body_fn: F,
) -> Vec<BranchGroup<'a>>
where
    I: IntoIterator<Item = &'a OpcodeInfo>,
    F: FnMut(Option<&OpcodeInfo>) -> Option<Block>,
{
    let mut groups: Vec<BranchGroup<'a>> = Vec::new();

    let has_default = match body_fn(None) {
        Some(body) => {
            groups.push(BranchGroup::new(true, Vec::new(), body));
            true
        }
        None => false,
    };

    let mut visited = 0usize;
    let mut skipped = 0usize;
    let mut omitted = 0usize;

    for info in catalog {
        if info.is_instrumentation_only() && !include_instrumentation_only {
            skipped += 1;
            continue;
        }
        visited += 1;

        let (body, substituted) = match body_fn(Some(info)) {
            Some(body) => (body, false),
            None if has_default => (no_op_terminator(), true),
            None => {
                log::trace!("{} has no body and no default, omitted", info.name());
                omitted += 1;
                continue;
            }
        };

        // A substituted no-op never joins the default arm, even when the
        // default body is itself a bare `break;`.
        match groups
            .iter_mut()
            .filter(|group| !(substituted && group.is_default))
            .find(|group| group.body == body)
        {
            Some(group) => {
                log::trace!(
                    "{} shares a body with {} other opcode(s)",
                    info.name(),
                    group.opcodes.len()
                );
                group.opcodes.push(info);
            }
            None => groups.push(BranchGroup::new(false, vec![info], body)),
        }
    }

    log::debug!(
        "dispatch: {visited} opcodes visited, {skipped} skipped, {omitted} omitted, {} arms",
        groups.len()
    );

    groups
}

/// Build `switch (LE_BYTES.getShort(bc, bci)) { ... }` over `catalog`.
///
/// See [`group_branches`] for how `body_fn` is invoked and how bodies are
/// merged. Each distinct body appears in exactly one arm; the default body,
/// if any, is the `default:` arm.
pub fn build_dispatch<'a, I, F>(
    catalog: I,
    vars: &ExecutionVars,
    include_instrumentation_only: bool,
    body_fn: F,
) -> Stmt
where
    I: IntoIterator<Item = &'a OpcodeInfo>,
    F: FnMut(Option<&OpcodeInfo>) -> Option<Block>,
{
    let groups = group_branches(catalog, include_instrumentation_only, body_fn);
    Stmt::Switch {
        discriminant: read_opcode(vars),
        arms: groups.into_iter().map(BranchGroup::into_arm).collect(),
    }
}

/// [`build_dispatch`] with instrumentation-only opcodes included.
pub fn build_dispatch_all<'a, I, F>(catalog: I, vars: &ExecutionVars, body_fn: F) -> Stmt
where
    I: IntoIterator<Item = &'a OpcodeInfo>,
    F: FnMut(Option<&OpcodeInfo>) -> Option<Block>,
{
    build_dispatch(catalog, vars, true, body_fn)
}
