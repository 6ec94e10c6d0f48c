pub mod context;
pub mod dispatch;
pub mod eval;
pub mod helpers;
pub mod opcode_io;
pub mod source_emitter;

pub use context::{BuilderVars, ExecutionVars};
pub use dispatch::{BranchGroup, build_dispatch, build_dispatch_all, group_branches};
pub use opcode_io::{build_read, build_write, read_opcode, write_opcode};

use opgen_ir::{Block, Stmt, raw_lines};
use opgen_isa::{Catalog, OpcodeInfo};

/// Body of `info` (or of the default arm for `None`) as declared by the
/// catalog's raw `execute` / `default` lines.
pub fn catalog_body(catalog: &Catalog, info: Option<&OpcodeInfo>) -> Option<Block> {
    match info {
        None => catalog.default_body().map(raw_lines),
        Some(info) => info.execute().map(raw_lines),
    }
}

/// Build the dispatch switch for a catalog whose bodies are its raw lines.
pub fn generate_dispatch(
    catalog: &Catalog,
    vars: &ExecutionVars,
    include_instrumentation_only: bool,
) -> Stmt {
    build_dispatch(catalog, vars, include_instrumentation_only, |info| {
        catalog_body(catalog, info)
    })
}

/// Render [`generate_dispatch`] as source text.
pub fn generate_dispatch_source(
    catalog: &Catalog,
    vars: &ExecutionVars,
    include_instrumentation_only: bool,
) -> String {
    let switch = generate_dispatch(catalog, vars, include_instrumentation_only);
    source_emitter::emit_source(&[switch])
}

/// Render the opcode id constants of a catalog as source text.
pub fn generate_constants_source(catalog: &Catalog) -> String {
    source_emitter::emit_source(&helpers::build_opcode_constants(catalog))
}
