//! Opcode catalog for generated bytecode interpreters.
//!
//! This crate provides opcode descriptors, opcode flags, interpreter frame
//! kinds, and loading of a declarative YAML catalog. The catalog order is
//! significant: it is the order in which dispatch branches are emitted.

pub mod catalog;
pub mod error;
pub mod opcode;

pub use bitflags;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use opcode::{FrameKind, Opcode, OpcodeFlags, OpcodeInfo, to_scream_case};
