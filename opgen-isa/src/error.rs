use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("opcode '{name}' has id {id} which does not fit in 16 bits")]
    IdOutOfRange { name: String, id: u32 },

    #[error("duplicate opcode id {id:#06x}: '{first}' and '{second}'")]
    DuplicateId {
        id: u16,
        first: String,
        second: String,
    },

    #[error("duplicate opcode name '{0}'")]
    DuplicateName(String),

    #[error("opcode with id {0:#06x} has an empty name")]
    EmptyName(u16),

    #[error("opcode '{name}' has length {length}, shorter than its opcode slot")]
    LengthTooSmall { name: String, length: u8 },

    #[error("opcode '{name}': unknown flag '{flag}'")]
    UnknownFlag { name: String, flag: String },

    #[error("opcode '{name}': unknown frame kind '{kind}'")]
    UnknownFrameKind { name: String, kind: String },

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
