use thiserror::Error;

/// Everything that can go wrong while reading or writing Kiwi wire data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    #[error("unexpected end of buffer at byte {index}")]
    UnexpectedEof { index: usize },

    #[error("invalid boolean byte {0}")]
    InvalidBool(u8),

    #[error("unknown type id {0}")]
    UnknownTypeId(i32),

    #[error("unknown definition \"{0}\"")]
    UnknownDefinition(String),

    #[error("\"{def}\" has no field with value {value}")]
    UnknownFieldValue { def: String, value: u32 },

    #[error("\"{def}\" has no variant named \"{name}\"")]
    UnknownVariant { def: String, name: String },

    #[error("struct \"{def}\" is missing field \"{field}\"")]
    MissingStructField { def: String, field: String },

    #[error("cannot encode {value} as {expected}")]
    KindMismatch { value: String, expected: String },

    #[error("invalid definition kind byte {0}")]
    InvalidKind(u8),
}
