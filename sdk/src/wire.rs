//! Encoding generated types with the binary schema they embed.

use brine_equal_compiler::{
    error::KiwiError,
    traits::{FromKiwi, ToKiwi},
};
use brine_equal_schema::{Schema, Value};

/// Implemented by every generated struct and message.
pub trait KiwiRecord: FromKiwi + ToKiwi {
    /// The binary schema the type was generated from.
    const SCHEMA: &'static [u8];
    /// The definition name inside `SCHEMA`.
    const TYPE_NAME: &'static str;
}

pub fn encode<R: KiwiRecord>(record: &R) -> Result<Vec<u8>, KiwiError> {
    let schema = Schema::decode(R::SCHEMA)?;
    Ok(record.to_kiwi().encode(&schema)?)
}

pub fn decode<R: KiwiRecord>(bytes: &[u8]) -> Result<R, KiwiError> {
    let schema = Schema::decode(R::SCHEMA)?;
    let def = schema
        .def(R::TYPE_NAME)
        .ok_or_else(|| KiwiError::DecodeError(format!("Unknown type {}", R::TYPE_NAME)))?;
    let value = Value::decode(&schema, def.index, bytes)?;
    R::from_kiwi(&value)
}
