//! brine-equal
//!
//! Runtime support for code generated by `brine-equal-compiler`.
//!
//! - `Equal` / `VerboseEqual`, implemented by generated record types
//! - `Mismatch`, the first difference a `VerboseEqual` comparison found
//! - `Extension` and `bytes_equal`, used inside generated comparisons
//! - `Populate` and the `populate` helpers behind generated self-tests
//! - `KiwiRecord` and the `wire` codec, plus `FromKiwi` / `ToKiwi` (re-exported from compiler)

mod equal;
mod extension;
mod mismatch;

pub mod populate;
pub mod wire;

pub use equal::{bytes_equal, Equal, VerboseEqual};
pub use extension::Extension;
pub use mismatch::{Mismatch, MismatchKind};
pub use populate::Populate;
pub use wire::KiwiRecord;

pub use brine_equal_compiler::traits::{FromKiwi, ToKiwi};
pub use brine_equal_compiler::error::KiwiError;
pub use brine_equal_schema::{ Schema, Field, Value };

/// Generated `Populate` impls name `rand::Rng` through this re-export.
pub use rand;

/// Decode a binary Kiwi schema into a pretty‐printed JSON string.
pub fn decode_to_json(buffer: &[u8]) -> Result<String, KiwiError> {
    let schema = brine_equal_compiler::decode_binary_schema(buffer)?;
    Ok(serde_json::to_string_pretty(&schema)?)
}

pub mod traits {
    pub use brine_equal_compiler::traits::{FromKiwi, ToKiwi};
    pub use crate::equal::{Equal, VerboseEqual};
}

pub mod error {
    pub use brine_equal_compiler::error::KiwiError;
    pub use crate::mismatch::{Mismatch, MismatchKind};
}

pub mod schema {
    pub use brine_equal_schema::{Schema, Field, Value};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_json_dump() {
        let (_, binary) = brine_equal_compiler::compile_schema("message M { bytes data = 1; }").unwrap();
        let json = decode_to_json(&binary).unwrap();
        assert!(json.contains("\"name\": \"M\""));
        assert!(json.contains("\"type_\": \"bytes\""));
    }

    #[test]
    fn bad_schema_is_an_error() {
        assert!(matches!(decode_to_json(&[1, b'M', 0, 7]), Err(KiwiError::DecodeError(_))));
    }
}
