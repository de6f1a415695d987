use crate::error::KiwiError;
use brine_equal_schema::Value;

/// All Kiwi‐derived types must return `Result<Self, KiwiError>`.
/// We require `Sized` so that `Self` can be constructed.
pub trait FromKiwi: Sized {
    fn from_kiwi(value: &Value) -> Result<Self, KiwiError>;
}

/// The reverse of [`FromKiwi`]. Names in the returned value are the schema's
/// own, so it can be encoded against the embedded binary schema.
pub trait ToKiwi {
    fn to_kiwi(&self) -> Value<'static>;
}
