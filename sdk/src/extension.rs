use serde::Serialize;

use crate::equal::bytes_equal;

/// An extension field kept by tag in its encoded form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extension {
    bytes: Vec<u8>,
}

impl Extension {
    pub fn new(bytes: Vec<u8>) -> Extension {
        Extension { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Two extensions are equal when their encodings are.
    pub fn equal(&self, other: &Extension) -> bool {
        bytes_equal(&self.bytes, &other.bytes)
    }
}

impl From<Vec<u8>> for Extension {
    fn from(bytes: Vec<u8>) -> Extension {
        Extension::new(bytes)
    }
}
