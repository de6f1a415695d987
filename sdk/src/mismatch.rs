use serde::Serialize;
use thiserror::Error;

/// Where a `VerboseEqual` comparison found its first difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MismatchKind {
    /// One side is `None`, the other is not.
    Absence,
    /// The other operand is not the compared type.
    Type,
    /// An optional field is set on one side only.
    FieldPresence,
    /// Both sides have the field but the values differ.
    FieldValue,
    /// A repeated field has a different number of elements.
    Length,
    /// A repeated field differs at some index.
    Element,
    /// An extension value differs or its tag is on one side only.
    Extension,
    /// The preserved unknown bytes differ.
    UnrecognizedBytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Mismatch {
    pub kind:    MismatchKind,
    pub message: String,
}

impl Mismatch {
    pub fn new(kind: MismatchKind, message: impl Into<String>) -> Mismatch {
        Mismatch {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> MismatchKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_the_message_only() {
        let mismatch = Mismatch::new(MismatchKind::Element, format!("g this[{}]({:?}) Not Equal that[{}]({:?})", 2, 3, 2, 4));
        assert_eq!(mismatch.to_string(), "g this[2](3) Not Equal that[2](4)");
        assert_eq!(mismatch.kind(), MismatchKind::Element);
    }
}
