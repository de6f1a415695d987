//! Decides how each field of a record type is compared.

use crate::{record::RecordType, types::Field};

/// The native type compared by content rather than with `!=`.
pub const BYTES_TYPE: &str = "bytes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    /// Natives other than `bytes`, and enums. Compared with `!=`.
    Scalar,
    /// `bytes`. Compared element-wise with `bytes_equal`.
    ByteSequence,
    /// A struct or message. Compared by the nested type's own procedure.
    NestedRecord,
    /// A record field marked `[group]`; compared like `NestedRecord`.
    Group,
}

impl FieldCategory {
    pub fn delegates(self) -> bool {
        matches!(self, FieldCategory::NestedRecord | FieldCategory::Group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Struct fields: always present.
    Required,
    /// Singular message fields, stored as `Option<T>`.
    Optional,
    /// Arrays, stored as `Vec<T>` and never presence tracked.
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldClass {
    pub category:    FieldCategory,
    pub cardinality: Cardinality,
}

impl FieldClass {
    /// True when an explicit set/unset flag has to agree before values are
    /// compared. Optional records carry their presence in the `Option`
    /// itself, so they are checked separately.
    pub fn tracks_presence(&self) -> bool {
        self.cardinality == Cardinality::Optional && !self.category.delegates()
    }

    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// Classifies `field` of `record` from static schema metadata only.
///
/// Type names the verifier did not resolve fall back to `Scalar`.
pub fn classify(record: &RecordType, field: &Field) -> FieldClass {
    let category = if field.type_.as_deref() == Some(BYTES_TYPE) {
        FieldCategory::ByteSequence
    } else if record.nested(field).is_some() {
        if field.is_group {
            FieldCategory::Group
        } else {
            FieldCategory::NestedRecord
        }
    } else {
        FieldCategory::Scalar
    };

    let cardinality = if field.is_array {
        Cardinality::Repeated
    } else if record.is_message() {
        Cardinality::Optional
    } else {
        Cardinality::Required
    };

    FieldClass { category, cardinality }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema, types::Schema};

    fn schema() -> Schema {
        let text = r#"
            enum Kind { A = 0; }
            struct Color { byte red; bytes raw; Kind kind; byte[] levels; }
            message B {
              string a = 1;
              int64[] g = 2;
              bytes blob = 3;
              Color color = 4;
              Color tint = 5 [group];
              Color[] palette = 6;
              bytes[] chunks = 7;
              Kind kind = 8;
            }
        "#;
        parse_schema(&tokenize_schema(text).unwrap()).unwrap()
    }

    fn classes(schema: &Schema, name: &str) -> Vec<FieldClass> {
        let record = RecordType::lookup(schema, name).unwrap();
        record.fields().iter().map(|field| classify(&record, field)).collect()
    }

    fn class(category: FieldCategory, cardinality: Cardinality) -> FieldClass {
        FieldClass { category, cardinality }
    }

    #[test]
    fn message_fields() {
        use Cardinality::*;
        use FieldCategory::*;

        let schema = schema();
        assert_eq!(
            classes(&schema, "B"),
            [
                class(Scalar, Optional),
                class(Scalar, Repeated),
                class(ByteSequence, Optional),
                class(NestedRecord, Optional),
                class(Group, Optional),
                class(NestedRecord, Repeated),
                class(ByteSequence, Repeated),
                class(Scalar, Optional),
            ]
        );
    }

    #[test]
    fn struct_fields_are_required() {
        use Cardinality::*;
        use FieldCategory::*;

        let schema = schema();
        assert_eq!(
            classes(&schema, "Color"),
            [
                class(Scalar, Required),
                class(ByteSequence, Required),
                class(Scalar, Required),
                class(Scalar, Repeated),
            ]
        );
    }

    #[test]
    fn presence_only_for_optional_values() {
        let schema = schema();
        let tracked: Vec<bool> = classes(&schema, "B").iter().map(FieldClass::tracks_presence).collect();
        assert_eq!(tracked, [true, false, true, false, false, false, false, true]);
        assert!(classes(&schema, "Color").iter().all(|class| !class.tracks_presence()));
    }
}
