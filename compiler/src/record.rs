//! Read-only views of the record types (structs and messages) in a schema,
//! with their equality options resolved against the file-level defaults.

use crate::{
    types::{Definition, DefinitionKind, Field, Schema},
    utils::to_pascal_case,
};

/// The comparison procedures that can be generated for a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Equal,
    VerboseEqual,
}

impl Variant {
    pub fn option_name(self) -> &'static str {
        match self {
            Variant::Equal        => "equal",
            Variant::VerboseEqual => "verbose_equal",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordType<'a> {
    schema:     &'a Schema,
    definition: &'a Definition,
}

impl<'a> RecordType<'a> {
    /// Returns `None` for enums.
    pub fn new(schema: &'a Schema, definition: &'a Definition) -> Option<RecordType<'a>> {
        match definition.kind {
            DefinitionKind::Enum => None,
            DefinitionKind::Struct | DefinitionKind::Message => Some(RecordType { schema, definition }),
        }
    }

    /// Every record type in declaration order.
    pub fn all(schema: &'a Schema) -> impl Iterator<Item = RecordType<'a>> + 'a {
        schema
            .definitions
            .iter()
            .filter_map(move |definition| RecordType::new(schema, definition))
    }

    pub fn lookup(schema: &'a Schema, name: &str) -> Option<RecordType<'a>> {
        schema.definition(name).and_then(|definition| RecordType::new(schema, definition))
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn definition(&self) -> &'a Definition {
        self.definition
    }

    pub fn name(&self) -> &'a str {
        &self.definition.name
    }

    /// `package.Name`, or just `Name` without a package.
    pub fn qualified_name(&self) -> String {
        match &self.schema.package {
            Some(package) => format!("{}.{}", package, self.definition.name),
            None => self.definition.name.clone(),
        }
    }

    pub fn rust_name(&self) -> String {
        to_pascal_case(&self.definition.name)
    }

    /// Declaration order, which is also the comparison order.
    pub fn fields(&self) -> &'a [Field] {
        &self.definition.fields
    }

    pub fn is_message(&self) -> bool {
        self.definition.kind == DefinitionKind::Message
    }

    pub fn supports_extensions(&self) -> bool {
        self.definition.has_extensions
    }

    /// Whether extensions are kept as a tag to value map rather than an
    /// opaque byte blob.
    pub fn extensions_map(&self) -> bool {
        self.definition
            .attributes
            .extensions_map
            .unwrap_or(self.schema.options.extensions_map_all)
    }

    pub fn equal_enabled(&self) -> bool {
        self.definition.attributes.equal.unwrap_or(self.schema.options.equal_all)
    }

    pub fn verbose_equal_enabled(&self) -> bool {
        self.definition
            .attributes
            .verbose_equal
            .unwrap_or(self.schema.options.verbose_equal_all)
    }

    pub fn enabled(&self, variant: Variant) -> bool {
        match variant {
            Variant::Equal        => self.equal_enabled(),
            Variant::VerboseEqual => self.verbose_equal_enabled(),
        }
    }

    /// Tests are only generated when there is a comparison to test.
    pub fn testgen_enabled(&self) -> bool {
        let testgen = self.definition.attributes.testgen.unwrap_or(self.schema.options.testgen_all);
        testgen && (self.equal_enabled() || self.verbose_equal_enabled())
    }

    /// The record type a field refers to, if it refers to one.
    pub fn nested(&self, field: &Field) -> Option<RecordType<'a>> {
        field
            .type_
            .as_deref()
            .and_then(|name| RecordType::lookup(self.schema, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};

    fn schema(text: &str) -> Schema {
        parse_schema(&tokenize_schema(text).unwrap()).unwrap()
    }

    #[test]
    fn attributes_override_file_options() {
        let schema = schema(
            r#"
            package demo;
            option equal_all = true;
            enum Kind { A = 0; }
            struct P [equal = false, verbose_equal] { int x; }
            message M { P p = 1; extensions; }
            "#,
        );

        let records: Vec<_> = RecordType::all(&schema).collect();
        assert_eq!(records.len(), 2);

        let p = records[0];
        assert!(!p.equal_enabled());
        assert!(p.verbose_equal_enabled());
        assert!(!p.testgen_enabled());

        let m = records[1];
        assert_eq!(m.qualified_name(), "demo.M");
        assert!(m.equal_enabled());
        assert!(m.supports_extensions());
        assert!(m.extensions_map());
        assert_eq!(m.nested(&m.fields()[0]).map(|r| r.name()), Some("P"));
    }

    #[test]
    fn testgen_needs_a_comparison() {
        let schema = schema("option testgen_all = true; message M { int x = 1; }");
        let m = RecordType::lookup(&schema, "M").unwrap();
        assert!(!m.testgen_enabled());
    }
}
