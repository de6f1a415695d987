use std::collections::HashMap;
use crate::{
    record::{RecordType, Variant},
    types::{Schema, Definition, DefinitionKind},
    utils::{quote, rust_field_name, to_pascal_case},
    error::KiwiError,
};

pub const RESERVED_NAMES: [&str; 2] = ["ByteBuffer", "package"];
/// Names the generated module imports or declares itself.
pub const GENERATED_NAMES: [&str; 16] = [
    "Any", "BTreeMap", "HashMap", "Value", "Extension", "Mismatch", "MismatchKind",
    "Equal", "VerboseEqual", "Populate", "Rng", "FromKiwi", "ToKiwi", "KiwiRecord",
    "KiwiError", "Serialize",
];
pub const NATIVE_TYPES: [&str; 9] = [
    "bool", "byte", "int", "uint", "float", "string", "int64", "uint64", "bytes",
];

/// Rust field names the generator adds to every record.
pub const UNRECOGNIZED_FIELD: &str = "unrecognized_fields";
pub const EXTENSIONS_FIELD: &str = "extension_fields";

/// Returns `Ok(())` if verification passed, or `Err(KiwiError::VerifierError(_))` otherwise.
#[tracing::instrument(level = "debug", skip_all, fields(definitions = schema.definitions.len()))]
pub fn verify_schema(schema: &Schema) -> Result<(), KiwiError> {
    let mut defined_types: Vec<String> = NATIVE_TYPES.iter().map(|s| s.to_string()).collect();
    let mut definitions_map: HashMap<String, &Definition> = HashMap::new();

    // 1) Duplicate / reserved type names
    for def in &schema.definitions {
        if defined_types.contains(&def.name) {
            return Err(KiwiError::VerifierError(format!(
                "The type {} is defined twice",
                quote(&def.name)
            )));
        }
        if RESERVED_NAMES.contains(&def.name.as_str())
            || GENERATED_NAMES.contains(&to_pascal_case(&def.name).as_str())
        {
            return Err(KiwiError::VerifierError(format!(
                "The type name {} is reserved",
                quote(&def.name)
            )));
        }
        defined_types.push(def.name.clone());
        definitions_map.insert(def.name.clone(), def);
    }

    // 2) Fields inside each non-enum definition
    for def in &schema.definitions {
        if let DefinitionKind::Enum = def.kind {
            continue;
        }

        for field in &def.fields {
            if let Some(ref ty) = field.type_ {
                if !defined_types.contains(ty) {
                    return Err(KiwiError::VerifierError(format!(
                        "The type {} is not defined for field {}",
                        quote(ty),
                        quote(&field.name)
                    )));
                }
            }

            let rust_name = rust_field_name(&field.name);
            if rust_name == UNRECOGNIZED_FIELD || rust_name == EXTENSIONS_FIELD {
                return Err(KiwiError::VerifierError(format!(
                    "The field name {} is reserved",
                    quote(&field.name)
                )));
            }

            if field.is_group {
                let is_record = field
                    .type_
                    .as_ref()
                    .and_then(|ty| definitions_map.get(ty))
                    .map_or(false, |target| target.kind != DefinitionKind::Enum);
                if !is_record {
                    return Err(KiwiError::VerifierError(format!(
                        "The field {} cannot be a group because its type is not a struct or message",
                        quote(&field.name)
                    )));
                }
            }
        }

        let mut values = Vec::new();
        for field in &def.fields {
            if values.contains(&field.reserved_index) {
                return Err(KiwiError::VerifierError(format!(
                    "The id for field {} is used twice",
                    quote(&field.name)
                )));
            }
            if field.reserved_index <= 0 {
                return Err(KiwiError::VerifierError(format!(
                    "The id for field {} must be positive",
                    quote(&field.name)
                )));
            }
            if field.reserved_index > def.fields.len() as i32 {
                return Err(KiwiError::VerifierError(format!(
                    "The id for field {} cannot be larger than {}",
                    quote(&field.name),
                    def.fields.len()
                )));
            }
            values.push(field.reserved_index);
        }
    }

    // 3) Records must not contain themselves except through arrays
    let mut state: HashMap<String, u8> = HashMap::new();
    fn check_recursion(
        name: &str,
        definitions_map: &HashMap<String, &Definition>,
        state: &mut HashMap<String, u8>,
    ) -> Result<(), KiwiError> {
        let definition = match definitions_map.get(name) {
            Some(def) => def,
            None => return Ok(()),
        };
        if definition.kind != DefinitionKind::Enum {
            if let Some(&s) = state.get(name) {
                if s == 1 {
                    return Err(KiwiError::VerifierError(format!(
                        "Recursive nesting of {} is not allowed",
                        quote(name)
                    )));
                } else if s == 2 {
                    return Ok(());
                }
            }
            state.insert(name.to_string(), 1);
            for field in &definition.fields {
                if !field.is_array {
                    if let Some(ref ty) = field.type_ {
                        check_recursion(ty, definitions_map, state)?;
                    }
                }
            }
            state.insert(name.to_string(), 2);
        }
        Ok(())
    }

    for def in &schema.definitions {
        check_recursion(&def.name, &definitions_map, &mut state)?;
    }

    // 4) Generated comparisons delegate to the same procedure of nested types
    for record in RecordType::all(schema) {
        for variant in [Variant::Equal, Variant::VerboseEqual] {
            if !record.enabled(variant) {
                continue;
            }
            for field in record.fields() {
                if let Some(nested) = record.nested(field) {
                    if !nested.enabled(variant) {
                        return Err(KiwiError::VerifierError(format!(
                            "The type {} must enable {} because {} compares field {} with it",
                            quote(nested.name()),
                            variant.option_name(),
                            quote(record.name()),
                            quote(&field.name)
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};

    fn verify(text: &str) -> Result<(), KiwiError> {
        verify_schema(&parse_schema(&tokenize_schema(text)?)?)
    }

    fn verifier_message(text: &str) -> String {
        match verify(text) {
            Err(KiwiError::VerifierError(msg)) => msg,
            other => panic!("expected a verifier error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_well_formed_schema() {
        verify(
            r#"
            option equal_all = true;
            struct Color { byte red; bytes raw; }
            message Tree { string label = 1; Tree[] children = 2; Color tint = 3 [group]; extensions; }
            "#,
        )
        .unwrap();
    }

    #[test]
    fn rejects_undefined_types() {
        assert_eq!(
            verifier_message("message M { Missing m = 1; }"),
            "The type \"Missing\" is not defined for field \"m\""
        );
    }

    #[test]
    fn rejects_reserved_field_names() {
        assert_eq!(
            verifier_message("message M { bytes unrecognizedFields = 1; }"),
            "The field name \"unrecognizedFields\" is reserved"
        );
    }

    #[test]
    fn rejects_scalar_groups() {
        assert!(verifier_message("message M { int x = 1 [group]; }").contains("cannot be a group"));
    }

    #[test]
    fn rejects_recursive_structs() {
        assert_eq!(
            verifier_message("struct A { B b; } struct B { A a; }"),
            "Recursive nesting of \"A\" is not allowed"
        );
    }

    #[test]
    fn rejects_singular_message_cycles() {
        assert_eq!(
            verifier_message("message A { B b = 1; } message B { A a = 1; }"),
            "Recursive nesting of \"A\" is not allowed"
        );
    }

    #[test]
    fn rejects_generated_names() {
        assert_eq!(
            verifier_message("message Mismatch { int x = 1; }"),
            "The type name \"Mismatch\" is reserved"
        );
    }

    #[test]
    fn rejects_nested_types_without_the_variant() {
        assert_eq!(
            verifier_message(
                "struct P [equal, verbose_equal = false] { int x; } message M [equal, verbose_equal] { P p = 1; }"
            ),
            "The type \"P\" must enable verbose_equal because \"M\" compares field \"p\" with it"
        );
    }

    #[test]
    fn rejects_out_of_range_ids() {
        assert_eq!(
            verifier_message("message M { int x = 2; }"),
            "The id for field \"x\" cannot be larger than 1"
        );
    }
}
