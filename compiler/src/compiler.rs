use std::collections::HashMap;

use brine_equal_schema as wire;
use tracing::debug;

use crate::{
    config::GeneratorConfig,
    types::{Definition, DefinitionAttributes, DefinitionKind, Field, Schema, SchemaOptions},
    verifier::{verify_schema, NATIVE_TYPES},
    tokenizer::tokenize_schema,
    parser::parse_schema,
    gen_rust::compile_schema_to_rust,
    error::KiwiError,
};

/// Compile a textual schema into `(Schema, Vec<u8>)`.
/// Returns `Err(KiwiError)` if tokenization/parsing/verification fails.
pub fn compile_schema(text: &str) -> Result<(Schema, Vec<u8>), KiwiError> {
    let tokens = tokenize_schema(text)?;
    let schema = parse_schema(&tokens)?;
    verify_schema(&schema)?;
    let bin = encode_binary_schema(&schema)?;
    Ok((schema, bin))
}

/// Parses `text`, applies the overrides in `config` to its file options and
/// generates Rust source for it.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate_rust(text: &str, config: &GeneratorConfig) -> Result<String, KiwiError> {
    let tokens = tokenize_schema(text)?;
    let mut schema = parse_schema(&tokens)?;
    config.apply(&mut schema.options);
    debug!(options = ?schema.options, "resolved file options");
    verify_schema(&schema)?;
    compile_schema_to_rust(&schema)
}

/// Decode a binary schema buffer back into a `Schema`.
///
/// The binary format carries neither the package nor any equality options,
/// so those come back as defaults.
pub fn decode_binary_schema(buffer: &[u8]) -> Result<Schema, KiwiError> {
    let decoded = wire::Schema::decode(buffer)
        .map_err(|e| KiwiError::DecodeError(format!("Failed to read binary schema: {}", e)))?;

    let mut definitions = Vec::with_capacity(decoded.defs.len());
    for def in &decoded.defs {
        let kind = match def.kind {
            wire::DefKind::Enum    => DefinitionKind::Enum,
            wire::DefKind::Struct  => DefinitionKind::Struct,
            wire::DefKind::Message => DefinitionKind::Message,
        };

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            // Resolve the type string (None for enums)
            let type_: Option<String> = if kind == DefinitionKind::Enum {
                None
            } else if field.type_id < 0 {
                let index = (!field.type_id) as usize;
                match NATIVE_TYPES.get(index) {
                    Some(native) => Some(native.to_string()),
                    None => {
                        return Err(KiwiError::DecodeError(format!(
                            "Invalid native type index {} for field {}",
                            field.type_id, field.name
                        )))
                    }
                }
            } else {
                // Out of range definition indexes are rejected by the decoder
                Some(decoded.defs[field.type_id as usize].name.clone())
            };

            fields.push(Field {
                name:           field.name.clone(),
                line:           0,
                column:         0,
                type_,
                is_array:       field.is_array,
                is_deprecated:  false,
                is_group:       false,
                reserved_index: field.value as i32,
            });
        }

        definitions.push(Definition {
            name:           def.name.clone(),
            line:           0,
            column:         0,
            kind,
            fields,
            attributes:     DefinitionAttributes::default(),
            has_extensions: false,
        });
    }

    Ok(Schema {
        package:     None,
        options:     SchemaOptions::default(),
        definitions,
    })
}

/// Encode a `Schema` into bytes. Returns `Err(KiwiError::EncodeError)` if any field's type is invalid.
pub fn encode_binary_schema(schema: &Schema) -> Result<Vec<u8>, KiwiError> {
    let definition_index_map: HashMap<&str, usize> = schema
        .definitions
        .iter()
        .enumerate()
        .map(|(i, def)| (def.name.as_str(), i))
        .collect();

    let mut defs = Vec::with_capacity(schema.definitions.len());
    for def in &schema.definitions {
        let kind = match def.kind {
            DefinitionKind::Enum    => wire::DefKind::Enum,
            DefinitionKind::Struct  => wire::DefKind::Struct,
            DefinitionKind::Message => wire::DefKind::Message,
        };

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let type_id: i32 = match (&def.kind, &field.type_) {
                (DefinitionKind::Enum, _) | (_, None) => 0,
                (_, Some(type_str)) => {
                    if let Some(native_idx) = NATIVE_TYPES.iter().position(|&t| t == type_str.as_str()) {
                        !(native_idx as i32)
                    } else if let Some(&def_idx) = definition_index_map.get(type_str.as_str()) {
                        def_idx as i32
                    } else {
                        return Err(KiwiError::EncodeError(format!(
                            "Type '{}' not found in native types or definitions",
                            type_str
                        )));
                    }
                }
            };

            fields.push(wire::Field {
                name:     field.name.clone(),
                type_id,
                is_array: field.is_array,
                value:    field.reserved_index as u32,
            });
        }

        defs.push(wire::Def::new(def.name.clone(), kind, fields));
    }

    Ok(wire::Schema::new(defs).encode())
}
