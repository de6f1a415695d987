use tracing::debug;

use crate::{
    compiler::encode_binary_schema,
    equal,
    error::KiwiError,
    imports::Imports,
    printer::Printer,
    record::RecordType,
    testgen,
    types::{Definition, Field, Schema},
    utils::{escape_rust_keyword, rust_field_name, to_pascal_case, to_snake_case},
    verifier::{EXTENSIONS_FIELD, NATIVE_TYPES, UNRECOGNIZED_FIELD},
};

/// Maps schema types to Rust element types.
fn rust_type(type_name: &str) -> String {
    match type_name {
        "bool"   => "bool".to_string(),
        "byte"   => "u8".to_string(),
        "int"    => "i32".to_string(),
        "uint"   => "u32".to_string(),
        "float"  => "f32".to_string(),
        "string" => "String".to_string(),
        "int64"  => "i64".to_string(),
        "uint64" => "u64".to_string(),
        "bytes"  => "Vec<u8>".to_string(),
        other => to_pascal_case(other),
    }
}

/// Struct fields are stored as is, message fields as `Option<T>`, and
/// arrays as `Vec<T>` in both.
fn field_type(record: &RecordType, field: &Field) -> String {
    let element = rust_type(field.type_.as_deref().unwrap_or("bool"));
    if field.is_array {
        format!("Vec<{}>", element)
    } else if record.is_message() {
        format!("Option<{}>", element)
    } else {
        element
    }
}

/// Reads `item` (a `&Value`) as `type_name`.
fn from_value(type_name: &str, item: &str) -> String {
    match type_name {
        "bool"   => format!("{}.as_bool()", item),
        "byte"   => format!("{}.as_byte()", item),
        "int"    => format!("{}.as_int()", item),
        "uint"   => format!("{}.as_uint()", item),
        "float"  => format!("{}.as_float()", item),
        "string" => format!("{}.as_string().to_string()", item),
        "int64"  => format!("{}.as_int64()", item),
        "uint64" => format!("{}.as_uint64()", item),
        "bytes"  => format!("{}.as_bytes().to_vec()", item),
        other => format!("{}::from_kiwi({})?", to_pascal_case(other), item),
    }
}

/// Builds a `Value` from `item`, a reference when `is_ref` is set and a
/// place otherwise.
fn to_value(type_name: &str, item: &str, is_ref: bool) -> String {
    let copied = if is_ref { format!("*{}", item) } else { item.to_string() };
    match type_name {
        "bool"   => format!("Value::Bool({})", copied),
        "byte"   => format!("Value::Byte({})", copied),
        "int"    => format!("Value::Int({})", copied),
        "uint"   => format!("Value::UInt({})", copied),
        "float"  => format!("Value::Float({})", copied),
        "string" => format!("Value::String({}.clone())", item),
        "int64"  => format!("Value::Int64({})", copied),
        "uint64" => format!("Value::UInt64({})", copied),
        "bytes"  => format!("Value::Bytes({}.clone())", item),
        _ => format!("{}.to_kiwi()", item),
    }
}

fn has_deprecated(definition: &Definition) -> bool {
    definition.fields.iter().any(|field| field.is_deprecated)
}

/// Compiles the entire schema into Rust type definitions as a string,
/// including codec glue, Serde attributes and the enabled comparisons.
#[tracing::instrument(level = "debug", skip_all, fields(package = ?schema.package))]
pub fn compile_schema_to_rust(schema: &Schema) -> Result<String, KiwiError> {
    let binary = encode_binary_schema(schema)?;
    let mut imports = Imports::new();
    let mut body = Printer::new();

    let testgen = RecordType::all(schema).any(|record| record.testgen_enabled());

    emit_schema_constant(&mut body, &binary);

    for definition in &schema.definitions {
        body.blank();
        match RecordType::new(schema, definition) {
            None => generate_enum(&mut body, &mut imports, definition, testgen),
            Some(record) => generate_record(&mut body, &mut imports, &record, testgen),
        }
    }

    let mut module = Printer::new();
    if let Some(package) = &schema.package {
        module.open(format!("pub mod {} {{", escape_rust_keyword(&to_snake_case(package))));
    }
    imports.render(&mut module);
    module.blank();
    module.append(body);
    if schema.package.is_some() {
        module.close("}");
    }

    debug!(imports = imports.len(), "generated rust source");
    Ok(module.finish())
}

fn emit_schema_constant(printer: &mut Printer, binary: &[u8]) {
    printer.line("/// The binary form of the schema these types were generated from.");
    printer.open("pub const SCHEMA: &[u8] = &[");
    for chunk in binary.chunks(16) {
        let bytes: Vec<String> = chunk.iter().map(|byte| byte.to_string()).collect();
        printer.line(format!("{},", bytes.join(", ")));
    }
    printer.close("];");
}

/// Generates Rust code for an enum based on the schema definition.
/// `Populate` is only needed when some record's self-test can reach the enum.
fn generate_enum(printer: &mut Printer, imports: &mut Imports, definition: &Definition, testgen: bool) {
    let enum_name = to_pascal_case(&definition.name);
    let serialize = imports.use_path("serde::Serialize");
    let variants: Vec<(String, &Field)> = definition
        .fields
        .iter()
        .map(|field| (escape_rust_keyword(&to_pascal_case(&field.name)), field))
        .collect();

    if variants.is_empty() {
        printer.line(format!("#[derive(Debug, Clone, Copy, PartialEq, {})]", serialize));
    } else {
        printer.line(format!("#[derive(Debug, Clone, Copy, PartialEq, Default, {})]", serialize));
    }
    printer.open(format!("pub enum {} {{", enum_name));
    for (i, (variant, _)) in variants.iter().enumerate() {
        if i == 0 {
            printer.line("#[default]");
        }
        printer.line(format!("{},", variant));
    }
    printer.close("}");

    // FromKiwi: match on the schema's own variant names
    let from_kiwi = imports.use_path("brine_equal::FromKiwi");
    let kiwi_error = imports.use_path("brine_equal::KiwiError");
    let value = imports.use_path("brine_equal::Value");
    printer.blank();
    printer.open(format!("impl {} for {} {{", from_kiwi, enum_name));
    printer.open(format!("fn from_kiwi(value: &{}) -> Result<Self, {}> {{", value, kiwi_error));
    printer.open("match value.as_string() {");
    for (variant, field) in &variants {
        printer.line(format!("\"{}\" => Ok({}::{}),", field.name, enum_name, variant));
    }
    printer.line(format!("other => Err({}::InvalidEnumVariant(other.to_string())),", kiwi_error));
    printer.close("}");
    printer.close("}");
    printer.close("}");

    let to_kiwi = imports.use_path("brine_equal::ToKiwi");
    printer.blank();
    printer.open(format!("impl {} for {} {{", to_kiwi, enum_name));
    printer.open(format!("fn to_kiwi(&self) -> {}<'static> {{", value));
    if variants.is_empty() {
        printer.line("match *self {}");
    } else {
        printer.open(format!("{}::Enum(\"{}\", match self {{", value, definition.name));
        for (variant, field) in &variants {
            printer.line(format!("{}::{} => \"{}\",", enum_name, variant, field.name));
        }
        printer.close("})");
    }
    printer.close("}");
    printer.close("}");

    if testgen && !variants.is_empty() {
        printer.blank();
        testgen::emit_populate_enum(printer, imports, definition);
    }
}

/// Generates a struct or message, its codec glue and its comparisons.
/// `Populate` is emitted whenever any self-test exists, since a test's
/// `populate` reaches every nested record type.
fn generate_record(printer: &mut Printer, imports: &mut Imports, record: &RecordType, testgen: bool) {
    let definition = record.definition();
    let struct_name = record.rust_name();
    let serialize = imports.use_path("serde::Serialize");
    let skip = imports.use_path("serde_with::skip_serializing_none");

    printer.line(format!("#[{}]", skip));
    printer.line(format!("#[derive(Debug, Clone, PartialEq, Default, {})]", serialize));
    printer.open(format!("pub struct {} {{", struct_name));
    for field in record.fields() {
        // The Kiwi name stays the serialized key, the Rust field is snake_case.
        if field.is_deprecated {
            printer.line("#[deprecated]");
        }
        let rust_name = rust_field_name(&field.name);
        if rust_name != field.name {
            printer.line(format!("#[serde(rename = \"{}\")]", field.name));
        }
        printer.line(format!("pub {}: {},", rust_name, field_type(record, field)));
    }
    if record.supports_extensions() {
        if record.extensions_map() {
            let map = imports.use_path("std::collections::BTreeMap");
            let extension = imports.use_path("brine_equal::Extension");
            printer.line(format!("pub {}: {}<u32, {}>,", EXTENSIONS_FIELD, map, extension));
        } else {
            printer.line(format!("pub {}: Vec<u8>,", EXTENSIONS_FIELD));
        }
    }
    printer.line(format!("pub {}: Vec<u8>,", UNRECOGNIZED_FIELD));
    printer.close("}");

    printer.blank();
    generate_from_kiwi(printer, imports, record);
    printer.blank();
    generate_to_kiwi(printer, imports, record);

    let kiwi_record = imports.use_path("brine_equal::KiwiRecord");
    printer.blank();
    printer.open(format!("impl {} for {} {{", kiwi_record, struct_name));
    printer.line("const SCHEMA: &'static [u8] = SCHEMA;");
    printer.line(format!("const TYPE_NAME: &'static str = \"{}\";", definition.name));
    printer.close("}");

    if testgen {
        printer.blank();
        testgen::emit_populate(printer, imports, record);
    }

    equal::emit_enabled(printer, imports, record);

    if record.testgen_enabled() {
        printer.blank();
        testgen::emit_test(printer, record);
    }
}

/// Generates the `FromKiwi` implementation for a struct or message.
/// Missing struct fields are an error; missing message fields stay `None`.
fn generate_from_kiwi(printer: &mut Printer, imports: &mut Imports, record: &RecordType) {
    let from_kiwi = imports.use_path("brine_equal::FromKiwi");
    let kiwi_error = imports.use_path("brine_equal::KiwiError");
    let value = imports.use_path("brine_equal::Value");

    if has_deprecated(record.definition()) {
        printer.line("#[allow(deprecated)]");
    }
    printer.open(format!("impl {} for {} {{", from_kiwi, record.rust_name()));
    if record.fields().is_empty() {
        printer.open(format!("fn from_kiwi(_value: &{}) -> Result<Self, {}> {{", value, kiwi_error));
        printer.line("Ok(Self::default())");
        printer.close("}");
        printer.close("}");
        return;
    }
    printer.open(format!("fn from_kiwi(value: &{}) -> Result<Self, {}> {{", value, kiwi_error));
    printer.line("let mut record = Self::default();");

    for field in record.fields() {
        let type_name = field.type_.as_deref().unwrap_or("bool");
        let rust_name = rust_field_name(&field.name);
        let is_native = NATIVE_TYPES.contains(&type_name);

        let converted = if field.is_array {
            if is_native {
                format!("value.as_array().iter().map(|item| {}).collect()", from_value(type_name, "item"))
            } else {
                format!(
                    "value.as_array().iter().map({}::from_kiwi).collect::<Result<_, _>>()?",
                    to_pascal_case(type_name)
                )
            }
        } else if record.is_message() {
            format!("Some({})", from_value(type_name, "value"))
        } else {
            from_value(type_name, "value")
        };

        printer.blank();
        if record.is_message() {
            printer.open(format!("if let Some(value) = value.get(\"{}\") {{", field.name));
            printer.line(format!("record.{} = {};", rust_name, converted));
            printer.close("}");
        } else {
            printer.open(format!("match value.get(\"{}\") {{", field.name));
            printer.line(format!("Some(value) => record.{} = {},", rust_name, converted));
            printer.line(format!(
                "None => return Err({}::MissingField(\"{}\".to_string())),",
                kiwi_error, field.name
            ));
            printer.close("}");
        }
    }

    printer.blank();
    printer.line("Ok(record)");
    printer.close("}");
    printer.close("}");
}

/// Generates the `ToKiwi` implementation. Unset message fields and empty
/// message arrays are left out of the object.
fn generate_to_kiwi(printer: &mut Printer, imports: &mut Imports, record: &RecordType) {
    let to_kiwi = imports.use_path("brine_equal::ToKiwi");
    let value = imports.use_path("brine_equal::Value");
    let hash_map = imports.use_path("std::collections::HashMap");

    if has_deprecated(record.definition()) {
        printer.line("#[allow(deprecated)]");
    }
    printer.open(format!("impl {} for {} {{", to_kiwi, record.rust_name()));
    printer.open(format!("fn to_kiwi(&self) -> {}<'static> {{", value));
    if record.fields().is_empty() {
        printer.line(format!("let fields = {}::new();", hash_map));
    } else {
        printer.line(format!("let mut fields = {}::new();", hash_map));
    }

    for field in record.fields() {
        let type_name = field.type_.as_deref().unwrap_or("bool");
        let rust_name = rust_field_name(&field.name);
        let place = format!("self.{}", rust_name);

        if field.is_array {
            let array = format!(
                "{}::Array({}.iter().map(|item| {}).collect())",
                value,
                place,
                to_value(type_name, "item", true)
            );
            if record.is_message() {
                printer.open(format!("if !{}.is_empty() {{", place));
                printer.line(format!("fields.insert(\"{}\", {});", field.name, array));
                printer.close("}");
            } else {
                printer.line(format!("fields.insert(\"{}\", {});", field.name, array));
            }
        } else if record.is_message() {
            printer.open(format!("if let Some(value) = &{} {{", place));
            printer.line(format!("fields.insert(\"{}\", {});", field.name, to_value(type_name, "value", true)));
            printer.close("}");
        } else {
            printer.line(format!("fields.insert(\"{}\", {});", field.name, to_value(type_name, &place, false)));
        }
    }

    printer.line(format!("{}::Object(\"{}\", fields)", value, record.name()));
    printer.close("}");
    printer.close("}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema, verifier::verify_schema};

    fn generate(text: &str) -> String {
        let schema = parse_schema(&tokenize_schema(text).unwrap()).unwrap();
        verify_schema(&schema).unwrap();
        compile_schema_to_rust(&schema).unwrap()
    }

    #[test]
    fn field_types() {
        let code = generate(
            "struct Color { byte red; bytes raw; float[] levels; } \
             message Shape { Color color = 1; string[] tags = 2; uint64 id = 3; }",
        );
        assert!(code.contains("pub red: u8,"));
        assert!(code.contains("pub raw: Vec<u8>,"));
        assert!(code.contains("pub levels: Vec<f32>,"));
        assert!(code.contains("pub color: Option<Color>,"));
        assert!(code.contains("pub tags: Vec<String>,"));
        assert!(code.contains("pub id: Option<u64>,"));
        assert!(code.contains("pub unrecognized_fields: Vec<u8>,"));
    }

    #[test]
    fn package_becomes_a_module() {
        let code = generate("package Demo; message M { int x = 1; }");
        assert!(code.starts_with(
            "pub mod demo {\n    use std::collections::HashMap;\n\n    use brine_equal::FromKiwi;\n"
        ));
        assert!(code.trim_end().ends_with('}'));
    }

    #[test]
    fn renamed_fields_keep_their_kiwi_key() {
        let code = generate("message M { uint clientID = 1; int type = 2; }");
        assert!(code.contains("#[serde(rename = \"clientID\")]\n    pub client_id: Option<u32>,"));
        assert!(code.contains("pub type_: Option<i32>,"));
        assert!(code.contains("if let Some(value) = value.get(\"clientID\") {"));
        assert!(code.contains("fields.insert(\"type\", Value::Int(*value));"));
    }

    #[test]
    fn struct_fields_are_required_on_decode() {
        let code = generate("struct P { int x; }");
        assert!(code.contains("None => return Err(KiwiError::MissingField(\"x\".to_string())),"));
        assert!(code.contains("fields.insert(\"x\", Value::Int(self.x));"));
    }

    #[test]
    fn extension_storage() {
        let code = generate("message E { extensions; }");
        assert!(code.contains("pub extension_fields: BTreeMap<u32, Extension>,"));

        let code = generate("option extensions_map_all = false; message E { extensions; }");
        assert!(code.contains("pub extension_fields: Vec<u8>,"));
        assert!(!code.contains("BTreeMap"));
    }

    #[test]
    fn enums_round_trip_by_name() {
        let code = generate("enum Type { FLAT = 0; ROUND = 1; }");
        assert!(code.contains("\"ROUND\" => Ok(Type::Round),"));
        assert!(code.contains("Type::Round => \"ROUND\","));
        assert!(code.contains("#[default]\n    Flat,"));
    }

    #[test]
    fn comparisons_follow_options() {
        let code = generate("message A [equal] { int x = 1; } message B { int x = 1; }");
        assert!(code.contains("impl Equal for A {"));
        assert!(!code.contains("impl Equal for B {"));
        assert!(!code.contains("impl VerboseEqual"));
        assert!(!code.contains("impl Populate"));
    }

    #[test]
    fn schema_constant_matches_the_binary_schema() {
        let text = "message M { int x = 1; }";
        let code = generate(text);
        let (_, binary) = crate::compile_schema(text).unwrap();
        let first: Vec<String> = binary.iter().take(4).map(|b| b.to_string()).collect();
        assert!(code.contains(&format!("pub const SCHEMA: &[u8] = &[\n    {}", first.join(", "))));
    }
}
