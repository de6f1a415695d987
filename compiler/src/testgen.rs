//! Emits `Populate` implementations and the round-trip self-test that
//! checks a generated comparison against the wire codec.

use crate::{
    classify::{classify, Cardinality},
    imports::Imports,
    printer::Printer,
    record::RecordType,
    types::{Definition, Field},
    utils::{escape_rust_keyword, rust_field_name, to_pascal_case, to_snake_case},
    verifier::{EXTENSIONS_FIELD, UNRECOGNIZED_FIELD},
};

/// A random value of `type_name`, for use inside `populate`.
fn random_value(imports: &mut Imports, type_name: &str) -> String {
    let native = match type_name {
        "bool"   => Some("bool"),
        "byte"   => Some("u8"),
        "int"    => Some("i32"),
        "uint"   => Some("u32"),
        "int64"  => Some("i64"),
        "uint64" => Some("u64"),
        _ => None,
    };
    if let Some(native) = native {
        return format!("rng.gen::<{}>()", native);
    }

    match type_name {
        "float" => format!("{}(rng)", imports.use_path("brine_equal::populate::random_float")),
        "string" => format!("{}(rng)", imports.use_path("brine_equal::populate::random_string")),
        "bytes" => format!("{}(rng)", imports.use_path("brine_equal::populate::random_bytes")),
        other => format!("{}::populate(rng, depth + 1)", to_pascal_case(other)),
    }
}

fn populate_header(printer: &mut Printer, imports: &mut Imports, name: &str, depth: &str) {
    let populate = imports.use_path("brine_equal::Populate");
    let rng = imports.use_path("brine_equal::rand::Rng");
    printer.open(format!("impl {} for {} {{", populate, name));
    printer.open(format!("fn populate<R: {}>(rng: &mut R, {}: usize) -> Self {{", rng, depth));
}

pub fn emit_populate_enum(printer: &mut Printer, imports: &mut Imports, definition: &Definition) {
    let name = to_pascal_case(&definition.name);
    let variants: Vec<String> = definition
        .fields
        .iter()
        .map(|field| format!("{}::{}", name, escape_rust_keyword(&to_pascal_case(&field.name))))
        .collect();

    match variants.as_slice() {
        [] => {}
        [only] => {
            populate_header(printer, imports, &name, "_depth");
            printer.line("let _ = rng;");
            printer.line(only);
            printer.close("}");
            printer.close("}");
        }
        [init @ .., last] => {
            populate_header(printer, imports, &name, "_depth");
            printer.open(format!("match rng.gen_range(0..{}) {{", variants.len()));
            for (i, variant) in init.iter().enumerate() {
                printer.line(format!("{} => {},", i, variant));
            }
            printer.line(format!("_ => {},", last));
            printer.close("}");
            printer.close("}");
            printer.close("}");
        }
    }
}

fn populate_field(imports: &mut Imports, record: &RecordType, field: &Field) -> String {
    let class = classify(record, field);
    let type_name = field.type_.as_deref().unwrap_or("bool");
    let value = random_value(imports, type_name);

    match class.cardinality {
        Cardinality::Required => value,
        Cardinality::Optional => {
            let guard = if class.category.delegates() {
                format!("depth < {} && rng.gen::<bool>()", imports.use_path("brine_equal::populate::MAX_DEPTH"))
            } else {
                "rng.gen::<bool>()".to_string()
            };
            format!("if {} {{ Some({}) }} else {{ None }}", guard, value)
        }
        Cardinality::Repeated => {
            let random_len = imports.use_path("brine_equal::populate::random_len");
            format!("(0..{}(rng, depth)).map(|_| {}).collect()", random_len, value)
        }
    }
}

/// Fills every declared field; extensions and unrecognized bytes stay empty
/// since the wire codec does not carry them.
pub fn emit_populate(printer: &mut Printer, imports: &mut Imports, record: &RecordType) {
    let name = record.rust_name();
    let uses_depth = record.fields().iter().any(|field| {
        field.is_array
            || field
                .type_
                .as_deref()
                .map_or(false, |ty| record.schema().definition(ty).is_some())
    });

    if record.fields().iter().any(|field| field.is_deprecated) {
        printer.line("#[allow(deprecated)]");
    }
    populate_header(printer, imports, &name, if uses_depth { "depth" } else { "_depth" });
    printer.open(format!("{} {{", name));
    for field in record.fields() {
        printer.line(format!("{}: {},", rust_field_name(&field.name), populate_field(imports, record, field)));
    }
    printer.line(format!("{}: Vec::new(),", UNRECOGNIZED_FIELD));
    if record.supports_extensions() {
        printer.line(format!("{}: Default::default(),", EXTENSIONS_FIELD));
    }
    printer.close("}");
    printer.close("}");
    printer.close("}");
}

/// A `#[cfg(test)]` module that populates a random instance, sends it
/// through the wire codec and compares the result with the original.
pub fn emit_test(printer: &mut Printer, record: &RecordType) {
    let name = record.rust_name();
    let snake = to_snake_case(&name);
    let (variant, call, fails) = if record.verbose_equal_enabled() {
        ("verbose_equal", "if let Err(err) = ", "!VerboseEqual {:?}, since {}\", seed, msg, p, err")
    } else {
        ("equal", "if !", "!Equal {:?}\", seed, msg, p")
    };

    printer.line("#[cfg(test)]");
    printer.open(format!("mod {}_equal_tests {{", snake));
    printer.line("use super::*;");
    printer.blank();
    printer.line("#[test]");
    printer.open(format!("fn test_{}_{}() {{", snake, variant));
    printer.line("let (seed, mut popr) = brine_equal::populate::seeded_rng();");
    printer.line(format!("let p = {}::populate(&mut popr, 0);", name));
    printer.open("let data = match brine_equal::wire::encode(&p) {");
    printer.line("Ok(data) => data,");
    printer.line("Err(err) => panic!(\"seed = {}: {}\", seed, err),");
    printer.close("};");
    printer.open(format!("let msg: {} = match brine_equal::wire::decode(&data) {{", name));
    printer.line("Ok(msg) => msg,");
    printer.line("Err(err) => panic!(\"seed = {}: {}\", seed, err),");
    printer.close("};");
    printer.open(format!("{}{}::{}(Some(&p), Some(&msg as &dyn Any)) {{", call, name, variant));
    printer.line(format!("panic!(\"seed = {{}}: {{:?}} {});", fails));
    printer.close("}");
    printer.close("}");
    printer.close("}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema, types::Schema};

    fn schema(text: &str) -> Schema {
        parse_schema(&tokenize_schema(text).unwrap()).unwrap()
    }

    #[test]
    fn populate_covers_every_field() {
        let schema = schema(
            "enum Kind { A = 0; B = 1; } \
             struct Color { byte red; } \
             message M [equal] { string s = 1; Color c = 2; float[] f = 3; Kind k = 4; extensions; }",
        );
        let record = RecordType::lookup(&schema, "M").unwrap();
        let mut printer = Printer::new();
        let mut imports = Imports::new();
        emit_populate(&mut printer, &mut imports, &record);
        let code = printer.finish();

        assert!(code.contains("fn populate<R: Rng>(rng: &mut R, depth: usize) -> Self {"));
        assert!(code.contains("s: if rng.gen::<bool>() { Some(random_string(rng)) } else { None },"));
        assert!(code.contains(
            "c: if depth < MAX_DEPTH && rng.gen::<bool>() { Some(Color::populate(rng, depth + 1)) } else { None },"
        ));
        assert!(code.contains("f: (0..random_len(rng, depth)).map(|_| random_float(rng)).collect(),"));
        assert!(code.contains("k: if rng.gen::<bool>() { Some(Kind::populate(rng, depth + 1)) } else { None },"));
        assert!(code.contains("unrecognized_fields: Vec::new(),"));
        assert!(code.contains("extension_fields: Default::default(),"));
        assert!(imports.contains("brine_equal::rand::Rng"));
    }

    #[test]
    fn enum_populate_picks_a_variant() {
        let schema = schema("enum Kind { FLAT = 0; ROUND = 1; POINTED = 2; }");
        let mut printer = Printer::new();
        let mut imports = Imports::new();
        emit_populate_enum(&mut printer, &mut imports, &schema.definitions[0]);
        let code = printer.finish();

        assert!(code.contains("match rng.gen_range(0..3) {"));
        assert!(code.contains("0 => Kind::Flat,"));
        assert!(code.contains("_ => Kind::Pointed,"));
    }

    #[test]
    fn self_test_prefers_the_verbose_variant() {
        let schema = schema("message B [equal, verbose_equal, testgen] { string a = 1; }");
        let record = RecordType::lookup(&schema, "B").unwrap();
        let mut printer = Printer::new();
        emit_test(&mut printer, &record);
        let code = printer.finish();

        assert!(code.contains("mod b_equal_tests {"));
        assert!(code.contains("fn test_b_verbose_equal() {"));
        assert!(code.contains("if let Err(err) = B::verbose_equal(Some(&p), Some(&msg as &dyn Any)) {"));
    }

    #[test]
    fn self_test_falls_back_to_equal() {
        let schema = schema("message B [equal, testgen] { string a = 1; }");
        let record = RecordType::lookup(&schema, "B").unwrap();
        let mut printer = Printer::new();
        emit_test(&mut printer, &record);
        let code = printer.finish();

        assert!(code.contains("fn test_b_equal() {"));
        assert!(code.contains("if !B::equal(Some(&p), Some(&msg as &dyn Any)) {"));
        assert!(code.contains("panic!(\"seed = {}: {:?} !Equal {:?}\", seed, msg, p);"));
    }
}
