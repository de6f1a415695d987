//! Emits `Equal` and `VerboseEqual` implementations for record types.
//!
//! Both variants walk the same checks in the same order. They only differ in
//! what a failed check returns, which is decided by a [`Report`] strategy:
//! [`Plain`] returns `false`, [`Verbose`] returns a `Mismatch` describing the
//! first difference found.

use tracing::debug;

use crate::{
    classify::{classify, Cardinality, FieldCategory, FieldClass},
    imports::Imports,
    printer::Printer,
    record::{RecordType, Variant},
    types::Field,
    utils::rust_field_name,
    verifier::{EXTENSIONS_FIELD, UNRECOGNIZED_FIELD},
};

/// Mirrors `brine_equal::MismatchKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    Absence,
    Type,
    FieldPresence,
    FieldValue,
    Length,
    Element,
    Extension,
    UnrecognizedBytes,
}

impl MismatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MismatchKind::Absence           => "Absence",
            MismatchKind::Type              => "Type",
            MismatchKind::FieldPresence     => "FieldPresence",
            MismatchKind::FieldValue        => "FieldValue",
            MismatchKind::Length            => "Length",
            MismatchKind::Element           => "Element",
            MismatchKind::Extension         => "Extension",
            MismatchKind::UnrecognizedBytes => "UnrecognizedBytes",
        }
    }
}

/// What the generated code does when a check passes or fails.
pub trait Report {
    fn variant(&self) -> Variant;

    /// `(trait path, method name, return type)`.
    fn signature(&self, imports: &mut Imports) -> (String, &'static str, String);

    fn on_match(&self) -> &'static str;

    /// An expression for the value returned at a failed check. `format` is a
    /// `format!` template and `args` its arguments.
    fn on_mismatch(&self, imports: &mut Imports, kind: MismatchKind, format: &str, args: &[&str]) -> String;

    /// Whether failed checks embed the compared values, and so need them bound.
    fn describes(&self) -> bool;

    /// The condition of an `if` that holds when the nested records `lhs` and
    /// `rhs` (both references) differ.
    fn delegate(&self, type_name: &str, lhs: &str, rhs: &str) -> String;

    /// A format suffix and argument carrying the nested record's own report.
    fn delegate_detail(&self) -> Option<(&'static str, &'static str)>;
}

pub struct Plain;

impl Report for Plain {
    fn variant(&self) -> Variant {
        Variant::Equal
    }

    fn signature(&self, imports: &mut Imports) -> (String, &'static str, String) {
        imports.use_path("brine_equal::Equal");
        ("Equal".to_string(), "equal", "bool".to_string())
    }

    fn on_match(&self) -> &'static str {
        "true"
    }

    fn on_mismatch(&self, _imports: &mut Imports, _kind: MismatchKind, _format: &str, _args: &[&str]) -> String {
        "false".to_string()
    }

    fn describes(&self) -> bool {
        false
    }

    fn delegate(&self, type_name: &str, lhs: &str, rhs: &str) -> String {
        format!("!{}::equal(Some({}), Some({} as &dyn Any))", type_name, lhs, rhs)
    }

    fn delegate_detail(&self) -> Option<(&'static str, &'static str)> {
        None
    }
}

pub struct Verbose;

impl Report for Verbose {
    fn variant(&self) -> Variant {
        Variant::VerboseEqual
    }

    fn signature(&self, imports: &mut Imports) -> (String, &'static str, String) {
        imports.use_path("brine_equal::VerboseEqual");
        let mismatch = imports.use_path("brine_equal::Mismatch");
        ("VerboseEqual".to_string(), "verbose_equal", format!("Result<(), {}>", mismatch))
    }

    fn on_match(&self) -> &'static str {
        "Ok(())"
    }

    fn on_mismatch(&self, imports: &mut Imports, kind: MismatchKind, format: &str, args: &[&str]) -> String {
        let mismatch = imports.use_path("brine_equal::Mismatch");
        let kinds = imports.use_path("brine_equal::MismatchKind");
        let message = if args.is_empty() {
            format!("\"{}\"", format)
        } else {
            format!("format!(\"{}\", {})", format, args.join(", "))
        };
        format!("Err({}::new({}::{}, {}))", mismatch, kinds, kind.as_str(), message)
    }

    fn describes(&self) -> bool {
        true
    }

    fn delegate(&self, type_name: &str, lhs: &str, rhs: &str) -> String {
        format!("let Err(err) = {}::verbose_equal(Some({}), Some({} as &dyn Any))", type_name, lhs, rhs)
    }

    fn delegate_detail(&self) -> Option<(&'static str, &'static str)> {
        Some((": {}", "err"))
    }
}

/// Emits the `impl` of `report`'s variant for `record`.
pub fn emit(printer: &mut Printer, imports: &mut Imports, record: &RecordType, report: &dyn Report) {
    debug!(record = record.name(), variant = report.variant().option_name(), "emitting comparison");

    let name = record.rust_name();
    let any = imports.use_path("std::any::Any");
    let (trait_name, method, output) = report.signature(imports);

    if record.fields().iter().any(|field| field.is_deprecated) {
        printer.line("#[allow(deprecated)]");
    }
    printer.open(format!("impl {} for {} {{", trait_name, name));
    printer.open(format!(
        "fn {}(this: Option<&Self>, that: Option<&dyn {}>) -> {} {{",
        method, any, output
    ));

    emit_absence(printer, imports, &name, report);
    for field in record.fields() {
        emit_field(printer, imports, record, field, report);
    }
    if record.supports_extensions() {
        emit_extensions(printer, imports, record, report);
    }
    emit_unrecognized(printer, imports, report);

    printer.line(report.on_match());
    printer.close("}");
    printer.close("}");
}

/// Writes `if condition { return mismatch; }`.
fn check(
    printer: &mut Printer,
    imports: &mut Imports,
    report: &dyn Report,
    condition: &str,
    kind: MismatchKind,
    format: &str,
    args: &[&str],
) {
    printer.open(format!("if {} {{", condition));
    printer.line(format!("return {};", report.on_mismatch(imports, kind, format, args)));
    printer.close("}");
}

fn emit_absence(printer: &mut Printer, imports: &mut Imports, name: &str, report: &dyn Report) {
    let on_match = report.on_match();

    printer.open("let Some(that) = that else {");
    printer.open("if this.is_none() {");
    printer.line(format!("return {};", on_match));
    printer.close("}");
    printer.line(format!(
        "return {};",
        report.on_mismatch(imports, MismatchKind::Absence, "that == None && this != None", &[])
    ));
    printer.close("};");
    printer.blank();

    printer.open(format!("let that1 = if let Some(that1) = that.downcast_ref::<{}>() {{", name));
    printer.line("Some(that1)");
    printer.reopen(format!("}} else if let Some(that1) = that.downcast_ref::<Option<{}>>() {{", name));
    printer.line("that1.as_ref()");
    printer.reopen("} else {");
    printer.line(format!(
        "return {};",
        report.on_mismatch(imports, MismatchKind::Type, &format!("that is not of type {}", name), &[])
    ));
    printer.close("};");

    printer.open("let Some(that1) = that1 else {");
    printer.open("if this.is_none() {");
    printer.line(format!("return {};", on_match));
    printer.close("}");
    printer.line(format!(
        "return {};",
        report.on_mismatch(
            imports,
            MismatchKind::Absence,
            &format!("that is type {} but is None && this != None", name),
            &[]
        )
    ));
    printer.close("};");

    printer.open("let Some(this) = this else {");
    printer.line(format!(
        "return {};",
        report.on_mismatch(
            imports,
            MismatchKind::Absence,
            &format!("that is type {} but is not None && this == None", name),
            &[]
        )
    ));
    printer.close("};");
    printer.blank();
}

/// Condition that holds when `lhs` and `rhs` differ. Both are references,
/// except scalars which may also be places.
fn differs(
    imports: &mut Imports,
    record: &RecordType,
    field: &Field,
    class: FieldClass,
    report: &dyn Report,
    lhs: &str,
    rhs: &str,
) -> String {
    match class.category {
        FieldCategory::Scalar => format!("{} != {}", lhs, rhs),
        FieldCategory::ByteSequence => {
            let bytes_equal = imports.use_path("brine_equal::bytes_equal");
            format!("!{}({}, {})", bytes_equal, lhs, rhs)
        }
        FieldCategory::NestedRecord | FieldCategory::Group => {
            let nested = record
                .nested(field)
                .map(|nested| nested.rust_name())
                .unwrap_or_default();
            report.delegate(&nested, lhs, rhs)
        }
    }
}

/// The format template and arguments for a value mismatch of `name`,
/// extended with the nested report for delegating fields.
fn value_message<'a>(
    report: &dyn Report,
    class: FieldClass,
    template: String,
    mut args: Vec<&'a str>,
) -> (String, Vec<&'a str>) {
    let mut template = template;
    if class.category.delegates() {
        if let Some((suffix, arg)) = report.delegate_detail() {
            template.push_str(suffix);
            args.push(arg);
        }
    }
    (template, args)
}

fn emit_field(
    printer: &mut Printer,
    imports: &mut Imports,
    record: &RecordType,
    field: &Field,
    report: &dyn Report,
) {
    let class = classify(record, field);
    let f = rust_field_name(&field.name);
    let this_f = format!("this.{}", f);
    let that_f = format!("that1.{}", f);

    match class.cardinality {
        Cardinality::Required => {
            let (lhs, rhs) = if class.category == FieldCategory::Scalar {
                (this_f.clone(), that_f.clone())
            } else {
                (format!("&{}", this_f), format!("&{}", that_f))
            };
            let condition = differs(imports, record, field, class, report, &lhs, &rhs);
            let (template, args) = value_message(
                report,
                class,
                format!("{} this({{:?}}) Not Equal that({{:?}})", f),
                vec![this_f.as_str(), that_f.as_str()],
            );
            check(printer, imports, report, &condition, MismatchKind::FieldValue, &template, &args);
        }

        Cardinality::Optional => {
            check(
                printer,
                imports,
                report,
                &format!("{}.is_some() != {}.is_some()", this_f, that_f),
                MismatchKind::FieldPresence,
                &format!("that.{} is not equal to this.{}", f, f),
                &[],
            );

            printer.open(format!("if let (Some(lhs), Some(rhs)) = (&{}, &{}) {{", this_f, that_f));
            let condition = differs(imports, record, field, class, report, "lhs", "rhs");
            let (template, args) = value_message(
                report,
                class,
                format!("{} this({{:?}}) Not Equal that({{:?}})", f),
                vec!["lhs", "rhs"],
            );
            check(printer, imports, report, &condition, MismatchKind::FieldValue, &template, &args);
            printer.close("}");
        }

        Cardinality::Repeated => {
            let this_len = format!("{}.len()", this_f);
            let that_len = format!("{}.len()", that_f);
            check(
                printer,
                imports,
                report,
                &format!("{} != {}", this_len, that_len),
                MismatchKind::Length,
                &format!("{} this(len {{}}) Not Equal that(len {{}})", f),
                &[this_len.as_str(), that_len.as_str()],
            );

            if report.describes() {
                printer.open(format!(
                    "for (i, (lhs, rhs)) in {}.iter().zip(&{}).enumerate() {{",
                    this_f, that_f
                ));
            } else {
                printer.open(format!("for (lhs, rhs) in {}.iter().zip(&{}) {{", this_f, that_f));
            }
            let condition = differs(imports, record, field, class, report, "lhs", "rhs");
            let (template, args) = value_message(
                report,
                class,
                format!("{} this[{{}}]({{:?}}) Not Equal that[{{}}]({{:?}})", f),
                vec!["i", "lhs", "i", "rhs"],
            );
            check(printer, imports, report, &condition, MismatchKind::Element, &template, &args);
            printer.close("}");
        }
    }
}

fn emit_extensions(printer: &mut Printer, imports: &mut Imports, record: &RecordType, report: &dyn Report) {
    let this_f = format!("this.{}", EXTENSIONS_FIELD);
    let that_f = format!("that1.{}", EXTENSIONS_FIELD);

    if !record.extensions_map() {
        let bytes_equal = imports.use_path("brine_equal::bytes_equal");
        check(
            printer,
            imports,
            report,
            &format!("!{}(&{}, &{})", bytes_equal, this_f, that_f),
            MismatchKind::Extension,
            &format!("{} this({{:?}}) Not Equal that({{:?}})", EXTENSIONS_FIELD),
            &[this_f.as_str(), that_f.as_str()],
        );
        return;
    }

    printer.open(format!("for (k, v) in &{} {{", this_f));
    printer.open(format!("match {}.get(k) {{", that_f));
    printer.open("Some(v2) => {");
    check(
        printer,
        imports,
        report,
        "!v.equal(v2)",
        MismatchKind::Extension,
        &format!("{} this[{{}}]({{:?}}) Not Equal that[{{}}]({{:?}})", EXTENSIONS_FIELD),
        &["k", "v", "k", "v2"],
    );
    printer.close("}");
    printer.open("None => {");
    printer.line(format!(
        "return {};",
        report.on_mismatch(
            imports,
            MismatchKind::Extension,
            &format!("{}[{{}}] Not In that", EXTENSIONS_FIELD),
            &["k"]
        )
    ));
    printer.close("}");
    printer.close("}");
    printer.close("}");

    printer.open(format!("for k in {}.keys() {{", that_f));
    check(
        printer,
        imports,
        report,
        &format!("!{}.contains_key(k)", this_f),
        MismatchKind::Extension,
        &format!("{}[{{}}] Not In this", EXTENSIONS_FIELD),
        &["k"],
    );
    printer.close("}");
}

fn emit_unrecognized(printer: &mut Printer, imports: &mut Imports, report: &dyn Report) {
    let this_f = format!("this.{}", UNRECOGNIZED_FIELD);
    let that_f = format!("that1.{}", UNRECOGNIZED_FIELD);
    let bytes_equal = imports.use_path("brine_equal::bytes_equal");
    check(
        printer,
        imports,
        report,
        &format!("!{}(&{}, &{})", bytes_equal, this_f, that_f),
        MismatchKind::UnrecognizedBytes,
        &format!("{} this({{:?}}) Not Equal that({{:?}})", UNRECOGNIZED_FIELD),
        &[this_f.as_str(), that_f.as_str()],
    );
}

/// Emits every variant enabled for `record`, verbose first.
pub fn emit_enabled(printer: &mut Printer, imports: &mut Imports, record: &RecordType) {
    let reports: [&dyn Report; 2] = [&Verbose, &Plain];
    for report in reports {
        if record.enabled(report.variant()) {
            printer.blank();
            emit(printer, imports, record, report);
        }
    }
}
