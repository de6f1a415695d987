use std::collections::HashMap;

use brine_equal::{wire, FromKiwi, KiwiError, KiwiRecord, ToKiwi, Value};
use pretty_assertions::assert_eq;

// struct Point { int x; int y; }
const POINT_SCHEMA: &[u8] = &[
    1, b'P', b'o', b'i', b'n', b't', 0, 1, 2,
    b'x', 0, 5, 0, 1,
    b'y', 0, 5, 0, 2,
];

#[derive(Debug, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl FromKiwi for Point {
    fn from_kiwi(value: &Value) -> Result<Self, KiwiError> {
        let field = |name: &str| {
            value
                .get(name)
                .map(Value::as_int)
                .ok_or_else(|| KiwiError::MissingField(name.to_string()))
        };
        Ok(Point { x: field("x")?, y: field("y")? })
    }
}

impl ToKiwi for Point {
    fn to_kiwi(&self) -> Value<'static> {
        let mut fields = HashMap::new();
        fields.insert("x", Value::Int(self.x));
        fields.insert("y", Value::Int(self.y));
        Value::Object("Point", fields)
    }
}

impl KiwiRecord for Point {
    const SCHEMA: &'static [u8] = POINT_SCHEMA;
    const TYPE_NAME: &'static str = "Point";
}

#[test]
fn embedded_schema_matches_the_compiler() {
    let (_, binary) = brine_equal_compiler::compile_schema("struct Point { int x; int y; }").unwrap();
    assert_eq!(binary, POINT_SCHEMA);
}

#[test]
fn encode_then_decode() {
    let point = Point { x: 2, y: -3 };
    let bytes = wire::encode(&point).unwrap();
    assert_eq!(bytes, [4, 5]);
    assert_eq!(wire::decode::<Point>(&bytes).unwrap(), point);
}

#[test]
fn truncated_input_is_an_error() {
    let err = wire::decode::<Point>(&[4]).unwrap_err();
    assert!(matches!(err, KiwiError::Wire(_)), "{:?}", err);
}
