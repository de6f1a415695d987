// example/src/main.rs

use std::collections::HashMap;
use brine_equal::*;

use example_app::example::{Color, Example, Type};

fn main() -> Result<(), KiwiError> {

    // Manually construct a `Value::Object("Example", fields)` that matches the schema.
    let mut example_fields: HashMap<&'static str, Value> = HashMap::new();

    // 1) "clientID": 123
    example_fields.insert("clientID", Value::UInt(123));

    // 2) "type": Enum("Type", "ROUND")
    example_fields.insert("type", Value::Enum("Type", "ROUND"));

    // 3) "colors": an array of two Color‐objects
    let mut c1: HashMap<&'static str, Value> = HashMap::new();
    c1.insert("red",   Value::Byte(10));
    c1.insert("green", Value::Byte(20));
    c1.insert("blue",  Value::Byte(30));
    c1.insert("alpha", Value::Byte(255));
    let color1 = Value::Object("Color", c1);

    let mut c2: HashMap<&'static str, Value> = HashMap::new();
    c2.insert("red",   Value::Byte(200));
    c2.insert("green", Value::Byte(100));
    c2.insert("blue",  Value::Byte(50));
    c2.insert("alpha", Value::Byte(128));
    let color2 = Value::Object("Color", c2);

    example_fields.insert("colors", Value::Array(vec![color1, color2]));

    let v = Value::Object("Example", example_fields);
    let example = Example::from_kiwi(&v)?;

    // A copy that went through the binary encoding compares equal.
    let bytes = wire::encode(&example)?;
    let decoded: Example = wire::decode(&bytes)?;
    println!("encoded {} bytes, equal after decode: {}", bytes.len(), example.equal_to(&decoded));

    // Change one color and ask where the two differ.
    let mut changed = decoded.clone();
    changed.colors[1] = Color { red: 201, ..changed.colors[1].clone() };
    changed.type_ = Some(Type::Pointed);

    match example.verbose_equal_to(&changed) {
        Ok(()) => println!("no difference"),
        Err(mismatch) => println!("{:?}: {}", mismatch.kind, mismatch),
    }

    Ok(())
}
