use crate::{
    bb::{ByteBuffer, ByteBufferMut},
    error::WireError,
    schema::{Def, DefKind, Field, Schema},
    TYPE_BOOL, TYPE_BYTE, TYPE_BYTES, TYPE_FLOAT, TYPE_INT, TYPE_INT64, TYPE_STRING, TYPE_UINT,
    TYPE_UINT64,
};

use std::collections::HashMap;
use std::fmt;

/// Dynamic Kiwi data.
///
/// Values can represent anything in a Kiwi schema and are converted to and
/// from bytes with the corresponding [Schema](struct.Schema.html). Enum and
/// field names borrow from the schema, so a decoded value can outlive the
/// buffer it was read from but not the schema.
#[derive(Clone, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Byte(u8),
    Int(i32),
    UInt(u32),
    Float(f32),
    String(String),
    Int64(i64),
    UInt64(u64),
    Bytes(Vec<u8>),
    Array(Vec<Value<'a>>),
    Enum(&'a str, &'a str),
    Object(&'a str, HashMap<&'a str, Value<'a>>),
}

impl<'a> Value<'a> {
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Bool(value) => value,
            _ => false,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match *self {
            Value::Byte(value) => value,
            _ => 0,
        }
    }

    pub fn as_int(&self) -> i32 {
        match *self {
            Value::Int(value) => value,
            _ => 0,
        }
    }

    pub fn as_uint(&self) -> u32 {
        match *self {
            Value::UInt(value) => value,
            _ => 0,
        }
    }

    pub fn as_int64(&self) -> i64 {
        match *self {
            Value::Int64(value) => value,
            _ => 0,
        }
    }

    pub fn as_uint64(&self) -> u64 {
        match *self {
            Value::UInt64(value) => value,
            _ => 0,
        }
    }

    pub fn as_float(&self) -> f32 {
        match *self {
            Value::Float(value) => value,
            _ => 0.0,
        }
    }

    /// Also returns the variant name of an [Enum](#variant.Enum); `""` for
    /// other value kinds.
    pub fn as_string(&self) -> &str {
        match *self {
            Value::String(ref value) => value.as_str(),
            Value::Enum(_, value) => value,
            _ => "",
        }
    }

    /// Returns an empty slice for other value kinds.
    pub fn as_bytes(&self) -> &[u8] {
        match *self {
            Value::Bytes(ref value) => value.as_slice(),
            _ => &[],
        }
    }

    pub fn as_array(&self) -> &[Value<'a>] {
        match *self {
            Value::Array(ref values) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        match *self {
            Value::Array(ref values) => values.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field lookup on an [Object](#variant.Object).
    pub fn get(&self, name: &str) -> Option<&Value<'a>> {
        match *self {
            Value::Object(_, ref fields) => fields.get(name),
            _ => None,
        }
    }

    /// Decodes the type `type_id` of `schema` from `bytes`.
    pub fn decode(schema: &'a Schema, type_id: i32, bytes: &[u8]) -> Result<Value<'a>, WireError> {
        Value::decode_bb(schema, type_id, &mut ByteBuffer::new(bytes))
    }

    pub fn encode(&self, schema: &Schema) -> Result<Vec<u8>, WireError> {
        let mut bb = ByteBufferMut::new();
        self.encode_bb(schema, &mut bb)?;
        Ok(bb.data())
    }

    /// Decodes `type_id` starting at the current index of `bb`, advancing it
    /// past everything that was read.
    pub fn decode_bb(
        schema: &'a Schema,
        type_id: i32,
        bb: &mut ByteBuffer,
    ) -> Result<Value<'a>, WireError> {
        match type_id {
            TYPE_BOOL   => Ok(Value::Bool(bb.read_bool()?)),
            TYPE_BYTE   => Ok(Value::Byte(bb.read_byte()?)),
            TYPE_INT    => Ok(Value::Int(bb.read_var_int()?)),
            TYPE_UINT   => Ok(Value::UInt(bb.read_var_uint()?)),
            TYPE_FLOAT  => Ok(Value::Float(bb.read_var_float()?)),
            TYPE_STRING => Ok(Value::String(bb.read_string()?.into_owned())),
            TYPE_INT64  => Ok(Value::Int64(bb.read_var_int64()?)),
            TYPE_UINT64 => Ok(Value::UInt64(bb.read_var_uint64()?)),
            TYPE_BYTES  => Ok(Value::Bytes(bb.read_byte_array()?.to_vec())),

            _ => {
                let def = usize::try_from(type_id)
                    .ok()
                    .and_then(|index| schema.defs.get(index))
                    .ok_or(WireError::UnknownTypeId(type_id))?;

                match def.kind {
                    DefKind::Enum => {
                        let value = bb.read_var_uint()?;
                        let index = field_index(def, value)?;
                        Ok(Value::Enum(def.name.as_str(), def.fields[index].name.as_str()))
                    }

                    DefKind::Struct => {
                        let mut fields = HashMap::new();
                        for field in &def.fields {
                            fields.insert(
                                field.name.as_str(),
                                Value::decode_field_bb(schema, field, bb)?,
                            );
                        }
                        Ok(Value::Object(def.name.as_str(), fields))
                    }

                    DefKind::Message => {
                        let mut fields = HashMap::new();
                        loop {
                            let value = bb.read_var_uint()?;
                            if value == 0 {
                                return Ok(Value::Object(def.name.as_str(), fields));
                            }
                            let field = &def.fields[field_index(def, value)?];
                            fields.insert(
                                field.name.as_str(),
                                Value::decode_field_bb(schema, field, bb)?,
                            );
                        }
                    }
                }
            }
        }
    }

    pub fn decode_field_bb(
        schema: &'a Schema,
        field: &Field,
        bb: &mut ByteBuffer,
    ) -> Result<Value<'a>, WireError> {
        if field.is_array {
            let len = bb.read_var_uint()? as usize;
            let mut array = Vec::with_capacity(len.min(bb.data().len()));
            for _ in 0..len {
                array.push(Value::decode_bb(schema, field.type_id, bb)?);
            }
            Ok(Value::Array(array))
        } else {
            Value::decode_bb(schema, field.type_id, bb)
        }
    }

    /// Encodes this value onto the end of `bb`. Messages are written in
    /// schema field order regardless of map iteration order.
    pub fn encode_bb(&self, schema: &Schema, bb: &mut ByteBufferMut) -> Result<(), WireError> {
        match *self {
            Value::Bool(value)       => bb.write_bool(value),
            Value::Byte(value)       => bb.write_byte(value),
            Value::Int(value)        => bb.write_var_int(value),
            Value::UInt(value)       => bb.write_var_uint(value),
            Value::Float(value)      => bb.write_var_float(value),
            Value::String(ref value) => bb.write_string(value.as_str()),
            Value::Int64(value)      => bb.write_var_int64(value),
            Value::UInt64(value)     => bb.write_var_uint64(value),
            Value::Bytes(ref value)  => bb.write_byte_array(value),

            Value::Array(ref values) => {
                bb.write_var_uint(values.len() as u32);
                for value in values {
                    value.encode_bb(schema, bb)?;
                }
            }

            Value::Enum(name, value) => {
                let def = lookup_def(schema, name)?;
                let index = def.field_name_to_index.get(value).ok_or_else(|| {
                    WireError::UnknownVariant { def: name.to_owned(), name: value.to_owned() }
                })?;
                bb.write_var_uint(def.fields[*index].value);
            }

            Value::Object(name, ref fields) => {
                let def = lookup_def(schema, name)?;
                match def.kind {
                    DefKind::Enum => {
                        return Err(WireError::KindMismatch {
                            value:    format!("object {}", name),
                            expected: format!("enum {}", def.name),
                        })
                    }
                    DefKind::Struct => {
                        for field in &def.fields {
                            fields
                                .get(field.name.as_str())
                                .ok_or_else(|| WireError::MissingStructField {
                                    def:   def.name.clone(),
                                    field: field.name.clone(),
                                })?
                                .encode_bb(schema, bb)?;
                        }
                    }
                    DefKind::Message => {
                        for field in &def.fields {
                            if let Some(value) = fields.get(field.name.as_str()) {
                                bb.write_var_uint(field.value);
                                value.encode_bb(schema, bb)?;
                            }
                        }
                        bb.write_byte(0);
                    }
                }
            }
        }
        Ok(())
    }
}

fn lookup_def<'s>(schema: &'s Schema, name: &str) -> Result<&'s Def, WireError> {
    schema.def(name).ok_or_else(|| WireError::UnknownDefinition(name.to_owned()))
}

fn field_index(def: &Def, value: u32) -> Result<usize, WireError> {
    def.field_value_to_index
        .get(&value)
        .copied()
        .ok_or_else(|| WireError::UnknownFieldValue { def: def.name.clone(), value })
}

impl<'a> fmt::Debug for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Value::Bool(value) => value.fmt(f),
            Value::Byte(value) => value.fmt(f),
            Value::Int(value) => value.fmt(f),
            Value::UInt(value) => value.fmt(f),
            Value::Float(value) => value.fmt(f),
            Value::String(ref value) => value.fmt(f),
            Value::Int64(value) => value.fmt(f),
            Value::UInt64(value) => value.fmt(f),
            Value::Bytes(ref value) => value.fmt(f),
            Value::Array(ref values) => values.fmt(f),
            Value::Enum(name, value) => write!(f, "{}::{}", name, value),

            Value::Object(name, ref fields) => {
                let mut keys: Vec<_> = fields.keys().collect();
                keys.sort();
                write!(f, "{} {{", name)?;

                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, fields[key])?;
                }

                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object<'a>(name: &'a str, entries: Vec<(&'a str, Value<'a>)>) -> Value<'a> {
        Value::Object(name, entries.into_iter().collect())
    }

    fn schema() -> Schema {
        Schema::new(vec![
            Def::new("Shade".to_owned(), DefKind::Enum, vec![
                Field { name: "DARK".to_owned(), type_id: 0, is_array: false, value: 100 },
                Field { name: "LIGHT".to_owned(), type_id: 0, is_array: false, value: 200 },
            ]),
            Def::new("Point".to_owned(), DefKind::Struct, vec![
                Field { name: "x".to_owned(), type_id: TYPE_FLOAT, is_array: false, value: 1 },
                Field { name: "y".to_owned(), type_id: TYPE_FLOAT, is_array: false, value: 2 },
            ]),
            Def::new("Shape".to_owned(), DefKind::Message, vec![
                Field { name: "shade".to_owned(), type_id: 0, is_array: false, value: 1 },
                Field { name: "points".to_owned(), type_id: 1, is_array: true, value: 2 },
                Field { name: "blob".to_owned(), type_id: TYPE_BYTES, is_array: false, value: 3 },
                Field { name: "label".to_owned(), type_id: TYPE_STRING, is_array: false, value: 4 },
            ]),
        ])
    }

    #[test]
    fn accessors_default_on_other_kinds() {
        let value = Value::Array(vec![
            Value::Bool(true),
            Value::Bytes(vec![1, 2]),
            Value::Enum("Shade", "DARK"),
            object("Point", vec![("x", Value::Float(0.5))]),
        ]);

        assert_eq!(value.len(), 4);
        assert!(value.as_array()[0].as_bool());
        assert_eq!(value.as_array()[1].as_bytes(), &[1, 2]);
        assert_eq!(value.as_array()[2].as_string(), "DARK");
        assert_eq!(value.as_array()[3].get("x"), Some(&Value::Float(0.5)));
        assert_eq!(value.as_array()[0].as_bytes(), &[] as &[u8]);
        assert_eq!(value.get("x"), None);
        assert_eq!(
            format!("{:?}", value),
            "[true, [1, 2], Shade::DARK, Point {x: 0.5}]"
        );
    }

    #[test]
    fn message_round_trip() {
        let schema = schema();
        let shape = object("Shape", vec![
            ("shade", Value::Enum("Shade", "LIGHT")),
            ("points", Value::Array(vec![
                object("Point", vec![("x", Value::Float(0.5)), ("y", Value::Float(-0.5))]),
            ])),
            ("blob", Value::Bytes(vec![0, 255, 7])),
        ]);

        let bytes = shape.encode(&schema).unwrap();
        assert_eq!(
            bytes,
            [1, 200, 1, 2, 1, 126, 0, 0, 0, 126, 1, 0, 0, 3, 3, 0, 255, 7, 0]
        );
        assert_eq!(Value::decode(&schema, 2, &bytes).unwrap(), shape);
    }

    #[test]
    fn struct_requires_every_field() {
        let schema = schema();
        let point = object("Point", vec![("x", Value::Float(1.0))]);
        assert_eq!(
            point.encode(&schema),
            Err(WireError::MissingStructField { def: "Point".to_owned(), field: "y".to_owned() })
        );
    }

    #[test]
    fn decode_reports_unknown_tags() {
        let schema = schema();
        assert_eq!(
            Value::decode(&schema, 2, &[9, 0]),
            Err(WireError::UnknownFieldValue { def: "Shape".to_owned(), value: 9 })
        );
        assert_eq!(Value::decode(&schema, 7, &[0]), Err(WireError::UnknownTypeId(7)));
    }

    #[test]
    fn unknown_variant_is_an_error() {
        let schema = schema();
        assert_eq!(
            Value::Enum("Shade", "GREY").encode(&schema),
            Err(WireError::UnknownVariant { def: "Shade".to_owned(), name: "GREY".to_owned() })
        );
    }
}
