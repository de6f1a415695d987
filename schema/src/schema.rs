use std::collections::HashMap;

use crate::{
    bb::{ByteBuffer, ByteBufferMut},
    error::WireError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    /// Variants only; each field's `value` is the wire value.
    Enum,
    /// Every field is always present and encoded in declaration order.
    Struct,
    /// Fields are optional and tagged with their `value` on the wire.
    Message,
}

impl DefKind {
    fn to_byte(self) -> u8 {
        match self {
            DefKind::Enum    => 0,
            DefKind::Struct  => 1,
            DefKind::Message => 2,
        }
    }

    fn from_byte(byte: u8) -> Result<DefKind, WireError> {
        match byte {
            0 => Ok(DefKind::Enum),
            1 => Ok(DefKind::Struct),
            2 => Ok(DefKind::Message),
            other => Err(WireError::InvalidKind(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name:     String,
    /// Negative for native types (see `TYPE_*`), otherwise an index into
    /// `Schema::defs`.
    pub type_id:  i32,
    pub is_array: bool,
    pub value:    u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub name:   String,
    pub index:  i32,
    pub kind:   DefKind,
    pub fields: Vec<Field>,

    pub field_value_to_index: HashMap<u32, usize>,
    pub field_name_to_index:  HashMap<String, usize>,
}

impl Def {
    pub fn new(name: String, kind: DefKind, fields: Vec<Field>) -> Def {
        let mut field_value_to_index = HashMap::new();
        let mut field_name_to_index = HashMap::new();
        for (i, field) in fields.iter().enumerate() {
            field_value_to_index.insert(field.value, i);
            field_name_to_index.insert(field.name.clone(), i);
        }
        Def {
            name,
            index: 0,
            kind,
            fields,
            field_value_to_index,
            field_name_to_index,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_name_to_index.get(name).map(|&i| &self.fields[i])
    }
}

/// Runtime view of a compiled Kiwi schema, used to encode and decode
/// [`Value`](crate::Value)s.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub defs:              Vec<Def>,
    pub def_name_to_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(mut defs: Vec<Def>) -> Schema {
        let mut def_name_to_index = HashMap::new();
        for (i, def) in defs.iter_mut().enumerate() {
            def.index = i as i32;
            def_name_to_index.insert(def.name.clone(), i);
        }
        Schema { defs, def_name_to_index }
    }

    pub fn def(&self, name: &str) -> Option<&Def> {
        self.def_name_to_index.get(name).map(|&i| &self.defs[i])
    }

    /// Reads the binary schema format produced by the compiler.
    pub fn decode(bytes: &[u8]) -> Result<Schema, WireError> {
        let mut bb = ByteBuffer::new(bytes);
        let def_count = bb.read_var_uint()?;
        let mut defs = Vec::with_capacity(def_count as usize);

        for _ in 0..def_count {
            let name = bb.read_string()?.into_owned();
            let kind = DefKind::from_byte(bb.read_byte()?)?;
            let field_count = bb.read_var_uint()?;
            let mut fields = Vec::with_capacity(field_count as usize);

            for _ in 0..field_count {
                let name = bb.read_string()?.into_owned();
                let type_id = bb.read_var_int()?;
                let is_array = (bb.read_byte()? & 1) != 0;
                let value = bb.read_var_uint()?;
                fields.push(Field { name, type_id, is_array, value });
            }

            defs.push(Def::new(name, kind, fields));
        }

        let schema = Schema::new(defs);
        for def in &schema.defs {
            for field in &def.fields {
                if def.kind != DefKind::Enum && field.type_id >= schema.defs.len() as i32 {
                    return Err(WireError::UnknownTypeId(field.type_id));
                }
            }
        }
        Ok(schema)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bb = ByteBufferMut::new();
        bb.write_var_uint(self.defs.len() as u32);
        for def in &self.defs {
            bb.write_string(&def.name);
            bb.write_byte(def.kind.to_byte());
            bb.write_var_uint(def.fields.len() as u32);
            for field in &def.fields {
                bb.write_string(&field.name);
                bb.write_var_int(field.type_id);
                bb.write_byte(u8::from(field.is_array));
                bb.write_var_uint(field.value);
            }
        }
        bb.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TYPE_BYTES, TYPE_INT};

    fn sample() -> Schema {
        Schema::new(vec![
            Def::new("Kind".to_owned(), DefKind::Enum, vec![
                Field { name: "A".to_owned(), type_id: 0, is_array: false, value: 0 },
                Field { name: "B".to_owned(), type_id: 0, is_array: false, value: 7 },
            ]),
            Def::new("Packet".to_owned(), DefKind::Message, vec![
                Field { name: "kind".to_owned(), type_id: 0, is_array: false, value: 1 },
                Field { name: "ids".to_owned(), type_id: TYPE_INT, is_array: true, value: 2 },
                Field { name: "body".to_owned(), type_id: TYPE_BYTES, is_array: false, value: 3 },
            ]),
        ])
    }

    #[test]
    fn indexes_are_assigned() {
        let schema = sample();
        assert_eq!(schema.defs[1].index, 1);
        assert_eq!(schema.def("Packet").map(|def| def.kind), Some(DefKind::Message));
        assert_eq!(schema.defs[0].field_value_to_index.get(&7), Some(&1));
        assert_eq!(schema.defs[1].field("body").map(|f| f.type_id), Some(TYPE_BYTES));
    }

    #[test]
    fn binary_form_reads_back() {
        let schema = sample();
        let decoded = Schema::decode(&schema.encode()).unwrap();
        assert_eq!(decoded, schema);
    }

    #[test]
    fn decode_rejects_dangling_type_ids() {
        let broken = Schema::new(vec![Def::new("Only".to_owned(), DefKind::Struct, vec![
            Field { name: "x".to_owned(), type_id: 4, is_array: false, value: 1 },
        ])]);
        assert_eq!(Schema::decode(&broken.encode()), Err(WireError::UnknownTypeId(4)));
    }

    #[test]
    fn decode_rejects_bad_kind() {
        assert_eq!(Schema::decode(&[1, b'X', 0, 9, 0]), Err(WireError::InvalidKind(9)));
    }
}
