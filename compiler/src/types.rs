use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub package:     Option<String>,
    pub options:     SchemaOptions,
    pub definitions: Vec<Definition>,
}

impl Schema {
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.iter().find(|def| def.name == name)
    }
}

/// File-level `option <name> = <bool>;` statements. Each acts as the
/// default for every definition that does not override it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaOptions {
    pub equal_all:          bool,
    pub verbose_equal_all:  bool,
    pub testgen_all:        bool,
    pub extensions_map_all: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        SchemaOptions {
            equal_all:          false,
            verbose_equal_all:  false,
            testgen_all:        false,
            extensions_map_all: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DefinitionKind {
    Enum    = 0,
    Struct  = 1,
    Message = 2,
}

/// Per-definition overrides, e.g. `message B [equal, testgen = false] { ... }`.
/// `None` inherits the matching file-level option.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefinitionAttributes {
    pub equal:          Option<bool>,
    pub verbose_equal:  Option<bool>,
    pub testgen:        Option<bool>,
    pub extensions_map: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:           String,
    pub line:           usize,
    pub column:         usize,
    pub type_:          Option<String>,
    pub is_array:       bool,
    pub is_deprecated:  bool,
    pub is_group:       bool,
    pub reserved_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub name:           String,
    pub line:           usize,
    pub column:         usize,
    pub kind:           DefinitionKind,
    pub fields:         Vec<Field>,
    pub attributes:     DefinitionAttributes,
    pub has_extensions: bool,
}
