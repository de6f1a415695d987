//! brine-equal-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.kiwi` IDL files, including equality options
//!     (`option equal_all = true;`, `message B [verbose_equal] { ... }`),
//!  2) A schema verifier (duplicate types, recursive records, missing types, etc.),
//!  3) `encode_binary_schema` / `decode_binary_schema`,
//!  4) Code generation (`compile_schema_to_rust`, `generate_rust`) of types,
//!     codec glue and the `Equal` / `VerboseEqual` comparisons,
//!  5) Error types (`KiwiError`), and the `FromKiwi` / `ToKiwi` traits.

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod record;
pub mod classify;
pub mod config;
pub mod printer;
pub mod imports;
pub mod equal;
pub mod testgen;
pub mod compiler;
pub mod gen_rust;
pub mod traits;

pub use compiler::compile_schema;
pub use compiler::decode_binary_schema;
pub use compiler::encode_binary_schema;
pub use compiler::generate_rust;
pub use config::GeneratorConfig;
pub use gen_rust::compile_schema_to_rust;
