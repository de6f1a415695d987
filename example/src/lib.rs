//! Types generated from `schema/example.kiwi` by `build.rs`.

pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/example.rs"));
}

pub use generated::example;
