pub mod codegen;
pub mod config;
pub mod edit;
pub mod engine;
pub mod error;
pub mod factory;
pub mod graph;
pub mod parse;
pub mod store;
pub mod validate;
pub mod wasm;
