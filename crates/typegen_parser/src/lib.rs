//! typegen_parser: Recursive descent parser for TypeScript declarations.
//!
//! Builds an arena-allocated AST of the type-carrying declarations in a file
//! (interfaces, type aliases, classes, enums). Function bodies, initializers
//! and all other statements are skipped with balanced-bracket scanning.

mod parser;
mod utilities;

pub use parser::{parse_source_file, Parser};
