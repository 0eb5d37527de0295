//! typegen_ast: Syntax tree for TypeScript declarations.
//!
//! Only the parts of the language that carry type information are modelled:
//! interfaces, type aliases, classes, enums and the full type-expression
//! grammar. Everything else is kept as a skipped span.

pub mod node;
pub mod syntax_kind;
pub mod types;

pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
