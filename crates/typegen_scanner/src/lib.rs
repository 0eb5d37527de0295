//! typegen_scanner: Lexer for TypeScript source code.
//!
//! Produces the tokens the declaration parser needs:
//! - Identifiers, private names and keywords
//! - String, numeric, bigint and template literals
//! - Regular expression literals, so skipped expressions stay balanced
//! - Punctuation, with operators that never occur in types folded together

mod char_codes;
mod scanner;
mod token;

pub use scanner::{numeric_literal_value, Scanner, ScannerState};
pub use token::TokenInfo;
