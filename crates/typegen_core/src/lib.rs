//! typegen_core: Core utilities shared by the typegen pipeline.
//!
//! Provides interned declaration names and source positions used by the
//! scanner, parser, binder and diagnostics.

pub mod intern;
pub mod text;

pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextSpan};
