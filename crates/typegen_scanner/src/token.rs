//! Token information produced by the scanner.

use typegen_ast::syntax_kind::SyntaxKind;
use typegen_ast::types::TokenFlags;
use typegen_core::text::TextSpan;

/// A scanned token, detached from the scanner.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    pub span: TextSpan,
    /// Identifier text or decoded literal value.
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
