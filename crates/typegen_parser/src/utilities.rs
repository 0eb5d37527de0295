//! Parser utility functions.

use typegen_ast::syntax_kind::SyntaxKind;

/// Tokens that can close an expression, so a following line break ends it.
pub fn ends_operand(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TemplateLiteral
            | SyntaxKind::RegularExpressionLiteral
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::ThisKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword
    ) || kind.is_contextual_keyword()
}

/// Tokens that can begin a new statement or class member after a line break.
pub fn can_start_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier | SyntaxKind::PrivateIdentifier | SyntaxKind::AtToken
    ) || kind.is_keyword()
}

/// Tokens that can begin a property name.
pub fn is_property_name_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Identifier
            | SyntaxKind::PrivateIdentifier
            | SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::OpenBracketToken
    ) || kind.is_keyword()
}

/// Whether a modifier-looking keyword is actually used as a member name,
/// given the token that follows it.
pub fn is_name_position_terminator(next: SyntaxKind) -> bool {
    matches!(
        next,
        SyntaxKind::OpenParenToken
            | SyntaxKind::LessThanToken
            | SyntaxKind::EqualsToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::ColonToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::CommaToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::EndOfFileToken
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_and_statement_starts() {
        assert!(ends_operand(SyntaxKind::CloseBraceToken));
        assert!(ends_operand(SyntaxKind::TypeKeyword));
        assert!(!ends_operand(SyntaxKind::EqualsToken));
        assert!(can_start_declaration(SyntaxKind::InterfaceKeyword));
        assert!(!can_start_declaration(SyntaxKind::DotToken));
    }

    #[test]
    fn test_name_position_terminators() {
        assert!(is_name_position_terminator(SyntaxKind::ColonToken));
        assert!(!is_name_position_terminator(SyntaxKind::Identifier));
    }
}
