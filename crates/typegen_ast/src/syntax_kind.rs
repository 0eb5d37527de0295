//! SyntaxKind enum - the token kinds produced by the scanner.

/// The kind of a token.
///
/// Operators that never appear in type positions are folded into
/// [`SyntaxKind::OtherPunctuation`]; the parser only needs them to skip
/// expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    TemplateLiteral,
    RegularExpressionLiteral,

    // Names
    Identifier,
    PrivateIdentifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    LessThanToken,
    GreaterThanToken,
    EqualsToken,
    EqualsGreaterThanToken,
    QuestionToken,
    ColonToken,
    BarToken,
    AmpersandToken,
    AtToken,
    MinusToken,
    PlusToken,
    AsteriskToken,
    ExclamationToken,
    SlashToken,
    OtherPunctuation,

    // ========================================================================
    // Reserved words
    // ========================================================================
    ClassKeyword,
    ConstKeyword,
    DefaultKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FunctionKeyword,
    ImportKeyword,
    InKeyword,
    NewKeyword,
    NullKeyword,
    ThisKeyword,
    TrueKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,

    // Strict mode reserved words
    ImplementsKeyword,
    InterfaceKeyword,
    LetKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    StaticKeyword,

    // ========================================================================
    // Contextual keywords
    // ========================================================================
    AbstractKeyword,
    AccessorKeyword,
    AnyKeyword,
    AsyncKeyword,
    BigIntKeyword,
    BooleanKeyword,
    ConstructorKeyword,
    DeclareKeyword,
    GetKeyword,
    InferKeyword,
    IsKeyword,
    KeyOfKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    OverrideKeyword,
    ReadonlyKeyword,
    SetKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
    AssertsKeyword,
}

impl SyntaxKind {
    /// Whether this is any keyword (reserved or contextual).
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::ClassKeyword
    }

    /// Keywords that may still be used as identifiers in declarations
    /// (`type`, `readonly`, `string`, ...).
    pub fn is_contextual_keyword(self) -> bool {
        self >= SyntaxKind::AbstractKeyword
    }

    /// Keywords that denote an intrinsic type in a type position.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    /// Modifiers that may prefix a declaration or class member.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::ExportKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::OverrideKeyword
                | SyntaxKind::AsyncKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::ConstKeyword
        )
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "class" => SyntaxKind::ClassKeyword,
            "const" => SyntaxKind::ConstKeyword,
            "default" => SyntaxKind::DefaultKeyword,
            "enum" => SyntaxKind::EnumKeyword,
            "export" => SyntaxKind::ExportKeyword,
            "extends" => SyntaxKind::ExtendsKeyword,
            "false" => SyntaxKind::FalseKeyword,
            "function" => SyntaxKind::FunctionKeyword,
            "import" => SyntaxKind::ImportKeyword,
            "in" => SyntaxKind::InKeyword,
            "new" => SyntaxKind::NewKeyword,
            "null" => SyntaxKind::NullKeyword,
            "this" => SyntaxKind::ThisKeyword,
            "true" => SyntaxKind::TrueKeyword,
            "typeof" => SyntaxKind::TypeOfKeyword,
            "var" => SyntaxKind::VarKeyword,
            "void" => SyntaxKind::VoidKeyword,
            "implements" => SyntaxKind::ImplementsKeyword,
            "interface" => SyntaxKind::InterfaceKeyword,
            "let" => SyntaxKind::LetKeyword,
            "private" => SyntaxKind::PrivateKeyword,
            "protected" => SyntaxKind::ProtectedKeyword,
            "public" => SyntaxKind::PublicKeyword,
            "static" => SyntaxKind::StaticKeyword,
            "abstract" => SyntaxKind::AbstractKeyword,
            "accessor" => SyntaxKind::AccessorKeyword,
            "any" => SyntaxKind::AnyKeyword,
            "async" => SyntaxKind::AsyncKeyword,
            "bigint" => SyntaxKind::BigIntKeyword,
            "boolean" => SyntaxKind::BooleanKeyword,
            "constructor" => SyntaxKind::ConstructorKeyword,
            "declare" => SyntaxKind::DeclareKeyword,
            "get" => SyntaxKind::GetKeyword,
            "infer" => SyntaxKind::InferKeyword,
            "is" => SyntaxKind::IsKeyword,
            "keyof" => SyntaxKind::KeyOfKeyword,
            "module" => SyntaxKind::ModuleKeyword,
            "namespace" => SyntaxKind::NamespaceKeyword,
            "never" => SyntaxKind::NeverKeyword,
            "number" => SyntaxKind::NumberKeyword,
            "object" => SyntaxKind::ObjectKeyword,
            "override" => SyntaxKind::OverrideKeyword,
            "readonly" => SyntaxKind::ReadonlyKeyword,
            "set" => SyntaxKind::SetKeyword,
            "string" => SyntaxKind::StringKeyword,
            "symbol" => SyntaxKind::SymbolKeyword,
            "type" => SyntaxKind::TypeKeyword,
            "undefined" => SyntaxKind::UndefinedKeyword,
            "unique" => SyntaxKind::UniqueKeyword,
            "unknown" => SyntaxKind::UnknownKeyword,
            "asserts" => SyntaxKind::AssertsKeyword,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of a punctuation token, for "'x' expected" messages.
    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::BarToken => "|",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::AtToken => "@",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::SlashToken => "/",
            _ => return None,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        assert!(SyntaxKind::ClassKeyword.is_keyword());
        assert!(!SyntaxKind::ClassKeyword.is_contextual_keyword());
        assert!(SyntaxKind::TypeKeyword.is_contextual_keyword());
        assert!(!SyntaxKind::Identifier.is_keyword());
        assert!(SyntaxKind::VoidKeyword.is_type_keyword());
        assert!(SyntaxKind::UndefinedKeyword.is_type_keyword());
        assert!(!SyntaxKind::ReadonlyKeyword.is_type_keyword());
    }

    #[test]
    fn test_from_keyword() {
        assert_eq!(SyntaxKind::from_keyword("interface"), Some(SyntaxKind::InterfaceKeyword));
        assert_eq!(SyntaxKind::from_keyword("bigint"), Some(SyntaxKind::BigIntKeyword));
        assert_eq!(SyntaxKind::from_keyword("Interface"), None);
    }
}
