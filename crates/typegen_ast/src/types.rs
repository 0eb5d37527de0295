//! Flag types attached to AST nodes and tokens.

use crate::syntax_kind::SyntaxKind;

bitflags::bitflags! {
    /// Modifier flags for declarations and class members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const NONE              = 0;
        const EXPORT            = 1 << 0;
        const AMBIENT           = 1 << 1;
        const PUBLIC            = 1 << 2;
        const PRIVATE           = 1 << 3;
        const PROTECTED         = 1 << 4;
        const STATIC            = 1 << 5;
        const READONLY          = 1 << 6;
        const ACCESSOR          = 1 << 7;
        const ABSTRACT          = 1 << 8;
        const ASYNC             = 1 << 9;
        const DEFAULT           = 1 << 10;
        const CONST             = 1 << 11;
        const OVERRIDE          = 1 << 12;

        const ACCESSIBILITY_MODIFIER = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const PARAMETER_PROPERTY_MODIFIER = Self::ACCESSIBILITY_MODIFIER.bits() | Self::READONLY.bits() | Self::OVERRIDE.bits();
        const NON_PUBLIC_ACCESSIBILITY_MODIFIER = Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

impl ModifierFlags {
    /// The flag a modifier keyword sets, if it is one.
    pub fn from_keyword(kind: SyntaxKind) -> Option<ModifierFlags> {
        let flag = match kind {
            SyntaxKind::ExportKeyword => ModifierFlags::EXPORT,
            SyntaxKind::DeclareKeyword => ModifierFlags::AMBIENT,
            SyntaxKind::DefaultKeyword => ModifierFlags::DEFAULT,
            SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
            SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
            SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
            SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
            SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
            SyntaxKind::ReadonlyKeyword => ModifierFlags::READONLY,
            SyntaxKind::OverrideKeyword => ModifierFlags::OVERRIDE,
            SyntaxKind::AsyncKeyword => ModifierFlags::ASYNC,
            SyntaxKind::AccessorKeyword => ModifierFlags::ACCESSOR,
            SyntaxKind::ConstKeyword => ModifierFlags::CONST,
            _ => return None,
        };
        Some(flag)
    }

    /// Public unless marked `private` or `protected`.
    #[inline]
    pub fn is_public(self) -> bool {
        !self.intersects(ModifierFlags::NON_PUBLIC_ACCESSIBILITY_MODIFIER)
    }
}

bitflags::bitflags! {
    /// Token flags set by the scanner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u32 {
        const NONE                  = 0;
        const PRECEDING_LINE_BREAK  = 1 << 0;
        const UNTERMINATED          = 1 << 1;
        const SCIENTIFIC            = 1 << 2;
        const HEX_SPECIFIER         = 1 << 3;
        const BINARY_SPECIFIER      = 1 << 4;
        const OCTAL_SPECIFIER       = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_keyword() {
        assert_eq!(
            ModifierFlags::from_keyword(SyntaxKind::PrivateKeyword),
            Some(ModifierFlags::PRIVATE)
        );
        assert_eq!(ModifierFlags::from_keyword(SyntaxKind::ClassKeyword), None);
    }

    #[test]
    fn test_is_public() {
        assert!(ModifierFlags::NONE.is_public());
        assert!((ModifierFlags::PUBLIC | ModifierFlags::READONLY).is_public());
        assert!(!ModifierFlags::PROTECTED.is_public());
        assert!(!(ModifierFlags::PRIVATE | ModifierFlags::STATIC).is_public());
    }
}
