//! Declarations and the global declaration table.

use crate::types::{IndexInfo, LiteralValue, TypeId};
use rustc_hash::FxHashMap;
use typegen_ast::ModifierFlags;
use typegen_core::intern::InternedString;
use typegen_core::text::TextSpan;

/// Index of a declaration in the declaration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub u32);

impl DeclId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Interface,
    TypeAlias,
    Enum,
}

impl DeclarationKind {
    pub fn describe(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Enum => "enum",
        }
    }
}

/// A named type declaration lowered out of the AST.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub id: DeclId,
    pub name: InternedString,
    pub name_text: String,
    pub kind: DeclarationKind,
    pub modifiers: ModifierFlags,
    pub type_parameters: Vec<TypeParameter>,
    /// Class and interface members, in declaration order. Constructor
    /// parameter properties appear where the constructor is declared.
    pub members: Vec<Member>,
    pub index: Option<IndexInfo>,
    /// `extends` clauses: at most one for a class, any number for an
    /// interface.
    pub heritage: Vec<TypeId>,
    /// The right-hand side of a type alias.
    pub aliased: Option<TypeId>,
    /// The first constructor declaration of a class.
    pub constructor: Option<Signature>,
    pub enum_members: Vec<EnumMember>,
    pub decorators: Vec<DecoratorInfo>,
    pub file: String,
    pub span: TextSpan,
}

impl Declaration {
    pub fn is_class(&self) -> bool {
        self.kind == DeclarationKind::Class
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(ModifierFlags::ABSTRACT)
    }

    pub fn decorator(&self, name: &str) -> Option<&DecoratorInfo> {
        self.decorators.iter().find(|d| d.name == name)
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub name: String,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    /// `#name` members carry `PRIVATE`.
    pub modifiers: ModifierFlags,
    pub decorators: Vec<DecoratorInfo>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    Property { type_id: TypeId, optional: bool },
    Method(Signature),
}

impl Member {
    /// Neither `private`, `protected` nor `#private`.
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public()
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(ModifierFlags::STATIC)
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method(_))
    }

    pub fn decorator(&self, name: &str) -> Option<&DecoratorInfo> {
        self.decorators.iter().find(|d| d.name == name)
    }
}

/// A function, method or constructor signature.
#[derive(Debug, Clone)]
pub struct Signature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    /// `None` for constructors and unannotated methods.
    pub return_type: Option<TypeId>,
    pub span: TextSpan,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    /// `None` for destructuring patterns.
    pub name: Option<String>,
    /// `None` when the parameter has no annotation.
    pub type_id: Option<TypeId>,
    /// `name?: T`
    pub question: bool,
    pub has_initializer: bool,
    pub rest: bool,
    /// Parameter-property modifiers (`private readonly x: T`).
    pub modifiers: ModifierFlags,
    pub span: TextSpan,
}

impl Parameter {
    /// Whether this is a constructor parameter property with non-public
    /// accessibility.
    pub fn is_private(&self) -> bool {
        !self.modifiers.is_public()
    }
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    /// `None` when the value is computed.
    pub value: Option<LiteralValue>,
}

// ============================================================================
// Decorators
// ============================================================================

/// A decorator with statically known arguments, detached from the AST arena.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorInfo {
    pub name: String,
    pub arguments: Vec<DecoratorValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecoratorValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Object(Vec<(String, DecoratorValue)>),
    Array(Vec<DecoratorValue>),
    /// Anything that is not a literal.
    Other,
}

impl DecoratorValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecoratorValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecoratorValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&DecoratorValue> {
        match self {
            DecoratorValue::Object(props) => {
                props.iter().find(|(key, _)| key == name).map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

impl DecoratorInfo {
    /// The first argument when it is a string: `@prompt("...")`.
    pub fn string_argument(&self) -> Option<&str> {
        self.arguments.first().and_then(DecoratorValue::as_str)
    }

    /// A property of the first argument when it is an object literal:
    /// `@agent({ mode: "ephemeral" })`.
    pub fn option(&self, name: &str) -> Option<&DecoratorValue> {
        self.arguments.first().and_then(|arg| arg.property(name))
    }
}

// ============================================================================
// Symbol table
// ============================================================================

/// A symbol table maps names to declarations.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    table: FxHashMap<InternedString, DeclId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &InternedString) -> Option<DeclId> {
        self.table.get(name).copied()
    }

    pub fn set(&mut self, name: InternedString, decl: DeclId) {
        self.table.insert(name, decl);
    }

    pub fn has(&self, name: &InternedString) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegen_core::intern::StringInterner;

    #[test]
    fn test_decorator_options() {
        let decorator = DecoratorInfo {
            name: "agent".to_string(),
            arguments: vec![DecoratorValue::Object(vec![
                ("mode".to_string(), DecoratorValue::String("ephemeral".to_string())),
                ("multimodal".to_string(), DecoratorValue::Boolean(true)),
            ])],
        };
        assert_eq!(decorator.option("mode").and_then(DecoratorValue::as_str), Some("ephemeral"));
        assert_eq!(decorator.option("multimodal").and_then(DecoratorValue::as_bool), Some(true));
        assert_eq!(decorator.string_argument(), None);
    }

    #[test]
    fn test_symbol_table() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        let name = interner.intern("Forecast");
        assert!(!table.has(&name));
        table.set(name, DeclId(3));
        assert_eq!(table.get(&name), Some(DeclId(3)));
        assert_eq!(table.len(), 1);
    }
}
