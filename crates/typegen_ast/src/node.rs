//! AST node definitions.
//!
//! Nodes are allocated in a `bumpalo` arena owned by the caller of the parser
//! and reference their children through arena slices. Names are arena strings
//! so the tree can be lowered without touching the source text again.

use crate::syntax_kind::SyntaxKind;
use crate::types::ModifierFlags;
use typegen_core::text::TextSpan;

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Source File
// ============================================================================

#[derive(Debug)]
pub struct SourceFile<'a> {
    pub span: TextSpan,
    pub file_name: String,
    pub statements: NodeList<'a, Statement<'a>>,
}

// ============================================================================
// Names
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub span: TextSpan,
    pub text: &'a str,
}

/// The name of a property, method or enum member.
#[derive(Debug, Clone, Copy)]
pub enum PropertyName<'a> {
    Identifier(Identifier<'a>),
    /// `#field`; `text` keeps the leading `#`.
    PrivateIdentifier(Identifier<'a>),
    StringLiteral(Identifier<'a>),
    NumericLiteral(Identifier<'a>),
    /// `[expr]`; never resolvable statically.
    Computed(TextSpan),
}

impl<'a> PropertyName<'a> {
    /// The static name, if there is one.
    pub fn text(&self) -> Option<&'a str> {
        match self {
            PropertyName::Identifier(id)
            | PropertyName::PrivateIdentifier(id)
            | PropertyName::StringLiteral(id)
            | PropertyName::NumericLiteral(id) => Some(id.text),
            PropertyName::Computed(_) => None,
        }
    }

    pub fn is_private_identifier(&self) -> bool {
        matches!(self, PropertyName::PrivateIdentifier(_))
    }

    pub fn span(&self) -> TextSpan {
        match self {
            PropertyName::Identifier(id)
            | PropertyName::PrivateIdentifier(id)
            | PropertyName::StringLiteral(id)
            | PropertyName::NumericLiteral(id) => id.span,
            PropertyName::Computed(span) => *span,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum BindingName<'a> {
    Identifier(Identifier<'a>),
    /// Object or array destructuring.
    Pattern(TextSpan),
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    Interface(InterfaceDeclaration<'a>),
    TypeAlias(TypeAliasDeclaration<'a>),
    Class(ClassDeclaration<'a>),
    Enum(EnumDeclaration<'a>),
    /// Imports, functions, variables, expressions and anything else that
    /// carries no declared type.
    Skipped(TextSpan),
}

impl Statement<'_> {
    pub fn span(&self) -> TextSpan {
        match self {
            Statement::Interface(d) => d.span,
            Statement::TypeAlias(d) => d.span,
            Statement::Class(d) => d.span,
            Statement::Enum(d) => d.span,
            Statement::Skipped(span) => *span,
        }
    }
}

#[derive(Debug)]
pub struct InterfaceDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub name: Identifier<'a>,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub extends: NodeList<'a, TypeReferenceNode<'a>>,
    pub members: NodeList<'a, TypeElement<'a>>,
}

#[derive(Debug)]
pub struct TypeAliasDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub name: Identifier<'a>,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct ClassDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub decorators: NodeList<'a, Decorator<'a>>,
    /// `None` for `export default class { ... }`.
    pub name: Option<Identifier<'a>>,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub extends: OptionalNode<'a, TypeReferenceNode<'a>>,
    pub implements: NodeList<'a, TypeReferenceNode<'a>>,
    pub members: NodeList<'a, ClassElement<'a>>,
}

#[derive(Debug)]
pub struct EnumDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub name: Identifier<'a>,
    pub members: NodeList<'a, EnumMember<'a>>,
}

#[derive(Debug)]
pub struct EnumMember<'a> {
    pub span: TextSpan,
    pub name: PropertyName<'a>,
    pub initializer: Option<EnumInitializer<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumInitializer<'a> {
    String(&'a str),
    Number(f64),
    /// Computed or referencing another member.
    Other,
}

#[derive(Debug)]
pub struct TypeParameterDeclaration<'a> {
    pub span: TextSpan,
    pub name: Identifier<'a>,
    pub constraint: OptionalNode<'a, TypeNode<'a>>,
    pub default: OptionalNode<'a, TypeNode<'a>>,
}

// ============================================================================
// Decorators
// ============================================================================

/// `@name(args)`. For `@a.b.c(...)` the name is the last segment.
#[derive(Debug, Clone, Copy)]
pub struct Decorator<'a> {
    pub span: TextSpan,
    pub name: Identifier<'a>,
    pub arguments: NodeList<'a, DecoratorArgument<'a>>,
}

/// The statically known shape of a decorator argument.
#[derive(Debug)]
pub enum DecoratorArgument<'a> {
    String(&'a str),
    Number(f64),
    Boolean(bool),
    Object(NodeList<'a, DecoratorProperty<'a>>),
    Array(NodeList<'a, DecoratorArgument<'a>>),
    Other(TextSpan),
}

#[derive(Debug)]
pub struct DecoratorProperty<'a> {
    pub name: &'a str,
    pub value: DecoratorArgument<'a>,
}

impl<'a> DecoratorArgument<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            DecoratorArgument::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecoratorArgument::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a property of an object-literal argument.
    pub fn property(&self, name: &str) -> Option<&DecoratorArgument<'a>> {
        match self {
            DecoratorArgument::Object(props) => {
                props.iter().find(|p| p.name == name).map(|p| &p.value)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Class Members
// ============================================================================

#[derive(Debug)]
pub enum ClassElement<'a> {
    Property(PropertyDeclaration<'a>),
    Method(MethodDeclaration<'a>),
    Constructor(ConstructorDeclaration<'a>),
    GetAccessor(AccessorDeclaration<'a>),
    SetAccessor(AccessorDeclaration<'a>),
    IndexSignature(IndexSignatureDeclaration<'a>),
    /// Static blocks and stray semicolons.
    Skipped(TextSpan),
}

#[derive(Debug)]
pub struct PropertyDeclaration<'a> {
    pub span: TextSpan,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub modifiers: ModifierFlags,
    pub name: PropertyName<'a>,
    pub question: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub has_initializer: bool,
}

#[derive(Debug)]
pub struct MethodDeclaration<'a> {
    pub span: TextSpan,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub modifiers: ModifierFlags,
    pub name: PropertyName<'a>,
    pub question: bool,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
    /// `false` for overload signatures without a body.
    pub has_body: bool,
}

#[derive(Debug)]
pub struct ConstructorDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub has_body: bool,
}

#[derive(Debug)]
pub struct AccessorDeclaration<'a> {
    pub span: TextSpan,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub modifiers: ModifierFlags,
    pub name: PropertyName<'a>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct IndexSignatureDeclaration<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub parameter_name: Identifier<'a>,
    pub parameter_type: OptionalNode<'a, TypeNode<'a>>,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct ParameterDeclaration<'a> {
    pub span: TextSpan,
    pub decorators: NodeList<'a, Decorator<'a>>,
    pub modifiers: ModifierFlags,
    pub dot_dot_dot: bool,
    pub name: BindingName<'a>,
    pub question: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
    pub has_initializer: bool,
}

impl<'a> ParameterDeclaration<'a> {
    pub fn name_text(&self) -> Option<&'a str> {
        match self.name {
            BindingName::Identifier(id) => Some(id.text),
            BindingName::Pattern(_) => None,
        }
    }

    /// The `this: T` pseudo-parameter.
    pub fn is_this_parameter(&self) -> bool {
        self.name_text() == Some("this")
    }
}

// ============================================================================
// Type Members
// ============================================================================

#[derive(Debug)]
pub enum TypeElement<'a> {
    Property(PropertySignature<'a>),
    Method(MethodSignature<'a>),
    IndexSignature(IndexSignatureDeclaration<'a>),
    /// Call, construct and set-accessor signatures.
    Other(TextSpan),
}

#[derive(Debug)]
pub struct PropertySignature<'a> {
    pub span: TextSpan,
    pub modifiers: ModifierFlags,
    pub name: PropertyName<'a>,
    pub question: bool,
    pub type_annotation: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct MethodSignature<'a> {
    pub span: TextSpan,
    pub name: PropertyName<'a>,
    pub question: bool,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: OptionalNode<'a, TypeNode<'a>>,
}

// ============================================================================
// Type Nodes
// ============================================================================

#[derive(Debug)]
pub enum TypeNode<'a> {
    /// `string`, `number`, `void`, `null`, ...
    Keyword(KeywordTypeNode),
    Literal(LiteralTypeNode<'a>),
    Array(ArrayTypeNode<'a>),
    Tuple(TupleTypeNode<'a>),
    Union(UnionTypeNode<'a>),
    Intersection(IntersectionTypeNode<'a>),
    TypeLiteral(TypeLiteralNode<'a>),
    TypeReference(TypeReferenceNode<'a>),
    Function(FunctionTypeNode<'a>),
    TypeOperator(TypeOperatorNode<'a>),
    IndexedAccess(IndexedAccessTypeNode<'a>),
    Conditional(ConditionalTypeNode<'a>),
    Mapped(MappedTypeNode<'a>),
    TypeQuery(TypeQueryNode<'a>),
    This(TextSpan),
    TemplateLiteral(TextSpan),
    /// `x is T` and `asserts x` in return position.
    TypePredicate(TextSpan),
    Infer(InferTypeNode<'a>),
}

impl TypeNode<'_> {
    pub fn span(&self) -> TextSpan {
        match self {
            TypeNode::Keyword(n) => n.span,
            TypeNode::Literal(n) => n.span,
            TypeNode::Array(n) => n.span,
            TypeNode::Tuple(n) => n.span,
            TypeNode::Union(n) => n.span,
            TypeNode::Intersection(n) => n.span,
            TypeNode::TypeLiteral(n) => n.span,
            TypeNode::TypeReference(n) => n.span,
            TypeNode::Function(n) => n.span,
            TypeNode::TypeOperator(n) => n.span,
            TypeNode::IndexedAccess(n) => n.span,
            TypeNode::Conditional(n) => n.span,
            TypeNode::Mapped(n) => n.span,
            TypeNode::TypeQuery(n) => n.span,
            TypeNode::Infer(n) => n.span,
            TypeNode::This(span) | TypeNode::TemplateLiteral(span) | TypeNode::TypePredicate(span) => {
                *span
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordTypeNode {
    pub span: TextSpan,
    pub kind: SyntaxKind,
}

#[derive(Debug)]
pub struct LiteralTypeNode<'a> {
    pub span: TextSpan,
    pub literal: LiteralValue<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    String(&'a str),
    Number(f64),
    /// Digits without the trailing `n`.
    BigInt(&'a str),
    Boolean(bool),
}

#[derive(Debug)]
pub struct ArrayTypeNode<'a> {
    pub span: TextSpan,
    pub element_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct TupleTypeNode<'a> {
    pub span: TextSpan,
    pub elements: NodeList<'a, TupleElement<'a>>,
}

/// A tuple element: `T`, `T?`, `...T`, or the named forms `x: T`, `x?: T`.
#[derive(Debug)]
pub struct TupleElement<'a> {
    pub span: TextSpan,
    pub name: Option<Identifier<'a>>,
    pub optional: bool,
    pub rest: bool,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct UnionTypeNode<'a> {
    pub span: TextSpan,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct IntersectionTypeNode<'a> {
    pub span: TextSpan,
    pub types: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct TypeLiteralNode<'a> {
    pub span: TextSpan,
    pub members: NodeList<'a, TypeElement<'a>>,
}

/// `Name<Args>`; qualified names keep their dots (`ns.Name`).
#[derive(Debug)]
pub struct TypeReferenceNode<'a> {
    pub span: TextSpan,
    pub type_name: Identifier<'a>,
    pub type_arguments: NodeList<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct FunctionTypeNode<'a> {
    pub span: TextSpan,
    pub is_constructor: bool,
    pub type_parameters: NodeList<'a, TypeParameterDeclaration<'a>>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub return_type: &'a TypeNode<'a>,
}

/// `keyof T`, `readonly T[]`, `unique symbol`.
#[derive(Debug)]
pub struct TypeOperatorNode<'a> {
    pub span: TextSpan,
    pub operator: SyntaxKind,
    pub type_node: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct IndexedAccessTypeNode<'a> {
    pub span: TextSpan,
    pub object_type: &'a TypeNode<'a>,
    pub index_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct ConditionalTypeNode<'a> {
    pub span: TextSpan,
    pub check_type: &'a TypeNode<'a>,
    pub extends_type: &'a TypeNode<'a>,
    pub true_type: &'a TypeNode<'a>,
    pub false_type: &'a TypeNode<'a>,
}

#[derive(Debug)]
pub struct MappedTypeNode<'a> {
    pub span: TextSpan,
    pub type_parameter: Identifier<'a>,
    pub constraint: &'a TypeNode<'a>,
    pub type_node: OptionalNode<'a, TypeNode<'a>>,
}

#[derive(Debug)]
pub struct TypeQueryNode<'a> {
    pub span: TextSpan,
    pub expr_name: Identifier<'a>,
}

#[derive(Debug)]
pub struct InferTypeNode<'a> {
    pub span: TextSpan,
    pub name: Identifier<'a>,
}
