//! typegen_binder: Declaration tables and the host type system.
//!
//! The binder lowers parsed declarations into an arena of types
//! ([`TypeTable`]) and a global declaration table, detached from the AST
//! arena. The result, a [`BoundProgram`], implements [`TypeHost`]: the
//! read-only interface the schema walker resolves types through.

mod binder;
mod host;
mod symbol;
mod types;

pub use binder::Binder;
pub use host::{BoundProgram, TypeHost};
pub use symbol::{
    DeclId, Declaration, DeclarationKind, DecoratorInfo, DecoratorValue, EnumMember, Member,
    MemberKind, Parameter, Signature, SymbolTable, TypeParameter,
};
pub use types::{
    IndexInfo, IntrinsicKind, LiteralValue, ObjectShape, TupleElement, TypeId, TypeKind, TypeTable,
};
