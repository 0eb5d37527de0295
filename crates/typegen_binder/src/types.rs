//! Type representation for the host type system.
//!
//! Types are stored in a [`TypeTable`] (type arena) and referenced by
//! [`TypeId`]. References to named declarations stay symbolic and are
//! resolved lazily through [`crate::TypeHost`], so declarations may appear
//! in any order and in any file.

use crate::symbol::{Member, Signature};
use serde::{Serialize, Serializer};
use std::fmt;

/// Index of a type in the [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The intrinsic (keyword) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    String,
    Number,
    Boolean,
    Void,
    Undefined,
    Null,
    Never,
    BigInt,
    Symbol,
    /// The `object` keyword.
    Object,
}

impl IntrinsicKind {
    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::String => "string",
            IntrinsicKind::Number => "number",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Never => "never",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }
}

/// The value of a literal type. Serializes as the bare JSON value, except
/// bigints which serialize as their digit string. Whole numbers within the
/// safe integer range serialize as JSON integers.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    BigInt(String),
    Boolean(bool),
}

/// `Number.MAX_SAFE_INTEGER`
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for LiteralValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LiteralValue::String(s) | LiteralValue::BigInt(s) => serializer.serialize_str(s),
            LiteralValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            LiteralValue::Number(n) => serializer.serialize_f64(*n),
            LiteralValue::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => write!(f, "\"{}\"", s),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::BigInt(digits) => write!(f, "{}n", digits),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

/// `[key: K]: V`
#[derive(Debug, Clone, Copy)]
pub struct IndexInfo {
    pub key_type: TypeId,
    pub value_type: TypeId,
    pub readonly: bool,
}

/// The members of an anonymous object type.
#[derive(Debug, Clone, Default)]
pub struct ObjectShape {
    pub members: Vec<Member>,
    pub index: Option<IndexInfo>,
}

/// The specific data for each type.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// `T[]` and `readonly T[]`.
    Array {
        element: TypeId,
        readonly: bool,
    },
    Tuple {
        elements: Vec<TupleElement>,
    },
    /// `A | B | C`, in source order.
    Union {
        types: Vec<TypeId>,
    },
    Intersection {
        types: Vec<TypeId>,
    },
    /// `{ a: string; [k: string]: number }`
    TypeLiteral(ObjectShape),
    /// A reference to a named declaration or a global (`Map`, `Promise`).
    /// Qualified names keep their dots.
    Reference {
        name: String,
        type_arguments: Vec<TypeId>,
    },
    /// A reference to a type parameter in scope at the use site.
    TypeParameter {
        name: String,
    },
    Function(Signature),
    /// `keyof T`
    KeyOf(TypeId),
    /// A type form with no schema mapping (conditional, mapped, indexed
    /// access, ...). The payload names the form.
    Unsupported(&'static str),
}

/// The type table stores all types and provides access by TypeId.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<TypeKind>,
    // Well-known types
    pub any_type: TypeId,
    pub unknown_type: TypeId,
    pub string_type: TypeId,
    pub number_type: TypeId,
    pub boolean_type: TypeId,
    pub void_type: TypeId,
    pub undefined_type: TypeId,
    pub null_type: TypeId,
    pub never_type: TypeId,
    pub bigint_type: TypeId,
    pub symbol_type: TypeId,
    pub object_type: TypeId,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = Self {
            types: Vec::with_capacity(1024),
            any_type: TypeId(0),
            unknown_type: TypeId(1),
            string_type: TypeId(2),
            number_type: TypeId(3),
            boolean_type: TypeId(4),
            void_type: TypeId(5),
            undefined_type: TypeId(6),
            null_type: TypeId(7),
            never_type: TypeId(8),
            bigint_type: TypeId(9),
            symbol_type: TypeId(10),
            object_type: TypeId(11),
        };

        for kind in [
            IntrinsicKind::Any,
            IntrinsicKind::Unknown,
            IntrinsicKind::String,
            IntrinsicKind::Number,
            IntrinsicKind::Boolean,
            IntrinsicKind::Void,
            IntrinsicKind::Undefined,
            IntrinsicKind::Null,
            IntrinsicKind::Never,
            IntrinsicKind::BigInt,
            IntrinsicKind::Symbol,
            IntrinsicKind::Object,
        ] {
            table.add(TypeKind::Intrinsic(kind));
        }

        table
    }

    pub fn add(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(kind);
        id
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeKind {
        &self.types[id.index()]
    }

    /// The well-known id of an intrinsic type.
    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        match kind {
            IntrinsicKind::Any => self.any_type,
            IntrinsicKind::Unknown => self.unknown_type,
            IntrinsicKind::String => self.string_type,
            IntrinsicKind::Number => self.number_type,
            IntrinsicKind::Boolean => self.boolean_type,
            IntrinsicKind::Void => self.void_type,
            IntrinsicKind::Undefined => self.undefined_type,
            IntrinsicKind::Null => self.null_type,
            IntrinsicKind::Never => self.never_type,
            IntrinsicKind::BigInt => self.bigint_type,
            IntrinsicKind::Symbol => self.symbol_type,
            IntrinsicKind::Object => self.object_type,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}
