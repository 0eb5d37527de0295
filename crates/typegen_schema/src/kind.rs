//! The schema tree.
//!
//! A [`TypeNode`] is a closed tagged variant ([`Kind`]) plus the orthogonal
//! `optional` flag. Serialized as camelCase JSON with the variant name under
//! `kind`:
//!
//! ```json
//! { "kind": "array", "element": { "kind": "string", "optional": false }, "optional": true }
//! ```

use crate::config::ConfigProperty;
use indexmap::IndexMap;
use serde::Serialize;
use typegen_binder::LiteralValue;

/// The schema of one source type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeNode {
    #[serde(flatten)]
    pub kind: Kind,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Kind {
    String,
    Number,
    Boolean,
    BigInt,
    Null,
    Undefined,
    Void,
    Literal {
        literal_value: LiteralValue,
    },
    Array {
        element: Box<TypeNode>,
    },
    Tuple {
        elements: Vec<TypeNode>,
    },
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    Object(ObjectSchema),
    Interface(ObjectSchema),
    Class(ObjectSchema),
    Union(UnionSchema),
    Config {
        properties: Vec<ConfigProperty>,
    },
    /// Anything the walker cannot classify.
    Others {
        #[serde(skip_serializing_if = "Option::is_none")]
        type_name: Option<String>,
    },
}

/// Fields of an `object`, `interface` or `class` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: IndexMap<String, TypeNode>,
    pub type_params: Vec<TypeNode>,
    /// Set on the placeholder returned when a declaration is reached again
    /// while it is still being expanded. Its `fields` are always empty.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub recursive_ref: bool,
    /// Fields whose declared type was wrapped in a secret marker.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secret_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub union_types: Vec<TypeNode>,
    pub type_params: Vec<TypeNode>,
}

impl TypeNode {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn others(type_name: impl Into<String>) -> Self {
        Self::new(Kind::Others {
            type_name: Some(type_name.into()),
        })
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::new(Kind::Literal {
            literal_value: value,
        })
    }

    pub fn array(element: TypeNode) -> Self {
        Self::new(Kind::Array {
            element: Box::new(element),
        })
    }

    pub fn map(key: TypeNode, value: TypeNode) -> Self {
        Self::new(Kind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn union(union_types: Vec<TypeNode>) -> Self {
        Self::new(Kind::Union(UnionSchema {
            name: None,
            union_types,
            type_params: Vec::new(),
        }))
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Self::new(Kind::Object(schema))
    }

    /// The `kind` tag as serialized.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::BigInt => "bigint",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
            Kind::Void => "void",
            Kind::Literal { .. } => "literal",
            Kind::Array { .. } => "array",
            Kind::Tuple { .. } => "tuple",
            Kind::Map { .. } => "map",
            Kind::Object(_) => "object",
            Kind::Interface(_) => "interface",
            Kind::Class(_) => "class",
            Kind::Union(_) => "union",
            Kind::Config { .. } => "config",
            Kind::Others { .. } => "others",
        }
    }

    /// The field-carrying schema of an `object`, `interface` or `class`.
    pub fn object_schema(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            Kind::Object(schema) | Kind::Interface(schema) | Kind::Class(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn object_schema_mut(&mut self) -> Option<&mut ObjectSchema> {
        match &mut self.kind {
            Kind::Object(schema) | Kind::Interface(schema) | Kind::Class(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn is_object_like(&self) -> bool {
        self.object_schema().is_some()
    }

    pub fn union_types(&self) -> Option<&[TypeNode]> {
        match &self.kind {
            Kind::Union(union) => Some(&union.union_types),
            _ => None,
        }
    }

    /// A union with an explicit `undefined` member.
    pub fn includes_undefined(&self) -> bool {
        self.union_types()
            .is_some_and(|types| types.iter().any(|t| t.kind == Kind::Undefined))
    }

    /// Remove `undefined` members from a union. A union left with one member
    /// collapses to that member.
    pub fn without_undefined(&self) -> TypeNode {
        let Some(types) = self.union_types() else {
            return self.clone();
        };
        let mut remaining: Vec<TypeNode> = types
            .iter()
            .filter(|t| t.kind != Kind::Undefined)
            .cloned()
            .collect();
        if remaining.len() == 1 {
            let mut single = remaining.remove(0);
            single.optional = self.optional;
            return single;
        }
        let mut node = self.clone();
        if let Kind::Union(union) = &mut node.kind {
            union.union_types = remaining;
        }
        node
    }
}
