//! The type walker: maps host types to [`TypeNode`]s.
//!
//! Classification order, first match wins: primitive keywords, literals,
//! containers (arrays, tuples, maps, typed arrays), unions, classes,
//! interfaces, object shapes, and finally `others`.
//!
//! Cycles are cut by declaration identity: a declaration reached again while
//! it is still being expanded yields a tied-off `object` placeholder. Generic
//! arguments are walked at the use site and bound by name for the body of the
//! instantiated declaration.

use crate::config::{extract_config, SecretPolicy};
use crate::error::SchemaError;
use crate::kind::{Kind, ObjectSchema, TypeNode, UnionSchema};
use rustc_hash::{FxHashMap, FxHashSet};
use typegen_binder::{
    DeclId, Declaration, DeclarationKind, IntrinsicKind, Member, MemberKind, ObjectShape, TypeHost,
    TypeId, TypeKind, TypeParameter,
};
use typegen_options::SchemaOptions;

/// Typed arrays; `true` marks 64-bit integer arrays with `bigint` elements.
const TYPED_ARRAYS: &[(&str, bool)] = &[
    ("Int8Array", false),
    ("Uint8Array", false),
    ("Uint8ClampedArray", false),
    ("Int16Array", false),
    ("Uint16Array", false),
    ("Int32Array", false),
    ("Uint32Array", false),
    ("Float32Array", false),
    ("Float64Array", false),
    ("BigInt64Array", true),
    ("BigUint64Array", true),
];

/// Globals that resolve but have no structural schema.
const OPAQUE_GLOBALS: &[&str] = &[
    "Object", "Function", "Date", "RegExp", "Error", "Symbol", "Promise", "PromiseLike", "Set",
    "ReadonlySet", "WeakMap", "WeakSet", "ArrayBuffer", "DataView",
];

pub struct TypeWalker<'h, H: TypeHost + ?Sized> {
    host: &'h H,
    options: &'h SchemaOptions,
    secrets: &'h SecretPolicy,
    /// Declarations being expanded on the current call stack.
    visiting: FxHashSet<DeclId>,
    /// The same declarations, in expansion order.
    stack: Vec<DeclId>,
    /// Generic bindings of the declaration being expanded, innermost last.
    scopes: Vec<FxHashMap<String, TypeNode>>,
    depth: usize,
}

impl<'h, H: TypeHost + ?Sized> TypeWalker<'h, H> {
    pub fn new(host: &'h H, options: &'h SchemaOptions, secrets: &'h SecretPolicy) -> Self {
        Self {
            host,
            options,
            secrets,
            visiting: FxHashSet::default(),
            stack: Vec::new(),
            scopes: Vec::new(),
            depth: 0,
        }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn options(&self) -> &'h SchemaOptions {
        self.options
    }

    pub fn secrets(&self) -> &'h SecretPolicy {
        self.secrets
    }

    /// Whether `id` is being expanded on the current call stack.
    pub fn is_visiting(&self, id: DeclId) -> bool {
        self.visiting.contains(&id)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Map one type to its schema.
    pub fn walk(&mut self, id: TypeId) -> Result<TypeNode, SchemaError> {
        if self.depth >= self.options.max_walk_depth {
            return Err(SchemaError::CyclicResolutionOverflow {
                name: self.current_name(),
                limit: self.options.max_walk_depth,
            });
        }
        self.depth += 1;
        let result = self.walk_type(id);
        self.depth -= 1;
        result
    }

    /// Map a named declaration instantiated with already-walked arguments.
    pub fn walk_declaration(
        &mut self,
        id: DeclId,
        arguments: Vec<TypeNode>,
    ) -> Result<TypeNode, SchemaError> {
        let host = self.host;
        let decl = host.declaration(id);

        if decl.kind == DeclarationKind::Enum {
            return Ok(enum_node(decl));
        }

        if self.visiting.contains(&id) {
            tracing::trace!(name = %decl.name_text, "tied off recursive reference");
            return Ok(TypeNode::object(ObjectSchema {
                name: Some(decl.name_text.clone()),
                type_params: arguments,
                recursive_ref: true,
                ..Default::default()
            }));
        }

        let scope = self.bind_type_parameters(&decl.type_parameters, &arguments)?;
        self.visiting.insert(id);
        self.stack.push(id);
        self.scopes.push(scope);
        let result = self.expand_declaration(decl);
        self.scopes.pop();
        self.stack.pop();
        self.visiting.remove(&id);

        let mut node = result?;
        match &mut node.kind {
            Kind::Object(schema) | Kind::Interface(schema) | Kind::Class(schema)
                if !schema.recursive_ref && schema.name.is_none() =>
            {
                schema.name = Some(decl.name_text.clone());
                schema.type_params = arguments;
            }
            Kind::Union(union) if union.name.is_none() => {
                union.name = Some(decl.name_text.clone());
                union.type_params = arguments;
            }
            _ => {}
        }
        Ok(node)
    }

    /// Wrap the flattened view of an object node in a `config` node.
    pub fn config_node(&self, node: &TypeNode) -> Result<TypeNode, SchemaError> {
        Ok(TypeNode::new(Kind::Config {
            properties: extract_config(node, self.secrets)?,
        }))
    }

    /// A reference to one of the configured config marker types.
    pub fn is_config_marker(&self, id: TypeId) -> bool {
        matches!(self.host.type_kind(id), TypeKind::Reference { name, .. } if self.options.is_config_marker(name))
    }

    pub fn is_secret_marker(&self, id: TypeId) -> bool {
        matches!(self.host.type_kind(id), TypeKind::Reference { name, .. } if self.options.is_secret_marker(name))
    }

    // ========================================================================
    // Classification
    // ========================================================================

    fn walk_type(&mut self, id: TypeId) -> Result<TypeNode, SchemaError> {
        let host = self.host;
        match host.type_kind(id) {
            TypeKind::Intrinsic(kind) => Ok(intrinsic_node(*kind)),
            TypeKind::Literal(value) => Ok(TypeNode::literal(value.clone())),
            TypeKind::Array { element, .. } => Ok(TypeNode::array(self.walk(*element)?)),
            TypeKind::Tuple { elements } => {
                let mut nodes = Vec::with_capacity(elements.len());
                for element in elements {
                    nodes.push(self.walk(element.type_id)?.with_optional(element.optional));
                }
                Ok(TypeNode::new(Kind::Tuple { elements: nodes }))
            }
            TypeKind::Union { types } => Ok(TypeNode::union(self.walk_all(types)?)),
            TypeKind::Intersection { types } => self.walk_intersection(types),
            TypeKind::TypeLiteral(shape) => self.walk_shape(shape),
            TypeKind::Reference { name, type_arguments } => self.walk_reference(name, type_arguments),
            TypeKind::TypeParameter { name } => Ok(self.lookup_type_parameter(name)),
            TypeKind::Function(_) => Ok(TypeNode::others("function")),
            TypeKind::KeyOf(target) => self.walk_keyof(*target),
            TypeKind::Unsupported(what) => Ok(TypeNode::others(*what)),
        }
    }

    fn walk_all(&mut self, ids: &[TypeId]) -> Result<Vec<TypeNode>, SchemaError> {
        ids.iter().map(|id| self.walk(*id)).collect()
    }

    fn walk_reference(&mut self, name: &str, arguments: &[TypeId]) -> Result<TypeNode, SchemaError> {
        if self.options.is_secret_marker(name) {
            return self.walk_argument(arguments, 0);
        }
        if self.options.is_config_marker(name) {
            let inner = self.walk_argument(arguments, 0)?;
            return self.config_node(&inner);
        }

        if let Some(decl) = self.host.resolve_name(name) {
            let arguments = self.walk_all(arguments)?;
            return self.walk_declaration(decl, arguments);
        }

        if let Some(node) = self.walk_builtin(name, arguments)? {
            return Ok(node);
        }

        Err(SchemaError::UnresolvableType {
            name: name.to_string(),
        })
    }

    fn walk_builtin(
        &mut self,
        name: &str,
        arguments: &[TypeId],
    ) -> Result<Option<TypeNode>, SchemaError> {
        if let Some(&(_, bigint)) = TYPED_ARRAYS.iter().find(|(n, _)| *n == name) {
            let element = if bigint { Kind::BigInt } else { Kind::Number };
            return Ok(Some(TypeNode::array(TypeNode::new(element))));
        }

        let node = match name {
            "Array" | "ReadonlyArray" => TypeNode::array(self.walk_argument(arguments, 0)?),
            "Map" | "ReadonlyMap" | "Record" => TypeNode::map(
                self.walk_argument(arguments, 0)?,
                self.walk_argument(arguments, 1)?,
            ),
            "Readonly" => self.walk_argument(arguments, 0)?,
            "Partial" | "Required" => {
                let optional = name == "Partial";
                let mut node = anonymous(self.walk_argument(arguments, 0)?);
                if let Some(schema) = node.object_schema_mut() {
                    for field in schema.fields.values_mut() {
                        field.optional = optional;
                    }
                }
                node
            }
            "Pick" | "Omit" => {
                let keep_listed = name == "Pick";
                let mut node = anonymous(self.walk_argument(arguments, 0)?);
                let keys = literal_keys(&self.walk_argument(arguments, 1)?);
                if let Some(schema) = node.object_schema_mut() {
                    schema
                        .fields
                        .retain(|field, _| keys.contains(field) == keep_listed);
                    schema
                        .secret_fields
                        .retain(|field| keys.contains(field) == keep_listed);
                }
                node
            }
            "NonNullable" => non_nullable(self.walk_argument(arguments, 0)?),
            _ if OPAQUE_GLOBALS.contains(&name) => TypeNode::others(name),
            _ => return Ok(None),
        };

        tracing::trace!(name, kind = node.kind_name(), "mapped builtin");
        Ok(Some(node))
    }

    /// Walk the `index`th type argument; a missing argument is `unknown`.
    fn walk_argument(&mut self, arguments: &[TypeId], index: usize) -> Result<TypeNode, SchemaError> {
        match arguments.get(index) {
            Some(id) => self.walk(*id),
            None => Ok(TypeNode::others("unknown")),
        }
    }

    fn walk_shape(&mut self, shape: &ObjectShape) -> Result<TypeNode, SchemaError> {
        if shape.members.is_empty() {
            if let Some(index) = shape.index {
                let key = self.walk(index.key_type)?;
                let value = self.walk(index.value_type)?;
                return Ok(TypeNode::map(key, value));
            }
        }
        let mut schema = ObjectSchema::default();
        self.walk_members(&shape.members, &mut schema)?;
        Ok(TypeNode::object(schema))
    }

    /// Add the public instance members to `schema`, in declaration order.
    /// Methods have no data schema and map to `others`.
    fn walk_members(&mut self, members: &[Member], schema: &mut ObjectSchema) -> Result<(), SchemaError> {
        for member in members {
            if !member.is_public() || member.is_static() {
                continue;
            }
            let node = match &member.kind {
                MemberKind::Property { type_id, optional } => {
                    if self.is_secret_marker(*type_id) && !schema.secret_fields.contains(&member.name) {
                        schema.secret_fields.push(member.name.clone());
                    }
                    self.walk(*type_id)?.with_optional(*optional)
                }
                MemberKind::Method(_) => TypeNode::others("method"),
            };
            schema.fields.insert(member.name.clone(), node);
        }
        Ok(())
    }

    fn walk_intersection(&mut self, types: &[TypeId]) -> Result<TypeNode, SchemaError> {
        let parts = self.walk_all(types)?;
        if !parts.iter().all(TypeNode::is_object_like) {
            return Ok(TypeNode::others("intersection"));
        }

        let mut merged = ObjectSchema::default();
        for part in parts {
            if let Kind::Object(schema) | Kind::Interface(schema) | Kind::Class(schema) = part.kind {
                merge_fields(&mut merged, schema);
            }
        }
        Ok(TypeNode::object(merged))
    }

    fn walk_keyof(&mut self, target: TypeId) -> Result<TypeNode, SchemaError> {
        let node = self.walk(target)?;
        let Some(schema) = node.object_schema() else {
            return Ok(TypeNode::others("keyof"));
        };
        if schema.fields.is_empty() {
            return Ok(TypeNode::others("never"));
        }
        Ok(TypeNode::union(
            schema
                .fields
                .keys()
                .map(|key| TypeNode::literal(typegen_binder::LiteralValue::String(key.clone())))
                .collect(),
        ))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn expand_declaration(&mut self, decl: &Declaration) -> Result<TypeNode, SchemaError> {
        match decl.kind {
            DeclarationKind::TypeAlias => match decl.aliased {
                Some(aliased) => self.walk(aliased),
                None => Ok(TypeNode::others(decl.name_text.clone())),
            },
            DeclarationKind::Interface | DeclarationKind::Class => {
                if decl.kind == DeclarationKind::Interface && decl.members.is_empty() && decl.heritage.is_empty() {
                    if let Some(index) = decl.index {
                        let key = self.walk(index.key_type)?;
                        let value = self.walk(index.value_type)?;
                        return Ok(TypeNode::map(key, value));
                    }
                }

                let mut schema = ObjectSchema::default();
                for base in &decl.heritage {
                    self.inherit(*base, &mut schema)?;
                }
                self.walk_members(&decl.members, &mut schema)?;

                Ok(TypeNode::new(if decl.is_class() {
                    Kind::Class(schema)
                } else {
                    Kind::Interface(schema)
                }))
            }
            DeclarationKind::Enum => Ok(enum_node(decl)),
        }
    }

    /// Copy the fields of a base type. Bases declared outside the program
    /// (framework base classes) contribute nothing.
    fn inherit(&mut self, base: TypeId, schema: &mut ObjectSchema) -> Result<(), SchemaError> {
        match self.walk(base) {
            Ok(node) => {
                if let Kind::Object(base_schema) | Kind::Interface(base_schema) | Kind::Class(base_schema) =
                    node.kind
                {
                    merge_fields(schema, base_schema);
                }
                Ok(())
            }
            Err(SchemaError::UnresolvableType { name }) => {
                tracing::trace!(base = %name, "skipping unresolved base type");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Bind declared type parameters to the walked arguments. Missing
    /// arguments fall back to the parameter default; parameters with neither
    /// stay unbound.
    fn bind_type_parameters(
        &mut self,
        parameters: &[TypeParameter],
        arguments: &[TypeNode],
    ) -> Result<FxHashMap<String, TypeNode>, SchemaError> {
        let mut scope = FxHashMap::default();
        for (index, parameter) in parameters.iter().enumerate() {
            let node = match (arguments.get(index), parameter.default) {
                (Some(argument), _) => argument.clone(),
                (None, Some(default)) => {
                    // Defaults may refer to earlier parameters.
                    self.scopes.push(scope.clone());
                    let result = self.walk(default);
                    self.scopes.pop();
                    result?
                }
                (None, None) => continue,
            };
            scope.insert(parameter.name.clone(), node);
        }
        Ok(scope)
    }

    fn lookup_type_parameter(&self, name: &str) -> TypeNode {
        match self.scopes.last().and_then(|scope| scope.get(name)) {
            Some(node) => node.clone().with_optional(false),
            None => TypeNode::others(name),
        }
    }

    fn current_name(&self) -> String {
        match self.stack.last() {
            Some(id) => self.host.declaration(*id).name_text.clone(),
            None => "<anonymous>".to_string(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn intrinsic_node(kind: IntrinsicKind) -> TypeNode {
    let kind = match kind {
        IntrinsicKind::String => Kind::String,
        IntrinsicKind::Number => Kind::Number,
        IntrinsicKind::Boolean => Kind::Boolean,
        IntrinsicKind::BigInt => Kind::BigInt,
        IntrinsicKind::Null => Kind::Null,
        IntrinsicKind::Undefined => Kind::Undefined,
        IntrinsicKind::Void => Kind::Void,
        IntrinsicKind::Any
        | IntrinsicKind::Unknown
        | IntrinsicKind::Never
        | IntrinsicKind::Symbol
        | IntrinsicKind::Object => return TypeNode::others(kind.name()),
    };
    TypeNode::new(kind)
}

fn enum_node(decl: &Declaration) -> TypeNode {
    let union_types = decl
        .enum_members
        .iter()
        .map(|member| match &member.value {
            Some(value) => TypeNode::literal(value.clone()),
            None => TypeNode::others("computed enum member"),
        })
        .collect();
    TypeNode::new(Kind::Union(UnionSchema {
        name: Some(decl.name_text.clone()),
        union_types,
        type_params: Vec::new(),
    }))
}

/// Later fields override earlier ones in place.
fn merge_fields(target: &mut ObjectSchema, source: ObjectSchema) {
    for (name, node) in source.fields {
        target.fields.insert(name, node);
    }
    for field in source.secret_fields {
        if !target.secret_fields.contains(&field) {
            target.secret_fields.push(field);
        }
    }
}

/// Strip the declaration identity from an object-like node, for utility
/// types whose result is no longer the declared type.
fn anonymous(node: TypeNode) -> TypeNode {
    let optional = node.optional;
    let kind = match node.kind {
        Kind::Object(mut schema) | Kind::Interface(mut schema) | Kind::Class(mut schema)
            if !schema.recursive_ref =>
        {
            schema.name = None;
            schema.type_params.clear();
            Kind::Object(schema)
        }
        other => other,
    };
    TypeNode { kind, optional }
}

/// String literal keys named by `K` in `Pick<T, K>`.
fn literal_keys(node: &TypeNode) -> Vec<String> {
    match &node.kind {
        Kind::Literal {
            literal_value: typegen_binder::LiteralValue::String(key),
        } => vec![key.clone()],
        Kind::Union(union) => union.union_types.iter().flat_map(literal_keys).collect(),
        _ => Vec::new(),
    }
}

fn non_nullable(node: TypeNode) -> TypeNode {
    let is_nullish = |n: &TypeNode| matches!(n.kind, Kind::Null | Kind::Undefined);
    if is_nullish(&node) {
        return TypeNode::others("never");
    }
    let TypeNode { kind, optional } = node;
    match kind {
        Kind::Union(mut union) => {
            union.union_types.retain(|n| !is_nullish(n));
            match union.union_types.len() {
                0 => TypeNode::others("never"),
                1 => union.union_types.remove(0).with_optional(optional),
                _ => TypeNode { kind: Kind::Union(union), optional },
            }
        }
        other => TypeNode { kind: other, optional },
    }
}
