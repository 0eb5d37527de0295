//! Constructor and method parameter extraction.

use crate::error::SchemaError;
use crate::kind::TypeNode;
use crate::walker::TypeWalker;
use rustc_hash::FxHashSet;
use serde::Serialize;
use typegen_binder::{DeclId, Declaration, DecoratorInfo, Member, MemberKind, Parameter, Signature, TypeHost, TypeKind};

/// Which signature of a class to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef<'a> {
    Constructor,
    Method(&'a str),
}

/// One extracted parameter.
///
/// `optional` folds both spellings of an optional parameter (`x?: T` and
/// `x: T | undefined`); `type_node` keeps the declared shape, so the second
/// spelling is still visible as a `union` with an `undefined` member.
/// Config parameters are the exception: their `type_node` is the flattened
/// `config` node of the object type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub type_node: TypeNode,
    pub optional: bool,
}

impl ParameterSchema {
    /// The declared type without its `undefined` members.
    pub fn value_type(&self) -> TypeNode {
        self.type_node.without_undefined().with_optional(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub parameters: Vec<ParameterSchema>,
    pub return_type: TypeNode,
}

impl<'h, H: TypeHost + ?Sized> TypeWalker<'h, H> {
    /// Extract the public parameters of a class constructor or method, in
    /// declaration order.
    pub fn extract_params(
        &mut self,
        class_name: &str,
        member: MemberRef<'_>,
    ) -> Result<Vec<ParameterSchema>, SchemaError> {
        let class = self.resolve_class(class_name)?;
        match member {
            MemberRef::Constructor => match self.find_constructor(class) {
                Some(signature) => self.extract_signature_params(signature),
                None => Ok(Vec::new()),
            },
            MemberRef::Method(name) => {
                let signature = self
                    .public_methods(class)
                    .into_iter()
                    .find(|m| m.name == name)
                    .and_then(|m| match &m.kind {
                        MemberKind::Method(signature) => Some(signature),
                        MemberKind::Property { .. } => None,
                    })
                    .ok_or_else(|| SchemaError::MemberNotFound {
                        class: class_name.to_string(),
                        member: name.to_string(),
                    })?;
                self.extract_signature_params(signature)
            }
        }
    }

    pub fn resolve_class(&self, name: &str) -> Result<&'h Declaration, SchemaError> {
        let host = self.host();
        host.resolve_name(name)
            .map(|id| host.declaration(id))
            .filter(|decl| decl.is_class())
            .ok_or_else(|| SchemaError::UnresolvableType {
                name: name.to_string(),
            })
    }

    /// The class and its resolvable base classes, nearest first.
    pub fn class_chain(&self, class: &'h Declaration) -> Vec<&'h Declaration> {
        let host = self.host();
        let mut chain = vec![class];
        let mut seen: FxHashSet<DeclId> = FxHashSet::default();
        seen.insert(class.id);

        let mut current = class;
        while let Some(base) = current.heritage.first() {
            let TypeKind::Reference { name, .. } = host.type_kind(*base) else { break };
            let Some(id) = host.resolve_name(name) else { break };
            let decl = host.declaration(id);
            if !decl.is_class() || !seen.insert(id) {
                break;
            }
            chain.push(decl);
            current = decl;
        }
        chain
    }

    /// The nearest declared constructor, inherited when the class has none.
    pub fn find_constructor(&self, class: &'h Declaration) -> Option<&'h Signature> {
        self.class_chain(class)
            .into_iter()
            .find_map(|decl| decl.constructor.as_ref())
    }

    /// Public instance methods, own first, then inherited ones not
    /// overridden.
    pub fn public_methods(&self, class: &'h Declaration) -> Vec<&'h Member> {
        let mut methods: Vec<&'h Member> = Vec::new();
        for decl in self.class_chain(class) {
            for member in &decl.members {
                if member.is_method()
                    && member.is_public()
                    && !member.is_static()
                    && !methods.iter().any(|m| m.name == member.name)
                {
                    methods.push(member);
                }
            }
        }
        methods
    }

    /// Extract the parameters of a signature, skipping non-public parameter
    /// properties.
    pub fn extract_signature_params(
        &mut self,
        signature: &Signature,
    ) -> Result<Vec<ParameterSchema>, SchemaError> {
        let mut params = Vec::with_capacity(signature.parameters.len());
        for (index, param) in signature.parameters.iter().enumerate() {
            if param.is_private() {
                continue;
            }
            params.push(self.extract_parameter(param, index)?);
        }
        Ok(params)
    }

    fn extract_parameter(
        &mut self,
        param: &Parameter,
        index: usize,
    ) -> Result<ParameterSchema, SchemaError> {
        let name = param.name.clone().unwrap_or_else(|| format!("arg{}", index));
        let declared_optional = param.question || param.has_initializer;

        let mut node = match param.type_id {
            Some(type_id) => self.walk(type_id)?,
            None => TypeNode::others("any"),
        };
        let optional = declared_optional || param.rest || node.includes_undefined();

        // Config by convention: a config-named parameter whose type is an
        // object once `undefined` is removed.
        if self.options().is_config_parameter_name(&name) {
            let value = node.without_undefined();
            if value.object_schema().is_some_and(|schema| !schema.recursive_ref) {
                node = self.config_node(&value)?;
            }
        }
        node.optional = declared_optional;

        Ok(ParameterSchema {
            name,
            type_node: node,
            optional,
        })
    }

    /// The schema of a method result. `Promise<T>` maps to `T` unless
    /// disabled; a missing annotation maps to `others`.
    pub fn extract_return_type(&mut self, signature: &Signature) -> Result<TypeNode, SchemaError> {
        let Some(return_type) = signature.return_type else {
            return Ok(TypeNode::others("any"));
        };
        if self.options().unwrap_promise_returns {
            if let TypeKind::Reference { name, type_arguments } = self.host().type_kind(return_type) {
                if name == "Promise" {
                    return match type_arguments.first() {
                        Some(inner) => self.walk(*inner),
                        None => Ok(TypeNode::others("any")),
                    };
                }
            }
        }
        self.walk(return_type)
    }

    /// Extract a method of `class` with its annotations.
    pub fn extract_method(
        &mut self,
        class: &Declaration,
        member: &Member,
    ) -> Result<MethodSchema, SchemaError> {
        let MemberKind::Method(signature) = &member.kind else {
            return Err(SchemaError::MemberNotFound {
                class: class.name_text.clone(),
                member: member.name.clone(),
            });
        };
        let options = self.options();
        let annotation = |decorator: &str| {
            member
                .decorator(decorator)
                .and_then(DecoratorInfo::string_argument)
                .map(str::to_string)
        };

        Ok(MethodSchema {
            name: member.name.clone(),
            description: annotation(&options.description_decorator),
            prompt: annotation(&options.prompt_decorator),
            parameters: self.extract_signature_params(signature)?,
            return_type: self.extract_return_type(signature)?,
        })
    }
}
