//! Config object flattening.
//!
//! A config object is flattened depth-first into `(path, secret, type)`
//! leaves. Nested objects are recursed into; every other kind, including a
//! tied-off recursive placeholder, is a leaf. A leaf below an optional
//! object is optional itself.

use crate::error::SchemaError;
use crate::kind::{ObjectSchema, TypeNode};
use regex::Regex;
use serde::Serialize;
use typegen_options::SchemaOptions;

/// One leaf of a flattened config object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProperty {
    pub path: Vec<String>,
    pub secret: bool,
    #[serde(rename = "type")]
    pub type_node: TypeNode,
}

/// Decides which config field names are secret.
///
/// The name patterns are a heuristic; a field wrapped in a secret marker
/// type is always secret regardless of its name.
#[derive(Debug, Clone)]
pub struct SecretPolicy {
    patterns: Vec<Regex>,
}

impl SecretPolicy {
    pub fn new<I, S>(patterns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|err| SchemaError::InvalidSecretPattern {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    pub fn from_options(options: &SchemaOptions) -> Result<Self, SchemaError> {
        Self::new(&options.secret_field_patterns)
    }

    /// A policy that only honors secret marker types.
    pub fn markers_only() -> Self {
        Self { patterns: Vec::new() }
    }

    pub fn is_secret_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

/// Flatten a config object into its leaves, depth-first in declaration
/// order. Fails when the root is not an object, interface or class.
pub fn extract_config(
    root: &TypeNode,
    policy: &SecretPolicy,
) -> Result<Vec<ConfigProperty>, SchemaError> {
    let Some(schema) = root.object_schema() else {
        return Err(SchemaError::InvalidConfigRoot {
            found: root.kind_name().to_string(),
        });
    };

    let mut properties = Vec::new();
    let mut path = Vec::new();
    flatten(schema, policy, Inherited::default(), &mut path, &mut properties);
    Ok(properties)
}

/// Flags a leaf takes from its ancestor segments.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    secret: bool,
    optional: bool,
}

fn flatten(
    schema: &ObjectSchema,
    policy: &SecretPolicy,
    inherited: Inherited,
    path: &mut Vec<String>,
    out: &mut Vec<ConfigProperty>,
) {
    for (name, field) in &schema.fields {
        let flags = Inherited {
            secret: inherited.secret
                || policy.is_secret_name(name)
                || schema.secret_fields.iter().any(|f| f == name),
            optional: inherited.optional || field.optional,
        };
        path.push(name.clone());

        match field.object_schema() {
            Some(nested) if !nested.recursive_ref => {
                flatten(nested, policy, flags, path, out);
            }
            _ => out.push(ConfigProperty {
                path: path.clone(),
                secret: flags.secret,
                type_node: field.clone().with_optional(flags.optional),
            }),
        }

        path.pop();
    }
}
