//! The serialized result of a typegen run.

use indexmap::IndexMap;
use serde::Serialize;
use typegen_diagnostics::DiagnosticCollection;
use typegen_schema::{AgentClassName, AgentRegistry, MethodSchema, ParameterSchema, TypeNode};

/// Everything the binding generator consumes.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypegenOutput {
    /// Agent classes in source order.
    pub agents: Vec<AgentSchema>,
    /// Schemas of every named declaration, when `emitTypes` is set.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, TypeNode>,
    /// Agent annotations keyed by class name.
    pub metadata: AgentRegistry,
}

impl TypegenOutput {
    pub fn agent(&self, class_name: &str) -> Option<&AgentSchema> {
        self.agents.iter().find(|agent| agent.name.value() == class_name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSchema {
    pub name: AgentClassName,
    pub file: String,
    /// The `mode` option of the agent decorator (`durable`, `ephemeral`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub constructor: Vec<ParameterSchema>,
    pub methods: Vec<MethodSchema>,
}

impl AgentSchema {
    pub fn method(&self, name: &str) -> Option<&MethodSchema> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// Output plus every diagnostic of the run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub output: TypegenOutput,
    pub diagnostics: DiagnosticCollection,
}
