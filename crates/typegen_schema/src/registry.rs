//! Agent metadata registry.
//!
//! An explicit registry object owned by one typegen run. Entries are keyed by
//! the declared class name and iterate in registration order.

use crate::naming::AgentClassName;
use indexmap::IndexMap;
use serde::Serialize;

/// Human-authored annotations of one agent class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multimodal: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AgentRegistry {
    entries: IndexMap<String, AgentMetadata>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record for `name` if there is none.
    pub fn ensure_meta(&mut self, name: &AgentClassName) -> &mut AgentMetadata {
        self.entries.entry(name.value().to_string()).or_default()
    }

    pub fn set_prompt(&mut self, name: &AgentClassName, prompt: impl Into<String>) {
        self.ensure_meta(name).prompt = Some(prompt.into());
    }

    pub fn set_description(&mut self, name: &AgentClassName, description: impl Into<String>) {
        self.ensure_meta(name).description = Some(description.into());
    }

    pub fn set_as_multimodal(&mut self, name: &AgentClassName) {
        self.ensure_meta(name).multimodal = Some(true);
    }

    /// Never creates an entry.
    pub fn lookup(&self, name: &str) -> Option<&AgentMetadata> {
        self.entries.get(name)
    }

    /// Fold another registry into this one. Fields set in `other` win.
    pub fn merge(&mut self, other: AgentRegistry) {
        for (name, meta) in other.entries {
            let entry = self.entries.entry(name).or_default();
            if meta.prompt.is_some() {
                entry.prompt = meta.prompt;
            }
            if meta.description.is_some() {
                entry.description = meta.description;
            }
            if meta.multimodal.is_some() {
                entry.multimodal = meta.multimodal;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentMetadata)> {
        self.entries.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> AgentClassName {
        AgentClassName::new(value).unwrap()
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = AgentRegistry::new();
        let agent = name("WeatherAgent");
        registry.set_description(&agent, "a");
        registry.set_description(&agent, "b");
        assert_eq!(registry.lookup("WeatherAgent").unwrap().description.as_deref(), Some("b"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_ensure_meta_is_idempotent() {
        let mut registry = AgentRegistry::new();
        let agent = name("Counter");
        registry.set_prompt(&agent, "count things");
        registry.ensure_meta(&agent);
        assert_eq!(registry.lookup("Counter").unwrap().prompt.as_deref(), Some("count things"));
    }

    #[test]
    fn test_lookup_does_not_create() {
        let registry = AgentRegistry::new();
        assert!(registry.lookup("Missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_merge_shards() {
        let mut first = AgentRegistry::new();
        first.set_description(&name("A"), "first");
        first.set_prompt(&name("A"), "keep me");
        first.set_as_multimodal(&name("B"));

        let mut second = AgentRegistry::new();
        second.set_description(&name("A"), "second");
        second.ensure_meta(&name("C"));

        first.merge(second);
        let a = first.lookup("A").unwrap();
        assert_eq!(a.description.as_deref(), Some("second"));
        assert_eq!(a.prompt.as_deref(), Some("keep me"));
        assert_eq!(first.lookup("B").unwrap().multimodal, Some(true));

        let order: Vec<_> = first.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }
}
