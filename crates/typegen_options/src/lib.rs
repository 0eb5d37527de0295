//! typegen_options: typegen.json parsing and schema options.
//!
//! Parses the project file and provides the [`SchemaOptions`] that drive
//! agent discovery, config detection and secret marking.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options consumed by schema extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaOptions {
    // -- Secrets --
    /// Regular expressions matched against config field names; a match marks
    /// the field and everything below it as secret.
    pub secret_field_patterns: Vec<String>,
    /// Generic wrappers that mark a field secret (`Secret<string>`).
    pub secret_marker_types: Vec<String>,

    // -- Config detection --
    /// Generic wrappers that mark a parameter as a config object
    /// (`Config<Settings>`).
    pub config_marker_types: Vec<String>,
    /// Parameter names treated as config objects when their type is an
    /// object.
    pub config_parameter_names: Vec<String>,

    // -- Decorators --
    pub agent_decorators: Vec<String>,
    pub prompt_decorator: String,
    pub description_decorator: String,
    pub multimodal_decorator: String,

    // -- Walking --
    pub max_walk_depth: usize,
    /// Map `Promise<T>` method results to `T`.
    pub unwrap_promise_returns: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            secret_field_patterns: vec!["(?i)secret".to_string()],
            secret_marker_types: vec!["Secret".to_string()],
            config_marker_types: vec!["Config".to_string()],
            config_parameter_names: vec!["config".to_string()],
            agent_decorators: vec!["agent".to_string()],
            prompt_decorator: "prompt".to_string(),
            description_decorator: "description".to_string(),
            multimodal_decorator: "multimodal".to_string(),
            max_walk_depth: 512,
            unwrap_promise_returns: true,
        }
    }
}

impl SchemaOptions {
    pub fn is_agent_decorator(&self, name: &str) -> bool {
        self.agent_decorators.iter().any(|d| d == name)
    }

    pub fn is_secret_marker(&self, name: &str) -> bool {
        self.secret_marker_types.iter().any(|t| t == name)
    }

    pub fn is_config_marker(&self, name: &str) -> bool {
        self.config_marker_types.iter().any(|t| t == name)
    }

    pub fn is_config_parameter_name(&self, name: &str) -> bool {
        self.config_parameter_names.iter().any(|n| n == name)
    }
}

/// The typegen.json file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypegenConfig {
    pub files: Option<Vec<String>>,
    /// Glob patterns, relative to the config file.
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub out_file: Option<String>,
    /// Also emit the schema of every named declaration, not only agents.
    pub emit_types: Option<bool>,
    /// Abort on the first extraction error instead of skipping.
    pub strict: Option<bool>,
    pub schema_options: Option<SchemaOptions>,
}

impl TypegenConfig {
    /// The config written by `typegen --init`.
    pub fn init_template() -> Self {
        Self {
            files: None,
            include: Some(vec!["src/**/*.ts".to_string()]),
            exclude: Some(vec!["**/*.test.ts".to_string(), "node_modules/**".to_string()]),
            out_file: Some("agents.schema.json".to_string()),
            emit_types: Some(false),
            strict: Some(false),
            schema_options: Some(SchemaOptions::default()),
        }
    }

    pub fn schema_options(&self) -> SchemaOptions {
        self.schema_options.clone().unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid typegen config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a typegen.json file from a string.
pub fn parse_config(content: &str) -> Result<TypegenConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a typegen.json file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<TypegenConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content)
}
