//! typegen_schema: Type-to-schema mapping.
//!
//! Maps host types to a serializable [`TypeNode`] tree and extracts the
//! pieces the binding generator consumes: constructor and method parameter
//! lists, flattened config objects, validated agent names and the agent
//! metadata registry.
//!
//! All extraction runs through a [`TypeWalker`], which carries the
//! per-traversal cycle set and generic bindings:
//!
//! ```ignore
//! let secrets = SecretPolicy::from_options(&options)?;
//! let mut walker = TypeWalker::new(&program, &options, &secrets);
//! let params = walker.extract_params("WeatherAgent", MemberRef::Constructor)?;
//! ```

pub mod config;
pub mod error;
pub mod kind;
pub mod naming;
pub mod params;
pub mod registry;
pub mod walker;

pub use config::{extract_config, ConfigProperty, SecretPolicy};
pub use error::SchemaError;
pub use kind::{Kind, ObjectSchema, TypeNode, UnionSchema};
pub use naming::{to_kebab_case, validate_identifier, AgentClassName, IdentifierViolation};
pub use params::{MemberRef, MethodSchema, ParameterSchema};
pub use registry::{AgentMetadata, AgentRegistry};
pub use walker::TypeWalker;
