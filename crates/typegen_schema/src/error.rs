//! Schema extraction errors.

use crate::naming::IdentifierViolation;
use typegen_core::text::TextSpan;
use typegen_diagnostics::{messages, Diagnostic};

/// Errors raised by schema extraction. Each is scoped to the one
/// declaration, member or parameter being mapped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid identifier '{name}': {violation}")]
    InvalidIdentifier {
        name: String,
        violation: IdentifierViolation,
    },

    /// The host cannot resolve a referenced type name at all.
    #[error("cannot resolve type '{name}'")]
    UnresolvableType { name: String },

    /// The walk went deeper than the configured limit.
    #[error("type '{name}' is nested more than {limit} levels deep")]
    CyclicResolutionOverflow { name: String, limit: usize },

    #[error("public member '{member}' was not found on class '{class}'")]
    MemberNotFound { class: String, member: String },

    #[error("configuration type must be an object, found '{found}'")]
    InvalidConfigRoot { found: String },

    #[error("invalid secret field pattern '{pattern}': {message}")]
    InvalidSecretPattern { pattern: String, message: String },
}

impl SchemaError {
    /// Render as a located diagnostic.
    pub fn to_diagnostic(&self, file: &str, span: TextSpan) -> Diagnostic {
        let (message, args) = match self {
            SchemaError::InvalidIdentifier { name, violation } => {
                (&messages::INVALID_AGENT_NAME_0_1, vec![name.clone(), violation.to_string()])
            }
            SchemaError::UnresolvableType { name } => (&messages::CANNOT_RESOLVE_TYPE_0, vec![name.clone()]),
            SchemaError::CyclicResolutionOverflow { name, .. } => {
                (&messages::TYPE_0_NESTED_TOO_DEEPLY, vec![name.clone()])
            }
            SchemaError::MemberNotFound { class, member } => {
                (&messages::MEMBER_0_NOT_FOUND_ON_1, vec![member.clone(), class.clone()])
            }
            SchemaError::InvalidConfigRoot { found } => {
                (&messages::CONFIG_ROOT_0_NOT_AN_OBJECT, vec![found.clone()])
            }
            SchemaError::InvalidSecretPattern { pattern, .. } => {
                (&messages::INVALID_SECRET_PATTERN_0, vec![pattern.clone()])
            }
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Diagnostic::with_location(file.to_string(), span, message, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_diagnostic() {
        let err = SchemaError::MemberNotFound {
            class: "WeatherAgent".to_string(),
            member: "report".to_string(),
        };
        let diag = err.to_diagnostic("agent.ts", TextSpan::new(10, 4));
        assert_eq!(diag.code, 9003);
        assert_eq!(
            diag.message_text,
            "Public member 'report' was not found on class 'WeatherAgent'."
        );
        assert_eq!(diag.file.as_deref(), Some("agent.ts"));
    }

    #[test]
    fn test_display() {
        let err = SchemaError::InvalidIdentifier {
            name: "1foo".to_string(),
            violation: IdentifierViolation::FirstCharacterNotLetter,
        };
        assert_eq!(err.to_string(), "invalid identifier '1foo': does not start with a letter");
    }
}
