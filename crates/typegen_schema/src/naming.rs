//! Agent identifier validation and the kebab-case wire form.

use crate::error::SchemaError;
use heck::ToKebabCase;
use serde::Serialize;
use std::fmt;

/// The first rule an identifier breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierViolation {
    Empty,
    InvalidCharacter(char),
    LeadingSeparator,
    TrailingSeparator,
    ConsecutiveSeparators,
    FirstCharacterNotLetter,
    SegmentStartsWithDigit(String),
}

impl fmt::Display for IdentifierViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierViolation::Empty => write!(f, "identifier is empty"),
            IdentifierViolation::InvalidCharacter(c) => {
                write!(f, "character {:?} is not a letter, digit, '_' or '-'", c)
            }
            IdentifierViolation::LeadingSeparator => write!(f, "starts with '_' or '-'"),
            IdentifierViolation::TrailingSeparator => write!(f, "ends with '_' or '-'"),
            IdentifierViolation::ConsecutiveSeparators => {
                write!(f, "contains consecutive '_' or '-' characters")
            }
            IdentifierViolation::FirstCharacterNotLetter => write!(f, "does not start with a letter"),
            IdentifierViolation::SegmentStartsWithDigit(segment) => {
                write!(f, "segment '{}' starts with a digit", segment)
            }
        }
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

/// Check an agent identifier against the naming grammar.
pub fn validate_identifier(name: &str) -> Result<(), IdentifierViolation> {
    let Some(first) = name.chars().next() else {
        return Err(IdentifierViolation::Empty);
    };

    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || is_separator(c)))
    {
        return Err(IdentifierViolation::InvalidCharacter(c));
    }
    if is_separator(first) {
        return Err(IdentifierViolation::LeadingSeparator);
    }
    if name.ends_with(is_separator) {
        return Err(IdentifierViolation::TrailingSeparator);
    }
    let bytes = name.as_bytes();
    if bytes
        .windows(2)
        .any(|pair| is_separator(pair[0] as char) && is_separator(pair[1] as char))
    {
        return Err(IdentifierViolation::ConsecutiveSeparators);
    }
    if !first.is_ascii_alphabetic() {
        return Err(IdentifierViolation::FirstCharacterNotLetter);
    }
    if let Some(segment) = name
        .split(is_separator)
        .find(|segment| segment.starts_with(|c: char| c.is_ascii_digit()))
    {
        return Err(IdentifierViolation::SegmentStartsWithDigit(segment.to_string()));
    }

    Ok(())
}

/// Split on `_`/`-`, kebab-case each segment and join with single dashes:
/// `FooBarBaz` and `foo_bar-baz` both become `foo-bar-baz`.
pub fn to_kebab_case(name: &str) -> String {
    name.split(is_separator)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_kebab_case())
        .collect::<Vec<_>>()
        .join("-")
}

/// A validated agent class name and its wire identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentClassName {
    value: String,
    as_wit: String,
}

impl AgentClassName {
    pub fn new(name: impl Into<String>) -> Result<Self, SchemaError> {
        let value = name.into();
        validate_identifier(&value).map_err(|violation| SchemaError::InvalidIdentifier {
            name: value.clone(),
            violation,
        })?;
        let as_wit = to_kebab_case(&value);
        Ok(Self { value, as_wit })
    }

    /// The identifier as declared.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The kebab-case wire identifier.
    pub fn as_wit(&self) -> &str {
        &self.as_wit
    }
}

impl fmt::Display for AgentClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects() {
        assert_eq!(validate_identifier(""), Err(IdentifierViolation::Empty));
        assert_eq!(validate_identifier("-foo"), Err(IdentifierViolation::LeadingSeparator));
        assert_eq!(validate_identifier("foo-"), Err(IdentifierViolation::TrailingSeparator));
        assert_eq!(validate_identifier("foo__bar"), Err(IdentifierViolation::ConsecutiveSeparators));
        assert_eq!(validate_identifier("foo-_bar"), Err(IdentifierViolation::ConsecutiveSeparators));
        assert_eq!(validate_identifier("1foo"), Err(IdentifierViolation::FirstCharacterNotLetter));
        assert_eq!(validate_identifier("foo bar"), Err(IdentifierViolation::InvalidCharacter(' ')));
        assert_eq!(validate_identifier("café"), Err(IdentifierViolation::InvalidCharacter('é')));
        assert_eq!(
            validate_identifier("foo-2bar"),
            Err(IdentifierViolation::SegmentStartsWithDigit("2bar".to_string()))
        );
    }

    #[test]
    fn test_accepts() {
        for name in ["foo-bar-baz", "FooBarBaz", "agent_v2", "A", "weather2-agent"] {
            assert_eq!(validate_identifier(name), Ok(()), "{name}");
        }
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("FooBarBaz"), "foo-bar-baz");
        assert_eq!(to_kebab_case("foo-bar-baz"), "foo-bar-baz");
        assert_eq!(to_kebab_case("foo_barBaz"), "foo-bar-baz");
        assert_eq!(to_kebab_case("WeatherAgent"), "weather-agent");
    }

    #[test]
    fn test_agent_class_name() {
        let name = AgentClassName::new("WeatherAgent").unwrap();
        assert_eq!(name.value(), "WeatherAgent");
        assert_eq!(name.as_wit(), "weather-agent");

        let err = AgentClassName::new("foo__bar").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidIdentifier { ref name, violation: IdentifierViolation::ConsecutiveSeparators }
                if name == "foo__bar"
        ));
    }
}
