//! typegen_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Scanner and parser problems, binder conflicts and per-declaration schema
//! failures are all surfaced as [`Diagnostic`]s so that one bad declaration
//! never hides the rest of a run.

use serde::Serialize;
use std::fmt;
use typegen_core::text::{LineAndColumn, TextSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// May contain `{0}`, `{1}`, ... placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: Option<String>,
    #[serde(skip)]
    pub span: Option<TextSpan>,
    /// Resolved line/column of `span`, when the source text was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            position: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            position: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Attach a resolved line/column for display.
    pub fn with_position(mut self, position: LineAndColumn) -> Self {
        self.position = Some(position.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(ref position) = self.position {
                write!(f, ":{}", position)?;
            } else if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} TG{}: {}", self.category, self.code, self.message_text)
    }
}

/// Replace `{0}`, `{1}`, ... in a template with the given arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated during one run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file.cmp(&b.file).then_with(|| {
                let a_pos = a.span.map(|s| s.start).unwrap_or(0);
                let b_pos = b.span.map(|s| s.start).unwrap_or(0);
                a_pos.cmp(&b_pos)
            })
        });
    }
}

// ============================================================================
// Diagnostic messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Message, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Message, message: $msg }
        };
    }

    // ========================================================================
    // Scanner and parser (1000-1199)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Error, "Unexpected token.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, "Type expected.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const UNTERMINATED_TEMPLATE_LITERAL: DiagnosticMessage = diag!(1160, Error, "Unterminated template literal.");
    pub const TYPE_NESTING_TOO_DEEP: DiagnosticMessage = diag!(1199, Error, "Type annotation is nested too deeply to parse.");

    // ========================================================================
    // Binder (2000-2999)
    // ========================================================================
    pub const DUPLICATE_IDENTIFIER_0: DiagnosticMessage = diag!(2300, Error, "Duplicate identifier '{0}'.");
    pub const INTERFACE_0_MERGED: DiagnosticMessage = diag!(2301, Message, "Interface '{0}' has multiple declarations; members were merged.");

    // ========================================================================
    // Schema extraction (9000-9099)
    // ========================================================================
    pub const INVALID_AGENT_NAME_0_1: DiagnosticMessage = diag!(9001, Error, "Invalid agent class name '{0}': {1}.");
    pub const CANNOT_RESOLVE_TYPE_0: DiagnosticMessage = diag!(9002, Error, "Cannot resolve type '{0}'.");
    pub const MEMBER_0_NOT_FOUND_ON_1: DiagnosticMessage = diag!(9003, Error, "Public member '{0}' was not found on class '{1}'.");
    pub const TYPE_0_NESTED_TOO_DEEPLY: DiagnosticMessage = diag!(9004, Error, "Type '{0}' is nested too deeply to map.");
    pub const CONFIG_ROOT_0_NOT_AN_OBJECT: DiagnosticMessage = diag!(9005, Error, "Configuration type must be an object, found '{0}'.");
    pub const AGENT_0_SKIPPED_1: DiagnosticMessage = diag!(9006, Warning, "Agent '{0}' was skipped: {1}");
    pub const METHOD_0_OF_1_SKIPPED_2: DiagnosticMessage = diag!(9007, Warning, "Method '{0}' of agent '{1}' was skipped: {2}");
    pub const AGENTS_0_AND_1_SHARE_NAME_2: DiagnosticMessage = diag!(9008, Error, "Agents '{0}' and '{1}' both map to the identifier '{2}'.");
    pub const INVALID_SECRET_PATTERN_0: DiagnosticMessage = diag!(9009, Error, "Invalid secret field pattern '{0}'.");
    pub const NO_AGENT_CLASSES_FOUND: DiagnosticMessage = diag!(9010, Message, "No agent classes were found in the input files.");
}
