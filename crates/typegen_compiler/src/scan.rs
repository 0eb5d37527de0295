//! Per-class agent extraction.
//!
//! Each agent class is scanned independently: name validation, metadata,
//! constructor and public methods. Failures are turned into diagnostics
//! scoped to the one class or method and never abort the scan.

use crate::output::AgentSchema;
use typegen_binder::{BoundProgram, Declaration, DecoratorInfo, DecoratorValue};
use typegen_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use typegen_options::SchemaOptions;
use typegen_schema::{AgentClassName, AgentRegistry, SchemaError, TypeWalker};

/// The result of scanning one agent class. `registry` is a shard holding
/// only this class.
#[derive(Debug, Default)]
pub(crate) struct AgentScan {
    pub schema: Option<AgentSchema>,
    pub registry: AgentRegistry,
    pub diagnostics: DiagnosticCollection,
}

/// Whether `decl` carries one of the agent decorators.
pub(crate) fn is_agent_class(decl: &Declaration, options: &SchemaOptions) -> bool {
    decl.is_class()
        && decl
            .decorators
            .iter()
            .any(|decorator| options.is_agent_decorator(&decorator.name))
}

pub(crate) fn scan_agent<'h>(walker: &mut TypeWalker<'h, BoundProgram>, decl: &'h Declaration) -> AgentScan {
    let mut scan = AgentScan::default();
    let options = walker.options();

    let name = match AgentClassName::new(&decl.name_text) {
        Ok(name) => name,
        Err(err) => {
            skip_agent(&mut scan, decl, &err);
            return scan;
        }
    };
    register_metadata(&mut scan.registry, &name, decl, options);

    let constructor = match walker.find_constructor(decl) {
        Some(signature) => match walker.extract_signature_params(signature) {
            Ok(params) => params,
            Err(err) => {
                scan.diagnostics.add(err.to_diagnostic(&decl.file, signature.span));
                skip_agent(&mut scan, decl, &err);
                return scan;
            }
        },
        None => Vec::new(),
    };

    let mut methods = Vec::new();
    for member in walker.public_methods(decl) {
        match walker.extract_method(decl, member) {
            Ok(method) => methods.push(method),
            Err(err) => {
                tracing::warn!(agent = %decl.name_text, method = %member.name, error = %err, "skipping method");
                scan.diagnostics.add(err.to_diagnostic(&decl.file, member.span));
                scan.diagnostics.add(Diagnostic::with_location(
                    decl.file.clone(),
                    member.span,
                    &messages::METHOD_0_OF_1_SKIPPED_2,
                    &[&member.name, &decl.name_text, &err.to_string()],
                ));
            }
        }
    }

    tracing::debug!(
        agent = %decl.name_text,
        wit = %name.as_wit(),
        params = constructor.len(),
        methods = methods.len(),
        "scanned agent"
    );

    scan.schema = Some(AgentSchema {
        name,
        file: decl.file.clone(),
        mode: agent_decorator(decl, options)
            .and_then(|decorator| decorator.option("mode"))
            .and_then(DecoratorValue::as_str)
            .map(str::to_string),
        constructor,
        methods,
    });
    scan
}

fn skip_agent(scan: &mut AgentScan, decl: &Declaration, err: &SchemaError) {
    tracing::warn!(agent = %decl.name_text, error = %err, "skipping agent");
    if matches!(err, SchemaError::InvalidIdentifier { .. }) {
        scan.diagnostics.add(err.to_diagnostic(&decl.file, decl.span));
    }
    scan.diagnostics.add(Diagnostic::with_location(
        decl.file.clone(),
        decl.span,
        &messages::AGENT_0_SKIPPED_1,
        &[&decl.name_text, &err.to_string()],
    ));
}

fn agent_decorator<'d>(decl: &'d Declaration, options: &SchemaOptions) -> Option<&'d DecoratorInfo> {
    decl.decorators
        .iter()
        .find(|decorator| options.is_agent_decorator(&decorator.name))
}

/// Record the class-level annotations. The dedicated decorators win over
/// the same keys given as agent decorator options.
fn register_metadata(
    registry: &mut AgentRegistry,
    name: &AgentClassName,
    decl: &Declaration,
    options: &SchemaOptions,
) {
    registry.ensure_meta(name);
    let agent = agent_decorator(decl, options);
    let option_str = |key: &str| agent.and_then(|d| d.option(key)).and_then(DecoratorValue::as_str);
    let decorator_str = |decorator: &str| decl.decorator(decorator).and_then(DecoratorInfo::string_argument);

    if let Some(description) = option_str("description") {
        registry.set_description(name, description);
    }
    if let Some(description) = decorator_str(&options.description_decorator) {
        registry.set_description(name, description);
    }
    if let Some(prompt) = option_str("prompt") {
        registry.set_prompt(name, prompt);
    }
    if let Some(prompt) = decorator_str(&options.prompt_decorator) {
        registry.set_prompt(name, prompt);
    }

    let multimodal_option = agent
        .and_then(|d| d.option("multimodal"))
        .and_then(DecoratorValue::as_bool)
        .unwrap_or(false);
    if multimodal_option || decl.decorator(&options.multimodal_decorator).is_some() {
        registry.set_as_multimodal(name);
    }
}
