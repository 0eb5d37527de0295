//! typegen_compiler: Typegen run orchestration.
//!
//! Creates the program, parses and binds every source file into one
//! declaration table, discovers agent classes and extracts their schemas.
//! Agent classes are scanned in parallel; each worker owns its own
//! [`TypeWalker`] and every class yields a registry shard that is merged in
//! source order afterwards.

mod inputs;
mod output;
mod scan;

pub use inputs::resolve_input_files;
pub use output::{AgentSchema, Generated, TypegenOutput};

use bumpalo::Bump;
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use typegen_binder::{Binder, BoundProgram, TypeHost};
use typegen_core::text::LineMap;
use typegen_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use typegen_options::{SchemaOptions, TypegenConfig};
use typegen_schema::{SchemaError, SecretPolicy, TypeNode, TypeWalker};

/// Worker stack reserved per level of `max_walk_depth`. One level of the
/// walker recurses through several frames.
const STACK_PER_WALK_LEVEL: usize = 64 * 1024;

/// Lower bound for walker stacks.
const MIN_WALKER_STACK: usize = 8 * 1024 * 1024;

/// Options of one run.
#[derive(Debug, Clone, Default)]
pub struct ProgramOptions {
    pub schema: SchemaOptions,
    /// Abort on the first error diagnostic.
    pub strict: bool,
    /// Also map every named declaration into [`TypegenOutput::types`].
    pub emit_types: bool,
}

impl ProgramOptions {
    pub fn from_config(config: &TypegenConfig) -> Self {
        Self {
            schema: config.schema_options(),
            strict: config.strict.unwrap_or(false),
            emit_types: config.emit_types.unwrap_or(false),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error(transparent)]
    Options(#[from] SchemaError),

    #[error("cannot start walker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// First error of a strict run.
    #[error("{0}")]
    Strict(Box<Diagnostic>),
}

/// The program represents the entire typegen run.
pub struct Program<'a> {
    pub options: ProgramOptions,
    pub root_files: Vec<String>,
    /// Arena for the syntax trees of all files.
    arena: &'a Bump,
    /// File name and text, in load order.
    source_files: Vec<(String, String)>,
}

impl<'a> Program<'a> {
    pub fn new(arena: &'a Bump, root_files: Vec<String>, options: ProgramOptions) -> Self {
        Self {
            options,
            root_files,
            arena,
            source_files: Vec::new(),
        }
    }

    pub fn add_source(&mut self, file_name: String, source_text: String) {
        self.source_files.push((file_name, source_text));
    }

    /// Load all root files from disk.
    pub fn load_root_files(&mut self) -> Result<(), CompileError> {
        for file in &self.root_files {
            let content = std::fs::read_to_string(file).map_err(|source| CompileError::Io {
                path: file.clone(),
                source,
            })?;
            self.source_files.push((file.clone(), content));
        }
        Ok(())
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.source_files.iter().map(|(name, _)| name.as_str())
    }

    /// Parse and bind every source file into one program.
    pub fn bind(&self) -> (BoundProgram, DiagnosticCollection) {
        let mut diagnostics = DiagnosticCollection::new();
        let mut binder = Binder::new();

        for (file_name, source_text) in &self.source_files {
            let (source_file, parse_diagnostics) =
                typegen_parser::parse_source_file(self.arena, file_name, source_text);
            diagnostics.extend(parse_diagnostics);
            binder.bind_source_file(&source_file);
        }

        diagnostics.extend(binder.take_diagnostics());
        (binder.finish(), diagnostics)
    }

    /// Run the full pipeline: bind -> discover agents -> extract schemas.
    pub fn generate(&self) -> Result<Generated, CompileError> {
        let schema_options = &self.options.schema;
        let secrets = SecretPolicy::from_options(schema_options)?;

        let (program, mut diagnostics) = self.bind();
        if self.options.strict {
            self.check_strict(&diagnostics)?;
        }

        let agents: Vec<_> = program
            .declarations()
            .iter()
            .filter(|decl| scan::is_agent_class(decl, schema_options))
            .collect();
        tracing::debug!(count = agents.len(), "discovered agent classes");

        // Walks recurse once per nesting level; run them on threads whose
        // stacks fit `max_walk_depth` so the depth guard fires first.
        let pool = walker_pool(schema_options.max_walk_depth)?;
        let scans: Vec<scan::AgentScan> = pool.install(|| {
            agents
                .par_iter()
                .map_init(
                    || TypeWalker::new(&program, schema_options, &secrets),
                    |walker, decl| scan::scan_agent(walker, *decl),
                )
                .collect()
        });

        let mut output = TypegenOutput::default();
        let mut wit_names: FxHashMap<String, String> = FxHashMap::default();
        for (decl, scan) in agents.iter().zip(scans) {
            diagnostics.extend(scan.diagnostics);
            let Some(agent) = scan.schema else { continue };

            if let Some(first) = wit_names.get(agent.name.as_wit()) {
                diagnostics.add(Diagnostic::with_location(
                    decl.file.clone(),
                    decl.span,
                    &messages::AGENTS_0_AND_1_SHARE_NAME_2,
                    &[first.as_str(), agent.name.value(), agent.name.as_wit()],
                ));
                continue;
            }
            wit_names.insert(agent.name.as_wit().to_string(), agent.name.value().to_string());
            output.metadata.merge(scan.registry);
            output.agents.push(agent);
        }

        if agents.is_empty() {
            diagnostics.add(Diagnostic::new(&messages::NO_AGENT_CLASSES_FOUND, &[]));
        }

        if self.options.emit_types {
            let (types, errors) = pool.install(|| walk_all_types(&program, schema_options, &secrets));
            output.types = types;
            diagnostics.extend(errors);
        }

        let mut diagnostics = self.locate(diagnostics);
        diagnostics.sort();
        if self.options.strict {
            self.check_strict(&diagnostics)?;
        }

        tracing::info!(
            files = self.source_files.len(),
            agents = output.agents.len(),
            types = output.types.len(),
            errors = diagnostics.error_count(),
            "typegen finished"
        );
        Ok(Generated { output, diagnostics })
    }

    fn check_strict(&self, diagnostics: &DiagnosticCollection) -> Result<(), CompileError> {
        match diagnostics.diagnostics().iter().find(|d| d.is_error()) {
            Some(first) => {
                let located = self.locate_one(first.clone(), &mut FxHashMap::default());
                Err(CompileError::Strict(Box::new(located)))
            }
            None => Ok(()),
        }
    }

    /// Resolve line and column of every located diagnostic.
    fn locate(&self, diagnostics: DiagnosticCollection) -> DiagnosticCollection {
        let mut line_maps = FxHashMap::default();
        let mut located = DiagnosticCollection::new();
        for diagnostic in diagnostics.into_diagnostics() {
            located.add(self.locate_one(diagnostic, &mut line_maps));
        }
        located
    }

    fn locate_one<'s>(
        &'s self,
        diagnostic: Diagnostic,
        line_maps: &mut FxHashMap<&'s str, LineMap>,
    ) -> Diagnostic {
        if diagnostic.position.is_some() {
            return diagnostic;
        }
        let (Some(file), Some(span)) = (diagnostic.file.as_deref(), diagnostic.span) else {
            return diagnostic;
        };
        let Some((name, text)) = self.source_files.iter().find(|(name, _)| name == file) else {
            return diagnostic;
        };
        let position = line_maps
            .entry(name.as_str())
            .or_insert_with(|| LineMap::new(text))
            .line_and_column_of(span.start);
        diagnostic.with_position(position)
    }
}

fn walker_pool(max_walk_depth: usize) -> Result<rayon::ThreadPool, CompileError> {
    let stack_size = max_walk_depth
        .saturating_mul(STACK_PER_WALK_LEVEL)
        .max(MIN_WALKER_STACK);
    tracing::debug!(stack_size, "starting walker pool");
    let pool = rayon::ThreadPoolBuilder::new()
        .stack_size(stack_size)
        .thread_name(|index| format!("typegen-walker-{}", index))
        .build()?;
    Ok(pool)
}

/// Map every named declaration, in declaration order.
fn walk_all_types(
    program: &BoundProgram,
    options: &SchemaOptions,
    secrets: &SecretPolicy,
) -> (IndexMap<String, TypeNode>, DiagnosticCollection) {
    let mut types = IndexMap::new();
    let mut diagnostics = DiagnosticCollection::new();
    let mut walker = TypeWalker::new(program, options, secrets);
    for decl in program.declarations() {
        match walker.walk_declaration(decl.id, Vec::new()) {
            Ok(node) => {
                types.insert(decl.name_text.clone(), node);
            }
            Err(err) => diagnostics.add(err.to_diagnostic(&decl.file, decl.span)),
        }
    }
    (types, diagnostics)
}
