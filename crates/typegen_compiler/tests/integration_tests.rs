//! Typegen integration tests.
//!
//! End-to-end tests for the pipeline: parse -> bind -> discover agents ->
//! extract schemas, on inline sources and on the fixture files.

use bumpalo::Bump;
use std::path::Path;
use typegen_compiler::{resolve_input_files, CompileError, Generated, Program, ProgramOptions};
use typegen_options::{SchemaOptions, TypegenConfig};
use typegen_schema::Kind;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Helper: run the pipeline over inline sources.
fn generate_sources(sources: &[(&str, &str)], options: ProgramOptions) -> Result<Generated, CompileError> {
    let arena = Bump::new();
    let mut program = Program::new(&arena, vec![], options);
    for (file_name, text) in sources {
        program.add_source(file_name.to_string(), text.to_string());
    }
    program.generate()
}

/// Helper: run the pipeline over fixture files.
fn generate_fixtures(names: &[&str], options: ProgramOptions) -> Result<Generated, CompileError> {
    let arena = Bump::new();
    let files = names.iter().map(|name| fixture(name)).collect();
    let mut program = Program::new(&arena, files, options);
    program.load_root_files()?;
    program.generate()
}

fn codes(generated: &Generated) -> Vec<u32> {
    generated.diagnostics.diagnostics().iter().map(|d| d.code).collect()
}

// ============================================================================
// Fixture Files
// ============================================================================

#[test]
fn test_weather_agent_fixture() {
    let generated = generate_fixtures(&["models.ts", "weather_agent.ts"], ProgramOptions::default()).unwrap();
    assert!(!generated.diagnostics.has_errors(), "{:?}", generated.diagnostics);

    let output = &generated.output;
    assert_eq!(output.agents.len(), 1);
    let agent = output.agent("WeatherAgent").unwrap();
    assert_eq!(agent.name.as_wit(), "weather-agent");
    assert_eq!(agent.mode.as_deref(), Some("durable"));

    let ctor: Vec<_> = agent.constructor.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(ctor, vec!["name", "config"]);
    let Kind::Config { properties } = &agent.constructor[1].type_node.kind else {
        panic!("expected config parameter");
    };
    let leaves: Vec<_> = properties.iter().map(|p| (p.path.join("."), p.secret)).collect();
    assert_eq!(
        leaves,
        vec![
            ("defaultCity".to_string(), false),
            ("units".to_string(), false),
            ("apiSecret".to_string(), true),
            ("provider.endpoint".to_string(), false),
            ("provider.token".to_string(), true),
            ("provider.retries".to_string(), false),
        ]
    );

    let methods: Vec<_> = agent.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["forecast", "current"]);

    let forecast = agent.method("forecast").unwrap();
    assert_eq!(forecast.description.as_deref(), Some("Forecast for the next few days"));
    assert_eq!(forecast.return_type.kind_name(), "interface");
    assert_eq!(
        forecast.return_type.object_schema().unwrap().name.as_deref(),
        Some("Forecast")
    );

    let current = agent.method("current").unwrap();
    let optional: Vec<_> = current.parameters.iter().map(|p| p.optional).collect();
    assert_eq!(optional, vec![false, true]);
    assert_eq!(current.parameters[1].type_node.kind_name(), "union");

    let meta = output.metadata.lookup("WeatherAgent").unwrap();
    assert_eq!(meta.description.as_deref(), Some("Reports the weather for a city"));
    assert_eq!(meta.prompt.as_deref(), Some("Ask about the weather anywhere"));
    assert_eq!(meta.multimodal, None);
}

#[test]
fn test_counter_agent_fixture() {
    let generated = generate_fixtures(&["counter_agent.ts"], ProgramOptions::default()).unwrap();
    let agent = generated.output.agent("CounterAgent").unwrap();
    assert_eq!(agent.mode.as_deref(), Some("ephemeral"));
    assert_eq!(agent.constructor.len(), 1);
    assert!(agent.constructor[0].optional);

    let methods: Vec<_> = agent.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["increment", "reset"]);
    assert_eq!(agent.method("reset").unwrap().return_type.kind, Kind::Void);

    let meta = generated.output.metadata.lookup("CounterAgent").unwrap();
    assert_eq!(meta.multimodal, Some(true));
}

#[test]
fn test_broken_agents_are_scoped() {
    let generated = generate_fixtures(&["broken_agent.ts"], ProgramOptions::default()).unwrap();
    let codes = codes(&generated);
    // Unresolvable parameter type, skipped method, shared identifier,
    // invalid name and skipped agent.
    for code in [9002, 9007, 9008, 9001, 9006] {
        assert!(codes.contains(&code), "missing {code} in {codes:?}");
    }
    assert!(generated.diagnostics.has_errors());

    let output = &generated.output;
    let agents: Vec<_> = output.agents.iter().map(|a| a.name.value()).collect();
    assert_eq!(agents, vec!["ReportAgent"]);

    let report = output.agent("ReportAgent").unwrap();
    let methods: Vec<_> = report.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["download"]);
    let download = report.method("download").unwrap();
    assert_eq!(download.prompt.as_deref(), Some("Download every report"));
    let Kind::Array { element } = &download.return_type.kind else {
        panic!("expected typed array");
    };
    assert_eq!(element.kind, Kind::Number);

    assert!(output.metadata.lookup("Report_Agent").is_none());
    assert!(output.metadata.lookup("Bad__Name").is_none());
}

#[test]
fn test_diagnostics_carry_positions() {
    let generated = generate_fixtures(&["broken_agent.ts"], ProgramOptions::default()).unwrap();
    let invalid_name = generated
        .diagnostics
        .diagnostics()
        .iter()
        .find(|d| d.code == 9001)
        .unwrap();
    assert!(invalid_name.file.as_deref().unwrap().ends_with("broken_agent.ts"));
    assert!(invalid_name.position.is_some());
}

#[test]
fn test_strict_aborts_on_first_error() {
    let options = ProgramOptions {
        strict: true,
        ..ProgramOptions::default()
    };
    let err = generate_fixtures(&["broken_agent.ts"], options).unwrap_err();
    let CompileError::Strict(diagnostic) = err else {
        panic!("expected strict abort, got {err:?}");
    };
    assert!(diagnostic.is_error());
}

#[test]
fn test_missing_file() {
    let err = generate_fixtures(&["does_not_exist.ts"], ProgramOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io { .. }));
}

// ============================================================================
// Inline Sources
// ============================================================================

#[test]
fn test_no_agents_found() {
    let generated = generate_sources(&[("a.ts", "interface A { x: number }")], ProgramOptions::default()).unwrap();
    assert!(generated.output.agents.is_empty());
    assert_eq!(codes(&generated), vec![9010]);
    assert!(!generated.diagnostics.has_errors());
}

#[test]
fn test_agents_across_files_share_types() {
    let generated = generate_sources(
        &[
            ("types.ts", "export interface Point { x: number; y: number }"),
            (
                "agent.ts",
                "@agent() export class Plotter { plot(points: Point[]): void {} }",
            ),
        ],
        ProgramOptions::default(),
    )
    .unwrap();
    let plot = generated.output.agent("Plotter").unwrap().method("plot").unwrap();
    let Kind::Array { element } = &plot.parameters[0].type_node.kind else { panic!() };
    assert_eq!(element.kind_name(), "interface");
}

#[test]
fn test_parallel_scan_keeps_source_order() {
    let source: String = (0..24)
        .map(|i| format!("@agent() @description(\"agent {i}\") class Agent{i} {{ run(): number {{ return {i}; }} }}\n"))
        .collect();
    let generated = generate_sources(&[("many.ts", &source)], ProgramOptions::default()).unwrap();

    let expected: Vec<String> = (0..24).map(|i| format!("Agent{i}")).collect();
    let agents: Vec<_> = generated.output.agents.iter().map(|a| a.name.value().to_string()).collect();
    assert_eq!(agents, expected);
    let registered: Vec<_> = generated.output.metadata.iter().map(|(name, _)| name.to_string()).collect();
    assert_eq!(registered, expected);
    assert_eq!(
        generated.output.metadata.lookup("Agent7").unwrap().description.as_deref(),
        Some("agent 7")
    );
}

/// `count` interfaces, each holding the next one.
fn interface_chain(count: usize) -> String {
    let mut source: String = (0..count)
        .map(|i| format!("interface Link{} {{ next: Link{} }}\n", i, i + 1))
        .collect();
    source.push_str(&format!("interface Link{} {{ end: string }}\n", count));
    source
}

#[test]
fn test_nesting_past_default_depth_is_reported() {
    let limit = SchemaOptions::default().max_walk_depth;
    let mut source = interface_chain(limit + 1);
    source.push_str("@agent() class Deep { constructor(head: Link0) {} }\n");

    let generated = generate_sources(&[("deep.ts", &source)], ProgramOptions::default()).unwrap();
    let codes = codes(&generated);
    assert!(codes.contains(&9004), "{codes:?}");
    assert!(codes.contains(&9006), "{codes:?}");
    assert!(generated.output.agents.is_empty());
}

#[test]
fn test_nesting_within_default_depth_is_walked() {
    let limit = SchemaOptions::default().max_walk_depth;
    let mut source = interface_chain(limit - 8);
    source.push_str("@agent() class Deep { constructor(head: Link0) {} }\n");

    let generated = generate_sources(&[("deep.ts", &source)], ProgramOptions::default()).unwrap();
    assert!(!generated.diagnostics.has_errors(), "{:?}", generated.diagnostics);
    let agent = generated.output.agent("Deep").unwrap();
    assert_eq!(agent.constructor[0].type_node.kind_name(), "interface");
}

#[test]
fn test_emit_types_past_default_depth_is_reported() {
    let limit = SchemaOptions::default().max_walk_depth;
    let options = ProgramOptions {
        emit_types: true,
        ..ProgramOptions::default()
    };
    let generated = generate_sources(&[("deep.ts", &interface_chain(limit + 1))], options).unwrap();
    assert!(codes(&generated).contains(&9004));
    assert!(!generated.output.types.contains_key("Link0"));
}

#[test]
fn test_custom_agent_decorator() {
    let options = ProgramOptions {
        schema: SchemaOptions {
            agent_decorators: vec!["durableAgent".to_string()],
            ..SchemaOptions::default()
        },
        ..ProgramOptions::default()
    };
    let generated = generate_sources(
        &[("a.ts", "@durableAgent() class Worker {} @agent() class Ignored {}")],
        options,
    )
    .unwrap();
    let agents: Vec<_> = generated.output.agents.iter().map(|a| a.name.value()).collect();
    assert_eq!(agents, vec!["Worker"]);
}

#[test]
fn test_invalid_secret_pattern_option() {
    let options = ProgramOptions {
        schema: SchemaOptions {
            secret_field_patterns: vec!["(".to_string()],
            ..SchemaOptions::default()
        },
        ..ProgramOptions::default()
    };
    let err = generate_sources(&[("a.ts", "")], options).unwrap_err();
    assert!(matches!(err, CompileError::Options(_)));
}

#[test]
fn test_emit_types() {
    let options = ProgramOptions {
        emit_types: true,
        ..ProgramOptions::default()
    };
    let generated = generate_fixtures(&["models.ts"], options).unwrap();
    let names: Vec<_> = generated.output.types.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Units", "DayReport", "Forecast", "WeatherSettings"]);
    assert_eq!(generated.output.types["Units"].kind_name(), "union");
}

#[test]
fn test_output_serialization() {
    let generated = generate_fixtures(&["models.ts", "weather_agent.ts"], ProgramOptions::default()).unwrap();
    let value = serde_json::to_value(&generated.output).unwrap();
    let agent = &value["agents"][0];
    assert_eq!(agent["name"]["value"], "WeatherAgent");
    assert_eq!(agent["name"]["asWit"], "weather-agent");
    assert_eq!(agent["constructor"][1]["type"]["kind"], "config");
    assert_eq!(agent["methods"][0]["returnType"]["kind"], "interface");
    assert_eq!(value["metadata"]["WeatherAgent"]["prompt"], "Ask about the weather anywhere");
    assert!(value.get("types").is_none());
}

// ============================================================================
// Input Discovery
// ============================================================================

#[test]
fn test_resolve_input_files() {
    let config = TypegenConfig {
        files: Some(vec!["tests/fixtures/models.ts".to_string()]),
        include: Some(vec!["tests/fixtures/*.ts".to_string()]),
        exclude: Some(vec!["**/broken_agent.ts".to_string()]),
        ..TypegenConfig::default()
    };
    let base = Path::new(env!("CARGO_MANIFEST_DIR"));
    let files = resolve_input_files(&config, base).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| Path::new(f).file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["models.ts", "counter_agent.ts", "weather_agent.ts"]);
}

#[test]
fn test_invalid_glob() {
    let config = TypegenConfig {
        include: Some(vec!["src/[".to_string()]),
        ..TypegenConfig::default()
    };
    let err = resolve_input_files(&config, Path::new(".")).unwrap_err();
    assert!(matches!(err, CompileError::Pattern { .. }));
}
