//! Parameter, config and naming integration tests.

use bumpalo::Bump;
use typegen_binder::{Binder, BoundProgram, TypeHost};
use typegen_options::SchemaOptions;
use typegen_schema::{
    AgentClassName, AgentRegistry, ConfigProperty, Kind, MemberRef, ParameterSchema, SchemaError,
    SecretPolicy, TypeNode, TypeWalker,
};

fn bind(source: &str) -> BoundProgram {
    let arena = Bump::new();
    let (source_file, _) = typegen_parser::parse_source_file(&arena, "agent.ts", source);
    let mut binder = Binder::new();
    binder.bind_source_file(&source_file);
    binder.finish()
}

fn params(source: &str, class: &str, member: MemberRef<'_>) -> Result<Vec<ParameterSchema>, SchemaError> {
    let program = bind(source);
    let options = SchemaOptions::default();
    let secrets = SecretPolicy::from_options(&options).unwrap();
    let mut walker = TypeWalker::new(&program, &options, &secrets);
    walker.extract_params(class, member)
}

fn names(params: &[ParameterSchema]) -> Vec<&str> {
    params.iter().map(|p| p.name.as_str()).collect()
}

fn config_properties(node: &TypeNode) -> &[ConfigProperty] {
    match &node.kind {
        Kind::Config { properties } => properties,
        other => panic!("expected config node, got {other:?}"),
    }
}

const SETTINGS: &str = r#"
    type AliasedNested = { c: number };
    interface Settings {
        foo: number;
        bar: string;
        secret: boolean;
        nested: {
            nestedSecret: number;
            a: boolean;
            b: number[];
        };
        aliasedNested: AliasedNested;
    }
"#;

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_optional_parameter_spellings() {
    let source = r#"
        class Calc {
            run(foo?: number, bar: number | undefined, baz: number = 1, qux: number): void {}
        }
    "#;
    let params = params(source, "Calc", MemberRef::Method("run")).unwrap();
    assert_eq!(names(&params), vec!["foo", "bar", "baz", "qux"]);
    let optional: Vec<_> = params.iter().map(|p| p.optional).collect();
    assert_eq!(optional, vec![true, true, true, false]);

    assert_eq!(params[0].type_node.kind, Kind::Number);
    assert!(params[0].type_node.optional);
    assert!(params[1].type_node.includes_undefined());
    assert_eq!(params[1].value_type(), TypeNode::new(Kind::Number));
    assert_eq!(params[0].value_type(), params[1].value_type());
}

#[test]
fn test_constructor_skips_private_parameter_properties() {
    let source = r#"
        class Agent {
            constructor(private token: string, public name: string, protected level: number, count: number) {}
        }
    "#;
    let params = params(source, "Agent", MemberRef::Constructor).unwrap();
    assert_eq!(names(&params), vec!["name", "count"]);
}

#[test]
fn test_missing_constructor_is_empty() {
    let params = params("class Empty {}", "Empty", MemberRef::Constructor).unwrap();
    assert!(params.is_empty());
}

#[test]
fn test_inherited_constructor() {
    let source = r#"
        class Base { constructor(city: string) {} }
        class Derived extends Base { report(): string { return ""; } }
    "#;
    let params = params(source, "Derived", MemberRef::Constructor).unwrap();
    assert_eq!(names(&params), vec!["city"]);
}

#[test]
fn test_rest_parameter_is_optional() {
    let source = "class Log { write(level: string, ...parts: string[]): void {} }";
    let params = params(source, "Log", MemberRef::Method("write")).unwrap();
    assert!(!params[0].optional);
    assert!(params[1].optional);
    assert_eq!(params[1].type_node.kind_name(), "array");
}

#[test]
fn test_private_method_is_not_found() {
    let source = "class Agent { private helper(x: string): void {} run(): void {} }";
    let err = params(source, "Agent", MemberRef::Method("helper")).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MemberNotFound {
            class: "Agent".to_string(),
            member: "helper".to_string(),
        }
    );
}

#[test]
fn test_unknown_class() {
    let err = params("interface NotAClass {}", "NotAClass", MemberRef::Constructor).unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvableType { ref name } if name == "NotAClass"));
}

#[test]
fn test_unresolvable_parameter_type() {
    let err = params("class A { constructor(x: Missing) {} }", "A", MemberRef::Constructor).unwrap_err();
    assert_eq!(err, SchemaError::UnresolvableType { name: "Missing".to_string() });
}

#[test]
fn test_recursive_parameter_type() {
    let source = "type Recursive = { more?: Recursive }; class A { constructor(r: Recursive) {} }";
    let params = params(source, "A", MemberRef::Constructor).unwrap();
    assert_eq!(params[0].type_node.kind_name(), "object");
}

// ============================================================================
// Config
// ============================================================================

fn assert_settings_flattened(properties: &[ConfigProperty]) {
    let leaves: Vec<(String, bool, &str)> = properties
        .iter()
        .map(|p| (p.path.join("."), p.secret, p.type_node.kind_name()))
        .collect();
    assert_eq!(
        leaves,
        vec![
            ("foo".to_string(), false, "number"),
            ("bar".to_string(), false, "string"),
            ("secret".to_string(), true, "boolean"),
            ("nested.nestedSecret".to_string(), true, "number"),
            ("nested.a".to_string(), false, "boolean"),
            ("nested.b".to_string(), false, "array"),
            ("aliasedNested.c".to_string(), false, "number"),
        ]
    );
}

#[test]
fn test_config_marker_parameter() {
    let source = format!("{SETTINGS} class Agent {{ constructor(name: string, settings: Config<Settings>) {{}} }}");
    let params = params(&source, "Agent", MemberRef::Constructor).unwrap();
    assert_eq!(params[0].type_node.kind, Kind::String);
    assert_settings_flattened(config_properties(&params[1].type_node));
}

#[test]
fn test_config_parameter_by_name() {
    let source = format!("{SETTINGS} class Agent {{ constructor(config: Settings) {{}} }}");
    let params = params(&source, "Agent", MemberRef::Constructor).unwrap();
    assert_settings_flattened(config_properties(&params[0].type_node));
}

#[test]
fn test_config_parameter_by_name_with_undefined() {
    let source = format!("{SETTINGS} class Agent {{ constructor(config: Settings | undefined) {{}} }}");
    let params = params(&source, "Agent", MemberRef::Constructor).unwrap();
    assert!(params[0].optional);
    assert_settings_flattened(config_properties(&params[0].type_node));
}

#[test]
fn test_config_name_on_mixed_union_is_unchanged() {
    let params = params(
        "class A { constructor(config: { a: string } | number) {} }",
        "A",
        MemberRef::Constructor,
    )
    .unwrap();
    assert_eq!(params[0].type_node.kind_name(), "union");
}

#[test]
fn test_config_name_on_primitive_is_unchanged() {
    let params = params("class A { constructor(config: string) {} }", "A", MemberRef::Constructor).unwrap();
    assert_eq!(params[0].type_node.kind, Kind::String);
}

#[test]
fn test_secret_marker_inside_config() {
    let source = r#"
        interface Creds { token: Secret<string>; user: string }
        class A { constructor(creds: Config<Creds>) {} }
    "#;
    let params = params(source, "A", MemberRef::Constructor).unwrap();
    let secrets: Vec<_> = config_properties(&params[0].type_node)
        .iter()
        .map(|p| (p.path.join("."), p.secret))
        .collect();
    assert_eq!(secrets, vec![("token".to_string(), true), ("user".to_string(), false)]);
}

#[test]
fn test_config_serialization() {
    let source = format!("{SETTINGS} class Agent {{ constructor(config: Settings) {{}} }}");
    let params = params(&source, "Agent", MemberRef::Constructor).unwrap();
    let value = serde_json::to_value(&params[0]).unwrap();
    assert_eq!(value["name"], "config");
    assert_eq!(value["type"]["kind"], "config");
    assert_eq!(value["type"]["properties"][2]["path"], serde_json::json!(["secret"]));
    assert_eq!(value["type"]["properties"][2]["secret"], true);
    assert_eq!(value["type"]["properties"][2]["type"]["kind"], "boolean");
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_extract_method_annotations_and_return() {
    let source = r#"
        class Weather {
            @description("Current conditions")
            @prompt("Ask for a city")
            async forecast(city: string, days?: number): Promise<string[]> { return []; }
            untyped() { return 1; }
            private hidden(): void {}
        }
    "#;
    let program = bind(source);
    let options = SchemaOptions::default();
    let secrets = SecretPolicy::from_options(&options).unwrap();
    let mut walker = TypeWalker::new(&program, &options, &secrets);

    let class = walker.resolve_class("Weather").unwrap();
    let methods = walker.public_methods(class);
    let method_names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(method_names, vec!["forecast", "untyped"]);

    let forecast = walker.extract_method(class, methods[0]).unwrap();
    assert_eq!(forecast.description.as_deref(), Some("Current conditions"));
    assert_eq!(forecast.prompt.as_deref(), Some("Ask for a city"));
    assert_eq!(names(&forecast.parameters), vec!["city", "days"]);
    let Kind::Array { element } = &forecast.return_type.kind else {
        panic!("expected unwrapped promise");
    };
    assert_eq!(element.kind, Kind::String);

    let untyped = walker.extract_method(class, methods[1]).unwrap();
    assert_eq!(untyped.return_type, TypeNode::others("any"));
    assert!(untyped.description.is_none());
}

#[test]
fn test_promise_kept_when_unwrapping_disabled() {
    let program = bind("class A { run(): Promise<number> { return p; } }");
    let options = SchemaOptions {
        unwrap_promise_returns: false,
        ..SchemaOptions::default()
    };
    let secrets = SecretPolicy::from_options(&options).unwrap();
    let mut walker = TypeWalker::new(&program, &options, &secrets);
    let class = walker.resolve_class("A").unwrap();
    let method = walker.public_methods(class)[0];
    let schema = walker.extract_method(class, method).unwrap();
    assert_eq!(schema.return_type, TypeNode::others("Promise"));
}

#[test]
fn test_inherited_methods_after_own() {
    let source = r#"
        class Base { shared(): void {} overridden(x: number): void {} }
        class Derived extends Base { overridden(x: string): void {} own(): void {} }
    "#;
    let program = bind(source);
    let options = SchemaOptions::default();
    let secrets = SecretPolicy::markers_only();
    let walker = TypeWalker::new(&program, &options, &secrets);
    let class = walker.resolve_class("Derived").unwrap();
    let names: Vec<_> = walker.public_methods(class).iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["overridden", "own", "shared"]);

    let chain: Vec<_> = walker.class_chain(class).iter().map(|d| d.name_text.as_str()).collect();
    assert_eq!(chain, vec!["Derived", "Base"]);
}

// ============================================================================
// Names and registry
// ============================================================================

#[test]
fn test_agent_class_names() {
    let name = AgentClassName::new("WeatherAgent").unwrap();
    assert_eq!(name.value(), "WeatherAgent");
    assert_eq!(name.as_wit(), "weather-agent");

    assert!(AgentClassName::new("").is_err());
    assert!(matches!(
        AgentClassName::new("9Lives"),
        Err(SchemaError::InvalidIdentifier { .. })
    ));
}

#[test]
fn test_registry_keyed_by_class_name() {
    let mut registry = AgentRegistry::new();
    let name = AgentClassName::new("WeatherAgent").unwrap();
    registry.set_prompt(&name, "first");
    registry.set_prompt(&name, "second");
    registry.set_as_multimodal(&name);

    let meta = registry.lookup("WeatherAgent").unwrap();
    assert_eq!(meta.prompt.as_deref(), Some("second"));
    assert_eq!(meta.multimodal, Some(true));
    assert!(registry.lookup("weather-agent").is_none());
}
