//! Type walker integration tests.

use bumpalo::Bump;
use typegen_binder::{Binder, BoundProgram, LiteralValue, TypeHost};
use typegen_options::SchemaOptions;
use typegen_schema::{Kind, SchemaError, SecretPolicy, TypeNode, TypeWalker};

fn bind(source: &str) -> BoundProgram {
    let arena = Bump::new();
    let (source_file, diagnostics) = typegen_parser::parse_source_file(&arena, "test.ts", source);
    assert!(!diagnostics.has_errors(), "parse errors: {:?}", diagnostics.diagnostics());
    let mut binder = Binder::new();
    binder.bind_source_file(&source_file);
    binder.finish()
}

fn walk_with(source: &str, name: &str, options: &SchemaOptions) -> Result<TypeNode, SchemaError> {
    let program = bind(source);
    let secrets = SecretPolicy::from_options(options).unwrap();
    let mut walker = TypeWalker::new(&program, options, &secrets);
    let id = program.resolve_name(name).expect("declaration not found");
    walker.walk_declaration(id, Vec::new())
}

fn walk_named(source: &str, name: &str) -> TypeNode {
    walk_with(source, name, &SchemaOptions::default()).unwrap()
}

fn field<'n>(node: &'n TypeNode, name: &str) -> &'n TypeNode {
    node.object_schema()
        .and_then(|schema| schema.fields.get(name))
        .unwrap_or_else(|| panic!("no field {name}"))
}

fn field_names(node: &TypeNode) -> Vec<&str> {
    node.object_schema()
        .map(|schema| schema.fields.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

fn others_name(node: &TypeNode) -> Option<&str> {
    match &node.kind {
        Kind::Others { type_name } => type_name.as_deref(),
        _ => None,
    }
}

// ============================================================================
// Primitives and literals
// ============================================================================

#[test]
fn test_primitive_fields() {
    let node = walk_named(
        "interface P { s: string; n: number; b: boolean; big: bigint; nu: null; u: undefined; v: void }",
        "P",
    );
    assert_eq!(node.kind_name(), "interface");
    let kinds: Vec<_> = ["s", "n", "b", "big", "nu", "u", "v"]
        .iter()
        .map(|name| field(&node, name).kind_name())
        .collect();
    assert_eq!(
        kinds,
        vec!["string", "number", "boolean", "bigint", "null", "undefined", "void"]
    );
}

#[test]
fn test_literal_fields() {
    let node = walk_named(r#"interface L { mode: "on"; one: 1; yes: true; neg: -2 }"#, "L");
    assert_eq!(field(&node, "mode"), &TypeNode::literal(LiteralValue::String("on".to_string())));
    assert_eq!(field(&node, "one"), &TypeNode::literal(LiteralValue::Number(1.0)));
    assert_eq!(field(&node, "yes"), &TypeNode::literal(LiteralValue::Boolean(true)));
    assert_eq!(field(&node, "neg"), &TypeNode::literal(LiteralValue::Number(-2.0)));
}

#[test]
fn test_unclassifiable_types_map_to_others() {
    let node = walk_named(
        "interface O { a: any; u: unknown; o: Object; f: () => void; c: string extends number ? 1 : 2; d: Date }",
        "O",
    );
    assert_eq!(others_name(field(&node, "a")), Some("any"));
    assert_eq!(others_name(field(&node, "u")), Some("unknown"));
    assert_eq!(others_name(field(&node, "o")), Some("Object"));
    assert_eq!(others_name(field(&node, "f")), Some("function"));
    assert_eq!(others_name(field(&node, "c")), Some("conditional type"));
    assert_eq!(others_name(field(&node, "d")), Some("Date"));
}

#[test]
fn test_template_literal_is_string() {
    let node = walk_named("interface T { id: `user-${string}` }", "T");
    assert_eq!(field(&node, "id").kind_name(), "string");
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_array_forms() {
    let node = walk_named(
        "interface A { a: string[]; g: Array<number>; ro: readonly boolean[]; ra: ReadonlyArray<string> }",
        "A",
    );
    for name in ["a", "g", "ro", "ra"] {
        assert_eq!(field(&node, name).kind_name(), "array", "field {name}");
    }
    let Kind::Array { element } = &field(&node, "g").kind else { panic!() };
    assert_eq!(element.kind, Kind::Number);
}

#[test]
fn test_tuple_elements() {
    let node = walk_named("interface T { pair: [string, number?] }", "T");
    let Kind::Tuple { elements } = &field(&node, "pair").kind else {
        panic!("expected tuple");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind, Kind::String);
    assert!(!elements[0].optional);
    assert!(elements[1].optional);
}

#[test]
fn test_map_forms() {
    let node = walk_named(
        "interface M { m: Map<string, number>; r: Record<string, boolean>; idx: { [key: string]: number } }",
        "M",
    );
    for name in ["m", "r", "idx"] {
        let Kind::Map { key, .. } = &field(&node, name).kind else {
            panic!("field {name} is not a map");
        };
        assert_eq!(key.kind, Kind::String);
    }
    let Kind::Map { value, .. } = &field(&node, "r").kind else { panic!() };
    assert_eq!(value.kind, Kind::Boolean);
}

#[test]
fn test_index_only_interface_is_map() {
    let node = walk_named("interface Dict { [key: string]: number }", "Dict");
    assert_eq!(node.kind_name(), "map");
}

#[test]
fn test_typed_arrays() {
    let node = walk_named("interface B { bytes: Uint8Array; wide: BigInt64Array; f: Float64Array }", "B");
    let element = |name: &str| match &field(&node, name).kind {
        Kind::Array { element } => element.kind.clone(),
        other => panic!("{name} is {other:?}"),
    };
    assert_eq!(element("bytes"), Kind::Number);
    assert_eq!(element("wide"), Kind::BigInt);
    assert_eq!(element("f"), Kind::Number);
}

// ============================================================================
// Unions
// ============================================================================

#[test]
fn test_union_preserves_order_and_duplicates() {
    let node = walk_named(r#"type U = "b" | "a" | "b" | null"#, "U");
    let Kind::Union(union) = &node.kind else { panic!("expected union") };
    assert_eq!(union.name.as_deref(), Some("U"));
    let literal = |s: &str| TypeNode::literal(LiteralValue::String(s.to_string()));
    assert_eq!(
        union.union_types,
        vec![literal("b"), literal("a"), literal("b"), TypeNode::new(Kind::Null)]
    );
}

#[test]
fn test_enum_is_named_literal_union() {
    let node = walk_named(r#"enum Color { Red, Green = "g" }"#, "Color");
    let Kind::Union(union) = &node.kind else { panic!("expected union") };
    assert_eq!(union.name.as_deref(), Some("Color"));
    assert_eq!(union.union_types[0], TypeNode::literal(LiteralValue::Number(0.0)));
    assert_eq!(union.union_types[1], TypeNode::literal(LiteralValue::String("g".to_string())));
}

#[test]
fn test_walk_is_idempotent() {
    let source = "interface Node { value: string | number; children: Node[]; meta?: { tags: string[] } }";
    let program = bind(source);
    let options = SchemaOptions::default();
    let secrets = SecretPolicy::from_options(&options).unwrap();
    let id = program.resolve_name("Node").unwrap();

    let mut walker = TypeWalker::new(&program, &options, &secrets);
    let first = walker.walk_declaration(id, Vec::new()).unwrap();
    let second = walker.walk_declaration(id, Vec::new()).unwrap();
    assert_eq!(first, second);
    assert!(!walker.is_visiting(id));
}

// ============================================================================
// Declarations and cycles
// ============================================================================

#[test]
fn test_declaration_kinds() {
    let source = "interface I { a: string } class C { a: string = ''; } type O = { a: string }";
    assert_eq!(walk_named(source, "I").kind_name(), "interface");
    assert_eq!(walk_named(source, "C").kind_name(), "class");
    let object = walk_named(source, "O");
    assert_eq!(object.kind_name(), "object");
    assert_eq!(object.object_schema().unwrap().name.as_deref(), Some("O"));
}

#[test]
fn test_self_recursive_alias_terminates() {
    let node = walk_named("type Recursive = { more?: Recursive }", "Recursive");
    assert_eq!(node.kind_name(), "object");
    let more = field(&node, "more");
    assert!(more.optional);
    let schema = more.object_schema().unwrap();
    assert!(schema.recursive_ref);
    assert_eq!(schema.name.as_deref(), Some("Recursive"));
    assert!(schema.fields.is_empty());
}

#[test]
fn test_mutual_recursion_terminates() {
    let source = "interface A { b: B } interface B { a: A; label: string }";
    let node = walk_named(source, "A");
    let b = field(&node, "b");
    assert_eq!(b.kind_name(), "interface");
    assert_eq!(field_names(b), vec!["a", "label"]);
    assert!(field(b, "a").object_schema().unwrap().recursive_ref);
}

#[test]
fn test_recursion_through_containers() {
    let node = walk_named(
        "interface Tree { children: Tree[]; index: Map<string, Tree>; next: Tree | null }",
        "Tree",
    );
    let Kind::Array { element } = &field(&node, "children").kind else { panic!() };
    assert!(element.object_schema().unwrap().recursive_ref);
    let Kind::Map { value, .. } = &field(&node, "index").kind else { panic!() };
    assert!(value.object_schema().unwrap().recursive_ref);
    let union = field(&node, "next").union_types().unwrap();
    assert!(union[0].object_schema().unwrap().recursive_ref);
}

#[test]
fn test_interface_inheritance_order() {
    let source = "interface Base { id: string; kind: string } interface Derived extends Base { kind: number; extra: boolean }";
    let node = walk_named(source, "Derived");
    assert_eq!(field_names(&node), vec!["id", "kind", "extra"]);
    assert_eq!(field(&node, "kind").kind, Kind::Number);
}

#[test]
fn test_unresolved_base_class_is_skipped() {
    let node = walk_named("class Weather extends BaseAgent { city: string = ''; }", "Weather");
    assert_eq!(field_names(&node), vec!["city"]);
}

#[test]
fn test_class_excludes_private_and_static_members() {
    let source = r#"
        class Agent {
            private secret: string;
            protected internal: number;
            static count: number;
            #hidden = 1;
            name: string;
            greet(): string { return "hi"; }
        }
    "#;
    let node = walk_named(source, "Agent");
    assert_eq!(field_names(&node), vec!["name", "greet"]);
    assert_eq!(others_name(field(&node, "greet")), Some("method"));
}

#[test]
fn test_unresolvable_reference() {
    let err = walk_with("interface X { m: Missing }", "X", &SchemaOptions::default()).unwrap_err();
    assert_eq!(err, SchemaError::UnresolvableType { name: "Missing".to_string() });
}

#[test]
fn test_depth_overflow() {
    let options = SchemaOptions {
        max_walk_depth: 4,
        ..SchemaOptions::default()
    };
    let err = walk_with("type Deep = string[][][][][][]", "Deep", &options).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::CyclicResolutionOverflow { ref name, limit: 4 } if name == "Deep"
    ));
}

// ============================================================================
// Generics
// ============================================================================

#[test]
fn test_generic_instantiation() {
    let source = "interface Box<T> { value: T; list: T[] } interface Holder { b: Box<string> }";
    let node = walk_named(source, "Holder");
    let b = field(&node, "b");
    let schema = b.object_schema().unwrap();
    assert_eq!(schema.name.as_deref(), Some("Box"));
    assert_eq!(schema.type_params, vec![TypeNode::new(Kind::String)]);
    assert_eq!(field(b, "value").kind, Kind::String);
    let Kind::Array { element } = &field(b, "list").kind else { panic!() };
    assert_eq!(element.kind, Kind::String);
}

#[test]
fn test_unbound_type_parameter_is_others() {
    let node = walk_named("interface Box<T> { value: T }", "Box");
    assert_eq!(others_name(field(&node, "value")), Some("T"));
}

#[test]
fn test_type_parameter_default() {
    let source = "interface Page<T = number> { items: T[] } type Numbers = Page";
    let node = walk_named(source, "Numbers");
    let Kind::Array { element } = &field(&node, "items").kind else { panic!() };
    assert_eq!(element.kind, Kind::Number);
}

#[test]
fn test_recursive_generic_keeps_arguments() {
    let source = "type List<T> = { head: T; tail?: List<T> } type Numbers = List<number>";
    let node = walk_named(source, "Numbers");
    let schema = node.object_schema().unwrap();
    assert_eq!(schema.name.as_deref(), Some("List"));
    assert_eq!(field(&node, "head").kind, Kind::Number);
    let tail = field(&node, "tail").object_schema().unwrap();
    assert!(tail.recursive_ref);
    assert_eq!(tail.type_params, vec![TypeNode::new(Kind::Number)]);
}

#[test]
fn test_optional_field_spellings() {
    let node = walk_named("interface O { a?: number; b: number | undefined; c: number }", "O");
    assert!(field(&node, "a").optional);
    assert_eq!(field(&node, "a").kind, Kind::Number);
    assert!(field(&node, "b").includes_undefined());
    assert!(!field(&node, "c").optional);
}

// ============================================================================
// Utility types and operators
// ============================================================================

#[test]
fn test_partial_and_required() {
    let source = "interface User { name: string; age?: number } type P = Partial<User>; type R = Required<User>";
    let partial = walk_named(source, "P");
    assert_eq!(partial.kind_name(), "object");
    assert!(field(&partial, "name").optional);
    let required = walk_named(source, "R");
    assert!(!field(&required, "age").optional);
}

#[test]
fn test_pick_and_omit() {
    let source = r#"
        interface User { id: string; name: string; email: string }
        type Contact = Pick<User, "name" | "email">;
        type Anonymous = Omit<User, "name">;
    "#;
    assert_eq!(field_names(&walk_named(source, "Contact")), vec!["name", "email"]);
    assert_eq!(field_names(&walk_named(source, "Anonymous")), vec!["id", "email"]);
}

#[test]
fn test_non_nullable() {
    let node = walk_named("type N = NonNullable<string | null | undefined>", "N");
    assert_eq!(node.kind, Kind::String);
}

#[test]
fn test_intersection_of_objects_merges() {
    let source = "interface A { a: string } type AB = A & { b: number }";
    let node = walk_named(source, "AB");
    assert_eq!(node.kind_name(), "object");
    assert_eq!(field_names(&node), vec!["a", "b"]);

    let mixed = walk_named("type S = string & { brand: true }", "S");
    assert_eq!(others_name(&mixed), Some("intersection"));
}

#[test]
fn test_keyof_object() {
    let source = "interface Point { x: number; y: number } type Axis = keyof Point";
    let node = walk_named(source, "Axis");
    let types = node.union_types().unwrap();
    assert_eq!(types[0], TypeNode::literal(LiteralValue::String("x".to_string())));
    assert_eq!(types[1], TypeNode::literal(LiteralValue::String("y".to_string())));
}

// ============================================================================
// Markers
// ============================================================================

#[test]
fn test_secret_marker_is_transparent() {
    let node = walk_named("interface S { token: Secret<string>; user: string }", "S");
    assert_eq!(field(&node, "token").kind, Kind::String);
    assert_eq!(node.object_schema().unwrap().secret_fields, vec!["token".to_string()]);
}

#[test]
fn test_config_marker_field() {
    let node = walk_named(
        "interface Settings { apiKey: string; retries: number } interface Holder { cfg: Config<Settings> }",
        "Holder",
    );
    let Kind::Config { properties } = &field(&node, "cfg").kind else {
        panic!("expected config node");
    };
    let paths: Vec<_> = properties.iter().map(|p| p.path.join(".")).collect();
    assert_eq!(paths, vec!["apiKey", "retries"]);
}

#[test]
fn test_serialized_shape() {
    let node = walk_named("interface Point { x: number; label?: string }", "Point");
    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(value["kind"], "interface");
    assert_eq!(value["name"], "Point");
    assert_eq!(value["fields"]["x"]["kind"], "number");
    assert_eq!(value["fields"]["label"]["optional"], true);
    assert_eq!(value["optional"], false);
}

#[test]
fn test_integer_literals_serialize_as_integers() {
    let node = walk_named(r#"interface L { one: 1; neg: -1; big: 1000; half: 1.5; mode: "on" }"#, "L");
    let value = serde_json::to_value(&node).unwrap();
    let literal = |name: &str| value["fields"][name]["literalValue"].clone();

    assert_eq!(literal("one"), serde_json::json!(1));
    assert!(literal("one").is_u64());
    assert_eq!(literal("neg").as_i64(), Some(-1));
    assert_eq!(literal("big").as_u64(), Some(1000));
    assert!(literal("half").is_f64());
    assert_eq!(literal("half").as_f64(), Some(1.5));
    assert_eq!(literal("mode"), "on");
    assert_eq!(serde_json::to_string(&literal("big")).unwrap(), "1000");
}
