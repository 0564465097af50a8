// tests/serialization_tests.rs

use decaf::{
    ast::{
        dump::{to_json, to_json_string, DumpOptions},
        walk, Program,
    },
    compile, CompileOptions,
};
use serde_json::{json, Value};

fn lower(source: &str) -> Program {
    compile(source, &CompileOptions::default().with_source_name("dump.decaf")).unwrap()
}

#[test]
fn test_nodes_carry_stable_type_tags() {
    let program = lower("class Main { int x; void f() { x = 1 + 2; g(); if (!x) {} while (x) {} return; } }");
    let value = to_json(&program, &DumpOptions::default()).unwrap();

    assert_eq!(value["type"], "Program");
    let class = &value["classes"][0];
    assert_eq!(class["type"], "ClassDeclaration");
    assert_eq!(class["superClassName"], Value::Null);
    assert_eq!(class["variableDeclarations"][0]["type"], "VariableDeclaration");
    assert_eq!(class["variableDeclarations"][0]["varType"]["type"], "Type");
    assert_eq!(class["variableDeclarations"][0]["varBinds"][0]["type"], "VarBind");

    let method = &class["methodDeclarations"][0];
    assert_eq!(method["type"], "MethodDeclaration");
    assert_eq!(method["body"]["type"], "Block");

    let statements = method["body"]["statements"].as_array().unwrap();
    let tags: Vec<&str> = statements.iter().map(|s| s["type"].as_str().unwrap()).collect();
    assert_eq!(
        tags,
        vec![
            "AssignmentStatement",
            "ExpressionStatement",
            "IfStatement",
            "WhileStatement",
            "ReturnStatement",
        ]
    );

    let assignment = &statements[0];
    assert_eq!(assignment["location"]["type"], "Location");
    assert_eq!(assignment["location"]["indexExpr"], Value::Null);
    assert_eq!(assignment["expression"]["type"], "BinopExpression");
    assert_eq!(assignment["expression"]["operator"], "+");
    assert_eq!(assignment["expression"]["lhs"]["type"], "IntegerLiteral");
    assert_eq!(assignment["expression"]["lhs"]["value"], 1);

    assert_eq!(statements[1]["call"]["type"], "CallExpression");
    assert_eq!(statements[2]["condition"]["type"], "PrefixExpression");
    assert_eq!(statements[2]["falseBranch"], Value::Null);
    assert_eq!(statements[4]["value"], Value::Null);
}

#[test]
fn test_positions_serialize_in_camel_case() {
    let program = lower("class Main {}");
    let value = to_json(&program, &DumpOptions::default()).unwrap();
    assert_eq!(
        value["position"],
        json!({ "sourceName": "dump.decaf", "line": 1, "column": 0, "offset": 0 })
    );
}

#[test]
fn test_literal_payloads() {
    let program = lower("class Main { void f() { a = 'q'; b = false; c = null; callout(\"exit\", 3); } }");
    let value = to_json(&program, &DumpOptions::without_positions()).unwrap();
    let statements = &value["classes"][0]["methodDeclarations"][0]["body"]["statements"];

    assert_eq!(statements[0]["expression"], json!({ "type": "CharLiteral", "value": "q" }));
    assert_eq!(statements[1]["expression"], json!({ "type": "BoolLiteral", "value": false }));
    assert_eq!(statements[2]["expression"], json!({ "type": "NullLiteral" }));
    assert_eq!(
        statements[3]["call"],
        json!({
            "type": "PrimitiveCallExpression",
            "primitiveId": "exit",
            "arguments": [{ "type": "IntegerLiteral", "value": 3 }]
        })
    );
}

#[test]
fn test_stripped_dumps_ignore_layout() {
    let compact = lower("class Main { int x; void f() { x = 1; } }");
    let spread = lower("// layout only\nclass Main {\n  int x;\n\n  void f() {\n    x = 1;\n  }\n}\n");
    assert_ne!(compact, spread);

    let options = DumpOptions::without_positions();
    assert_eq!(
        to_json(&compact, &options).unwrap(),
        to_json(&spread, &options).unwrap()
    );
    let text = to_json_string(&compact, &options, true).unwrap();
    assert!(!text.contains("position"));
    assert!(!text.contains('\n'));
    assert!(text.contains("\"type\":\"Program\""));
}

#[test]
fn test_round_trip_preserves_every_node() {
    let source = r#"class Main extends Base {
  int n, buf[];
  boolean go(int a, Foo f) {
    int i;
    i = a * (2 + n);
    buf[i] = 'c';
    while (i >= 0 && !f.done()) { i = i - 1; }
    if (i != 0) { callout("log", i); } else { f.reset(); }
    return null;
  }
}"#;
    let program = lower(source);
    let value = serde_json::to_value(&program).unwrap();
    let restored: Program = serde_json::from_value(value).unwrap();

    assert_eq!(restored, program);
    assert_eq!(walk::kind_counts(&restored), walk::kind_counts(&program));
}
