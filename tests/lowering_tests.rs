// tests/lowering_tests.rs

use std::time::{Duration, Instant};

use decaf::{
    ast::{
        dump::{to_json, DumpOptions},
        walk, Block, Expression, NodeKind, Program, Statement,
    },
    compile, CompileError, CompileOptions,
};

fn lower(source: &str) -> Program {
    compile(source, &CompileOptions::default().with_source_name("test.decaf")).unwrap()
}

fn lower_err(source: &str) -> CompileError {
    compile(source, &CompileOptions::default()).unwrap_err()
}

/// Wraps statements in a single method and returns its body.
fn method_body(statements: &str) -> Block {
    let source = format!("class Main {{ void f() {{ {} }} }}", statements);
    let mut program = lower(&source);
    program.classes.remove(0).method_declarations.remove(0).body
}

/// The right-hand side of the first assignment in `statements`.
fn assigned(statements: &str) -> Expression {
    match method_body(statements).statements.remove(0) {
        Statement::Assignment { expression, .. } => expression,
        other => panic!("expected an assignment, got {:?}", other),
    }
}

const EVERYTHING: &str = r#"// entry point
class Main extends Base {
  int count, items[];

  boolean run(int n, Foo f) {
    int i;
    i = 0;
    while (i < n) {
      items[i] = !(i == 2) && true;
      i = i + 1;
    }
    if (f == null) {
      callout("print", i, 'x');
    } else {
      f.touch(i);
    }
    return this;
  }
}
"#;

// ---
// Totality and ordering
// ---

#[test]
fn test_every_node_kind_is_produced() {
    let program = lower(EVERYTHING);
    let counts = walk::kind_counts(&program);
    assert_eq!(counts.len(), 23, "missing kinds in {:?}", counts);
    assert_eq!(counts[&NodeKind::Program], 1);
    assert_eq!(counts[&NodeKind::MethodDecl], 1);
    assert_eq!(counts[&NodeKind::Parameter], 2);
    assert_eq!(counts[&NodeKind::VarBind], 3);
    assert_eq!(counts[&NodeKind::Block], 4);
    assert_eq!(counts[&NodeKind::PrimitiveCall], 1);
    assert_eq!(counts[&NodeKind::Call], 1);
}

#[test]
fn test_class_members_keep_source_order() {
    let program = lower("class Main { int x; int y; void a() {} void b() {} }");
    let class = &program.classes[0];
    assert_eq!(class.name, "Main");
    assert_eq!(class.super_class_name, None);
    let fields: Vec<&str> = class
        .variable_declarations
        .iter()
        .map(|d| d.var_binds[0].name.as_str())
        .collect();
    assert_eq!(fields, vec!["x", "y"]);
    let methods: Vec<&str> = class
        .method_declarations
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(methods, vec!["a", "b"]);
}

#[test]
fn test_classes_keep_source_order() {
    let program = lower("class A {} class B extends A {} class C {}");
    let names: Vec<&str> = program.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(program.classes[1].super_class_name.as_deref(), Some("A"));
}

#[test]
fn test_multi_bind_expansion() {
    let program = lower("class Main { int x, y, z[]; }");
    let decls = &program.classes[0].variable_declarations;
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].var_type.name, "int");
    let binds: Vec<(&str, bool)> = decls[0]
        .var_binds
        .iter()
        .map(|b| (b.name.as_str(), b.is_array))
        .collect();
    assert_eq!(binds, vec![("x", false), ("y", false), ("z", true)]);
}

#[test]
fn test_method_signature() {
    let program = lower("class Main { Foo make(int a, boolean flags[]) { return a; } void run() {} }");
    let make = &program.classes[0].method_declarations[0];
    assert_eq!(make.return_type.name, "Foo");
    assert!(!make.return_type.is_void());
    let params: Vec<(&str, &str, bool)> = make
        .parameters
        .iter()
        .map(|p| (p.param_type.name.as_str(), p.name.as_str(), p.is_array))
        .collect();
    assert_eq!(params, vec![("int", "a", false), ("boolean", "flags", true)]);

    let run = &program.classes[0].method_declarations[1];
    assert!(run.return_type.is_void());
    assert!(run.parameters.is_empty());
    assert!(run.body.statements.is_empty());
}

#[test]
fn test_block_declarations_precede_statements() {
    let body = method_body("int a; boolean b; a = 1; b = true;");
    assert_eq!(body.variable_declarations.len(), 2);
    assert_eq!(body.statements.len(), 2);
}

// ---
// Positions
// ---

#[test]
fn test_positions_follow_first_tokens() {
    let source = "// header\nclass Main {\n  int x;\n  void run(int a) {\n    x = a + 1;\n  }\n}\n";
    let program = lower(source);
    let at = |p: &decaf::ast::Position| (p.line, p.column);

    assert_eq!(at(&program.position), (2, 0));
    assert_eq!(program.position.offset, 10);
    assert_eq!(program.position.source_name.as_deref(), Some("test.decaf"));

    let class = &program.classes[0];
    assert_eq!(at(&class.position), (2, 0));
    assert_eq!(at(&class.variable_declarations[0].position), (3, 2));
    assert_eq!(at(&class.variable_declarations[0].var_binds[0].position), (3, 6));

    let method = &class.method_declarations[0];
    assert_eq!(at(&method.position), (4, 2));
    assert_eq!(at(&method.return_type.position), (4, 2));
    assert_eq!(at(&method.parameters[0].position), (4, 11));
    assert_eq!(at(&method.body.position), (4, 18));

    match &method.body.statements[0] {
        Statement::Assignment {
            position,
            location,
            expression,
        } => {
            assert_eq!(at(position), (5, 4));
            assert_eq!(at(&location.position), (5, 4));
            assert_eq!(at(expression_position(expression)), (5, 8));
            if let Expression::BinaryOp { lhs, rhs, .. } = expression {
                assert_eq!(at(expression_position(lhs)), (5, 8));
                assert_eq!(at(expression_position(rhs)), (5, 12));
            } else {
                panic!("expected a binary expression");
            }
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
}

fn expression_position(expr: &Expression) -> &decaf::ast::Position {
    use decaf::ast::Node;
    expr.position()
}

// ---
// Expressions
// ---

#[test]
fn test_multiplication_binds_tighter() {
    let expr = assigned("x = 1 + 1 * 2;");
    assert_eq!(expr.pretty(), "(+ 1 (* 1 2))");
}

#[test]
fn test_parentheses_leave_no_wrapper() {
    let expr = assigned("x = 1 - (1 + 2);");
    assert_eq!(expr.pretty(), "(- 1 (+ 1 2))");
    match expr {
        Expression::BinaryOp { rhs, .. } => {
            assert!(matches!(*rhs, Expression::BinaryOp { ref operator, .. } if operator == "+"))
        }
        other => panic!("expected a binary expression, got {:?}", other),
    }
}

#[test]
fn test_same_level_operators_fold_left() {
    assert_eq!(assigned("x = 1 - 2 - 3;").pretty(), "(- (- 1 2) 3)");
    assert_eq!(assigned("x = 8 / 4 * 2;").pretty(), "(* (/ 8 4) 2)");
}

#[test]
fn test_logical_and_comparison_levels() {
    assert_eq!(
        assigned("x = !a && b || c == d;").pretty(),
        "(|| (&& (! a) b) (== c d))"
    );
    assert_eq!(
        assigned("x = a < b == c >= d;").pretty(),
        "(== (< a b) (>= c d))"
    );
    assert_eq!(assigned("x = !!a;").pretty(), "(! (! a))");
}

#[test]
fn test_literals() {
    let body = method_body("a = 42; b = 'z'; c = '\\n'; d = true; e = false; f = null;");
    let values: Vec<Expression> = body
        .statements
        .into_iter()
        .map(|s| match s {
            Statement::Assignment { expression, .. } => expression,
            other => panic!("expected an assignment, got {:?}", other),
        })
        .collect();
    assert!(matches!(values[0], Expression::IntegerLiteral { value: 42, .. }));
    assert!(matches!(values[1], Expression::CharLiteral { value: 'z', .. }));
    // Escapes are not decoded.
    assert!(matches!(values[2], Expression::CharLiteral { value: '\\', .. }));
    assert!(matches!(values[3], Expression::BoolLiteral { value: true, .. }));
    assert!(matches!(values[4], Expression::BoolLiteral { value: false, .. }));
    assert!(matches!(values[5], Expression::NullLiteral { .. }));
    assert!(values.iter().all(Expression::is_literal));
}

#[test]
fn test_simple_expressions_keep_their_text() {
    let body = method_body("x = this; y = a.b; z = a[i + 1]; w = f(1, 2);");
    let texts: Vec<String> = body
        .statements
        .iter()
        .map(|s| match s {
            Statement::Assignment {
                expression: Expression::SimpleExpression { text, .. },
                ..
            } => text.clone(),
            other => panic!("expected a simple expression, got {:?}", other),
        })
        .collect();
    assert_eq!(texts, vec!["this", "a.b", "a[i + 1]", "f(1, 2)"]);
}

#[test]
fn test_simple_expression_text_stops_at_last_token() {
    for statements in ["x = a ;", "x = a // note\n ;", "x = a\n\n;", "x = a.b  ;", "x = f(1) ;"] {
        let text = match assigned(statements) {
            Expression::SimpleExpression { text, .. } => text,
            other => panic!("{:?}: expected a simple expression, got {:?}", statements, other),
        };
        assert!(!text.ends_with(char::is_whitespace), "{:?} kept trailing trivia: {:?}", statements, text);
        assert!(!text.contains("//"), "{:?} kept a comment: {:?}", statements, text);
    }

    let options = DumpOptions::without_positions();
    let tight = to_json(&lower("class Main { void f() { x = a; } }"), &options).unwrap();
    let loose = to_json(&lower("class Main { void f() { x = a // note\n ; } }"), &options).unwrap();
    assert_eq!(tight, loose);
}

// ---
// Statements
// ---

#[test]
fn test_locations() {
    let body = method_body("a = 1; a.b = 2; a[i] = 3;");
    let locations: Vec<String> = body
        .statements
        .iter()
        .map(|s| match s {
            Statement::Assignment { location, .. } => location.pretty(),
            other => panic!("expected an assignment, got {:?}", other),
        })
        .collect();
    assert_eq!(locations, vec!["a", "a.b", "a[i]"]);

    if let Statement::Assignment { location, .. } = &body.statements[0] {
        assert!(location.is_bare());
    }
    if let Statement::Assignment { location, .. } = &body.statements[1] {
        assert_eq!(location.path.as_deref(), Some("b"));
        assert!(location.index_expr.is_none());
    }
}

#[test]
fn test_call_statements() {
    let body = method_body("run(); obj.send(1, x); callout(\"printf\", 1, y + 2); callout(\"flush\");");
    let calls: Vec<String> = body
        .statements
        .iter()
        .map(|s| match s {
            Statement::ExpressionStatement { call, .. } => {
                assert!(call.is_call());
                call.pretty()
            }
            other => panic!("expected an expression statement, got {:?}", other),
        })
        .collect();
    assert_eq!(
        calls,
        vec![
            "(call run)",
            "(call obj.send 1 x)",
            "(call callout \"printf\" 1 (+ y 2))",
            "(call callout \"flush\")",
        ]
    );
    match &body.statements[3] {
        Statement::ExpressionStatement {
            call: Expression::PrimitiveCall {
                primitive_id,
                arguments,
                ..
            },
            ..
        } => {
            assert_eq!(primitive_id, "flush");
            assert!(arguments.is_empty());
        }
        other => panic!("expected a callout, got {:?}", other),
    }
}

#[test]
fn test_control_flow() {
    let body = method_body("if (x) { return; } else { return 1; } if (y) {} while (z) { z = false; }");
    match &body.statements[0] {
        Statement::If {
            condition,
            true_branch,
            false_branch,
            ..
        } => {
            assert_eq!(condition.pretty(), "x");
            assert!(matches!(
                true_branch.statements[0],
                Statement::Return { value: None, .. }
            ));
            let else_block = false_branch.as_ref().unwrap();
            assert!(matches!(
                else_block.statements[0],
                Statement::Return { value: Some(Expression::IntegerLiteral { value: 1, .. }), .. }
            ));
        }
        other => panic!("expected an if statement, got {:?}", other),
    }
    assert!(matches!(
        body.statements[1],
        Statement::If { false_branch: None, .. }
    ));
    match &body.statements[2] {
        Statement::While { condition, body, .. } => {
            assert_eq!(condition.pretty(), "z");
            assert_eq!(body.statements.len(), 1);
        }
        other => panic!("expected a while statement, got {:?}", other),
    }
}

// ---
// Failures
// ---

#[test]
fn test_empty_source_is_a_syntax_error() {
    assert!(matches!(lower_err(""), CompileError::Syntax(_)));
    assert!(matches!(lower_err("  \n // nothing\n"), CompileError::Syntax(_)));
}

#[test]
fn test_declaration_after_statement_is_a_syntax_error() {
    let err = lower_err("class Main { void f() { int x; x = 1; int y; } }");
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_new_object_is_unsupported() {
    let err = lower_err("class Main { void f() { x = new Foo(); } }");
    match &err {
        CompileError::Unsupported {
            construct,
            position,
            ..
        } => {
            assert_eq!(construct, "new object expression");
            assert_eq!((position.line, position.column), (1, 28));
        }
        other => panic!("expected an unsupported construct, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_other_unsupported_constructs() {
    let cases = [
        ("x = new int[5];", "new array expression"),
        ("x = a.b.c;", "multi-level field access"),
        ("a[1].b = 2;", "multi-level field access"),
        ("callout(\"printf\", \"%d\", x);", "string literal callout argument"),
    ];
    for (statements, expected) in cases {
        let source = format!("class Main {{ void f() {{ {} }} }}", statements);
        match lower_err(&source) {
            CompileError::Unsupported { construct, .. } => assert_eq!(construct, expected),
            other => panic!("{}: expected unsupported, got {:?}", statements, other),
        }
    }
}

#[test]
fn test_unsupported_location_label_covers_only_the_location() {
    match lower_err("class Main { void f() { x = a.b.c  // trailing\n ; } }") {
        CompileError::Unsupported { span, .. } => {
            assert_eq!(span.offset(), 28);
            assert_eq!(span.len(), "a.b.c".len());
        }
        other => panic!("expected unsupported, got {:?}", other),
    }
}

#[test]
fn test_integer_overflow_is_internal() {
    let err = lower_err("class Main { void f() { x = 2147483648; } }");
    assert!(err.is_internal());
    assert_eq!(err.exit_code(), 70);
    assert!(std::error::Error::source(&err).is_some());

    let max = lower("class Main { void f() { x = 2147483647; } }");
    let counts = walk::kind_counts(&max);
    assert_eq!(counts[&NodeKind::IntegerLiteral], 1);
}

// ---
// Scale
// ---

#[test]
fn test_large_inputs_compile_in_linear_time() {
    let statements = 20_000;
    let mut source = String::from("class Main {\n  void f() {\n");
    for _ in 0..statements {
        source.push_str("    x = x + 1;\n");
    }
    source.push_str("  }\n}\n");

    let started = Instant::now();
    let program = lower(&source);
    let elapsed = started.elapsed();

    let body = &program.classes[0].method_declarations[0].body;
    assert_eq!(body.statements.len(), statements);
    match &body.statements[statements - 1] {
        Statement::Assignment { position, .. } => {
            assert_eq!((position.line, position.column), (statements + 2, 4));
        }
        other => panic!("expected an assignment, got {:?}", other),
    }
    assert!(
        elapsed < Duration::from_secs(60),
        "{} statements took {:?}",
        statements,
        elapsed
    );
}
