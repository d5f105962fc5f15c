//! Pratt precedence, unary/postfix chains, and statement forms (spec §4.4.6,
//! §4.4.7, §4.4.8).

use bumpalo::Bump;
use ergo_lang::ast::{BinaryOp, ExprKind, StmtKind, UnaryOp};
use ergo_lang::diagnostic::Diagnostic;
use ergo_lang::{lexer, parser};

fn const_value<'a>(source: &str, arena: &'a Bump) -> &'a ergo_lang::ast::Expr<'a> {
    let path = arena.alloc_str("t.ergo");
    let src = arena.alloc_str(&format!("const v = {source}"));
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(src, arena, &mut diag).expect("lex should succeed");
    let tokens = arena.alloc_slice_fill_iter(tokens);
    let module = parser::parse_module(tokens, path, arena, &mut diag).expect("parse should succeed");
    let ergo_lang::ast::DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected const") };
    cd.value
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let arena = Bump::new();
    let expr = const_value("1 + 2 * 3", &arena);
    let ExprKind::Binary { op: BinaryOp::Add, lhs, rhs } = expr.kind else { panic!("expected a top-level addition") };
    assert!(matches!(lhs.kind, ExprKind::Int(1)));
    assert!(matches!(rhs.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
}

#[test]
fn comparison_binds_looser_than_arithmetic_but_tighter_than_and() {
    let arena = Bump::new();
    let expr = const_value("a + 1 < b && c", &arena);
    let ExprKind::Binary { op: BinaryOp::And, lhs, .. } = expr.kind else { panic!("expected a top-level &&") };
    assert!(matches!(lhs.kind, ExprKind::Binary { op: BinaryOp::Lt, .. }));
}

#[test]
fn assignment_is_right_associative() {
    let arena = Bump::new();
    let expr = const_value("a = b = c", &arena);
    let ExprKind::Assign { target, value, .. } = expr.kind else { panic!("expected an assignment") };
    assert!(matches!(target.kind, ExprKind::Ident("a")));
    assert!(matches!(value.kind, ExprKind::Assign { .. }));
}

#[test]
fn unary_operators_chain_and_nest() {
    let arena = Bump::new();
    let expr = const_value("!#-x", &arena);
    let ExprKind::Unary { op: UnaryOp::Not, expr: inner } = expr.kind else { panic!("expected a leading !") };
    let ExprKind::Unary { op: UnaryOp::Hash, expr: inner } = inner.kind else { panic!("expected a nested #") };
    assert!(matches!(inner.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
}

#[test]
fn postfix_call_index_and_member_chain() {
    let arena = Bump::new();
    let expr = const_value("a.b[0](1)", &arena);
    let ExprKind::Call { callee, args } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 1);
    let ExprKind::Index { base, .. } = callee.kind else { panic!("expected an index before the call") };
    assert!(matches!(base.kind, ExprKind::Member { name: "b", .. }));
}

#[test]
fn bang_sugar_rewrites_to_a_member_call() {
    let arena = Bump::new();
    let expr = const_value("list!push 1, 2", &arena);
    let ExprKind::Call { callee, args } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 2);
    assert!(matches!(callee.kind, ExprKind::Member { name: "push", .. }));
}

#[test]
fn for_loop_and_foreach_statements() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str(
        "fun f() ((--)) { for (let i = 0; i < 10; i = i + 1) { } for (item in items) { } }",
    );
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
    let ergo_lang::ast::DeclKind::Function(fd) = module.decls[0].kind else { panic!("expected function") };
    assert!(matches!(fd.body[0].kind, StmtKind::For(_)));
    assert!(matches!(fd.body[1].kind, StmtKind::Foreach(_)));
}

#[test]
fn single_statement_if_elif_else_form() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("fun f() ((--)) { if x: return elif y: break else: continue }");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
    let ergo_lang::ast::DeclKind::Function(fd) = module.decls[0].kind else { panic!("expected function") };
    let StmtKind::If(if_stmt) = fd.body[0].kind else { panic!("expected an if statement") };
    assert_eq!(if_stmt.arms.len(), 2);
    assert!(if_stmt.else_branch.is_some());
    assert!(matches!(if_stmt.arms[0].body[0].kind, StmtKind::Return(None)));
}

#[test]
fn assignment_is_accepted_in_value_positions() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("fun f() ((--)) { let x = a = b }");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
    let ergo_lang::ast::DeclKind::Function(fd) = module.decls[0].kind else { panic!("expected function") };
    let StmtKind::Let { value, .. } = fd.body[0].kind else { panic!("expected a let statement") };
    assert!(matches!(value.kind, ExprKind::Assign { .. }));
}

#[test]
fn assignment_is_accepted_as_a_call_argument() {
    let arena = Bump::new();
    let expr = const_value("foo(x = 1)", &arena);
    let ExprKind::Call { args, .. } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].value.kind, ExprKind::Assign { .. }));
}

#[test]
fn assignment_is_accepted_as_an_array_element() {
    let arena = Bump::new();
    let expr = const_value("[a = b]", &arena);
    let ExprKind::Array(ergo_lang::ast::ArrayLit::Elems(elems)) = expr.kind else { panic!("expected an array literal") };
    assert_eq!(elems.len(), 1);
    assert!(matches!(elems[0].kind, ExprKind::Assign { .. }));
}

#[test]
fn bang_sugar_stops_at_the_first_space_separated_argument() {
    let arena = Bump::new();
    let expr = const_value("list!push a", &arena);
    let ExprKind::Call { args, .. } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].value.kind, ExprKind::Ident("a")));
}

#[test]
fn bang_sugar_collects_comma_separated_arguments_with_assignment() {
    let arena = Bump::new();
    let expr = const_value("obj!set x = 1, y = 2", &arena);
    let ExprKind::Call { args, .. } = expr.kind else { panic!("expected a call") };
    assert_eq!(args.len(), 2);
    assert!(matches!(args[0].value.kind, ExprKind::Assign { .. }));
    assert!(matches!(args[1].value.kind, ExprKind::Assign { .. }));
}
