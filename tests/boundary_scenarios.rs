//! The eight numbered boundary scenarios from the specification's
//! "Testable properties" section, each as its own test.

use bumpalo::Bump;
use ergo_lang::ast::{DeclKind, ExprKind, Pattern, ReturnSpec, StmtKind};
use ergo_lang::diagnostic::Diagnostic;
use ergo_lang::lexer::token::{StrPart, TokenKind};
use ergo_lang::{lexer, parser};

#[test]
fn scenario_1_asi_after_rbrace_inserts_single_semicolon() {
    let arena = Bump::new();
    let source = arena.alloc_str("fun f() ((--)) { let x = 1 }\nfun g() ((--)) {}");
    let mut diag = Diagnostic::new("t.ergo");
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");

    let fun_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TokenKind::KwFun)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fun_positions.len(), 2);
    let between = &tokens[fun_positions[0] + 1..fun_positions[1]];
    assert_eq!(between.iter().filter(|t| t.kind == TokenKind::Semi).count(), 1);

    let path = arena.alloc_str("t.ergo");
    let mut diag = Diagnostic::new(path);
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
    assert_eq!(module.decls.len(), 2);
    assert!(matches!(module.decls[0].kind, DeclKind::Function(_)));
    assert!(matches!(module.decls[1].kind, DeclKind::Function(_)));
}

#[test]
fn scenario_2_return_mode_void_produces_bare_return() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("fun k() ((--)) { return }");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Function(fd) = module.decls[0].kind else { panic!("expected a function decl") };
    assert!(matches!(fd.ret, ReturnSpec::Void));
    assert_eq!(fd.body.len(), 1);
    assert!(matches!(fd.body[0].kind, StmtKind::Return(None)));
}

#[test]
fn scenario_3_placeholder_with_format_tail_keeps_only_the_member_expr() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str(r#"const s = "hi <user.name:>""#);
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
    let ExprKind::Str(parts) = cd.value.kind else { panic!("expected a string literal") };
    assert_eq!(parts.0.len(), 2);
    assert!(matches!(parts.0[0], StrPart::Text("hi ")));
    let StrPart::Expr(placeholder) = parts.0[1] else { panic!("placeholder should be promoted to EXPR") };
    let ExprKind::Member { base, name } = placeholder.kind else { panic!("expected a member access") };
    assert_eq!(name, "name");
    assert!(matches!(base.kind, ExprKind::Ident("user")));
    assert!(parts.is_closed());
}

#[test]
fn scenario_4_operator_inside_placeholder_is_rejected() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str(r#"const s = "<a+b>""#);
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let result = parser::parse_module(&tokens, path, &arena, &mut diag);
    assert!(result.is_none());
    let msg = diag.message.expect("a diagnostic should be recorded");
    assert_eq!(msg.text, "invalid interpolation '<a+b>': operators not allowed in placeholder");
}

#[test]
fn scenario_5_named_arguments_rewrite_call_to_new() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("const p = Point(x: 1, y: 2)");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
    let ExprKind::New { path: ctor_path, args } = cd.value.kind else { panic!("expected a NEW node, not CALL") };
    assert_eq!(ctor_path, &["Point"]);
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].name, Some("x"));
    assert_eq!(args[1].name, Some("y"));
    assert!(matches!(args[0].value.kind, ExprKind::Int(1)));
    assert!(matches!(args[1].value.kind, ExprKind::Int(2)));
}

#[test]
fn scenario_6_arrow_lambda_vs_tuple_vs_paren_disambiguation() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");

    {
        let source = arena.alloc_str("const l = (a = Int, b = Int) => a + b");
        let mut diag = Diagnostic::new(path);
        let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
        let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
        let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
        let ExprKind::Lambda(lambda) = cd.value.kind else { panic!("expected a lambda") };
        assert_eq!(lambda.params.len(), 2);
        assert_eq!(lambda.params[0].name, "a");
        assert_eq!(lambda.params[1].name, "b");
    }
    {
        let source = arena.alloc_str("const t = (1, 2)");
        let mut diag = Diagnostic::new(path);
        let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
        let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
        let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
        let ExprKind::Tuple(items) = cd.value.kind else { panic!("expected a tuple") };
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0].kind, ExprKind::Int(1)));
        assert!(matches!(items[1].kind, ExprKind::Int(2)));
    }
    {
        let source = arena.alloc_str("const p = (a + b)");
        let mut diag = Diagnostic::new(path);
        let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
        let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
        let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
        let ExprKind::Paren(inner) = cd.value.kind else { panic!("expected a parenthesized expr") };
        assert!(matches!(inner.kind, ExprKind::Binary { .. }));
    }
}

#[test]
fn scenario_7_inline_match_form() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str(r#"const m = match x : 0 => "z", _ => "o""#);
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected a const decl") };
    let ExprKind::Match { arms, .. } = cd.value.kind else { panic!("expected a match expression") };
    assert_eq!(arms.len(), 2);
    assert!(matches!(arms[0].pattern, Pattern::Int(0)));
    assert!(matches!(arms[1].pattern, Pattern::Wildcard));
}

#[test]
fn scenario_8_seal_on_struct_is_rejected() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("seal struct S = []");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let result = parser::parse_module(&tokens, path, &arena, &mut diag);
    assert!(result.is_none());
    let msg = diag.message.expect("a diagnostic should be recorded");
    assert_eq!(msg.text, "seal is only valid on class declarations");
}
