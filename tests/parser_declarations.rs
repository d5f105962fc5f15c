//! Declaration-level grammar: functions, macros, entry, const/def, and
//! nominal types (spec §4.4.2).

use bumpalo::Bump;
use ergo_lang::ast::{DeclKind, Member, NominalKind, ReturnSpec, TypeRef, Visibility};
use ergo_lang::diagnostic::Diagnostic;
use ergo_lang::{lexer, parser};

#[test]
fn function_with_typed_params_and_return_types() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("pub fun add(a = Int, b = Int) ((Int)) { return a + b }");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Function(fd) = module.decls[0].kind else { panic!("expected a function decl") };
    assert!(fd.is_pub);
    assert_eq!(fd.name, "add");
    assert_eq!(fd.params.len(), 2);
    assert_eq!(fd.params[0].name, "a");
    assert!(matches!(fd.params[0].ty, Some(TypeRef::Name(_))));
    assert!(matches!(fd.ret, ReturnSpec::Types(_)));
}

#[test]
fn macro_params_reject_bare_this() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("macro m(this) ((--)) {}");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let result = parser::parse_module(&tokens, path, &arena, &mut diag);
    assert!(result.is_none());
    assert!(diag.has_error());
}

#[test]
fn entry_decl_has_no_parameters() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("entry() ((--)) {}");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");
    assert!(matches!(module.decls[0].kind, DeclKind::Entry(_)));
}

#[test]
fn const_and_def_decls() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("const answer = 42\ndef? counter = 0");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Const(cd) = module.decls[0].kind else { panic!("expected const") };
    assert_eq!(cd.name, "answer");
    let DeclKind::Def(dd) = module.decls[1].kind else { panic!("expected def") };
    assert_eq!(dd.name, "counter");
    assert!(dd.is_mut);
}

#[test]
fn class_with_base_fields_and_methods() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("pub class Animal : Base { name = String; pub fun speak() ((--)) {} }");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Nominal(nd) = module.decls[0].kind else { panic!("expected nominal decl") };
    assert_eq!(nd.kind, NominalKind::Class);
    assert_eq!(nd.visibility, Visibility::Pub);
    assert_eq!(nd.base, Some("Base"));
    assert_eq!(nd.members.len(), 2);
    assert!(matches!(nd.members[0], Member::Field { name: "name", .. }));
    assert!(matches!(nd.members[1], Member::Method(_)));
}

#[test]
fn struct_and_enum_use_bracket_body() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("struct Point = [x = Int, y = Int]");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let module = parser::parse_module(&tokens, path, &arena, &mut diag).expect("parse should succeed");

    let DeclKind::Nominal(nd) = module.decls[0].kind else { panic!("expected nominal decl") };
    assert_eq!(nd.kind, NominalKind::Struct);
    assert_eq!(nd.members.len(), 2);
}

#[test]
fn lock_visibility_without_nominal_keyword_is_rejected() {
    let arena = Bump::new();
    let path = arena.alloc_str("t.ergo");
    let source = arena.alloc_str("lock fun f() ((--)) {}");
    let mut diag = Diagnostic::new(path);
    let tokens = lexer::lex(source, &arena, &mut diag).expect("lex should succeed");
    let result = parser::parse_module(&tokens, path, &arena, &mut diag);
    assert!(result.is_none());
    let msg = diag.message.expect("a diagnostic should be recorded");
    assert_eq!(msg.text, "expected class/struct/enum");
}
