//! Recursive-descent / Pratt parser producing a typed AST in the arena
//! (spec §4.4). Grounded in `original_source/src/parser.c`'s declaration,
//! statement and nominal-type productions, with the speculative
//! lambda-vs-tuple disambiguation (§4.4.11) implemented via the teacher's
//! `ParseState` checkpoint/restore idiom (see `parse_state.rs`).

pub mod expr;
pub mod parse_state;
pub mod pattern;
pub mod placeholder;
pub mod typeref;

use bumpalo::Bump;

use crate::arena;
use crate::ast::*;
use crate::diagnostic::{Diagnostic, Position};
use crate::lexer::token::{Token, TokenKind};
use parse_state::ParseState;

pub(crate) struct Parser<'t, 'arena> {
    pub(crate) state: ParseState<'t, 'arena>,
    pub(crate) arena: &'arena Bump,
    pub(crate) path: &'arena str,
}

impl<'t, 'arena> Parser<'t, 'arena> {
    fn peek_tok(&self, ahead: usize) -> Token<'arena> {
        self.state.peek(ahead).unwrap_or(Token {
            kind: TokenKind::Eof,
            text: "",
            line: 0,
            col: 0,
            payload: crate::lexer::token::Payload::None,
        })
    }

    fn peek_kind(&self, ahead: usize) -> TokenKind {
        self.peek_tok(ahead).kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == kind
    }

    fn bump(&mut self) -> Token<'arena> {
        self.state.advance().unwrap_or(self.peek_tok(0))
    }

    fn expect(&mut self, diag: &mut Diagnostic<'arena>, kind: TokenKind) -> Option<Token<'arena>> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            let tok = self.peek_tok(0);
            diag.record(
                self.arena,
                tok.position(),
                format!("expected {kind:?}, got {:?}", tok.kind),
            );
            None
        }
    }

    fn error<T>(&mut self, diag: &mut Diagnostic<'arena>, pos: Position, msg: impl AsRef<str>) -> Option<T> {
        diag.record(self.arena, pos, msg);
        None
    }

    fn skip_semis(&mut self) {
        while self.at(TokenKind::Semi) {
            self.bump();
        }
    }

    fn alloc_expr(&self, line: usize, col: usize, kind: ExprKind<'arena>) -> &'arena Expr<'arena> {
        arena::alloc(self.arena, Expr { line, col, kind })
    }

    fn alloc_stmt(&self, line: usize, col: usize, kind: StmtKind<'arena>) -> Stmt<'arena> {
        Stmt { line, col, kind }
    }
}

/// `parse_module(tokens, path, arena, diag) -> Module?` (spec §6.4).
pub fn parse_module<'t, 'arena>(
    tokens: &'t [Token<'arena>],
    path: &'arena str,
    arena: &'arena Bump,
    diag: &mut Diagnostic<'arena>,
) -> Option<&'arena Module<'arena>> {
    let mut p = Parser { state: ParseState::new(tokens), arena, path };
    p.skip_semis();

    let mut declared_name = None;
    if p.at(TokenKind::KwCask) {
        p.bump();
        declared_name = Some(p.expect(diag, TokenKind::Ident)?.text);
        p.expect(diag, TokenKind::Semi)?;
    }

    let mut imports = Vec::new();
    loop {
        p.skip_semis();
        if !p.at(TokenKind::KwBring) {
            break;
        }
        p.bump();
        let mut segments = vec![p.expect(diag, TokenKind::Ident)?.text];
        while p.at(TokenKind::Dot) {
            p.bump();
            segments.push(p.expect(diag, TokenKind::Ident)?.text);
        }
        imports.push(Import { segments: crate::arena::alloc_slice(arena, segments) });
    }

    let mut decls = Vec::new();
    loop {
        p.skip_semis();
        if p.at(TokenKind::Eof) {
            break;
        }
        decls.push(p.parse_decl(diag)?);
    }

    Some(arena::alloc(
        arena,
        Module {
            path,
            declared_name,
            imports: crate::arena::alloc_slice(arena, imports),
            decls: crate::arena::alloc_slice(arena, decls),
        },
    ))
}

impl<'t, 'arena> Parser<'t, 'arena> {
    fn parse_decl(&mut self, diag: &mut Diagnostic<'arena>) -> Option<Decl<'arena>> {
        let tok = self.peek_tok(0);
        let (line, col) = (tok.line, tok.col);

        let mut visibility = Visibility::Priv;
        let mut consumed_vis = false;
        if self.at(TokenKind::KwPub) {
            self.bump();
            visibility = Visibility::Pub;
            consumed_vis = true;
        } else if self.at(TokenKind::KwLock) {
            self.bump();
            visibility = Visibility::Lock;
            consumed_vis = true;
        }

        let is_sealed = if self.at(TokenKind::KwSeal) {
            self.bump();
            true
        } else {
            false
        };

        if matches!(self.peek_kind(0), TokenKind::KwClass | TokenKind::KwStruct | TokenKind::KwEnum) {
            return self.parse_nominal(diag, line, col, visibility, is_sealed);
        }

        if is_sealed || (consumed_vis && visibility == Visibility::Lock) {
            return self.error(diag, self.peek_tok(0).position(), "expected class/struct/enum");
        }

        let is_pub = consumed_vis && visibility == Visibility::Pub;
        match self.peek_kind(0) {
            TokenKind::KwFun => self.parse_function_decl(diag, line, col, is_pub, false),
            TokenKind::KwMacro => self.parse_function_decl(diag, line, col, is_pub, true),
            TokenKind::KwEntry => self.parse_entry_decl(diag, line, col),
            TokenKind::KwConst => self.parse_const_decl(diag, line, col, is_pub),
            TokenKind::KwDef => self.parse_def_decl(diag, line, col, is_pub),
            other => self.error(diag, self.peek_tok(0).position(), format!("unexpected token {other:?}")),
        }
    }

    fn parse_nominal(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        line: usize,
        col: usize,
        visibility: Visibility,
        is_sealed: bool,
    ) -> Option<Decl<'arena>> {
        let kind = match self.bump().kind {
            TokenKind::KwClass => NominalKind::Class,
            TokenKind::KwStruct => NominalKind::Struct,
            TokenKind::KwEnum => NominalKind::Enum,
            _ => unreachable!("caller already checked class/struct/enum"),
        };

        if is_sealed && kind != NominalKind::Class {
            return self.error(diag, Position::new(line, col), "seal is only valid on class declarations");
        }

        let name = self.expect(diag, TokenKind::Ident)?.text;

        let mut base = None;
        if kind == NominalKind::Class && self.at(TokenKind::Colon) {
            self.bump();
            let base_tok = self.expect(diag, TokenKind::Ident)?;
            base = Some(base_tok.text);
        }

        let members = if kind == NominalKind::Class {
            self.expect(diag, TokenKind::LBrace)?;
            self.parse_members(diag, TokenKind::RBrace)?
        } else {
            self.expect(diag, TokenKind::Eq)?;
            self.expect(diag, TokenKind::LBracket)?;
            self.parse_members(diag, TokenKind::RBracket)?
        };

        Some(Decl {
            line,
            col,
            kind: DeclKind::Nominal(NominalDecl { kind, visibility, is_sealed, name, base, members }),
        })
    }

    fn parse_members(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        terminator: TokenKind,
    ) -> Option<&'arena [Member<'arena>]> {
        let mut members = Vec::new();
        loop {
            while self.at(TokenKind::Semi) || self.at(TokenKind::Comma) {
                self.bump();
            }
            if self.at(terminator) {
                break;
            }
            let (mline, mcol) = {
                let t = self.peek_tok(0);
                (t.line, t.col)
            };
            let is_pub = if self.at(TokenKind::KwPub) {
                self.bump();
                true
            } else {
                false
            };
            if self.at(TokenKind::KwFun) {
                let Decl { kind: DeclKind::Function(fd), .. } = self.parse_function_decl(diag, mline, mcol, is_pub, false)? else {
                    unreachable!()
                };
                members.push(Member::Method(fd));
            } else {
                let name = self.expect(diag, TokenKind::Ident)?.text;
                self.expect(diag, TokenKind::Eq)?;
                let ty = self.parse_type(diag)?;
                members.push(Member::Field { is_pub, name, ty });
            }
        }
        self.expect(diag, terminator)?;
        Some(crate::arena::alloc_slice(self.arena, members))
    }

    fn parse_function_decl(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        line: usize,
        col: usize,
        is_pub: bool,
        is_macro: bool,
    ) -> Option<Decl<'arena>> {
        self.bump(); // fun | macro
        let name = self.expect(diag, TokenKind::Ident)?.text;
        self.expect(diag, TokenKind::LParen)?;
        let params = self.parse_params(diag, TokenKind::RParen, is_macro)?;
        self.expect(diag, TokenKind::RParen)?;
        let ret = self.parse_return_spec(diag)?;
        let body = self.parse_block(diag)?;
        let fd = FunctionDecl { name, is_pub, params, ret, body };
        Some(Decl { line, col, kind: if is_macro { DeclKind::Macro(fd) } else { DeclKind::Function(fd) } })
    }

    fn parse_entry_decl(&mut self, diag: &mut Diagnostic<'arena>, line: usize, col: usize) -> Option<Decl<'arena>> {
        self.bump(); // entry
        self.expect(diag, TokenKind::LParen)?;
        self.expect(diag, TokenKind::RParen)?;
        let ret = self.parse_return_spec(diag)?;
        let body = self.parse_block(diag)?;
        Some(Decl { line, col, kind: DeclKind::Entry(EntryDecl { ret, body }) })
    }

    fn parse_const_decl(&mut self, diag: &mut Diagnostic<'arena>, line: usize, col: usize, is_pub: bool) -> Option<Decl<'arena>> {
        self.bump(); // const
        let name = self.expect(diag, TokenKind::Ident)?.text;
        self.expect(diag, TokenKind::Eq)?;
        let value = self.parse_expr(diag, 1)?;
        Some(Decl { line, col, kind: DeclKind::Const(ConstDecl { name, is_pub, value }) })
    }

    fn parse_def_decl(&mut self, diag: &mut Diagnostic<'arena>, line: usize, col: usize, is_pub: bool) -> Option<Decl<'arena>> {
        self.bump(); // def
        let is_mut = if self.at(TokenKind::QMark) {
            self.bump();
            true
        } else {
            false
        };
        let name = self.expect(diag, TokenKind::Ident)?.text;
        self.expect(diag, TokenKind::Eq)?;
        let value = self.parse_expr(diag, 1)?;
        Some(Decl { line, col, kind: DeclKind::Def(DefDecl { name, is_pub, is_mut, value }) })
    }

    pub(crate) fn parse_params(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        terminator: TokenKind,
        reject_this: bool,
    ) -> Option<&'arena [Param<'arena>]> {
        let mut params = Vec::new();
        if !self.at(terminator) {
            loop {
                let is_mut = if self.at(TokenKind::QMark) {
                    self.bump();
                    true
                } else {
                    false
                };
                let name_tok = self.expect(diag, TokenKind::Ident)?;
                let name = name_tok.text;

                if name == "this" && !self.at(TokenKind::Eq) {
                    if reject_this {
                        return self.error(diag, name_tok.position(), "macro params cannot use this/?this");
                    }
                    params.push(Param { name, ty: None, is_mut, is_this: true });
                } else {
                    self.expect(diag, TokenKind::Eq)?;
                    let ty = self.parse_type(diag)?;
                    params.push(Param { name, ty: Some(ty), is_mut, is_this: false });
                }

                if self.at(TokenKind::Comma) {
                    self.bump();
                    if self.at(terminator) {
                        break;
                    }
                    continue;
                }
                break;
            }
        }
        Some(crate::arena::alloc_slice(self.arena, params))
    }

    fn parse_return_spec(&mut self, diag: &mut Diagnostic<'arena>) -> Option<ReturnSpec<'arena>> {
        self.expect(diag, TokenKind::RetL)?;
        if self.at(TokenKind::RetVoid) {
            self.bump();
            self.expect(diag, TokenKind::RetR)?;
            return Some(ReturnSpec::Void);
        }
        let mut types = Vec::new();
        loop {
            types.push(self.parse_type(diag)?);
            if self.at(TokenKind::Semi) || self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect(diag, TokenKind::RetR)?;
        Some(ReturnSpec::Types(crate::arena::alloc_slice(self.arena, types)))
    }

    // ---- statements (spec §4.4.6) ----

    pub(crate) fn parse_block(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena [Stmt<'arena>]> {
        self.expect(diag, TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            self.skip_semis();
            if self.at(TokenKind::RBrace) {
                break;
            }
            if self.at(TokenKind::Eof) {
                return self.error(diag, self.peek_tok(0).position(), "expected }, got EOF");
            }
            stmts.push(self.parse_stmt(diag)?);
        }
        self.expect(diag, TokenKind::RBrace)?;
        Some(crate::arena::alloc_slice(self.arena, stmts))
    }

    /// Either a full block, or the `: stmt` single-statement form used by
    /// bare `if`/`elif`/`else` bodies (spec §4.4.6).
    fn parse_stmt_body(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena [Stmt<'arena>]> {
        if self.at(TokenKind::Colon) {
            self.bump();
            let stmt = self.parse_stmt(diag)?;
            Some(crate::arena::alloc_slice(self.arena, vec![stmt]))
        } else {
            self.parse_block(diag)
        }
    }

    fn parse_condition(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        if self.at(TokenKind::LParen) {
            self.bump();
            let e = self.parse_expr(diag, 1)?;
            self.expect(diag, TokenKind::RParen)?;
            Some(e)
        } else {
            self.parse_expr(diag, 1)
        }
    }

    fn parse_stmt(&mut self, diag: &mut Diagnostic<'arena>) -> Option<Stmt<'arena>> {
        let tok = self.peek_tok(0);
        let (line, col) = (tok.line, tok.col);
        let stmt = match tok.kind {
            TokenKind::KwLet => {
                self.bump();
                let is_mut = if self.at(TokenKind::QMark) {
                    self.bump();
                    true
                } else {
                    false
                };
                let name = self.expect(diag, TokenKind::Ident)?.text;
                self.expect(diag, TokenKind::Eq)?;
                let value = self.parse_expr(diag, 1)?;
                self.alloc_stmt(line, col, StmtKind::Let { name, is_mut, value })
            }
            TokenKind::KwConst => {
                self.bump();
                let name = self.expect(diag, TokenKind::Ident)?.text;
                self.expect(diag, TokenKind::Eq)?;
                let value = self.parse_expr(diag, 1)?;
                self.alloc_stmt(line, col, StmtKind::Const { name, value })
            }
            TokenKind::KwIf => {
                self.bump();
                self.alloc_stmt(line, col, StmtKind::If(self.parse_if_stmt_rest(diag)?))
            }
            TokenKind::KwFor => self.parse_for_or_foreach(diag, line, col)?,
            TokenKind::KwReturn => {
                self.bump();
                let value = if matches!(self.peek_kind(0), TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof) {
                    None
                } else {
                    Some(self.parse_expr(diag, 1)?)
                };
                self.alloc_stmt(line, col, StmtKind::Return(value))
            }
            TokenKind::KwBreak => {
                self.bump();
                self.alloc_stmt(line, col, StmtKind::Break)
            }
            TokenKind::KwContinue => {
                self.bump();
                self.alloc_stmt(line, col, StmtKind::Continue)
            }
            TokenKind::LBrace => {
                let body = self.parse_block(diag)?;
                self.alloc_stmt(line, col, StmtKind::Block(body))
            }
            _ => {
                let value = self.parse_expr(diag, 1)?;
                self.alloc_stmt(line, col, StmtKind::Expr(value))
            }
        };
        if self.at(TokenKind::Semi) {
            self.bump();
        }
        Some(stmt)
    }

    fn parse_if_stmt_rest(&mut self, diag: &mut Diagnostic<'arena>) -> Option<IfStmt<'arena>> {
        let mut arms = Vec::new();
        loop {
            let cond = self.parse_condition(diag)?;
            let body = self.parse_stmt_body(diag)?;
            arms.push(IfArm { cond, body });
            if self.at(TokenKind::KwElif) {
                self.bump();
                continue;
            }
            break;
        }
        let else_branch = if self.at(TokenKind::KwElse) {
            self.bump();
            Some(self.parse_stmt_body(diag)?)
        } else {
            None
        };
        Some(IfStmt { arms: crate::arena::alloc_slice(self.arena, arms), else_branch })
    }

    fn parse_for_or_foreach(&mut self, diag: &mut Diagnostic<'arena>, line: usize, col: usize) -> Option<Stmt<'arena>> {
        self.bump(); // for
        self.expect(diag, TokenKind::LParen)?;

        if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::KwIn {
            let name = self.bump().text;
            self.bump(); // in
            let iter = self.parse_expr(diag, 1)?;
            self.expect(diag, TokenKind::RParen)?;
            let body = self.parse_block(diag)?;
            return Some(self.alloc_stmt(line, col, StmtKind::Foreach(ForeachStmt { name, iter, body })));
        }

        let init = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_for_init(diag)?)
        };
        self.expect(diag, TokenKind::Semi)?;
        let cond = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr(diag, 1)?)
        };
        self.expect(diag, TokenKind::Semi)?;
        let step = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr(diag, 1)?)
        };
        self.expect(diag, TokenKind::RParen)?;
        let body = self.parse_block(diag)?;
        Some(self.alloc_stmt(line, col, StmtKind::For(ForStmt { init, cond, step, body })))
    }

    fn parse_for_init(&mut self, diag: &mut Diagnostic<'arena>) -> Option<ForInit<'arena>> {
        if self.at(TokenKind::KwLet) {
            self.bump();
            let is_mut = if self.at(TokenKind::QMark) {
                self.bump();
                true
            } else {
                false
            };
            let name = self.expect(diag, TokenKind::Ident)?.text;
            self.expect(diag, TokenKind::Eq)?;
            let value = self.parse_expr(diag, 1)?;
            Some(ForInit::Let { name, is_mut, value })
        } else {
            let value = self.parse_expr(diag, 1)?;
            Some(ForInit::Expr(value))
        }
    }
}
