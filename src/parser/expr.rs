//! Pratt expression parser (spec §4.4.7), postfix chains (call / index /
//! member / `!`-sugar), primary expressions, and the speculative
//! lambda-vs-tuple disambiguation (spec §4.4.11).

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexer::token::{Payload, StrPart, StrParts, TokenKind};

use super::Parser;

impl<'t, 'arena> Parser<'t, 'arena> {
    fn assign_op(kind: TokenKind) -> Option<AssignOp> {
        Some(match kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::AddAssign,
            TokenKind::MinusEq => AssignOp::SubAssign,
            TokenKind::StarEq => AssignOp::MulAssign,
            TokenKind::SlashEq => AssignOp::DivAssign,
            _ => return None,
        })
    }

    fn binary_op(kind: TokenKind) -> Option<(BinaryOp, u8)> {
        Some(match kind {
            TokenKind::QQ => (BinaryOp::Coalesce, 2),
            TokenKind::OrOr => (BinaryOp::Or, 3),
            TokenKind::AndAnd => (BinaryOp::And, 4),
            TokenKind::EqEq => (BinaryOp::Eq, 5),
            TokenKind::Neq => (BinaryOp::Neq, 5),
            TokenKind::Lt => (BinaryOp::Lt, 6),
            TokenKind::Lte => (BinaryOp::Lte, 6),
            TokenKind::Gt => (BinaryOp::Gt, 6),
            TokenKind::Gte => (BinaryOp::Gte, 6),
            TokenKind::Plus => (BinaryOp::Add, 7),
            TokenKind::Minus => (BinaryOp::Sub, 7),
            TokenKind::Star => (BinaryOp::Mul, 8),
            TokenKind::Slash => (BinaryOp::Div, 8),
            TokenKind::Percent => (BinaryOp::Rem, 8),
            _ => return None,
        })
    }

    /// Precedence-climbing entry point. `min_prec` follows spec §4.4.7's
    /// table; callers that must stop before a following `{`/`:` (if
    /// conditions, match scrutinees) rely on `{`/`:` never matching a
    /// binary/assign operator, so the loop below stops there on its own.
    pub(crate) fn parse_expr(&mut self, diag: &mut Diagnostic<'arena>, min_prec: u8) -> Option<&'arena Expr<'arena>> {
        let mut lhs = self.parse_unary(diag)?;
        loop {
            let tok = self.peek_tok(0);
            if let Some(op) = Self::assign_op(tok.kind) {
                if 1 < min_prec {
                    break;
                }
                self.bump();
                let value = self.parse_expr(diag, 1)?;
                lhs = self.alloc_expr(tok.line, tok.col, ExprKind::Assign { op, target: lhs, value });
                continue;
            }
            if let Some((op, prec)) = Self::binary_op(tok.kind) {
                if prec < min_prec {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(diag, prec + 1)?;
                lhs = self.alloc_expr(tok.line, tok.col, ExprKind::Binary { op, lhs, rhs });
                continue;
            }
            break;
        }
        Some(lhs)
    }

    fn parse_unary(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.peek_tok(0);
        let op = match tok.kind {
            TokenKind::Hash => UnaryOp::Hash,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_postfix(diag),
        };
        self.bump();
        let expr = self.parse_unary(diag)?;
        Some(self.alloc_expr(tok.line, tok.col, ExprKind::Unary { op, expr }))
    }

    fn parse_postfix(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let mut expr = self.parse_primary(diag)?;
        loop {
            let tok = self.peek_tok(0);
            match tok.kind {
                TokenKind::LParen => {
                    self.bump();
                    let (args, any_named) = self.parse_call_args(diag)?;
                    self.expect(diag, TokenKind::RParen)?;
                    expr = self.build_call_or_new(diag, tok.line, tok.col, expr, args, any_named)?;
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr(diag, 1)?;
                    self.expect(diag, TokenKind::RBracket)?;
                    expr = self.alloc_expr(tok.line, tok.col, ExprKind::Index { base: expr, index });
                }
                TokenKind::Dot => {
                    self.bump();
                    let name = self.expect(diag, TokenKind::Ident)?.text;
                    expr = self.alloc_expr(tok.line, tok.col, ExprKind::Member { base: expr, name });
                }
                TokenKind::Bang => {
                    self.bump();
                    let name = self.expect(diag, TokenKind::Ident)?.text;
                    let member = self.alloc_expr(tok.line, tok.col, ExprKind::Member { base: expr, name });
                    let mut args = Vec::new();
                    if !matches!(
                        self.peek_kind(0),
                        TokenKind::Semi | TokenKind::Eof | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket | TokenKind::Colon
                    ) {
                        loop {
                            let value = self.parse_expr(diag, 1)?;
                            args.push(Arg { name: None, value });
                            if self.at(TokenKind::Comma) {
                                self.bump();
                                continue;
                            }
                            break;
                        }
                    }
                    expr = self.alloc_expr(
                        tok.line,
                        tok.col,
                        ExprKind::Call { callee: member, args: crate::arena::alloc_slice(self.arena, args) },
                    );
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_call_args(&mut self, diag: &mut Diagnostic<'arena>) -> Option<(Vec<Arg<'arena>>, bool)> {
        let mut args = Vec::new();
        let mut any_named = false;
        if !self.at(TokenKind::RParen) {
            loop {
                let name = if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::Colon {
                    let n = self.bump().text;
                    self.bump(); // ':'
                    any_named = true;
                    Some(n)
                } else {
                    None
                };
                let value = self.parse_expr(diag, 1)?;
                args.push(Arg { name, value });
                if self.at(TokenKind::Comma) {
                    self.bump();
                    if self.at(TokenKind::RParen) {
                        break;
                    }
                    continue;
                }
                break;
            }
        }
        Some((args, any_named))
    }

    /// A call whose arguments carry any `name:` prefix is rewritten to a
    /// `New` node over the callee's dotted path (spec §4.4.9); plain calls
    /// stay `Call`.
    fn build_call_or_new(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        line: usize,
        col: usize,
        callee: &'arena Expr<'arena>,
        args: Vec<Arg<'arena>>,
        any_named: bool,
    ) -> Option<&'arena Expr<'arena>> {
        if !any_named {
            return Some(self.alloc_expr(
                line,
                col,
                ExprKind::Call { callee, args: crate::arena::alloc_slice(self.arena, args) },
            ));
        }
        let path = match callee.kind {
            ExprKind::Ident(name) => vec![name],
            ExprKind::Member { base, name } => match base.kind {
                ExprKind::Ident(b) => vec![b, name],
                _ => return self.error(diag, callee.position(), "named arguments are only supported for constructors"),
            },
            _ => return self.error(diag, callee.position(), "named arguments are only supported for constructors"),
        };
        Some(self.alloc_expr(
            line,
            col,
            ExprKind::New { path: crate::arena::alloc_slice(self.arena, path), args: crate::arena::alloc_slice(self.arena, args) },
        ))
    }

    fn parse_primary(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.peek_tok(0);
        match tok.kind {
            TokenKind::Int => {
                self.bump();
                let Payload::Int(v) = tok.payload else { unreachable!() };
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Int(v)))
            }
            TokenKind::Float => {
                self.bump();
                let Payload::Float(v) = tok.payload else { unreachable!() };
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Float(v)))
            }
            TokenKind::Str => {
                self.bump();
                let Payload::Str(parts) = tok.payload else { unreachable!() };
                let parts = self.normalize_string_parts(diag, parts, tok.line, tok.col)?;
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Str(parts)))
            }
            TokenKind::KwTrue => {
                self.bump();
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Bool(true)))
            }
            TokenKind::KwFalse => {
                self.bump();
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Bool(false)))
            }
            TokenKind::KwNull => {
                self.bump();
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Null))
            }
            TokenKind::Ident => {
                self.bump();
                Some(self.alloc_expr(tok.line, tok.col, ExprKind::Ident(tok.text)))
            }
            TokenKind::KwMatch => self.parse_match(diag),
            TokenKind::KwIf => self.parse_if_expr(diag),
            TokenKind::KwNew => self.parse_new(diag),
            TokenKind::Pipe => self.parse_lambda_pipe(diag),
            TokenKind::LBracket => self.parse_array_or_dict(diag),
            TokenKind::LParen => self.parse_paren_or_lambda_or_tuple(diag),
            other => self.error(diag, tok.position(), format!("unexpected token {other:?} in expression")),
        }
    }

    fn parse_match(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.bump(); // match
        let scrutinee = self.parse_expr(diag, 1)?;
        let mut arms = Vec::new();
        if self.at(TokenKind::LBrace) {
            self.bump();
            loop {
                self.skip_semis();
                if self.at(TokenKind::RBrace) {
                    break;
                }
                let pattern = self.parse_pattern(diag)?;
                self.expect(diag, TokenKind::FatArrow)?;
                let body = self.parse_expr(diag, 1)?;
                arms.push(MatchArm { pattern, body });
                if self.at(TokenKind::Semi) || self.at(TokenKind::Comma) {
                    self.bump();
                }
            }
            self.expect(diag, TokenKind::RBrace)?;
        } else {
            self.expect(diag, TokenKind::Colon)?;
            loop {
                let pattern = self.parse_pattern(diag)?;
                self.expect(diag, TokenKind::FatArrow)?;
                let body = self.parse_expr(diag, 1)?;
                arms.push(MatchArm { pattern, body });
                if self.at(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        Some(self.alloc_expr(
            tok.line,
            tok.col,
            ExprKind::Match { scrutinee, arms: crate::arena::alloc_slice(self.arena, arms) },
        ))
    }

    fn parse_if_expr(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.bump(); // if
        let cond = self.parse_condition(diag)?;
        let then_branch = self.parse_if_expr_arm(diag)?;
        if !self.at(TokenKind::KwElse) {
            return self.error(diag, self.peek_tok(0).position(), "if expression requires an else branch");
        }
        self.bump();
        let else_branch = self.parse_if_expr_arm(diag)?;
        Some(self.alloc_expr(tok.line, tok.col, ExprKind::If(IfExpr { cond, then_branch, else_branch })))
    }

    /// A single expression, optionally wrapped in `{ }` (spec §4.4.10: an
    /// if-expression block must contain exactly one expression).
    fn parse_if_expr_arm(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        if self.at(TokenKind::LBrace) {
            self.bump();
            self.skip_semis();
            let e = self.parse_expr(diag, 1)?;
            self.skip_semis();
            if !self.at(TokenKind::RBrace) {
                return self.error(diag, self.peek_tok(0).position(), "if-expression block must contain a single expression");
            }
            self.bump();
            Some(e)
        } else {
            self.parse_expr(diag, 1)
        }
    }

    fn parse_new(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.bump(); // new
        let mut path = vec![self.expect(diag, TokenKind::Ident)?.text];
        while self.at(TokenKind::Dot) {
            self.bump();
            path.push(self.expect(diag, TokenKind::Ident)?.text);
        }
        self.expect(diag, TokenKind::LParen)?;
        let (args, _) = self.parse_call_args(diag)?;
        self.expect(diag, TokenKind::RParen)?;
        Some(self.alloc_expr(
            tok.line,
            tok.col,
            ExprKind::New { path: crate::arena::alloc_slice(self.arena, path), args: crate::arena::alloc_slice(self.arena, args) },
        ))
    }

    fn parse_lambda_pipe(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.bump(); // '|'
        let params = self.parse_params(diag, TokenKind::Pipe, true)?;
        self.expect(diag, TokenKind::Pipe)?;
        let body = self.parse_lambda_body(diag)?;
        Some(self.alloc_expr(tok.line, tok.col, ExprKind::Lambda(Lambda { params, body })))
    }

    fn parse_lambda_body(&mut self, diag: &mut Diagnostic<'arena>) -> Option<LambdaBody<'arena>> {
        if self.at(TokenKind::LBrace) {
            Some(LambdaBody::Block(self.parse_block(diag)?))
        } else {
            Some(LambdaBody::Expr(self.parse_expr(diag, 1)?))
        }
    }

    /// `(` ... `)` is either a parenthesized expression, a tuple, or — if a
    /// speculative parse of a parameter list followed by `=>` succeeds — an
    /// arrow lambda (spec §4.4.11). The speculative attempt routes its
    /// diagnostics to a scratch sink and is thrown away on failure; no
    /// tokens are consumed unless the whole lambda shape matches.
    fn parse_paren_or_lambda_or_tuple(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.peek_tok(0);
        let checkpoint = self.state.get_index();

        self.bump(); // '('
        let mut scratch = Diagnostic::new(self.path);
        let lambda = self.parse_params(&mut scratch, TokenKind::RParen, true).and_then(|params| {
            if scratch.has_error() {
                return None;
            }
            if !self.at(TokenKind::RParen) {
                return None;
            }
            self.bump();
            if !self.at(TokenKind::FatArrow) {
                return None;
            }
            self.bump();
            let body = self.parse_lambda_body(&mut scratch)?;
            if scratch.has_error() {
                return None;
            }
            Some(Lambda { params, body })
        });

        if let Some(lambda) = lambda {
            return Some(self.alloc_expr(tok.line, tok.col, ExprKind::Lambda(lambda)));
        }

        self.state.set_index(checkpoint);
        self.bump(); // '(' again, for real this time

        if self.at(TokenKind::RParen) {
            self.bump();
            return Some(self.alloc_expr(tok.line, tok.col, ExprKind::Tuple(&[])));
        }

        let first = self.parse_expr(diag, 1)?;
        if self.at(TokenKind::Comma) {
            let mut items = vec![*first];
            while self.at(TokenKind::Comma) {
                self.bump();
                if self.at(TokenKind::RParen) {
                    break;
                }
                items.push(*self.parse_expr(diag, 1)?);
            }
            self.expect(diag, TokenKind::RParen)?;
            Some(self.alloc_expr(tok.line, tok.col, ExprKind::Tuple(crate::arena::alloc_slice(self.arena, items))))
        } else {
            self.expect(diag, TokenKind::RParen)?;
            Some(self.alloc_expr(tok.line, tok.col, ExprKind::Paren(first)))
        }
    }

    fn parse_array_or_dict(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena Expr<'arena>> {
        let tok = self.bump(); // '['
        if self.at(TokenKind::RBracket) {
            self.bump();
            if self.at(TokenKind::Colon) {
                self.bump();
                return match self.parse_type(diag)? {
                    TypeRef::Dict(k, v) => {
                        Some(self.alloc_expr(tok.line, tok.col, ExprKind::Dict(DictLit::Empty { kv_ty: Some((*k, *v)) })))
                    }
                    other => Some(self.alloc_expr(tok.line, tok.col, ExprKind::Array(ArrayLit::Empty { elem_ty: Some(other) }))),
                };
            }
            return Some(self.alloc_expr(tok.line, tok.col, ExprKind::Array(ArrayLit::Empty { elem_ty: None })));
        }

        let first = self.parse_expr(diag, 1)?;
        if self.at(TokenKind::FatArrow) {
            self.bump();
            let first_value = self.parse_expr(diag, 1)?;
            let mut pairs = vec![(*first, *first_value)];
            while self.at(TokenKind::Comma) {
                self.bump();
                if self.at(TokenKind::RBracket) {
                    break;
                }
                let k = self.parse_expr(diag, 1)?;
                self.expect(diag, TokenKind::FatArrow)?;
                let v = self.parse_expr(diag, 1)?;
                pairs.push((*k, *v));
            }
            self.expect(diag, TokenKind::RBracket)?;
            Some(self.alloc_expr(tok.line, tok.col, ExprKind::Dict(DictLit::Pairs(crate::arena::alloc_slice(self.arena, pairs)))))
        } else {
            let mut elems = vec![*first];
            while self.at(TokenKind::Comma) {
                self.bump();
                if self.at(TokenKind::RBracket) {
                    break;
                }
                elems.push(*self.parse_expr(diag, 1)?);
            }
            self.expect(diag, TokenKind::RBracket)?;
            Some(self.alloc_expr(tok.line, tok.col, ExprKind::Array(ArrayLit::Elems(crate::arena::alloc_slice(self.arena, elems)))))
        }
    }

    /// Promotes every `ExprRaw` placeholder body in a string literal's parts
    /// to a parsed `Expr` (spec §4.5). Text parts pass through unchanged.
    pub(crate) fn normalize_string_parts(
        &mut self,
        diag: &mut Diagnostic<'arena>,
        parts: StrParts<'arena>,
        anchor_line: usize,
        anchor_col: usize,
    ) -> Option<StrParts<'arena>> {
        let mut out = Vec::with_capacity(parts.0.len());
        for part in parts.0 {
            match *part {
                StrPart::Text(t) => out.push(StrPart::Text(t)),
                StrPart::Expr(e) => out.push(StrPart::Expr(e)),
                StrPart::ExprRaw(raw) => {
                    let expr = super::placeholder::parse_placeholder(self.arena, self.path, raw, anchor_line, anchor_col, diag)?;
                    out.push(StrPart::Expr(expr));
                }
            }
        }
        Some(StrParts(crate::arena::alloc_slice(self.arena, out)))
    }
}

impl<'arena> Expr<'arena> {
    pub(crate) fn position(&self) -> crate::diagnostic::Position {
        crate::diagnostic::Position::new(self.line, self.col)
    }
}
