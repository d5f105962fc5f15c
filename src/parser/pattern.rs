//! Match-arm / string-pattern grammar (spec §4.4.8 / §3.6).

use crate::ast::Pattern;
use crate::diagnostic::Diagnostic;
use crate::lexer::token::{Payload, TokenKind};

use super::Parser;

impl<'t, 'arena> Parser<'t, 'arena> {
    pub(crate) fn parse_pattern(&mut self, diag: &mut Diagnostic<'arena>) -> Option<Pattern<'arena>> {
        let tok = self.peek_tok(0);
        match tok.kind {
            TokenKind::Ident if tok.text == "_" => {
                self.bump();
                Some(Pattern::Wildcard)
            }
            TokenKind::Ident => {
                self.bump();
                Some(Pattern::Ident(tok.text))
            }
            TokenKind::Int => {
                self.bump();
                let Payload::Int(v) = tok.payload else { unreachable!() };
                Some(Pattern::Int(v))
            }
            TokenKind::Str => {
                self.bump();
                let Payload::Str(parts) = tok.payload else { unreachable!() };
                let parts = self.normalize_string_parts(diag, parts, tok.line, tok.col)?;
                Some(Pattern::Str(parts))
            }
            TokenKind::KwTrue => {
                self.bump();
                Some(Pattern::Bool(true))
            }
            TokenKind::KwFalse => {
                self.bump();
                Some(Pattern::Bool(false))
            }
            TokenKind::KwNull => {
                self.bump();
                Some(Pattern::Null)
            }
            other => self.error(diag, tok.position(), format!("unexpected token {other:?} in pattern")),
        }
    }
}
