//! `Type := IDENT ( . IDENT )* | '[' Type ']' | '[' Type '=>' Type ']'`
//! (spec §4.4.5).

use crate::ast::TypeRef;
use crate::diagnostic::Diagnostic;
use crate::lexer::token::TokenKind;

use super::Parser;

impl<'t, 'arena> Parser<'t, 'arena> {
    pub(crate) fn parse_type(&mut self, diag: &mut Diagnostic<'arena>) -> Option<TypeRef<'arena>> {
        if self.at(TokenKind::LBracket) {
            self.bump();
            let first = self.parse_type(diag)?;
            if self.at(TokenKind::FatArrow) {
                self.bump();
                let value = self.parse_type(diag)?;
                self.expect(diag, TokenKind::RBracket)?;
                return Some(TypeRef::Dict(
                    crate::arena::alloc(self.arena, first),
                    crate::arena::alloc(self.arena, value),
                ));
            }
            self.expect(diag, TokenKind::RBracket)?;
            return Some(TypeRef::Array(crate::arena::alloc(self.arena, first)));
        }

        let first = self.expect(diag, TokenKind::Ident)?.text;
        let mut segments = vec![first];
        while self.at(TokenKind::Dot) {
            self.bump();
            segments.push(self.expect(diag, TokenKind::Ident)?.text);
        }
        Some(TypeRef::Name(crate::arena::alloc_slice(self.arena, segments)))
    }
}
