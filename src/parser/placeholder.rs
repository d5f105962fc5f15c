//! Placeholder mini-parser (spec §4.5): re-lexes a `<...>` body captured
//! raw by the string scanner and walks `IDENT ( . IDENT | '[' expr ']' )*
//! ( : ... )?`, erroring on any other token. Ported from the member/index/
//! format-tail walk in `original_source/src/bootstrap/lexer.c`'s
//! placeholder handling, re-expressed as a proper token walk now that the
//! raw text is available as a real token slice instead of raw chars.

use bumpalo::Bump;

use crate::arena;
use crate::ast::{Expr, ExprKind};
use crate::diagnostic::{Diagnostic, Position};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::{self};

use super::parse_state::ParseState;
use super::Parser;

pub(crate) fn parse_placeholder<'arena>(
    arena: &'arena Bump,
    path: &'arena str,
    raw: &'arena str,
    anchor_line: usize,
    anchor_col: usize,
    diag: &mut Diagnostic<'arena>,
) -> Option<&'arena Expr<'arena>> {
    let anchor = Position::new(anchor_line, anchor_col);
    let mut relex_diag = Diagnostic::new(path);
    let Some(tokens) = lexer::relex(raw, arena, &mut relex_diag) else {
        diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': unterminated placeholder"));
        return None;
    };

    let mut idx = 0usize;
    let peek = |i: usize| -> Token<'arena> {
        tokens.get(i).copied().unwrap_or(Token {
            kind: TokenKind::Eof,
            text: "",
            line: anchor_line,
            col: anchor_col,
            payload: crate::lexer::token::Payload::None,
        })
    };

    let first = peek(idx);
    if first.kind != TokenKind::Ident {
        diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': expected identifier"));
        return None;
    }
    idx += 1;
    let mut expr = arena::alloc(arena, Expr { line: anchor_line, col: anchor_col, kind: ExprKind::Ident(first.text) });

    loop {
        let tok = peek(idx);
        match tok.kind {
            TokenKind::Dot => {
                idx += 1;
                let name_tok = peek(idx);
                if name_tok.kind != TokenKind::Ident {
                    diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': expected member name after '.'"));
                    return None;
                }
                idx += 1;
                expr = arena::alloc(arena, Expr { line: anchor_line, col: anchor_col, kind: ExprKind::Member { base: expr, name: name_tok.text } });
            }
            TokenKind::LBracket => {
                idx += 1;
                let inner_start = idx;
                let mut depth = 1usize;
                while idx < tokens.len() && depth > 0 {
                    match tokens[idx].kind {
                        TokenKind::LBracket => depth += 1,
                        TokenKind::RBracket => depth -= 1,
                        TokenKind::Eof => break,
                        _ => {}
                    }
                    if depth > 0 {
                        idx += 1;
                    }
                }
                if depth != 0 {
                    diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': unterminated '['"));
                    return None;
                }
                let inner_tokens = &tokens[inner_start..idx];
                idx += 1; // consume ']'
                if inner_tokens.is_empty() {
                    diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': empty index"));
                    return None;
                }
                let mut inner_parser = Parser { state: ParseState::new(inner_tokens), arena, path };
                let Some(index_expr) = inner_parser.parse_expr(diag, 0) else {
                    return None;
                };
                expr = arena::alloc(arena, Expr { line: anchor_line, col: anchor_col, kind: ExprKind::Index { base: expr, index: index_expr } });
            }
            TokenKind::Colon => {
                // Format tail: spec only cares that the placeholder closes,
                // the format text itself isn't materialized into the AST.
                break;
            }
            TokenKind::Semi => {
                idx += 1;
            }
            TokenKind::Eof => break,
            _ => {
                diag.record(arena, anchor, format!("invalid interpolation '<{raw}>': operators not allowed in placeholder"));
                return None;
            }
        }
    }

    Some(expr)
}
