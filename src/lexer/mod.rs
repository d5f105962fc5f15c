//! Context-sensitive lexer: automatic semicolon insertion, nested
//! return-type mode, and string-literal placeholders (spec §4.3).
//!
//! Grounded in `original_source/src/bootstrap/lexer.c`'s scan loop and
//! string-literal branch, and in the hand-rolled char-iterator shape of
//! the teacher's `src/lexer/mod.rs` (`Lexer<'a>{iterator: Peekable<Chars>,
//! line, col}` plus a `LexResult`-returning driver loop) — adapted here to
//! borrow straight from the arena-backed source instead of accumulating
//! into owned `String`s, and extended with ASI, return-mode and
//! placeholder handling the teacher's lexer doesn't have.

pub mod token;

use bumpalo::Bump;
use log::trace;

use crate::diagnostic::{Diagnostic, Position};
use token::{keyword_kind, Payload, StrPart, StrParts, Token, TokenKind};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_mid(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Lexer<'arena> {
    source: &'arena str,
    arena: &'arena Bump,
    offset: usize,
    line: usize,
    col: usize,
    nest_depth: u32,
    return_depth: u32,
    last_real_kind: Option<TokenKind>,
    last_significant_kind: Option<TokenKind>,
    tokens: Vec<Token<'arena>>,
}

/// Consumes `(path, source)`, producing an ordered token sequence plus
/// structured string-part lists (spec §6.3). Returns `None` once `diag`
/// carries an error; tokens produced so far should be discarded by the
/// caller in that case.
pub fn lex<'arena>(
    source: &'arena str,
    arena: &'arena Bump,
    diag: &mut Diagnostic<'arena>,
) -> Option<Vec<Token<'arena>>> {
    let lexer = Lexer {
        source,
        arena,
        offset: 0,
        line: 1,
        col: 1,
        nest_depth: 0,
        return_depth: 0,
        last_real_kind: None,
        last_significant_kind: None,
        tokens: Vec::new(),
    };
    lexer.run(diag)
}

impl<'arena> Lexer<'arena> {
    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.source[self.offset..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn pos(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn is_stmt_terminating_context(&self) -> bool {
        self.nest_depth == 0
            && self
                .last_significant_kind
                .map(TokenKind::is_statement_terminating)
                .unwrap_or(false)
    }

    fn set_last(&mut self, kind: TokenKind) {
        self.last_real_kind = Some(kind);
        if kind != TokenKind::Semi {
            self.last_significant_kind = Some(kind);
        }
    }

    fn push(&mut self, kind: TokenKind, text: &'arena str, line: usize, col: usize, payload: Payload<'arena>) {
        self.tokens.push(Token { kind, text, line, col, payload });
        self.set_last(kind);
    }

    fn push_semi(&mut self, line: usize, col: usize) {
        self.tokens.push(Token { kind: TokenKind::Semi, text: ";", line, col, payload: Payload::None });
        self.last_real_kind = Some(TokenKind::Semi);
    }

    fn run(mut self, diag: &mut Diagnostic<'arena>) -> Option<Vec<Token<'arena>>> {
        loop {
            if diag.has_error() {
                return None;
            }

            let Some(c) = self.peek() else {
                let (line, col) = (self.line, self.col);
                if self.is_stmt_terminating_context() {
                    self.push_semi(line, col);
                }
                self.push(TokenKind::Eof, "", line, col, Payload::None);
                break;
            };

            let line = self.line;
            let col = self.col;

            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
                continue;
            }

            if c == '\n' {
                self.advance();
                if self.is_stmt_terminating_context() {
                    trace!("ASI: inserting SEMI at {line}:{col}");
                    self.push_semi(line, col);
                }
                continue;
            }

            if c == '('
                && self.peek2() == Some('(')
                && self.return_depth == 0
                && self.last_significant_kind == Some(TokenKind::RParen)
            {
                self.advance();
                self.advance();
                self.return_depth += 1;
                trace!("entering return-mode at {line}:{col}");
                self.push(TokenKind::RetL, "((", line, col, Payload::None);
                continue;
            }

            if c == ')' && self.peek2() == Some(')') && self.return_depth > 0 {
                self.advance();
                self.advance();
                self.return_depth -= 1;
                self.push(TokenKind::RetR, "))", line, col, Payload::None);
                continue;
            }

            if c == '-' && self.peek2() == Some('-') && self.return_depth > 0 {
                self.advance();
                self.advance();
                self.push(TokenKind::RetVoid, "--", line, col, Payload::None);
                continue;
            }

            if c == '-' && self.peek2() == Some('-') {
                self.advance();
                self.advance();
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            if let Some((kind, text)) = self.two_char_operator() {
                self.advance();
                self.advance();
                self.push(kind, text, line, col, Payload::None);
                continue;
            }

            if c == ';' {
                self.advance();
                self.push_semi(line, col);
                continue;
            }

            if let Some(kind) = self.single_punctuation(c) {
                self.advance();
                match kind {
                    TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => self.nest_depth += 1,
                    TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                        self.nest_depth = self.nest_depth.saturating_sub(1)
                    }
                    _ => {}
                }
                let text = &self.source[self.char_span(c)];
                self.push(kind, text, line, col, Payload::None);
                continue;
            }

            if c == '?' {
                self.advance();
                self.push(TokenKind::QMark, "?", line, col, Payload::None);
                continue;
            }

            if c == '#' {
                self.advance();
                self.push(TokenKind::Hash, "#", line, col, Payload::None);
                continue;
            }

            if c == '"' {
                self.advance();
                match self.scan_string(diag) {
                    Some(parts) => {
                        self.push(TokenKind::Str, "", line, col, Payload::Str(parts));
                    }
                    None => return None,
                }
                continue;
            }

            if c.is_ascii_digit() {
                self.scan_number(line, col);
                continue;
            }

            if is_ident_start(c) {
                self.scan_ident(line, col);
                continue;
            }

            diag.record(
                self.arena,
                self.pos(),
                format!("unexpected character '{c}' at line {line}, column {col}"),
            );
            return None;
        }

        if diag.has_error() {
            return None;
        }
        coalesce_semis(&mut self.tokens);
        Some(self.tokens)
    }

    /// Best-effort reconstruction of the source span a single ASCII
    /// character occupies, for tokens whose text is just that character.
    fn char_span(&self, c: char) -> std::ops::Range<usize> {
        let end = self.offset;
        (end - c.len_utf8())..end
    }

    fn two_char_operator(&self) -> Option<(TokenKind, &'static str)> {
        let (a, b) = (self.peek()?, self.peek2());
        Some(match (a, b) {
            ('=', Some('=')) => (TokenKind::EqEq, "=="),
            ('!', Some('=')) => (TokenKind::Neq, "!="),
            ('<', Some('=')) => (TokenKind::Lte, "<="),
            ('>', Some('=')) => (TokenKind::Gte, ">="),
            ('&', Some('&')) => (TokenKind::AndAnd, "&&"),
            ('|', Some('|')) => (TokenKind::OrOr, "||"),
            ('=', Some('>')) => (TokenKind::FatArrow, "=>"),
            ('+', Some('=')) => (TokenKind::PlusEq, "+="),
            ('-', Some('=')) => (TokenKind::MinusEq, "-="),
            ('*', Some('=')) => (TokenKind::StarEq, "*="),
            ('/', Some('=')) => (TokenKind::SlashEq, "/="),
            ('?', Some('?')) => (TokenKind::QQ, "??"),
            _ => return None,
        })
    }

    fn single_punctuation(&self, c: char) -> Option<TokenKind> {
        Some(match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '!' => TokenKind::Bang,
            '=' => TokenKind::Eq,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '|' => TokenKind::Pipe,
            _ => return None,
        })
    }

    fn scan_number(&mut self, line: usize, col: usize) {
        let start = self.offset;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some('.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.source[start..self.offset];
        if is_float {
            let value: f64 = text.parse().unwrap_or(0.0);
            self.push(TokenKind::Float, text, line, col, Payload::Float(value));
        } else {
            let value: i64 = text.parse().unwrap_or(0);
            self.push(TokenKind::Int, text, line, col, Payload::Int(value));
        }
    }

    fn scan_ident(&mut self, line: usize, col: usize) {
        let start = self.offset;
        while matches!(self.peek(), Some(c) if is_ident_mid(c)) {
            self.advance();
        }
        let text = &self.source[start..self.offset];
        match keyword_kind(text) {
            Some(kind) => self.push(kind, text, line, col, Payload::None),
            None => self.push(TokenKind::Ident, text, line, col, Payload::Ident(text)),
        }
    }

    /// String-literal scanning, including the `<placeholder>` sub-grammar
    /// (spec §4.3.3), ported from `original_source/src/bootstrap/lexer.c`.
    fn scan_string(&mut self, diag: &mut Diagnostic<'arena>) -> Option<StrParts<'arena>> {
        let open_pos = self.pos();
        let mut parts: Vec<StrPart<'arena>> = Vec::new();
        let mut text_buf = String::new();

        loop {
            match self.peek() {
                None => {
                    diag.record(self.arena, open_pos, "unterminated string");
                    return None;
                }
                Some('\n') => {
                    diag.record(self.arena, open_pos, "unterminated string");
                    return None;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    self.scan_escape(&mut text_buf, diag)?;
                }
                Some('<') => {
                    self.advance();
                    if !text_buf.is_empty() {
                        parts.push(StrPart::Text(self.arena.alloc_str(&text_buf)));
                        text_buf.clear();
                    }
                    let raw = self.scan_placeholder(diag)?;
                    parts.push(StrPart::ExprRaw(raw));
                }
                Some(c) => {
                    self.advance();
                    text_buf.push(c);
                }
            }
        }

        if !text_buf.is_empty() {
            parts.push(StrPart::Text(self.arena.alloc_str(&text_buf)));
        }
        Some(StrParts(self.arena.alloc_slice_fill_iter(parts)))
    }

    fn scan_escape(&mut self, buf: &mut String, diag: &mut Diagnostic<'arena>) -> Option<()> {
        let pos = self.pos();
        match self.advance() {
            Some('n') => buf.push('\n'),
            Some('t') => buf.push('\t'),
            Some('r') => buf.push('\r'),
            Some('\\') => buf.push('\\'),
            Some('"') => buf.push('"'),
            Some('<') => buf.push('<'),
            Some('>') => buf.push('>'),
            Some('u') => {
                if self.peek() != Some('{') {
                    diag.record(self.arena, pos, "bad \\u{...} escape");
                    return None;
                }
                self.advance();
                let mut hex = String::new();
                while matches!(self.peek(), Some(c) if c != '}') {
                    hex.push(self.advance().unwrap());
                }
                if self.peek() != Some('}') {
                    diag.record(self.arena, pos, "bad \\u{...} escape");
                    return None;
                }
                self.advance();
                let code = u32::from_str_radix(&hex, 16).ok();
                let ch = code.filter(|c| *c <= 0x10FFFF).and_then(char::from_u32);
                match ch {
                    Some(ch) => buf.push(ch),
                    None => {
                        diag.record(self.arena, pos, "bad \\u{...} escape");
                        return None;
                    }
                }
            }
            _ => {
                diag.record(self.arena, pos, "unknown escape");
                return None;
            }
        }
        Some(())
    }

    fn scan_placeholder(&mut self, diag: &mut Diagnostic<'arena>) -> Option<&'arena str> {
        let pos = self.pos();
        let raw_start = self.offset;

        match self.peek() {
            Some(c) if is_ident_start(c) => {
                self.advance();
            }
            _ => {
                diag.record(self.arena, pos, "expected identifier in placeholder");
                return None;
            }
        }
        while matches!(self.peek(), Some(c) if is_ident_mid(c)) {
            self.advance();
        }

        if self.peek() == Some(':') {
            self.advance();
            loop {
                match self.peek() {
                    None | Some('\n') => {
                        diag.record(self.arena, pos, "unterminated placeholder");
                        return None;
                    }
                    Some('>') => break,
                    Some(_) => {
                        self.advance();
                    }
                }
            }
        } else {
            loop {
                match self.peek() {
                    Some('.') if matches!(self.peek2(), Some(c) if is_ident_start(c)) => {
                        self.advance();
                        while matches!(self.peek(), Some(c) if is_ident_mid(c)) {
                            self.advance();
                        }
                        if self.peek() == Some('(') {
                            self.advance();
                            if self.peek() == Some(')') {
                                self.advance();
                            } else {
                                diag.record(self.arena, pos, "unterminated placeholder");
                                return None;
                            }
                        }
                    }
                    Some('[') => {
                        self.advance();
                        let mut depth = 1u32;
                        loop {
                            match self.peek() {
                                None | Some('\n') => {
                                    diag.record(self.arena, pos, "unterminated placeholder [ ]");
                                    return None;
                                }
                                Some('[') => {
                                    depth += 1;
                                    self.advance();
                                }
                                Some(']') => {
                                    depth -= 1;
                                    self.advance();
                                    if depth == 0 {
                                        break;
                                    }
                                }
                                Some(_) => {
                                    self.advance();
                                }
                            }
                        }
                    }
                    _ => break,
                }
            }
        }

        if self.peek() != Some('>') {
            loop {
                match self.peek() {
                    None | Some('\n') => {
                        diag.record(self.arena, pos, "unterminated placeholder");
                        return None;
                    }
                    Some('<') => {
                        diag.record(self.arena, pos, "invalid interpolation: nested '<' in placeholder");
                        return None;
                    }
                    Some('>') => break,
                    Some(_) => {
                        self.advance();
                    }
                }
            }
        }

        let raw_end = self.offset;
        self.advance();
        Some(&self.source[raw_start..raw_end])
    }
}

/// Drops consecutive `SEMI` tokens produced by ASI at multiple newlines in
/// a row (spec §4.3.2, §8 "Consecutive-SEMI coalescing").
fn coalesce_semis<'arena>(tokens: &mut Vec<Token<'arena>>) {
    let mut i = 1;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::Semi && tokens[i - 1].kind == TokenKind::Semi {
            tokens.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Re-lexes a placeholder body (or any other nested source span) using the
/// same scanner the top-level lexer uses, for the mini-parser in
/// [`crate::parser::placeholder`].
pub fn relex<'arena>(
    source: &'arena str,
    arena: &'arena Bump,
    diag: &mut Diagnostic<'arena>,
) -> Option<Vec<Token<'arena>>> {
    lex(source, arena, diag)
}
