use crate::diagnostic::Position;

/// Closed set of token kinds (spec §6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Ident,
    Int,
    Float,
    Str,

    Semi,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Eq,
    Lt,
    Gt,
    Pipe,

    EqEq,
    Neq,
    Lte,
    Gte,
    AndAnd,
    OrOr,
    FatArrow,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    QQ,
    QMark,
    Hash,

    RetL,
    RetR,
    RetVoid,

    KwCask,
    KwBring,
    KwFun,
    KwMacro,
    KwEntry,
    KwClass,
    KwStruct,
    KwEnum,
    KwPub,
    KwLock,
    KwSeal,
    KwDef,
    KwLet,
    KwConst,
    KwIf,
    KwElse,
    KwElif,
    KwReturn,
    KwTrue,
    KwFalse,
    KwNull,
    KwFor,
    KwMatch,
    KwNew,
    KwIn,
    KwBreak,
    KwContinue,
}

impl TokenKind {
    /// The ASI statement-terminator set (spec §4.3.4).
    pub fn is_statement_terminating(self) -> bool {
        matches!(
            self,
            TokenKind::RBrace
                | TokenKind::Semi
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Ident
                | TokenKind::Str
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNull
                | TokenKind::KwBreak
                | TokenKind::KwContinue
        )
    }
}

/// A part of a string literal: decoded text, a not-yet-parsed placeholder
/// body, or (post-parse) the expression it was promoted to.
#[derive(Debug, Clone, Copy)]
pub enum StrPart<'arena> {
    Text(&'arena str),
    ExprRaw(&'arena str),
    Expr(&'arena crate::ast::Expr<'arena>),
}

#[derive(Debug, Clone, Copy)]
pub struct StrParts<'arena>(pub &'arena [StrPart<'arena>]);

impl<'arena> StrParts<'arena> {
    /// Invariant check used by tests: true once every placeholder has been
    /// promoted from EXPR_RAW to EXPR (spec §3.3, §8 "Placeholder closure").
    pub fn is_closed(&self) -> bool {
        self.0.iter().all(|p| !matches!(p, StrPart::ExprRaw(_)))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Payload<'arena> {
    None,
    Int(i64),
    Float(f64),
    Ident(&'arena str),
    Str(StrParts<'arena>),
}

#[derive(Debug, Clone, Copy)]
pub struct Token<'arena> {
    pub kind: TokenKind,
    pub text: &'arena str,
    pub line: usize,
    pub col: usize,
    pub payload: Payload<'arena>,
}

impl<'arena> Token<'arena> {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }
}

/// Keyword table, matched by length then byte-equality (spec §4.3.5).
/// A closed-set `match` compiles to a jump table / string-compare chain
/// without needing a runtime-built map: the table is fixed, unlike the
/// teacher's `LEX_MAP`, which is extensible at `Lexer::new` time.
pub fn keyword_kind(ident: &str) -> Option<TokenKind> {
    Some(match ident.len() {
        2 => match ident {
            "if" => TokenKind::KwIf,
            "in" => TokenKind::KwIn,
            _ => return None,
        },
        3 => match ident {
            "fun" => TokenKind::KwFun,
            "pub" => TokenKind::KwPub,
            "def" => TokenKind::KwDef,
            "let" => TokenKind::KwLet,
            "for" => TokenKind::KwFor,
            "new" => TokenKind::KwNew,
            _ => return None,
        },
        4 => match ident {
            "cask" => TokenKind::KwCask,
            "enum" => TokenKind::KwEnum,
            "lock" => TokenKind::KwLock,
            "seal" => TokenKind::KwSeal,
            "else" => TokenKind::KwElse,
            "elif" => TokenKind::KwElif,
            "true" => TokenKind::KwTrue,
            "null" => TokenKind::KwNull,
            _ => return None,
        },
        5 => match ident {
            "bring" => TokenKind::KwBring,
            "entry" => TokenKind::KwEntry,
            "class" => TokenKind::KwClass,
            "const" => TokenKind::KwConst,
            "false" => TokenKind::KwFalse,
            "match" => TokenKind::KwMatch,
            "macro" => TokenKind::KwMacro,
            "break" => TokenKind::KwBreak,
            _ => return None,
        },
        6 => match ident {
            "struct" => TokenKind::KwStruct,
            "return" => TokenKind::KwReturn,
            _ => return None,
        },
        8 => match ident {
            "continue" => TokenKind::KwContinue,
            _ => return None,
        },
        _ => return None,
    })
}
