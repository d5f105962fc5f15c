use super::pattern::Pattern;
use super::stmt::Stmt;
use super::types::TypeRef;
use crate::lexer::token::StrParts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `#` — length-of / count-of sugar.
    Hash,
    Not,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Coalesce,
    Or,
    And,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

/// A call/constructor argument: an optional `IDENT:` name prefix plus the
/// value expression (spec §4.4.9).
#[derive(Debug, Clone, Copy)]
pub struct Arg<'arena> {
    pub name: Option<&'arena str>,
    pub value: &'arena Expr<'arena>,
}

#[derive(Debug, Clone, Copy)]
pub enum ArrayLit<'arena> {
    Empty { elem_ty: Option<TypeRef<'arena>> },
    Elems(&'arena [Expr<'arena>]),
}

#[derive(Debug, Clone, Copy)]
pub enum DictLit<'arena> {
    Empty {
        kv_ty: Option<(TypeRef<'arena>, TypeRef<'arena>)>,
    },
    Pairs(&'arena [(Expr<'arena>, Expr<'arena>)]),
}

#[derive(Debug, Clone, Copy)]
pub struct MatchArm<'arena> {
    pub pattern: Pattern<'arena>,
    pub body: &'arena Expr<'arena>,
}

#[derive(Debug, Clone, Copy)]
pub struct IfExpr<'arena> {
    pub cond: &'arena Expr<'arena>,
    pub then_branch: &'arena Expr<'arena>,
    pub else_branch: &'arena Expr<'arena>,
}

#[derive(Debug, Clone, Copy)]
pub struct Param<'arena> {
    pub name: &'arena str,
    pub ty: Option<TypeRef<'arena>>,
    pub is_mut: bool,
    pub is_this: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum LambdaBody<'arena> {
    Block(&'arena [Stmt<'arena>]),
    Expr(&'arena Expr<'arena>),
}

#[derive(Debug, Clone, Copy)]
pub struct Lambda<'arena> {
    pub params: &'arena [Param<'arena>],
    pub body: LambdaBody<'arena>,
}

/// Expression node variants (spec §3.5). `Move` and `Ternary` are reserved
/// — declared so a future grammar revision can produce them, but no parser
/// path in this crate constructs them (spec §9 Open Questions).
#[derive(Debug, Clone, Copy)]
pub enum ExprKind<'arena> {
    Int(i64),
    Float(f64),
    Str(StrParts<'arena>),
    Tuple(&'arena [Expr<'arena>]),
    Ident(&'arena str),
    Null,
    Bool(bool),
    Array(ArrayLit<'arena>),
    Dict(DictLit<'arena>),
    Unary {
        op: UnaryOp,
        expr: &'arena Expr<'arena>,
    },
    Binary {
        op: BinaryOp,
        lhs: &'arena Expr<'arena>,
        rhs: &'arena Expr<'arena>,
    },
    Assign {
        op: AssignOp,
        target: &'arena Expr<'arena>,
        value: &'arena Expr<'arena>,
    },
    Call {
        callee: &'arena Expr<'arena>,
        args: &'arena [Arg<'arena>],
    },
    Index {
        base: &'arena Expr<'arena>,
        index: &'arena Expr<'arena>,
    },
    Member {
        base: &'arena Expr<'arena>,
        name: &'arena str,
    },
    Paren(&'arena Expr<'arena>),
    Match {
        scrutinee: &'arena Expr<'arena>,
        arms: &'arena [MatchArm<'arena>],
    },
    If(IfExpr<'arena>),
    Lambda(Lambda<'arena>),
    Block(&'arena [Stmt<'arena>]),
    New {
        path: &'arena [&'arena str],
        args: &'arena [Arg<'arena>],
    },
    Move(&'arena Expr<'arena>),
    Ternary {
        cond: &'arena Expr<'arena>,
        then_branch: &'arena Expr<'arena>,
        else_branch: &'arena Expr<'arena>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Expr<'arena> {
    pub line: usize,
    pub col: usize,
    pub kind: ExprKind<'arena>,
}
