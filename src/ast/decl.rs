use super::expr::{Expr, Param};
use super::stmt::Stmt;
use super::types::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Priv,
    Pub,
    Lock,
}

#[derive(Debug, Clone, Copy)]
pub enum ReturnSpec<'arena> {
    Void,
    Types(&'arena [TypeRef<'arena>]),
}

#[derive(Debug, Clone, Copy)]
pub struct FunctionDecl<'arena> {
    pub name: &'arena str,
    pub is_pub: bool,
    pub params: &'arena [Param<'arena>],
    pub ret: ReturnSpec<'arena>,
    pub body: &'arena [Stmt<'arena>],
}

#[derive(Debug, Clone, Copy)]
pub struct EntryDecl<'arena> {
    pub ret: ReturnSpec<'arena>,
    pub body: &'arena [Stmt<'arena>],
}

#[derive(Debug, Clone, Copy)]
pub struct ConstDecl<'arena> {
    pub name: &'arena str,
    pub is_pub: bool,
    pub value: &'arena Expr<'arena>,
}

#[derive(Debug, Clone, Copy)]
pub struct DefDecl<'arena> {
    pub name: &'arena str,
    pub is_pub: bool,
    pub is_mut: bool,
    pub value: &'arena Expr<'arena>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NominalKind {
    Class,
    Struct,
    Enum,
}

#[derive(Debug, Clone, Copy)]
pub enum Member<'arena> {
    Field {
        is_pub: bool,
        name: &'arena str,
        ty: TypeRef<'arena>,
    },
    Method(FunctionDecl<'arena>),
}

#[derive(Debug, Clone, Copy)]
pub struct NominalDecl<'arena> {
    pub kind: NominalKind,
    pub visibility: Visibility,
    pub is_sealed: bool,
    pub name: &'arena str,
    /// Only ever `Some` for `class`; must be a bare `TYPE_NAME`.
    pub base: Option<&'arena str>,
    pub members: &'arena [Member<'arena>],
}

/// Declaration node variants (spec §3.8).
#[derive(Debug, Clone, Copy)]
pub enum DeclKind<'arena> {
    Function(FunctionDecl<'arena>),
    /// Same shape as `Function` minus a `this`-receiver parameter.
    Macro(FunctionDecl<'arena>),
    Entry(EntryDecl<'arena>),
    Const(ConstDecl<'arena>),
    Def(DefDecl<'arena>),
    Nominal(NominalDecl<'arena>),
}

#[derive(Debug, Clone, Copy)]
pub struct Decl<'arena> {
    pub line: usize,
    pub col: usize,
    pub kind: DeclKind<'arena>,
}
