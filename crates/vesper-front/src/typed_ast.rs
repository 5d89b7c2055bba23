//! Typed Core AST: the core AST (C6) after type inference (C9), with a
//! resolved [`Type`] attached to every expression node (spec §3
//! "Typed Core AST", §4.6 "annotating every expression with its
//! inferred `Type`").
//!
//! Shaped like [`crate::core_ast`] one-for-one, plus a `ty` field on
//! every expression and the final [`Scheme`] on every binding — this is
//! what the excluded code generator (spec §6) consumes.

use crate::intern::StringId;
use crate::source::Span;
use crate::syntax::{BinOp, Ident, Literal, Pattern, UnaryOp};
use crate::types::{Scheme, Type};

#[derive(Debug, Clone)]
pub struct TypedModule {
    pub declarations: Vec<TypedDecl>,
}

#[derive(Debug, Clone)]
pub enum TypedDecl {
    Let {
        span: Span,
        name: Ident,
        scheme: Scheme,
        value: TypedExpr,
    },
    LetRec {
        span: Span,
        bindings: Vec<(Ident, Scheme, TypedExpr)>,
    },
    TypeDecl {
        span: Span,
        name: Ident,
        params: Vec<Ident>,
    },
    External {
        span: Span,
        name: Ident,
        scheme: Scheme,
        js_name: StringId,
        import_path: Option<StringId>,
    },
}

#[derive(Debug, Clone)]
pub struct TypedExpr {
    pub span: Span,
    pub ty: Type,
    pub kind: Box<TypedExprKind>,
}

impl TypedExpr {
    #[must_use]
    pub fn new(span: Span, ty: Type, kind: TypedExprKind) -> Self {
        Self { span, ty, kind: Box::new(kind) }
    }
}

#[derive(Debug, Clone)]
pub struct TypedMatchArm {
    pub pattern: Pattern,
    pub guard: Option<TypedExpr>,
    pub body: TypedExpr,
}

#[derive(Debug, Clone)]
pub enum TypedExprKind {
    Literal(Literal),
    Var(Ident),
    Let {
        name: Ident,
        scheme: Scheme,
        value: TypedExpr,
        body: TypedExpr,
    },
    LetRec {
        bindings: Vec<(Ident, Scheme, TypedExpr)>,
        body: TypedExpr,
    },
    Lambda {
        params: Vec<(Ident, Type)>,
        body: TypedExpr,
    },
    App {
        callee: TypedExpr,
        args: Vec<TypedExpr>,
    },
    Match {
        scrutinee: TypedExpr,
        arms: Vec<TypedMatchArm>,
    },
    Record {
        fields: Vec<(Ident, TypedExpr)>,
    },
    RecordUpdate {
        base: TypedExpr,
        fields: Vec<(Ident, TypedExpr)>,
    },
    Variant {
        ctor: Ident,
        args: Vec<TypedExpr>,
    },
    FieldAccess {
        target: TypedExpr,
        field: Ident,
    },
    BinOp {
        op: BinOp,
        lhs: TypedExpr,
        rhs: TypedExpr,
    },
    UnaryOp {
        op: UnaryOp,
        operand: TypedExpr,
    },
    RefNew(TypedExpr),
    RefDeref(TypedExpr),
    RefAssign {
        target: TypedExpr,
        value: TypedExpr,
    },
    External(Ident),
    Block(Vec<TypedExpr>),
}
