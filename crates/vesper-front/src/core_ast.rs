//! Core AST (C6, spec §3): the minimal desugared form the typechecker
//! (C9) consumes. Every surface-level shorthand (`if`/`else`, `|>`,
//! record update, `let rec … and …`, tuple-pattern `let`, string
//! concatenation) has already been lowered away by the desugarer (C7).

use smallvec::SmallVec;

use crate::intern::StringId;
use crate::source::Span;
use crate::syntax::{BinOp, Ident, Literal, UnaryOp};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CoreModule {
    pub declarations: Vec<CoreDecl>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum CoreDecl {
    Let {
        span: Span,
        name: Ident,
        annot: Option<crate::syntax::TypeExpr>,
        value: CoreExpr,
    },
    LetRec {
        span: Span,
        bindings: Vec<(Ident, CoreExpr)>,
    },
    TypeDecl {
        span: Span,
        name: Ident,
        params: Vec<Ident>,
        body: crate::syntax::TypeDeclBody,
    },
    External {
        span: Span,
        name: Ident,
        scheme: crate::syntax::TypeExpr,
        js_name: StringId,
        import_path: Option<StringId>,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CoreExpr {
    pub span: Span,
    pub kind: Box<CoreExprKind>,
}

impl CoreExpr {
    #[must_use]
    pub fn new(span: Span, kind: CoreExprKind) -> Self {
        Self { span, kind: Box::new(kind) }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CoreMatchArm {
    pub pattern: crate::syntax::Pattern,
    pub guard: Option<CoreExpr>,
    pub body: CoreExpr,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum CoreExprKind {
    Literal(Literal),
    Var(Ident),
    Let {
        name: Ident,
        value: CoreExpr,
        body: CoreExpr,
    },
    LetRec {
        bindings: Vec<(Ident, CoreExpr)>,
        body: CoreExpr,
    },
    Lambda {
        params: SmallVec<[(Ident, Option<crate::syntax::TypeExpr>); 4]>,
        return_annot: Option<crate::syntax::TypeExpr>,
        body: CoreExpr,
    },
    App {
        callee: CoreExpr,
        args: SmallVec<[CoreExpr; 4]>,
    },
    Match {
        scrutinee: CoreExpr,
        arms: Vec<CoreMatchArm>,
    },
    Record {
        fields: Vec<(Ident, CoreExpr)>,
    },
    /// `{ ...base, f: v }`. The desugarer recognizes the surface spread
    /// shape but cannot expand it into a literal field list without
    /// knowing `base`'s row, which only the typechecker has — so the
    /// merge itself happens during row unification (spec §4.5/§4.6).
    RecordUpdate {
        base: CoreExpr,
        fields: Vec<(Ident, CoreExpr)>,
    },
    Variant {
        ctor: Ident,
        args: Vec<CoreExpr>,
    },
    FieldAccess {
        target: CoreExpr,
        field: Ident,
    },
    BinOp {
        op: BinOp,
        lhs: CoreExpr,
        rhs: CoreExpr,
    },
    UnaryOp {
        op: UnaryOp,
        operand: CoreExpr,
    },
    RefOp(RefOp),
    External(Ident),
    Block(Vec<CoreExpr>),
    /// A reserved-but-semantics-free `try`/`catch` node, kept only so the
    /// typechecker can reject it with `VF2501` rather than the parser
    /// needing to fabricate a meaning for it.
    ReservedUnsupported { keyword: &'static str },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum RefOp {
    New(CoreExpr),
    Deref(CoreExpr),
    Assign { target: CoreExpr, value: CoreExpr },
}
