//! Surface AST (C4, spec §3): the tree produced directly by the parser,
//! retaining every syntactic sugar the desugarer (C7) later removes.
//!
//! Every node owns its [`Span`], following the teacher's `Identifier`
//! convention in `expressions.rs` (`position: CodeRange` alongside the
//! node's own data) rather than a side-table keyed by node id.

use smallvec::SmallVec;

use crate::intern::StringId;
use crate::source::Span;

/// A name reference or binding occurrence, carrying its own span.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ident {
    pub span: Span,
    pub name: StringId,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Module {
    pub imports: Vec<Import>,
    pub declarations: Vec<Declaration>,
    pub exports: Vec<Export>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Import {
    pub span: Span,
    pub path: StringId,
    pub kind: ImportKind,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ImportKind {
    Named(Vec<Ident>),
    Star(Ident),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Export {
    pub span: Span,
    pub kind: ExportKind,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ExportKind {
    Named { names: Vec<Ident>, from: Option<StringId> },
    Declaration(Box<Declaration>),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Declaration {
    Let {
        span: Span,
        rec: bool,
        mutable: bool,
        pattern: Pattern,
        annot: Option<TypeExpr>,
        value: Expr,
        /// The `and`-chained bindings of a `let rec f = … and g = …` group.
        and_bindings: Vec<(Pattern, Expr)>,
    },
    TypeDecl {
        span: Span,
        name: Ident,
        params: Vec<Ident>,
        body: TypeDeclBody,
    },
    External {
        span: Span,
        name: Ident,
        scheme: TypeExpr,
        js_name: StringId,
        import_path: Option<StringId>,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum TypeDeclBody {
    Alias(TypeExpr),
    Variants(Vec<VariantAlt>),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct VariantAlt {
    pub span: Span,
    pub ctor: Ident,
    pub args: Vec<TypeExpr>,
}

/// An expression node, owning its span alongside its shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Expr {
    pub span: Span,
    pub kind: Box<ExprKind>,
}

impl Expr {
    #[must_use]
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Self { span, kind: Box::new(kind) }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(StringId),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
    Shl,
    Shr,
    Cons,
}

/// The only prefix arithmetic operator; boolean negation does not exist
/// in this language's operator set (spec §3/§4.4 — `!` is reserved for
/// `Ref` dereference, modeled as `ExprKind::Deref` instead).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnaryOp {
    Neg,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Param {
    pub pattern: Pattern,
    pub annot: Option<TypeExpr>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecordField {
    pub name: Ident,
    /// `None` for shorthand `{ name }`, equivalent to `{ name: name }`.
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

/// One statement inside a `Block`. A local `let` reuses the exact shape
/// of a top-level `Declaration::Let` (spec §4.5's destructuring-`let`
/// lowering reads as classic ML `let … in …`, which only makes sense if
/// `let` can appear mid-block, not only at module scope); everything
/// after it in the enclosing block becomes its implicit body once the
/// desugarer lowers it to `CoreExprKind::Let`/`LetRec`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum BlockStmt {
    Let {
        span: Span,
        rec: bool,
        mutable: bool,
        pattern: Pattern,
        annot: Option<TypeExpr>,
        value: Expr,
        and_bindings: Vec<(Pattern, Expr)>,
    },
    Expr(Expr),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    Var(Ident),
    Lambda {
        params: SmallVec<[Param; 4]>,
        return_annot: Option<TypeExpr>,
        body: Expr,
    },
    App {
        callee: Expr,
        args: SmallVec<[Expr; 4]>,
    },
    If {
        cond: Expr,
        then_branch: Expr,
        else_branch: Expr,
    },
    Match {
        scrutinee: Expr,
        arms: Vec<MatchArm>,
    },
    Block(Vec<BlockStmt>),
    Record {
        fields: Vec<RecordField>,
        spread: Option<Expr>,
    },
    ListLit(Vec<Expr>),
    Tuple(Vec<Expr>),
    FieldAccess {
        target: Expr,
        field: Ident,
    },
    BinOp {
        op: BinOp,
        lhs: Expr,
        rhs: Expr,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Expr,
    },
    Pipe {
        lhs: Expr,
        rhs: Expr,
    },
    RefLit(Expr),
    Deref(Expr),
    Assign {
        target: Expr,
        value: Expr,
    },
    Unsafe(Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Pattern {
    pub span: Span,
    pub kind: Box<PatternKind>,
}

impl Pattern {
    #[must_use]
    pub fn new(span: Span, kind: PatternKind) -> Self {
        Self { span, kind: Box::new(kind) }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecordPatternField {
    pub name: Ident,
    pub pattern: Option<Pattern>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum PatternKind {
    Wildcard,
    Var(Ident),
    Literal(Literal),
    Constructor { name: Ident, args: Vec<Pattern> },
    Record { fields: Vec<RecordPatternField>, open: bool },
    Tuple(Vec<Pattern>),
    List(Vec<Pattern>),
    Or(Vec<Pattern>),
    Typed { pattern: Pattern, annot: TypeExpr },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TypeExpr {
    pub span: Span,
    pub kind: Box<TypeExprKind>,
}

impl TypeExpr {
    #[must_use]
    pub fn new(span: Span, kind: TypeExprKind) -> Self {
        Self { span, kind: Box::new(kind) }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecordTypeField {
    pub name: Ident,
    pub annot: TypeExpr,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum TypeExprKind {
    TypeVar(Ident),
    TypeCon { name: Ident, args: Vec<TypeExpr> },
    FunType { params: Vec<TypeExpr>, ret: TypeExpr },
    RecordType { fields: Vec<RecordTypeField>, open: bool },
    TupleType(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
}
