//! Desugarer (C7, spec §4.5): Surface AST → Core AST.
//!
//! Lowers every surface shorthand the core form cannot represent
//! directly: `if/else` into a boolean `match`, `|>` into an ordinary
//! application, record update into a [`crate::core_ast::CoreExprKind::RecordUpdate`]
//! the typechecker resolves via row unification, `let rec … and …` into
//! `LetRec`, destructuring `let` into either a continuation `match`
//! (inside a block, where a body already exists to wrap) or a synthetic
//! per-name projection (at module scope, where it doesn't), and string
//! concatenation into a call to a builtin.
//!
//! Grounded on the shape of the teacher's now-removed `prepare.rs`
//! lowering passes: a small struct threading a single mutable resource
//! (there, scope state; here, the interner for synthetic names) through
//! a recursive walk that rewrites surface constructs into a smaller core
//! form ahead of the rest of the pipeline.

use crate::core_ast::{CoreDecl, CoreExpr, CoreExprKind, CoreMatchArm, CoreModule, RefOp};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::intern::Interner;
use crate::source::Span;
use crate::syntax::{BinOp, BlockStmt, Declaration, Expr, ExprKind, ExportKind, Ident, ImportKind, Literal, Module, Pattern, PatternKind};

/// The builtin external name the desugarer rewrites `a & b` into. The
/// pipeline is responsible for seeding the FFI table with a matching
/// `(String, String) -> String` overload before typechecking.
pub const BUILTIN_CONCAT: &str = "__builtin_string_concat";

struct Desugarer<'a> {
    interner: &'a mut Interner,
    tmp_counter: u32,
}

/// Lowers a parsed [`Module`] into a [`CoreModule`]. Fatal per spec §7 —
/// desugaring failures indicate inputs the surface grammar admitted that
/// the core form structurally cannot represent.
pub fn desugar(module: Module, interner: &mut Interner) -> Result<CoreModule, Diagnostic> {
    check_import_shadowing(&module, interner)?;
    let mut d = Desugarer { interner, tmp_counter: 0 };
    let mut declarations = Vec::new();
    for decl in module.declarations {
        declarations.extend(d.desugar_decl(decl)?);
    }
    for export in module.exports {
        if let ExportKind::Declaration(decl) = export.kind {
            declarations.extend(d.desugar_decl(*decl)?);
        }
    }
    Ok(CoreModule { declarations })
}

/// spec §4.5 "Shadowing and duplicates": an import shadowed by a local
/// declaration is `VF5003`. Checked against the surface AST, ahead of
/// lowering, since the core form no longer carries import information.
fn check_import_shadowing(module: &Module, interner: &Interner) -> Result<(), Diagnostic> {
    let mut imported = std::collections::HashMap::new();
    for import in &module.imports {
        match &import.kind {
            ImportKind::Named(names) => {
                for name in names {
                    imported.entry(name.name).or_insert(*name);
                }
            }
            ImportKind::Star(alias) => {
                imported.entry(alias.name).or_insert(*alias);
            }
        }
    }
    if imported.is_empty() {
        return Ok(());
    }
    for decl in &module.declarations {
        let bound: Vec<Ident> = match decl {
            Declaration::Let { pattern, .. } => pattern_vars(pattern),
            Declaration::External { name, .. } => vec![*name],
            Declaration::TypeDecl { .. } => Vec::new(),
        };
        for ident in bound {
            if imported.contains_key(&ident.name) {
                let rendered = interner.resolve(ident.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF5003, ident.span, &[("name", &rendered)]));
            }
        }
    }
    Ok(())
}

impl Desugarer<'_> {
    fn fresh_ident(&mut self, span: Span) -> Ident {
        let name = format!("__tmp{}", self.tmp_counter);
        self.tmp_counter += 1;
        Ident { span, name: self.interner.intern(&name) }
    }

    fn desugar_decl(&mut self, decl: Declaration) -> Result<Vec<CoreDecl>, Diagnostic> {
        match decl {
            Declaration::Let { span, rec, mutable, pattern, annot, value, and_bindings } => {
                let _ = mutable; // validated by the parser (VF2003/VF2004) before desugaring ever sees it
                let value = self.desugar_expr(value)?;
                if rec {
                    let mut bindings = vec![(self.require_var(&pattern)?, value)];
                    for (p, v) in and_bindings {
                        let name = self.require_var(&p)?;
                        bindings.push((name, self.desugar_expr(v)?));
                    }
                    return Ok(vec![CoreDecl::LetRec { span, bindings }]);
                }
                if let PatternKind::Var(name) = *pattern.kind {
                    return Ok(vec![CoreDecl::Let { span, name, annot, value }]);
                }
                // Destructuring at module scope: no enclosing body to wrap in a
                // `match`, so bind the value once under a synthetic name and
                // project each pattern variable out of it independently, one
                // `match` per name (the pattern is cloned into each arm since
                // every projection needs its own copy).
                let tmp = self.fresh_ident(pattern.span);
                let mut out = vec![CoreDecl::Let { span, name: tmp, annot, value }];
                for bound in pattern_vars(&pattern) {
                    let scrutinee = CoreExpr::new(tmp.span, CoreExprKind::Var(tmp));
                    let body = CoreExpr::new(bound.span, CoreExprKind::Var(bound));
                    out.push(CoreDecl::Let {
                        span: bound.span,
                        name: bound,
                        annot: None,
                        value: CoreExpr::new(
                            bound.span,
                            CoreExprKind::Match { scrutinee, arms: vec![CoreMatchArm { pattern: pattern.clone(), guard: None, body }] },
                        ),
                    });
                }
                Ok(out)
            }
            Declaration::TypeDecl { span, name, params, body } => Ok(vec![CoreDecl::TypeDecl { span, name, params, body }]),
            Declaration::External { span, name, scheme, js_name, import_path } => {
                Ok(vec![CoreDecl::External { span, name, scheme, js_name, import_path }])
            }
        }
    }

    fn require_var(&self, pattern: &Pattern) -> Result<Ident, Diagnostic> {
        match &*pattern.kind {
            PatternKind::Var(name) => Ok(*name),
            // Reuses VF2004 ("mutable/recursive binding must be a simple
            // variable pattern") — the underlying constraint is identical:
            // this binding form has no destructuring body to wrap in a
            // `match`, so only a bare name is representable.
            _ => Err(Diagnostic::create(DiagnosticCode::VF2004, pattern.span, &[])),
        }
    }

    fn desugar_expr(&mut self, expr: Expr) -> Result<CoreExpr, Diagnostic> {
        let span = expr.span;
        let kind = *expr.kind;
        let core_kind = match kind {
            ExprKind::Literal(lit) => CoreExprKind::Literal(lit),
            ExprKind::Var(ident) => CoreExprKind::Var(ident),
            ExprKind::Lambda { params, return_annot, body } => self.desugar_lambda(span, params, return_annot, body)?,
            ExprKind::App { callee, args } => {
                let callee = self.desugar_expr(callee)?;
                let args = args.into_iter().map(|a| self.desugar_expr(a)).collect::<Result<_, _>>()?;
                CoreExprKind::App { callee, args }
            }
            ExprKind::If { cond, then_branch, else_branch } => {
                let scrutinee = self.desugar_expr(cond)?;
                let then_core = self.desugar_expr(then_branch)?;
                let else_core = self.desugar_expr(else_branch)?;
                let true_pat = Pattern::new(span, PatternKind::Literal(Literal::Bool(true)));
                let false_pat = Pattern::new(span, PatternKind::Literal(Literal::Bool(false)));
                CoreExprKind::Match {
                    scrutinee,
                    arms: vec![
                        CoreMatchArm { pattern: true_pat, guard: None, body: then_core },
                        CoreMatchArm { pattern: false_pat, guard: None, body: else_core },
                    ],
                }
            }
            ExprKind::Match { scrutinee, arms } => {
                let scrutinee = self.desugar_expr(scrutinee)?;
                let arms = arms
                    .into_iter()
                    .map(|arm| {
                        Ok(CoreMatchArm {
                            pattern: arm.pattern,
                            guard: arm.guard.map(|g| self.desugar_expr(g)).transpose()?,
                            body: self.desugar_expr(arm.body)?,
                        })
                    })
                    .collect::<Result<_, Diagnostic>>()?;
                CoreExprKind::Match { scrutinee, arms }
            }
            ExprKind::Block(stmts) => return self.desugar_block(span, stmts),
            ExprKind::Record { fields, spread } => {
                let mut core_fields = Vec::with_capacity(fields.len());
                for f in fields {
                    let value = match f.value {
                        Some(v) => self.desugar_expr(v)?,
                        None => CoreExpr::new(f.name.span, CoreExprKind::Var(f.name)),
                    };
                    core_fields.push((f.name, value));
                }
                match spread {
                    Some(base) => CoreExprKind::RecordUpdate { base: self.desugar_expr(base)?, fields: core_fields },
                    None => CoreExprKind::Record { fields: core_fields },
                }
            }
            ExprKind::ListLit(elems) => self.desugar_list_lit(span, elems)?,
            ExprKind::Tuple(elems) => {
                // Tuples are nominal-free product values; represented as an
                // anonymous variant application so the typechecker can give
                // them `TTuple` without a dedicated core node.
                let args = elems.into_iter().map(|e| self.desugar_expr(e)).collect::<Result<_, _>>()?;
                CoreExprKind::Variant { ctor: Ident { span, name: self.interner.intern("__Tuple") }, args }
            }
            ExprKind::FieldAccess { target, field } => CoreExprKind::FieldAccess { target: self.desugar_expr(target)?, field },
            ExprKind::BinOp { op: BinOp::Concat, lhs, rhs } => {
                let callee = CoreExpr::new(span, CoreExprKind::External(Ident { span, name: self.interner.intern(BUILTIN_CONCAT) }));
                let args = smallvec::smallvec![self.desugar_expr(lhs)?, self.desugar_expr(rhs)?];
                CoreExprKind::App { callee, args }
            }
            ExprKind::BinOp { op, lhs, rhs } => CoreExprKind::BinOp { op, lhs: self.desugar_expr(lhs)?, rhs: self.desugar_expr(rhs)? },
            ExprKind::UnaryOp { op, operand } => CoreExprKind::UnaryOp { op, operand: self.desugar_expr(operand)? },
            ExprKind::Pipe { lhs, rhs } => return self.desugar_pipe(span, lhs, rhs),
            ExprKind::RefLit(inner) => CoreExprKind::RefOp(RefOp::New(self.desugar_expr(inner)?)),
            ExprKind::Deref(inner) => CoreExprKind::RefOp(RefOp::Deref(self.desugar_expr(inner)?)),
            ExprKind::Assign { target, value } => {
                CoreExprKind::RefOp(RefOp::Assign { target: self.desugar_expr(target)?, value: self.desugar_expr(value)? })
            }
            ExprKind::Unsafe(inner) => return self.desugar_expr(inner),
            ExprKind::Spread(_) => return Err(Diagnostic::create(DiagnosticCode::VF3101, span, &[])),
        };
        Ok(CoreExpr::new(span, core_kind))
    }

    /// `expr |> f(args)` → `f(args, expr)`; `expr |> f` → `f(expr)`.
    fn desugar_pipe(&mut self, span: Span, lhs: Expr, rhs: Expr) -> Result<CoreExpr, Diagnostic> {
        let lhs_core = self.desugar_expr(lhs)?;
        match *rhs.kind {
            ExprKind::App { callee, args } => {
                let callee = self.desugar_expr(callee)?;
                let mut core_args: smallvec::SmallVec<[CoreExpr; 4]> = args.into_iter().map(|a| self.desugar_expr(a)).collect::<Result<_, _>>()?;
                core_args.push(lhs_core);
                Ok(CoreExpr::new(span, CoreExprKind::App { callee, args: core_args }))
            }
            other => {
                let callee = self.desugar_expr(Expr::new(rhs.span, other))?;
                Ok(CoreExpr::new(span, CoreExprKind::App { callee, args: smallvec::smallvec![lhs_core] }))
            }
        }
    }

    fn desugar_lambda(
        &mut self,
        span: Span,
        params: smallvec::SmallVec<[crate::syntax::Param; 4]>,
        return_annot: Option<crate::syntax::TypeExpr>,
        body: Expr,
    ) -> Result<CoreExprKind, Diagnostic> {
        let mut core_params = smallvec::SmallVec::new();
        let mut wraps: Vec<Pattern> = Vec::new();
        for param in params {
            match *param.pattern.kind {
                PatternKind::Var(name) => core_params.push((name, param.annot)),
                _ => {
                    let tmp = self.fresh_ident(param.pattern.span);
                    core_params.push((tmp, param.annot));
                    wraps.push(param.pattern);
                }
            }
        }
        let mut core_body = self.desugar_expr(body)?;
        // Destructured params are matched innermost-first against their own
        // synthetic temporary, each wrapping everything already built.
        for (pattern, (tmp, _)) in wraps.into_iter().rev().zip(core_params.iter().rev()) {
            let scrutinee = CoreExpr::new(tmp.span, CoreExprKind::Var(*tmp));
            core_body = CoreExpr::new(span, CoreExprKind::Match { scrutinee, arms: vec![CoreMatchArm { pattern, guard: None, body: core_body }] });
        }
        Ok(CoreExprKind::Lambda { params: core_params, return_annot, body: core_body })
    }

    fn desugar_list_lit(&mut self, span: Span, elems: Vec<Expr>) -> Result<CoreExprKind, Diagnostic> {
        let mut args = Vec::with_capacity(elems.len());
        for e in elems {
            if matches!(&*e.kind, ExprKind::Spread(_)) {
                return Err(Diagnostic::create(DiagnosticCode::VF3101, e.span, &[]));
            }
            args.push(self.desugar_expr(e)?);
        }
        Ok(CoreExprKind::Variant { ctor: Ident { span, name: self.interner.intern("__List") }, args })
    }

    fn desugar_block(&mut self, span: Span, mut stmts: Vec<BlockStmt>) -> Result<CoreExpr, Diagnostic> {
        if stmts.is_empty() {
            return Ok(CoreExpr::new(span, CoreExprKind::Variant { ctor: Ident { span, name: self.interner.intern("__Tuple") }, args: Vec::new() }));
        }
        let stmt = stmts.remove(0);
        match stmt {
            BlockStmt::Expr(e) => {
                let head = self.desugar_expr(e)?;
                if stmts.is_empty() {
                    return Ok(head);
                }
                let rest = self.desugar_block(span, stmts)?;
                Ok(CoreExpr::new(span, CoreExprKind::Block(vec![head, rest])))
            }
            BlockStmt::Let { span: lspan, rec, mutable, pattern, annot, value, and_bindings } => {
                let _ = (annot, mutable);
                let value_core = self.desugar_expr(value)?;
                if rec {
                    let mut bindings = vec![(self.require_var(&pattern)?, value_core)];
                    for (p, v) in and_bindings {
                        let name = self.require_var(&p)?;
                        bindings.push((name, self.desugar_expr(v)?));
                    }
                    let body = self.desugar_block(span, stmts)?;
                    return Ok(CoreExpr::new(lspan, CoreExprKind::LetRec { bindings, body }));
                }
                if let PatternKind::Var(name) = *pattern.kind {
                    let body = self.desugar_block(span, stmts)?;
                    return Ok(CoreExpr::new(lspan, CoreExprKind::Let { name, value: value_core, body }));
                }
                let body = self.desugar_block(span, stmts)?;
                Ok(CoreExpr::new(lspan, CoreExprKind::Match { scrutinee: value_core, arms: vec![CoreMatchArm { pattern, guard: None, body }] }))
            }
        }
    }
}

/// Collects every variable bound by a pattern, in left-to-right order.
/// Or-patterns are assumed (by the typechecker's `VF4403` check) to bind
/// an identical name set across alternatives, so only the first is walked.
fn pattern_vars(pattern: &Pattern) -> Vec<Ident> {
    let mut out = Vec::new();
    collect_pattern_vars(pattern, &mut out);
    out
}

fn collect_pattern_vars(pattern: &Pattern, out: &mut Vec<Ident>) {
    match &*pattern.kind {
        PatternKind::Wildcard | PatternKind::Literal(_) => {}
        PatternKind::Var(name) => out.push(*name),
        PatternKind::Constructor { args, .. } => args.iter().for_each(|a| collect_pattern_vars(a, out)),
        PatternKind::Record { fields, .. } => fields.iter().for_each(|f| match &f.pattern {
            Some(p) => collect_pattern_vars(p, out),
            None => out.push(f.name),
        }),
        PatternKind::Tuple(elems) | PatternKind::List(elems) => elems.iter().for_each(|p| collect_pattern_vars(p, out)),
        PatternKind::Or(alts) => {
            if let Some(first) = alts.first() {
                collect_pattern_vars(first, out);
            }
        }
        PatternKind::Typed { pattern, .. } => collect_pattern_vars(pattern, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    fn desugar_source(source: &str) -> CoreModule {
        let mut interner = Interner::new();
        let tokens = crate::lexer::tokenize(source, "<test>", &mut interner).expect("lex ok");
        let mut errors = Vec::new();
        let module = crate::parser::parse(&tokens, &interner, &mut errors, 16, 35).expect("parse ok");
        desugar(module, &mut interner).expect("desugar ok")
    }

    #[test]
    fn lowers_if_else_into_a_boolean_match() {
        let core = desugar_source("let x = if true then 1 else 2\n");
        let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a Let decl") };
        assert!(matches!(&*value.kind, CoreExprKind::Match { .. }));
    }

    #[test]
    fn lowers_pipe_into_application() {
        let core = desugar_source("let f = (x) => x\nlet y = 1 |> f\n");
        let CoreDecl::Let { value, .. } = &core.declarations[1] else { panic!("expected a Let decl") };
        assert!(matches!(&*value.kind, CoreExprKind::App { .. }));
    }

    #[test]
    fn rejects_spread_inside_a_list_literal() {
        let mut interner = Interner::new();
        let tokens = crate::lexer::tokenize("let xs = [...ys, 1]\n", "<test>", &mut interner).expect("lex ok");
        let mut errors = Vec::new();
        let module = crate::parser::parse(&tokens, &interner, &mut errors, 16, 35).expect("parse ok");
        let result = desugar(module, &mut interner);
        assert!(result.is_err());
    }
}
