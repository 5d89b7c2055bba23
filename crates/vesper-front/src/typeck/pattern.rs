//! Pattern inference (spec §4.6 "Pattern typing", §5 "Patterns").
//!
//! Mirrors `expr.rs`'s shape: every [`PatternKind`] variant gets a type
//! and a set of bound names. Bindings are first collected into a scratch
//! list (so an [`PatternKind::Or`] can compare both sides' name sets
//! before anything is committed to the real environment) and only then
//! installed — grounded on the same two-phase approach the retrieval
//! pack's `infer` modules use for `match` arms.

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::intern::StringId;
use crate::source::Span;
use crate::syntax::{Literal, Pattern, PatternKind};
use crate::types::Type;

use super::Checker;

impl Checker<'_> {
    /// Like [`Checker::unify_numeric_aware`], but remaps a generic
    /// `VF4020` type mismatch to `VF4404` ("pattern cannot match a value
    /// of type") — the code spec §4.6 reserves for a pattern's own shape
    /// conflicting with the scrutinee, as distinct from a mismatch found
    /// while checking an ordinary expression.
    fn unify_pattern(&mut self, expected: &Type, found: &Type, span: Span) -> Result<(), Diagnostic> {
        match self.unify_numeric_aware(expected, found, span) {
            Ok(()) => Ok(()),
            Err(diag) if diag.code == DiagnosticCode::VF4020 => {
                let rendered = self.render(expected);
                Err(Diagnostic::create(DiagnosticCode::VF4404, span, &[("expected", &rendered)]))
            }
            Err(diag) => Err(diag),
        }
    }

    /// Infers `pattern`'s type against `expected` and binds its variables
    /// into the live environment. `expected` is unified against the
    /// pattern's own inferred shape so literal/constructor patterns
    /// narrow (rather than dictate) the scrutinee's type.
    pub(crate) fn infer_pattern(&mut self, pattern: &Pattern, expected: &Type) -> Result<(), Diagnostic> {
        let mut bindings = Vec::new();
        self.infer_pattern_into(pattern, expected, &mut bindings)?;
        let mut seen = std::collections::HashSet::new();
        for (name, ty) in bindings {
            if !seen.insert(name.name) {
                let rendered = self.resolve_name(name.name);
                return Err(Diagnostic::create(DiagnosticCode::VF4402, name.span, &[("name", &rendered)]));
            }
            self.global.env.bind(name.name, crate::types::Scheme::monomorphic(ty));
        }
        Ok(())
    }

    fn infer_pattern_into(&mut self, pattern: &Pattern, expected: &Type, bindings: &mut Vec<(crate::syntax::Ident, Type)>) -> Result<(), Diagnostic> {
        match &*pattern.kind {
            PatternKind::Wildcard => Ok(()),
            PatternKind::Var(ident) => {
                bindings.push((*ident, expected.clone()));
                Ok(())
            }
            PatternKind::Literal(lit) => {
                let lit_ty = self.literal_type(lit);
                self.unify_pattern(expected, &lit_ty, pattern.span)
            }
            PatternKind::Constructor { name, args } => self.infer_constructor_pattern(pattern.span, name, args, expected, bindings),
            PatternKind::Record { fields, open } => self.infer_record_pattern(pattern.span, fields, *open, expected, bindings),
            PatternKind::Tuple(elems) => self.infer_tuple_pattern(pattern.span, elems, expected, bindings),
            PatternKind::List(elems) => self.infer_list_pattern(elems, expected, bindings),
            PatternKind::Or(alts) => self.infer_or_pattern(pattern.span, alts, expected, bindings),
            PatternKind::Typed { pattern: inner, annot } => {
                let annot_ty = self.lower_type_expr(annot, &indexmap::IndexMap::new())?;
                self.unify_numeric_aware(expected, &annot_ty, pattern.span)?;
                self.infer_pattern_into(inner, &annot_ty, bindings)
            }
        }
    }

    fn literal_type(&mut self, lit: &Literal) -> Type {
        match lit {
            Literal::Int(_) => Type::Con(self.builtin.int),
            Literal::Float(_) => Type::Con(self.builtin.float),
            Literal::Str(_) => Type::Con(self.builtin.string),
            Literal::Bool(_) => Type::Con(self.builtin.bool_),
        }
    }

    fn infer_constructor_pattern(
        &mut self,
        span: Span,
        name: &crate::syntax::Ident,
        args: &[Pattern],
        expected: &Type,
        bindings: &mut Vec<(crate::syntax::Ident, Type)>,
    ) -> Result<(), Diagnostic> {
        let Some(info) = self.global.ctors.lookup(name.name).cloned() else {
            let rendered = self.resolve_name(name.name);
            return Err(Diagnostic::create(DiagnosticCode::VF4600, span, &[("name", &rendered)]));
        };
        if info.args.len() != args.len() {
            let rendered = self.resolve_name(name.name);
            return Err(Diagnostic::create(
                DiagnosticCode::VF4602,
                span,
                &[("name", &rendered), ("expected", &info.args.len().to_string()), ("found", &args.len().to_string())],
            ));
        }
        let instantiated_parent = self.arena.instantiate(&info.parent, self.level);
        self.unify_pattern(expected, &instantiated_parent, span)?;
        for (arg_pat, arg_ty) in args.iter().zip(&info.args) {
            let instantiated_arg = self.instantiate_ctor_field(arg_ty, &info.parent, &instantiated_parent);
            self.infer_ctor_arg_pattern(name, arg_pat, &instantiated_arg, bindings)?;
        }
        Ok(())
    }

    /// Re-instantiates one constructor field type against the same fresh
    /// variables used for the parent, so e.g. `Some(x)` binds `x` at
    /// `Option<a>`'s actual instantiated `a`, not a disconnected fresh
    /// copy of it.
    fn instantiate_ctor_field(&mut self, field_ty: &Type, scheme: &crate::types::Scheme, _instantiated_parent: &Type) -> Type {
        let wrapper = crate::types::Scheme { vars: scheme.vars.clone(), ty: field_ty.clone() };
        self.arena.instantiate(&wrapper, self.level)
    }

    /// Checks one constructor-pattern argument against its field type.
    /// A literal argument has a type independent of `expected` (spec
    /// §4.6), so a mismatch there is reported as `VF4601` ("constructor
    /// argument has the wrong type") rather than the generic `VF4404` a
    /// bare `infer_pattern_into` would raise — the distinction spec §9's
    /// running prose draws between a pattern's own shape being wrong and
    /// one of a constructor's arguments being wrong. Every other pattern
    /// kind either binds unconditionally (`Var`/`Wildcard`) or carries a
    /// more specific code of its own (unknown nested constructor, or-arm
    /// name mismatch, duplicate binding), so those pass through unchanged.
    fn infer_ctor_arg_pattern(
        &mut self,
        ctor_name: &crate::syntax::Ident,
        arg_pat: &Pattern,
        expected: &Type,
        bindings: &mut Vec<(crate::syntax::Ident, Type)>,
    ) -> Result<(), Diagnostic> {
        if let PatternKind::Literal(lit) = &*arg_pat.kind {
            let lit_ty = self.literal_type(lit);
            if self.unify_numeric_aware(expected, &lit_ty, arg_pat.span).is_err() {
                let rendered = self.resolve_name(ctor_name.name);
                let expected_rendered = self.render(expected);
                let found_rendered = self.render(&lit_ty);
                return Err(Diagnostic::create(
                    DiagnosticCode::VF4601,
                    arg_pat.span,
                    &[("name", &rendered), ("expected", &expected_rendered), ("found", &found_rendered)],
                ));
            }
            return Ok(());
        }
        self.infer_pattern_into(arg_pat, expected, bindings)
    }

    fn infer_record_pattern(
        &mut self,
        span: Span,
        fields: &[crate::syntax::RecordPatternField],
        open: bool,
        expected: &Type,
        bindings: &mut Vec<(crate::syntax::Ident, Type)>,
    ) -> Result<(), Diagnostic> {
        let mut map = indexmap::IndexMap::new();
        let mut field_patterns = Vec::with_capacity(fields.len());
        for f in fields {
            let var = Type::Var(self.arena.fresh(self.level));
            map.insert(f.name.name, var.clone());
            field_patterns.push((f.name, f.pattern.clone(), var));
        }
        let tail = if open { Some(Box::new(Type::Var(self.arena.fresh_row(self.level)))) } else { None };
        let record_ty = Type::Record(map, tail);
        self.unify_numeric_aware(expected, &record_ty, span)?;
        for (name, pattern, ty) in field_patterns {
            match pattern {
                Some(p) => self.infer_pattern_into(&p, &ty, bindings)?,
                None => bindings.push((name, ty)),
            }
        }
        Ok(())
    }

    fn infer_tuple_pattern(&mut self, span: Span, elems: &[Pattern], expected: &Type, bindings: &mut Vec<(crate::syntax::Ident, Type)>) -> Result<(), Diagnostic> {
        let elem_vars: Vec<Type> = elems.iter().map(|_| Type::Var(self.arena.fresh(self.level))).collect();
        self.unify_numeric_aware(expected, &Type::Tuple(elem_vars.clone()), span)?;
        for (p, ty) in elems.iter().zip(&elem_vars) {
            self.infer_pattern_into(p, ty, bindings)?;
        }
        Ok(())
    }

    /// List patterns are fixed-arity (spec §5, §9: lists desugar to flat
    /// `__List` variants rather than cons-chains, so a list pattern can
    /// only match a list literal of exactly the same length — open
    /// head/tail list patterns are not part of this language's pattern
    /// grammar).
    fn infer_list_pattern(&mut self, elems: &[Pattern], expected: &Type, bindings: &mut Vec<(crate::syntax::Ident, Type)>) -> Result<(), Diagnostic> {
        let elem_ty = Type::Var(self.arena.fresh(self.level));
        let list_ty = Type::App(Box::new(Type::Con(self.builtin.list)), vec![elem_ty.clone()]);
        let span = elems.first().map_or_else(|| Span::point(crate::source::Location::start_of_file(StringId::from_index(0))), |p| p.span);
        self.unify_numeric_aware(expected, &list_ty, span)?;
        for p in elems {
            self.infer_pattern_into(p, &elem_ty, bindings)?;
        }
        Ok(())
    }

    fn infer_or_pattern(&mut self, span: Span, alts: &[Pattern], expected: &Type, bindings: &mut Vec<(crate::syntax::Ident, Type)>) -> Result<(), Diagnostic> {
        let mut first_names: Option<Vec<StringId>> = None;
        for (i, alt) in alts.iter().enumerate() {
            let mut alt_bindings = Vec::new();
            self.infer_pattern_into(alt, expected, &mut alt_bindings)?;
            let mut names: Vec<StringId> = alt_bindings.iter().map(|(n, _)| n.name).collect();
            names.sort_unstable();
            match &first_names {
                None => first_names = Some(names),
                Some(expected_names) => {
                    if expected_names != &names {
                        return Err(Diagnostic::create(DiagnosticCode::VF4403, span, &[]));
                    }
                }
            }
            // Every alternative binds the same names (checked above), so
            // only the first contributes bindings to the caller —
            // otherwise the same name would appear to be bound once per
            // alternative and falsely trip the duplicate-binding check.
            if i == 0 {
                bindings.extend(alt_bindings);
            }
        }
        Ok(())
    }
}
