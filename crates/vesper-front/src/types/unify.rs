//! Unification (spec §4.6 "Unification rules", §9 "Levels for
//! generalization"): first-order unification over [`Type`] with the
//! occurs check and rank-lowering on variable binding.
//!
//! The Int/Float-specific `VF4009` distinction (spec §4.6 "numeric
//! discipline") is not made here — a bare `Con` mismatch always reports
//! `VF4020`; the typechecker recognizes the Int/Float case and remaps
//! the code before surfacing it, since only the typechecker holds the
//! interned ids for the two builtin names.

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::intern::StringId;
use crate::source::Span;

use super::{Type, TypeArena, TypeVarId, VarKind};

type Render<'a> = &'a mut dyn FnMut(&mut TypeArena, &Type) -> String;

/// Unifies `a` and `b` in place, binding type variables in `arena` as
/// needed. `span` is attached to whatever mismatch diagnostic results;
/// `render` formats a `Type` for error messages (supplied by the
/// typechecker, which alone knows how to resolve `Con` names back to
/// source text).
pub fn unify(arena: &mut TypeArena, a: &Type, b: &Type, span: Span, render: Render<'_>) -> Result<(), Diagnostic> {
    let a = arena.resolve(a.clone());
    let b = arena.resolve(b.clone());
    match (&a, &b) {
        (Type::Var(x), Type::Var(y)) if x == y => Ok(()),
        (Type::Var(x), _) => bind_var(arena, *x, &b, span, render),
        (_, Type::Var(y)) => bind_var(arena, *y, &a, span, render),
        (Type::Con(x), Type::Con(y)) => {
            if x == y {
                Ok(())
            } else {
                let found_a = render(arena, &a);
                let found_b = render(arena, &b);
                Err(Diagnostic::create(DiagnosticCode::VF4020, span, &[("expected", &found_a), ("found", &found_b)]))
            }
        }
        (Type::App(h1, a1), Type::App(h2, a2)) => {
            unify(arena, h1, h2, span, render)?;
            if a1.len() != a2.len() {
                let name = render(arena, &a);
                return Err(Diagnostic::create(
                    DiagnosticCode::VF4022,
                    span,
                    &[("name", &name), ("expected", &a1.len().to_string()), ("found", &a2.len().to_string())],
                ));
            }
            for (x, y) in a1.iter().zip(a2.iter()) {
                unify(arena, x, y, span, render)?;
            }
            Ok(())
        }
        (Type::Fun(p1, r1), Type::Fun(p2, r2)) => {
            if p1.len() != p2.len() {
                return Err(Diagnostic::create(
                    DiagnosticCode::VF4021,
                    span,
                    &[("expected", &p1.len().to_string()), ("found", &p2.len().to_string())],
                ));
            }
            for (x, y) in p1.iter().zip(p2.iter()) {
                unify(arena, x, y, span, render)?;
            }
            unify(arena, r1, r2, span, render)
        }
        (Type::Tuple(e1), Type::Tuple(e2)) => {
            if e1.len() != e2.len() {
                return Err(Diagnostic::create(
                    DiagnosticCode::VF4026,
                    span,
                    &[("expected", &e1.len().to_string()), ("found", &e2.len().to_string())],
                ));
            }
            for (x, y) in e1.iter().zip(e2.iter()) {
                unify(arena, x, y, span, render)?;
            }
            Ok(())
        }
        (Type::Ref(x), Type::Ref(y)) => {
            let found_x = render(arena, x);
            unify(arena, x, y, span, render).map_err(|_| {
                let found_y = render(arena, y);
                Diagnostic::create(DiagnosticCode::VF4017, span, &[("expected", &found_x), ("found", &found_y)])
            })
        }
        (Type::Record(f1, t1), Type::Record(f2, t2)) => unify_records(arena, f1.clone(), t1.clone(), f2.clone(), t2.clone(), span, render),
        _ => {
            let found_a = render(arena, &a);
            let found_b = render(arena, &b);
            Err(Diagnostic::create(DiagnosticCode::VF4020, span, &[("expected", &found_a), ("found", &found_b)]))
        }
    }
}

fn bind_var(arena: &mut TypeArena, var: TypeVarId, ty: &Type, span: Span, render: Render<'_>) -> Result<(), Diagnostic> {
    if let Type::Var(other) = ty
        && *other == var
    {
        return Ok(());
    }
    if occurs(arena, var, ty) {
        let name = render(arena, &Type::Var(var));
        return Err(Diagnostic::create(DiagnosticCode::VF4300, span, &[("name", &name)]));
    }
    if let Some(rank) = arena.rank_of(var) {
        lower_ranks(arena, ty, rank);
    }
    arena.bind(var, ty.clone());
    Ok(())
}

fn occurs(arena: &mut TypeArena, var: TypeVarId, ty: &Type) -> bool {
    match arena.resolve(ty.clone()) {
        Type::Var(id) => id == var,
        Type::Con(_) => false,
        Type::App(head, args) => occurs(arena, var, &head) || args.iter().any(|a| occurs(arena, var, a)),
        Type::Fun(params, ret) => params.iter().any(|p| occurs(arena, var, p)) || occurs(arena, var, &ret),
        Type::Record(fields, tail) => fields.values().any(|v| occurs(arena, var, v)) || tail.is_some_and(|t| occurs(arena, var, &t)),
        Type::Tuple(elems) | Type::Union(elems) => elems.iter().any(|e| occurs(arena, var, e)),
        Type::Ref(inner) => occurs(arena, var, &inner),
    }
}

/// Lowers the rank of every unbound variable reachable from `ty` to at
/// most `rank` (spec §9: "Unification must lower the rank of the
/// surviving variable to the minimum of the two before binding").
fn lower_ranks(arena: &mut TypeArena, ty: &Type, rank: u32) {
    match arena.resolve(ty.clone()) {
        Type::Var(id) => arena.lower_rank(id, rank),
        Type::Con(_) => {}
        Type::App(head, args) => {
            lower_ranks(arena, &head, rank);
            for a in &args {
                lower_ranks(arena, a, rank);
            }
        }
        Type::Fun(params, ret) => {
            for p in &params {
                lower_ranks(arena, p, rank);
            }
            lower_ranks(arena, &ret, rank);
        }
        Type::Record(fields, tail) => {
            for v in fields.values() {
                lower_ranks(arena, v, rank);
            }
            if let Some(t) = tail {
                lower_ranks(arena, &t, rank);
            }
        }
        Type::Tuple(elems) | Type::Union(elems) => {
            for e in &elems {
                lower_ranks(arena, e, rank);
            }
        }
        Type::Ref(inner) => lower_ranks(arena, &inner, rank),
    }
}

/// Row unification (spec §4.6 `TRecord`, §9's row-variable discipline,
/// glossary "Row variable"). Shared fields unify directly; fields
/// exclusive to one side must flow into the other side's row tail (if
/// open) or are a `VF4501` missing-field error (if closed); two open
/// tails are reconciled through a freshly shared tail variable.
fn unify_records(
    arena: &mut TypeArena,
    f1: IndexMap<StringId, Type>,
    t1: Option<Box<Type>>,
    f2: IndexMap<StringId, Type>,
    t2: Option<Box<Type>>,
    span: Span,
    render: Render<'_>,
) -> Result<(), Diagnostic> {
    for (name, ty1) in &f1 {
        if let Some(ty2) = f2.get(name)
            && let Err(diag) = unify(arena, ty1, ty2, span, render)
        {
            if diag.code == DiagnosticCode::VF4300 {
                return Err(diag);
            }
            let expected = render(arena, ty1);
            let found = render(arena, ty2);
            let name_rendered = render(arena, &Type::Con(*name));
            return Err(Diagnostic::create(DiagnosticCode::VF4500, span, &[("name", &name_rendered), ("expected", &expected), ("found", &found)]));
        }
    }
    let only_in_f1: IndexMap<StringId, Type> = f1.iter().filter(|(k, _)| !f2.contains_key(*k)).map(|(k, v)| (*k, v.clone())).collect();
    let only_in_f2: IndexMap<StringId, Type> = f2.iter().filter(|(k, _)| !f1.contains_key(*k)).map(|(k, v)| (*k, v.clone())).collect();

    let missing_field_error = |arena: &mut TypeArena, render: Render<'_>, fields: &IndexMap<StringId, Type>| -> Diagnostic {
        let name = fields.keys().next().copied().expect("caller only invokes this when `fields` is non-empty");
        let rendered = render(arena, &Type::Con(name));
        Diagnostic::create(DiagnosticCode::VF4501, span, &[("name", &rendered)])
    };

    match (t1, t2) {
        (None, None) => {
            if !only_in_f1.is_empty() {
                return Err(missing_field_error(arena, render, &only_in_f1));
            }
            if !only_in_f2.is_empty() {
                return Err(missing_field_error(arena, render, &only_in_f2));
            }
            Ok(())
        }
        (Some(tail1), None) => {
            if !only_in_f2.is_empty() {
                return Err(missing_field_error(arena, render, &only_in_f2));
            }
            unify(arena, &tail1, &Type::Record(only_in_f1, None), span, render)
        }
        (None, Some(tail2)) => {
            if !only_in_f1.is_empty() {
                return Err(missing_field_error(arena, render, &only_in_f1));
            }
            unify(arena, &tail2, &Type::Record(only_in_f2, None), span, render)
        }
        (Some(tail1), Some(tail2)) => {
            let shared_rank = arena.rank_of_or_zero(&tail1).min(arena.rank_of_or_zero(&tail2));
            let shared_tail = Type::Var(arena.fresh_row(shared_rank));
            unify(arena, &tail1, &Type::Record(only_in_f2, Some(Box::new(shared_tail.clone()))), span, render)?;
            unify(arena, &tail2, &Type::Record(only_in_f1, Some(Box::new(shared_tail))), span, render)
        }
    }
}

impl TypeArena {
    fn rank_of_or_zero(&mut self, ty: &Type) -> u32 {
        match self.resolve(ty.clone()) {
            Type::Var(id) => self.rank_of(id).unwrap_or(0),
            _ => 0,
        }
    }
}
