//! Expression inference (spec §4.6 "Typing rules") over every
//! [`CoreExprKind`] variant, plus FFI overload resolution (spec §4.9
//! "FFI overload resolution") and the `__List`/`__Tuple` special-casing
//! the desugarer's flat-variant lowering of list/tuple literals
//! (`core_ast.rs`) requires.

use crate::source::Span;
use crate::core_ast::{CoreExpr, CoreExprKind, CoreMatchArm, RefOp};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::syntax::{BinOp, Ident, Literal, UnaryOp};
use crate::typed_ast::{TypedExpr, TypedExprKind, TypedMatchArm};
use crate::types::{FfiOverload, Scheme, Type, TypeArena};

use super::Checker;

impl Checker<'_> {
    pub(crate) fn infer_expr(&mut self, expr: CoreExpr) -> Result<TypedExpr, Diagnostic> {
        let span = expr.span;
        match *expr.kind {
            CoreExprKind::Literal(lit) => {
                let ty = self.literal_type_pub(&lit);
                Ok(TypedExpr::new(span, ty, TypedExprKind::Literal(lit)))
            }
            CoreExprKind::Var(ident) => self.infer_var(span, ident),
            CoreExprKind::External(ident) => self.infer_external_value(span, ident),
            CoreExprKind::Let { name, value, body } => self.infer_let(span, name, value, body),
            CoreExprKind::LetRec { bindings, body } => self.infer_let_rec(span, bindings, body),
            CoreExprKind::Lambda { params, return_annot, body } => self.infer_lambda(span, params, return_annot, body),
            CoreExprKind::App { callee, args } => self.infer_app(span, callee, args.into_vec()),
            CoreExprKind::Match { scrutinee, arms } => self.infer_match(span, scrutinee, arms),
            CoreExprKind::Record { fields } => self.infer_record(span, fields),
            CoreExprKind::RecordUpdate { base, fields } => self.infer_record_update(span, base, fields),
            CoreExprKind::Variant { ctor, args } => self.infer_variant(span, ctor, args),
            CoreExprKind::FieldAccess { target, field } => self.infer_field_access(span, target, field),
            CoreExprKind::BinOp { op, lhs, rhs } => self.infer_binop(span, op, lhs, rhs),
            CoreExprKind::UnaryOp { op, operand } => self.infer_unaryop(span, op, operand),
            CoreExprKind::RefOp(refop) => self.infer_refop(span, refop),
            CoreExprKind::Block(exprs) => self.infer_block(span, exprs),
            CoreExprKind::ReservedUnsupported { keyword } => Err(Diagnostic::create(DiagnosticCode::VF2501, span, &[("name", keyword)])),
        }
    }

    fn literal_type_pub(&mut self, lit: &Literal) -> Type {
        match lit {
            Literal::Int(_) => Type::Con(self.builtin.int),
            Literal::Float(_) => Type::Con(self.builtin.float),
            Literal::Str(_) => Type::Con(self.builtin.string),
            Literal::Bool(_) => Type::Con(self.builtin.bool_),
        }
    }

    /// A surface identifier desugars to `Var` whether it names an ordinary
    /// binding or an `external` (the desugarer has no [`super::GlobalEnv`]
    /// to tell the two apart), so a lexical-environment miss falls back to
    /// the FFI table before reporting `VF4100`.
    fn infer_var(&mut self, span: Span, ident: Ident) -> Result<TypedExpr, Diagnostic> {
        if let Some(scheme) = self.global.env.lookup(ident.name).cloned() {
            let ty = self.arena.instantiate(&scheme, self.level);
            return Ok(TypedExpr::new(span, ty, TypedExprKind::Var(ident)));
        }
        self.infer_external_value(span, ident)
    }

    fn infer_external_value(&mut self, span: Span, ident: Ident) -> Result<TypedExpr, Diagnostic> {
        if self.global.ffi.is_overloaded(ident.name) {
            let rendered = self.resolve_name(ident.name);
            return Err(Diagnostic::create(DiagnosticCode::VF4804, span, &[("name", &rendered)]));
        }
        let Some(overloads) = self.global.ffi.overloads(ident.name) else {
            let rendered = self.resolve_name(ident.name);
            return Err(Diagnostic::create(DiagnosticCode::VF4100, span, &[("name", &rendered)]));
        };
        let scheme = overloads[0].scheme.clone();
        let ty = self.arena.instantiate(&scheme, self.level);
        Ok(TypedExpr::new(span, ty, TypedExprKind::External(ident)))
    }

    fn infer_let(&mut self, span: Span, name: Ident, value: CoreExpr, body: CoreExpr) -> Result<TypedExpr, Diagnostic> {
        let is_value = is_syntactic_value(&value);
        self.level += 1;
        let typed_value = self.infer_expr(value)?;
        self.level -= 1;
        let scheme = self.generalize(name.name, &typed_value.ty, is_value);
        self.global.env.push_scope();
        self.global.env.bind(name.name, scheme.clone());
        let typed_body = self.infer_expr(body);
        self.global.env.pop_scope();
        let typed_body = typed_body?;
        let ty = typed_body.ty.clone();
        Ok(TypedExpr::new(span, ty, TypedExprKind::Let { name, scheme, value: typed_value, body: typed_body }))
    }

    fn infer_let_rec(&mut self, span: Span, bindings: Vec<(Ident, CoreExpr)>, body: CoreExpr) -> Result<TypedExpr, Diagnostic> {
        self.global.env.push_scope();
        self.level += 1;
        let placeholders: Vec<_> = bindings.iter().map(|_| self.arena.fresh(self.level)).collect();
        for ((name, _), &var) in bindings.iter().zip(&placeholders) {
            self.global.env.bind(name.name, Scheme::monomorphic(Type::Var(var)));
        }
        let mut typed_values = Vec::with_capacity(bindings.len());
        let mut is_value = true;
        for ((name, value), &var) in bindings.into_iter().zip(&placeholders) {
            is_value &= is_syntactic_value(&value);
            let typed_value = match self.infer_expr(value) {
                Ok(v) => v,
                Err(e) => {
                    self.global.env.pop_scope();
                    return Err(e);
                }
            };
            if let Err(e) = self.unify_numeric_aware(&Type::Var(var), &typed_value.ty, span) {
                self.global.env.pop_scope();
                return Err(e);
            }
            typed_values.push((name, typed_value));
        }
        self.level -= 1;
        let mut out = Vec::with_capacity(typed_values.len());
        for ((name, typed_value), &var) in typed_values.into_iter().zip(&placeholders) {
            let resolved = self.arena.resolve(Type::Var(var));
            let scheme = self.generalize(name.name, &resolved, is_value);
            self.global.env.bind(name.name, scheme.clone());
            out.push((name, scheme, typed_value));
        }
        let typed_body = self.infer_expr(body);
        self.global.env.pop_scope();
        let typed_body = typed_body?;
        let ty = typed_body.ty.clone();
        Ok(TypedExpr::new(span, ty, TypedExprKind::LetRec { bindings: out, body: typed_body }))
    }

    fn infer_lambda(
        &mut self,
        span: Span,
        params: smallvec::SmallVec<[(Ident, Option<crate::syntax::TypeExpr>); 4]>,
        return_annot: Option<crate::syntax::TypeExpr>,
        body: CoreExpr,
    ) -> Result<TypedExpr, Diagnostic> {
        self.global.env.push_scope();
        let mut typed_params = Vec::with_capacity(params.len());
        for (name, annot) in params {
            let ty = match annot {
                Some(a) => match self.lower_type_expr(&a, &indexmap::IndexMap::new()) {
                    Ok(t) => t,
                    Err(e) => {
                        self.global.env.pop_scope();
                        return Err(e);
                    }
                },
                None => Type::Var(self.arena.fresh(self.level)),
            };
            self.global.env.bind(name.name, Scheme::monomorphic(ty.clone()));
            typed_params.push((name, ty));
        }
        let typed_body = self.infer_expr(body);
        self.global.env.pop_scope();
        let typed_body = typed_body?;
        if let Some(annot) = return_annot {
            let expected = self.lower_type_expr(&annot, &indexmap::IndexMap::new())?;
            if let Err(diag) = self.unify_numeric_aware(&expected, &typed_body.ty, span) {
                if matches!(diag.code, DiagnosticCode::VF4009 | DiagnosticCode::VF4300 | DiagnosticCode::VF4701) {
                    return Err(diag);
                }
                let expected_r = self.render(&expected);
                let found_r = self.render(&typed_body.ty);
                return Err(Diagnostic::create(DiagnosticCode::VF4003, span, &[("expected", &expected_r), ("found", &found_r)]));
            }
        }
        let fun_ty = Type::Fun(typed_params.iter().map(|(_, t)| t.clone()).collect(), Box::new(typed_body.ty.clone()));
        Ok(TypedExpr::new(span, fun_ty, TypedExprKind::Lambda { params: typed_params, body: typed_body }))
    }

    /// Applies `callee` to `args` (spec §4.6 "Application"). When the
    /// callee's type is already known to be a function (as opposed to a
    /// still-unresolved type variable), arity and each argument are
    /// checked individually so a mismatch reports the dedicated `VF4202`
    /// (wrong arity) / `VF4002` (argument type) codes the spec names for
    /// this position, rather than the generic unifier codes `unify`
    /// itself would raise for an arbitrary `Fun`/`Fun` mismatch.
    fn infer_app(&mut self, span: Span, callee: CoreExpr, args: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        if let CoreExprKind::External(ident) | CoreExprKind::Var(ident) = &*callee.kind
            && self.global.ffi.is_overloaded(ident.name)
        {
            return self.infer_overloaded_call(span, *ident, args);
        }
        let typed_callee = self.infer_expr(callee)?;
        let mut typed_args = Vec::with_capacity(args.len());
        for a in args {
            typed_args.push(self.infer_expr(a)?);
        }
        match self.arena.resolve(typed_callee.ty.clone()) {
            Type::Fun(params, ret) => {
                if params.len() != typed_args.len() {
                    return Err(Diagnostic::create(
                        DiagnosticCode::VF4202,
                        span,
                        &[("expected", &params.len().to_string()), ("found", &typed_args.len().to_string())],
                    ));
                }
                for (param_ty, arg) in params.iter().zip(&typed_args) {
                    if let Err(diag) = self.unify_numeric_aware(param_ty, &arg.ty, arg.span) {
                        if matches!(diag.code, DiagnosticCode::VF4009 | DiagnosticCode::VF4300 | DiagnosticCode::VF4701) {
                            return Err(diag);
                        }
                        let expected = self.render(param_ty);
                        let found = self.render(&arg.ty);
                        return Err(Diagnostic::create(DiagnosticCode::VF4002, arg.span, &[("expected", &expected), ("found", &found)]));
                    }
                }
                Ok(TypedExpr::new(span, *ret, TypedExprKind::App { callee: typed_callee, args: typed_args }))
            }
            Type::Var(_) => {
                let ret = Type::Var(self.arena.fresh(self.level));
                let expected_fun = Type::Fun(typed_args.iter().map(|a| a.ty.clone()).collect(), Box::new(ret.clone()));
                self.unify_numeric_aware(&expected_fun, &typed_callee.ty, span)?;
                Ok(TypedExpr::new(span, ret, TypedExprKind::App { callee: typed_callee, args: typed_args }))
            }
            _ => {
                let found = self.render(&typed_callee.ty);
                Err(Diagnostic::create(DiagnosticCode::VF4013, span, &[("found", &found)]))
            }
        }
    }

    /// Resolves a call to an overloaded `external` (spec §4.9): each
    /// overload's scheme is tried in turn against a *cloned* arena so a
    /// failed attempt never corrupts the real one; exactly one success
    /// is required (`VF4201` for zero, `VF4205` for more than one).
    fn infer_overloaded_call(&mut self, span: Span, ident: Ident, args: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        let mut typed_args = Vec::with_capacity(args.len());
        for a in args {
            typed_args.push(self.infer_expr(a)?);
        }
        let overloads: Vec<FfiOverload> = self.global.ffi.overloads(ident.name).expect("caller checked is_overloaded").to_vec();
        let mut successes: Vec<(TypeArena, Type)> = Vec::new();
        for overload in &overloads {
            let mut trial_arena = self.arena.clone();
            let instantiated = trial_arena.instantiate(&overload.scheme, self.level);
            let ret = Type::Var(trial_arena.fresh(self.level));
            let expected_fun = Type::Fun(typed_args.iter().map(|a| a.ty.clone()).collect(), Box::new(ret.clone()));
            let mut noop_render = |_: &mut TypeArena, _: &Type| String::new();
            if crate::types::unify(&mut trial_arena, &expected_fun, &instantiated, span, &mut noop_render).is_ok() {
                let resolved_ret = trial_arena.resolve(ret);
                successes.push((trial_arena, resolved_ret));
            }
        }
        match successes.len() {
            0 => {
                let rendered = self.resolve_name(ident.name);
                Err(Diagnostic::create(DiagnosticCode::VF4201, span, &[("name", &rendered)]))
            }
            1 => {
                let (arena, ret) = successes.into_iter().next().expect("len checked above");
                self.arena = arena;
                Ok(TypedExpr::new(span, ret, TypedExprKind::App { callee: TypedExpr::new(span, Type::unit(), TypedExprKind::External(ident)), args: typed_args }))
            }
            n => {
                let rendered = self.resolve_name(ident.name);
                Err(Diagnostic::create(DiagnosticCode::VF4205, span, &[("name", &rendered), ("found", &n.to_string())]))
            }
        }
    }

    fn infer_match(&mut self, span: Span, scrutinee: CoreExpr, arms: Vec<CoreMatchArm>) -> Result<TypedExpr, Diagnostic> {
        let typed_scrutinee = self.infer_expr(scrutinee)?;
        let result_ty = Type::Var(self.arena.fresh(self.level));
        let mut typed_arms = Vec::with_capacity(arms.len());
        for arm in arms {
            self.global.env.push_scope();
            let bind_result = self.infer_pattern(&arm.pattern, &typed_scrutinee.ty);
            let body_result = bind_result.and_then(|()| {
                let guard = arm.guard.map(|g| self.infer_expr(g)).transpose()?;
                if let Some(g) = &guard {
                    let bool_ty = Type::Con(self.builtin.bool_);
                    if self.unify_numeric_aware(&bool_ty, &g.ty, g.span).is_err() {
                        let found = self.render(&g.ty);
                        return Err(Diagnostic::create(DiagnosticCode::VF4011, g.span, &[("found", &found)]));
                    }
                }
                let body = self.infer_expr(arm.body)?;
                if let Err(diag) = self.unify_numeric_aware(&result_ty, &body.ty, body.span) {
                    if matches!(diag.code, DiagnosticCode::VF4009 | DiagnosticCode::VF4300 | DiagnosticCode::VF4701) {
                        return Err(diag);
                    }
                    let expected = self.render(&result_ty);
                    let found = self.render(&body.ty);
                    return Err(Diagnostic::create(DiagnosticCode::VF4004, body.span, &[("expected", &expected), ("found", &found)]));
                }
                Ok((guard, body))
            });
            self.global.env.pop_scope();
            let (guard, body) = body_result?;
            typed_arms.push(TypedMatchArm { pattern: arm.pattern, guard, body });
        }
        self.check_exhaustiveness(span, &typed_scrutinee.ty, &typed_arms)?;
        Ok(TypedExpr::new(span, result_ty, TypedExprKind::Match { scrutinee: typed_scrutinee, arms: typed_arms }))
    }

    fn infer_record(&mut self, span: Span, fields: Vec<(Ident, CoreExpr)>) -> Result<TypedExpr, Diagnostic> {
        let mut map = indexmap::IndexMap::new();
        let mut typed_fields = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            if map.contains_key(&name.name) {
                let rendered = self.resolve_name(name.name);
                return Err(Diagnostic::create(DiagnosticCode::VF4502, name.span, &[("name", &rendered)]));
            }
            let typed_value = self.infer_expr(value)?;
            map.insert(name.name, typed_value.ty.clone());
            typed_fields.push((name, typed_value));
        }
        Ok(TypedExpr::new(span, Type::Record(map, None), TypedExprKind::Record { fields: typed_fields }))
    }

    fn infer_record_update(&mut self, span: Span, base: CoreExpr, fields: Vec<(Ident, CoreExpr)>) -> Result<TypedExpr, Diagnostic> {
        let typed_base = self.infer_expr(base)?;
        let mut update_map = indexmap::IndexMap::new();
        let mut typed_fields = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let typed_value = self.infer_expr(value)?;
            update_map.insert(name.name, typed_value.ty.clone());
            typed_fields.push((name, typed_value));
        }
        let tail = Type::Var(self.arena.fresh_row(self.level));
        let expected_base = Type::Record(update_map.clone(), Some(Box::new(tail.clone())));
        self.unify_numeric_aware(&expected_base, &typed_base.ty, span)?;
        let result_ty = self.arena.resolve(Type::Record(update_map, Some(Box::new(tail))));
        Ok(TypedExpr::new(span, result_ty, TypedExprKind::RecordUpdate { base: typed_base, fields: typed_fields }))
    }

    fn infer_variant(&mut self, span: Span, ctor: Ident, args: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        let ctor_name = self.resolve_name(ctor.name);
        if ctor_name == "__List" {
            return self.infer_list_literal(span, ctor, args);
        }
        if ctor_name == "__Tuple" {
            return self.infer_tuple_literal(span, ctor, args);
        }
        let Some(info) = self.global.ctors.lookup(ctor.name).cloned() else {
            return Err(Diagnostic::create(DiagnosticCode::VF4102, span, &[("name", &ctor_name)]));
        };
        if info.args.len() != args.len() {
            return Err(Diagnostic::create(
                DiagnosticCode::VF4200,
                span,
                &[("name", &ctor_name), ("expected", &info.args.len().to_string()), ("found", &args.len().to_string())],
            ));
        }
        let mapping: indexmap::IndexMap<_, _> = info.parent.vars.iter().map(|&v| (v, self.arena.fresh(self.level))).collect();
        let mut typed_args = Vec::with_capacity(args.len());
        for (arg, field_ty) in args.into_iter().zip(&info.args) {
            let instantiated_field = self.instantiate_with_mapping(field_ty, &mapping);
            let typed_arg = self.infer_expr(arg)?;
            self.unify_numeric_aware(&instantiated_field, &typed_arg.ty, typed_arg.span)?;
            typed_args.push(typed_arg);
        }
        let wrapper = Scheme { vars: info.parent.vars.clone(), ty: info.parent.ty.clone() };
        let instantiated_parent = self.instantiate_scheme_with_mapping(&wrapper, &mapping);
        Ok(TypedExpr::new(span, instantiated_parent, TypedExprKind::Variant { ctor, args: typed_args }))
    }

    fn infer_list_literal(&mut self, span: Span, ctor: Ident, args: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        let elem_ty = Type::Var(self.arena.fresh(self.level));
        let mut typed_args = Vec::with_capacity(args.len());
        for a in args {
            let typed_a = self.infer_expr(a)?;
            self.unify_numeric_aware(&elem_ty, &typed_a.ty, typed_a.span)?;
            typed_args.push(typed_a);
        }
        let list_ty = Type::App(Box::new(Type::Con(self.builtin.list)), vec![elem_ty]);
        Ok(TypedExpr::new(span, list_ty, TypedExprKind::Variant { ctor, args: typed_args }))
    }

    fn infer_tuple_literal(&mut self, span: Span, ctor: Ident, args: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        let mut typed_args = Vec::with_capacity(args.len());
        let mut elem_types = Vec::with_capacity(args.len());
        for a in args {
            let typed_a = self.infer_expr(a)?;
            elem_types.push(typed_a.ty.clone());
            typed_args.push(typed_a);
        }
        Ok(TypedExpr::new(span, Type::Tuple(elem_types), TypedExprKind::Variant { ctor, args: typed_args }))
    }

    fn instantiate_with_mapping(&mut self, ty: &Type, mapping: &indexmap::IndexMap<crate::types::TypeVarId, crate::types::TypeVarId>) -> Type {
        let wrapper = Scheme { vars: mapping.keys().copied().collect(), ty: ty.clone() };
        self.instantiate_scheme_with_mapping(&wrapper, mapping)
    }

    fn instantiate_scheme_with_mapping(&mut self, scheme: &Scheme, mapping: &indexmap::IndexMap<crate::types::TypeVarId, crate::types::TypeVarId>) -> Type {
        substitute_vars(&scheme.ty, mapping)
    }

    /// `e.f` (spec §4.6 "Records": "forces `e : { f: α | ρ }` and yields
    /// `α`"). A target that isn't an (open) record at all, or that is a
    /// closed record lacking `f`, is reported as `VF4103` — the spec's
    /// alternate code for this exact position (§6 code-range table,
    /// `DESIGN.md`), distinct from `VF4501`'s generic row-unification
    /// mismatch between two record *types*.
    fn infer_field_access(&mut self, span: Span, target: CoreExpr, field: Ident) -> Result<TypedExpr, Diagnostic> {
        let typed_target = self.infer_expr(target)?;
        let field_ty = Type::Var(self.arena.fresh(self.level));
        let mut map = indexmap::IndexMap::new();
        map.insert(field.name, field_ty.clone());
        let tail = Type::Var(self.arena.fresh_row(self.level));
        let expected = Type::Record(map, Some(Box::new(tail)));
        if let Err(diag) = self.unify_numeric_aware(&expected, &typed_target.ty, span) {
            if matches!(diag.code, DiagnosticCode::VF4300 | DiagnosticCode::VF4701) {
                return Err(diag);
            }
            let rendered = self.resolve_name(field.name);
            return Err(Diagnostic::create(DiagnosticCode::VF4103, span, &[("name", &rendered)]));
        }
        let resolved = self.arena.resolve(field_ty);
        Ok(TypedExpr::new(span, resolved, TypedExprKind::FieldAccess { target: typed_target, field }))
    }

    fn infer_binop(&mut self, span: Span, op: BinOp, lhs: CoreExpr, rhs: CoreExpr) -> Result<TypedExpr, Diagnostic> {
        let typed_lhs = self.infer_expr(lhs)?;
        let typed_rhs = self.infer_expr(rhs)?;
        let ty = match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
                self.unify_numeric_aware(&typed_lhs.ty, &typed_rhs.ty, span)?;
                self.arena.resolve(typed_lhs.ty.clone())
            }
            BinOp::Shl | BinOp::Shr => {
                let int_ty = Type::Con(self.builtin.int);
                self.unify_numeric_aware(&int_ty, &typed_lhs.ty, span)?;
                self.unify_numeric_aware(&int_ty, &typed_rhs.ty, span)?;
                int_ty
            }
            BinOp::Concat => {
                let string_ty = Type::Con(self.builtin.string);
                self.unify_numeric_aware(&string_ty, &typed_lhs.ty, span)?;
                self.unify_numeric_aware(&string_ty, &typed_rhs.ty, span)?;
                string_ty
            }
            BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte => {
                self.unify_numeric_aware(&typed_lhs.ty, &typed_rhs.ty, span)?;
                Type::Con(self.builtin.bool_)
            }
            BinOp::And | BinOp::Or => {
                let bool_ty = Type::Con(self.builtin.bool_);
                self.unify_numeric_aware(&bool_ty, &typed_lhs.ty, span)?;
                self.unify_numeric_aware(&bool_ty, &typed_rhs.ty, span)?;
                bool_ty
            }
            BinOp::Cons => {
                let list_ty = Type::App(Box::new(Type::Con(self.builtin.list)), vec![typed_lhs.ty.clone()]);
                self.unify_numeric_aware(&list_ty, &typed_rhs.ty, span)?;
                list_ty
            }
        };
        Ok(TypedExpr::new(span, ty, TypedExprKind::BinOp { op, lhs: typed_lhs, rhs: typed_rhs }))
    }

    fn infer_unaryop(&mut self, span: Span, op: UnaryOp, operand: CoreExpr) -> Result<TypedExpr, Diagnostic> {
        let typed_operand = self.infer_expr(operand)?;
        let ty = match op {
            UnaryOp::Neg => self.arena.resolve(typed_operand.ty.clone()),
        };
        Ok(TypedExpr::new(span, ty, TypedExprKind::UnaryOp { op, operand: typed_operand }))
    }

    fn infer_refop(&mut self, span: Span, refop: RefOp) -> Result<TypedExpr, Diagnostic> {
        match refop {
            RefOp::New(inner) => {
                let typed_inner = self.infer_expr(inner)?;
                let ref_ty = Type::Ref(Box::new(typed_inner.ty.clone()));
                Ok(TypedExpr::new(span, ref_ty, TypedExprKind::RefNew(typed_inner)))
            }
            RefOp::Deref(inner) => {
                let typed_inner = self.infer_expr(inner)?;
                let inner_var = Type::Var(self.arena.fresh(self.level));
                match self.unify_numeric_aware(&Type::Ref(Box::new(inner_var.clone())), &typed_inner.ty, span) {
                    Ok(()) => {}
                    Err(_) => {
                        let found = self.render(&typed_inner.ty);
                        return Err(Diagnostic::create(DiagnosticCode::VF4015, span, &[("found", &found)]));
                    }
                }
                let resolved = self.arena.resolve(inner_var);
                Ok(TypedExpr::new(span, resolved, TypedExprKind::RefDeref(typed_inner)))
            }
            RefOp::Assign { target, value } => {
                let typed_target = self.infer_expr(target)?;
                let typed_value = self.infer_expr(value)?;
                let expected = Type::Ref(Box::new(typed_value.ty.clone()));
                if self.unify_numeric_aware(&expected, &typed_target.ty, span).is_err() {
                    let expected_rendered = self.render(&typed_value.ty);
                    let found_rendered = self.render(&typed_target.ty);
                    return Err(Diagnostic::create(DiagnosticCode::VF4016, span, &[("expected", &expected_rendered), ("found", &found_rendered)]));
                }
                Ok(TypedExpr::new(span, Type::unit(), TypedExprKind::RefAssign { target: typed_target, value: typed_value }))
            }
        }
    }

    fn infer_block(&mut self, span: Span, exprs: Vec<CoreExpr>) -> Result<TypedExpr, Diagnostic> {
        self.global.env.push_scope();
        let mut typed_exprs = Vec::with_capacity(exprs.len());
        let mut err = None;
        for e in exprs {
            match self.infer_expr(e) {
                Ok(t) => typed_exprs.push(t),
                Err(e) => {
                    err = Some(e);
                    break;
                }
            }
        }
        self.global.env.pop_scope();
        if let Some(e) = err {
            return Err(e);
        }
        let ty = typed_exprs.last().map_or_else(Type::unit, |e| e.ty.clone());
        Ok(TypedExpr::new(span, ty, TypedExprKind::Block(typed_exprs)))
    }
}

fn substitute_vars(ty: &Type, mapping: &indexmap::IndexMap<crate::types::TypeVarId, crate::types::TypeVarId>) -> Type {
    match ty {
        Type::Var(id) => Type::Var(*mapping.get(id).unwrap_or(id)),
        Type::Con(_) => ty.clone(),
        Type::App(head, args) => Type::App(Box::new(substitute_vars(head, mapping)), args.iter().map(|a| substitute_vars(a, mapping)).collect()),
        Type::Fun(params, ret) => Type::Fun(params.iter().map(|p| substitute_vars(p, mapping)).collect(), Box::new(substitute_vars(ret, mapping))),
        Type::Record(fields, tail) => Type::Record(
            fields.iter().map(|(k, v)| (*k, substitute_vars(v, mapping))).collect(),
            tail.as_ref().map(|t| Box::new(substitute_vars(t, mapping))),
        ),
        Type::Tuple(elems) => Type::Tuple(elems.iter().map(|e| substitute_vars(e, mapping)).collect()),
        Type::Union(members) => Type::Union(members.iter().map(|m| substitute_vars(m, mapping)).collect()),
        Type::Ref(inner) => Type::Ref(Box::new(substitute_vars(inner, mapping))),
    }
}

/// The value restriction (spec §4.6, §9): only syntactic values
/// generalize. Literals, variables, lambdas, and variant/record/tuple
/// constructions applied to values are values; function application,
/// `Ref::new`, and blocks are not.
pub(crate) fn is_syntactic_value(expr: &CoreExpr) -> bool {
    match &*expr.kind {
        CoreExprKind::Literal(_) | CoreExprKind::Var(_) | CoreExprKind::External(_) | CoreExprKind::Lambda { .. } => true,
        CoreExprKind::Record { fields } => fields.iter().all(|(_, v)| is_syntactic_value(v)),
        CoreExprKind::Variant { args, .. } => args.iter().all(is_syntactic_value),
        CoreExprKind::Let { value, body, .. } => is_syntactic_value(value) && is_syntactic_value(body),
        _ => false,
    }
}

