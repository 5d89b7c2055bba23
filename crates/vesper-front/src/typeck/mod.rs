//! Typechecker (C9, spec §4.6): Core AST → Typed Core AST.
//!
//! Algorithm W with levels (Rémy-style ranks, spec §9 "Levels for
//! generalization") for sound let-generalization, first-order
//! unification with the occurs check (`types::unify`), and the value
//! restriction (generalize only syntactic values).
//!
//! Grounded on the retrieval pack's HM checkers
//! (`other_examples/34fa6cd3_snowdamiz-mesh-lang__crates-snow-typeck-src-lib.rs.rs`'s
//! `infer` module, `other_examples/bfc06899_upstat-io-sigil-lang__compiler-ori_types-src-check-mod.rs.rs`)
//! for the overall `Checker`-struct-plus-`infer_*`-methods shape.

mod exhaustiveness;
mod expr;
mod pattern;

use indexmap::IndexMap;

use crate::core_ast::{CoreDecl, CoreModule};
use crate::diagnostics::{Diagnostic, DiagnosticCode, WarningCollector};
use crate::intern::{Interner, StringId};
use crate::source::Span;
use crate::syntax::{Ident, TypeDeclBody, TypeExpr, TypeExprKind};
use crate::typed_ast::{TypedDecl, TypedModule};
use crate::types::{ConstructorInfo, ConstructorRegistry, Environment, FfiOverload, FfiTable, Scheme, Type, TypeArena, TypeVarId};

/// The well-known builtin type constructor names, interned once per
/// checker so expression/pattern inference can compare against them
/// without re-interning string literals on every call.
pub(crate) struct Builtins {
    pub int: StringId,
    pub float: StringId,
    pub string: StringId,
    pub bool_: StringId,
    pub list: StringId,
    pub ref_: StringId,
}

impl Builtins {
    fn new(interner: &mut Interner) -> Self {
        Self {
            int: interner.intern("Int"),
            float: interner.intern("Float"),
            string: interner.intern("String"),
            bool_: interner.intern("Bool"),
            list: interner.intern("List"),
            ref_: interner.intern("Ref"),
        }
    }
}

/// Everything persistent across modules in a single program: bindings,
/// constructors, and FFI overloads visible to every module checked
/// against it (spec §6 `typecheck(module, env: GlobalEnv)`). A fresh
/// module is checked by extending this state in place.
pub struct GlobalEnv {
    pub(crate) env: Environment,
    pub(crate) ctors: ConstructorRegistry,
    pub(crate) ffi: FfiTable,
    pub(crate) type_aliases: IndexMap<StringId, (Vec<Ident>, TypeExpr)>,
    pub(crate) variants_of: IndexMap<StringId, Vec<StringId>>,
}

impl GlobalEnv {
    #[must_use]
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
            ctors: ConstructorRegistry::new(),
            ffi: FfiTable::new(),
            type_aliases: IndexMap::new(),
            variants_of: IndexMap::new(),
        }
    }

    /// Seeds the FFI table with the `__builtin_string_concat` overload
    /// the desugarer's `a & b` lowering (spec §4.5) assumes exists.
    pub fn with_string_concat_builtin(mut self, interner: &mut Interner) -> Self {
        let string = interner.intern("String");
        let name = interner.intern(crate::desugar::BUILTIN_CONCAT);
        let ty = Type::Fun(vec![Type::Con(string), Type::Con(string)], Box::new(Type::Con(string)));
        self.ffi.push(
            name,
            FfiOverload {
                scheme: Scheme::monomorphic(ty),
                js_name: interner.intern("__vesper_concat"),
                import_path: None,
                span: Span::point(crate::source::Location::start_of_file(interner.intern("<builtin>"))),
            },
        );
        self
    }
}

impl Default for GlobalEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Checker<'a> {
    pub(crate) arena: TypeArena,
    pub(crate) global: &'a mut GlobalEnv,
    pub(crate) interner: &'a mut Interner,
    pub(crate) warnings: &'a mut WarningCollector,
    pub(crate) level: u32,
    pub(crate) builtin: Builtins,
    /// Type variables reachable from a binding the value restriction
    /// monomorphized (spec §4.6/§8 "Value restriction"), mapped back to
    /// the binding's name so a later conflicting use can be reported as
    /// `VF4701` instead of a generic unification failure.
    pub(crate) restricted: std::collections::HashMap<TypeVarId, StringId>,
}

/// Typechecks `module` against `global`, mutating `global` in place with
/// every top-level binding/constructor/external the module declares so a
/// subsequent module (spec §6's multi-module orchestration, excluded
/// here) could be checked against the result.
pub fn typecheck(module: CoreModule, global: &mut GlobalEnv, interner: &mut Interner, warnings: &mut WarningCollector) -> Result<TypedModule, Diagnostic> {
    let builtin = Builtins::new(interner);
    let mut checker = Checker { arena: TypeArena::new(), global, interner, warnings, level: 0, builtin, restricted: std::collections::HashMap::new() };
    let mut declarations = Vec::with_capacity(module.declarations.len());
    for decl in module.declarations {
        if let Some(typed) = checker.check_decl(decl)? {
            declarations.push(typed);
        }
    }
    Ok(TypedModule { declarations })
}

impl Checker<'_> {
    fn check_decl(&mut self, decl: CoreDecl) -> Result<Option<TypedDecl>, Diagnostic> {
        match decl {
            CoreDecl::Let { span, name, annot, value } => {
                if self.global.env.bound_in_current_scope(name.name) {
                    let rendered = self.interner.resolve(name.name).to_owned();
                    return Err(Diagnostic::create(DiagnosticCode::VF5102, span, &[("name", &rendered)]));
                }
                let is_value = expr::is_syntactic_value(&value);
                self.level += 1;
                let mut typed_value = self.infer_expr(value)?;
                if let Some(annot) = annot {
                    let expected = self.lower_type_expr(&annot, &IndexMap::new())?;
                    self.unify_numeric_aware(&expected, &typed_value.ty, span)?;
                    typed_value.ty = expected;
                }
                self.level -= 1;
                let scheme = self.generalize(name.name, &typed_value.ty, is_value);
                self.global.env.bind(name.name, scheme.clone());
                Ok(Some(TypedDecl::Let { span, name, scheme, value: typed_value }))
            }
            CoreDecl::LetRec { span, bindings } => {
                for (name, _) in &bindings {
                    if self.global.env.bound_in_current_scope(name.name) {
                        let rendered = self.interner.resolve(name.name).to_owned();
                        return Err(Diagnostic::create(DiagnosticCode::VF5102, span, &[("name", &rendered)]));
                    }
                }
                self.level += 1;
                let placeholders: Vec<TypeVarId> = bindings.iter().map(|_| self.arena.fresh(self.level)).collect();
                for ((name, _), &var) in bindings.iter().zip(&placeholders) {
                    self.global.env.bind(name.name, Scheme::monomorphic(Type::Var(var)));
                }
                let mut typed_bindings = Vec::with_capacity(bindings.len());
                let mut is_value = true;
                for ((name, value), &var) in bindings.into_iter().zip(&placeholders) {
                    is_value &= expr::is_syntactic_value(&value);
                    let typed_value = self.infer_expr(value)?;
                    self.unify_numeric_aware(&Type::Var(var), &typed_value.ty, span)?;
                    typed_bindings.push((name, typed_value));
                }
                self.level -= 1;
                let mut out = Vec::with_capacity(typed_bindings.len());
                for ((name, typed_value), &var) in typed_bindings.into_iter().zip(&placeholders) {
                    let resolved = self.arena.resolve(Type::Var(var));
                    let scheme = self.generalize(name.name, &resolved, is_value);
                    self.global.env.bind(name.name, scheme.clone());
                    out.push((name, scheme, typed_value));
                }
                Ok(Some(TypedDecl::LetRec { span, bindings: out }))
            }
            CoreDecl::TypeDecl { span, name, params, body } => {
                self.check_type_decl(span, &name, &params, body)?;
                Ok(Some(TypedDecl::TypeDecl { span, name, params }))
            }
            CoreDecl::External { span, name, scheme, js_name, import_path } => {
                let typed = self.check_external(span, &name, &scheme, js_name, import_path)?;
                Ok(Some(typed))
            }
        }
    }

    fn check_external(
        &mut self,
        span: Span,
        name: &Ident,
        scheme_expr: &TypeExpr,
        js_name: StringId,
        import_path: Option<StringId>,
    ) -> Result<TypedDecl, Diagnostic> {
        if self.global.env.lookup(name.name).is_some() {
            let rendered = self.interner.resolve(name.name).to_owned();
            return Err(Diagnostic::create(DiagnosticCode::VF4800, span, &[("name", &rendered)]));
        }
        let mut params = IndexMap::new();
        collect_type_vars(scheme_expr, &mut params, self.interner, &mut self.arena, self.level + 1);
        let ty = self.lower_type_expr(scheme_expr, &params)?;
        let vars: Vec<TypeVarId> = params.values().copied().collect();
        let generalized = self.arena.generalize_vars(&vars);
        let scheme = Scheme { vars: generalized, ty: ty.clone() };

        if let Some(existing) = self.global.ffi.overloads(name.name) {
            let first = existing[0].clone();
            if first.js_name != js_name {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF4801, span, &[("name", &rendered)]));
            }
            if first.import_path != import_path {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF4802, span, &[("name", &rendered)]));
            }
            if !matches!(first.scheme.ty, Type::Fun(..)) || !matches!(ty, Type::Fun(..)) {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF4803, span, &[("name", &rendered)]));
            }
        }
        self.global.ffi.push(name.name, FfiOverload { scheme: scheme.clone(), js_name, import_path, span });
        Ok(TypedDecl::External { span, name: *name, scheme, js_name, import_path })
    }

    fn check_type_decl(&mut self, span: Span, name: &Ident, params: &[Ident], body: TypeDeclBody) -> Result<(), Diagnostic> {
        let mut param_vars = IndexMap::new();
        for p in params {
            param_vars.insert(p.name, self.arena.fresh(self.level + 1));
        }
        match body {
            TypeDeclBody::Alias(alias_body) => {
                if references_type_name(&alias_body, name.name) {
                    let rendered = self.interner.resolve(name.name).to_owned();
                    return Err(Diagnostic::create(DiagnosticCode::VF4301, span, &[("name", &rendered)]));
                }
                self.global.type_aliases.insert(name.name, (params.to_vec(), alias_body));
            }
            TypeDeclBody::Variants(alts) => {
                let vars: Vec<TypeVarId> = param_vars.values().copied().collect();
                let parent_ty = if vars.is_empty() {
                    Type::Con(name.name)
                } else {
                    Type::App(Box::new(Type::Con(name.name)), vars.iter().map(|&v| Type::Var(v)).collect())
                };
                let generalized = self.arena.generalize_vars(&vars);
                let parent_scheme = Scheme { vars: generalized, ty: parent_ty };
                let mut ctor_names = Vec::with_capacity(alts.len());
                for alt in &alts {
                    let arg_types = alt.args.iter().map(|a| self.lower_type_expr(a, &param_vars)).collect::<Result<Vec<_>, _>>()?;
                    self.global.ctors.register(
                        alt.ctor.name,
                        ConstructorInfo { args: arg_types, parent: parent_scheme.clone(), type_name: name.name },
                    );
                    ctor_names.push(alt.ctor.name);
                }
                self.global.variants_of.insert(name.name, ctor_names);
            }
        }
        Ok(())
    }

    /// Lowers a surface [`TypeExpr`] into a [`Type`], resolving
    /// `Ref<T>`/`List<T>` to their dedicated shapes, expanding
    /// non-recursive type aliases, and synthesizing a nominal type for
    /// surface `T | U` union sugar (spec §9 open question, `DESIGN.md`).
    pub(crate) fn lower_type_expr(&mut self, texpr: &TypeExpr, params: &IndexMap<StringId, TypeVarId>) -> Result<Type, Diagnostic> {
        match &*texpr.kind {
            TypeExprKind::TypeVar(ident) => match params.get(&ident.name) {
                Some(&var) => Ok(Type::Var(var)),
                None => Ok(Type::Var(self.arena.fresh(self.level))),
            },
            TypeExprKind::TypeCon { name, args } => self.lower_type_con(texpr.span, name, args, params),
            TypeExprKind::FunType { params: p, ret } => {
                let lowered_params = p.iter().map(|t| self.lower_type_expr(t, params)).collect::<Result<Vec<_>, _>>()?;
                let lowered_ret = self.lower_type_expr(ret, params)?;
                Ok(Type::Fun(lowered_params, Box::new(lowered_ret)))
            }
            TypeExprKind::RecordType { fields, open } => {
                let mut map = indexmap::IndexMap::new();
                for f in fields {
                    map.insert(f.name.name, self.lower_type_expr(&f.annot, params)?);
                }
                let tail = if *open { Some(Box::new(Type::Var(self.arena.fresh_row(self.level)))) } else { None };
                Ok(Type::Record(map, tail))
            }
            TypeExprKind::TupleType(elems) => Ok(Type::Tuple(elems.iter().map(|e| self.lower_type_expr(e, params)).collect::<Result<Vec<_>, _>>()?)),
            TypeExprKind::Union(members) => self.lower_union_sugar(texpr.span, members, params),
        }
    }

    fn lower_type_con(&mut self, span: Span, name: &Ident, args: &[TypeExpr], params: &IndexMap<StringId, TypeVarId>) -> Result<Type, Diagnostic> {
        if name.name == self.builtin.ref_ {
            if args.len() != 1 {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF4204, span, &[("name", &rendered), ("expected", "1"), ("found", &args.len().to_string())]));
            }
            return Ok(Type::Ref(Box::new(self.lower_type_expr(&args[0], params)?)));
        }
        if name.name == self.builtin.list {
            if args.len() != 1 {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(DiagnosticCode::VF4204, span, &[("name", &rendered), ("expected", "1"), ("found", &args.len().to_string())]));
            }
            let elem = self.lower_type_expr(&args[0], params)?;
            return Ok(Type::App(Box::new(Type::Con(self.builtin.list)), vec![elem]));
        }
        if let Some((alias_params, alias_body)) = self.global.type_aliases.get(&name.name).cloned() {
            if alias_params.len() != args.len() {
                let rendered = self.interner.resolve(name.name).to_owned();
                return Err(Diagnostic::create(
                    DiagnosticCode::VF4204,
                    span,
                    &[("name", &rendered), ("expected", &alias_params.len().to_string()), ("found", &args.len().to_string())],
                ));
            }
            let lowered_args = args.iter().map(|a| self.lower_type_expr(a, params)).collect::<Result<Vec<_>, _>>()?;
            let mut subst = IndexMap::new();
            for (p, a) in alias_params.iter().zip(lowered_args) {
                let var = self.arena.fresh(self.level);
                self.arena.bind(var, a);
                subst.insert(p.name, var);
            }
            return self.lower_type_expr(&alias_body, &subst);
        }
        if args.is_empty() {
            return Ok(Type::Con(name.name));
        }
        let lowered = args.iter().map(|a| self.lower_type_expr(a, params)).collect::<Result<Vec<_>, _>>()?;
        Ok(Type::App(Box::new(Type::Con(name.name)), lowered))
    }

    /// `T | U` is sugar for a two-constructor nominal variant synthesized
    /// at the point of use: `__union__T__U = __union__T__U_0(T) |
    /// __union__T__U_1(U)` (spec §9: "treat [unions] as syntactic sugar
    /// for nominal variants unless a complete semantics is specified").
    /// The synthesized type/constructor names are memoized by member
    /// signature so repeated uses of the same union refer to one type.
    fn lower_union_sugar(&mut self, span: Span, members: &[TypeExpr], params: &IndexMap<StringId, TypeVarId>) -> Result<Type, Diagnostic> {
        let lowered_members = members.iter().map(|m| self.lower_type_expr(m, params)).collect::<Result<Vec<_>, _>>()?;
        let mut synthetic_name = String::from("__union");
        for m in members {
            synthetic_name.push('_');
            synthetic_name.push_str(&render_type_expr_name(m, self.interner));
        }
        let type_name = self.interner.intern(&synthetic_name);
        if self.global.variants_of.get(&type_name).is_none() {
            let mut ctor_names = Vec::with_capacity(lowered_members.len());
            for (i, member_ty) in lowered_members.iter().enumerate() {
                let ctor_name = self.interner.intern(&format!("{synthetic_name}_{i}"));
                self.global.ctors.register(
                    ctor_name,
                    ConstructorInfo { args: vec![member_ty.clone()], parent: Scheme::monomorphic(Type::Con(type_name)), type_name },
                );
                ctor_names.push(ctor_name);
            }
            self.global.variants_of.insert(type_name, ctor_names);
        }
        let _ = span;
        Ok(Type::Con(type_name))
    }

    /// Turns every still-unbound type variable whose level is above the
    /// current one into a generalized scheme variable — but only if
    /// `is_value` (spec §4.6 "the value restriction limits generalization
    /// to syntactic values"). A non-value binding keeps its inferred type
    /// but is never generalized; every type variable still reachable from
    /// it is recorded in `self.restricted` under `name` so a later use at
    /// an incompatible type is reported as `VF4701` (spec §8 "Value
    /// restriction") rather than a generic unification failure.
    fn generalize(&mut self, name: StringId, ty: &Type, is_value: bool) -> Scheme {
        if !is_value {
            let resolved = self.arena.resolve(ty.clone());
            let mut free = Vec::new();
            self.arena.free_vars_above(&resolved, 0, &mut free);
            for var in free {
                self.restricted.insert(var, name);
            }
            return Scheme::monomorphic(resolved);
        }
        let mut free = Vec::new();
        self.arena.free_vars_above(ty, self.level, &mut free);
        let generalized = self.arena.generalize_vars(&free);
        Scheme { vars: generalized, ty: self.arena.resolve(ty.clone()) }
    }

    /// Wraps [`crate::types::unify`] with the Int/Float-specific
    /// remapping to `VF4009` (spec §4.6 "Numeric discipline": "`Int` and
    /// `Float` are disjoint; implicit mixing is forbidden") and the
    /// value-restriction remapping to `VF4701`: if either side still
    /// mentions a type variable the value restriction monomorphized
    /// (`self.restricted`), a mismatch here means that binding is being
    /// used at a second, incompatible instantiation (spec §8 "Value
    /// restriction"), which gets its own diagnostic rather than a bare
    /// `VF4020`.
    pub(crate) fn unify_numeric_aware(&mut self, expected: &Type, found: &Type, span: Span) -> Result<(), Diagnostic> {
        let ra = self.arena.resolve(expected.clone());
        let rb = self.arena.resolve(found.clone());
        match crate::types::unify(&mut self.arena, expected, found, span, &mut |arena, t| render_type(arena, t, self.interner)) {
            Ok(()) => Ok(()),
            Err(diag) if diag.code == DiagnosticCode::VF4020 && self.is_int_float_pair(&ra, &rb) => Err(Diagnostic::create(DiagnosticCode::VF4009, span, &[])),
            Err(diag) => {
                if let Some(name) = self.restriction_conflict(expected, found) {
                    let rendered_name = self.interner.resolve(name).to_owned();
                    let rendered_found = self.render(&rb);
                    return Err(Diagnostic::create(DiagnosticCode::VF4701, span, &[("name", &rendered_name), ("found", &rendered_found)]));
                }
                Err(diag)
            }
        }
    }

    /// Returns the binding name a restricted type variable in `a`/`b`
    /// belongs to, if either still mentions one — called only after
    /// `unify` has already failed, so this identifies *why*, not whether.
    fn restriction_conflict(&self, a: &Type, b: &Type) -> Option<StringId> {
        self.find_restricted_var(a).or_else(|| self.find_restricted_var(b))
    }

    fn find_restricted_var(&self, ty: &Type) -> Option<StringId> {
        match ty {
            Type::Var(id) => self.restricted.get(id).copied(),
            Type::Con(_) => None,
            Type::App(head, args) => self.find_restricted_var(head).or_else(|| args.iter().find_map(|a| self.find_restricted_var(a))),
            Type::Fun(params, ret) => params.iter().find_map(|p| self.find_restricted_var(p)).or_else(|| self.find_restricted_var(ret)),
            Type::Record(fields, tail) => fields
                .values()
                .find_map(|v| self.find_restricted_var(v))
                .or_else(|| tail.as_deref().and_then(|t| self.find_restricted_var(t))),
            Type::Tuple(elems) | Type::Union(elems) => elems.iter().find_map(|e| self.find_restricted_var(e)),
            Type::Ref(inner) => self.find_restricted_var(inner),
        }
    }

    fn is_int_float_pair(&self, a: &Type, b: &Type) -> bool {
        let is_int_or_float = |t: &Type| matches!(t, Type::Con(id) if *id == self.builtin.int || *id == self.builtin.float);
        is_int_or_float(a) && is_int_or_float(b) && a != b
    }

    pub(crate) fn render(&mut self, ty: &Type) -> String {
        let resolved = self.arena.resolve(ty.clone());
        render_type(&mut self.arena, &resolved, self.interner)
    }

    pub(crate) fn resolve_name(&self, id: StringId) -> String {
        self.interner.resolve(id).to_owned()
    }
}

/// Renders a resolved [`Type`] the way a CLI diagnostic block would
/// (spec §7 "sufficient for a CLI renderer to produce a Rust-style
/// diagnostic block").
fn render_type(arena: &mut TypeArena, ty: &Type, interner: &Interner) -> String {
    match arena.resolve(ty.clone()) {
        Type::Var(id) => format!("'t{}", id.raw()),
        Type::Con(name) => interner.resolve(name).to_owned(),
        Type::App(head, args) => {
            let head_s = render_type(arena, &head, interner);
            let args_s: Vec<String> = args.iter().map(|a| render_type(arena, a, interner)).collect();
            format!("{head_s}<{}>", args_s.join(", "))
        }
        Type::Fun(params, ret) => {
            let params_s: Vec<String> = params.iter().map(|p| render_type(arena, p, interner)).collect();
            format!("({}) -> {}", params_s.join(", "), render_type(arena, &ret, interner))
        }
        Type::Record(fields, tail) => {
            let mut parts: Vec<String> = fields.iter().map(|(k, v)| format!("{}: {}", interner.resolve(*k), render_type(arena, v, interner))).collect();
            if tail.is_some() {
                parts.push("...".to_owned());
            }
            format!("{{ {} }}", parts.join(", "))
        }
        Type::Tuple(elems) => {
            if elems.is_empty() {
                return "Unit".to_owned();
            }
            let parts: Vec<String> = elems.iter().map(|e| render_type(arena, e, interner)).collect();
            format!("({})", parts.join(", "))
        }
        Type::Union(members) => {
            let parts: Vec<String> = members.iter().map(|m| render_type(arena, m, interner)).collect();
            parts.join(" | ")
        }
        Type::Ref(inner) => format!("Ref<{}>", render_type(arena, &inner, interner)),
    }
}

fn render_type_expr_name(texpr: &TypeExpr, interner: &Interner) -> String {
    match &*texpr.kind {
        TypeExprKind::TypeVar(ident) | TypeExprKind::TypeCon { name: ident, .. } => interner.resolve(ident.name).to_owned(),
        _ => "anon".to_owned(),
    }
}

fn references_type_name(texpr: &TypeExpr, name: StringId) -> bool {
    match &*texpr.kind {
        TypeExprKind::TypeVar(_) => false,
        TypeExprKind::TypeCon { name: n, args } => n.name == name || args.iter().any(|a| references_type_name(a, name)),
        TypeExprKind::FunType { params, ret } => params.iter().any(|p| references_type_name(p, name)) || references_type_name(ret, name),
        TypeExprKind::RecordType { fields, .. } => fields.iter().any(|f| references_type_name(&f.annot, name)),
        TypeExprKind::TupleType(elems) | TypeExprKind::Union(elems) => elems.iter().any(|e| references_type_name(e, name)),
    }
}

fn collect_type_vars(texpr: &TypeExpr, out: &mut IndexMap<StringId, TypeVarId>, interner: &mut Interner, arena: &mut TypeArena, level: u32) {
    let _ = interner;
    match &*texpr.kind {
        TypeExprKind::TypeVar(ident) => {
            out.entry(ident.name).or_insert_with(|| arena.fresh(level));
        }
        TypeExprKind::TypeCon { args, .. } => args.iter().for_each(|a| collect_type_vars(a, out, interner, arena, level)),
        TypeExprKind::FunType { params, ret } => {
            params.iter().for_each(|p| collect_type_vars(p, out, interner, arena, level));
            collect_type_vars(ret, out, interner, arena, level);
        }
        TypeExprKind::RecordType { fields, .. } => fields.iter().for_each(|f| collect_type_vars(&f.annot, out, interner, arena, level)),
        TypeExprKind::TupleType(elems) | TypeExprKind::Union(elems) => elems.iter().for_each(|e| collect_type_vars(e, out, interner, arena, level)),
    }
}
