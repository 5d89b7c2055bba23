//! Type Model (C8, spec §3, §4.6, §9): types, schemes, the union-find
//! type-variable arena, environments, and the constructor/FFI registries
//! the typechecker (C9) consults.
//!
//! Grounded on the retrieval pack's Hindley-Milner checkers
//! (`other_examples/34fa6cd3_snowdamiz-mesh-lang__crates-snow-typeck-src-lib.rs.rs`'s
//! `ty`/`unify`/`env` module split, `other_examples/bfc06899_upstat-io-sigil-lang__compiler-ori_types-src-check-mod.rs.rs`)
//! for the overall shape; the arena-of-handles representation for type
//! variables follows the teacher's design note (spec §9) rather than a
//! pervasive `Rc<RefCell<_>>` tree.

mod env;
mod unify;

pub use env::{ConstructorInfo, ConstructorRegistry, Environment, FfiOverload, FfiTable};
pub use unify::unify;

use indexmap::IndexMap;

use crate::intern::StringId;

/// A handle into a [`TypeArena`]. Cheap to copy, compared by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVarId(u32);

impl TypeVarId {
    /// The raw arena index, exposed only for diagnostic rendering
    /// (`'t3`-style placeholder names) — never meaningful to compare.
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Whether a type variable stands for a proper type or a record row tail
/// (spec §3: "kind tag (row vs proper)"). Unification never binds a
/// proper variable to a row or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Proper,
    Row,
}

/// The state of one type variable slot (spec §4.6's state machine):
/// `Unbound(rank)` → `Bound(Type)` on unification, or `Unbound(rank)` →
/// `Generalized(index)` on `generalize`.
#[derive(Debug, Clone)]
pub(crate) enum VarSlot {
    Unbound { rank: u32, kind: VarKind },
    Bound(Type),
    Generalized { index: u32, kind: VarKind },
}

/// Owns every type variable created during one compilation unit.
///
/// Binding is destructive: [`TypeArena::bind`] overwrites a slot in
/// place, and [`TypeArena::resolve`] follows bound chains with path
/// compression. This is the systems-language replacement (spec §9) for
/// the reference-based `Rc<RefCell<Option<Type>>>` cells a tree-walking
/// interpreter would use.
#[derive(Debug, Default, Clone)]
pub struct TypeArena {
    slots: Vec<VarSlot>,
}

impl TypeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh unbound proper type variable at `rank`.
    pub fn fresh(&mut self, rank: u32) -> TypeVarId {
        self.fresh_kind(rank, VarKind::Proper)
    }

    /// Creates a fresh unbound row variable at `rank`.
    pub fn fresh_row(&mut self, rank: u32) -> TypeVarId {
        self.fresh_kind(rank, VarKind::Row)
    }

    fn fresh_kind(&mut self, rank: u32, kind: VarKind) -> TypeVarId {
        let id = TypeVarId(u32::try_from(self.slots.len()).expect("fewer than u32::MAX type variables"));
        self.slots.push(VarSlot::Unbound { rank, kind });
        id
    }

    fn slot(&self, id: TypeVarId) -> &VarSlot {
        &self.slots[id.0 as usize]
    }

    /// Follows `Bound` links from `var` until an `Unbound`/`Generalized`
    /// slot or a non-`Var` type is reached, compressing the chain to
    /// point directly at the representative along the way.
    #[must_use]
    pub fn resolve(&mut self, ty: Type) -> Type {
        let Type::Var(mut id) = ty else { return ty };
        let mut chain = Vec::new();
        loop {
            match self.slot(id) {
                VarSlot::Bound(Type::Var(next)) => {
                    chain.push(id);
                    id = *next;
                }
                VarSlot::Bound(other) => {
                    let resolved = other.clone();
                    let resolved = if matches!(resolved, Type::Var(_)) { resolved } else { self.resolve_children(resolved) };
                    for link in &chain {
                        self.slots[link.0 as usize] = VarSlot::Bound(resolved.clone());
                    }
                    return resolved;
                }
                VarSlot::Unbound { .. } | VarSlot::Generalized { .. } => {
                    for link in &chain {
                        self.slots[link.0 as usize] = VarSlot::Bound(Type::Var(id));
                    }
                    return Type::Var(id);
                }
            }
        }
    }

    /// Resolves a compound type's direct `Var` children one level deep
    /// (used after following a bound chain so callers see a fully
    /// dereferenced shape at the top, matching `resolve`'s contract).
    fn resolve_children(&mut self, ty: Type) -> Type {
        match ty {
            Type::App(head, args) => {
                let head = Box::new(self.resolve(*head));
                let args = args.into_iter().map(|a| self.resolve(a)).collect();
                Type::App(head, args)
            }
            Type::Fun(params, ret) => {
                let params = params.into_iter().map(|p| self.resolve(p)).collect();
                let ret = Box::new(self.resolve(*ret));
                Type::Fun(params, ret)
            }
            Type::Tuple(elems) => Type::Tuple(elems.into_iter().map(|e| self.resolve(e)).collect()),
            Type::Ref(inner) => Type::Ref(Box::new(self.resolve(*inner))),
            Type::Record(fields, tail) => {
                let fields = fields.into_iter().map(|(k, v)| (k, self.resolve(v))).collect();
                let tail = tail.map(|t| Box::new(self.resolve(*t)));
                Type::Record(fields, tail)
            }
            other => other,
        }
    }

    /// Returns `var`'s rank if it is still unbound, else `None`.
    #[must_use]
    pub fn rank_of(&mut self, var: TypeVarId) -> Option<u32> {
        match self.resolve(Type::Var(var)) {
            Type::Var(id) => match self.slot(id) {
                VarSlot::Unbound { rank, .. } => Some(*rank),
                _ => None,
            },
            _ => None,
        }
    }

    #[must_use]
    pub fn kind_of(&self, var: TypeVarId) -> VarKind {
        match self.slot(var) {
            VarSlot::Unbound { kind, .. } | VarSlot::Generalized { kind, .. } => *kind,
            VarSlot::Bound(_) => VarKind::Proper,
        }
    }

    /// Lowers `var`'s rank to `min(current, rank)`. Called whenever a
    /// variable is unified with a type from an outer (lower-ranked)
    /// scope, so it is not accidentally generalized too early (spec §9
    /// "Levels for generalization").
    pub fn lower_rank(&mut self, var: TypeVarId, rank: u32) {
        if let VarSlot::Unbound { rank: r, .. } = &mut self.slots[var.0 as usize]
            && rank < *r
        {
            *r = rank;
        }
    }

    /// Binds `var` to `ty`. Callers (in `unify`) are responsible for the
    /// occurs check before calling this.
    pub fn bind(&mut self, var: TypeVarId, ty: Type) {
        self.slots[var.0 as usize] = VarSlot::Bound(ty);
    }

    /// Turns every currently-`Unbound` variable in `vars` into a
    /// `Generalized` slot, returning their assigned scheme indices in
    /// order. Variables already bound or generalized are skipped.
    pub fn generalize_vars(&mut self, vars: &[TypeVarId]) -> Vec<TypeVarId> {
        let mut generalized = Vec::with_capacity(vars.len());
        for (index, &var) in vars.iter().enumerate() {
            let index = u32::try_from(index).expect("fewer than u32::MAX generalized vars in one scheme");
            if let VarSlot::Unbound { kind, .. } = self.slot(var) {
                let kind = *kind;
                self.slots[var.0 as usize] = VarSlot::Generalized { index, kind };
                generalized.push(var);
            }
        }
        generalized
    }

    /// Instantiates `scheme` into a fresh type at `rank`: every variable
    /// in `scheme.vars` is replaced by a fresh `Unbound` variable, with
    /// all other occurrences of the same variable replaced consistently.
    #[must_use]
    pub fn instantiate(&mut self, scheme: &Scheme, rank: u32) -> Type {
        let mapping: IndexMap<TypeVarId, TypeVarId> = scheme
            .vars
            .iter()
            .map(|&v| {
                let kind = self.kind_of(v);
                let fresh = self.fresh_kind(rank, kind);
                (v, fresh)
            })
            .collect();
        self.substitute_generalized(&scheme.ty, &mapping)
    }

    fn substitute_generalized(&mut self, ty: &Type, mapping: &IndexMap<TypeVarId, TypeVarId>) -> Type {
        match ty {
            Type::Var(id) => match mapping.get(id) {
                Some(&fresh) => Type::Var(fresh),
                None => Type::Var(*id),
            },
            Type::Con(_) => ty.clone(),
            Type::App(head, args) => Type::App(
                Box::new(self.substitute_generalized(head, mapping)),
                args.iter().map(|a| self.substitute_generalized(a, mapping)).collect(),
            ),
            Type::Fun(params, ret) => Type::Fun(
                params.iter().map(|p| self.substitute_generalized(p, mapping)).collect(),
                Box::new(self.substitute_generalized(ret, mapping)),
            ),
            Type::Record(fields, tail) => Type::Record(
                fields.iter().map(|(k, v)| (*k, self.substitute_generalized(v, mapping))).collect(),
                tail.as_ref().map(|t| Box::new(self.substitute_generalized(t, mapping))),
            ),
            Type::Tuple(elems) => Type::Tuple(elems.iter().map(|e| self.substitute_generalized(e, mapping)).collect()),
            Type::Union(members) => Type::Union(members.iter().map(|m| self.substitute_generalized(m, mapping)).collect()),
            Type::Ref(inner) => Type::Ref(Box::new(self.substitute_generalized(inner, mapping))),
        }
    }

    /// Collects every still-`Unbound` variable reachable from `ty` whose
    /// rank is strictly greater than `boundary_rank` (spec §9's
    /// generalization walk), deduplicated and in first-seen order.
    pub fn free_vars_above(&mut self, ty: &Type, boundary_rank: u32, out: &mut Vec<TypeVarId>) {
        let resolved = self.resolve(ty.clone());
        match resolved {
            Type::Var(id) => {
                if let VarSlot::Unbound { rank, .. } = self.slot(id)
                    && *rank > boundary_rank
                    && !out.contains(&id)
                {
                    out.push(id);
                }
            }
            Type::Con(_) => {}
            Type::App(head, args) => {
                self.free_vars_above(&head, boundary_rank, out);
                for a in &args {
                    self.free_vars_above(a, boundary_rank, out);
                }
            }
            Type::Fun(params, ret) => {
                for p in &params {
                    self.free_vars_above(p, boundary_rank, out);
                }
                self.free_vars_above(&ret, boundary_rank, out);
            }
            Type::Record(fields, tail) => {
                for (_, v) in &fields {
                    self.free_vars_above(v, boundary_rank, out);
                }
                if let Some(t) = tail {
                    self.free_vars_above(&t, boundary_rank, out);
                }
            }
            Type::Tuple(elems) | Type::Union(elems) => {
                for e in &elems {
                    self.free_vars_above(e, boundary_rank, out);
                }
            }
            Type::Ref(inner) => self.free_vars_above(&inner, boundary_rank, out),
        }
    }
}

/// A type (spec §3). `Var` is a handle into a [`TypeArena`]; every other
/// variant is an ordinary value type, cloned freely.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Var(TypeVarId),
    /// A nominal, zero-argument or head constructor: `Int`, `String`,
    /// `List`, a user-declared variant/alias name.
    Con(StringId),
    /// `head<args...>`, e.g. `List<Int>`, `Option<a>`.
    App(Box<Type>, Vec<Type>),
    Fun(Vec<Type>, Box<Type>),
    /// `{ f: T, ... | tail }`. `tail = None` means the record is closed
    /// (spec §4.6's row-variable discipline).
    Record(IndexMap<StringId, Type>, Option<Box<Type>>),
    Tuple(Vec<Type>),
    /// Surface `T | U` sugar (spec §9 open question); never produced by
    /// unification, only by `lower_union_sugar` at the use site.
    Union(Vec<Type>),
    Ref(Box<Type>),
}

impl Type {
    #[must_use]
    pub fn unit() -> Self {
        Self::Tuple(Vec::new())
    }
}

/// `∀ vars. ty` — a generalized type scheme (spec §3).
#[derive(Debug, Clone)]
pub struct Scheme {
    pub vars: Vec<TypeVarId>,
    pub ty: Type,
}

impl Scheme {
    /// A scheme with no generalized variables — every monomorphic type
    /// is trivially its own (empty) scheme.
    #[must_use]
    pub fn monomorphic(ty: Type) -> Self {
        Self { vars: Vec::new(), ty }
    }
}
