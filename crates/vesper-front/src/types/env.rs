//! Environments the typechecker consults: the lexically-scoped value
//! environment, the global constructor registry, and the FFI overload
//! table (spec §3 "Type Model").

use indexmap::IndexMap;

use crate::intern::StringId;
use crate::source::Span;
use crate::syntax::Ident;

use super::{Scheme, Type};

/// Name → scheme, stacked by scope (spec §3). Lookup walks from the
/// innermost scope outward, matching ordinary lexical shadowing.
#[derive(Debug, Default)]
pub struct Environment {
    scopes: Vec<IndexMap<StringId, Scheme>>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self { scopes: vec![IndexMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "the module-level scope is never popped");
    }

    /// Binds `name` to `scheme` in the current (innermost) scope,
    /// shadowing any outer binding of the same name.
    pub fn bind(&mut self, name: StringId, scheme: Scheme) {
        self.scopes.last_mut().expect("at least one scope is always live").insert(name, scheme);
    }

    #[must_use]
    pub fn lookup(&self, name: StringId) -> Option<&Scheme> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// True if `name` is bound in the *current* (innermost) scope only —
    /// used for same-scope duplicate-binding checks (`VF5102`).
    #[must_use]
    pub fn bound_in_current_scope(&self, name: StringId) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains_key(&name))
    }
}

/// One constructor's signature: its argument types (in declaration
/// order) and the scheme of the variant type it belongs to, e.g. for
/// `type Option<a> = None | Some(a)`, `Some` has `args = [a]` and
/// `parent = ∀a. Option<a>`.
#[derive(Debug, Clone)]
pub struct ConstructorInfo {
    pub args: Vec<Type>,
    pub parent: Scheme,
    pub type_name: StringId,
}

/// Ctor name → info, global per module (spec §4.6 "each `type T = Ctor(…)
/// | …` registers constructors globally in the current module scope").
#[derive(Debug, Default)]
pub struct ConstructorRegistry {
    ctors: IndexMap<StringId, ConstructorInfo>,
}

impl ConstructorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: StringId, info: ConstructorInfo) {
        self.ctors.insert(name, info);
    }

    #[must_use]
    pub fn lookup(&self, name: StringId) -> Option<&ConstructorInfo> {
        self.ctors.get(&name)
    }
}

/// One overload of an `external` declaration (spec §3 "FFI table").
#[derive(Debug, Clone)]
pub struct FfiOverload {
    pub scheme: Scheme,
    pub js_name: StringId,
    pub import_path: Option<StringId>,
    pub span: Span,
}

/// External name → non-empty ordered list of overloads, with the
/// invariant (checked at registration time, `VF4801`/`VF4802`) that
/// every overload shares the same `js_name` and `import_path`.
#[derive(Debug, Default)]
pub struct FfiTable {
    externals: IndexMap<StringId, Vec<FfiOverload>>,
}

impl FfiTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn overloads(&self, name: StringId) -> Option<&[FfiOverload]> {
        self.externals.get(&name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_overloaded(&self, name: StringId) -> bool {
        self.externals.get(&name).is_some_and(|o| o.len() > 1)
    }

    /// Appends `overload` to `name`'s overload list without checking the
    /// shared-`js_name`/shared-`import_path` invariant; the typechecker
    /// (which alone can render diagnostics) performs that check before
    /// calling this.
    pub fn push(&mut self, name: StringId, overload: FfiOverload) {
        self.externals.entry(name).or_default().push(overload);
    }

    #[must_use]
    pub fn declared_name(&self, ident: &Ident) -> bool {
        self.externals.contains_key(&ident.name)
    }
}
