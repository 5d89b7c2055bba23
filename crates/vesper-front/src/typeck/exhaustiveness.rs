//! Match exhaustiveness/usefulness (spec §4.6 "Exhaustiveness", §9 open
//! question). A simplified single-column algorithm: it only recognizes
//! coverage over variant-constructor sets and `Bool`, the two finite
//! domains the desugarer ever produces a full-coverage `match` over (the
//! `if`/`else` lowering always yields exactly `true`/`false`). Patterns
//! over `Int`/`Float`/`String`/records/tuples are treated as always
//! covering their column (those domains are either infinite or, for
//! tuples/records, a single irrefutable shape), so this never
//! false-positives a missing-pattern error for them — it can, however,
//! miss reporting a genuinely non-exhaustive nested match inside a
//! variant argument; that refinement is out of scope here (see
//! `DESIGN.md`).

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source::Span;
use crate::syntax::{Literal, PatternKind};
use crate::typed_ast::TypedMatchArm;
use crate::types::Type;

use super::Checker;

impl Checker<'_> {
    pub(crate) fn check_exhaustiveness(&mut self, span: Span, scrutinee_ty: &Type, arms: &[TypedMatchArm]) -> Result<(), Diagnostic> {
        let resolved = self.arena.resolve(scrutinee_ty.clone());
        let domain = match &resolved {
            Type::Con(name) if *name == self.builtin.bool_ => Some(vec!["true".to_owned(), "false".to_owned()]),
            Type::Con(name) => self.global.variants_of.get(name).map(|ctors| ctors.iter().map(|&c| self.resolve_name(c)).collect()),
            Type::App(head, _) => match &**head {
                Type::Con(name) => self.global.variants_of.get(name).map(|ctors| ctors.iter().map(|&c| self.resolve_name(c)).collect()),
                _ => None,
            },
            _ => None,
        };

        let Some(domain) = domain else {
            return Ok(());
        };

        let mut covered = std::collections::HashSet::new();
        let mut has_catch_all = false;
        let mut unreachable_spans = Vec::new();
        for arm in arms {
            if arm.guard.is_some() {
                // A guarded arm never counts toward coverage: it may
                // reject at runtime, so the checker cannot assume it
                // covers the whole constructor/literal it matches.
                continue;
            }
            if has_catch_all {
                unreachable_spans.push(arm.pattern.span);
                continue;
            }
            self.collect_pattern_coverage(&arm.pattern.kind, &mut covered, &mut has_catch_all);
        }

        for unreachable_span in unreachable_spans {
            self.warnings.add(Diagnostic::create(DiagnosticCode::VF4900, unreachable_span, &[]));
        }

        if has_catch_all {
            return Ok(());
        }

        let missing: Vec<&String> = domain.iter().filter(|name| !covered.contains(*name)).collect();
        if !missing.is_empty() {
            let rendered = missing.iter().map(std::string::String::as_str).collect::<Vec<_>>().join(", ");
            return Err(Diagnostic::create(DiagnosticCode::VF4400, span, &[("missing", &rendered)]));
        }
        Ok(())
    }

    fn collect_pattern_coverage(&mut self, kind: &PatternKind, covered: &mut std::collections::HashSet<String>, has_catch_all: &mut bool) {
        match kind {
            PatternKind::Wildcard | PatternKind::Var(_) => *has_catch_all = true,
            PatternKind::Literal(Literal::Bool(b)) => {
                covered.insert(b.to_string());
            }
            PatternKind::Constructor { name, .. } => {
                covered.insert(self.resolve_name(name.name));
            }
            PatternKind::Or(alts) => {
                for a in alts {
                    self.collect_pattern_coverage(&a.kind, covered, has_catch_all);
                }
            }
            PatternKind::Typed { pattern, .. } => self.collect_pattern_coverage(&pattern.kind, covered, has_catch_all),
            _ => {}
        }
    }
}
