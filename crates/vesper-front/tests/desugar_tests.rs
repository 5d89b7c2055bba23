//! Integration tests for the desugarer (C7, spec §4.5).

use vesper_front::core_ast::{CoreDecl, CoreExprKind};
use vesper_front::{DiagnosticCode, Interner, PipelineConfig, desugar_module, lex, parse_tokens};

fn desugar_source(source: &str) -> vesper_front::core_ast::CoreModule {
    let mut interner = Interner::new();
    let tokens = lex(source, "<test>", &mut interner).expect("lexing should succeed");
    let mut errors = Vec::new();
    let module = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default()).expect("parsing should succeed");
    assert!(errors.is_empty());
    desugar_module(module, &mut interner).expect("desugaring should succeed")
}

fn desugar_source_err(source: &str) -> vesper_front::Diagnostic {
    let mut interner = Interner::new();
    let tokens = lex(source, "<test>", &mut interner).expect("lexing should succeed");
    let mut errors = Vec::new();
    let module = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default()).expect("parsing should succeed");
    assert!(errors.is_empty());
    desugar_module(module, &mut interner).expect_err("desugaring should fail")
}

#[test]
fn record_update_lowers_to_a_record_update_core_node() {
    let core = desugar_source("let q = { p | x: 1 }\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    assert!(matches!(&*value.kind, CoreExprKind::RecordUpdate { .. }));
}

#[test]
fn mutually_recursive_let_rec_and_bindings_lower_to_a_single_let_rec_with_every_binding() {
    let core = desugar_source("let rec is_even = (n) => true and is_odd = (n) => false\n");
    let CoreDecl::LetRec { bindings, .. } = &core.declarations[0] else { panic!("expected a let rec") };
    assert_eq!(bindings.len(), 2);
}

#[test]
fn destructuring_let_at_module_scope_lowers_to_one_let_per_synthetic_temporary_plus_one_let_per_bound_name() {
    let core = desugar_source("let (a, b) = (1, 2)\n");
    // One synthetic `Let` binding the tuple value, plus one projection per
    // bound name: `a` and `b`.
    assert_eq!(core.declarations.len(), 3);
    let CoreDecl::Let { name: tmp_name, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreDecl::Let { name: a_name, value: a_value, .. } = &core.declarations[1] else { panic!("expected a let") };
    let CoreDecl::Let { name: b_name, value: b_value, .. } = &core.declarations[2] else { panic!("expected a let") };
    assert_ne!(tmp_name.name, a_name.name);
    assert_ne!(tmp_name.name, b_name.name);
    assert_ne!(a_name.name, b_name.name);
    assert!(matches!(&*a_value.kind, CoreExprKind::Match { .. }));
    assert!(matches!(&*b_value.kind, CoreExprKind::Match { .. }));
}

#[test]
fn destructuring_let_inside_a_block_wraps_the_continuation_in_a_match() {
    let core = desugar_source("let f = () => {\n  let (a, b) = (1, 2)\n  a\n}\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreExprKind::Lambda { body, .. } = &*value.kind else { panic!("expected a lambda") };
    assert!(matches!(&*body.kind, CoreExprKind::Match { .. }));
}

#[test]
fn list_literal_lowers_to_a_synthetic_list_variant_application() {
    let core = desugar_source("let xs = [1, 2, 3]\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreExprKind::Variant { args, .. } = &*value.kind else { panic!("expected a variant") };
    assert_eq!(args.len(), 3);
}

#[test]
fn tuple_literal_lowers_to_a_synthetic_tuple_variant_application() {
    let core = desugar_source("let t = (1, \"a\", true)\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreExprKind::Variant { args, .. } = &*value.kind else { panic!("expected a variant") };
    assert_eq!(args.len(), 3);
}

#[test]
fn spread_inside_a_tuple_like_list_literal_is_rejected() {
    let mut interner = Interner::new();
    let tokens = lex("let xs = [...ys]\n", "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let module = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default()).expect("parse ok");
    assert!(desugar_module(module, &mut interner).is_err());
}

#[test]
fn string_concatenation_lowers_to_an_application_of_the_builtin_concat_external() {
    let core = desugar_source("let s = \"a\" & \"b\"\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreExprKind::App { callee, args } = &*value.kind else { panic!("expected an application") };
    assert!(matches!(&*callee.kind, CoreExprKind::External(_)));
    assert_eq!(args.len(), 2);
}

#[test]
fn a_destructured_lambda_parameter_is_matched_against_a_synthetic_temporary() {
    let core = desugar_source("let f = ((a, b)) => a\n");
    let CoreDecl::Let { value, .. } = &core.declarations[0] else { panic!("expected a let") };
    let CoreExprKind::Lambda { body, .. } = &*value.kind else { panic!("expected a lambda") };
    assert!(matches!(&*body.kind, CoreExprKind::Match { .. }));
}

#[test]
fn a_top_level_let_that_shadows_a_named_import_is_rejected() {
    // spec §4.5 "Shadowing and duplicates": an import shadowed by a local
    // declaration is VF5003.
    let err = desugar_source_err("import { helper } from \"./util.js\"\nlet helper = 1\n");
    assert_eq!(err.code, DiagnosticCode::VF5003);
}

#[test]
fn a_top_level_external_that_shadows_a_star_import_alias_is_rejected() {
    let err = desugar_source_err("import * as util from \"./util.js\"\nexternal util: Int = \"util\"\n");
    assert_eq!(err.code, DiagnosticCode::VF5003);
}
