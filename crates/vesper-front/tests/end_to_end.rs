//! End-to-end pipeline tests (spec §8 "end-to-end scenarios"):
//! `lex → parse → desugar → typecheck` run as one unit via
//! [`vesper_front::compile`].

use vesper_front::{DiagnosticCode, PipelineConfig, compile};

#[test]
fn unterminated_string_is_a_fatal_lex_error_at_the_expected_location() {
    // spec §8 scenario 1.
    let err = compile("let msg = \"hello\n", "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF1002);
    assert_eq!(err.span.start.line, 1);
}

#[test]
fn reserved_keyword_as_a_binding_name_is_fatal() {
    // spec §8 scenario 2.
    let err = compile("let async = 1\n", "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF1500);
    assert!(err.message.contains("async"));
}

#[test]
fn let_polymorphism_lets_the_identity_function_be_used_at_two_types() {
    // spec §8 scenario 4.
    let source = "let id = (x) => x\nlet a = id(1)\nlet b = id(\"a\")\n";
    let (typed, warnings) = compile(source, "<test>", PipelineConfig::default()).expect("should typecheck");
    assert!(warnings.is_empty());
    assert_eq!(typed.declarations.len(), 3);
}

#[test]
fn mutating_a_ref_at_an_incompatible_type_after_monomorphization_is_fatal() {
    // spec §8 scenario 5: `r`'s scheme is monomorphized by the first
    // mutation, so the third statement's `Some(String)` vs `Option<Int>`
    // mismatch is a unification failure, not a fresh generalization.
    let source = concat!(
        "type Option<a> = Some(a) | None\n",
        "let r = ref(None)\n",
        "let _a = r := Some(1)\n",
        "let _b = r := Some(\"x\")\n",
    );
    let err = compile(source, "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF4016);
}

#[test]
fn overloaded_ffi_call_resolves_by_argument_count() {
    // spec §8 scenario 6.
    let source = concat!(
        "external fetch: (String) -> Int = \"fetch\"\n",
        "external fetch: (String, Int) -> Int = \"fetch\"\n",
        "let a = fetch(\"u\")\n",
        "let b = fetch(\"u\", 1)\n",
    );
    let (typed, _) = compile(source, "<test>", PipelineConfig::default()).expect("both calls should resolve");
    assert_eq!(typed.declarations.len(), 4);
}

#[test]
fn using_an_overloaded_external_as_a_bare_value_is_fatal() {
    let source = concat!(
        "external fetch: (String) -> Int = \"fetch\"\n",
        "external fetch: (String, Int) -> Int = \"fetch\"\n",
        "let f = fetch\n",
    );
    let err = compile(source, "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF4804);
}

#[test]
fn a_non_exhaustive_match_over_a_declared_variant_is_fatal_with_the_missing_constructor_listed() {
    let source = concat!(
        "type Shape = Circle(Int) | Square(Int)\n",
        "let area = (s) => match s {\n",
        "  | Circle(r) => r\n",
        "}\n",
    );
    let err = compile(source, "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF4400);
    assert!(err.message.contains("Square"));
}

#[test]
fn an_unreachable_arm_after_a_catch_all_is_a_non_fatal_warning() {
    let source = "let f = (b) => match b {\n  | _ => 0\n  | true => 1\n}\n";
    let (_, warnings) = compile(source, "<test>", PipelineConfig::default()).expect("should typecheck with a warning");
    assert!(warnings.iter().any(|w| w.code == DiagnosticCode::VF4900));
}

#[test]
fn string_concatenation_lowers_to_the_builtin_and_typechecks_as_string() {
    let source = "let greeting = \"hello\" & \" \" & \"world\"\n";
    let (typed, _) = compile(source, "<test>", PipelineConfig::default()).expect("should typecheck");
    assert_eq!(typed.declarations.len(), 1);
}

#[test]
fn pipe_desugars_and_typechecks_through_a_unary_function() {
    let source = "let inc = (x) => x + 1\nlet y = 1 |> inc\n";
    let (typed, _) = compile(source, "<test>", PipelineConfig::default()).expect("should typecheck");
    assert_eq!(typed.declarations.len(), 2);
}

#[test]
fn if_without_then_is_a_fatal_parse_error() {
    let err = compile("let x = if true 1 else 2\n", "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF2105);
}
