//! Integration tests for the typechecker (C9, spec §4.6).

use vesper_front::typed_ast::TypedDecl;
use vesper_front::types::Type;
use vesper_front::{DiagnosticCode, PipelineConfig, compile};

fn typecheck_ok(source: &str) -> vesper_front::typed_ast::TypedModule {
    let (typed, warnings) = compile(source, "<test>", PipelineConfig::default()).expect("should typecheck");
    assert!(warnings.is_empty(), "expected no warnings, got {warnings:?}");
    typed
}

fn typecheck_err(source: &str) -> vesper_front::Diagnostic {
    compile(source, "<test>", PipelineConfig::default()).expect_err("should fail to typecheck")
}

#[test]
fn identity_function_generalizes_to_a_single_type_variable_scheme() {
    // spec §8 "Principal types".
    let typed = typecheck_ok("let id = (x) => x\n");
    let TypedDecl::Let { scheme, .. } = &typed.declarations[0] else { panic!("expected a let") };
    assert_eq!(scheme.vars.len(), 1);
    assert!(matches!(scheme.ty, Type::Fun(..)));
}

#[test]
fn a_ref_binding_is_never_generalized_even_when_its_inner_type_is_a_fresh_variable() {
    // spec §8 "Value restriction": `ref(...)` is not a syntactic value.
    let typed = typecheck_ok("let r = ref(1)\n");
    let TypedDecl::Let { scheme, .. } = &typed.declarations[0] else { panic!("expected a let") };
    assert!(scheme.vars.is_empty());
}

#[test]
fn mixing_int_and_float_without_conversion_is_rejected_as_a_numeric_discipline_error() {
    let err = typecheck_err("let x = 1 + 1.5\n");
    assert_eq!(err.code, DiagnosticCode::VF4009);
}

#[test]
fn calling_a_non_function_value_is_rejected() {
    let err = typecheck_err("let x = 1\nlet y = x(2)\n");
    assert_eq!(err.code, DiagnosticCode::VF4013);
}

#[test]
fn applying_a_function_with_the_wrong_number_of_arguments_is_rejected() {
    let err = typecheck_err("let f = (a, b) => a\nlet y = f(1)\n");
    assert_eq!(err.code, DiagnosticCode::VF4021);
}

#[test]
fn an_occurs_check_violation_is_rejected() {
    let err = typecheck_err("let f = (x) => x(x)\n");
    assert_eq!(err.code, DiagnosticCode::VF4300);
}

#[test]
fn referencing_an_undefined_name_is_rejected() {
    let err = typecheck_err("let x = unknown_name\n");
    assert_eq!(err.code, DiagnosticCode::VF4100);
}

#[test]
fn duplicate_top_level_bindings_are_rejected() {
    let err = typecheck_err("let x = 1\nlet x = 2\n");
    assert_eq!(err.code, DiagnosticCode::VF5102);
}

#[test]
fn accessing_a_field_a_closed_record_does_not_have_is_rejected() {
    let err = typecheck_err("let p = { x: 1, y: 2 }\nlet z = p.missing\n");
    assert_eq!(err.code, DiagnosticCode::VF4501);
}

#[test]
fn a_duplicate_field_in_a_record_literal_is_rejected() {
    let err = typecheck_err("let p = { x: 1, x: 2 }\n");
    assert_eq!(err.code, DiagnosticCode::VF4502);
}

#[test]
fn record_field_access_is_row_polymorphic() {
    let typed = typecheck_ok("let get_x = (p) => p.x\nlet a = get_x({ x: 1 })\nlet b = get_x({ x: 2, y: 3 })\n");
    assert_eq!(typed.declarations.len(), 3);
}

#[test]
fn tuples_of_mismatched_arity_fail_to_unify() {
    let err = typecheck_err("let f = (p) => match p { | (a, b) => a }\nlet y = f((1, 2, 3))\n");
    assert_eq!(err.code, DiagnosticCode::VF4026);
}

#[test]
fn a_recursive_type_alias_is_rejected() {
    let err = typecheck_err("type Loop = Loop\n");
    assert_eq!(err.code, DiagnosticCode::VF4301);
}

#[test]
fn recursion_through_a_variant_constructor_is_permitted() {
    let typed = typecheck_ok("type List<a> = Cons(a, List<a>) | Nil\nlet xs = Cons(1, Nil)\n");
    assert_eq!(typed.declarations.len(), 2);
}

#[test]
fn applying_a_generic_type_constructor_to_the_wrong_number_of_arguments_is_rejected() {
    let err = typecheck_err("let x: List<Int, Int> = [1]\n");
    assert_eq!(err.code, DiagnosticCode::VF4204);
}

#[test]
fn an_undefined_constructor_used_in_an_expression_is_rejected() {
    let err = typecheck_err("let x = SomeUnknownCtor(1)\n");
    assert_eq!(err.code, DiagnosticCode::VF4102);
}

#[test]
fn wrong_constructor_arity_in_a_pattern_is_rejected() {
    let source = concat!(
        "type Shape = Circle(Int)\n",
        "let f = (s) => match s {\n",
        "  | Circle(a, b) => a\n",
        "}\n",
    );
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4602);
}

#[test]
fn an_undefined_constructor_used_in_a_pattern_is_rejected() {
    let source = concat!("type Shape = Circle(Int)\n", "let f = (s) => match s {\n", "  | Square(a) => a\n", "}\n");
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4600);
}

#[test]
fn a_constructor_pattern_argument_with_the_wrong_literal_type_is_rejected() {
    let source = concat!("type Shape = Circle(Int)\n", "let f = (s) => match s {\n", "  | Circle(\"oops\") => 0\n", "}\n");
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4601);
}

#[test]
fn a_literal_pattern_that_cannot_match_the_scrutinees_type_is_rejected() {
    let err = typecheck_err("let f = (s: String) => match s {\n  | 1 => 0\n  | _ => 1\n}\n");
    assert_eq!(err.code, DiagnosticCode::VF4404);
}

#[test]
fn or_patterns_with_different_bound_names_are_rejected() {
    let source = concat!(
        "type Shape = Circle(Int) | Square(Int)\n",
        "let f = (s) => match s {\n",
        "  | Circle(r) | Square(side) => r\n",
        "}\n",
    );
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4403);
}

#[test]
fn a_guard_that_is_not_boolean_is_rejected() {
    let source = "let f = (x) => match x {\n  | y when 1 => y\n  | _ => 0\n}\n";
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4011);
}

#[test]
fn a_value_restricted_binding_used_at_a_second_incompatible_type_outside_assignment_is_rejected() {
    // spec §8 "Value restriction": `r`'s scheme is monomorphized because
    // `ref(None)` is not a syntactic value, so calling it at two
    // different element types through ordinary application (not `:=`)
    // must fail with VF4701, not a bare unification mismatch.
    let source = concat!(
        "type Option<a> = Some(a) | None\n",
        "external use_int_ref: (Ref<Option<Int>>) -> Int = \"useIntRef\"\n",
        "external use_string_ref: (Ref<Option<String>>) -> Int = \"useStringRef\"\n",
        "let r = ref(None)\n",
        "let _a = use_int_ref(r)\n",
        "let _b = use_string_ref(r)\n",
    );
    let err = typecheck_err(source);
    assert_eq!(err.code, DiagnosticCode::VF4701);
}
