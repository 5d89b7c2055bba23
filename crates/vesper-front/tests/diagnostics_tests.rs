//! Integration tests for the diagnostic registry (spec §6).

use vesper_front::{Diagnostic, DiagnosticCode, Phase, PipelineConfig, Severity, compile};
use vesper_front::source::{Location, Span};

fn dummy_span() -> Span {
    Span::point(Location::start_of_file(vesper_front::StringId::from_index(0)))
}

#[test]
fn lexer_codes_are_classified_as_errors_in_the_lexer_phase() {
    let diag = Diagnostic::create(DiagnosticCode::VF1002, dummy_span(), &[]);
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.phase, Phase::Lexer);
}

#[test]
fn an_unreachable_match_arm_is_classified_as_a_warning_in_the_typechecker_phase() {
    let diag = Diagnostic::create(DiagnosticCode::VF4900, dummy_span(), &[]);
    assert_eq!(diag.severity, Severity::Warning);
    assert_eq!(diag.phase, Phase::Typechecker);
}

#[test]
fn the_raw_newline_in_string_diagnostic_carries_a_hint() {
    let diag = Diagnostic::create(DiagnosticCode::VF1001, dummy_span(), &[]);
    assert!(diag.hint.is_some());
}

#[test]
fn most_diagnostic_codes_carry_no_hint() {
    let diag = Diagnostic::create(DiagnosticCode::VF1002, dummy_span(), &[]);
    assert!(diag.hint.is_none());
}

#[test]
fn template_placeholders_are_substituted_verbatim() {
    let diag = Diagnostic::create(DiagnosticCode::VF1500, dummy_span(), &[("name", "yield")]);
    assert_eq!(diag.message, "'yield' is reserved for future use and cannot be used as an identifier");
}

#[test]
fn an_unsupplied_placeholder_is_left_literal_rather_than_panicking() {
    let diag = Diagnostic::create(DiagnosticCode::VF1500, dummy_span(), &[]);
    assert_eq!(diag.message, "'{name}' is reserved for future use and cannot be used as an identifier");
}

#[test]
fn diagnostic_codes_round_trip_through_their_display_and_from_str_forms() {
    use std::str::FromStr;
    assert_eq!(DiagnosticCode::VF4900.to_string(), "VF4900");
    assert_eq!(DiagnosticCode::from_str("VF4900").unwrap(), DiagnosticCode::VF4900);
}

#[test]
fn a_real_pipeline_failure_carries_a_span_pointing_at_the_offending_source() {
    let err = compile("let x = \"unterminated\n", "<test>", PipelineConfig::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF1002);
    assert!(err.is_error());
    assert_eq!(err.span.start.line, 1);
}
