//! Integration tests for the parser (C5, spec §4.4).

use vesper_front::syntax::{Declaration, ExprKind};
use vesper_front::{DiagnosticCode, Interner, lex, parse_tokens, PipelineConfig};

fn parse_ok(source: &str) -> vesper_front::syntax::Module {
    let mut interner = Interner::new();
    let tokens = lex(source, "<test>", &mut interner).expect("lexing should succeed");
    let mut errors = Vec::new();
    let module = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default()).expect("parsing should succeed");
    assert!(errors.is_empty(), "expected no recoverable errors, got {errors:?}");
    module
}

#[test]
fn parses_record_and_variant_type_declarations() {
    let module = parse_ok("type Point = { x: Int, y: Int }\ntype Shape = Circle(Point, Int) | Square(Point, Int)\n");
    assert_eq!(module.declarations.len(), 2);
}

#[test]
fn parses_a_match_expression_with_a_guard() {
    let module = parse_ok("let describe = (n) => match n {\n  | 0 => \"zero\"\n  | x when x > 0 => \"positive\"\n  | _ => \"negative\"\n}\n");
    let Declaration::Let { value, .. } = &module.declarations[0] else { panic!("expected a let") };
    assert!(matches!(&*value.kind, ExprKind::Lambda { .. }));
}

#[test]
fn minus_after_whitespace_before_an_operand_is_rejected_as_ambiguous() {
    let mut interner = Interner::new();
    // `a - 1`/`a -1` are both ordinary binary subtraction: the additive
    // level consumes a binary `-` unconditionally once an operand already
    // stands to its left, so whitespace around it never matters there.
    // The `(-x)` vs `(- x)` ambiguity (spec §8 scenario 3) only arises
    // where a `-` could instead *start* a fresh sub-expression, i.e.
    // right after `(`.
    let tokens = lex("let x = a - 1\n", "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let result = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default());
    assert!(result.is_ok());

    let tokens = lex("let x = a -1\n", "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let result = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default());
    assert!(result.is_ok());

    // `(- x)` starts a fresh expression right after `(` with whitespace
    // before its operand: spec §8 scenario 3 accepts this as the same
    // unary-minus AST as `(-x)` precisely because the preceding token is
    // `LPAREN`.
    let tokens = lex("let y = (- x)\n", "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let result = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default());
    assert!(result.is_ok());
    assert!(errors.is_empty());

    // Away from `(`, a `-` that starts a fresh expression with whitespace
    // before its operand is the ambiguous case spec §8 scenario 3 rejects
    // with `VF2112`.
    let tokens = lex("let z = - x\n", "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let result = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default());
    assert!(result.is_err() || errors.iter().any(|e| e.code == DiagnosticCode::VF2112));
}

#[test]
fn pipe_can_continue_onto_the_next_line_after_a_token_that_cannot_end_an_expression() {
    let module = parse_ok("let f = (x) => x\nlet y = 1\n  |> f\n");
    assert_eq!(module.declarations.len(), 2);
}

#[test]
fn external_declaration_with_import_path_parses() {
    let module = parse_ok("external add: (Int, Int) -> Int = \"add\" from \"./math.js\"\n");
    assert!(matches!(module.declarations[0], Declaration::External { .. }));
}

#[test]
fn external_block_form_shares_one_import_path_across_several_bindings() {
    let module = parse_ok(concat!(
        "external from \"./math.js\" {\n",
        "  add: (Int, Int) -> Int = \"add\"\n",
        "  sub: (Int, Int) -> Int = \"sub\"\n",
        "}\n",
    ));
    assert_eq!(module.declarations.len(), 2);
    for decl in &module.declarations {
        let Declaration::External { import_path, .. } = decl else { panic!("expected an external") };
        assert!(import_path.is_some());
    }
}

#[test]
fn external_block_form_without_a_shared_import_path_parses() {
    let module = parse_ok(concat!("external {\n", "  add: (Int, Int) -> Int = \"add\"\n", "}\n"));
    assert_eq!(module.declarations.len(), 1);
}

#[test]
fn a_trailing_pipe_with_no_following_alternative_in_an_or_pattern_is_rejected() {
    let mut interner = Interner::new();
    let source = "let f = (s) => match s {\n  | Circle(r) | =>\n}\n";
    let tokens = lex(source, "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let result = parse_tokens(&tokens, &interner, &mut errors, PipelineConfig::default());
    let err = result.expect_err("expected a parse error");
    assert_eq!(err.code, DiagnosticCode::VF2201);
}

#[test]
fn recoverable_errors_accumulate_until_the_configured_threshold() {
    let mut interner = Interner::new();
    let mut bad_source = String::new();
    for _ in 0..20 {
        bad_source.push_str("let 1 = 2\n");
    }
    let tokens = lex(&bad_source, "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let config = PipelineConfig { max_parse_errors: 4, ..PipelineConfig::default() };
    let result = parse_tokens(&tokens, &interner, &mut errors, config);
    assert!(result.is_err());
    assert!(errors.iter().any(|e| e.code == DiagnosticCode::VF2500));
}

#[test]
fn deeply_nested_parens_fail_fatally_instead_of_overflowing_the_stack() {
    let mut interner = Interner::new();
    let depth = 500;
    let mut source = String::from("let x = ");
    source.push_str(&"(".repeat(depth));
    source.push('1');
    source.push_str(&")".repeat(depth));
    source.push('\n');
    let tokens = lex(&source, "<test>", &mut interner).expect("lex ok");
    let mut errors = Vec::new();
    let config = PipelineConfig { max_nesting_depth: 50, ..PipelineConfig::default() };
    let result = parse_tokens(&tokens, &interner, &mut errors, config);
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().code, DiagnosticCode::VF2500);
}
