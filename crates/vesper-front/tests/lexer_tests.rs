//! Integration tests for the lexer (C3, spec §4.3).

use vesper_front::{DiagnosticCode, Interner, TokenKind, lex};

fn tokenize(source: &str) -> Vec<TokenKind> {
    let mut interner = Interner::new();
    let tokens = lex(source, "<test>", &mut interner).expect("lexing should succeed");
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_a_simple_let_binding() {
    let kinds = tokenize("let x = 1\n");
    assert!(matches!(kinds[0], TokenKind::Keyword(vesper_front::lexer::Keyword::Let)));
    assert!(matches!(kinds[1], TokenKind::Identifier(_)));
    assert!(matches!(kinds[2], TokenKind::OpEquals));
    assert!(matches!(kinds[3], TokenKind::IntLiteral(1)));
}

#[test]
fn unterminated_string_literal_is_a_fatal_diagnostic() {
    let mut interner = Interner::new();
    let err = lex("let x = \"abc\n", "<test>", &mut interner).unwrap_err();
    assert!(err.is_error());
}

#[test]
fn maximal_munch_prefers_the_longest_operator() {
    let kinds = tokenize("a <= b\n");
    assert!(kinds.iter().any(|k| matches!(k, TokenKind::OpLte)));
    let kinds = tokenize("a |> b\n");
    assert!(kinds.iter().any(|k| matches!(k, TokenKind::OpPipeGt)));
}

#[test]
fn identifiers_are_nfc_normalized_before_interning() {
    let mut interner = Interner::new();
    let precomposed = lex("caf\u{e9}\n", "<test>", &mut interner).expect("lex ok");
    let decomposed = lex("cafe\u{301}\n", "<test>", &mut interner).expect("lex ok");
    let TokenKind::Identifier(a) = precomposed[0].kind else { panic!("expected identifier") };
    let TokenKind::Identifier(b) = decomposed[0].kind else { panic!("expected identifier") };
    assert_eq!(a, b);
}

#[test]
fn astral_plane_characters_in_a_string_advance_the_column_by_one() {
    let mut interner = Interner::new();
    let tokens = lex("let x = \"\u{1F600}\"\n", "<test>", &mut interner).expect("lex ok");
    // The string literal token should start right after `= `.
    let string_tok = tokens.iter().find(|t| matches!(t.kind, TokenKind::StringLiteral(_))).expect("a string literal token");
    assert_eq!(string_tok.span.start.column, 9);
}

#[test]
fn reserved_future_keyword_is_rejected_as_an_identifier() {
    let mut interner = Interner::new();
    let err = lex("let yield = 1\n", "<test>", &mut interner).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::VF1500);
}

#[test]
fn carriage_return_is_consumed_without_advancing_the_cursor() {
    let kinds = tokenize("let x = 1\r\nlet y = 2\n");
    // Two let-bindings worth of tokens, each terminated by one logical
    // newline rather than two (the `\r` contributes nothing).
    let newline_count = kinds.iter().filter(|k| matches!(k, TokenKind::Newline)).count();
    assert_eq!(newline_count, 2);
}
