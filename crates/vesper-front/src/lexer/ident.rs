//! Identifier, keyword, and boolean-literal scanning (spec §4.3
//! "Identifiers").

use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;

use super::token::RESERVED_FOR_FUTURE;
use super::{Keyword, Lexer, Token, TokenKind};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source::{Location, Span};

/// Emoji ranges approximating "emoji-presentation code point" (spec
/// §4.3). `unicode-ident`'s XID tables don't cover emoji, so identifier
/// boundaries here are widened by a small table of the common emoji
/// blocks rather than a full Unicode emoji-presentation property lookup.
fn is_emoji_like(c: char) -> bool {
    matches!(c as u32,
        0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x1F1E6..=0x1F1FF | 0x2190..=0x21FF | 0x2B00..=0x2BFF)
}

pub(super) fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c) || is_emoji_like(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c == '\u{200D}' || unicode_ident::is_xid_continue(c) || is_emoji_like(c)
}

pub(super) fn scan_identifier(lexer: &mut Lexer<'_>, start: Location, leading_whitespace: bool) -> Result<Token, Diagnostic> {
    let mut raw = String::new();
    raw.push(lexer.bump().expect("caller checked an identifier-start character is present"));
    while let Some(c) = lexer.peek() {
        if !is_ident_continue(c) {
            break;
        }
        raw.push(c);
        lexer.bump();
    }

    let normalized: String = raw.nfc().collect();

    if RESERVED_FOR_FUTURE.contains(&normalized.as_str()) {
        return Err(Diagnostic::create(
            DiagnosticCode::VF1500,
            Span::new(start, lexer.location()),
            &[("name", &normalized)],
        ));
    }

    if let Ok(keyword) = Keyword::from_str(&normalized) {
        return Ok(lexer.finish(start, leading_whitespace, TokenKind::Keyword(keyword)));
    }

    if normalized == "true" {
        return Ok(lexer.finish(start, leading_whitespace, TokenKind::BoolLiteral(true)));
    }
    if normalized == "false" {
        return Ok(lexer.finish(start, leading_whitespace, TokenKind::BoolLiteral(false)));
    }

    let id = lexer.interner.intern(&normalized);
    Ok(lexer.finish(start, leading_whitespace, TokenKind::Identifier(id)))
}
