//! Numeric literal scanning (spec §4.3 "Numbers").

use super::{Lexer, Token, TokenKind};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source::{Location, Span};

/// Scans a digit run allowing `_` separators, enforcing that an
/// underscore never appears as the first character of the run (unless
/// `allow_leading_underscore`, used right after a `0x`/`0b` prefix) and
/// never immediately next to another underscore. Returns the digits with
/// underscores stripped.
fn scan_digit_run(lexer: &mut Lexer<'_>, is_digit: impl Fn(char) -> bool, allow_leading_underscore: bool) -> Result<String, Diagnostic> {
    let mut out = String::new();
    let mut last_was_underscore = false;
    let mut at_start = true;
    loop {
        match lexer.peek() {
            Some(c) if is_digit(c) => {
                out.push(c);
                lexer.bump();
                last_was_underscore = false;
                at_start = false;
            }
            Some('_') => {
                let loc = lexer.location();
                if last_was_underscore || (at_start && !allow_leading_underscore) {
                    return Err(Diagnostic::create(DiagnosticCode::VF1100, Span::point(loc), &[]));
                }
                last_was_underscore = true;
                at_start = false;
                lexer.bump();
            }
            _ => break,
        }
    }
    if last_was_underscore && !out.is_empty() {
        let loc = lexer.location();
        return Err(Diagnostic::create(DiagnosticCode::VF1100, Span::point(loc), &[]));
    }
    Ok(out)
}

pub(super) fn scan_number(lexer: &mut Lexer<'_>, start: Location, leading_whitespace: bool) -> Result<Token, Diagnostic> {
    if lexer.peek() == Some('0') && matches!(lexer.peek_at(1), Some('x' | 'X')) {
        lexer.bump();
        lexer.bump();
        let digits = scan_digit_run(lexer, |c| c.is_ascii_hexdigit(), true)?;
        if digits.is_empty() {
            return Err(Diagnostic::create(DiagnosticCode::VF1102, Span::new(start, lexer.location()), &[]));
        }
        let value = i64::from_str_radix(&digits, 16).unwrap_or(i64::MAX);
        return Ok(lexer.finish(start, leading_whitespace, TokenKind::IntLiteral(value)));
    }

    if lexer.peek() == Some('0') && matches!(lexer.peek_at(1), Some('b' | 'B')) {
        lexer.bump();
        lexer.bump();
        let digits = scan_digit_run(lexer, |c| c == '0' || c == '1', true)?;
        if digits.is_empty() {
            return Err(Diagnostic::create(DiagnosticCode::VF1101, Span::new(start, lexer.location()), &[]));
        }
        let value = i64::from_str_radix(&digits, 2).unwrap_or(i64::MAX);
        return Ok(lexer.finish(start, leading_whitespace, TokenKind::IntLiteral(value)));
    }

    // Decimal: leading zeros never imply octal (spec §4.3).
    let int_part = scan_digit_run(lexer, |c| c.is_ascii_digit(), false)?;

    let mut is_float = false;
    let mut frac_part = String::new();
    if lexer.peek() == Some('.') && lexer.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
        lexer.bump();
        is_float = true;
        frac_part = scan_digit_run(lexer, |c| c.is_ascii_digit(), false)?;
    }

    let mut exp_sign = '+';
    let mut exp_part = String::new();
    if matches!(lexer.peek(), Some('e' | 'E')) {
        is_float = true;
        lexer.bump();
        if matches!(lexer.peek(), Some('+' | '-')) {
            exp_sign = lexer.bump().expect("peeked sign is present");
        }
        exp_part = scan_digit_run(lexer, |c| c.is_ascii_digit(), false)?;
        if exp_part.is_empty() {
            return Err(Diagnostic::create(DiagnosticCode::VF1104, Span::new(start, lexer.location()), &[]));
        }
    }

    if is_float {
        let frac = if frac_part.is_empty() { "0" } else { &frac_part };
        let exp = if exp_part.is_empty() { "0" } else { &exp_part };
        let literal = format!("{int_part}.{frac}e{exp_sign}{exp}");
        let value: f64 = literal.parse().unwrap_or(f64::NAN);
        Ok(lexer.finish(start, leading_whitespace, TokenKind::FloatLiteral(value)))
    } else {
        let value: i64 = int_part.parse().unwrap_or(i64::MAX);
        Ok(lexer.finish(start, leading_whitespace, TokenKind::IntLiteral(value)))
    }
}
