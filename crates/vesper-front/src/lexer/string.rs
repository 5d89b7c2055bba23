//! String literal scanning (spec §4.3 "Strings").

use unicode_normalization::UnicodeNormalization;

use super::{Lexer, Token, TokenKind};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source::{Location, Span};

pub(super) fn scan_string(lexer: &mut Lexer<'_>, start: Location, leading_whitespace: bool) -> Result<Token, Diagnostic> {
    let triple = lexer.peek_at(1) == Some('"') && lexer.peek_at(2) == Some('"');
    if triple {
        lexer.bump();
        lexer.bump();
        lexer.bump();
    } else {
        lexer.bump();
    }

    let mut value = String::new();
    loop {
        match lexer.peek() {
            None => return Err(Diagnostic::create(DiagnosticCode::VF1002, Span::new(start, lexer.location()), &[])),
            Some('"') if triple && lexer.peek_at(1) == Some('"') && lexer.peek_at(2) == Some('"') => {
                lexer.bump();
                lexer.bump();
                lexer.bump();
                break;
            }
            Some('"') if !triple => {
                lexer.bump();
                break;
            }
            Some('\n') if !triple => {
                return Err(Diagnostic::create(DiagnosticCode::VF1001, Span::new(start, lexer.location()), &[]));
            }
            Some('\\') => {
                lexer.bump();
                value.push(scan_escape(lexer, start)?);
            }
            Some(c) => {
                lexer.bump();
                value.push(c);
            }
        }
    }

    let normalized: String = value.nfc().collect();
    let id = lexer.interner.intern(&normalized);
    Ok(lexer.finish(start, leading_whitespace, TokenKind::StringLiteral(id)))
}

fn scan_escape(lexer: &mut Lexer<'_>, string_start: Location) -> Result<char, Diagnostic> {
    let loc = lexer.location();
    match lexer.peek() {
        Some('n') => {
            lexer.bump();
            Ok('\n')
        }
        Some('t') => {
            lexer.bump();
            Ok('\t')
        }
        Some('r') => {
            lexer.bump();
            Ok('\r')
        }
        Some('"') => {
            lexer.bump();
            Ok('"')
        }
        Some('\'') => {
            lexer.bump();
            Ok('\'')
        }
        Some('\\') => {
            lexer.bump();
            Ok('\\')
        }
        Some('x') => {
            lexer.bump();
            let hi = lexer.peek().filter(|c| c.is_ascii_hexdigit());
            let Some(hi) = hi else {
                return Err(Diagnostic::create(DiagnosticCode::VF1011, Span::point(loc), &[]));
            };
            lexer.bump();
            let lo = lexer.peek().filter(|c| c.is_ascii_hexdigit());
            let Some(lo) = lo else {
                return Err(Diagnostic::create(DiagnosticCode::VF1011, Span::point(loc), &[]));
            };
            lexer.bump();
            let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).expect("two validated hex digits always parse");
            Ok(char::from(byte))
        }
        Some('u') => {
            lexer.bump();
            let scalar = if lexer.peek() == Some('{') {
                lexer.bump();
                let mut digits = String::new();
                while lexer.peek().is_some_and(|c| c.is_ascii_hexdigit()) && digits.len() < 6 {
                    digits.push(lexer.bump().expect("peeked hex digit is present"));
                }
                if lexer.peek() != Some('}') || digits.is_empty() {
                    return Err(Diagnostic::create(DiagnosticCode::VF1012, Span::point(loc), &[]));
                }
                lexer.bump();
                digits
            } else {
                let mut digits = String::new();
                for _ in 0..4 {
                    match lexer.peek().filter(|c| c.is_ascii_hexdigit()) {
                        Some(c) => {
                            digits.push(c);
                            lexer.bump();
                        }
                        None => return Err(Diagnostic::create(DiagnosticCode::VF1012, Span::point(loc), &[])),
                    }
                }
                digits
            };
            let code_point = u32::from_str_radix(&scalar, 16).map_err(|_| Diagnostic::create(DiagnosticCode::VF1012, Span::point(loc), &[]))?;
            char::from_u32(code_point).ok_or_else(|| Diagnostic::create(DiagnosticCode::VF1012, Span::point(loc), &[]))
        }
        other => {
            let _ = string_start;
            let escape = other.map(String::from).unwrap_or_default();
            Err(Diagnostic::create(DiagnosticCode::VF1010, Span::point(loc), &[("escape", &escape)]))
        }
    }
}
