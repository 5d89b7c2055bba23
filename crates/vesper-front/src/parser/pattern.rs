//! Pattern grammar (spec §4.4's `VF22xx` range, §3 `Pattern`).
//!
//! `pattern ::= typed ('|' typed)*`
//! `typed ::= primary (':' type_expr)?`
//! `primary ::= '_' | literal | Ident ['(' pattern_list ')'] | '(' … ')' |
//!              '[' pattern_list ']' | '{' fields '}'`

use super::Parser;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::lexer::TokenKind;
use crate::syntax::{Literal, Pattern, PatternKind, RecordPatternField};

pub(super) fn parse_pattern(p: &mut Parser<'_>) -> Result<Pattern, Diagnostic> {
    let first = parse_typed_pattern(p)?;
    if !matches!(&p.peek().kind, TokenKind::Pipe) {
        return Ok(first);
    }
    let start = first.span;
    let mut alts = vec![first];
    while p.eat(|k| matches!(k, TokenKind::Pipe)).is_some() {
        alts.push(parse_typed_pattern(p).map_err(|_| p.error_here(DiagnosticCode::VF2201))?);
    }
    let end = p.peek().span.start;
    Ok(Pattern::new(start.to(end), PatternKind::Or(alts)))
}

fn parse_typed_pattern(p: &mut Parser<'_>) -> Result<Pattern, Diagnostic> {
    let pattern = parse_primary_pattern(p)?;
    if p.eat(|k| matches!(k, TokenKind::Colon)).is_some() {
        let annot = super::type_expr::parse_type_expr(p)?;
        let span = pattern.span.merge(annot.span);
        return Ok(Pattern::new(span, PatternKind::Typed { pattern, annot }));
    }
    Ok(pattern)
}

fn parse_primary_pattern(p: &mut Parser<'_>) -> Result<Pattern, Diagnostic> {
    let start_span = p.peek().span;
    match &p.peek().kind {
        TokenKind::Identifier(name) if is_underscore_wildcard(p) => {
            let _ = name;
            p.advance();
            Ok(Pattern::new(start_span, PatternKind::Wildcard))
        }
        TokenKind::Identifier(_) => {
            let ident = p.expect_ident(DiagnosticCode::VF2200)?;
            let is_ctor_name = p.interner.resolve(ident.name).chars().next().is_some_and(char::is_uppercase);
            if p.eat(|k| matches!(k, TokenKind::LParen)).is_some() {
                let mut args = Vec::new();
                while !matches!(&p.peek().kind, TokenKind::RParen) {
                    args.push(parse_pattern(p)?);
                    if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                        break;
                    }
                }
                p.expect(|k| matches!(k, TokenKind::RParen), DiagnosticCode::VF2202)?;
                let end = p.peek().span.start;
                Ok(Pattern::new(ident.span.to(end), PatternKind::Constructor { name: ident, args }))
            } else if is_ctor_name {
                // A bare PascalCase identifier is a nullary constructor
                // pattern (e.g. `None`), not a variable binding — variant
                // constructors are always PascalCase (spec §3), so case
                // alone disambiguates without scope information.
                Ok(Pattern::new(ident.span, PatternKind::Constructor { name: ident, args: Vec::new() }))
            } else {
                Ok(Pattern::new(ident.span, PatternKind::Var(ident)))
            }
        }
        TokenKind::IntLiteral(v) => {
            let v = *v;
            p.advance();
            Ok(Pattern::new(start_span, PatternKind::Literal(Literal::Int(v))))
        }
        TokenKind::FloatLiteral(v) => {
            let v = *v;
            p.advance();
            Ok(Pattern::new(start_span, PatternKind::Literal(Literal::Float(v))))
        }
        TokenKind::StringLiteral(v) => {
            let v = *v;
            p.advance();
            Ok(Pattern::new(start_span, PatternKind::Literal(Literal::Str(v))))
        }
        TokenKind::BoolLiteral(v) => {
            let v = *v;
            p.advance();
            Ok(Pattern::new(start_span, PatternKind::Literal(Literal::Bool(v))))
        }
        TokenKind::LParen => {
            p.advance();
            let mut elems = Vec::new();
            while !matches!(&p.peek().kind, TokenKind::RParen) {
                elems.push(parse_pattern(p)?);
                if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            p.expect(|k| matches!(k, TokenKind::RParen), DiagnosticCode::VF2202)?;
            let end = p.peek().span.start;
            let span = start_span.to(end);
            if elems.len() == 1 {
                Ok(elems.into_iter().next().expect("length checked above"))
            } else {
                Ok(Pattern::new(span, PatternKind::Tuple(elems)))
            }
        }
        TokenKind::LBracket => {
            p.advance();
            let mut elems = Vec::new();
            while !matches!(&p.peek().kind, TokenKind::RBracket) {
                elems.push(parse_pattern(p)?);
                if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            p.expect(|k| matches!(k, TokenKind::RBracket), DiagnosticCode::VF2202)?;
            let end = p.peek().span.start;
            Ok(Pattern::new(start_span.to(end), PatternKind::List(elems)))
        }
        TokenKind::LBrace => {
            p.advance();
            let mut fields = Vec::new();
            let mut open = false;
            while !matches!(&p.peek().kind, TokenKind::RBrace) {
                if matches!(&p.peek().kind, TokenKind::Spread) {
                    p.advance();
                    open = true;
                    break;
                }
                let name = p.expect_ident(DiagnosticCode::VF2200)?;
                let pattern = if p.eat(|k| matches!(k, TokenKind::Colon)).is_some() {
                    Some(parse_pattern(p)?)
                } else {
                    None
                };
                fields.push(RecordPatternField { name, pattern });
                if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            p.expect(|k| matches!(k, TokenKind::RBrace), DiagnosticCode::VF2202)?;
            let end = p.peek().span.start;
            Ok(Pattern::new(start_span.to(end), PatternKind::Record { fields, open }))
        }
        _ => Err(p.error_here(DiagnosticCode::VF2200)),
    }
}

fn is_underscore_wildcard(p: &Parser<'_>) -> bool {
    matches!(&p.peek().kind, TokenKind::Identifier(name) if p.interner.resolve(*name) == "_")
}
