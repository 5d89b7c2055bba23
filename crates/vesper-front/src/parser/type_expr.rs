//! Type expression grammar (spec §4.4's `VF23xx` range, §3 `TypeExpr`).
//!
//! `type ::= union`
//! `union ::= fun_type ('|' fun_type)*`
//! `fun_type ::= '(' params ')' '->' type | atom`
//! `atom ::= lowercase-ident | Ident ['<' args '>'] | '(' tuple ')' |
//!           '{' fields '}'`

use super::Parser;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::lexer::TokenKind;
use crate::syntax::{RecordTypeField, TypeExpr, TypeExprKind};

pub(super) fn parse_type_expr(p: &mut Parser<'_>) -> Result<TypeExpr, Diagnostic> {
    let first = parse_fun_type(p)?;
    if !matches!(&p.peek().kind, TokenKind::Pipe) {
        return Ok(first);
    }
    let start = first.span;
    let mut members = vec![first];
    while p.eat(|k| matches!(k, TokenKind::Pipe)).is_some() {
        members.push(parse_fun_type(p)?);
    }
    let end = p.peek().span.start;
    Ok(TypeExpr::new(start.to(end), TypeExprKind::Union(members)))
}

fn parse_fun_type(p: &mut Parser<'_>) -> Result<TypeExpr, Diagnostic> {
    if matches!(&p.peek().kind, TokenKind::LParen) && looks_like_fun_type(p) {
        let start = p.peek().span;
        p.advance();
        let mut params = Vec::new();
        while !matches!(&p.peek().kind, TokenKind::RParen) {
            params.push(parse_type_expr(p)?);
            if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        p.expect(|k| matches!(k, TokenKind::RParen), DiagnosticCode::VF2304)?;
        p.expect(|k| matches!(k, TokenKind::Arrow), DiagnosticCode::VF2302)?;
        let ret = parse_fun_type(p)?;
        let end = p.peek().span.start;
        return Ok(TypeExpr::new(start.to(end), TypeExprKind::FunType { params, ret }));
    }
    parse_atom(p)
}

/// Distinguishes `(T) -> U` from a plain parenthesized/tuple type by
/// scanning forward to the matching `)` and checking for a following
/// `->`. The parser re-parses after this lookahead rather than caching
/// positions, since type expressions are never large enough to matter.
fn looks_like_fun_type(p: &Parser<'_>) -> bool {
    let mut depth: i32 = 0;
    let mut offset = 0usize;
    loop {
        let tok = p.peek_at(offset);
        match &tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return matches!(&p.peek_at(offset + 1).kind, TokenKind::Arrow);
                }
            }
            TokenKind::Eof => return false,
            _ => {}
        }
        offset += 1;
    }
}

fn parse_atom(p: &mut Parser<'_>) -> Result<TypeExpr, Diagnostic> {
    let start_span = p.peek().span;
    match &p.peek().kind {
        TokenKind::Identifier(_) => {
            let ident = p.expect_ident(DiagnosticCode::VF2300)?;
            let is_lowercase_single = p.interner.resolve(ident.name).chars().next().is_some_and(char::is_lowercase);
            if p.eat(|k| matches!(k, TokenKind::OpLt)).is_some() {
                let mut args = Vec::new();
                while !matches!(&p.peek().kind, TokenKind::OpGt) {
                    args.push(parse_type_expr(p)?);
                    if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                        break;
                    }
                }
                p.expect(|k| matches!(k, TokenKind::OpGt), DiagnosticCode::VF2301)?;
                let end = p.peek().span.start;
                return Ok(TypeExpr::new(ident.span.to(end), TypeExprKind::TypeCon { name: ident, args }));
            }
            if is_lowercase_single {
                Ok(TypeExpr::new(ident.span, TypeExprKind::TypeVar(ident)))
            } else {
                Ok(TypeExpr::new(ident.span, TypeExprKind::TypeCon { name: ident, args: Vec::new() }))
            }
        }
        TokenKind::LParen => {
            p.advance();
            let mut elems = Vec::new();
            while !matches!(&p.peek().kind, TokenKind::RParen) {
                elems.push(parse_type_expr(p)?);
                if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            p.expect(|k| matches!(k, TokenKind::RParen), DiagnosticCode::VF2304)?;
            let end = p.peek().span.start;
            let span = start_span.to(end);
            if elems.len() == 1 {
                Ok(elems.into_iter().next().expect("length checked above"))
            } else {
                Ok(TypeExpr::new(span, TypeExprKind::TupleType(elems)))
            }
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
                let name = p.expect_ident(DiagnosticCode::VF2300)?;
                p.expect(|k| matches!(k, TokenKind::Colon), DiagnosticCode::VF2300)?;
                let annot = parse_type_expr(p)?;
                fields.push(RecordTypeField { name, annot });
                if p.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            p.expect(|k| matches!(k, TokenKind::RBrace), DiagnosticCode::VF2303)?;
            let end = p.peek().span.start;
            Ok(TypeExpr::new(start_span.to(end), TypeExprKind::RecordType { fields, open }))
        }
        _ => Err(p.error_here(DiagnosticCode::VF2300)),
    }
}
