//! Parser (C5, spec §4.4): tokens → Surface AST.
//!
//! Recursive descent for declarations and patterns, Pratt-style
//! precedence climbing for expressions (`expr.rs`). Error-value shape
//! follows the teacher's `ParseError` in `parse.rs` — a code plus a
//! span — generalized here to the registry-backed [`Diagnostic`] rather
//! than an ad-hoc string.
//!
//! Error recovery: a recoverable failure pushes its diagnostic onto the
//! caller-supplied `errors` sink (mirroring the `WarningCollector`
//! convention, C10) and advances to the next statement boundary
//! (`NEWLINE` or `SEMICOLON` at brace depth 0); a fatal structural
//! failure (unbalanced brackets at `EOF`) returns `Err` immediately.
//! Once `errors.len()` reaches `max_errors`, parsing stops with a fatal
//! `VF2500`. This is a refinement of spec §6's "may raise a single
//! Diagnostic on fatal failure": recoverable per-declaration errors are
//! collected rather than silently dropped, exactly as `WarningCollector`
//! collects non-fatal diagnostics for C10 — see `DESIGN.md`.

mod expr;
mod pattern;
mod type_expr;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::intern::Interner;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::source::Span;
use crate::syntax::{Declaration, Export, ExportKind, Ident, Import, ImportKind, Module, TypeDeclBody, VariantAlt};

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: &'a mut Vec<Diagnostic>,
    max_errors: usize,
    interner: &'a Interner,
    /// Current expression-recursion depth, guarded by
    /// [`Parser::enter_expr`] (spec §5 / SPEC_FULL.md §5's
    /// `PipelineConfig`/`ResourceLimits`-style guard, grounded on the
    /// teacher's `depth_remaining`/`MAX_NESTING_DEPTH` pair in
    /// `parse.rs`): bounds recursive-descent stack depth so a
    /// pathologically parenthesized input fails with `VF2500` instead of
    /// overflowing the stack.
    expr_depth: usize,
    max_nesting_depth: usize,
}

/// Parses a token stream into a [`Module`]. Recoverable syntax errors are
/// pushed to `errors`; parsing stops fatally (and returns `Err`) either
/// on a structural failure or once `errors.len() >= max_errors`.
///
/// `interner` is read-only here: the parser only ever resolves an
/// already-interned identifier back to text, to check variant
/// constructor casing (`VF2006`) — spec §3 assigns this check to the
/// parser, not the lexer, since it applies only to constructor position.
pub fn parse(tokens: &[Token], interner: &Interner, errors: &mut Vec<Diagnostic>, max_errors: usize, max_nesting_depth: usize) -> Result<Module, Diagnostic> {
    let mut parser = Parser { tokens, pos: 0, errors, max_errors, interner, expr_depth: 0, max_nesting_depth };
    parser.parse_module()
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Skips any number of `NEWLINE` tokens; declarations and many
    /// expression continuations are newline-insensitive at this grain.
    fn skip_newlines(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline) {
            self.advance();
        }
    }

    fn check(&self, pred: impl Fn(&TokenKind) -> bool) -> bool {
        pred(&self.peek().kind)
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword, code: DiagnosticCode) -> Result<Span, Diagnostic> {
        if matches!(&self.peek().kind, TokenKind::Keyword(k) if *k == kw) {
            Ok(self.advance().span)
        } else {
            Err(self.error_here(code))
        }
    }

    fn eat(&mut self, kind_matches: impl Fn(&TokenKind) -> bool) -> Option<Token> {
        if kind_matches(&self.peek().kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind_matches: impl Fn(&TokenKind) -> bool, code: DiagnosticCode) -> Result<Token, Diagnostic> {
        if kind_matches(&self.peek().kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(code))
        }
    }

    fn error_here(&self, code: DiagnosticCode) -> Diagnostic {
        Diagnostic::create(code, Span::point(self.peek().span.start), &[])
    }

    fn expect_ident(&mut self, code: DiagnosticCode) -> Result<Ident, Diagnostic> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = *name;
                let span = self.advance().span;
                Ok(Ident { span, name })
            }
            _ => Err(self.error_here(code)),
        }
    }

    /// Advances past tokens until the next statement boundary (a
    /// `NEWLINE`/`SEMICOLON` at brace depth 0) or EOF, for error recovery.
    fn synchronize(&mut self) {
        let mut depth: i32 = 0;
        loop {
            match &self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Newline | TokenKind::Semicolon if depth <= 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn push_recoverable(&mut self, diag: Diagnostic) -> Result<(), Diagnostic> {
        self.errors.push(diag);
        if self.errors.len() >= self.max_errors {
            let reason = format!("too many syntax errors ({} >= {})", self.errors.len(), self.max_errors);
            return Err(Diagnostic::create(DiagnosticCode::VF2500, Span::point(self.peek().span.start), &[("reason", &reason)]));
        }
        Ok(())
    }

    /// Enters one level of expression-recursion depth, raising a fatal
    /// `VF2500` instead of recursing further once `max_nesting_depth` is
    /// reached. Callers must call [`Parser::exit_expr`] on every return
    /// path, which `expr::parse_expr` does via a single choke point.
    fn enter_expr(&mut self) -> Result<(), Diagnostic> {
        self.expr_depth += 1;
        if self.expr_depth > self.max_nesting_depth {
            let reason = format!("expression nested too deeply ({} >= {})", self.expr_depth, self.max_nesting_depth);
            self.expr_depth -= 1;
            return Err(Diagnostic::create(DiagnosticCode::VF2500, Span::point(self.peek().span.start), &[("reason", &reason)]));
        }
        Ok(())
    }

    fn exit_expr(&mut self) {
        self.expr_depth -= 1;
    }

    fn parse_module(&mut self) -> Result<Module, Diagnostic> {
        let mut imports = Vec::new();
        let mut declarations = Vec::new();
        let mut exports = Vec::new();

        self.skip_newlines();
        while !self.is_eof() {
            let is_import = matches!(&self.peek().kind, TokenKind::Keyword(Keyword::Import));
            let is_export = matches!(&self.peek().kind, TokenKind::Keyword(Keyword::Export));
            let result = if is_import {
                self.parse_import().map(|i| { imports.push(i); })
            } else if is_export {
                self.parse_export().map(|e| { exports.push(e); })
            } else {
                self.parse_declaration().map(|ds| { declarations.extend(ds); })
            };
            if let Err(diag) = result {
                self.push_recoverable(diag)?;
                self.synchronize();
            }
            self.skip_newlines();
        }

        Ok(Module { imports, declarations, exports })
    }

    fn parse_import(&mut self) -> Result<Import, Diagnostic> {
        let start = self.expect_keyword(Keyword::Import, DiagnosticCode::VF2400)?;
        let kind = if self.eat(|k| matches!(k, TokenKind::OpStar)).is_some() {
            self.expect_keyword(Keyword::As, DiagnosticCode::VF2403)?;
            let alias = self.expect_ident(DiagnosticCode::VF2403)?;
            ImportKind::Star(alias)
        } else if self.eat(|k| matches!(k, TokenKind::LBrace)).is_some() {
            let mut names = Vec::new();
            while !matches!(&self.peek().kind, TokenKind::RBrace) {
                names.push(self.expect_ident(DiagnosticCode::VF2402)?);
                if self.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            self.expect(|k| matches!(k, TokenKind::RBrace), DiagnosticCode::VF2402)?;
            ImportKind::Named(names)
        } else {
            return Err(self.error_here(DiagnosticCode::VF2403));
        };
        self.expect_keyword(Keyword::From, DiagnosticCode::VF2404)?;
        let path_tok = self.expect(|k| matches!(k, TokenKind::StringLiteral(_)), DiagnosticCode::VF2404)?;
        let TokenKind::StringLiteral(path) = path_tok.kind else { unreachable!("expect() already checked the kind") };
        let end = self.peek().span.start;
        Ok(Import { span: start.to(end), path, kind })
    }

    fn parse_export(&mut self) -> Result<Export, Diagnostic> {
        let start = self.expect_keyword(Keyword::Export, DiagnosticCode::VF2401)?;
        if matches!(&self.peek().kind, TokenKind::Keyword(Keyword::Let)) {
            let decl = self.parse_let()?;
            let end = self.peek().span.start;
            return Ok(Export { span: start.to(end), kind: ExportKind::Declaration(Box::new(decl)) });
        }
        self.expect(|k| matches!(k, TokenKind::LBrace), DiagnosticCode::VF2401)?;
        let mut names = Vec::new();
        while !matches!(&self.peek().kind, TokenKind::RBrace) {
            names.push(self.expect_ident(DiagnosticCode::VF2402)?);
            if self.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        self.expect(|k| matches!(k, TokenKind::RBrace), DiagnosticCode::VF2402)?;
        let from = if self.eat_keyword(Keyword::From) {
            let path_tok = self.expect(|k| matches!(k, TokenKind::StringLiteral(_)), DiagnosticCode::VF2404)?;
            let TokenKind::StringLiteral(path) = path_tok.kind else { unreachable!("expect() already checked the kind") };
            Some(path)
        } else {
            None
        };
        let end = self.peek().span.start;
        Ok(Export { span: start.to(end), kind: ExportKind::Named { names, from } })
    }

    fn parse_declaration(&mut self) -> Result<Vec<Declaration>, Diagnostic> {
        match &self.peek().kind {
            TokenKind::Keyword(Keyword::Let) => self.parse_let().map(|d| vec![d]),
            TokenKind::Keyword(Keyword::Type) => self.parse_type_decl().map(|d| vec![d]),
            TokenKind::Keyword(Keyword::External) => self.parse_external(),
            _ => Err(self.error_here(DiagnosticCode::VF2000)),
        }
    }

    fn parse_let(&mut self) -> Result<Declaration, Diagnostic> {
        let start = self.expect_keyword(Keyword::Let, DiagnosticCode::VF2001)?;
        let rec = self.eat_keyword(Keyword::Rec);
        let mutable = self.eat_keyword(Keyword::Mut);

        let pattern = pattern::parse_pattern(self)?;
        if mutable && !matches!(&*pattern.kind, crate::syntax::PatternKind::Var(_)) {
            return Err(self.error_here(DiagnosticCode::VF2004));
        }

        let annot = if self.eat(|k| matches!(k, TokenKind::Colon)).is_some() {
            Some(type_expr::parse_type_expr(self)?)
        } else {
            None
        };

        self.expect(|k| matches!(k, TokenKind::OpEquals), DiagnosticCode::VF2001)?;
        let value = expr::parse_expr(self)?;

        if mutable && !is_ref_call(&value) {
            return Err(self.error_here(DiagnosticCode::VF2003));
        }

        let mut and_bindings = Vec::new();
        while rec && self.eat_keyword(Keyword::And) {
            let p = pattern::parse_pattern(self)?;
            self.expect(|k| matches!(k, TokenKind::OpEquals), DiagnosticCode::VF2001)?;
            let v = expr::parse_expr(self)?;
            and_bindings.push((p, v));
        }
        if !rec && matches!(&self.peek().kind, TokenKind::Keyword(Keyword::And)) {
            return Err(self.error_here(DiagnosticCode::VF2005));
        }

        let end = self.peek().span.start;
        Ok(Declaration::Let { span: start.to(end), rec, mutable, pattern, annot, value, and_bindings })
    }

    fn parse_type_decl(&mut self) -> Result<Declaration, Diagnostic> {
        let start = self.expect_keyword(Keyword::Type, DiagnosticCode::VF2002)?;
        let name = self.expect_ident(DiagnosticCode::VF2002)?;
        let mut params = Vec::new();
        if self.eat(|k| matches!(k, TokenKind::OpLt)).is_some() {
            while !matches!(&self.peek().kind, TokenKind::OpGt) {
                params.push(self.expect_ident(DiagnosticCode::VF2301)?);
                if self.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            self.expect(|k| matches!(k, TokenKind::OpGt), DiagnosticCode::VF2301)?;
        }
        self.expect(|k| matches!(k, TokenKind::OpEquals), DiagnosticCode::VF2002)?;

        let body = if matches!(&self.peek().kind, TokenKind::Pipe) || self.peek_looks_like_variant() {
            let mut alts = Vec::new();
            self.eat(|k| matches!(k, TokenKind::Pipe));
            loop {
                let ctor = self.expect_ident(DiagnosticCode::VF2002)?;
                if !is_pascal_case(self.interner, &ctor) {
                    return Err(Diagnostic::create(DiagnosticCode::VF2006, Span::point(ctor.span.start), &[("name", self.interner.resolve(ctor.name))]));
                }
                let mut args = Vec::new();
                if self.eat(|k| matches!(k, TokenKind::LParen)).is_some() {
                    while !matches!(&self.peek().kind, TokenKind::RParen) {
                        args.push(type_expr::parse_type_expr(self)?);
                        if self.eat(|k| matches!(k, TokenKind::Comma)).is_none() {
                            break;
                        }
                    }
                    self.expect(|k| matches!(k, TokenKind::RParen), DiagnosticCode::VF2304)?;
                }
                let alt_end = self.peek().span.start;
                alts.push(VariantAlt { span: ctor.span.to(alt_end), ctor, args });
                if self.eat(|k| matches!(k, TokenKind::Pipe)).is_none() {
                    break;
                }
            }
            TypeDeclBody::Variants(alts)
        } else {
            TypeDeclBody::Alias(type_expr::parse_type_expr(self)?)
        };

        let end = self.peek().span.start;
        Ok(Declaration::TypeDecl { span: start.to(end), name, params, body })
    }

    /// A `type` body starts a variant declaration when its first
    /// identifier is PascalCase, distinguishing `type Shape = Circle(…) | …`
    /// from `type Pair<a> = (a, a)`.
    fn peek_looks_like_variant(&self) -> bool {
        matches!(&self.peek().kind, TokenKind::Identifier(_)) && matches!(&self.peek_at(1).kind, TokenKind::LParen | TokenKind::Pipe | TokenKind::Newline | TokenKind::Eof)
    }

    /// `external name : type = "js_name" [from "path"]`, or the block form
    /// `external [from "path"] { name : type = "js_name" ... }` (spec.md
    /// §4: binding several externals to one shared module path without
    /// repeating `from` on each line).
    fn parse_external(&mut self) -> Result<Vec<Declaration>, Diagnostic> {
        let start = self.expect_keyword(Keyword::External, DiagnosticCode::VF2007)?;
        if matches!(&self.peek().kind, TokenKind::Keyword(Keyword::From) | TokenKind::LBrace) {
            return self.parse_external_block(start);
        }
        let decl = self.parse_external_entry(start, None)?;
        Ok(vec![decl])
    }

    /// One `name : type = "js_name"` entry, shared by both the single-line
    /// and block forms. `shared_from` overrides a per-entry `from "path"`
    /// when parsing inside a block.
    fn parse_external_entry(&mut self, start: Span, shared_from: Option<crate::intern::StringId>) -> Result<Declaration, Diagnostic> {
        let name = self.expect_ident(DiagnosticCode::VF2007)?;
        self.expect(|k| matches!(k, TokenKind::Colon), DiagnosticCode::VF2007)?;
        let scheme = type_expr::parse_type_expr(self)?;
        self.expect(|k| matches!(k, TokenKind::OpEquals), DiagnosticCode::VF2007)?;
        let js_name_tok = self.expect(|k| matches!(k, TokenKind::StringLiteral(_)), DiagnosticCode::VF2007)?;
        let TokenKind::StringLiteral(js_name) = js_name_tok.kind else { unreachable!("expect() already checked the kind") };
        let import_path = if shared_from.is_some() {
            shared_from
        } else if self.eat_keyword(Keyword::From) {
            let path_tok = self.expect(|k| matches!(k, TokenKind::StringLiteral(_)), DiagnosticCode::VF2007)?;
            let TokenKind::StringLiteral(path) = path_tok.kind else { unreachable!("expect() already checked the kind") };
            Some(path)
        } else {
            None
        };
        let end = self.peek().span.start;
        Ok(Declaration::External { span: start.to(end), name, scheme, js_name, import_path })
    }

    fn parse_external_block(&mut self, start: Span) -> Result<Vec<Declaration>, Diagnostic> {
        let shared_from = if self.eat_keyword(Keyword::From) {
            let path_tok = self.expect(|k| matches!(k, TokenKind::StringLiteral(_)), DiagnosticCode::VF2007)?;
            let TokenKind::StringLiteral(path) = path_tok.kind else { unreachable!("expect() already checked the kind") };
            Some(path)
        } else {
            None
        };
        self.expect(|k| matches!(k, TokenKind::LBrace), DiagnosticCode::VF2007)?;
        self.skip_newlines();
        let mut decls = Vec::new();
        while !matches!(&self.peek().kind, TokenKind::RBrace) {
            let entry_start = self.peek().span;
            decls.push(self.parse_external_entry(entry_start, shared_from)?);
            self.skip_newlines();
            if self.eat(|k| matches!(k, TokenKind::Comma)).is_some() {
                self.skip_newlines();
            }
        }
        self.expect(|k| matches!(k, TokenKind::RBrace), DiagnosticCode::VF2113)?;
        Ok(decls)
    }
}

fn is_ref_call(expr: &crate::syntax::Expr) -> bool {
    matches!(&*expr.kind, crate::syntax::ExprKind::RefLit(_))
}

fn is_pascal_case(interner: &Interner, ident: &Ident) -> bool {
    interner.resolve(ident.name).chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Interner;

    fn parse_ok(source: &str) -> Module {
        let mut interner = Interner::new();
        let tokens = crate::lexer::tokenize(source, "<test>", &mut interner).expect("lexing should succeed");
        let mut errors = Vec::new();
        parse(&tokens, &interner, &mut errors, 16, 35).expect("parsing should succeed")
    }

    #[test]
    fn parses_a_simple_let_binding() {
        let module = parse_ok("let x = 1\n");
        assert_eq!(module.declarations.len(), 1);
    }

    #[test]
    fn parses_a_lambda_and_application() {
        let module = parse_ok("let id = (x) => x\nlet y = id(1)\n");
        assert_eq!(module.declarations.len(), 2);
    }

    #[test]
    fn rejects_mut_binding_without_ref() {
        let mut interner = Interner::new();
        let tokens = crate::lexer::tokenize("let mut x = 1\n", "<test>", &mut interner).expect("lex ok");
        let mut errors = Vec::new();
        let result = parse(&tokens, &interner, &mut errors, 16, 35);
        assert!(result.is_err());
    }
}
