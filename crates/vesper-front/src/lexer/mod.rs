//! Lexer (C3, spec §4.3): turns decoded UTF-8 source text into a token
//! stream.
//!
//! The source is first decoded into a sequence of Unicode scalar values
//! (spec §4.2) rather than walked byte-by-byte or grapheme-by-grapheme,
//! so that multi-byte code points — including astral-plane emoji —
//! always advance the column by exactly one. Grounded on the teacher's
//! `parse.rs`, which performs the analogous decode-to-scalars walk
//! before delegating to `ruff_python_parser`; here the scalar walk feeds
//! a hand-written scanner instead of an external parser crate.

mod ident;
mod number;
mod string;
mod token;

pub use token::{Keyword, Token, TokenKind};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::intern::{Interner, StringId};
use crate::source::{Cursor, Location, Span};

/// Tokenizes `source`, interning identifiers and string contents into
/// `interner`. Fails with the first fatal `VF1xxx` diagnostic
/// encountered; lexical errors are always fatal (spec §7).
pub fn tokenize(source: &str, filename: &str, interner: &mut Interner) -> Result<Vec<Token>, Diagnostic> {
    let file = interner.intern(filename);
    let mut lexer = Lexer::new(source, file, interner);
    lexer.run()
}

struct Lexer<'a> {
    chars: Vec<(char, u32)>,
    pos: usize,
    cursor: Cursor,
    file: StringId,
    interner: &'a mut Interner,
}

impl<'a> Lexer<'a> {
    fn new(source: &str, file: StringId, interner: &'a mut Interner) -> Self {
        let chars = source
            .chars()
            .map(|c| (c, u32::try_from(c.len_utf8()).expect("a scalar's UTF-8 length fits in u32")))
            .collect();
        Self {
            chars,
            pos: 0,
            cursor: Cursor::new(file),
            file,
            interner,
        }
    }

    fn run(&mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(c, _)| c)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).map(|&(c, _)| c)
    }

    fn location(&self) -> Location {
        self.cursor.location()
    }

    /// Consumes and returns the current scalar value, advancing the cursor.
    fn bump(&mut self) -> Option<char> {
        let (c, len) = *self.chars.get(self.pos)?;
        self.pos += 1;
        self.cursor.advance(c, len);
        Some(c)
    }

    fn finish(&self, start: Location, leading_whitespace: bool, kind: TokenKind) -> Token {
        Token {
            kind,
            span: Span::new(start, self.location()),
            leading_whitespace: Some(leading_whitespace),
        }
    }

    /// Skips whitespace, comments, and `\r`, returning whether any were
    /// present (spec §4.3 "leading whitespace propagation").
    fn skip_trivia(&mut self) -> Result<bool, Diagnostic> {
        let mut saw_any = false;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(' ' | '\t' | '\r'), _) => {
                    self.bump();
                    saw_any = true;
                }
                (Some('/'), Some('/')) => {
                    self.bump();
                    self.bump();
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.bump();
                    }
                    saw_any = true;
                }
                (Some('/'), Some('*')) => {
                    self.skip_block_comment()?;
                    saw_any = true;
                }
                _ => break,
            }
        }
        Ok(saw_any)
    }

    fn skip_block_comment(&mut self) -> Result<(), Diagnostic> {
        let start = self.location();
        self.bump();
        self.bump();
        let mut depth = 1u32;
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('*')) => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => {
                    return Err(Diagnostic::create(DiagnosticCode::VF1300, Span::point(start), &[]));
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, Diagnostic> {
        let leading_whitespace = self.skip_trivia()?;
        let start = self.location();

        match self.peek() {
            None => Ok(Token {
                kind: TokenKind::Eof,
                span: Span::point(start),
                leading_whitespace: None,
            }),
            Some('\n') => {
                self.bump();
                Ok(self.finish(start, leading_whitespace, TokenKind::Newline))
            }
            Some(c) if c.is_ascii_digit() => number::scan_number(self, start, leading_whitespace),
            Some('"') => string::scan_string(self, start, leading_whitespace),
            Some(c) if ident::is_ident_start(c) => ident::scan_identifier(self, start, leading_whitespace),
            Some(_) => self.scan_operator(start, leading_whitespace),
        }
    }

    fn scan_operator(&mut self, start: Location, leading_whitespace: bool) -> Result<Token, Diagnostic> {
        let c0 = self.peek().expect("caller checked a character is present");
        let c1 = self.peek_at(1);
        let c2 = self.peek_at(2);

        if c0 == '.' && c1 == Some('.') && c2 == Some('.') {
            self.bump();
            self.bump();
            self.bump();
            return Ok(self.finish(start, leading_whitespace, TokenKind::Spread));
        }

        if let Some(kind) = two_char_operator(c0, c1) {
            self.bump();
            self.bump();
            return Ok(self.finish(start, leading_whitespace, kind));
        }

        if let Some(kind) = one_char_operator(c0) {
            self.bump();
            return Ok(self.finish(start, leading_whitespace, kind));
        }

        Err(Diagnostic::create(
            DiagnosticCode::VF1400,
            Span::point(start),
            &[("char", &c0.to_string())],
        ))
    }
}

fn two_char_operator(c0: char, c1: Option<char>) -> Option<TokenKind> {
    use TokenKind::{OpAnd, OpAssign, OpCons, OpEq, OpGtGt, OpGte, OpLtLt, OpLte, OpNeq, OpOr, OpPipeGt};
    let c1 = c1?;
    Some(match (c0, c1) {
        ('=', '=') => OpEq,
        ('!', '=') => OpNeq,
        ('<', '=') => OpLte,
        ('>', '=') => OpGte,
        ('|', '>') => OpPipeGt,
        ('>', '>') => OpGtGt,
        ('<', '<') => OpLtLt,
        ('-', '>') => TokenKind::Arrow,
        ('=', '>') => TokenKind::FatArrow,
        (':', ':') => OpCons,
        (':', '=') => OpAssign,
        ('&', '&') => OpAnd,
        ('|', '|') => OpOr,
        _ => return None,
    })
}

fn one_char_operator(c: char) -> Option<TokenKind> {
    use TokenKind::{
        Colon, Comma, Dot, LBrace, LBracket, LParen, OpAmpersand, OpBang, OpEquals, OpGt, OpLt, OpMinus, OpPercent,
        OpPlus, OpSlash, OpStar, Pipe, RBrace, RBracket, RParen, Semicolon,
    };
    Some(match c {
        '(' => LParen,
        ')' => RParen,
        '{' => LBrace,
        '}' => RBrace,
        '[' => LBracket,
        ']' => RBracket,
        ',' => Comma,
        '.' => Dot,
        ':' => Colon,
        ';' => Semicolon,
        '|' => Pipe,
        '+' => OpPlus,
        '-' => OpMinus,
        '*' => OpStar,
        '/' => OpSlash,
        '%' => OpPercent,
        '<' => OpLt,
        '>' => OpGt,
        '=' => OpEquals,
        '!' => OpBang,
        '&' => OpAmpersand,
        _ => return None,
    })
}
