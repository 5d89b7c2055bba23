//! Token kinds and the [`Token`] record itself (spec §3).

use crate::intern::StringId;
use crate::source::Span;

/// The specific reserved word a `KEYWORD` token carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Let,
    Mut,
    Type,
    If,
    Then,
    Else,
    Match,
    When,
    Rec,
    And,
    Import,
    Export,
    External,
    Unsafe,
    From,
    As,
    Try,
    Catch,
}

/// Words reserved for a future language version; legal only as a
/// diagnostic subject, never as an identifier (VF1500).
pub const RESERVED_FOR_FUTURE: &[&str] = &["async", "await", "trait", "impl", "where", "do", "yield", "return"];

/// The fixed set of token kinds (spec §3).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    // Structural
    Newline,
    Eof,

    // Grouping/punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
    Semicolon,
    Pipe,
    Spread,
    Arrow,
    FatArrow,

    // Single-char operators
    OpPlus,
    OpMinus,
    OpStar,
    OpSlash,
    OpPercent,
    OpLt,
    OpGt,
    OpEquals,
    OpBang,
    OpAmpersand,

    // Multi-char operators
    OpEq,
    OpNeq,
    OpLte,
    OpGte,
    OpPipeGt,
    OpGtGt,
    OpLtLt,
    OpCons,
    OpAssign,
    OpAnd,
    OpOr,

    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(StringId),
    BoolLiteral(bool),

    // Identifiers
    Identifier(StringId),
    Keyword(Keyword),
}

impl TokenKind {
    /// True for tokens that can end a statement/expression on their own —
    /// used to resolve the `|>`-across-newlines open question (spec §9).
    #[must_use]
    pub fn can_end_expression(&self) -> bool {
        matches!(
            self,
            Self::IntLiteral(_)
                | Self::FloatLiteral(_)
                | Self::StringLiteral(_)
                | Self::BoolLiteral(_)
                | Self::Identifier(_)
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }
}

/// A single lexed token: its kind, source span, and whether whitespace or
/// a comment preceded it (spec §3, §4.3).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Absent only for `EOF` (spec §3 invariant).
    pub leading_whitespace: Option<bool>,
}

impl Token {
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
