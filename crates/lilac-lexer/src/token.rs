//! Token types for the Lilac lexer.
//!
//! Defines [`TokenKind`], a fieldless tag for every lexeme, and [`Token`],
//! which pairs a kind with its literal source text and a [`Span`].

use lilac_types::Span;
use std::fmt;

/// Reserved words and the token kind each one lexes to.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("fn", TokenKind::Function),
    ("let", TokenKind::Let),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("return", TokenKind::Return),
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the Lilac lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The source text the token was read from. Empty for EOF; string
    /// tokens hold the text between the quotes.
    pub literal: String,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    /// Create an end-of-input token.
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "", span)
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Lilac language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Special ──────────────────────────────────────────────
    /// A character no rule accepts.
    Illegal,
    /// End of input. Repeats forever once reached.
    Eof,

    // ── Identifiers & Literals ───────────────────────────────
    /// `foo`, `my_var`
    Ident,
    /// `42`
    Int,
    /// `"hello"`
    String,

    // ── Operators ────────────────────────────────────────────
    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Bang,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `==`
    Eq,
    /// `!=`
    NotEq,

    // ── Delimiters ───────────────────────────────────────────
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    // ── Keywords ─────────────────────────────────────────────
    /// `fn`
    Function,
    /// `let`
    Let,
    /// `true`
    True,
    /// `false`
    False,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
}

impl TokenKind {
    /// Returns `true` if this kind is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::Let
                | TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Return
        )
    }

    /// The `tok_`-prefixed name used in parse-error messages and lexer output.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "tok_ILLEGAL",
            TokenKind::Eof => "tok_EOF",
            TokenKind::Ident => "tok_IDENT",
            TokenKind::Int => "tok_INT",
            TokenKind::String => "tok_STRING",
            TokenKind::Assign => "tok_ASSIGN",
            TokenKind::Plus => "tok_PLUS",
            TokenKind::Minus => "tok_MINUS",
            TokenKind::Bang => "tok_BANG",
            TokenKind::Asterisk => "tok_ASTERISK",
            TokenKind::Slash => "tok_SLASH",
            TokenKind::Lt => "tok_LT",
            TokenKind::Gt => "tok_GT",
            TokenKind::Eq => "tok_EQ",
            TokenKind::NotEq => "tok_NOT_EQ",
            TokenKind::Comma => "tok_COMMA",
            TokenKind::Semicolon => "tok_SEMICOLON",
            TokenKind::Colon => "tok_COLON",
            TokenKind::LParen => "tok_LPAREN",
            TokenKind::RParen => "tok_RPAREN",
            TokenKind::LBrace => "tok_LBRACE",
            TokenKind::RBrace => "tok_RBRACE",
            TokenKind::LBracket => "tok_LBRACKET",
            TokenKind::RBracket => "tok_RBRACKET",
            TokenKind::Function => "tok_FUNCTION",
            TokenKind::Let => "tok_LET",
            TokenKind::True => "tok_TRUE",
            TokenKind::False => "tok_FALSE",
            TokenKind::If => "tok_IF",
            TokenKind::Else => "tok_ELSE",
            TokenKind::Return => "tok_RETURN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up an identifier: returns the keyword kind if `word` is reserved,
/// otherwise [`TokenKind::Ident`].
pub fn lookup_ident(word: &str) -> TokenKind {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == word)
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Ident)
}
