//! Core Lilac lexer: turns source text into tokens on demand.
//!
//! The parser pulls one token at a time with [`Lexer::next_token`]. Once the
//! input is exhausted every further call yields [`TokenKind::Eof`]. Scanning
//! never fails: characters no rule accepts become [`TokenKind::Illegal`]
//! tokens and the parser reports them.

use lilac_types::Span;

use crate::token::{lookup_ident, Token, TokenKind};

/// The Lilac lexer.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based, in characters).
    col: u32,
    /// Set once the iterator has yielded EOF's predecessor.
    done: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            done: false,
        }
    }

    /// Lex the whole input. The returned vector always ends with EOF.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    /// Consume characters while `pred` holds and return the consumed text.
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        let source = self.source;
        &source[start..self.pos]
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start_line = self.line;
        let start_col = self.col;

        let Some(ch) = self.peek() else {
            return Token::eof(Span::point(self.line, self.col));
        };

        if is_letter(ch) {
            let word = self.take_while(is_letter);
            return Token::new(lookup_ident(word), word, self.span_from(start_line, start_col));
        }

        if ch.is_ascii_digit() {
            // Trailing letters are kept so `12abc` reaches the parser whole.
            let digits = self.take_while(|c| c.is_ascii_alphanumeric());
            return Token::new(TokenKind::Int, digits, self.span_from(start_line, start_col));
        }

        if ch == '"' {
            return self.scan_string(start_line, start_col);
        }

        self.advance();
        let kind = match ch {
            '=' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::Eq
            }
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '=' => TokenKind::Assign,
            '!' => TokenKind::Bang,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            _ => TokenKind::Illegal,
        };

        let literal = match kind {
            TokenKind::Eq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            _ => ch.to_string(),
        };
        Token::new(kind, literal, self.span_from(start_line, start_col))
    }

    /// Scan a string literal. The opening quote is current. There are no
    /// escapes; an unterminated string runs to the end of input.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Token {
        self.advance(); // opening "
        let text = self.take_while(|c| c != '"');
        self.advance(); // closing ", if any
        Token::new(TokenKind::String, text, self.span_from(start_line, start_col))
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Iterates over tokens up to, but not including, EOF.
impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
            return None;
        }
        Some(token)
    }
}
