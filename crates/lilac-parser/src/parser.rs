//! Core parser infrastructure: token cursor, error reporting, helpers.

use lilac_lexer::{Lexer, Token, TokenKind};
use lilac_types::ast::{Ident, Program};
use lilac_types::{ParseError, ParseErrorKind, ParseErrors, Span};

/// The Lilac parser.
///
/// Pulls tokens from the lexer on demand, keeping exactly one token of
/// lookahead (`peek`) beyond `current`. Errors are collected, never thrown:
/// a failing construct is abandoned and parsing resumes at the next
/// top-level statement.
pub struct Parser<'src> {
    /// Token source.
    lexer: Lexer<'src>,
    /// The token under examination.
    pub(crate) current: Token,
    /// One token of lookahead.
    pub(crate) peek: Token,
    /// Collected errors.
    errors: ParseErrors,
    /// Current expression nesting depth.
    pub(crate) expr_depth: u32,
}

/// Result of parsing.
///
/// `program` holds every statement that parsed cleanly. A non-empty
/// `errors` means the program must not be evaluated.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub program: Program,
    pub errors: ParseErrors,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }
}

impl<'src> Parser<'src> {
    /// Create a new parser over `source`.
    pub fn new(source: &'src str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    /// Create a new parser reading from an existing lexer.
    pub fn from_lexer(mut lexer: Lexer<'src>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: ParseErrors::empty(),
            expr_depth: 0,
        }
    }

    /// Parse the whole input.
    pub fn parse(mut self) -> ParseResult {
        let program = self.parse_program();
        if self.errors.has_errors() {
            tracing::debug!(errors = self.errors.len(), "parse finished with errors");
        }
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    /// `Program = { Statement }`
    fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.current_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Program::new(statements)
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Shift `peek` into `current` and pull a fresh lookahead token.
    pub(crate) fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.current.span
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Advance if the lookahead is `expected`. Otherwise record an error and
    /// leave the cursor where it is.
    pub(crate) fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek_is(expected) {
            self.next_token();
            true
        } else {
            let message = format!(
                "Expected next token to be {}, got {} instead",
                expected, self.peek.kind
            );
            self.error_at(ParseErrorKind::UnexpectedToken, message, self.peek.span);
            false
        }
    }

    /// Expect the lookahead to be an identifier and advance onto it.
    pub(crate) fn expect_ident(&mut self) -> Option<Ident> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        Some(Ident::new(self.current.literal.clone(), self.current.span))
    }

    /// If the lookahead matches, advance and return `true`.
    pub(crate) fn eat_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, kind: ParseErrorKind, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(kind, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, kind: ParseErrorKind, message: impl Into<String>, span: Span) {
        let error = ParseError::new(kind, message, span);
        tracing::trace!(%span, message = %error.message, "parse error");
        self.errors.push(error);
    }
}

/// Parse `source` in one call.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}
