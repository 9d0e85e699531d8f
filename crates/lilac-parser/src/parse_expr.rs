//! Expression parsing: a Pratt parser over binding powers.
//!
//! Precedence (lowest → highest):
//! 1. `==`, `!=`
//! 2. `<`, `>`
//! 3. `+`, `-`
//! 4. `*`, `/`
//! 5. unary `!`, `-`
//! 6. `(` (call)
//! 7. `[` (index)
//!
//! Binary operators are left-associative: the right operand is parsed at
//! the operator's own precedence, so an equal-precedence operator that
//! follows binds to the left.

use lilac_lexer::TokenKind;
use lilac_types::ast::*;
use lilac_types::{ensure_sufficient_stack, ParseErrorKind};

use crate::parser::Parser;

/// Deepest expression nesting accepted before the parser gives up.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// Binding power of an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==`, `!=`
    Equals,
    /// `<`, `>`
    Compare,
    /// `+`, `-`
    Sum,
    /// `*`, `/`
    Product,
    /// unary `!x`, `-x`
    Prefix,
    /// `f(x)`
    Call,
    /// `a[i]`
    Index,
}

impl Precedence {
    /// Precedence of `kind` when it appears in infix position.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::Compare,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Asterisk => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Lt => InfixOp::Less,
        TokenKind::Gt => InfixOp::Greater,
        TokenKind::Eq => InfixOp::Eq,
        TokenKind::NotEq => InfixOp::NotEq,
        _ => return None,
    };
    Some(op)
}

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression whose operators all bind tighter than `min`.
    ///
    /// Starts with the cursor on the expression's first token and leaves it
    /// on the last token consumed.
    pub(crate) fn parse_expression(&mut self, min: Precedence) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_NESTING_DEPTH {
            self.error_at_current(
                ParseErrorKind::NestingTooDeep,
                format!(
                    "maximum expression nesting depth is {MAX_NESTING_DEPTH}, got {}",
                    self.expr_depth
                ),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = ensure_sufficient_stack(|| self.parse_pratt(min));
        self.expr_depth -= 1;
        result
    }

    fn parse_pratt(&mut self, min: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(TokenKind::Semicolon) && min < Precedence::of(self.peek.kind) {
            self.next_token();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Rules
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_prefix(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.current.kind {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::Ident => Some(Expr::new(
                ExprKind::Identifier(self.current.literal.clone()),
                start,
            )),
            TokenKind::Int => self.parse_integer(),
            TokenKind::String => Some(Expr::new(
                ExprKind::StringLit(self.current.literal.clone()),
                start,
            )),
            TokenKind::True => Some(Expr::new(ExprKind::BoolLit(true), start)),
            TokenKind::False => Some(Expr::new(ExprKind::BoolLit(false), start)),
            TokenKind::LBracket => {
                let elements = self.parse_expr_list(TokenKind::RBracket)?;
                let span = start.to(self.current_span());
                Some(Expr::new(ExprKind::ArrayLit(elements), span))
            }
            TokenKind::LBrace => self.parse_hash_literal(),

            // ── Operators & Grouping ────────────────────────────────────
            TokenKind::Bang => self.parse_prefix_op(PrefixOp::Not),
            TokenKind::Minus => self.parse_prefix_op(PrefixOp::Neg),
            TokenKind::LParen => self.parse_grouped(),

            // ── Compound ────────────────────────────────────────────────
            TokenKind::If => self.parse_if_expr(),
            TokenKind::Function => self.parse_function_literal(),

            other => {
                self.error_at_current(
                    ParseErrorKind::NoPrefixRule,
                    format!("no prefix parse function for {other} found"),
                );
                None
            }
        }
    }

    fn parse_integer(&mut self) -> Option<Expr> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expr::new(ExprKind::IntegerLit(value), self.current_span())),
            Err(_) => {
                let message = format!("could not parse {} as integer", self.current.literal);
                self.error_at_current(ParseErrorKind::InvalidInteger, message);
                None
            }
        }
    }

    /// `!expr` / `-expr`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_prefix_op(&mut self, op: PrefixOp) -> Option<Expr> {
        let start = self.current_span();
        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix)?;
        let span = start.to(operand.span);
        Some(Expr::new(
            ExprKind::Prefix {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `( expr )`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_grouped(&mut self) -> Option<Expr> {
        self.next_token(); // eat `(`
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(expr)
    }

    /// `if ( cond ) { ... } [ else { ... } ]`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_if_expr(&mut self) -> Option<Expr> {
        let start = self.current_span();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) || !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block();

        let alternative = if self.eat_peek(TokenKind::Else) {
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block())
        } else {
            None
        };

        let span = start.to(self.current_span());
        Some(Expr::new(
            ExprKind::If(Box::new(IfExpr {
                condition,
                consequence,
                alternative,
                span,
            })),
            span,
        ))
    }

    /// `fn ( params ) { body }`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_function_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_params()?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block();
        let span = start.to(self.current_span());
        Some(Expr::new(
            ExprKind::Function(Box::new(FunctionLit { params, body, span })),
            span,
        ))
    }

    /// `IDENT { , IDENT }` up to and including `)`. Starts on `(`.
    fn parse_params(&mut self) -> Option<Vec<Ident>> {
        let mut params = Vec::new();
        if self.eat_peek(TokenKind::RParen) {
            return Some(params);
        }
        params.push(self.expect_ident()?);
        while self.eat_peek(TokenKind::Comma) {
            params.push(self.expect_ident()?);
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    /// `{ key : value , ... }`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }
        let span = start.to(self.current_span());
        Some(Expr::new(ExprKind::HashLit(pairs), span))
    }

    /// Comma-separated expressions up to and including `end`. Starts on the
    /// opening delimiter.
    fn parse_expr_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        if self.eat_peek(end) {
            return Some(items);
        }
        self.next_token();
        items.push(self.parse_expression(Precedence::Lowest)?);
        while self.eat_peek(TokenKind::Comma) {
            self.next_token();
            items.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(items)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Infix Rules
    // ══════════════════════════════════════════════════════════════════════════

    /// Apply the infix rule for the current token to `left`.
    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.current.kind {
            TokenKind::LParen => self.parse_call(left),
            TokenKind::LBracket => self.parse_index(left),
            kind => match infix_op(kind) {
                Some(op) => self.parse_binary(left, op),
                // Only tokens with an infix rule have a precedence above Lowest.
                None => unreachable!("no infix rule for {kind}"),
            },
        }
    }

    /// `left op right`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_binary(&mut self, left: Expr, op: InfixOp) -> Option<Expr> {
        let precedence = Precedence::of(self.current.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        let span = left.span.to(right.span);
        Some(Expr::new(
            ExprKind::Infix {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// `callee ( args )`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_call(&mut self, callee: Expr) -> Option<Expr> {
        let args = self.parse_expr_list(TokenKind::RParen)?;
        let span = callee.span.to(self.current_span());
        Some(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }

    /// `collection [ index ]`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_index(&mut self, collection: Expr) -> Option<Expr> {
        self.next_token(); // eat `[`
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }
        let span = collection.span.to(self.current_span());
        Some(Expr::new(
            ExprKind::Index {
                collection: Box::new(collection),
                index: Box::new(index),
            },
            span,
        ))
    }
}
