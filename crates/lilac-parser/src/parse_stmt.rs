//! Statement parsing.
//!
//! Each rule starts with the cursor on the statement's first token and
//! leaves it on the statement's last token; `parse_program` and
//! `parse_block` step past it.

use crate::parse_expr::Precedence;
use crate::parser::Parser;
use lilac_lexer::TokenKind;
use lilac_types::ast::*;

impl<'src> Parser<'src> {
    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_stmt().map(Stmt::Let),
            TokenKind::Return => self.parse_return_stmt().map(Stmt::Return),
            _ => self.parse_expr_stmt().map(Stmt::Expr),
        }
    }

    /// `let IDENT = expr [;]`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_let_stmt(&mut self) -> Option<LetStmt> {
        let start = self.current_span();
        let name = self.expect_ident()?;
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.eat_peek(TokenKind::Semicolon);
        let span = start.to(self.current_span());
        Some(LetStmt { name, value, span })
    }

    /// `return expr [;]`
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_return_stmt(&mut self) -> Option<ReturnStmt> {
        let start = self.current_span();
        self.next_token(); // eat `return`
        let value = self.parse_expression(Precedence::Lowest)?;
        self.eat_peek(TokenKind::Semicolon);
        let span = start.to(self.current_span());
        Some(ReturnStmt { value, span })
    }

    /// `expr [;]`
    fn parse_expr_stmt(&mut self) -> Option<ExprStmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.eat_peek(TokenKind::Semicolon);
        let span = expr.span.to(self.current_span());
        Some(ExprStmt { expr, span })
    }

    /// `{ stmts... }`
    ///
    /// Starts on `{` and stops on the matching `}`, or at end of input if
    /// the block is never closed.
    #[tracing::instrument(level = "trace", skip_all)]
    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.current_span();
        self.next_token(); // eat `{`
        let mut stmts = Vec::new();
        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            }
            self.next_token();
        }
        let span = start.to(self.current_span());
        Block { stmts, span }
    }
}
