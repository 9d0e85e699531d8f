//! Core expression and statement evaluator.

use crate::builtins::Builtin;
use crate::env::{release_frame, Env, Environment};
use crate::error::{EvalError, EvalResult};
use crate::object::{hash_put, Function, Object};
use lilac_types::ast::*;
use lilac_types::ensure_sufficient_stack;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// How a function literal captures its defining environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Share the defining environment. Later bindings in it are visible to
    /// the function.
    #[default]
    Live,
    /// Copy the defining environment chain when the literal is evaluated.
    Snapshot,
}

/// Evaluator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Deepest permitted nesting of function calls.
    pub max_call_depth: usize,
    pub capture: CaptureMode,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            capture: CaptureMode::Live,
        }
    }
}

/// The core evaluator: walks AST nodes and produces Objects.
#[derive(Debug, Default)]
pub struct Evaluator {
    options: EvalOptions,
    /// Current function-call nesting.
    depth: usize,
}

impl Evaluator {
    /// Create a new evaluator with the given options.
    pub fn new(options: EvalOptions) -> Self {
        Self { options, depth: 0 }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program & statements
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a whole program in `env`.
    ///
    /// A top-level `return` yields its value; a runtime error yields an
    /// [`Object::Error`] carrying the message.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Object {
        self.depth = 0;
        match self.eval_statements(&program.statements, env) {
            Ok(value) | Err(EvalError::Return(value)) => value,
            Err(err) => Object::Error(err.to_string()),
        }
    }

    /// Evaluate a block in `env`. A `return` inside propagates as
    /// [`EvalError::Return`] to the enclosing call.
    pub fn eval_block(&mut self, block: &Block, env: &Env) -> EvalResult<Object> {
        self.eval_statements(&block.stmts, env)
    }

    fn eval_statements(&mut self, stmts: &[Stmt], env: &Env) -> EvalResult<Object> {
        let mut result = Object::Null;
        for stmt in stmts {
            result = self.eval_stmt(stmt, env)?;
        }
        Ok(result)
    }

    /// Evaluate a single statement. `let` yields `null`.
    pub fn eval_stmt(&mut self, stmt: &Stmt, env: &Env) -> EvalResult<Object> {
        match stmt {
            Stmt::Let(let_stmt) => {
                let value = self.eval_expr(&let_stmt.value, env)?;
                self.bind(&let_stmt.name.name, value, env);
                Ok(Object::Null)
            }
            Stmt::Return(ret) => {
                let value = self.eval_expr(&ret.value, env)?;
                Err(EvalError::Return(value))
            }
            Stmt::Expr(expr_stmt) => self.eval_expr(&expr_stmt.expr, env),
            Stmt::Block(block) => self.eval_block(block, env),
        }
    }

    /// Bind `name` in `env`. A function is first bound inside its own
    /// closure environment so its body can call itself by name.
    fn bind(&mut self, name: &str, value: Object, env: &Env) {
        match &value {
            Object::Function(func) if !Rc::ptr_eq(&func.env, env) => {
                func.env.borrow_mut().set_self(name, func);
            }
            _ => {}
        }
        tracing::debug!(name, ty = value.type_name(), "let binding");
        env.borrow_mut().set(name, value);
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to an Object.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Env) -> EvalResult<Object> {
        ensure_sufficient_stack(|| self.eval_expr_kind(&expr.kind, env))
    }

    fn eval_expr_kind(&mut self, kind: &ExprKind, env: &Env) -> EvalResult<Object> {
        match kind {
            ExprKind::Identifier(name) => eval_identifier(name, env),
            ExprKind::IntegerLit(n) => Ok(Object::Integer(*n)),
            ExprKind::StringLit(s) => Ok(Object::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Object::from(*b)),
            ExprKind::ArrayLit(elements) => Ok(Object::Array(self.eval_exprs(elements, env)?)),
            ExprKind::HashLit(pairs) => self.eval_hash_literal(pairs, env),

            ExprKind::Prefix { op, operand } => {
                let value = self.eval_expr(operand, env)?;
                eval_prefix(*op, value)
            }
            ExprKind::Infix { left, op, right } => {
                let lv = self.eval_expr(left, env)?;
                let rv = self.eval_expr(right, env)?;
                eval_infix(*op, lv, rv)
            }

            ExprKind::If(if_expr) => self.eval_if(if_expr, env),
            ExprKind::Function(func) => Ok(self.make_function(func, env)),
            ExprKind::Call { callee, args } => {
                let callee = self.eval_expr(callee, env)?;
                let args = self.eval_exprs(args, env)?;
                self.apply(callee, args)
            }
            ExprKind::Index { collection, index } => {
                let collection = self.eval_expr(collection, env)?;
                let index = self.eval_expr(index, env)?;
                eval_index(collection, index)
            }
        }
    }

    /// Evaluate left to right, stopping at the first error.
    fn eval_exprs(&mut self, exprs: &[Expr], env: &Env) -> EvalResult<Vec<Object>> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.eval_expr(expr, env)?);
        }
        Ok(values)
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)], env: &Env) -> EvalResult<Object> {
        let mut entries = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let key = self.eval_expr(key, env)?;
            let value = self.eval_expr(value, env)?;
            hash_put(&mut entries, key, value);
        }
        Ok(Object::Hash(entries))
    }

    fn eval_if(&mut self, if_expr: &IfExpr, env: &Env) -> EvalResult<Object> {
        let condition = self.eval_expr(&if_expr.condition, env)?;
        if condition.is_truthy() {
            self.eval_block(&if_expr.consequence, env)
        } else if let Some(alt) = &if_expr.alternative {
            self.eval_block(alt, env)
        } else {
            Ok(Object::Null)
        }
    }

    // ── Functions ─────────────────────────────────────────────────────────

    fn make_function(&self, func: &FunctionLit, env: &Env) -> Object {
        let closure = match self.options.capture {
            CaptureMode::Live => Rc::clone(env),
            CaptureMode::Snapshot => env.borrow().snapshot(),
        };
        Object::Function(Rc::new(Function {
            params: func.params.clone(),
            body: func.body.clone(),
            env: closure,
        }))
    }

    /// Call `callee` with evaluated arguments.
    pub fn apply(&mut self, callee: Object, args: Vec<Object>) -> EvalResult<Object> {
        match callee {
            Object::Function(func) => self.call_function(&func, args),
            Object::Builtin(builtin) => builtin.call(args),
            other => Err(EvalError::NotAFunction(other.type_name())),
        }
    }

    fn call_function(&mut self, func: &Function, args: Vec<Object>) -> EvalResult<Object> {
        if args.len() != func.params.len() {
            return Err(EvalError::WrongArgumentCount {
                got: args.len(),
                want: func.params.len(),
            });
        }
        if self.depth >= self.options.max_call_depth {
            tracing::warn!(
                max_call_depth = self.options.max_call_depth,
                "call depth limit reached"
            );
            return Err(EvalError::CallDepthExceeded(self.options.max_call_depth));
        }

        let mut frame = Environment::enclosed(Rc::clone(&func.env));
        for (param, arg) in func.params.iter().zip(args) {
            frame.set(param.name.as_str(), arg);
        }
        let frame = frame.into_shared();

        self.depth += 1;
        tracing::debug!(depth = self.depth, arity = func.params.len(), "call");
        let result = self.eval_block(&func.body, &frame);
        self.depth -= 1;
        release_frame(frame);

        match result {
            Err(EvalError::Return(value)) => Ok(value),
            other => other,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators & lookups
// ══════════════════════════════════════════════════════════════════════════

fn eval_identifier(name: &str, env: &Env) -> EvalResult<Object> {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }
    Builtin::lookup(name)
        .map(Object::Builtin)
        .ok_or_else(|| EvalError::IdentifierNotFound(name.to_string()))
}

fn eval_prefix(op: PrefixOp, value: Object) -> EvalResult<Object> {
    match op {
        PrefixOp::Not => Ok(Object::from(!value.is_truthy())),
        PrefixOp::Neg => match value {
            Object::Integer(n) => Ok(Object::Integer(n.wrapping_neg())),
            other => Err(EvalError::UnknownPrefixOperator {
                op: op.as_str(),
                operand: other.type_name(),
            }),
        },
    }
}

fn eval_infix(op: InfixOp, left: Object, right: Object) -> EvalResult<Object> {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(op, *l, *r),
        (Object::String(l), Object::String(r)) if op == InfixOp::Add => {
            Ok(Object::String(format!("{l}{r}")))
        }
        (Object::String(_), Object::String(_)) => Err(unknown_infix(op, &left, &right)),
        _ => match op {
            InfixOp::Eq => Ok(Object::from(left == right)),
            InfixOp::NotEq => Ok(Object::from(left != right)),
            _ if left.type_name() != right.type_name() => Err(EvalError::TypeMismatch {
                left: left.type_name(),
                op: op.as_str(),
                right: right.type_name(),
            }),
            _ => Err(unknown_infix(op, &left, &right)),
        },
    }
}

fn unknown_infix(op: InfixOp, left: &Object, right: &Object) -> EvalError {
    EvalError::UnknownInfixOperator {
        left: left.type_name(),
        op: op.as_str(),
        right: right.type_name(),
    }
}

/// Integer arithmetic wraps on overflow.
fn eval_integer_infix(op: InfixOp, l: i64, r: i64) -> EvalResult<Object> {
    let value = match op {
        InfixOp::Add => Object::Integer(l.wrapping_add(r)),
        InfixOp::Sub => Object::Integer(l.wrapping_sub(r)),
        InfixOp::Mul => Object::Integer(l.wrapping_mul(r)),
        InfixOp::Div => {
            if r == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Object::Integer(l.wrapping_div(r))
        }
        InfixOp::Less => Object::from(l < r),
        InfixOp::Greater => Object::from(l > r),
        InfixOp::Eq => Object::from(l == r),
        InfixOp::NotEq => Object::from(l != r),
    };
    Ok(value)
}

/// Out-of-range array indices, negative ones included, yield `null`.
fn eval_index(collection: Object, index: Object) -> EvalResult<Object> {
    match (collection, index) {
        (Object::Array(elements), Object::Integer(i)) => Ok(usize::try_from(i)
            .ok()
            .and_then(|i| elements.into_iter().nth(i))
            .unwrap_or(Object::Null)),
        (collection, _) => Err(EvalError::IndexNotSupported(collection.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = EvalOptions::default();
        assert_eq!(options.max_call_depth, 1000);
        assert_eq!(options.capture, CaptureMode::Live);
        assert_eq!(Evaluator::default().options(), &options);
    }

    #[test]
    fn test_integer_arithmetic_wraps() {
        let add = eval_integer_infix(InfixOp::Add, i64::MAX, 1).ok();
        assert_eq!(add, Some(Object::Integer(i64::MIN)));
        let div = eval_integer_infix(InfixOp::Div, i64::MIN, -1).ok();
        assert_eq!(div, Some(Object::Integer(i64::MIN)));
        assert!(matches!(
            eval_integer_infix(InfixOp::Div, 1, 0),
            Err(EvalError::DivisionByZero)
        ));
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(
            eval_integer_infix(InfixOp::Div, -7, 2).ok(),
            Some(Object::Integer(-3))
        );
    }

    #[test]
    fn test_index_bounds() {
        let xs = || Object::Array(vec![Object::Integer(1), Object::Integer(2)]);
        assert_eq!(eval_index(xs(), Object::Integer(1)).ok(), Some(Object::Integer(2)));
        assert_eq!(eval_index(xs(), Object::Integer(2)).ok(), Some(Object::Null));
        assert_eq!(eval_index(xs(), Object::Integer(-1)).ok(), Some(Object::Null));
        assert_eq!(
            eval_index(Object::Integer(1), Object::Integer(0))
                .map_err(|e| e.to_string())
                .err(),
            Some("index operator not supported: INTEGER".to_string())
        );
    }
}
