//! Statement model and per-query planning
//!
//! The planner owns the SELECT AST consumed from the external parser and
//! derives the [`ExecutionContext`] passed to row generators.
//!
//! # Pushdown
//!
//! Constants and constraints extracted here are advisory. The executor
//! re-evaluates the full WHERE clause on every generated row.

mod ast;
mod context;

pub use ast::{
    CompareOp, Expr, FunctionCall, IsTest, Literal, OrderByExpr, SelectItem, SelectStatement,
    SortDirection,
};
pub use context::{Constraint, ExecutionContext};
