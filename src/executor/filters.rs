//! WHERE clause evaluation
//!
//! Recursive evaluator over the expression tree. A comparison with a Null
//! operand is false (never an error); only `IS [NOT]` inspects Null. Any
//! shape the evaluator does not know fails the whole query, so filtering is
//! never silently partial.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::planner::{CompareOp, Expr, IsTest};
use crate::value::{compare, to_numeric, LikePattern, Row, Value};

use super::errors::{ExecutorError, ExecutorResult};

static NULL: Value = Value::Null;

/// Evaluates WHERE expressions against rows.
///
/// Holds compiled LIKE patterns so a pattern is compiled once per query
/// rather than once per row.
#[derive(Debug, Default)]
pub struct PredicateFilter {
    like_cache: HashMap<String, LikePattern>,
}

impl PredicateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rows for which `selection` holds; every row passes when
    /// there is no WHERE clause.
    pub fn apply(rows: Vec<Row>, selection: Option<&Expr>) -> ExecutorResult<Vec<Row>> {
        let selection = match selection {
            Some(expr) => expr,
            None => return Ok(rows),
        };

        let mut filter = Self::new();
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if filter.evaluate(&row, selection)? {
                kept.push(row);
            }
        }
        Ok(kept)
    }

    /// One-shot evaluation of a single row
    pub fn matches(row: &Row, expr: &Expr) -> ExecutorResult<bool> {
        Self::new().evaluate(row, expr)
    }

    /// Evaluates `expr` as a boolean against `row`
    pub fn evaluate(&mut self, row: &Row, expr: &Expr) -> ExecutorResult<bool> {
        match expr {
            Expr::Compare { left, op, right } => {
                let left = self.resolve(row, left)?;
                let right = self.resolve(row, right)?;
                if left.is_null() || right.is_null() {
                    return Ok(false);
                }
                self.compare_op(&left, *op, &right)
            }
            Expr::And(left, right) => Ok(self.evaluate(row, left)? && self.evaluate(row, right)?),
            Expr::Or(left, right) => Ok(self.evaluate(row, left)? || self.evaluate(row, right)?),
            Expr::Not(inner) => Ok(!self.evaluate(row, inner)?),
            Expr::Nested(inner) => self.evaluate(row, inner),
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let value = self.resolve(row, expr)?;
                let low = self.resolve(row, low)?;
                let high = self.resolve(row, high)?;
                if value.is_null() || low.is_null() || high.is_null() {
                    return Ok(false);
                }
                let inside = compare(&value, &low) != Ordering::Less
                    && compare(&value, &high) != Ordering::Greater;
                Ok(inside != *negated)
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let value = self.resolve(row, expr)?;
                if value.is_null() {
                    return Ok(false);
                }
                let mut found = false;
                for item in list {
                    let item = self.resolve(row, item)?;
                    if !item.is_null() && compare(&value, &item) == Ordering::Equal {
                        found = true;
                        break;
                    }
                }
                Ok(found != *negated)
            }
            Expr::Is {
                expr,
                test,
                negated,
            } => {
                let value = self.resolve(row, expr)?;
                // Structural check, no coercion: 1 IS TRUE is false
                let holds = match test {
                    IsTest::Null => value.is_null(),
                    IsTest::True => *value == Value::Boolean(true),
                    IsTest::False => *value == Value::Boolean(false),
                };
                Ok(holds != *negated)
            }
            Expr::Column(_) | Expr::Literal(_) => {
                let value = self.resolve(row, expr)?;
                Ok(Self::truthy(&value))
            }
            Expr::Function(call) => Err(ExecutorError::unsupported_expression(format!(
                "function {}() in WHERE",
                call.name
            ))),
            Expr::Wildcard => Err(ExecutorError::unsupported_expression("* in WHERE")),
            Expr::Subquery(_) => Err(ExecutorError::unsupported_expression("subquery")),
            Expr::Exists(_) => Err(ExecutorError::unsupported_expression("EXISTS")),
        }
    }

    /// Resolves an operand to a value: a column (missing reads as Null), a
    /// literal, or a nested boolean expression.
    fn resolve<'r>(&mut self, row: &'r Row, expr: &Expr) -> ExecutorResult<Cow<'r, Value>> {
        match expr {
            Expr::Column(name) => Ok(Cow::Borrowed(row.get(name).unwrap_or(&NULL))),
            Expr::Literal(literal) => Ok(Cow::Owned(literal.to_value())),
            Expr::Nested(inner) => self.resolve(row, inner),
            Expr::Compare { .. }
            | Expr::And(..)
            | Expr::Or(..)
            | Expr::Not(_)
            | Expr::Between { .. }
            | Expr::InList { .. }
            | Expr::Is { .. } => Ok(Cow::Owned(Value::Boolean(self.evaluate(row, expr)?))),
            Expr::Function(call) => Err(ExecutorError::unsupported_expression(format!(
                "function {}() as an operand",
                call.name
            ))),
            Expr::Wildcard => Err(ExecutorError::unsupported_expression("* as an operand")),
            Expr::Subquery(_) => Err(ExecutorError::unsupported_expression("subquery")),
            Expr::Exists(_) => Err(ExecutorError::unsupported_expression("EXISTS")),
        }
    }

    fn compare_op(&mut self, left: &Value, op: CompareOp, right: &Value) -> ExecutorResult<bool> {
        let ordering = || compare(left, right);
        Ok(match op {
            CompareOp::Eq => ordering() == Ordering::Equal,
            CompareOp::NotEq => ordering() != Ordering::Equal,
            CompareOp::Lt => ordering() == Ordering::Less,
            CompareOp::LtEq => ordering() != Ordering::Greater,
            CompareOp::Gt => ordering() == Ordering::Greater,
            CompareOp::GtEq => ordering() != Ordering::Less,
            CompareOp::Like => self.like(left, right)?,
            CompareOp::NotLike => !self.like(left, right)?,
        })
    }

    fn like(&mut self, value: &Value, pattern: &Value) -> ExecutorResult<bool> {
        let pattern = Self::text(pattern);
        if !self.like_cache.contains_key(&*pattern) {
            let compiled = LikePattern::new(&pattern).map_err(|e| {
                ExecutorError::unsupported_expression(format!("LIKE pattern '{}': {}", pattern, e))
            })?;
            self.like_cache.insert(pattern.to_string(), compiled);
        }
        Ok(self.like_cache[&*pattern].matches(&Self::text(value)))
    }

    fn text(value: &Value) -> Cow<'_, str> {
        match value {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    // Bare column or literal used as a condition (`WHERE active`)
    fn truthy(value: &Value) -> bool {
        match value {
            Value::Boolean(b) => *b,
            Value::Null => false,
            other => to_numeric(other).map(|n| n != 0.0).unwrap_or(false),
        }
    }
}
