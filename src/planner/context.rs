//! Execution context handed to row generators
//!
//! Built once per query from the statement, read-only afterwards. Both the
//! required-column set and the pushed-down constants are hints: a generator
//! may use them to skip work, but the executor re-checks every WHERE
//! condition on the rows it gets back.

use std::collections::{BTreeMap, BTreeSet};

use super::ast::{CompareOp, Expr, Literal, SelectItem, SelectStatement};

/// A `column <op> literal` conjunct from the top level of WHERE
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub column: String,
    pub op: CompareOp,
    pub value: Literal,
}

/// Per-query hints for the row generator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    table: String,
    /// Empty means every column is needed
    required: BTreeSet<String>,
    constants: BTreeMap<String, Literal>,
    constraints: Vec<Constraint>,
}

impl ExecutionContext {
    /// Builds the context for the table named in the FROM clause
    pub fn from_statement(stmt: &SelectStatement) -> Self {
        Self::new(stmt.from.clone(), stmt)
    }

    /// Builds the context in a single pass over SELECT, WHERE, GROUP BY and
    /// ORDER BY.
    pub fn new(table: impl Into<String>, stmt: &SelectStatement) -> Self {
        let mut ctx = Self {
            table: table.into(),
            ..Self::default()
        };

        if !stmt.has_wildcard() {
            let mut columns = Vec::new();
            for item in &stmt.projection {
                if let SelectItem::Expr { expr, .. } = item {
                    expr.collect_columns(&mut columns);
                }
            }
            if let Some(selection) = &stmt.selection {
                selection.collect_columns(&mut columns);
            }
            columns.extend(stmt.group_by.iter().cloned());
            columns.extend(stmt.order_by.iter().map(|o| o.column.clone()));
            ctx.required = columns.into_iter().collect();
        }

        if let Some(selection) = &stmt.selection {
            ctx.collect_conjuncts(selection);
        }

        ctx
    }

    /// Context with no hints at all: every column, no constraints
    pub fn unconstrained(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Table this context was built for
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns the query touches. Empty means "all columns".
    pub fn required_columns(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// Returns true if a generator needs to produce `column`
    pub fn is_column_used(&self, column: &str) -> bool {
        self.required.is_empty()
            || self.required.contains(column)
            || self
                .required
                .iter()
                .any(|c| c.eq_ignore_ascii_case(column))
    }

    /// Equality constants from top-level AND conjuncts
    pub fn pushable_constants(&self) -> &BTreeMap<String, Literal> {
        &self.constants
    }

    /// Looks up a single pushed-down equality constant
    pub fn constant(&self, column: &str) -> Option<&Literal> {
        self.constants.get(column).or_else(|| {
            self.constants
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(column))
                .map(|(_, v)| v)
        })
    }

    /// Every `column <op> literal` conjunct, in WHERE order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints on one column
    pub fn constraints_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Constraint> {
        self.constraints
            .iter()
            .filter(move |c| c.column.eq_ignore_ascii_case(column))
    }

    // Only AND and parentheses are descended; anything under OR or NOT
    // cannot be assumed to hold for every result row.
    fn collect_conjuncts(&mut self, expr: &Expr) {
        match expr {
            Expr::And(left, right) => {
                self.collect_conjuncts(left);
                self.collect_conjuncts(right);
            }
            Expr::Nested(inner) => self.collect_conjuncts(inner),
            Expr::Compare { left, op, right } => {
                if let Some(constraint) = Self::as_constraint(left, *op, right) {
                    if constraint.op == CompareOp::Eq {
                        self.constants
                            .insert(constraint.column.clone(), constraint.value.clone());
                    }
                    self.constraints.push(constraint);
                }
            }
            _ => {}
        }
    }

    fn as_constraint(left: &Expr, op: CompareOp, right: &Expr) -> Option<Constraint> {
        match (Self::unwrap_nested(left), Self::unwrap_nested(right)) {
            (Expr::Column(column), Expr::Literal(value)) => Some(Constraint {
                column: column.clone(),
                op,
                value: value.clone(),
            }),
            (Expr::Literal(value), Expr::Column(column)) => Some(Constraint {
                column: column.clone(),
                op: op.mirrored()?,
                value: value.clone(),
            }),
            _ => None,
        }
    }

    fn unwrap_nested(expr: &Expr) -> &Expr {
        match expr {
            Expr::Nested(inner) => Self::unwrap_nested(inner),
            other => other,
        }
    }
}
