//! Final column projection and aliasing
//!
//! Maps the internal keys of result rows (source column names, aggregate
//! keys such as `SUM(size)`) to the names the user asked for. Rows are never
//! modified in place; every projected row is a new [`Row`]. A selected
//! column missing from a row is omitted from that row, not null-filled.

use crate::planner::{Expr, SelectItem};
use crate::value::Row;

use super::aggregator::AggregateSpec;
use super::errors::{ExecutorError, ExecutorResult};
use super::result::ResultSet;

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputColumn {
    /// `*`: every column of the row, in row order
    All,
    /// A single column read from `source`, emitted as `name`
    Single { source: String, name: String },
}

/// Projection built from the SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    columns: Vec<OutputColumn>,
}

impl Projection {
    /// Builds the projection. `aggregates` must be the specs extracted from
    /// the same SELECT list, in order.
    pub fn new(projection: &[SelectItem], aggregates: &[AggregateSpec]) -> ExecutorResult<Self> {
        let mut specs = aggregates.iter();
        let mut columns = Vec::with_capacity(projection.len());

        for item in projection {
            let column = match item {
                SelectItem::Wildcard => OutputColumn::All,
                SelectItem::Expr {
                    expr: Expr::Column(source),
                    alias,
                } => OutputColumn::Single {
                    source: source.clone(),
                    name: alias.clone().unwrap_or_else(|| source.clone()),
                },
                SelectItem::Expr {
                    expr: Expr::Function(call),
                    ..
                } => {
                    let spec = specs.next().ok_or_else(|| {
                        ExecutorError::unsupported_expression(format!("function {}()", call.name))
                    })?;
                    OutputColumn::Single {
                        source: spec.key.clone(),
                        name: spec.alias.clone(),
                    }
                }
                SelectItem::Expr { .. } => {
                    return Err(ExecutorError::unsupported_expression(
                        "SELECT list entries must be columns, * or aggregate calls",
                    ))
                }
            };
            columns.push(column);
        }

        Ok(Self { columns })
    }

    /// `SELECT *` without aliases: rows pass through untouched
    pub fn is_passthrough(&self) -> bool {
        self.columns.iter().all(|c| *c == OutputColumn::All)
    }

    /// Resolves an ORDER BY name against the SELECT aliases.
    ///
    /// Sorting happens before projection, so `ORDER BY total` where `total`
    /// aliases `SUM(size)` must sort on the `SUM(size)` key.
    pub fn resolve_sort_column<'a>(&'a self, name: &'a str) -> &'a str {
        self.columns
            .iter()
            .find_map(|c| match c {
                OutputColumn::Single { source, name: out } if out.eq_ignore_ascii_case(name) => {
                    Some(source.as_str())
                }
                _ => None,
            })
            .unwrap_or(name)
    }

    /// Projects rows into the final result set
    pub fn apply(&self, rows: Vec<Row>) -> ResultSet {
        if self.is_passthrough() {
            return ResultSet::from_rows(rows);
        }

        let columns = self.output_columns(rows.first());
        let projected = rows.iter().map(|row| self.project_row(row)).collect();
        ResultSet::new(columns, projected)
    }

    fn project_row(&self, row: &Row) -> Row {
        let mut out = Row::with_capacity(self.columns.len());
        for column in &self.columns {
            match column {
                OutputColumn::All => {
                    for (name, value) in row.iter() {
                        out.insert(name, value.clone());
                    }
                }
                OutputColumn::Single { source, name } => {
                    if let Some(value) = row.get(source) {
                        out.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        out
    }

    // `*` expands to the first row's columns
    fn output_columns(&self, first: Option<&Row>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };
        for column in &self.columns {
            match column {
                OutputColumn::All => {
                    if let Some(row) = first {
                        row.column_names().for_each(&mut push);
                    }
                }
                OutputColumn::Single { name, .. } => push(name),
            }
        }
        names
    }
}
