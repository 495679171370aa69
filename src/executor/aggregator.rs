//! Aggregation with GROUP BY
//!
//! Activated only when the SELECT list holds at least one of COUNT, SUM,
//! AVG, MIN or MAX. Each group yields exactly one row carrying its GROUP BY
//! values plus one column per aggregate, keyed by [`AggregateSpec::key`].
//!
//! Empty value sets: COUNT is 0, SUM and AVG are 0.0, MIN and MAX are Null.

use std::collections::{HashMap, HashSet};

use crate::planner::{Expr, SelectItem};
use crate::value::{compare, to_numeric, Row, Value};

use super::errors::{ExecutorError, ExecutorResult};

/// Aggregate function kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateKind {
    /// Recognizes an aggregate function name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "COUNT" => Some(AggregateKind::Count),
            "SUM" => Some(AggregateKind::Sum),
            "AVG" => Some(AggregateKind::Avg),
            "MIN" => Some(AggregateKind::Min),
            "MAX" => Some(AggregateKind::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Count => "COUNT",
            AggregateKind::Sum => "SUM",
            AggregateKind::Avg => "AVG",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
        }
    }
}

/// One aggregate call from the SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub kind: AggregateKind,
    /// Source column, `*` for `COUNT(*)`
    pub column: String,
    /// Name the value is shown under: the `AS` alias, else [`Self::key`]
    pub alias: String,
    pub distinct: bool,
    /// Column the aggregated row stores the value under, e.g. `SUM(size)`
    pub key: String,
}

impl AggregateSpec {
    pub fn new(kind: AggregateKind, column: impl Into<String>, distinct: bool) -> Self {
        let column = column.into();
        let key = if distinct {
            format!("{}(DISTINCT {})", kind.as_str(), column)
        } else {
            format!("{}({})", kind.as_str(), column)
        };
        Self {
            kind,
            alias: key.clone(),
            column,
            distinct,
            key,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Returns true for `COUNT(*)`
    pub fn counts_rows(&self) -> bool {
        self.kind == AggregateKind::Count && self.column == "*"
    }

    /// Computes this aggregate over one group
    pub fn compute(&self, rows: &[&Row]) -> ExecutorResult<Value> {
        if self.counts_rows() {
            return Ok(Value::Integer(rows.len() as i64));
        }

        let mut values: Vec<&Value> = rows
            .iter()
            .filter_map(|row| row.get(&self.column))
            .filter(|v| !v.is_null())
            .collect();

        if self.distinct {
            let mut seen = HashSet::new();
            values.retain(|v| seen.insert(v.to_string()));
        }

        match self.kind {
            AggregateKind::Count => Ok(Value::Integer(values.len() as i64)),
            AggregateKind::Sum => Ok(Value::Float(self.sum(&values)?)),
            AggregateKind::Avg => {
                let sum = self.sum(&values)?;
                if values.is_empty() {
                    Ok(Value::Float(0.0))
                } else {
                    Ok(Value::Float(sum / values.len() as f64))
                }
            }
            AggregateKind::Min => Ok(values
                .into_iter()
                .min_by(|a, b| compare(a, b))
                .cloned()
                .unwrap_or(Value::Null)),
            AggregateKind::Max => Ok(values
                .into_iter()
                .max_by(|a, b| compare(a, b))
                .cloned()
                .unwrap_or(Value::Null)),
        }
    }

    fn sum(&self, values: &[&Value]) -> ExecutorResult<f64> {
        values.iter().try_fold(0.0, |acc, v| {
            to_numeric(v)
                .map(|n| acc + n)
                .ok_or_else(|| ExecutorError::type_error(self.kind.as_str(), &self.column, v))
        })
    }
}

/// Extracts and evaluates aggregates
pub struct Aggregator;

impl Aggregator {
    /// Returns the aggregate calls in SELECT-list order.
    ///
    /// An empty result means the query is not an aggregate query. Function
    /// calls that are not aggregates, or aggregates over anything but a
    /// column (or `*` for COUNT), are rejected.
    pub fn extract(projection: &[SelectItem]) -> ExecutorResult<Vec<AggregateSpec>> {
        let mut specs = Vec::new();
        for item in projection {
            if let SelectItem::Expr {
                expr: Expr::Function(call),
                alias,
            } = item
            {
                let kind = AggregateKind::from_name(&call.name).ok_or_else(|| {
                    ExecutorError::unsupported_expression(format!("function {}()", call.name))
                })?;
                let column = match (kind, call.args.as_slice()) {
                    (AggregateKind::Count, []) | (AggregateKind::Count, [Expr::Wildcard]) => {
                        "*".to_string()
                    }
                    (_, [Expr::Column(name)]) => name.clone(),
                    _ => {
                        return Err(ExecutorError::unsupported_expression(format!(
                            "{} arguments",
                            kind.as_str()
                        )))
                    }
                };
                let mut spec = AggregateSpec::new(kind, column, call.distinct);
                if let Some(alias) = alias {
                    spec = spec.with_alias(alias.clone());
                }
                specs.push(spec);
            }
        }
        Ok(specs)
    }

    /// Groups `rows` and computes every aggregate per group.
    ///
    /// Without GROUP BY all rows form one group. An empty input always
    /// yields exactly one row of empty-set values and no GROUP BY columns.
    /// Groups come out in first-seen order.
    pub fn aggregate(
        rows: &[Row],
        group_by: &[String],
        specs: &[AggregateSpec],
    ) -> ExecutorResult<Vec<Row>> {
        if rows.is_empty() {
            return Ok(vec![Self::aggregate_row(&[], &[], specs)?]);
        }

        if let Some(missing) = group_by
            .iter()
            .find(|column| !rows.iter().any(|row| row.contains(column)))
        {
            return Err(ExecutorError::missing_group_column(missing.clone()));
        }

        // None is the Null key, so NULL and the text "NULL" stay apart
        let mut index: HashMap<Vec<Option<String>>, usize> = HashMap::new();
        let mut buckets: Vec<Vec<&Row>> = Vec::new();
        for row in rows {
            let key: Vec<Option<String>> = group_by
                .iter()
                .map(|column| {
                    row.get(column)
                        .filter(|v| !v.is_null())
                        .map(|v| v.to_string())
                })
                .collect();
            let slot = *index.entry(key).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(row);
        }

        buckets
            .iter()
            .map(|bucket| Self::aggregate_row(bucket, group_by, specs))
            .collect()
    }

    fn aggregate_row(
        bucket: &[&Row],
        group_by: &[String],
        specs: &[AggregateSpec],
    ) -> ExecutorResult<Row> {
        let mut out = Row::with_capacity(group_by.len() + specs.len());
        if let Some(first) = bucket.first() {
            for column in group_by {
                out.insert(column.clone(), first.get(column).cloned().unwrap_or(Value::Null));
            }
        }
        for spec in specs {
            out.insert(spec.key.clone(), spec.compute(bucket)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gv(g: &str, v: i64) -> Row {
        Row::new().with("g", g).with("v", v)
    }

    fn spec(kind: AggregateKind, column: &str) -> AggregateSpec {
        AggregateSpec::new(kind, column, false)
    }

    #[test]
    fn test_default_keys() {
        assert_eq!(spec(AggregateKind::Sum, "x").key, "SUM(x)");
        assert_eq!(spec(AggregateKind::Count, "*").key, "COUNT(*)");
        assert_eq!(
            AggregateSpec::new(AggregateKind::Count, "name", true).key,
            "COUNT(DISTINCT name)"
        );
        let aliased = spec(AggregateKind::Max, "rss").with_alias("peak");
        assert_eq!(aliased.alias, "peak");
        assert_eq!(aliased.key, "MAX(rss)");
    }

    #[test]
    fn test_extract() {
        let items = vec![
            SelectItem::column("name"),
            SelectItem::expr(Expr::call("count", vec![])),
            SelectItem::aliased(Expr::call("SUM", vec![Expr::column("size")]), "total"),
            SelectItem::expr(Expr::call_distinct("Count", vec![Expr::column("uid")])),
            SelectItem::expr(Expr::call("COUNT", vec![Expr::Wildcard])),
        ];
        let specs = Aggregator::extract(&items).unwrap();
        assert_eq!(specs.len(), 4);
        assert_eq!(specs[0].key, "COUNT(*)");
        assert_eq!(specs[1].alias, "total");
        assert_eq!(specs[1].column, "size");
        assert!(specs[2].distinct);
        assert!(specs[3].counts_rows());
    }

    #[test]
    fn test_extract_none_for_plain_select() {
        let items = vec![SelectItem::Wildcard, SelectItem::column("pid")];
        assert!(Aggregator::extract(&items).unwrap().is_empty());
    }

    #[test]
    fn test_extract_rejects_unknown_function() {
        let items = vec![SelectItem::expr(Expr::call("lower", vec![Expr::column("a")]))];
        assert!(Aggregator::extract(&items).is_err());
    }

    #[test]
    fn test_extract_rejects_bad_arguments() {
        let items = vec![SelectItem::expr(Expr::call("SUM", vec![Expr::Wildcard]))];
        assert!(Aggregator::extract(&items).is_err());
        let items = vec![SelectItem::expr(Expr::call("MAX", vec![Expr::lit(1)]))];
        assert!(Aggregator::extract(&items).is_err());
        let items = vec![SelectItem::expr(Expr::call("MIN", vec![]))];
        assert!(Aggregator::extract(&items).is_err());
    }

    #[test]
    fn test_group_by_bucketing() {
        let rows = vec![gv("a", 1), gv("a", 3), gv("b", 10)];
        let out = Aggregator::aggregate(
            &rows,
            &["g".to_string()],
            &[spec(AggregateKind::Sum, "v")],
        )
        .unwrap();

        assert_eq!(out.len(), 2);
        let find = |g: &str| {
            out.iter()
                .find(|r| r.get("g") == Some(&Value::from(g)))
                .and_then(|r| r.get("SUM(v)").cloned())
        };
        assert_eq!(find("a"), Some(Value::Float(4.0)));
        assert_eq!(find("b"), Some(Value::Float(10.0)));
    }

    #[test]
    fn test_implicit_single_group() {
        let rows = vec![gv("a", 1), gv("b", 2), gv("c", 6)];
        let specs = vec![
            spec(AggregateKind::Count, "*"),
            spec(AggregateKind::Avg, "v"),
            spec(AggregateKind::Min, "g"),
            spec(AggregateKind::Max, "v"),
        ];
        let out = Aggregator::aggregate(&rows, &[], &specs).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("COUNT(*)"), Some(&Value::Integer(3)));
        assert_eq!(out[0].get("AVG(v)"), Some(&Value::Float(3.0)));
        assert_eq!(out[0].get("MIN(g)"), Some(&Value::from("a")));
        assert_eq!(out[0].get("MAX(v)"), Some(&Value::Integer(6)));
        assert!(out[0].get("g").is_none());
    }

    #[test]
    fn test_empty_input_conventions() {
        let specs = vec![
            spec(AggregateKind::Count, "*"),
            spec(AggregateKind::Count, "v"),
            spec(AggregateKind::Sum, "v"),
            spec(AggregateKind::Avg, "v"),
            spec(AggregateKind::Min, "v"),
            spec(AggregateKind::Max, "v"),
        ];
        let out = Aggregator::aggregate(&[], &["g".to_string()], &specs).unwrap();
        assert_eq!(out.len(), 1);
        let row = &out[0];
        assert_eq!(row.get("COUNT(*)"), Some(&Value::Integer(0)));
        assert_eq!(row.get("COUNT(v)"), Some(&Value::Integer(0)));
        assert_eq!(row.get("SUM(v)"), Some(&Value::Float(0.0)));
        assert_eq!(row.get("AVG(v)"), Some(&Value::Float(0.0)));
        assert_eq!(row.get("MIN(v)"), Some(&Value::Null));
        assert_eq!(row.get("MAX(v)"), Some(&Value::Null));
        assert!(!row.contains("g"));
    }

    #[test]
    fn test_count_column_skips_nulls() {
        let rows = vec![
            Row::new().with("v", 1),
            Row::new().with("v", Value::Null),
            Row::new().with("other", 2),
        ];
        let out =
            Aggregator::aggregate(&rows, &[], &[spec(AggregateKind::Count, "v")]).unwrap();
        assert_eq!(out[0].get("COUNT(v)"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_distinct() {
        let rows = vec![gv("a", 1), gv("a", 1), gv("b", 2)];
        let specs = vec![
            AggregateSpec::new(AggregateKind::Count, "g", true),
            AggregateSpec::new(AggregateKind::Sum, "v", true),
        ];
        let out = Aggregator::aggregate(&rows, &[], &specs).unwrap();
        assert_eq!(out[0].get("COUNT(DISTINCT g)"), Some(&Value::Integer(2)));
        assert_eq!(out[0].get("SUM(DISTINCT v)"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn test_sum_numeric_text_and_type_error() {
        let rows = vec![Row::new().with("size", "10"), Row::new().with("size", 5)];
        let out =
            Aggregator::aggregate(&rows, &[], &[spec(AggregateKind::Sum, "size")]).unwrap();
        assert_eq!(out[0].get("SUM(size)"), Some(&Value::Float(15.0)));

        let rows = vec![Row::new().with("size", "big")];
        let err = Aggregator::aggregate(&rows, &[], &[spec(AggregateKind::Avg, "size")])
            .unwrap_err();
        assert_eq!(err.code(), super::super::ExecutorErrorCode::TypeError);
        assert!(err.message().contains("big"));
    }

    #[test]
    fn test_missing_group_column() {
        let rows = vec![gv("a", 1)];
        let err = Aggregator::aggregate(
            &rows,
            &["nope".to_string()],
            &[spec(AggregateKind::Count, "*")],
        )
        .unwrap_err();
        assert_eq!(
            err.code(),
            super::super::ExecutorErrorCode::MissingGroupColumn
        );
    }

    #[test]
    fn test_group_column_partially_present() {
        // Present in some rows is fine; the rest group under Null
        let rows = vec![gv("a", 1), Row::new().with("v", 2)];
        let out = Aggregator::aggregate(
            &rows,
            &["g".to_string()],
            &[spec(AggregateKind::Sum, "v")],
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].get("g"), Some(&Value::Null));
    }

    #[test]
    fn test_group_key_no_separator_collision() {
        let rows = vec![
            Row::new().with("a", "x:y").with("b", "z"),
            Row::new().with("a", "x").with("b", "y:z"),
        ];
        let out = Aggregator::aggregate(
            &rows,
            &["a".to_string(), "b".to_string()],
            &[spec(AggregateKind::Count, "*")],
        )
        .unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_null_and_null_text_are_separate_groups() {
        let rows = vec![
            Row::new().with("g", Value::Null).with("v", 1),
            Row::new().with("g", "NULL").with("v", 2),
        ];
        let out = Aggregator::aggregate(
            &rows,
            &["g".to_string()],
            &[spec(AggregateKind::Count, "*")],
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("g"), Some(&Value::Null));
        assert_eq!(out[1].get("g"), Some(&Value::from("NULL")));
        assert_eq!(out[1].get("COUNT(*)"), Some(&Value::Integer(1)));
    }
}
