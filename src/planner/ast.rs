//! SELECT statement AST
//!
//! This is the shape the external SQL parser hands to the engine. It is
//! assumed syntactically valid; the engine only rejects shapes it cannot
//! execute.

use crate::value::Value;

/// A literal constant in the statement
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl Literal {
    /// Converts the literal into an engine value
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Integer(i) => Value::Integer(*i),
            Literal::Float(x) => Value::Float(*x),
            Literal::Text(s) => Value::Text(s.clone()),
            Literal::Boolean(b) => Value::Boolean(*b),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Integer(v.into())
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Text(v.to_string())
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    /// `!=` and `<>`
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
}

impl CompareOp {
    /// Returns the SQL spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
            CompareOp::Like => "LIKE",
            CompareOp::NotLike => "NOT LIKE",
        }
    }

    /// Operator to use when the operands are swapped (`5 < x` is `x > 5`).
    ///
    /// LIKE is not symmetric, so it has no mirror.
    pub fn mirrored(&self) -> Option<CompareOp> {
        match self {
            CompareOp::Eq => Some(CompareOp::Eq),
            CompareOp::NotEq => Some(CompareOp::NotEq),
            CompareOp::Lt => Some(CompareOp::Gt),
            CompareOp::LtEq => Some(CompareOp::GtEq),
            CompareOp::Gt => Some(CompareOp::Lt),
            CompareOp::GtEq => Some(CompareOp::LtEq),
            CompareOp::Like | CompareOp::NotLike => None,
        }
    }
}

/// Right-hand side of `IS [NOT]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsTest {
    Null,
    True,
    False,
}

/// A function call such as `COUNT(DISTINCT pid)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

/// Expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Literal),
    /// `*`, only meaningful as a `COUNT(*)` argument
    Wildcard,
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// Parenthesized expression
    Nested(Box<Expr>),
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    Is {
        expr: Box<Expr>,
        test: IsTest,
        negated: bool,
    },
    Function(FunctionCall),
    Subquery(Box<SelectStatement>),
    Exists(Box<SelectStatement>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn lit(value: impl Into<Literal>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn eq(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::Eq, right)
    }

    pub fn not_eq(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::NotEq, right)
    }

    pub fn lt(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::Lt, right)
    }

    pub fn lt_eq(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::LtEq, right)
    }

    pub fn gt(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::Gt, right)
    }

    pub fn gt_eq(self, right: Expr) -> Self {
        Self::compare(self, CompareOp::GtEq, right)
    }

    pub fn like(self, pattern: Expr) -> Self {
        Self::compare(self, CompareOp::Like, pattern)
    }

    pub fn not_like(self, pattern: Expr) -> Self {
        Self::compare(self, CompareOp::NotLike, pattern)
    }

    pub fn and(self, right: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(right))
    }

    pub fn or(self, right: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(right))
    }

    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn nested(self) -> Self {
        Expr::Nested(Box::new(self))
    }

    pub fn between(self, low: Expr, high: Expr) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        }
    }

    pub fn not_between(self, low: Expr, high: Expr) -> Self {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: true,
        }
    }

    pub fn in_list(self, list: Vec<Expr>) -> Self {
        Expr::InList {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    pub fn not_in_list(self, list: Vec<Expr>) -> Self {
        Expr::InList {
            expr: Box::new(self),
            list,
            negated: true,
        }
    }

    pub fn is(self, test: IsTest) -> Self {
        Expr::Is {
            expr: Box::new(self),
            test,
            negated: false,
        }
    }

    pub fn is_not(self, test: IsTest) -> Self {
        Expr::Is {
            expr: Box::new(self),
            test,
            negated: true,
        }
    }

    /// Function call with plain arguments
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(FunctionCall {
            name: name.into(),
            args,
            distinct: false,
        })
    }

    /// Function call with DISTINCT arguments
    pub fn call_distinct(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(FunctionCall {
            name: name.into(),
            args,
            distinct: true,
        })
    }

    /// Pushes every column name referenced by this expression.
    ///
    /// Subqueries are not descended into; they never reach the row generator.
    pub fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            Expr::Column(name) => out.push(name.clone()),
            Expr::Literal(_) | Expr::Wildcard | Expr::Subquery(_) | Expr::Exists(_) => {}
            Expr::Compare { left, right, .. } | Expr::And(left, right) | Expr::Or(left, right) => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::Not(inner) | Expr::Nested(inner) => inner.collect_columns(out),
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.collect_columns(out);
                low.collect_columns(out);
                high.collect_columns(out);
            }
            Expr::InList { expr, list, .. } => {
                expr.collect_columns(out);
                for item in list {
                    item.collect_columns(out);
                }
            }
            Expr::Is { expr, .. } => expr.collect_columns(out),
            Expr::Function(call) => {
                for arg in &call.args {
                    arg.collect_columns(out);
                }
            }
        }
    }
}

/// One entry in the SELECT list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `*`
    Wildcard,
    /// An expression with an optional `AS` alias
    Expr { expr: Expr, alias: Option<String> },
}

impl SelectItem {
    pub fn column(name: impl Into<String>) -> Self {
        SelectItem::Expr {
            expr: Expr::Column(name.into()),
            alias: None,
        }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        SelectItem::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }

    pub fn expr(expr: Expr) -> Self {
        SelectItem::Expr { expr, alias: None }
    }

    /// Returns the alias, if any
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectItem::Expr { alias, .. } => alias.as_deref(),
            SelectItem::Wildcard => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One ORDER BY key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByExpr {
    /// Column name or SELECT alias to sort by
    pub column: String,
    pub direction: SortDirection,
}

impl OrderByExpr {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A parsed single-table SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Table named in FROM
    pub from: String,
    pub projection: Vec<SelectItem>,
    pub selection: Option<Expr>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderByExpr>,
    /// Kept as a literal; non-integer values are rejected at execution
    pub limit: Option<Literal>,
    pub offset: Option<Literal>,
}

impl SelectStatement {
    /// `SELECT * FROM <table>`
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            projection: vec![SelectItem::Wildcard],
            selection: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replaces the SELECT list
    pub fn select(mut self, items: Vec<SelectItem>) -> Self {
        self.projection = items;
        self
    }

    /// Replaces the SELECT list with plain column references
    pub fn select_columns(self, columns: &[&str]) -> Self {
        self.select(columns.iter().map(|c| SelectItem::column(*c)).collect())
    }

    pub fn filter(mut self, expr: Expr) -> Self {
        self.selection = Some(expr);
        self
    }

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn order_by(mut self, key: OrderByExpr) -> Self {
        self.order_by.push(key);
        self
    }

    pub fn limit(mut self, limit: impl Into<Literal>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn offset(mut self, offset: impl Into<Literal>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Returns true if the SELECT list contains `*`
    pub fn has_wildcard(&self) -> bool {
        self.projection
            .iter()
            .any(|item| matches!(item, SelectItem::Wildcard))
    }
}
