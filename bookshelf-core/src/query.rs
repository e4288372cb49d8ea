//! Backend-neutral filters and result windows.
//!
//! A [`Query`] pairs an optional [`Expr`] tree with a limit/offset window over the
//! store's natural order. Backends execute it by implementing [`QueryVisitor`].
//!
//! ```ignore
//! use bookshelf_core::query::{Filter, Query};
//!
//! let featured = Query::builder()
//!     .filter(Filter::gt("rating", 4.5))
//!     .offset(20)
//!     .limit(10)
//!     .build();
//! ```
//!
//! Results come back in the store's natural order; there is no sorting.

use bson::Bson;

use crate::error::StoreError;

/// Comparison applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Eq,
    /// Also matches records where the field is absent.
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// String field contains the value, ignoring case. The value is matched literally,
    /// never as a pattern.
    Contains,
}

/// Filter expression tree.
///
/// ```ignore
/// let search = Filter::or([
///     Filter::contains("title", "dune"),
///     Filter::contains("author", "dune"),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Every child matches.
    And(Vec<Expr>),
    /// At least one child matches.
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Field {
        field: String,
        op: FieldOp,
        value: Bson,
    },
}

impl Expr {
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Wraps this expression in [`Expr::Not`].
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }
}

/// Filter plus window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// `None` matches every record.
    pub filter: Option<Expr>,
    pub limit: Option<usize>,
    /// Matching records skipped before `limit` applies.
    pub offset: Option<usize>,
}

impl Query {
    /// A query matching everything, unwindowed.
    pub fn new() -> Self {
        Query::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Shorthand constructors for [`Expr`].
pub struct Filter;

impl Filter {
    fn compare(field: impl Into<String>, op: FieldOp, value: impl Into<Bson>) -> Expr {
        Expr::field(field.into(), op, value.into())
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Self::compare(field, FieldOp::Lte, value)
    }

    /// Case-insensitive literal substring match on a string field.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Expr {
        Self::compare(field, FieldOp::Contains, Bson::String(needle.into()))
    }

    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

/// Fluent [`Query`] construction.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Caps the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Skips this many matching records.
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks an [`Expr`] tree and produces a backend-specific result.
///
/// The in-memory backend evaluates to `bool` against a document; the MongoDB backend
/// translates to a filter document.
///
/// # Errors
///
/// Implementations fail on expressions they cannot express, such as
/// [`FieldOp::Contains`] with a non-string value.
pub trait QueryVisitor {
    type Output;
    type Error: Into<StoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error>;
    fn visit_field(&mut self, field: &str, op: FieldOp, value: &Bson) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Not(inner) => self.visit_not(inner),
            Expr::Field { field, op, value } => self.visit_field(field, *op, value),
        }
    }
}
