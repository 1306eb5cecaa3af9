//! Immutable query descriptors.
//!
//! [`ODataQuery`] is the top-level descriptor; [`RelationQuery`] is the same shape scoped to
//! one navigation property and is what `$expand` entries are made of. Both hold a
//! [`QueryOptions`] and get their builder methods from the [`QueryBuilder`] trait.
//!
//! Every builder method consumes the descriptor and returns its successor, so a value that
//! has been handed out is never modified afterwards. Clone first to branch a chain.
//!
//! # Example
//!
//! ```rust
//! use odata_query::prelude::*;
//!
//! let base = ODataQuery::new().select(["id"]);
//! let newest = base.clone().order_by_dir("created", SortDir::Desc);
//!
//! assert_eq!(base.to_string(), "?$select=id");
//! assert_eq!(newest.to_string(), "?$select=id&$orderby=created desc");
//! ```

use std::fmt;

use crate::aggregate::Aggregate;
use crate::filter::FilterExpr;
use crate::schema::{AsFieldPath, FieldPath, FieldRef, Schema};
use crate::serialize;
use crate::SortDir;

/// Accumulated query intent shared by top-level and relation descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub(crate) select: Vec<String>,
    pub(crate) filters: Vec<String>,
    pub(crate) orderby: Vec<String>,
    pub(crate) expands: Vec<RelationQuery>,
    pub(crate) groupby: Vec<String>,
    pub(crate) aggregator: Option<String>,
    pub(crate) skip: Option<u64>,
    pub(crate) take: Option<u64>,
    pub(crate) count: Option<bool>,
}

impl QueryOptions {
    /// Selected field paths, in insertion order.
    #[must_use]
    pub fn select(&self) -> &[String] {
        &self.select
    }

    /// Raw filter fragments, one per `filter` call.
    #[must_use]
    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    /// Rendered sort keys (`field` or `field asc|desc`).
    #[must_use]
    pub fn orderby(&self) -> &[String] {
        &self.orderby
    }

    #[must_use]
    pub fn expands(&self) -> &[RelationQuery] {
        &self.expands
    }

    #[must_use]
    pub fn groupby(&self) -> &[String] {
        &self.groupby
    }

    /// Aggregate clause body, without the surrounding `aggregate(...)`.
    #[must_use]
    pub fn aggregator(&self) -> Option<&str> {
        self.aggregator.as_deref()
    }

    #[must_use]
    pub fn skip(&self) -> Option<u64> {
        self.skip
    }

    #[must_use]
    pub fn take(&self) -> Option<u64> {
        self.take
    }

    #[must_use]
    pub fn count(&self) -> Option<bool> {
        self.count
    }

    /// Whether a relation carrying these options renders a parenthesized block.
    ///
    /// Grouping is not part of this check: relation blocks never render `$apply`.
    #[must_use]
    pub fn has_relation_operators(&self) -> bool {
        !self.filters.is_empty()
            || !self.orderby.is_empty()
            || !self.select.is_empty()
            || !self.expands.is_empty()
            || self.skip.is_some()
            || self.take.is_some()
            || self.count == Some(true)
    }
}

/// One `$orderby` entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub field: String,
    pub dir: Option<SortDir>,
}

impl OrderKey {
    #[must_use]
    pub fn new(field: impl Into<String>, dir: Option<SortDir>) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dir {
            Some(dir) => write!(f, "{} {dir}", self.field),
            None => f.write_str(&self.field),
        }
    }
}

impl From<&str> for OrderKey {
    fn from(field: &str) -> Self {
        Self::new(field, None)
    }
}

impl From<String> for OrderKey {
    fn from(field: String) -> Self {
        Self::new(field, None)
    }
}

impl<S: Schema, T> From<FieldRef<S, T>> for OrderKey {
    fn from(field: FieldRef<S, T>) -> Self {
        Self::new(field.name(), None)
    }
}

impl<T> From<FieldPath<T>> for OrderKey {
    fn from(path: FieldPath<T>) -> Self {
        Self::new(path.into_string(), None)
    }
}

/// Arguments of [`QueryBuilder::paginate`].
///
/// `page` counts pages to skip: page `5` of size `25` starts at item `125`. A missing or
/// zero page leaves `$skip` unset. `count` defaults to `true`.
///
/// ```rust
/// use odata_query::Pagination;
///
/// let scalar: Pagination = 25.into();
/// let with_page: Pagination = (25, 5).into();
/// let no_count = Pagination::new(25).page(5).count(false);
///
/// assert_eq!(scalar.page, None);
/// assert_eq!(with_page.page, Some(5));
/// assert_eq!(no_count.count, Some(false));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Pagination {
    pub pagesize: u64,
    pub page: Option<u64>,
    pub count: Option<bool>,
}

impl Pagination {
    pub fn new(pagesize: u64) -> Self {
        Self {
            pagesize,
            page: None,
            count: None,
        }
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }
}

impl From<u64> for Pagination {
    fn from(pagesize: u64) -> Self {
        Self::new(pagesize)
    }
}

/// `(pagesize, page)`
impl From<(u64, u64)> for Pagination {
    fn from((pagesize, page): (u64, u64)) -> Self {
        Self::new(pagesize).page(page)
    }
}

/// Builder operations shared by [`ODataQuery`] and [`RelationQuery`].
///
/// Implementors only expose their [`QueryOptions`]; every operation is provided.
pub trait QueryBuilder: Sized {
    fn options(&self) -> &QueryOptions;

    fn options_mut(&mut self) -> &mut QueryOptions;

    /// Append field paths to `$select`.
    #[must_use]
    fn select<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsFieldPath,
    {
        self.options_mut()
            .select
            .extend(fields.into_iter().map(|f| f.as_field_path().to_owned()));
        self
    }

    /// Append a filter fragment. Fragments from separate calls are joined with `and`.
    #[must_use]
    fn filter(mut self, expr: impl Into<FilterExpr>) -> Self {
        self.options_mut().filters.push(expr.into().into_string());
        self
    }

    /// Append a sort key: a field, a path, a raw string, or `field.desc()`.
    #[must_use]
    fn order_by(mut self, key: impl Into<OrderKey>) -> Self {
        self.options_mut().orderby.push(key.into().to_string());
        self
    }

    /// Append `field asc|desc`.
    #[must_use]
    fn order_by_dir(self, field: impl AsFieldPath, dir: SortDir) -> Self {
        let key = OrderKey::new(field.as_field_path(), Some(dir));
        self.order_by(key)
    }

    /// Expand a navigation property without options: `$expand=name`.
    #[must_use]
    fn expand(self, name: impl AsFieldPath) -> Self {
        self.expand_with(name, |rel| rel)
    }

    /// Expand a navigation property configured by `configure`.
    ///
    /// ```rust
    /// use odata_query::prelude::*;
    ///
    /// let query = ODataQuery::new().expand_with("posts", |p| p.order_by("id desc"));
    /// assert_eq!(query.to_string(), "?$expand=posts($orderby=id desc)");
    /// ```
    #[must_use]
    fn expand_with<F>(mut self, name: impl AsFieldPath, configure: F) -> Self
    where
        F: FnOnce(RelationQuery) -> RelationQuery,
    {
        let relation = configure(RelationQuery::new(name.as_field_path()));
        self.options_mut().expands.push(relation);
        self
    }

    /// Overwrite `$skip`. Unlike [`paginate`](Self::paginate), `skip(0)` is kept and
    /// rendered as `$skip=0`.
    #[must_use]
    fn skip(mut self, n: u64) -> Self {
        self.options_mut().skip = Some(n);
        self
    }

    /// Overwrite `$top`.
    #[must_use]
    fn take(mut self, n: u64) -> Self {
        self.options_mut().take = Some(n);
        self
    }

    /// Request `$count=true`.
    #[must_use]
    fn count(self) -> Self {
        self.with_count(true)
    }

    /// Set the count flag explicitly; `false` is stored but never rendered.
    #[must_use]
    fn with_count(mut self, count: bool) -> Self {
        self.options_mut().count = Some(count);
        self
    }

    /// Page through results.
    ///
    /// Sets `$top` to the page size, `$skip` to `page * pagesize` when a non-zero page is
    /// given (left as is otherwise), and the count flag to `true` unless disabled.
    #[must_use]
    fn paginate(mut self, pagination: impl Into<Pagination>) -> Self {
        let Pagination {
            pagesize,
            page,
            count,
        } = pagination.into();
        let options = self.options_mut();
        options.take = Some(pagesize);
        if let Some(page) = page.filter(|p| *p != 0) {
            options.skip = Some(page.saturating_mul(pagesize));
        }
        options.count = Some(count.unwrap_or(true));
        self
    }
}

/// Top-level query descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct ODataQuery {
    options: QueryOptions,
}

impl ODataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group by the given fields: `$apply=groupby((a, b))`.
    ///
    /// Replaces any earlier grouping, including its aggregate.
    pub fn group_by<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsFieldPath,
    {
        self.options.groupby = fields
            .into_iter()
            .map(|f| f.as_field_path().to_owned())
            .collect();
        self.options.aggregator = None;
        self
    }

    /// Group and aggregate: `$apply=groupby((a), aggregate(price with sum as total))`.
    ///
    /// An aggregate with no entries leaves the aggregator unset.
    pub fn group_by_with<I, F>(self, fields: I, configure: F) -> Self
    where
        I: IntoIterator,
        I::Item: AsFieldPath,
        F: FnOnce(Aggregate) -> Aggregate,
    {
        let mut query = self.group_by(fields);
        let aggregate = configure(Aggregate::new());
        if !aggregate.is_empty() {
            query.options.aggregator = Some(aggregate.render());
        }
        query
    }

    /// Ordered `(key, value)` parameters. See [`serialize::query_params`].
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        serialize::query_params(self)
    }

    /// `?k=v&...`, or an empty string when nothing is set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        serialize::to_query_string(self)
    }
}

impl QueryBuilder for ODataQuery {
    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }
}

impl fmt::Display for ODataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Descriptor for one `$expand` entry.
///
/// The key may be empty; an anonymous relation renders just its operator block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct RelationQuery {
    key: String,
    strict: Option<bool>,
    options: QueryOptions,
}

impl RelationQuery {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Mark the navigation as strict: renders `key!`.
    pub fn strict(mut self) -> Self {
        self.strict = Some(true);
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict == Some(true)
    }
}

impl QueryBuilder for RelationQuery {
    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut QueryOptions {
        &mut self.options
    }
}

impl fmt::Display for RelationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize::render_relation(self))
    }
}
