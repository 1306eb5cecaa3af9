#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! # `odata-query` - immutable `OData` query descriptors
//!
//! Builds `OData` v4 system query options (`$filter`, `$apply`, `$expand`, `$select`,
//! `$orderby`, `$skip`, `$top`, `$count`) as a chain of immutable values and renders the
//! final value into a canonical query-string fragment.
//!
//! - **Descriptors** (`query` module) - [`ODataQuery`] and [`RelationQuery`] accumulate intent;
//!   every builder call consumes the value and returns its successor
//! - **Filter composition** (`filter` module) - opaque filter fragments combined with
//!   `and`/`or`/`not`
//! - **Serialization** (`serialize` module) - fixed parameter order, nested `$expand` blocks
//! - **Typed fields** (`schema` module) - compile-time field paths and filter predicates
//!
//! ## Example
//!
//! ```rust
//! use odata_query::prelude::*;
//!
//! let query = ODataQuery::new()
//!     .select(["id", "title"])
//!     .filter("id gt 5")
//!     .expand_with("author", |a| a.select(["name"]))
//!     .paginate((25, 2));
//!
//! assert_eq!(
//!     query.to_string(),
//!     "?$filter=id gt 5&$expand=author($select=name)&$select=id,title&$skip=50&$top=25&$count=true"
//! );
//! ```
pub mod aggregate;
pub mod filter;
pub mod limits;
pub mod query;
pub mod schema;
pub mod serialize;
pub mod value;

pub use aggregate::{Aggregate, AggregateEntry, AggregateFn};
pub use filter::{FilterExpr, is_compound, wrap_if_compound};
pub use limits::ODataLimits;
pub use query::{ODataQuery, OrderKey, Pagination, QueryBuilder, QueryOptions, RelationQuery};
pub use schema::{AsFieldPath, FieldPath, FieldRef, IntoODataValue, ODataEntity, Schema};
pub use serialize::{query_params, render_relation, to_query_string};
pub use value::Value;

#[cfg(feature = "derive")]
pub use odata_query_macros::ODataSchema;

/// Glob-importable set of the types and the builder trait needed to write queries.
pub mod prelude {
    pub use crate::aggregate::{Aggregate, AggregateFn};
    pub use crate::filter::FilterExpr;
    pub use crate::query::{ODataQuery, OrderKey, Pagination, QueryBuilder, RelationQuery};
    pub use crate::schema::{AsFieldPath, FieldPath, FieldRef, ODataEntity, Schema};
    pub use crate::SortDir;
}

// Ordering primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc)
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// Keyword used in `$orderby`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for `OData` query checks
///
/// Building and serializing a query never fails; these errors come only from
/// [`ODataLimits::validate`], which callers opt into before sending a query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("$top {top} exceeds the maximum of {max}")]
    InvalidLimit { top: u64, max: u64 },

    #[error("$orderby has {count} fields, the maximum is {max}")]
    TooManyOrderByFields { count: usize, max: usize },

    #[error("$select has {count} fields, the maximum is {max}")]
    TooManySelectFields { count: usize, max: usize },

    #[error("$filter is {len} characters long, the maximum is {max}")]
    FilterTooLong { len: usize, max: usize },

    #[error("$expand nesting depth {depth} exceeds the maximum of {max}")]
    ExpandTooDeep { depth: usize, max: usize },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sort_dir_reverse_and_keyword() {
        assert_eq!(SortDir::Asc.reverse(), SortDir::Desc);
        assert_eq!(SortDir::Desc.reverse(), SortDir::Asc);
        assert_eq!(SortDir::Desc.to_string(), "desc");
    }

    #[test]
    fn sort_dir_serde_names() {
        let dir: SortDir = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(dir, SortDir::Desc);
        assert_eq!(serde_json::to_string(&SortDir::Asc).unwrap(), "\"asc\"");
    }

    #[test]
    fn error_messages_name_the_option() {
        let err = Error::InvalidLimit { top: 5000, max: 1000 };
        assert_eq!(err.to_string(), "$top 5000 exceeds the maximum of 1000");

        let err = Error::ExpandTooDeep { depth: 6, max: 5 };
        assert!(err.to_string().starts_with("$expand"));
    }
}
