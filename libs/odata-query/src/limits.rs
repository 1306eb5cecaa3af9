//! Opt-in safety caps for outgoing queries
//!
//! Serialization never validates anything; a caller that wants to stay within a
//! service's published limits runs [`ODataLimits::validate`] before sending:
//! - Maximum `$top` value
//! - Maximum number of `$orderby` and `$select` fields
//! - Maximum rendered `$filter` length
//! - Maximum `$expand` nesting depth

use serde::Deserialize;

use crate::query::{ODataQuery, QueryBuilder, QueryOptions};
use crate::serialize::render_filters;
use crate::Error;

/// Default configuration for `OData` query limits
///
/// Deserializable from an application config section; missing keys take the defaults.
///
/// ```rust
/// use odata_query::ODataLimits;
///
/// let limits: ODataLimits = serde_json::from_str(r#"{ "max_top": 50 }"#).unwrap();
/// assert_eq!(limits.max_top, 50);
/// assert_eq!(limits.max_expand_depth, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ODataLimits {
    /// Maximum value for $top (default: 1000)
    pub max_top: u64,
    /// Maximum number of fields in $orderby (default: 5)
    pub max_orderby_fields: usize,
    /// Maximum number of fields in $select (default: 100)
    pub max_select_fields: usize,
    /// Maximum length of the rendered $filter in characters (default: 2000)
    pub max_filter_length: usize,
    /// Maximum $expand nesting depth; a top-level expand is depth 1 (default: 5)
    pub max_expand_depth: usize,
}

impl Default for ODataLimits {
    fn default() -> Self {
        Self {
            max_top: 1000,
            max_orderby_fields: 5,
            max_select_fields: 100,
            max_filter_length: 2000,
            max_expand_depth: 5,
        }
    }
}

impl ODataLimits {
    /// Create limits with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum $top value
    #[must_use]
    pub fn with_max_top(mut self, max_top: u64) -> Self {
        self.max_top = max_top;
        self
    }

    /// Set maximum number of $orderby fields
    #[must_use]
    pub fn with_max_orderby_fields(mut self, max: usize) -> Self {
        self.max_orderby_fields = max;
        self
    }

    /// Set maximum number of $select fields
    #[must_use]
    pub fn with_max_select_fields(mut self, max: usize) -> Self {
        self.max_select_fields = max;
        self
    }

    /// Set maximum $filter length
    #[must_use]
    pub fn with_max_filter_length(mut self, max: usize) -> Self {
        self.max_filter_length = max;
        self
    }

    /// Set maximum $expand depth
    #[must_use]
    pub fn with_max_expand_depth(mut self, max: usize) -> Self {
        self.max_expand_depth = max;
        self
    }

    /// Validate a $top value against limits
    ///
    /// # Errors
    /// Returns `Error::InvalidLimit` if `top` exceeds `max_top`.
    pub fn validate_top(&self, top: u64) -> Result<(), Error> {
        if top > self.max_top {
            return Err(Error::InvalidLimit {
                top,
                max: self.max_top,
            });
        }
        Ok(())
    }

    /// Validate a rendered $filter expression length
    ///
    /// # Errors
    /// Returns `Error::FilterTooLong` if the filter exceeds `max_filter_length`.
    pub fn validate_filter(&self, filter: &str) -> Result<(), Error> {
        let len = filter.chars().count();
        if len > self.max_filter_length {
            return Err(Error::FilterTooLong {
                len,
                max: self.max_filter_length,
            });
        }
        Ok(())
    }

    /// Validate number of $orderby fields
    ///
    /// # Errors
    /// Returns `Error::TooManyOrderByFields` if `count` exceeds `max_orderby_fields`.
    pub fn validate_orderby_count(&self, count: usize) -> Result<(), Error> {
        if count > self.max_orderby_fields {
            return Err(Error::TooManyOrderByFields {
                count,
                max: self.max_orderby_fields,
            });
        }
        Ok(())
    }

    /// Validate number of $select fields
    ///
    /// # Errors
    /// Returns `Error::TooManySelectFields` if `count` exceeds `max_select_fields`.
    pub fn validate_select_count(&self, count: usize) -> Result<(), Error> {
        if count > self.max_select_fields {
            return Err(Error::TooManySelectFields {
                count,
                max: self.max_select_fields,
            });
        }
        Ok(())
    }

    /// Check a whole query, including every nested `$expand`.
    ///
    /// # Errors
    /// Returns the first limit violation found, top level before nested relations.
    pub fn validate(&self, query: &ODataQuery) -> Result<(), Error> {
        self.validate_options(query.options(), 0).inspect_err(|err| {
            tracing::debug!(error = %err, "odata.query.limit_exceeded");
        })
    }

    fn validate_options(&self, options: &QueryOptions, depth: usize) -> Result<(), Error> {
        if let Some(top) = options.take {
            self.validate_top(top)?;
        }
        self.validate_orderby_count(options.orderby.len())?;
        self.validate_select_count(options.select.len())?;
        if let Some(filter) = render_filters(&options.filters) {
            self.validate_filter(&filter)?;
        }

        if options.expands.is_empty() {
            return Ok(());
        }
        let depth = depth + 1;
        if depth > self.max_expand_depth {
            return Err(Error::ExpandTooDeep {
                depth,
                max: self.max_expand_depth,
            });
        }
        for relation in &options.expands {
            self.validate_options(relation.options(), depth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ODataLimits::default();
        assert_eq!(limits.max_top, 1000);
        assert_eq!(limits.max_orderby_fields, 5);
        assert_eq!(limits.max_select_fields, 100);
        assert_eq!(limits.max_filter_length, 2000);
        assert_eq!(limits.max_expand_depth, 5);
    }

    #[test]
    fn test_validate_top() {
        let limits = ODataLimits::default();
        assert!(limits.validate_top(1000).is_ok());
        assert_eq!(
            limits.validate_top(1001),
            Err(Error::InvalidLimit {
                top: 1001,
                max: 1000
            })
        );
    }

    #[test]
    fn test_validate_filter_too_long() {
        let limits = ODataLimits::default();
        assert!(limits.validate_filter("name eq 'John'").is_ok());
        assert!(limits.validate_filter(&"x".repeat(2001)).is_err());
    }

    #[test]
    fn test_validate_orderby_count() {
        let limits = ODataLimits::default();
        assert!(limits.validate_orderby_count(5).is_ok());
        assert!(limits.validate_orderby_count(6).is_err());
    }

    #[test]
    fn test_custom_limits() {
        let limits = ODataLimits::new()
            .with_max_top(100)
            .with_max_orderby_fields(3)
            .with_max_select_fields(2)
            .with_max_filter_length(500)
            .with_max_expand_depth(1);

        assert_eq!(limits.max_top, 100);
        assert_eq!(limits.max_orderby_fields, 3);
        assert_eq!(limits.max_select_fields, 2);
        assert_eq!(limits.max_filter_length, 500);
        assert_eq!(limits.max_expand_depth, 1);
    }

    #[test]
    fn test_validate_query_walks_expands() {
        let limits = ODataLimits::new().with_max_top(10);
        let ok = ODataQuery::new().take(10).expand_with("posts", |p| p.take(5));
        assert!(limits.validate(&ok).is_ok());

        let nested_too_big = ODataQuery::new().expand_with("posts", |p| p.take(50));
        assert_eq!(
            limits.validate(&nested_too_big),
            Err(Error::InvalidLimit { top: 50, max: 10 })
        );
    }

    #[test]
    fn test_validate_expand_depth() {
        let limits = ODataLimits::new().with_max_expand_depth(2);
        let two = ODataQuery::new().expand_with("a", |a| a.expand("b"));
        assert!(limits.validate(&two).is_ok());

        let three = ODataQuery::new().expand_with("a", |a| a.expand_with("b", |b| b.expand("c")));
        assert_eq!(
            limits.validate(&three),
            Err(Error::ExpandTooDeep { depth: 3, max: 2 })
        );
    }

    #[test]
    fn test_validate_joined_filter_length() {
        let limits = ODataLimits::new().with_max_filter_length(10);
        let q = ODataQuery::new().filter("a eq 1").filter("b eq 2");
        assert_eq!(
            limits.validate(&q),
            Err(Error::FilterTooLong { len: 17, max: 10 })
        );
    }

    #[test]
    fn test_limits_from_config() {
        let limits: ODataLimits =
            serde_json::from_str(r#"{ "max_orderby_fields": 2, "max_expand_depth": 1 }"#)
                .unwrap();
        assert_eq!(limits.max_orderby_fields, 2);
        assert_eq!(limits.max_expand_depth, 1);
        assert_eq!(limits.max_top, 1000);
    }
}
