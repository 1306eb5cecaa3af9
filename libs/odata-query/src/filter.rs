//! Boolean composition of raw `$filter` fragments.
//!
//! Fragments are opaque strings: nothing here parses the filter grammar. Whether an
//! operand needs parentheses is decided by a textual check for the connectives
//! `" and "` / `" or "`, so a literal such as `'cats and dogs'` inside an otherwise atomic
//! predicate is also treated as compound and gets wrapped.

use std::borrow::Cow;
use std::fmt;

const AND: &str = " and ";
const OR: &str = " or ";

/// Returns `true` if the fragment contains `" and "` or `" or "` anywhere.
#[must_use]
pub fn is_compound(fragment: &str) -> bool {
    fragment.contains(OR) || fragment.contains(AND)
}

/// Wraps the fragment in parentheses when [`is_compound`] says so.
#[must_use]
pub fn wrap_if_compound(fragment: &str) -> Cow<'_, str> {
    if is_compound(fragment) {
        Cow::Owned(format!("({fragment})"))
    } else {
        Cow::Borrowed(fragment)
    }
}

/// An immutable `$filter` fragment.
///
/// # Example
///
/// ```rust
/// use odata_query::FilterExpr;
///
/// let expr = FilterExpr::new("a eq 1").and(FilterExpr::new("b eq 2").or("c eq 3"));
/// assert_eq!(expr.as_str(), "a eq 1 and (b eq 2 or c eq 3)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct FilterExpr(String);

impl FilterExpr {
    /// Wrap a raw fragment. No validation is performed.
    pub fn new(fragment: impl Into<String>) -> Self {
        Self(fragment.into())
    }

    /// `self and rhs`. Only `rhs` is parenthesized, and only when compound.
    pub fn and(self, rhs: impl Into<FilterExpr>) -> Self {
        self.combine(AND, &rhs.into())
    }

    /// `self or rhs`. Only `rhs` is parenthesized, and only when compound.
    pub fn or(self, rhs: impl Into<FilterExpr>) -> Self {
        self.combine(OR, &rhs.into())
    }

    /// `not (self)`, always parenthesized.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        !self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// See [`is_compound`].
    #[must_use]
    pub fn is_compound(&self) -> bool {
        is_compound(&self.0)
    }

    fn combine(mut self, connective: &str, rhs: &FilterExpr) -> Self {
        self.0.push_str(connective);
        self.0.push_str(&wrap_if_compound(&rhs.0));
        self
    }
}

impl std::ops::Not for FilterExpr {
    type Output = FilterExpr;

    fn not(self) -> Self::Output {
        FilterExpr(format!("not ({})", self.0))
    }
}

impl From<&str> for FilterExpr {
    fn from(fragment: &str) -> Self {
        Self(fragment.to_owned())
    }
}

impl From<String> for FilterExpr {
    fn from(fragment: String) -> Self {
        Self(fragment)
    }
}

impl From<FilterExpr> for String {
    fn from(expr: FilterExpr) -> Self {
        expr.0
    }
}

impl AsRef<str> for FilterExpr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn compound_detection_is_textual() {
        assert!(is_compound("a eq 1 or b eq 2"));
        assert!(is_compound("a eq 1 and b eq 2"));
        assert!(!is_compound("a eq 1"));
        assert!(!is_compound("startswith(name, 'or')"));
        // Literal text that happens to contain a connective is still "compound".
        assert!(is_compound("name eq 'salt and pepper'"));
    }

    #[test]
    fn wrap_if_compound_borrows_atomic_fragments() {
        assert!(matches!(wrap_if_compound("id gt 5"), Cow::Borrowed("id gt 5")));
        assert_eq!(wrap_if_compound("a or b"), "(a or b)");
    }

    #[test]
    fn and_wraps_only_right_operand() {
        let left = FilterExpr::new("a or b");
        let expr = left.and("c or d");
        assert_eq!(expr.as_str(), "a or b and (c or d)");
    }

    #[test]
    fn or_keeps_atomic_right_operand() {
        let expr = FilterExpr::new("a").or("b");
        assert_eq!(expr.as_str(), "a or b");
    }

    #[test]
    fn chained_combinators_wrap_accumulated_right_side() {
        let rhs = FilterExpr::new("b").and("c");
        let expr = FilterExpr::new("a").or(rhs);
        assert_eq!(expr.as_str(), "a or (b and c)");
    }

    #[test]
    fn not_is_always_parenthesized() {
        assert_eq!(FilterExpr::new("a").not().as_str(), "not (a)");
        assert_eq!((!FilterExpr::new("a or b")).as_str(), "not (a or b)");
    }

    #[test]
    fn combinators_leave_operands_untouched() {
        let a = FilterExpr::new("x eq 1");
        let b = FilterExpr::new("y eq 2");
        let combined = a.clone().and(b.clone());
        assert_eq!(a.as_str(), "x eq 1");
        assert_eq!(b.as_str(), "y eq 2");
        assert_eq!(combined.to_string(), "x eq 1 and y eq 2");
    }

    #[test]
    fn literal_connective_is_mis_wrapped() {
        let expr = FilterExpr::new("id gt 5").and("name eq 'rock or roll'");
        assert_eq!(expr.as_str(), "id gt 5 and (name eq 'rock or roll')");
    }
}
