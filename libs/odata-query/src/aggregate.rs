//! `aggregate(...)` clause builder for `$apply`.

use std::fmt;

use crate::schema::AsFieldPath;

/// Aggregation method. `Custom` names are passed through verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AggregateFn {
    Sum,
    Min,
    Max,
    Average,
    CountDistinct,
    Custom(String),
}

impl AggregateFn {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
            AggregateFn::Average => "average",
            AggregateFn::CountDistinct => "countdistinct",
            AggregateFn::Custom(name) => name,
        }
    }
}

impl fmt::Display for AggregateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<prop> with <fn> as <alias>` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateEntry {
    pub property: String,
    pub function: AggregateFn,
    pub alias: String,
}

impl fmt::Display for AggregateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} as {}", self.property, self.function, self.alias)
    }
}

/// Collects aggregate entries for `groupby(..., aggregate(...))`.
///
/// ```rust
/// use odata_query::Aggregate;
///
/// let agg = Aggregate::new().sum("price", "total").max("price", "highest");
/// assert_eq!(agg.render(), "price with sum as total, price with max as highest");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Aggregate {
    entries: Vec<AggregateEntry>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: impl AsFieldPath, function: AggregateFn, alias: &str) -> Self {
        self.entries.push(AggregateEntry {
            property: prop.as_field_path().to_owned(),
            function,
            alias: alias.to_owned(),
        });
        self
    }

    pub fn sum(self, prop: impl AsFieldPath, alias: &str) -> Self {
        self.with(prop, AggregateFn::Sum, alias)
    }

    pub fn min(self, prop: impl AsFieldPath, alias: &str) -> Self {
        self.with(prop, AggregateFn::Min, alias)
    }

    pub fn max(self, prop: impl AsFieldPath, alias: &str) -> Self {
        self.with(prop, AggregateFn::Max, alias)
    }

    pub fn average(self, prop: impl AsFieldPath, alias: &str) -> Self {
        self.with(prop, AggregateFn::Average, alias)
    }

    pub fn count_distinct(self, prop: impl AsFieldPath, alias: &str) -> Self {
        self.with(prop, AggregateFn::CountDistinct, alias)
    }

    /// Aggregate with a service-defined method, e.g. `custom("amount", "Sales.Median", "m")`.
    pub fn custom(self, prop: impl AsFieldPath, function: &str, alias: &str) -> Self {
        self.with(prop, AggregateFn::Custom(function.to_owned()), alias)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    /// Clause body: entries joined with `", "`.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn each_method_renders_its_keyword() {
        let agg = Aggregate::new()
            .sum("a", "s")
            .min("a", "lo")
            .max("a", "hi")
            .average("a", "avg")
            .count_distinct("b", "n");
        let rendered: Vec<String> = agg.entries().iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "a with sum as s",
                "a with min as lo",
                "a with max as hi",
                "a with average as avg",
                "b with countdistinct as n",
            ]
        );
    }

    #[test]
    fn custom_function_is_passed_through() {
        let agg = Aggregate::new().custom("amount", "Custom.Median", "median");
        assert_eq!(agg.render(), "amount with Custom.Median as median");
        assert_eq!(
            agg.entries()[0].function,
            AggregateFn::Custom("Custom.Median".to_owned())
        );
    }

    #[test]
    fn empty_renders_nothing() {
        let agg = Aggregate::new();
        assert!(agg.is_empty());
        assert_eq!(agg.render(), "");
    }
}
