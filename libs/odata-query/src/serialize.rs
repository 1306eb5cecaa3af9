//! Descriptor to query-string serialization.
//!
//! Two grammars with fixed, different option orders:
//!
//! | top level (`?k=v&k=v`) | relation (`key(k=v;k=v)`) |
//! |---|---|
//! | `$filter` `$apply` `$expand` `$select` `$orderby` `$skip` `$top` `$count` | `$skip` `$top` `$count` `$orderby` `$select` `$filter` `$expand` |
//!
//! The order never depends on the order of builder calls. No percent-encoding is applied.

use crate::filter::wrap_if_compound;
use crate::query::{ODataQuery, QueryBuilder, QueryOptions, RelationQuery};

/// Joins `$filter` fragments.
///
/// A single fragment is emitted verbatim (never wrapped); several are each wrapped when
/// compound and joined with `" and "`. `None` when there are none.
#[must_use]
pub fn render_filters(filters: &[String]) -> Option<String> {
    match filters {
        [] => None,
        [only] => Some(only.clone()),
        many => Some(
            many.iter()
                .map(|f| wrap_if_compound(f))
                .collect::<Vec<_>>()
                .join(" and "),
        ),
    }
}

fn render_apply(options: &QueryOptions) -> Option<String> {
    if options.groupby.is_empty() {
        return None;
    }
    let mut apply = format!("groupby(({})", options.groupby.join(", "));
    if let Some(aggregator) = &options.aggregator {
        apply.push_str(", aggregate(");
        apply.push_str(aggregator);
        apply.push(')');
    }
    apply.push(')');
    Some(apply)
}

fn render_expands(expands: &[RelationQuery]) -> String {
    expands
        .iter()
        .map(render_relation)
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered top-level parameters: `$filter`, `$apply`, `$expand`, `$select`, `$orderby`,
/// `$skip`, `$top`, `$count`. Unset options are left out; `$count` only when `true`.
#[must_use]
pub fn query_params(query: &ODataQuery) -> Vec<(&'static str, String)> {
    let options = query.options();
    let mut params = Vec::new();

    if let Some(filter) = render_filters(&options.filters) {
        params.push(("$filter", filter));
    }
    if let Some(apply) = render_apply(options) {
        params.push(("$apply", apply));
    }
    if !options.expands.is_empty() {
        params.push(("$expand", render_expands(&options.expands)));
    }
    if !options.select.is_empty() {
        params.push(("$select", options.select.join(",")));
    }
    if !options.orderby.is_empty() {
        params.push(("$orderby", options.orderby.join(", ")));
    }
    if let Some(skip) = options.skip {
        params.push(("$skip", skip.to_string()));
    }
    if let Some(take) = options.take {
        params.push(("$top", take.to_string()));
    }
    if options.count == Some(true) {
        params.push(("$count", "true".to_owned()));
    }

    params
}

/// `?` followed by `&`-joined `key=value` pairs, or `""` when there are no parameters.
#[must_use]
pub fn to_query_string(query: &ODataQuery) -> String {
    let params = query_params(query);
    if params.is_empty() {
        return String::new();
    }

    let out = format!(
        "?{}",
        params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    );
    tracing::trace!(query = %out, params = params.len(), "odata.query.rendered");
    out
}

/// Renders one `$expand` entry: `key`, `key!`, or `key[!](op;op;...)`.
///
/// Operators inside the block come in the order `$skip`, `$top`, `$count`, `$orderby`,
/// `$select`, `$filter`, `$expand`; nested expands recurse.
#[must_use]
pub fn render_relation(relation: &RelationQuery) -> String {
    let mut out = relation.key().to_owned();
    if relation.is_strict() {
        out.push('!');
    }

    let options = relation.options();
    if !options.has_relation_operators() {
        return out;
    }

    let mut ops = Vec::new();
    if let Some(skip) = options.skip {
        ops.push(format!("$skip={skip}"));
    }
    if let Some(take) = options.take {
        ops.push(format!("$top={take}"));
    }
    if options.count == Some(true) {
        ops.push("$count=true".to_owned());
    }
    if !options.orderby.is_empty() {
        ops.push(format!("$orderby={}", options.orderby.join(",")));
    }
    if !options.select.is_empty() {
        ops.push(format!("$select={}", options.select.join(",")));
    }
    if let Some(filter) = render_filters(&options.filters) {
        ops.push(format!("$filter={filter}"));
    }
    if !options.expands.is_empty() {
        ops.push(format!("$expand={}", render_expands(&options.expands)));
    }

    out.push('(');
    out.push_str(&ops.join(";"));
    out.push(')');
    out
}
