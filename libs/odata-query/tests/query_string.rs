//! End-to-end query-string rendering through the public API.

use odata_query::prelude::*;
use odata_query::{ODataLimits, query_params, render_relation};

#[test]
fn select_only() {
    let q = ODataQuery::new().select(["Id"]);
    assert_eq!(q.to_string(), "?$select=Id");
}

#[test]
fn select_with_count() {
    let q = ODataQuery::new().select(["Id", "Name"]).count();
    assert_eq!(q.to_string(), "?$select=Id,Name&$count=true");
}

#[test]
fn anonymous_relation_blocks() {
    let rel = RelationQuery::default().select(["Id"]);
    assert_eq!(render_relation(&rel), "($select=Id)");

    let rel = RelationQuery::default()
        .select(["Id", "Name"])
        .order_by("Id");
    assert_eq!(render_relation(&rel), "($orderby=Id;$select=Id,Name)");
}

#[test]
fn expand_precedes_select_at_top_level() {
    let q = ODataQuery::new()
        .select(["Id"])
        .expand_with("rel", |r| r.select(["Id"]).order_by("Name"));
    assert_eq!(
        q.to_string(),
        "?$expand=rel($orderby=Name;$select=Id)&$select=Id"
    );
}

#[test]
fn expand_bare_and_configured() {
    let q = ODataQuery::new().expand("address");
    assert_eq!(q.to_string(), "?$expand=address");

    let q = ODataQuery::new().expand_with("posts", |p| p.order_by_dir("id", SortDir::Desc));
    assert_eq!(q.to_string(), "?$expand=posts($orderby=id desc)");
}

#[test]
fn several_expands_are_comma_joined() {
    let q = ODataQuery::new()
        .expand("address")
        .expand_with("owner", RelationQuery::strict)
        .expand_with("posts", |p| p.take(3));
    assert_eq!(q.to_string(), "?$expand=address,owner!,posts($top=3)");
}

#[test]
fn call_order_across_categories_is_irrelevant() {
    let a = ODataQuery::new()
        .select(["id"])
        .filter("id gt 5")
        .take(10)
        .order_by("id");
    let b = ODataQuery::new()
        .order_by("id")
        .take(10)
        .filter("id gt 5")
        .select(["id"]);
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.to_string(), "?$filter=id gt 5&$select=id&$orderby=id&$top=10");
}

#[test]
fn filter_wrapping_rules() {
    let single = ODataQuery::new().filter("a or b");
    assert_eq!(single.to_string(), "?$filter=a or b");

    let multi = ODataQuery::new().filter("a or b").filter("c");
    assert_eq!(multi.to_string(), "?$filter=(a or b) and c");

    let composed = ODataQuery::new().filter(FilterExpr::new("a").or("b and c"));
    assert_eq!(composed.to_string(), "?$filter=a or (b and c)");
}

#[test]
fn pagination_cases() {
    assert_eq!(
        ODataQuery::new().paginate((25, 5)).to_string(),
        "?$skip=125&$top=25&$count=true"
    );
    assert_eq!(
        ODataQuery::new()
            .paginate(Pagination::new(25).page(5))
            .to_string(),
        "?$skip=125&$top=25&$count=true"
    );
    assert_eq!(
        ODataQuery::new().paginate(10).to_string(),
        "?$top=10&$count=true"
    );
    assert_eq!(ODataQuery::new().skip(0).to_string(), "?$skip=0");
}

#[test]
fn grouped_query_with_filter_and_paging() {
    let q = ODataQuery::new()
        .filter("year ge 2020")
        .group_by_with(["region", "year"], |a| a.sum("amount", "total"))
        .order_by_dir("total", SortDir::Desc)
        .take(5);
    assert_eq!(
        q.to_string(),
        "?$filter=year ge 2020&$apply=groupby((region, year), aggregate(amount with sum as total))&$orderby=total desc&$top=5"
    );
}

#[test]
fn params_match_query_string() {
    let q = ODataQuery::new().select(["id"]).paginate((10, 1));
    let params = query_params(&q);
    assert_eq!(
        params,
        vec![
            ("$select", "id".to_owned()),
            ("$skip", "10".to_owned()),
            ("$top", "10".to_owned()),
            ("$count", "true".to_owned()),
        ]
    );
}

#[test]
fn deeply_nested_relations() {
    let q = ODataQuery::new().expand_with("orders", |o| {
        o.filter("total gt 100")
            .expand_with("lines", |l| l.select(["sku", "qty"]).expand("product"))
            .count()
    });
    assert_eq!(
        q.to_string(),
        "?$expand=orders($count=true;$filter=total gt 100;$expand=lines($select=sku,qty;$expand=product))"
    );
    assert!(ODataLimits::default().validate(&q).is_ok());
    assert!(
        ODataLimits::new()
            .with_max_expand_depth(2)
            .validate(&q)
            .is_err()
    );
}
