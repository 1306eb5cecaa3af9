//! Builds a typed query against derived schemas and prints the query string.
//!
//! Run with: cargo run -p cf-odata-query --example typed_query --features derive

use odata_query::prelude::*;
use odata_query::{ODataLimits, ODataSchema};

#[derive(ODataSchema)]
#[allow(dead_code)]
struct Order {
    id: uuid::Uuid,
    status: String,
    total: i64,
    customer: Customer,
    lines: Vec<OrderLine>,
}

#[derive(ODataSchema)]
#[allow(dead_code)]
struct Customer {
    name: String,
    #[odata(name = "countryCode")]
    country_code: String,
}

#[derive(ODataSchema)]
#[allow(dead_code)]
struct OrderLine {
    sku: String,
    quantity: i32,
}

fn main() {
    let paid_or_shipped = order::status()
        .eq("paid")
        .or(order::status().eq("shipped"));

    let query = ODataQuery::new()
        .select([order::id()])
        .select([order::status()])
        .filter(order::total().gt(100))
        .filter(paid_or_shipped)
        .filter(order::customer().at(customer::country_code()).in_list(["DE", "FR"]))
        .expand_with(order::customer(), |c| c.select([customer::name()]))
        .expand_with(order::lines(), |l| {
            l.select([order_line::sku()])
                .order_by(order_line::quantity().desc())
                .take(5)
        })
        .order_by(order::total().desc())
        .paginate((20, 2));

    match ODataLimits::default().validate(&query) {
        Ok(()) => println!("{query}"),
        Err(err) => eprintln!("query rejected: {err}"),
    }
}
