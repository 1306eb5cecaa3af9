//! # odata-query-macros
//!
//! `#[derive(ODataSchema)]` for `odata-query`: turns a record struct into a field enum,
//! a `Schema` impl and a module of typed `FieldRef` constructors.
//!
//! The generated code refers to `::odata_query`, so the deriving crate must depend on it
//! (usually through the `derive` feature of `odata-query`).

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod odata_schema;

/// Derive typed `OData` field paths for a struct.
///
/// For `struct BlogPost` this generates:
/// - `BlogPostField`: one variant per field
/// - `BlogPostSchema`: implements `odata_query::Schema`
/// - `impl odata_query::ODataEntity for BlogPost`, so other schemas can reach into it
/// - `mod blog_post`: `fn <field>() -> FieldRef<BlogPostSchema, FieldType>` per field
///
/// Wire names default to the Rust field name; `#[odata(name = "...")]` overrides one.
///
/// # Example
///
/// ```ignore
/// use odata_query::ODataSchema;
///
/// #[derive(ODataSchema)]
/// pub struct User {
///     pub id: uuid::Uuid,
///     #[odata(name = "emailAddress")]
///     pub email: String,
/// }
///
/// assert_eq!(user::email().name(), "emailAddress");
/// ```
#[proc_macro_derive(ODataSchema, attributes(odata))]
#[proc_macro_error]
pub fn derive_odata_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    odata_schema::expand_derive_odata_schema(&input).into()
}
