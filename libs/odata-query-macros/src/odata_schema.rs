use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::TokenStream;
use proc_macro_error2::abort;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr};

struct SchemaField<'a> {
    ident: &'a Ident,
    variant: Ident,
    wire_name: String,
    ty: &'a syn::Type,
}

pub fn expand_derive_odata_schema(input: &DeriveInput) -> TokenStream {
    let struct_name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        abort!(input.generics, "ODataSchema does not support generic structs");
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => abort!(input, "ODataSchema only supports structs with named fields"),
        },
        _ => abort!(input, "ODataSchema can only be derived for structs"),
    };

    let fields: Vec<SchemaField<'_>> = named
        .iter()
        .map(|field| {
            let Some(ident) = field.ident.as_ref() else {
                abort!(field, "ODataSchema requires named fields");
            };
            let bare = ident.to_string();
            let bare = bare.trim_start_matches("r#");
            SchemaField {
                ident,
                variant: Ident::new(&bare.to_upper_camel_case(), ident.span()),
                wire_name: wire_name(&field.attrs).unwrap_or_else(|| bare.to_owned()),
                ty: &field.ty,
            }
        })
        .collect();

    let field_enum = Ident::new(&format!("{struct_name}Field"), struct_name.span());
    let schema = Ident::new(&format!("{struct_name}Schema"), struct_name.span());
    let module = Ident::new(&struct_name.to_string().to_snake_case(), struct_name.span());

    let variants = fields.iter().map(|f| &f.variant);
    let name_arms = fields.iter().map(|f| {
        let variant = &f.variant;
        let wire_name = &f.wire_name;
        quote! { #field_enum::#variant => #wire_name }
    });
    let constructors = fields.iter().map(|f| {
        let ident = f.ident;
        let variant = &f.variant;
        let ty = f.ty;
        quote! {
            #[must_use]
            pub fn #ident() -> ::odata_query::schema::FieldRef<super::#schema, #ty> {
                ::odata_query::schema::FieldRef::new(super::#field_enum::#variant)
            }
        }
    });

    quote! {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #vis enum #field_enum {
            #(#variants,)*
        }

        #vis struct #schema;

        impl ::odata_query::schema::Schema for #schema {
            type Field = #field_enum;

            fn field_name(field: Self::Field) -> &'static str {
                match field {
                    #(#name_arms,)*
                }
            }
        }

        impl ::odata_query::schema::ODataEntity for #struct_name {
            type Schema = #schema;
        }

        #vis mod #module {
            #[allow(unused_imports, clippy::wildcard_imports)]
            use super::*;

            #(#constructors)*
        }
    }
}

/// Value of `#[odata(name = "...")]`, if present. Unknown keys are a compile error.
fn wire_name(attrs: &[Attribute]) -> Option<String> {
    let mut name = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("odata")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("odata name must not be empty"));
                }
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported odata attribute, expected `name = \"...\"`"))
            }
        });
        if let Err(err) = parsed {
            abort!(err.span(), err.to_string());
        }
    }
    name
}
