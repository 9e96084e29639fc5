mod utility;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utility::mutator_name;

/// Generates `impl sqlmapper::SqlMapping` with one mutator per named field.
///
/// The mutator for `reg_date` is named `setRegDate`, so it receives the
/// `reg_date` (or `regDate`) result column. Field attributes:
///
/// - `#[sql(column = "registered_on")]` binds the field to another column
/// - `#[sql(skip)]` never assigns the field, it keeps its `Default` value
#[proc_macro_derive(SqlMapping, attributes(sql))]
pub fn derive_sql_mapping(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldMapping<'a> {
    field: &'a Field,
    column: Option<String>,
    skip: bool,
}

fn parse_field(field: &Field) -> syn::Result<FieldMapping<'_>> {
    let mut mapping = FieldMapping {
        field,
        column: None,
        skip: false,
    };

    for attr in field.attrs.iter().filter(|a| a.path().is_ident("sql")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let column: LitStr = meta.value()?.parse()?;
                mapping.column = Some(column.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                mapping.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `column = \"...\"` or `skip`"))
            }
        })?;
    }

    Ok(mapping)
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "SqlMapping cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields_named) => &fields_named.named,
            _ => {
                return Err(syn::Error::new(
                    struct_name.span(),
                    "SqlMapping only works on structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "SqlMapping only works on structs",
            ));
        }
    };

    let mut mutators = Vec::with_capacity(fields.len());
    for field in fields {
        let mapping = parse_field(field)?;
        if mapping.skip {
            continue;
        }

        let Some(field_name) = mapping.field.ident.as_ref() else {
            continue;
        };
        // raw identifiers map by their plain name
        let plain_name = field_name.to_string().trim_start_matches("r#").to_string();
        let setter = mutator_name(mapping.column.as_deref().unwrap_or(&plain_name));

        mutators.push(quote! {
            ::sqlmapper::Mutator::new(
                #setter,
                |target: &mut #struct_name, value: ::sqlmapper::Value| {
                    target.#field_name = ::sqlmapper::FromSql::from_value(value)?;
                    ::std::result::Result::Ok(())
                },
            )
        });
    }

    Ok(quote! {
        impl ::sqlmapper::SqlMapping for #struct_name {
            fn mutators() -> ::std::vec::Vec<::sqlmapper::Mutator<Self>> {
                ::std::vec![#(#mutators),*]
            }
        }
    })
}
