use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DataEnum, DeriveInput, Fields, FieldsNamed, Generics};

use crate::attrs::{container_attrs, field_attrs, ContainerAttrs};
use crate::crate_path::swag_core_path;

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate(&input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let krate = swag_core_path();
    let container = container_attrs(&input.attrs)?;

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) if container.transparent => transparent_body(&krate, named)?,
            Fields::Named(named) => struct_body(&krate, input, &container, Some(named))?,
            Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                let ty = &unnamed.unnamed[0].ty;
                quote! { <#ty as #krate::Reflect>::type_info() }
            }
            Fields::Unnamed(_) => quote! {
                #krate::TypeInfo::Sequence(::std::boxed::Box::new(#krate::TypeInfo::Any))
            },
            Fields::Unit => struct_body(&krate, input, &container, None)?,
        },
        Data::Enum(data) => enum_body(&krate, input, &container, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Reflect)] does not support unions",
            ))
        }
    };

    let name = &input.ident;
    let generics = with_reflect_bounds(&input.generics, &krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #krate::Reflect for #name #ty_generics #where_clause {
            fn type_info() -> #krate::TypeInfo {
                #body
            }
        }
    })
}

/// Every type parameter must itself be reflectable.
fn with_reflect_bounds(generics: &Generics, krate: &TokenStream2) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<syn::Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(parse_quote!(#param: #krate::Reflect));
    }
    generics
}

fn struct_body(
    krate: &TokenStream2,
    input: &DeriveInput,
    container: &ContainerAttrs,
    fields: Option<&FieldsNamed>,
) -> syn::Result<TokenStream2> {
    let mut field_exprs = Vec::new();
    for field in fields.into_iter().flat_map(|f| f.named.iter()) {
        let attrs = field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let ident_str = ident.to_string();

        if attrs.flatten {
            field_exprs.push(quote! {
                #krate::Field::flattened(#ident_str, <#ty as #krate::Reflect>::type_info())
            });
            continue;
        }

        let serial = match (&attrs.rename, container.rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply_to_field(ident_str.trim_start_matches("r#")),
            (None, None) => ident_str.trim_start_matches("r#").to_string(),
        };

        let mut meta = quote! { #krate::FieldMeta::new().rename(#serial) };
        if attrs.stringify {
            meta.extend(quote! { .stringify() });
        }
        if attrs.required {
            meta.extend(quote! { .required() });
        }
        if let Some(example) = &attrs.example {
            meta.extend(quote! { .example(#example) });
        }
        if let Some(description) = &attrs.description {
            meta.extend(quote! { .description(#description) });
        }
        if let Some(desc) = &attrs.desc {
            meta.extend(quote! { .desc(#desc) });
        }
        if let Some(doc) = &attrs.doc {
            meta.extend(quote! { .doc(#doc) });
        }
        if !attrs.enum_values.is_empty() {
            let values = &attrs.enum_values;
            meta.extend(quote! { .enum_values([#(#values),*]) });
        }

        field_exprs.push(quote! {
            #krate::Field::new(#ident_str, <#ty as #krate::Reflect>::type_info()).with_meta(#meta)
        });
    }

    let def_name = definition_name(krate, input, container);
    let description = container
        .doc
        .as_ref()
        .map(|doc| quote! { .with_description(#doc) });

    Ok(quote! {
        let fields: fn() -> ::std::vec::Vec<#krate::Field> = || ::std::vec![#(#field_exprs),*];
        #krate::TypeInfo::Struct(
            #krate::StructType::new(::core::module_path!(), #def_name, fields)#description
        )
    })
}

/// Struct or enum name as written in definitions. Each instantiation of a
/// generic type gets its own name built from its type arguments.
fn definition_name(krate: &TokenStream2, input: &DeriveInput, container: &ContainerAttrs) -> TokenStream2 {
    let base = container
        .rename
        .clone()
        .unwrap_or_else(|| input.ident.to_string());
    let params: Vec<&syn::Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    if params.is_empty() {
        return quote! { #base };
    }
    quote! {
        #krate::generic_name(#base, &[#(<#params as #krate::Reflect>::type_info()),*])
    }
}

fn transparent_body(krate: &TokenStream2, fields: &FieldsNamed) -> syn::Result<TokenStream2> {
    let mut kept = Vec::new();
    for field in &fields.named {
        if !field_attrs(&field.attrs)?.skip {
            kept.push(&field.ty);
        }
    }
    match kept.as_slice() {
        [ty] => Ok(quote! { <#ty as #krate::Reflect>::type_info() }),
        _ => Err(syn::Error::new_spanned(
            fields,
            "#[serde(transparent)] requires exactly one serialized field",
        )),
    }
}

fn enum_body(
    krate: &TokenStream2,
    input: &DeriveInput,
    container: &ContainerAttrs,
    data: &DataEnum,
) -> syn::Result<TokenStream2> {
    let mut names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                format!(
                    "#[derive(Reflect)] on enum `{}` only supports unit variants",
                    input.ident
                ),
            ));
        }
        let attrs = field_attrs(&variant.attrs)?;
        if attrs.skip {
            continue;
        }
        let ident = variant.ident.to_string();
        names.push(match (attrs.rename, container.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply_to_variant(&ident),
            (None, None) => ident,
        });
    }

    let def_name = definition_name(krate, input, container);
    let count = names.len();
    Ok(quote! {
        let values: [&str; #count] = [#(#names),*];
        #krate::TypeInfo::enumeration(::core::module_path!(), #def_name, values)
    })
}
