use proc_macro::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, DeriveInput, Field, Fields, Ident, LitStr, Result, Type};

fn ignored_fields(ast: &DeriveInput) -> Result<Vec<String>> {
    let mut ignored_fields: Vec<String> = vec![];
    for attr in &ast.attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let value = meta.value()?;
                    let s: LitStr = value.parse()?;
                    ignored_fields.extend(
                        s.value()
                            .split(',')
                            .map(|field| field.trim().to_string())
                            .filter(|field| !field.is_empty()),
                    );
                    Ok(())
                } else {
                    Err(meta.error("unknown converter attribute, expected `ignored`"))
                }
            })?;
        }
    }
    Ok(ignored_fields)
}

pub(crate) fn generate_convertible_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let ignored_fields = ignored_fields(ast)?;

    let fields: Vec<&Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "only structs with named fields are supported",
            ))
        }
    };

    for ignored in &ignored_fields {
        if !fields
            .iter()
            .any(|f| f.ident.as_ref().is_some_and(|ident| ident == ignored))
        {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                format!("ignored field `{}` does not exist", ignored),
            ));
        }
    }

    let stored: Vec<&Ident> = fields
        .iter()
        .filter_map(|f| f.ident.as_ref())
        .filter(|ident| !ignored_fields.contains(&ident.to_string()))
        .collect();
    let stored_names: Vec<String> = stored.iter().map(|ident| ident.to_string()).collect();

    let initializers: Vec<proc_macro2::TokenStream> = fields
        .iter()
        .filter_map(|f| f.ident.as_ref().map(|ident| (ident, &f.ty)))
        .map(|(ident, ty): (&Ident, &Type)| {
            let name = ident.to_string();
            if ignored_fields.contains(&name) {
                quote! { #ident: ::std::default::Default::default() }
            } else {
                quote! {
                    #ident: persistence::common::from_value::<#ty>(
                        doc.get(#name).unwrap_or(&persistence::common::Value::Null)
                    )?
                }
            }
        })
        .collect();

    let name = &ast.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let gen = quote! {
        impl #impl_generics persistence::common::Convertible for #name #ty_generics #where_clause {
            fn to_value(&self) -> persistence::errors::PersistenceResult<persistence::common::Value> {
                let mut doc = persistence::collection::Document::new();
                #(doc.put(#stored_names, persistence::common::Convertible::to_value(&self.#stored)?)?;)*
                Ok(persistence::common::Value::Document(doc))
            }

            fn from_value(value: &persistence::common::Value) -> persistence::errors::PersistenceResult<Self> {
                match value {
                    persistence::common::Value::Document(doc) => Ok(#name {
                        #(#initializers,)*
                    }),
                    other => Err(persistence::errors::PersistenceError::new(
                        &format!("{} expects a document, got a {}", #name_str, other.type_name()),
                        persistence::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Unit-only enums are stored as the variant name.
pub(crate) fn generate_convertible_for_enum(
    ast: &DeriveInput,
    data: &DataEnum,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "only unit variants are supported",
            ));
        }
        variants.push(&variant.ident);
    }
    let variant_names: Vec<String> = variants.iter().map(|ident| ident.to_string()).collect();

    let gen = quote! {
        impl #impl_generics persistence::common::Convertible for #name #ty_generics #where_clause {
            fn to_value(&self) -> persistence::errors::PersistenceResult<persistence::common::Value> {
                match self {
                    #(#name::#variants => Ok(persistence::common::Value::from(#variant_names)),)*
                }
            }

            fn from_value(value: &persistence::common::Value) -> persistence::errors::PersistenceResult<Self> {
                match value.as_str() {
                    #(Some(#variant_names) => Ok(#name::#variants),)*
                    _ => Err(persistence::errors::PersistenceError::new(
                        &format!("{} is not a variant of {}", value, #name_str),
                        persistence::errors::ErrorKind::ObjectMappingError,
                    )),
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}
