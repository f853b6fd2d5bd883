use proc_macro::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, LitStr, Path, Result, Type};

#[derive(Default)]
struct RepositoryAttributes {
    collection: Option<LitStr>,
    document_kind: Option<LitStr>,
    client: Option<Path>,
    object_type: Option<Type>,
}

fn parse_attributes(ast: &DeriveInput) -> Result<RepositoryAttributes> {
    let mut attributes = RepositoryAttributes::default();
    for attr in &ast.attrs {
        if attr.path().is_ident("repository") {
            attr.parse_nested_meta(|meta| {
                let value: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("collection") {
                    attributes.collection = Some(value);
                } else if meta.path.is_ident("document_kind") {
                    attributes.document_kind = Some(value);
                } else if meta.path.is_ident("client") {
                    attributes.client = Some(value.parse()?);
                } else if meta.path.is_ident("object_type") {
                    attributes.object_type = Some(value.parse()?);
                } else {
                    return Err(meta.error(
                        "unknown repository attribute, expected one of \
                         `collection`, `document_kind`, `client`, `object_type`",
                    ));
                }
                Ok(())
            })?;
        }
    }
    Ok(attributes)
}

pub(crate) fn generate_repository_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "repository definitions cannot be generic",
        ));
    }
    if !matches!(data.fields, Fields::Unit) {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "repository definitions must be unit structs",
        ));
    }

    let attributes = parse_attributes(ast)?;
    let name = &ast.ident;
    let name_str = name.to_string();

    let mut seeds = Vec::new();
    if let Some(collection) = &attributes.collection {
        seeds.push(quote! { config.use_collection_name(Some(#collection)); });
    }
    if let Some(kind) = &attributes.document_kind {
        seeds.push(quote! { config.use_document_kind(Some(#kind)); });
    }
    if let Some(client) = &attributes.client {
        seeds.push(quote! { config.use_client(Some(#client())); });
    }
    if let Some(object_type) = &attributes.object_type {
        seeds.push(quote! {
            config.use_object_class(Some(persistence::repository::ObjectClass::of::<#object_type>()));
        });
    }

    let gen = quote! {
        impl persistence::repository::Repository for #name {
            fn definition_name() -> &'static str {
                #name_str
            }

            fn config() -> &'static persistence::repository::RepositoryConfig {
                static CONFIG: ::std::sync::OnceLock<persistence::repository::RepositoryConfig> =
                    ::std::sync::OnceLock::new();
                CONFIG.get_or_init(|| {
                    let config = persistence::repository::RepositoryConfig::new(#name_str);
                    #(#seeds)*
                    config
                })
            }

            fn instance() -> &'static Self {
                static INSTANCE: #name = #name;
                &INSTANCE
            }
        }
    };

    Ok(TokenStream::from(gen))
}
