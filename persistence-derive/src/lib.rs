#![recursion_limit = "128"]
//! # Persistence Derive Macros
//!
//! Procedural macros for the `persistence` crate.
//!
//! ## Macros
//!
//! ### `Repository`
//!
//! Turns a unit struct into a repository definition: one shared
//! configuration, a singleton instance and every repository operation.
//!
//! - **Supported for**: unit structs without generics
//! - **Attribute**: `#[repository(collection = "...", document_kind = "...", client = "path::to::fn", object_type = "Type")]`
//!
//! ```rust,ignore
//! use persistence_derive::Repository;
//!
//! #[derive(Repository)]
//! #[repository(collection = "notes", object_type = "Note")]
//! pub struct NoteRepository;
//! ```
//!
//! ### `Convertible`
//!
//! Derives `Convertible` so a type can be saved and materialized.
//!
//! - **Supported for**: structs with named fields, enums with unit variants only
//! - **Attribute**: `#[converter(ignored = "field_a, field_b")]`
//!
//! ```rust,ignore
//! use persistence_derive::Convertible;
//!
//! #[derive(Convertible, Default)]
//! #[converter(ignored = "cached")]
//! pub struct Note {
//!     pub id: String,
//!     pub title: String,
//!     pub tags: Vec<String>,
//!     pub cached: Option<String>,
//! }
//!
//! #[derive(Convertible)]
//! pub enum Status {
//!     Draft,
//!     Published,
//! }
//! ```

extern crate proc_macro;
mod convertible;
mod repository;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use crate::repository::generate_repository_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `persistence::common::Convertible`.
///
/// Structs are stored as a document with one field per struct field. Fields
/// listed in `#[converter(ignored = "...")]` are skipped on the way out and
/// set to `Default::default()` on the way back. A field absent from the
/// document is read as `Value::Null`, so `Option` fields may be missing.
///
/// Unit-only enums are stored as the variant name.
///
/// # Errors
///
/// Returns a compile error for tuple or unit structs, enums with data and
/// unions.
#[proc_macro_derive(Convertible, attributes(converter))]
pub fn derive_convertible(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "Cannot derive Convertible for unions",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => {
            let error = syn::Error::new(
                e.span(),
                format!("Failed to derive Convertible for '{}': {}", ast.ident, e),
            );
            error.to_compile_error().into()
        }
    }
}

/// Derives `persistence::repository::Repository` for a unit struct.
///
/// The generated implementation keeps the configuration in a static created
/// on first access and seeded from the `#[repository(...)]` attribute:
///
/// - `collection`: initial collection name
/// - `document_kind`: initial document kind
/// - `client`: path of a `fn() -> DocumentStoreClient`
/// - `object_type`: a `Convertible` type documents are materialized into
///
/// Seeded values are initial values only. Clearing the collection name still
/// reverts it to the lower-cased struct name.
///
/// # Errors
///
/// Returns a compile error for generic definitions, structs with fields,
/// enums and unions.
#[proc_macro_derive(Repository, attributes(repository))]
pub fn derive_repository(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_repository_for_struct(&ast, data),
        _ => Err(syn::Error::new_spanned(
            &ast.ident,
            "Repository can only be derived for unit structs",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => {
            let error = syn::Error::new(
                e.span(),
                format!("Failed to derive Repository for '{}': {}", ast.ident, e),
            );
            error.to_compile_error().into()
        }
    }
}
