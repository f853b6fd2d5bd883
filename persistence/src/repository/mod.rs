//! Repository definitions and the engine behind them.
//!
//! A repository is a unit struct implementing [Repository]. It owns no data:
//! its [RepositoryConfig] (client, collection, document kind, object class)
//! is created once per definition and shared by every call, whether made on
//! the type-level value or on [Repository::instance].
//!
//! # Reading
//!
//! - [Repository::exists] answers `false` for missing documents
//! - [Repository::find] with one id fails with `DocumentNotFound` on a miss
//! - [Repository::find] with many ids issues one multi-get and returns a slot
//!   per id, in request order, with `None` for misses
//!
//! # Mapping
//!
//! Objects are serialized through [Convertible](crate::common::Convertible).
//! On the way back, an [ObjectClass] turns source mappings into objects;
//! without one, lookups return the source mappings.

mod config;
mod lookup;
mod object_class;
#[allow(clippy::module_inception)]
mod repository;
mod serialization;
mod store;

pub use config::*;
pub use lookup::{Found, LookupRequest};
pub use object_class::*;
pub use repository::*;
pub use serialization::{deserialize, serialize};
