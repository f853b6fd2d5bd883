//! # Persistence - Repository pattern for document stores
//!
//! `persistence` lets application code store and fetch arbitrary objects in a
//! document store without per-type boilerplate. A repository definition is a
//! unit struct; its configuration (which client, which collection, which
//! document kind, which object type to build) is shared process-wide and
//! reachable both through the type and through its singleton instance.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use persistence::doc;
//! use persistence::repository::Repository;
//! use persistence_derive::Repository;
//!
//! #[derive(Repository)]
//! #[repository(collection = "notes")]
//! pub struct NoteRepository;
//!
//! let first = NoteRepository.save(&doc! { title: "first" })?;
//! let second = NoteRepository.save(&doc! { title: "second" })?;
//!
//! // one document, or DocumentNotFound
//! let note = NoteRepository.find_one(&first.id)?;
//!
//! // many documents in one round-trip, misses are None
//! let notes = NoteRepository::instance().find_many([first.id.as_str(), "missing", second.id.as_str()])?;
//! assert!(notes[1].is_none());
//! ```
//!
//! ## Modules
//!
//! - [repository]: repository definitions, configuration, lookups and mapping
//! - [client]: the document store client seam and an in-memory store
//! - [collection]: the [Document](collection::Document) field mapping
//! - [common]: values, conversion and shared utilities
//! - [errors]: error type and kinds

pub mod client;
pub mod collection;
pub mod common;
pub mod errors;
pub mod repository;
