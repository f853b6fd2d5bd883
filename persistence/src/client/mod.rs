//! The document store client seam.
//!
//! The repository talks to a store only through [DocumentStoreClientProvider].
//! [InMemoryClient] is a complete in-process implementation, and
//! [default_client] supplies the client used when a repository has none.

mod envelope;
mod factory;
mod memory;
mod options;
mod store_client;

pub use envelope::*;
pub use factory::*;
pub use memory::*;
pub use options::*;
pub use store_client::*;
