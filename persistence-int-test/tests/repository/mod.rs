mod find_test;
mod serialization_test;
mod singleton_test;
mod store_test;

use persistence::client::{DocumentStoreClient, InMemoryClient};
use persistence_derive::Convertible;

#[derive(Debug, Clone, Copy, PartialEq, Default, Convertible)]
pub enum Status {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Default, Convertible)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub status: Status,
    pub rating: Option<i64>,
}

impl Note {
    pub fn new(id: &str, title: &str) -> Self {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            tags: vec![],
            status: Status::Draft,
            rating: None,
        }
    }
}

/// Client used by definitions seeded through `#[repository(client = ...)]`.
pub fn private_client() -> DocumentStoreClient {
    DocumentStoreClient::new(InMemoryClient::new())
}
