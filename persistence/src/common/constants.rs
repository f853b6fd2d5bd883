// envelope constants
pub const DOC_ID: &str = "_id";
pub const DOC_COLLECTION: &str = "_index";
pub const DOC_KIND: &str = "_type";
pub const DOC_VERSION: &str = "_version";
pub const DOC_SOURCE: &str = "_source";
pub const ENVELOPE_FIELDS: [&str; 5] = [DOC_ID, DOC_COLLECTION, DOC_KIND, DOC_VERSION, DOC_SOURCE];

// source fields that may carry the document id
pub const ID_FIELD: &str = "id";
pub const ID_FIELDS: [&str; 2] = [ID_FIELD, DOC_ID];

// repository defaults
pub const DEFAULT_DOCUMENT_KIND: &str = "_doc";
