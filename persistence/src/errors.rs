use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for repository operations.
///
/// Each kind describes one category of failure so callers can branch on it
/// without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use persistence::errors::{ErrorKind, PersistenceError, PersistenceResult};
///
/// fn example() -> PersistenceResult<()> {
///     Err(PersistenceError::new("Collection not found", ErrorKind::CollectionNotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Lookup errors
    /// A single-id lookup found nothing. Carries what was asked for and where.
    DocumentNotFound {
        id: String,
        collection: String,
        document_kind: String,
    },
    /// The provided document id is invalid
    InvalidId,

    // Repository definition errors
    /// Application code tried to construct a second repository instance
    InstantiationNotAllowed,
    /// The operation is not valid in the current context
    InvalidOperation,

    // Collection errors
    /// The target collection does not exist in the store
    CollectionNotFound,
    /// The collection to create already exists
    CollectionAlreadyExists,

    // Mapping errors
    /// Error mapping an object to or from a document
    ObjectMappingError,

    // Transport errors, raised by store clients and passed through unchanged
    /// Generic transport failure (network, malformed response)
    TransportError,
    /// The client gave up waiting for the store
    Timeout,
    /// Generic IO error
    IOError,

    /// Error from an extension, such as a third party store client
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DocumentNotFound { .. } => write!(f, "Document not found"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::InstantiationNotAllowed => write!(f, "Instantiation not allowed"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::CollectionAlreadyExists => write!(f, "Collection already exists"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::TransportError => write!(f, "Transport error"),
            ErrorKind::Timeout => write!(f, "Timeout"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the persistence crate.
///
/// `PersistenceError` carries a message, an [ErrorKind], an optional cause and
/// the backtrace captured at construction.
///
/// # Examples
///
/// ```rust,ignore
/// use persistence::errors::{ErrorKind, PersistenceError};
///
/// let cause = PersistenceError::new("connection reset", ErrorKind::TransportError);
/// let err = PersistenceError::new_with_cause("Bulk write failed", ErrorKind::TransportError, cause);
/// ```
#[derive(Clone)]
pub struct PersistenceError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PersistenceError>>,
    backtrace: Atomic<Backtrace>,
}

impl PersistenceError {
    /// Creates a new `PersistenceError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PersistenceError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `PersistenceError` that keeps `cause` in its chain.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PersistenceError) -> Self {
        PersistenceError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Error raised when a single-id lookup misses.
    pub fn document_not_found(id: &str, collection: &str, document_kind: &str) -> Self {
        PersistenceError::new(
            &format!(
                "Document with id '{}' not found in collection '{}' with kind '{}'",
                id, collection, document_kind
            ),
            ErrorKind::DocumentNotFound {
                id: id.to_string(),
                collection: collection.to_string(),
                document_kind: document_kind.to_string(),
            },
        )
    }

    /// Error raised when a repository definition is constructed directly.
    pub fn instantiation_not_allowed(definition_name: &str) -> Self {
        PersistenceError::new(
            &format!(
                "{} is a singleton, use {}::instance() instead of creating a new one",
                definition_name, definition_name
            ),
            ErrorKind::InstantiationNotAllowed,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&PersistenceError> {
        self.cause.as_deref()
    }

    /// Returns `true` for [ErrorKind::DocumentNotFound].
    pub fn is_document_not_found(&self) -> bool {
        matches!(self.error_kind, ErrorKind::DocumentNotFound { .. })
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for repository operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(feature = "serde")]
impl serde::de::Error for PersistenceError {
    fn custom<T: Display>(msg: T) -> Self {
        PersistenceError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for PersistenceError {
    fn custom<T: Display>(msg: T) -> Self {
        PersistenceError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => ErrorKind::TransportError,
            _ => ErrorKind::IOError,
        };
        PersistenceError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<String> for PersistenceError {
    fn from(msg: String) -> Self {
        PersistenceError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for PersistenceError {
    fn from(msg: &str) -> Self {
        PersistenceError::new(msg, ErrorKind::InternalError)
    }
}
