use crate::collection::Document;
use crate::common::{Convertible, Value};
use crate::errors::PersistenceResult;
use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type Factory = dyn Fn(&Document) -> PersistenceResult<Entity> + Send + Sync;

/// Handle to a domain type the repository materializes documents into.
///
/// An `ObjectClass` pairs a Rust type with a factory that builds it from a
/// source mapping. [ObjectClass::of] derives the factory from the type's
/// [Convertible] implementation; [ObjectClass::from_fn] accepts any closure.
///
/// Handles compare equal when they produce the same Rust type.
///
/// ```rust,ignore
/// #[derive(Convertible)]
/// struct Note { title: String }
///
/// NoteRepository.set_object_class(Some(ObjectClass::of::<Note>()));
/// let note: Note = NoteRepository.find_one("1")?.into_object().unwrap();
/// ```
#[derive(Clone)]
pub struct ObjectClass {
    inner: Arc<ObjectClassInner>,
}

struct ObjectClassInner {
    type_id: TypeId,
    type_name: &'static str,
    factory: Box<Factory>,
}

impl ObjectClass {
    /// Handle for a [Convertible] type.
    pub fn of<T: Convertible + Send + Sync + 'static>() -> Self {
        ObjectClass::from_fn(|source: &Document| {
            T::from_value(&Value::Document(source.clone()))
        })
    }

    /// Handle for `T` built by `factory`.
    pub fn from_fn<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Document) -> PersistenceResult<T> + Send + Sync + 'static,
    {
        ObjectClass {
            inner: Arc::new(ObjectClassInner {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                factory: Box::new(move |source| factory(source).map(Entity::new)),
            }),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.inner.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.type_name
    }

    /// Returns `true` if this handle produces values of type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.type_id == TypeId::of::<T>()
    }

    /// Builds an instance from a source mapping.
    pub fn instantiate(&self, source: &Document) -> PersistenceResult<Entity> {
        (self.inner.factory)(source)
    }

    pub fn ptr_eq(&self, other: &ObjectClass) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ObjectClass {
    fn eq(&self, other: &Self) -> bool {
        self.inner.type_id == other.inner.type_id
    }
}

impl Eq for ObjectClass {}

impl Debug for ObjectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectClass({})", self.inner.type_name)
    }
}

/// A materialized domain object of a type only known at runtime.
pub struct Entity {
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

impl Entity {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Entity {
            type_name: std::any::type_name::<T>(),
            value: Box::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Takes the value out, or gives the entity back if it holds another type.
    pub fn downcast<T: 'static>(self) -> Result<T, Entity> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Entity { type_name, value }),
        }
    }
}

impl Debug for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.type_name)
    }
}

/// A deserialized document: the raw source mapping when no object class is
/// configured, a materialized object otherwise.
#[derive(Debug)]
pub enum Record {
    Source(Document),
    Object(Entity),
}

impl Record {
    pub fn is_source(&self) -> bool {
        matches!(self, Record::Source(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Record::Object(_))
    }

    pub fn as_source(&self) -> Option<&Document> {
        match self {
            Record::Source(source) => Some(source),
            Record::Object(_) => None,
        }
    }

    pub fn into_source(self) -> Option<Document> {
        match self {
            Record::Source(source) => Some(source),
            Record::Object(_) => None,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Record::Object(entity) => entity.downcast_ref::<T>(),
            Record::Source(_) => None,
        }
    }

    pub fn into_object<T: 'static>(self) -> Option<T> {
        match self {
            Record::Object(entity) => entity.downcast::<T>().ok(),
            Record::Source(_) => None,
        }
    }
}
