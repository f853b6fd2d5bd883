use crate::collection::Document;
use crate::common::Value;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};

/// Conversion between a Rust type and a [Value].
///
/// This is the mapping capability of the repository: `to_value` produces the
/// stored field mapping of an object and `from_value` builds an object back
/// from it. [Document] implements it as the identity, so a plain field
/// mapping passes through serialization unchanged.
///
/// Usually derived with `#[derive(Convertible)]` from `persistence_derive`.
pub trait Convertible: Sized {
    fn to_value(&self) -> PersistenceResult<Value>;
    fn from_value(value: &Value) -> PersistenceResult<Self>;
}

/// Shorthand for `T::from_value`, used by derived code.
#[inline]
pub fn from_value<T: Convertible>(value: &Value) -> PersistenceResult<T> {
    T::from_value(value)
}

fn mismatch(expected: &str, value: &Value) -> PersistenceError {
    log::error!("Value {} is not {}", value, expected);
    PersistenceError::new(
        &format!("Value of type {} is not {}", value.type_name(), expected),
        ErrorKind::ObjectMappingError,
    )
}

macro_rules! signed_convertible {
    ($($t:ty),*) => {
        $(impl Convertible for $t {
            fn to_value(&self) -> PersistenceResult<Value> {
                Ok(Value::I64(*self as i64))
            }

            fn from_value(value: &Value) -> PersistenceResult<Self> {
                value
                    .as_i64()
                    .and_then(|v| <$t>::try_from(v).ok())
                    .ok_or_else(|| mismatch(concat!("an ", stringify!($t)), value))
            }
        })*
    };
}

macro_rules! unsigned_convertible {
    ($($t:ty),*) => {
        $(impl Convertible for $t {
            fn to_value(&self) -> PersistenceResult<Value> {
                Ok(Value::U64(*self as u64))
            }

            fn from_value(value: &Value) -> PersistenceResult<Self> {
                value
                    .as_u64()
                    .and_then(|v| <$t>::try_from(v).ok())
                    .ok_or_else(|| mismatch(concat!("a ", stringify!($t)), value))
            }
        })*
    };
}

signed_convertible!(i8, i16, i32, i64, isize);
unsigned_convertible!(u8, u16, u32, u64, usize);

impl Convertible for bool {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        value.as_bool().ok_or_else(|| mismatch("a bool", value))
    }
}

impl Convertible for f32 {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::F64(*self as f64))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| mismatch("a f32", value))
    }
}

impl Convertible for f64 {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        value.as_f64().ok_or_else(|| mismatch("a f64", value))
    }
}

impl Convertible for String {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("a string", value))
    }
}

impl Convertible for Value {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        Ok(value.clone())
    }
}

impl Convertible for Document {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        value
            .as_document()
            .cloned()
            .ok_or_else(|| mismatch("a document", value))
    }
}

impl<T: Convertible> Convertible for Option<T> {
    fn to_value(&self) -> PersistenceResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        match value {
            Value::Null => Ok(None),
            _ => T::from_value(value).map(Some),
        }
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn to_value(&self) -> PersistenceResult<Value> {
        let items = self
            .iter()
            .map(Convertible::to_value)
            .collect::<PersistenceResult<Vec<Value>>>()?;
        Ok(Value::Array(items))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            _ => Err(mismatch("an array", value)),
        }
    }
}
