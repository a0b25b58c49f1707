//! Typed bridging contract
//!
//! A domain type that wants to live in the backend implements [`StoreValue`]:
//! it declares the single [`ValueKind`] it encodes to, a total encode, and a
//! fallible decode. Decode returns `None` for any primitive that cannot be
//! interpreted as the requested type - a foreign writer may have stored
//! anything under the key, and a typed reader degrades to "absent" rather
//! than failing.
//!
//! Every implementation bridges against exactly one variant; there is no
//! dynamic kind probing and no cross-kind conversion (an `i64` never decodes
//! from `UInt`, a timestamp never decodes from `String`).

use crate::value::{Value, ValueKind};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Bridges a domain type to and from exactly one primitive kind.
///
/// `to_value` is total: every value of the type has an encoding. `from_value`
/// is partial: it returns `None` when the primitive is of the wrong kind or
/// out of the type's range, and never reports an error.
pub trait StoreValue: Sized {
    /// The single primitive kind this type encodes to.
    const KIND: ValueKind;

    /// Encode into the associated primitive kind. Total.
    fn to_value(&self) -> Value;

    /// Decode from a primitive. Returns `None` for anything that is not
    /// an in-range value of the associated kind. Partial by design.
    fn from_value(value: &Value) -> Option<Self>;
}

/// Binary payload, bridged to the `Bytes` kind.
///
/// A newtype rather than a bare `Vec<u8>` so that `Vec<T>` can carry the
/// generic `Array` bridging without overlapping impls.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bytes(
    /// The raw byte payload.
    pub Vec<u8>,
);

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl StoreValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl StoreValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl StoreValue for i64 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl StoreValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        // Out-of-range stored values read as absent, not as a wrapped error.
        value.as_int().and_then(|i| i32::try_from(i).ok())
    }
}

impl StoreValue for i16 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|i| i16::try_from(i).ok())
    }
}

impl StoreValue for u64 {
    const KIND: ValueKind = ValueKind::UInt;

    fn to_value(&self) -> Value {
        Value::UInt(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_uint()
    }
}

impl StoreValue for u32 {
    const KIND: ValueKind = ValueKind::UInt;

    fn to_value(&self) -> Value {
        Value::UInt(u64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_uint().and_then(|u| u32::try_from(u).ok())
    }
}

impl StoreValue for u16 {
    const KIND: ValueKind = ValueKind::UInt;

    fn to_value(&self) -> Value {
        Value::UInt(u64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_uint().and_then(|u| u16::try_from(u).ok())
    }
}

impl StoreValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl StoreValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        // Narrowing is lossy but always defined (overflow maps to infinity).
        value.as_float().map(|f| f as f32)
    }
}

impl StoreValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_timestamp()
    }
}

impl StoreValue for Bytes {
    const KIND: ValueKind = ValueKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(|b| Bytes(b.to_vec()))
    }
}

impl<T: StoreValue> StoreValue for Vec<T> {
    const KIND: ValueKind = ValueKind::Array;

    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(StoreValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        // All-or-nothing: one uninterpretable element poisons the whole list.
        value
            .as_array()?
            .iter()
            .map(T::from_value)
            .collect::<Option<Vec<T>>>()
    }
}

impl<T: StoreValue> StoreValue for HashMap<String, T> {
    const KIND: ValueKind = ValueKind::Object;

    fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_object()?
            .iter()
            .map(|(k, v)| T::from_value(v).map(|t| (k.clone(), t)))
            .collect::<Option<HashMap<String, T>>>()
    }
}
