//! Field descriptors
//!
//! A field binds a key (and optionally a default) to a typed accessor pair,
//! so a schema can be written as a handful of `const` items instead of
//! stringly-typed reads scattered through the codebase:
//!
//! ```ignore
//! use veneer_store::{Field, OptionalField};
//!
//! const LAUNCH_COUNT: Field<i64> = Field::new("launch_count", 0);
//! const DISPLAY_NAME: OptionalField<String> = OptionalField::new("display_name");
//!
//! store.write(|settings| -> Result<(), Infallible> {
//!     LAUNCH_COUNT.set(settings, LAUNCH_COUNT.get(settings) + 1);
//!     Ok(())
//! })?;
//! ```

use std::marker::PhantomData;

use veneer_core::StoreValue;

use crate::object::SchemaObject;

/// A key bound to a typed accessor with a default.
///
/// `get` resolves through the schema object's merged view and substitutes
/// the default wherever the key is absent, explicitly removed, or holds a
/// value the type cannot decode.
#[derive(Debug, Clone, Copy)]
pub struct Field<T> {
    key: &'static str,
    default: T,
}

impl<T: StoreValue + Clone> Field<T> {
    /// Bind `key` with `default`.
    pub const fn new(key: &'static str, default: T) -> Self {
        Self { key, default }
    }

    /// The bound key.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Read the field, falling back to the default.
    pub fn get(&self, object: &SchemaObject) -> T {
        object.read_or(self.key, self.default.clone())
    }

    /// Stage a write of `value`.
    pub fn set(&self, object: &mut SchemaObject, value: T) {
        object.write(self.key, Some(value));
    }

    /// Stage an explicit removal; subsequent reads yield the default.
    pub fn clear(&self, object: &mut SchemaObject) {
        object.remove(self.key);
    }
}

/// A key bound to a typed accessor with no default.
#[derive(Debug, Clone, Copy)]
pub struct OptionalField<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: StoreValue> OptionalField<T> {
    /// Bind `key`.
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// The bound key.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Read the field; absent, removed, and undecodable all yield `None`.
    pub fn get(&self, object: &SchemaObject) -> Option<T> {
        object.read(self.key)
    }

    /// Stage a write; `None` stages an explicit removal.
    pub fn set(&self, object: &mut SchemaObject, value: Option<T>) {
        object.write(self.key, value);
    }

    /// Stage an explicit removal.
    pub fn clear(&self, object: &mut SchemaObject) {
        object.remove(self.key);
    }
}
