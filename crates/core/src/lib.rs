//! Core value model for Veneer
//!
//! This crate defines the two leaf pieces every other layer builds on:
//!
//! - [`Value`]: the closed tagged union of primitive kinds the backend can
//!   natively hold. This is the only vocabulary the backend understands.
//! - [`StoreValue`]: the bridging contract that maps a domain type onto
//!   exactly one [`ValueKind`], with a total encode and a fallible decode.
//!
//! Decode failures are deliberately silent (`None`, never an error): the
//! backend is foreign-writable, so a typed reader must degrade gracefully
//! when it finds a value it cannot interpret.

#![warn(missing_docs)]

pub mod typed;
pub mod value;

pub use typed::{Bytes, StoreValue};
pub use value::{Value, ValueKind};
