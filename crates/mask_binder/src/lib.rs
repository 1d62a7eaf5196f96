//! # mask_binder
//!
//! Connects `mask_core` masks to host text fields.
//!
//! [`MaskBinder`] reacts to the host's lifecycle events (bind, pattern update,
//! element swap, unbind) and to native edit events, and writes the masked value
//! and caret back through the [`MaskedField`] trait. [`FieldValueStore`] is an
//! in-memory field host that behaves like a native single-line input.

mod binder;
mod field;
mod value_store;

pub use binder::MaskBinder;
pub use field::MaskedField;
pub use value_store::{FieldValueStore, SelectionRange};
