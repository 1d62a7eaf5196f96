//! # mask_core
//!
//! UI-agnostic input mask engine.
//!
//! A mask pattern such as `##.##` or `AAA-###-` is compiled into slots
//! ([`tokenize`]); raw field text is run through the slots to get a display
//! value and the bare data ([`apply_mask`]); after each native edit the caret
//! is moved so it follows the char the user typed or deleted ([`reposition`]).
//! [`MaskConfigStore`] keeps one [`MaskConfig`] per bound field without owning
//! the field.
//!
//! ## Design Principles
//!
//! This crate does not know about widgets, DOM nodes, or event loops. Hosts
//! feed it strings and caret offsets and write back what it returns. All
//! computation is synchronous and runs to completion per edit.
//!
//! Offsets used by the engine are char offsets; see [`byte_to_char_offset`]
//! and [`char_to_byte_offset`] for hosts that report bytes.

mod config;
mod cursor;
mod edit;
mod error;
mod id;
mod masker;
mod store;
mod text;
mod token;

pub use config::{EditOutcome, MaskConfig, MaskOptions};
pub use cursor::reposition;
pub use edit::{CursorEdit, DataStream, EditDiff, EditType, data_stream};
pub use error::MaskError;
pub use id::{FieldAnchor, FieldId};
pub use masker::{MaskModifier, MaskModifiers, MaskResult, MaskWalk, apply_mask, walk_mask};
pub use store::MaskConfigStore;
pub use token::{CharClass, MaskToken, is_rendering_of, pattern_of, tokenize};

// Offset helpers for integration layers bridging byte-based native fields.
pub use text::{
    byte_to_char_offset, char_len, char_to_byte_offset, clamp_to_char_boundary,
    filter_single_line, next_cursor_boundary, prev_cursor_boundary,
};
