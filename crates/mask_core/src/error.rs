//! Errors surfaced to hosts.
//!
//! Masking itself never fails: bad characters are dropped, short input is
//! partially filled, an empty pattern passes input through. The only failures
//! are configuration absence and unparsable options.

use crate::id::FieldId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    /// No live mask configuration for this field (never bound, unbound, or
    /// its anchor was dropped).
    #[error("no mask is bound to {0}")]
    NotBound(FieldId),

    /// The host has no field under this id.
    #[error("host has no field {0}")]
    FieldMissing(FieldId),

    /// A modifier name other than `short` / `prefill`.
    #[error("unknown mask modifier '{0}' (expected 'short' or 'prefill')")]
    UnknownModifier(String),
}
