//! Host field seam.
//!
//! The binder never owns text fields. It reads and writes them through
//! [`MaskedField`], so a real widget layer, a DOM bridge, or the in-memory
//! [`FieldValueStore`](crate::FieldValueStore) can sit behind it.
//!
//! Offsets crossing this trait are byte offsets into the field value, as
//! native text inputs report them. The binder converts to and from the char
//! offsets used by `mask_core`.

use mask_core::FieldId;

/// Minimal access to a host's text fields.
///
/// # Integration Pattern
///
/// Convert native ids to `FieldId` at the routing boundary, then hand the
/// host to the binder for each event:
///
/// ```ignore
/// fn on_native_input(node: NodeId, binder: &mut MaskBinder, host: &mut impl MaskedField) {
///     let _ = binder.handle_input(FieldId::from_raw(node.0 as u64), EditType::Insert, host);
/// }
/// ```
pub trait MaskedField {
    // =========================================================================
    // Read
    // =========================================================================

    /// Current value of the field, if the host has it.
    fn value(&self, id: FieldId) -> Option<&str>;

    /// Caret as a byte offset into [`value`](Self::value).
    fn caret(&self, id: FieldId) -> Option<usize>;

    // =========================================================================
    // Write
    // =========================================================================

    /// Replace the field value.
    ///
    /// With `Some(caret)` the caret is moved there (byte offset into `value`);
    /// with `None` the host keeps its own caret, clamped to the new value.
    /// Any selection is cleared.
    fn write(&mut self, id: FieldId, value: String, caret: Option<usize>);
}
