//! Element binder: mask lifecycle and native edit handling.
//!
//! The binder owns the [`MaskConfigStore`] and nothing else. Every operation
//! takes the host as a parameter, reads the field through [`MaskedField`],
//! lets `mask_core` decide the new value and caret, and writes them back.
//!
//! Failures never touch the field: a missing config or a missing host field is
//! reported as an error and the native value is left exactly as the host
//! produced it.

use crate::field::MaskedField;
use mask_core::{
    CursorEdit, EditOutcome, EditType, FieldAnchor, FieldId, MaskConfig, MaskConfigStore,
    MaskError, MaskOptions, MaskResult, byte_to_char_offset, char_len, char_to_byte_offset,
};

#[derive(Debug, Default)]
pub struct MaskBinder {
    configs: MaskConfigStore,
}

impl MaskBinder {
    pub fn new() -> Self {
        Self {
            configs: MaskConfigStore::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach a mask to a field and apply it to the field's current value.
    ///
    /// Binding an already bound id replaces its config.
    pub fn bind(
        &mut self,
        anchor: &FieldAnchor,
        options: MaskOptions,
        host: &mut impl MaskedField,
    ) -> Result<EditOutcome, MaskError> {
        let id = anchor.id();
        let config = options.into_config()?;
        if host.value(id).is_none() {
            log::debug!(target: "mask.binder", "bind {id}: host has no such field");
            return Err(MaskError::FieldMissing(id));
        }
        log::debug!(
            target: "mask.binder",
            "bind {id} pattern={:?} modifiers={:?}",
            config.pattern(),
            config.modifiers().names()
        );
        self.configs.set(anchor, config);
        self.reapply(id, host)
    }

    /// The host's pattern or modifiers changed.
    ///
    /// On an unknown modifier the existing config is kept.
    pub fn update(
        &mut self,
        id: FieldId,
        options: &MaskOptions,
        host: &mut impl MaskedField,
    ) -> Result<EditOutcome, MaskError> {
        let modifiers = options.parse_modifiers()?;
        let config = self.configs.get_mut(id).ok_or(MaskError::NotBound(id))?;
        if config.update(&options.pattern, modifiers) {
            log::debug!(
                target: "mask.binder",
                "update {id} pattern={:?} modifiers={:?}",
                options.pattern,
                modifiers.names()
            );
        }
        self.reapply(id, host)
    }

    /// The native element behind a bound field was replaced.
    ///
    /// The config and last result move to `new_anchor`, then initial masking
    /// runs against the new element's value.
    pub fn rebind(
        &mut self,
        old: FieldId,
        new_anchor: &FieldAnchor,
        host: &mut impl MaskedField,
    ) -> Result<EditOutcome, MaskError> {
        if host.value(new_anchor.id()).is_none() {
            return Err(MaskError::FieldMissing(new_anchor.id()));
        }
        if !self.configs.rekey(old, new_anchor) {
            log::debug!(target: "mask.binder", "rebind {old}: not bound");
            return Err(MaskError::NotBound(old));
        }
        log::debug!(target: "mask.binder", "rebind {old} -> {}", new_anchor.id());
        self.reapply(new_anchor.id(), host)
    }

    /// Re-run masking over the field's current value and move the caret to
    /// the end, as on initial bind.
    ///
    /// If the field still shows the last value written by the binder, the
    /// recorded unmasked data is re-masked instead of the display text, so
    /// rendered literals are not read back as input.
    pub fn reapply(
        &mut self,
        id: FieldId,
        host: &mut impl MaskedField,
    ) -> Result<EditOutcome, MaskError> {
        let (config, last) = self.configs.get_with_last(id).ok_or(MaskError::NotBound(id))?;
        let current = host.value(id).ok_or(MaskError::FieldMissing(id))?;

        let source = if !last.masked.is_empty() && current == last.masked {
            last.unmasked.as_str()
        } else {
            current
        };
        let result = config.apply(source);
        let cursor = (!config.is_passthrough()).then(|| char_len(&result.masked));
        log::trace!(target: "mask.binder", "reapply {id}: {current:?} -> {:?}", result.masked);

        Ok(self.commit(id, result, cursor, host))
    }

    /// Detach the mask eagerly. Returns the config if it was still live.
    pub fn unbind(&mut self, id: FieldId) -> Option<MaskConfig> {
        log::debug!(target: "mask.binder", "unbind {id}");
        self.configs.remove(id)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Handle one native edit on a bound field.
    ///
    /// The host has already applied the edit; its value and caret are read,
    /// masked against the previously written value, and written back. The
    /// returned outcome is the notification to re-emit: observers get the
    /// masked value, never the raw keystroke.
    pub fn handle_input(
        &mut self,
        id: FieldId,
        edit_type: EditType,
        host: &mut impl MaskedField,
    ) -> Result<EditOutcome, MaskError> {
        let Some((config, last)) = self.configs.get_with_last(id) else {
            log::debug!(target: "mask.binder", "input on {id} ignored: not bound");
            return Err(MaskError::NotBound(id));
        };
        let Some(raw) = host.value(id) else {
            log::debug!(target: "mask.binder", "input on {id} ignored: field missing");
            return Err(MaskError::FieldMissing(id));
        };
        let caret = host.caret(id).unwrap_or(raw.len());

        let edit = CursorEdit::new(
            last.masked.as_str(),
            raw,
            byte_to_char_offset(raw, caret),
            edit_type,
        );
        let outcome = config.apply_edit(&edit);
        log::trace!(
            target: "mask.binder",
            "input {id} {edit_type:?}: {:?}@{} -> {:?}@{:?}",
            edit.raw_input,
            edit.origin_offset,
            outcome.masked,
            outcome.cursor
        );

        let result = MaskResult {
            masked: outcome.masked,
            unmasked: outcome.unmasked,
        };
        Ok(self.commit(id, result, outcome.cursor, host))
    }

    // =========================================================================
    // Exposed properties
    // =========================================================================

    /// Live config of a bound field.
    pub fn config(&self, id: FieldId) -> Option<&MaskConfig> {
        self.configs.get(id)
    }

    /// Current unmasked value of a bound field.
    pub fn unmasked(&self, id: FieldId) -> Option<&str> {
        self.configs.last_result(id).map(|r| r.unmasked.as_str())
    }

    pub fn is_bound(&self, id: FieldId) -> bool {
        self.configs.is_live(id)
    }

    /// Drop configs whose anchors are gone.
    pub fn prune(&mut self) -> usize {
        self.configs.prune()
    }

    /// Write `result` to the field, record it, and build the outcome.
    ///
    /// `cursor` is a char offset into `result.masked`.
    fn commit(
        &mut self,
        id: FieldId,
        result: MaskResult,
        cursor: Option<usize>,
        host: &mut impl MaskedField,
    ) -> EditOutcome {
        let byte_caret = cursor.map(|c| char_to_byte_offset(&result.masked, c));
        host.write(id, result.masked.clone(), byte_caret);
        let outcome = EditOutcome {
            masked: result.masked.clone(),
            unmasked: result.unmasked.clone(),
            cursor,
        };
        self.configs.record_result(id, result);
        outcome
    }
}
