//! In-memory single-line text fields.
//!
//! [`FieldValueStore`] behaves like a native `<input type=text>`: typing,
//! pasting and deleting change the value and caret *before* the binder sees
//! the edit, exactly as a browser does before firing `input`. It backs the
//! `maskfield` command-line host and the binder's tests.

use crate::field::MaskedField;
use mask_core::{
    FieldId, clamp_to_char_boundary, filter_single_line, next_cursor_boundary,
    prev_cursor_boundary,
};
use std::collections::HashMap;

/// Selected byte range, normalized so `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Clone, Debug, Default)]
struct FieldState {
    value: String,
    /// Incremented on every value change.
    value_rev: u64,
    /// Byte offset, always on a char boundary.
    caret: usize,
    /// Selection is `min(anchor, caret)..max(anchor, caret)`.
    selection_anchor: Option<usize>,
}

/// Text fields keyed by [`FieldId`].
///
/// Editing calls on a missing field are ignored; fields only come into
/// existence through [`insert_field`](Self::insert_field).
///
/// # Example
///
/// ```
/// use mask_binder::FieldValueStore;
/// use mask_core::FieldId;
///
/// let mut fields = FieldValueStore::new();
/// let id = FieldId::from_raw(1);
///
/// fields.insert_field(id, "12");
/// fields.insert_text(id, "3");
/// assert_eq!(fields.get(id), Some("123"));
/// assert_eq!(fields.caret_of(id), Some(3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FieldValueStore {
    fields: HashMap<FieldId, FieldState>,
}

impl FieldValueStore {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn has(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    /// Create (or reset) a field holding `initial`, caret at the end.
    pub fn insert_field(&mut self, id: FieldId, initial: &str) {
        let value = filter_single_line(initial).into_owned();
        let value_rev = self
            .fields
            .get(&id)
            .map(|st| st.value_rev.wrapping_add(1))
            .unwrap_or(0);
        self.fields.insert(
            id,
            FieldState {
                caret: value.len(),
                value,
                value_rev,
                selection_anchor: None,
            },
        );
    }

    /// Remove the field, as when its element leaves the page.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        self.fields.remove(&id).is_some()
    }

    pub fn get(&self, id: FieldId) -> Option<&str> {
        self.fields.get(&id).map(|st| st.value.as_str())
    }

    pub fn caret_of(&self, id: FieldId) -> Option<usize> {
        self.fields.get(&id).map(|st| st.caret)
    }

    pub fn selection(&self, id: FieldId) -> Option<SelectionRange> {
        let st = self.fields.get(&id)?;
        selection_range(&st.value, st.selection_anchor, st.caret)
    }

    pub fn value_revision(&self, id: FieldId) -> u64 {
        self.fields.get(&id).map(|st| st.value_rev).unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Type `s` at the caret, replacing any selection. Newlines are stripped.
    pub fn insert_text(&mut self, id: FieldId, s: &str) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        let s = filter_single_line(s);
        if s.is_empty() {
            return;
        }

        delete_selection_if_any(st);

        let caret = clamp_to_char_boundary(&st.value, st.caret);
        st.value.insert_str(caret, &s);
        st.caret = clamp_to_char_boundary(&st.value, caret + s.len());
        mark_text_dirty(st);
    }

    /// Paste clipboard text. For a single-line field this is the same edit as
    /// typing the whole text at once.
    pub fn paste(&mut self, id: FieldId, s: &str) {
        self.insert_text(id, s);
    }

    /// Delete the char before the caret, or the selection if there is one.
    pub fn backspace(&mut self, id: FieldId) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        if delete_selection_if_any(st) {
            return;
        }

        let caret = st.caret;
        if caret == 0 {
            return;
        }

        let prev = prev_cursor_boundary(&st.value, caret);
        st.value.drain(prev..caret);
        st.caret = prev;
        mark_text_dirty(st);
    }

    /// Delete the char after the caret, or the selection if there is one.
    pub fn delete(&mut self, id: FieldId) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        if delete_selection_if_any(st) {
            return;
        }

        let caret = st.caret;
        if caret >= st.value.len() {
            return;
        }

        let next = next_cursor_boundary(&st.value, caret);
        st.value.drain(caret..next);
        mark_text_dirty(st);
    }

    /// Move the caret to a byte offset.
    ///
    /// If `selecting` is true the selection is extended from the current
    /// caret (or existing anchor) to the new one.
    pub fn set_caret(&mut self, id: FieldId, caret: usize, selecting: bool) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        let caret = clamp_to_char_boundary(&st.value, caret);

        if selecting {
            if st.selection_anchor.is_none() {
                st.selection_anchor = Some(st.caret);
            }
            st.caret = caret;
            normalize_selection_anchor(st);
        } else {
            st.caret = caret;
            st.selection_anchor = None;
        }
    }

    /// Select the byte range `start..end`; the caret ends up at `end`.
    pub fn select(&mut self, id: FieldId, start: usize, end: usize) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        st.selection_anchor = Some(clamp_to_char_boundary(&st.value, start));
        st.caret = clamp_to_char_boundary(&st.value, end);
        normalize_selection_anchor(st);
    }

    pub fn select_all(&mut self, id: FieldId) {
        let len = self.fields.get(&id).map(|st| st.value.len()).unwrap_or(0);
        self.select(id, 0, len);
    }
}

impl MaskedField for FieldValueStore {
    #[inline]
    fn value(&self, id: FieldId) -> Option<&str> {
        self.get(id)
    }

    #[inline]
    fn caret(&self, id: FieldId) -> Option<usize> {
        self.caret_of(id)
    }

    fn write(&mut self, id: FieldId, value: String, caret: Option<usize>) {
        let Some(st) = self.fields.get_mut(&id) else {
            return;
        };
        if st.value != value {
            st.value = value;
            mark_text_dirty(st);
        }
        st.caret = clamp_to_char_boundary(&st.value, caret.unwrap_or(st.caret));
        st.selection_anchor = None;
    }
}

// --- Internal helper functions ---

fn selection_range(value: &str, anchor: Option<usize>, caret: usize) -> Option<SelectionRange> {
    let a = clamp_to_char_boundary(value, anchor?);
    let c = clamp_to_char_boundary(value, caret);
    if a == c {
        return None;
    }
    Some(SelectionRange::new(a, c))
}

fn normalize_selection_anchor(st: &mut FieldState) {
    let Some(anchor) = st.selection_anchor else {
        return;
    };
    let anchor = clamp_to_char_boundary(&st.value, anchor);
    // A collapsed selection is no selection.
    st.selection_anchor = (anchor != st.caret).then_some(anchor);
}

fn delete_selection_if_any(st: &mut FieldState) -> bool {
    let Some(sel) = selection_range(&st.value, st.selection_anchor, st.caret) else {
        st.selection_anchor = None;
        return false;
    };

    st.value.drain(sel.start..sel.end);
    st.caret = sel.start;
    st.selection_anchor = None;
    mark_text_dirty(st);
    true
}

fn clamp_state(st: &mut FieldState) {
    st.caret = clamp_to_char_boundary(&st.value, st.caret);
    if let Some(a) = st.selection_anchor {
        st.selection_anchor = Some(clamp_to_char_boundary(&st.value, a));
    }
}

fn mark_text_dirty(st: &mut FieldState) {
    st.value_rev = st.value_rev.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(initial: &str) -> (FieldValueStore, FieldId) {
        let mut store = FieldValueStore::new();
        let id = FieldId::from_raw(1);
        store.insert_field(id, initial);
        (store, id)
    }

    #[test]
    fn insert_text_keeps_caret_on_char_boundary() {
        let (mut store, id) = field("");
        store.insert_text(id, "€");
        let v = store.get(id).unwrap();
        let caret = store.caret_of(id).unwrap();
        assert_eq!(v, "€");
        assert_eq!(caret, v.len());
    }

    #[test]
    fn backspace_removes_a_full_unicode_scalar_value() {
        let (mut store, id) = field("a€");
        store.backspace(id);
        assert_eq!(store.get(id), Some("a"));
        assert_eq!(store.caret_of(id), Some(1));
    }

    #[test]
    fn delete_removes_next_char_and_keeps_caret() {
        let (mut store, id) = field("abc");
        store.set_caret(id, 1, false);
        store.delete(id);
        assert_eq!(store.get(id), Some("ac"));
        assert_eq!(store.caret_of(id), Some(1));
    }

    #[test]
    fn paste_replaces_selection_and_strips_newlines() {
        let (mut store, id) = field("12.34");
        store.select(id, 1, 4);
        assert_eq!(store.selection(id), Some(SelectionRange::new(1, 4)));

        store.paste(id, "9\n9");
        assert_eq!(store.get(id), Some("1994"));
        assert_eq!(store.caret_of(id), Some(3));
        assert_eq!(store.selection(id), None);
    }

    #[test]
    fn shift_extend_then_backspace_deletes_selection() {
        let (mut store, id) = field("hello");
        store.set_caret(id, 3, true);
        assert_eq!(store.selection(id), Some(SelectionRange { start: 3, end: 5 }));
        store.backspace(id);
        assert_eq!(store.get(id), Some("hel"));
        assert_eq!(store.caret_of(id), Some(3));
    }

    #[test]
    fn collapsed_selection_is_cleared() {
        let (mut store, id) = field("abc");
        store.select(id, 2, 2);
        assert_eq!(store.selection(id), None);
    }

    #[test]
    fn editing_a_missing_field_is_ignored() {
        let mut store = FieldValueStore::new();
        let id = FieldId::from_raw(7);
        store.insert_text(id, "x");
        store.backspace(id);
        store.write(id, "y".into(), Some(1));
        assert!(!store.has(id));
    }

    #[test]
    fn write_clamps_caret_and_bumps_revision_on_change() {
        let (mut store, id) = field("ab");
        let rev = store.value_revision(id);

        store.write(id, "ab".into(), None);
        assert_eq!(store.value_revision(id), rev);

        store.write(id, "a€".into(), Some(2));
        assert_eq!(store.caret_of(id), Some(1));
        assert_eq!(store.value_revision(id), rev + 1);

        store.write(id, "x".into(), None);
        assert_eq!(store.caret_of(id), Some(1));
    }
}
