//! Edit reconstruction.
//!
//! A native field only reports its new raw value and caret. To mask that value
//! correctly the engine needs to know which chars the user supplied and which
//! were rendered by the mask on the previous pass: a literal such as the `1` in
//! `+1 ###` also fits a digit slot and must not be read back as input.
//!
//! [`EditDiff`] recovers the edited span from the previous masked value, the
//! raw value and the caret. [`data_stream`] then keeps only placeholder-filled
//! chars from the unchanged parts plus everything inside the edited span.

use crate::text::filter_single_line;
use crate::token::{MaskToken, is_rendering_of};
use std::borrow::Cow;

/// Host hint about the kind of native edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditType {
    /// Typing, paste, drop: text was added at the caret.
    Insert,
    /// Backspace, delete, cut.
    Delete,
    /// Programmatic changes and anything the host cannot classify.
    #[default]
    Unknown,
}

/// Everything the repositioner needs to know about one edit.
///
/// Offsets are char offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorEdit {
    /// Masked value the field showed before the edit.
    pub previous_masked: String,
    /// Field value right after the native edit, before masking.
    pub raw_input: String,
    /// Caret right after the native edit, in `raw_input`.
    pub origin_offset: usize,
    pub edit_type: EditType,
}

impl CursorEdit {
    pub fn new(
        previous_masked: impl Into<String>,
        raw_input: impl Into<String>,
        origin_offset: usize,
        edit_type: EditType,
    ) -> Self {
        Self {
            previous_masked: previous_masked.into(),
            raw_input: raw_input.into(),
            origin_offset,
            edit_type,
        }
    }

    /// This edit with CR and LF removed from the raw value; the caret stays
    /// on the same char.
    pub fn single_line(&self) -> Cow<'_, CursorEdit> {
        let Cow::Owned(raw_input) = filter_single_line(&self.raw_input) else {
            return Cow::Borrowed(self);
        };
        let stripped = self
            .raw_input
            .chars()
            .take(self.origin_offset)
            .filter(|c| matches!(c, '\n' | '\r'))
            .count();
        Cow::Owned(CursorEdit {
            previous_masked: self.previous_masked.clone(),
            raw_input,
            origin_offset: self.origin_offset - stripped,
            edit_type: self.edit_type,
        })
    }
}

/// Shape of a single contiguous edit: everything outside the shared prefix
/// and suffix was replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditDiff {
    pub prefix_len: usize,
    pub suffix_len: usize,
}

impl EditDiff {
    /// Diff `prev` against `raw`, anchoring the end of the edited span at `caret`.
    ///
    /// Native edits leave the caret right after inserted text (or at the
    /// deletion point), so the shared suffix may not reach past the caret.
    /// This resolves ambiguous diffs deterministically, e.g. typing `1` after
    /// `1` is an insertion at the caret, not at the first `1`.
    pub fn compute(prev: &[char], raw: &[char], caret: usize) -> Self {
        let caret = caret.min(raw.len());

        let max_suffix = (raw.len() - caret).min(prev.len());
        let suffix_len = prev
            .iter()
            .rev()
            .zip(raw.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let max_prefix = caret
            .min(prev.len() - suffix_len)
            .min(raw.len() - suffix_len);
        let prefix_len = prev
            .iter()
            .zip(raw)
            .take(max_prefix)
            .take_while(|(a, b)| a == b)
            .count();

        Self {
            prefix_len,
            suffix_len,
        }
    }

    pub fn inserted<'a>(&self, raw: &'a [char]) -> &'a [char] {
        &raw[self.prefix_len..raw.len() - self.suffix_len]
    }

    pub fn deleted<'a>(&self, prev: &'a [char]) -> &'a [char] {
        &prev[self.prefix_len..prev.len() - self.suffix_len]
    }
}

/// Input to mask for an edit, plus the caret expressed as an index into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataStream {
    pub chars: Vec<char>,
    /// Input chars before the caret.
    pub origin: usize,
    /// Input index where the edited span starts.
    pub edit_start: usize,
    /// Display chars in front of the edit that the edit left untouched.
    pub untouched: usize,
}

/// Rebuild the masking input for `edit`.
///
/// When the previous value is not a rendering of `tokens` (first bind, pattern
/// just changed, host rewrote the value) there is nothing to strip and the raw
/// value is used as-is.
pub fn data_stream(edit: &CursorEdit, tokens: &[MaskToken]) -> DataStream {
    let raw: Vec<char> = edit.raw_input.chars().collect();
    let origin = edit.origin_offset.min(raw.len());

    if tokens.is_empty() || !is_rendering_of(&edit.previous_masked, tokens) {
        return DataStream {
            chars: raw,
            origin,
            edit_start: origin,
            untouched: 0,
        };
    }

    let prev: Vec<char> = edit.previous_masked.chars().collect();
    let diff = EditDiff::compute(&prev, &raw, origin);
    let placeholder_chars = |range: std::ops::Range<usize>| {
        range
            .filter(|&k| tokens[k].is_placeholder())
            .map(|k| prev[k])
            .collect::<Vec<char>>()
    };

    let mut chars = placeholder_chars(0..diff.prefix_len);
    let edit_start = chars.len();
    let data_origin = chars.len() + (origin - diff.prefix_len);
    chars.extend_from_slice(diff.inserted(&raw));
    chars.extend(placeholder_chars(prev.len() - diff.suffix_len..prev.len()));

    log::trace!(
        target: "mask.cursor",
        "edit diff prefix={} suffix={} inserted={:?} deleted={:?}",
        diff.prefix_len,
        diff.suffix_len,
        diff.inserted(&raw).iter().collect::<String>(),
        diff.deleted(&prev).iter().collect::<String>()
    );

    DataStream {
        chars,
        origin: data_origin,
        edit_start,
        untouched: diff.prefix_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn diff(prev: &str, raw: &str, caret: usize) -> (String, String) {
        let (p, r) = (chars(prev), chars(raw));
        let d = EditDiff::compute(&p, &r, caret);
        (
            d.inserted(&r).iter().collect(),
            d.deleted(&p).iter().collect(),
        )
    }

    #[test]
    fn diff_typing_at_end() {
        assert_eq!(diff("12", "123", 3), ("3".into(), String::new()));
    }

    #[test]
    fn diff_repeated_char_anchors_on_caret() {
        let (p, r) = (chars("11"), chars("111"));
        assert_eq!(EditDiff::compute(&p, &r, 3).prefix_len, 2);
        assert_eq!(EditDiff::compute(&p, &r, 1).prefix_len, 0);
        assert_eq!(EditDiff::compute(&p, &r, 1).suffix_len, 2);
    }

    #[test]
    fn diff_backspace_and_delete() {
        assert_eq!(diff("123", "13", 1), (String::new(), "2".into()));
        assert_eq!(diff("12.34", "1234", 2), (String::new(), ".".into()));
    }

    #[test]
    fn diff_paste_over_selection() {
        assert_eq!(diff("12.34", "1994", 3), ("99".into(), "2.3".into()));
    }

    #[test]
    fn diff_caret_past_end_is_clamped() {
        assert_eq!(diff("", "ab", 10), ("ab".into(), String::new()));
    }

    #[test]
    fn single_line_keeps_caret_on_same_char() {
        let edit = CursorEdit::new("12", "1\r\n2\n3", 5, EditType::Insert);
        let flat = edit.single_line();
        assert_eq!(flat.raw_input, "123");
        assert_eq!(flat.origin_offset, 2);

        let plain = CursorEdit::new("12", "123", 3, EditType::Insert);
        assert!(matches!(plain.single_line(), Cow::Borrowed(_)));
    }

    #[test]
    fn data_stream_strips_rendered_literals() {
        let tokens = tokenize("+1 ###");
        let edit = CursorEdit::new("+1 5", "+1 56", 5, EditType::Insert);
        let data = data_stream(&edit, &tokens);
        assert_eq!(data.chars, chars("56"));
        assert_eq!(data.origin, 2);
    }

    #[test]
    fn data_stream_keeps_typed_literal_lookalikes() {
        let tokens = tokenize("+1 ###");
        let edit = CursorEdit::new("", "1", 1, EditType::Insert);
        let data = data_stream(&edit, &tokens);
        assert_eq!(data.chars, chars("1"));
        assert_eq!(data.origin, 1);
    }

    #[test]
    fn data_stream_insert_in_middle() {
        let tokens = tokenize("##.##");
        let edit = CursorEdit::new("12.34", "152.34", 2, EditType::Insert);
        let data = data_stream(&edit, &tokens);
        assert_eq!(data.chars, chars("15234"));
        assert_eq!(data.origin, 2);
        assert_eq!(data.edit_start, 1);
        assert_eq!(data.untouched, 1);
    }

    #[test]
    fn data_stream_insert_after_literal() {
        let tokens = tokenize("##.##");
        let edit = CursorEdit::new("12.34", "12.x34", 4, EditType::Insert);
        let data = data_stream(&edit, &tokens);
        assert_eq!(data.chars, chars("12x34"));
        assert_eq!(data.origin, 3);
        assert_eq!(data.edit_start, 2);
        assert_eq!(data.untouched, 3);
    }

    #[test]
    fn data_stream_falls_back_to_raw_for_foreign_values() {
        let tokens = tokenize("##.##");
        let edit = CursorEdit::new("hello", "hello1", 6, EditType::Insert);
        let data = data_stream(&edit, &tokens);
        assert_eq!(data.chars, chars("hello1"));
        assert_eq!(data.origin, 6);
        assert_eq!(data.untouched, 0);
    }
}
