//! Cursor repositioning after an edit.
//!
//! The caret lands right after the last input char that a placeholder accepted
//! at or before the edit origin, in the coordinates of the new masked value.
//! Chars that were rejected do not move the caret, so typing a bad char leaves
//! it one position before where the native field put it, wherever in the
//! field that happens.
//!
//! Literals are skipped forward only when inserting at the frontier (the next
//! placeholder is still empty), so `12` typed into `##.##` puts the caret after
//! the `.`. Deletions never skip forward, otherwise backspace would get stuck
//! in front of a literal. An insert that was rejected outright keeps the
//! literals the caret had already passed before the edit.

use crate::edit::{CursorEdit, DataStream, EditType, data_stream};
use crate::masker::{MaskModifiers, MaskResult, MaskWalk, walk_mask};
use crate::text::char_len;
use crate::token::MaskToken;

/// New caret (char offset into `result.masked`) for `edit`.
///
/// `result` must be the masking of the same edit with the same `tokens`. With
/// no tokens the origin is returned unchanged; hosts should leave the native
/// caret alone in that case.
pub fn reposition(edit: &CursorEdit, result: &MaskResult, tokens: &[MaskToken]) -> usize {
    if tokens.is_empty() {
        return edit.origin_offset;
    }
    let edit = edit.single_line();
    let data = data_stream(&edit, tokens);
    // Acceptance does not depend on display modifiers.
    let walk = walk_mask(&data.chars, tokens, MaskModifiers::NONE);
    caret_after_edit(tokens, &data, &walk, edit.edit_type, char_len(&result.masked))
}

/// Caret for an edit whose input is `data` and whose masking pass is `walk`.
pub(crate) fn caret_after_edit(
    tokens: &[MaskToken],
    data: &DataStream,
    walk: &MaskWalk,
    edit_type: EditType,
    masked_len: usize,
) -> usize {
    let accepted = walk.accepted_before(data.origin);
    let rejected_insert = edit_type == EditType::Insert
        && data.edit_start < data.origin
        && walk.accepted_before(data.edit_start) == accepted;
    let carry_to = if rejected_insert { data.untouched } else { 0 };
    place_cursor(tokens, accepted, walk.filled, edit_type, carry_to, masked_len)
}

/// Caret after the `accepted`-th filled placeholder.
///
/// `filled` is the total number of filled placeholders, `masked_len` the char
/// length of the rendered value the caret must stay within. Literals up to
/// `carry_to` are always skipped.
pub(crate) fn place_cursor(
    tokens: &[MaskToken],
    accepted: usize,
    filled: usize,
    edit_type: EditType,
    carry_to: usize,
    masked_len: usize,
) -> usize {
    let mut pos = 0usize;
    if accepted > 0 {
        let mut seen = 0usize;
        for (k, token) in tokens.iter().enumerate() {
            if token.is_placeholder() {
                seen += 1;
                if seen == accepted {
                    pos = k + 1;
                    break;
                }
            }
        }
    }

    let at_frontier = accepted == filled && edit_type == EditType::Insert;
    let limit = if accepted == 0 || at_frontier {
        tokens.len()
    } else {
        carry_to.min(tokens.len())
    };
    while pos < limit && !tokens[pos].is_placeholder() {
        pos += 1;
    }

    let pos = pos.min(masked_len);
    log::trace!(
        target: "mask.cursor",
        "accepted={accepted} filled={filled} carry_to={carry_to} {edit_type:?} -> caret {pos}"
    );
    pos
}
