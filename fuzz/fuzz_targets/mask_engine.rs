#![no_main]

use libfuzzer_sys::fuzz_target;
use mask_core::{
    CursorEdit, EditType, MaskConfig, MaskModifiers, apply_mask, char_len, pattern_of, tokenize,
};

// Layout: [flags][pattern bytes] 0x00 [previous bytes] 0x00 [raw bytes]
fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let mut parts = rest.splitn(3, |b| *b == 0);
    let pattern = String::from_utf8_lossy(parts.next().unwrap_or_default());
    let previous = String::from_utf8_lossy(parts.next().unwrap_or_default());
    let raw = String::from_utf8_lossy(parts.next().unwrap_or_default());

    let modifiers = MaskModifiers {
        short: flags & 1 != 0,
        prefill: flags & 2 != 0,
    };
    let edit_type = match (flags >> 2) & 3 {
        0 => EditType::Insert,
        1 => EditType::Delete,
        _ => EditType::Unknown,
    };
    let tokens = tokenize(&pattern);
    assert_eq!(pattern_of(&tokens), pattern);

    let result = apply_mask(&raw, &tokens, modifiers);
    if tokens.is_empty() {
        assert_eq!(result.masked, raw);
        assert_eq!(result.unmasked, raw);
        return;
    }
    assert!(char_len(&result.masked) <= tokens.len());

    // Unmasked is an ordered subsequence of the input.
    let mut input = raw.chars();
    assert!(result.unmasked.chars().all(|c| input.any(|r| r == c)));

    // Round trip with display modifiers off.
    let plain = apply_mask(&raw, &tokens, MaskModifiers::NONE);
    let again = apply_mask(&plain.unmasked, &tokens, MaskModifiers::NONE);
    assert_eq!(again, plain);

    let origin = usize::from(flags >> 4) % (char_len(&raw) + 1);
    let config = MaskConfig::new(pattern.into_owned(), modifiers);
    let outcome = config.apply_edit(&CursorEdit::new(
        previous.into_owned(),
        raw.into_owned(),
        origin,
        edit_type,
    ));
    let cursor = outcome.cursor.unwrap_or(0);
    assert!(cursor <= char_len(&outcome.masked));
    assert!(char_len(&outcome.masked) <= tokens.len());
});
