//! Mask pattern tokenizer.
//!
//! Pattern syntax (case-sensitive):
//! - `#` one digit
//! - `A` one letter
//! - `*` one letter or digit
//! - anything else is a literal, rendered verbatim
//!
//! There is no escape character; a literal `#`, `A` or `*` cannot be expressed.

/// Character class accepted by a placeholder slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Digit,
    Letter,
    AlphaNumeric,
}

impl CharClass {
    /// Returns `true` if `ch` may fill a slot of this class.
    #[inline]
    pub fn accepts(self, ch: char) -> bool {
        match self {
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::Letter => ch.is_alphabetic(),
            CharClass::AlphaNumeric => ch.is_ascii_digit() || ch.is_alphabetic(),
        }
    }

    /// The pattern symbol for this class.
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            CharClass::Digit => '#',
            CharClass::Letter => 'A',
            CharClass::AlphaNumeric => '*',
        }
    }

    #[inline]
    pub fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            '#' => Some(CharClass::Digit),
            'A' => Some(CharClass::Letter),
            '*' => Some(CharClass::AlphaNumeric),
            _ => None,
        }
    }
}

/// One slot of a compiled mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskToken {
    /// Rendered verbatim; consumes no input.
    Literal(char),
    /// Filled by exactly one accepted input char.
    Placeholder(CharClass),
}

impl MaskToken {
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, MaskToken::Placeholder(_))
    }

    /// Returns `true` if `ch` can sit in this slot of a rendered value.
    #[inline]
    pub fn accepts(&self, ch: char) -> bool {
        match *self {
            MaskToken::Literal(lit) => lit == ch,
            MaskToken::Placeholder(class) => class.accepts(ch),
        }
    }
}

/// Compile a pattern into its slot sequence.
///
/// An empty pattern yields an empty sequence, which the masker treats as
/// pass-through.
pub fn tokenize(pattern: &str) -> Vec<MaskToken> {
    let tokens: Vec<MaskToken> = pattern
        .chars()
        .map(|ch| match CharClass::from_symbol(ch) {
            Some(class) => MaskToken::Placeholder(class),
            None => MaskToken::Literal(ch),
        })
        .collect();
    log::trace!(target: "mask.tokenizer", "tokenized {pattern:?} into {} slots", tokens.len());
    tokens
}

/// Render a slot sequence back into pattern syntax.
pub fn pattern_of(tokens: &[MaskToken]) -> String {
    tokens
        .iter()
        .map(|token| match *token {
            MaskToken::Literal(ch) => ch,
            MaskToken::Placeholder(class) => class.symbol(),
        })
        .collect()
}

/// Returns `true` if `value` is a prefix of some rendering of `tokens`.
///
/// Every char must sit on its own slot: literals must match exactly and
/// placeholders must accept the char. Masked output always satisfies this,
/// which lets edit handling tell rendered literals apart from typed input.
pub fn is_rendering_of(value: &str, tokens: &[MaskToken]) -> bool {
    let mut slots = tokens.iter();
    value
        .chars()
        .all(|ch| slots.next().is_some_and(|slot| slot.accepts(ch)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use CharClass::*;
    use MaskToken::*;

    #[test]
    fn tokenize_maps_symbols_and_literals() {
        assert_eq!(
            tokenize("##.A*"),
            vec![
                Placeholder(Digit),
                Placeholder(Digit),
                Literal('.'),
                Placeholder(Letter),
                Placeholder(AlphaNumeric),
            ]
        );
    }

    #[test]
    fn tokenize_empty_pattern_is_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn symbols_are_case_sensitive() {
        assert_eq!(tokenize("a"), vec![Literal('a')]);
        assert_eq!(tokenize("A"), vec![Placeholder(Letter)]);
    }

    #[test]
    fn non_ascii_literals_survive() {
        assert_eq!(tokenize("€#"), vec![Literal('€'), Placeholder(Digit)]);
    }

    #[test]
    fn pattern_of_inverts_tokenize() {
        for pattern in ["", "##.##", "AAA-###-", "+1 (###) ###-####", "**/€"] {
            assert_eq!(pattern_of(&tokenize(pattern)), pattern);
        }
    }

    #[test]
    fn char_classes() {
        assert!(Digit.accepts('7'));
        assert!(!Digit.accepts('x'));
        assert!(!Digit.accepts('٣'), "only ASCII digits fill '#'");
        assert!(Letter.accepts('q'));
        assert!(Letter.accepts('É'));
        assert!(!Letter.accepts('1'));
        assert!(AlphaNumeric.accepts('1'));
        assert!(AlphaNumeric.accepts('z'));
        assert!(!AlphaNumeric.accepts('-'));
        assert!(!AlphaNumeric.accepts(' '));
    }

    #[test]
    fn rendering_check() {
        let tokens = tokenize("##.##");
        assert!(is_rendering_of("", &tokens));
        assert!(is_rendering_of("12.", &tokens));
        assert!(is_rendering_of("12.34", &tokens));
        assert!(!is_rendering_of("1234", &tokens));
        assert!(!is_rendering_of("12.345", &tokens));
        assert!(!is_rendering_of("1a", &tokens));
    }
}
