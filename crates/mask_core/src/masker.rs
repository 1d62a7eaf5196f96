//! Value masker: raw text + slot sequence -> `{masked, unmasked}`.
//!
//! The walk reads input left to right. Each placeholder skips input chars its
//! class rejects (they are dropped silently) and takes the first accepted one.
//! Literals are collected into a pending run that is committed in front of the
//! next filled placeholder, so a run is only ever shown once the input has
//! reached it. When input runs out at a placeholder the walk stops; what
//! happens to the pending run at that point is decided by the modifiers:
//!
//! | filled slots | `short` | `prefill` | pending run |
//! |---|---|---|---|
//! | none | any | off | hidden |
//! | none | any | on | shown (`+1 ###` + `` => `+1 `) |
//! | some | off | any | shown (`##.##` + `12` => `12.`) |
//! | some | on | any | trimmed (`##.##` + `12` => `12`) |

use crate::error::MaskError;
use crate::token::MaskToken;
use std::str::FromStr;

/// Display modifiers for a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaskModifiers {
    /// Trim trailing literals after the last filled placeholder.
    pub short: bool,
    /// Render leading literals even when nothing is filled yet.
    pub prefill: bool,
}

impl MaskModifiers {
    pub const NONE: MaskModifiers = MaskModifiers {
        short: false,
        prefill: false,
    };

    /// Build modifiers from their names, as a host configuration lists them.
    pub fn from_names<I, S>(names: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = MaskModifiers::NONE;
        for name in names {
            out.set(name.as_ref().parse()?);
        }
        Ok(out)
    }

    pub fn set(&mut self, modifier: MaskModifier) {
        match modifier {
            MaskModifier::Short => self.short = true,
            MaskModifier::Prefill => self.prefill = true,
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.short {
            out.push(MaskModifier::Short.name());
        }
        if self.prefill {
            out.push(MaskModifier::Prefill.name());
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskModifier {
    Short,
    Prefill,
}

impl MaskModifier {
    pub fn name(self) -> &'static str {
        match self {
            MaskModifier::Short => "short",
            MaskModifier::Prefill => "prefill",
        }
    }
}

impl FromStr for MaskModifier {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "short" => Ok(MaskModifier::Short),
            "prefill" => Ok(MaskModifier::Prefill),
            other => Err(MaskError::UnknownModifier(other.to_string())),
        }
    }
}

/// Output of one masking pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaskResult {
    /// Display string, literals included.
    pub masked: String,
    /// Only the chars that filled placeholders, in order.
    pub unmasked: String,
}

impl MaskResult {
    pub fn passthrough(raw: &str) -> Self {
        Self {
            masked: raw.to_string(),
            unmasked: raw.to_string(),
        }
    }
}

/// A masking pass plus per-input bookkeeping for cursor placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskWalk {
    pub result: MaskResult,
    /// `accepted[i]` is `true` if input char `i` filled a placeholder.
    pub accepted: Vec<bool>,
    /// Number of placeholders filled.
    pub filled: usize,
}

impl MaskWalk {
    /// Accepted input chars strictly before input index `end`.
    pub fn accepted_before(&self, end: usize) -> usize {
        self.accepted.iter().take(end).filter(|a| **a).count()
    }
}

/// Apply `tokens` to `raw`.
///
/// Never fails: rejected chars are dropped, input past the last placeholder is
/// ignored, and an empty slot sequence passes `raw` through unchanged.
pub fn apply_mask(raw: &str, tokens: &[MaskToken], modifiers: MaskModifiers) -> MaskResult {
    if tokens.is_empty() {
        return MaskResult::passthrough(raw);
    }
    let input: Vec<char> = raw.chars().collect();
    walk_mask(&input, tokens, modifiers).result
}

/// The masking walk over pre-split input.
pub fn walk_mask(input: &[char], tokens: &[MaskToken], modifiers: MaskModifiers) -> MaskWalk {
    if tokens.is_empty() {
        let raw: String = input.iter().collect();
        return MaskWalk {
            result: MaskResult::passthrough(&raw),
            accepted: vec![true; input.len()],
            filled: input.len(),
        };
    }

    let mut masked = String::with_capacity(tokens.len());
    let mut unmasked = String::with_capacity(tokens.len());
    let mut accepted = vec![false; input.len()];
    let mut pending = String::new();
    let mut filled = 0usize;
    let mut i = 0usize;

    for token in tokens {
        match *token {
            MaskToken::Literal(ch) => pending.push(ch),
            MaskToken::Placeholder(class) => {
                while i < input.len() && !class.accepts(input[i]) {
                    log::trace!(target: "mask.masker", "dropping {:?} at {i}", input[i]);
                    i += 1;
                }
                let Some(&ch) = input.get(i) else {
                    break;
                };
                masked.push_str(&pending);
                pending.clear();
                masked.push(ch);
                unmasked.push(ch);
                accepted[i] = true;
                filled += 1;
                i += 1;
            }
        }
    }

    let keep_pending = if filled == 0 {
        modifiers.prefill
    } else {
        !modifiers.short
    };
    if keep_pending {
        masked.push_str(&pending);
    }

    if i < input.len() {
        log::trace!(
            target: "mask.masker",
            "ignoring {} input chars past the last slot",
            input.len() - i
        );
    }

    MaskWalk {
        result: MaskResult { masked, unmasked },
        accepted,
        filled,
    }
}
