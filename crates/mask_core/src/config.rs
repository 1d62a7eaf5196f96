//! Live mask configuration for one field.

use crate::cursor::caret_after_edit;
use crate::edit::{CursorEdit, data_stream};
use crate::error::MaskError;
use crate::masker::{MaskModifiers, MaskResult, apply_mask, walk_mask};
use crate::text::{char_len, filter_single_line};
use crate::token::{MaskToken, tokenize};

/// Host-side description of a mask: the pattern and modifier names, as they
/// appear in the host's own configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaskOptions {
    pub pattern: String,
    pub modifiers: Vec<String>,
}

impl MaskOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, name: impl Into<String>) -> Self {
        self.modifiers.push(name.into());
        self
    }

    pub fn parse_modifiers(&self) -> Result<MaskModifiers, MaskError> {
        MaskModifiers::from_names(&self.modifiers)
    }

    pub fn into_config(self) -> Result<MaskConfig, MaskError> {
        let modifiers = self.parse_modifiers()?;
        Ok(MaskConfig::new(self.pattern, modifiers))
    }
}

/// Result of handling one edit; this is what the host re-emits to its observers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub masked: String,
    pub unmasked: String,
    /// New caret as a char offset into `masked`; `None` when no mask is active
    /// and the native caret should be left alone.
    pub cursor: Option<usize>,
}

impl EditOutcome {
    pub fn result(&self) -> MaskResult {
        MaskResult {
            masked: self.masked.clone(),
            unmasked: self.unmasked.clone(),
        }
    }
}

/// Pattern, compiled slots and modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    pattern: String,
    tokens: Vec<MaskToken>,
    modifiers: MaskModifiers,
}

impl MaskConfig {
    pub fn new(pattern: impl Into<String>, modifiers: MaskModifiers) -> Self {
        let pattern = pattern.into();
        let tokens = tokenize(&pattern);
        Self {
            pattern,
            tokens,
            modifiers,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn tokens(&self) -> &[MaskToken] {
        &self.tokens
    }

    pub fn modifiers(&self) -> MaskModifiers {
        self.modifiers
    }

    /// No slots: values pass through untouched.
    pub fn is_passthrough(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Replace pattern and modifiers, re-tokenizing.
    ///
    /// Returns `true` if anything changed.
    pub fn update(&mut self, pattern: &str, modifiers: MaskModifiers) -> bool {
        let changed = self.pattern != pattern || self.modifiers != modifiers;
        if self.pattern != pattern {
            self.pattern = pattern.to_string();
            self.tokens = tokenize(pattern);
        }
        self.modifiers = modifiers;
        changed
    }

    /// Mask a whole value with no edit context (initial bind, pattern change,
    /// field swap).
    pub fn apply(&self, raw: &str) -> MaskResult {
        apply_mask(&filter_single_line(raw), &self.tokens, self.modifiers)
    }

    /// Mask the result of one native edit and place the caret.
    ///
    /// Line breaks in the raw value are dropped, as in [`MaskConfig::apply`].
    pub fn apply_edit(&self, edit: &CursorEdit) -> EditOutcome {
        let edit = edit.single_line();
        if self.is_passthrough() {
            return EditOutcome {
                masked: edit.raw_input.clone(),
                unmasked: edit.raw_input.clone(),
                cursor: None,
            };
        }

        let data = data_stream(&edit, &self.tokens);
        let walk = walk_mask(&data.chars, &self.tokens, self.modifiers);
        let cursor = caret_after_edit(
            &self.tokens,
            &data,
            &walk,
            edit.edit_type,
            char_len(&walk.result.masked),
        );

        EditOutcome {
            masked: walk.result.masked,
            unmasked: walk.result.unmasked,
            cursor: Some(cursor),
        }
    }
}
