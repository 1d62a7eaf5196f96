//! Edit session replay.
//!
//! A session binds one simulated field and feeds it steps the way a user would
//! produce them: each typed char is its own input event, a paste is a single
//! event, caret moves and selections fire nothing. Caret and selection offsets
//! in session files are char offsets.
//!
//! ```toml
//! pattern = "(###) ###-####"
//! modifiers = []
//! initial = ""
//!
//! [[step]]
//! insert = "5551234567"
//! expect_value = "(555) 123-4567"
//! expect_caret = 14
//! ```

use anyhow::{Context, Result, bail};
use mask_binder::{FieldValueStore, MaskBinder};
use mask_core::{EditType, FieldAnchor, FieldId, MaskOptions, byte_to_char_offset, char_to_byte_offset};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub mask: MaskOptions,
    /// Field value before the mask is bound.
    #[serde(default)]
    pub initial: String,
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// One user action plus optional checks on the field afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    pub insert: Option<String>,
    pub paste: Option<String>,
    pub backspace: Option<usize>,
    pub delete: Option<usize>,
    pub caret: Option<usize>,
    pub select: Option<[usize; 2]>,
    pub select_all: bool,
    pub set_pattern: Option<String>,
    /// Modifiers for `set_pattern`.
    pub modifiers: Option<Vec<String>>,

    pub expect_value: Option<String>,
    pub expect_caret: Option<usize>,
    pub expect_unmasked: Option<String>,
}

#[derive(Debug)]
enum Action<'a> {
    Insert(&'a str),
    Paste(&'a str),
    Backspace(usize),
    Delete(usize),
    Caret(usize),
    Select(usize, usize),
    SelectAll,
    SetPattern(MaskOptions),
}

impl Step {
    fn action(&self) -> Result<Action<'_>> {
        let mut actions = Vec::new();
        if let Some(text) = &self.insert {
            actions.push(Action::Insert(text));
        }
        if let Some(text) = &self.paste {
            actions.push(Action::Paste(text));
        }
        if let Some(times) = self.backspace {
            actions.push(Action::Backspace(times));
        }
        if let Some(times) = self.delete {
            actions.push(Action::Delete(times));
        }
        if let Some(caret) = self.caret {
            actions.push(Action::Caret(caret));
        }
        if let Some([start, end]) = self.select {
            actions.push(Action::Select(start, end));
        }
        if self.select_all {
            actions.push(Action::SelectAll);
        }
        if let Some(pattern) = &self.set_pattern {
            actions.push(Action::SetPattern(MaskOptions {
                pattern: pattern.clone(),
                modifiers: self.modifiers.clone().unwrap_or_default(),
            }));
        } else if self.modifiers.is_some() {
            bail!("`modifiers` is only valid together with `set_pattern`");
        }

        if actions.len() != 1 {
            bail!("expected exactly one action, found {}", actions.len());
        }
        actions.pop().context("step has no action")
    }
}

impl Action<'_> {
    fn label(&self) -> String {
        match self {
            Action::Insert(text) => format!("insert {text:?}"),
            Action::Paste(text) => format!("paste {text:?}"),
            Action::Backspace(times) => format!("backspace x{times}"),
            Action::Delete(times) => format!("delete x{times}"),
            Action::Caret(caret) => format!("caret {caret}"),
            Action::Select(start, end) => format!("select {start}..{end}"),
            Action::SelectAll => "select all".to_string(),
            Action::SetPattern(options) => format!("set_pattern {:?}", options.pattern),
        }
    }
}

/// Printed step lines and failed expectations.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub steps: Vec<String>,
    pub failures: Vec<String>,
}

struct Replayer {
    binder: MaskBinder,
    host: FieldValueStore,
    id: FieldId,
}

impl Replayer {
    fn value(&self) -> &str {
        self.host.get(self.id).unwrap_or_default()
    }

    fn caret(&self) -> usize {
        byte_to_char_offset(self.value(), self.host.caret_of(self.id).unwrap_or(0))
    }

    fn byte_offset(&self, chars: usize) -> usize {
        char_to_byte_offset(self.value(), chars)
    }

    /// Fire an input event if the host value actually changed.
    fn notify(&mut self, before_rev: u64, edit_type: EditType) -> Result<()> {
        if self.host.value_revision(self.id) == before_rev {
            return Ok(());
        }
        self.binder.handle_input(self.id, edit_type, &mut self.host)?;
        Ok(())
    }

    fn run(&mut self, action: Action<'_>) -> Result<()> {
        match action {
            Action::Insert(text) => {
                let mut buf = [0u8; 4];
                for ch in text.chars() {
                    let rev = self.host.value_revision(self.id);
                    self.host.insert_text(self.id, ch.encode_utf8(&mut buf));
                    self.notify(rev, EditType::Insert)?;
                }
            }
            Action::Paste(text) => {
                let rev = self.host.value_revision(self.id);
                self.host.paste(self.id, text);
                self.notify(rev, EditType::Insert)?;
            }
            Action::Backspace(times) => {
                for _ in 0..times {
                    let rev = self.host.value_revision(self.id);
                    self.host.backspace(self.id);
                    self.notify(rev, EditType::Delete)?;
                }
            }
            Action::Delete(times) => {
                for _ in 0..times {
                    let rev = self.host.value_revision(self.id);
                    self.host.delete(self.id);
                    self.notify(rev, EditType::Delete)?;
                }
            }
            Action::Caret(caret) => {
                let caret = self.byte_offset(caret);
                self.host.set_caret(self.id, caret, false);
            }
            Action::Select(start, end) => {
                let (start, end) = (self.byte_offset(start), self.byte_offset(end));
                self.host.select(self.id, start, end);
            }
            Action::SelectAll => self.host.select_all(self.id),
            Action::SetPattern(options) => {
                self.binder.update(self.id, &options, &mut self.host)?;
            }
        }
        Ok(())
    }

    fn describe(&self, n: usize, label: &str) -> String {
        format!(
            "{n:>3} {label:<24} {:?} caret={} unmasked={:?}",
            self.value(),
            self.caret(),
            self.binder.unmasked(self.id).unwrap_or_default()
        )
    }

    fn check(&self, n: usize, label: &str, step: &Step, failures: &mut Vec<String>) {
        if let Some(expected) = &step.expect_value {
            if self.value() != expected.as_str() {
                failures.push(format!(
                    "step {n} ({label}): expected value {expected:?}, got {:?}",
                    self.value()
                ));
            }
        }
        if let Some(expected) = step.expect_caret {
            if self.caret() != expected {
                failures.push(format!(
                    "step {n} ({label}): expected caret {expected}, got {}",
                    self.caret()
                ));
            }
        }
        if let Some(expected) = &step.expect_unmasked {
            let unmasked = self.binder.unmasked(self.id).unwrap_or_default();
            if unmasked != expected.as_str() {
                failures.push(format!(
                    "step {n} ({label}): expected unmasked {expected:?}, got {unmasked:?}"
                ));
            }
        }
    }
}

/// Run every step of `session` against a fresh field.
///
/// Errors are session problems (bad step, unknown modifier); failed
/// expectations are collected in the report instead.
pub fn replay(session: &Session) -> Result<ReplayReport> {
    let anchor = FieldAnchor::new(1u64);
    let mut replayer = Replayer {
        binder: MaskBinder::new(),
        host: FieldValueStore::new(),
        id: anchor.id(),
    };
    replayer.host.insert_field(anchor.id(), &session.initial);
    replayer
        .binder
        .bind(&anchor, session.mask.clone(), &mut replayer.host)
        .context("failed to bind mask")?;

    let mut report = ReplayReport::default();
    report.steps.push(replayer.describe(0, "bind"));

    for (i, step) in session.steps.iter().enumerate() {
        let n = i + 1;
        let action = step.action().with_context(|| format!("invalid step {n}"))?;
        let label = action.label();
        log::debug!(target: "maskfield.replay", "step {n}: {label}");
        replayer
            .run(action)
            .with_context(|| format!("step {n} ({label}) failed"))?;
        report.steps.push(replayer.describe(n, &label));
        replayer.check(n, &label, step, &mut report.failures);
    }
    Ok(report)
}
