//! Side table of mask configuration keyed by field identity.
//!
//! The store never owns the field. Each entry watches the field's
//! [`FieldAnchor`] through a `Weak`, so an element that is dropped without an
//! explicit unbind simply stops resolving; [`MaskConfigStore::prune`] reclaims
//! such entries, and [`MaskConfigStore::set`] runs it opportunistically so
//! high-churn lists do not accumulate dead entries.

use crate::config::MaskConfig;
use crate::id::{FieldAnchor, FieldId};
use crate::masker::MaskResult;
use std::collections::HashMap;
use std::rc::Weak;

/// Sweep dead entries on `set` once the table has grown this much since the
/// last sweep.
const PRUNE_GROWTH: usize = 64;

#[derive(Debug)]
struct Entry {
    alive: Weak<()>,
    config: MaskConfig,
    /// Last value written to the field; the previous masked value for the
    /// next edit and the exposed unmasked value.
    last: MaskResult,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.alive.strong_count() > 0
    }
}

/// Mask configuration per bound field.
///
/// # Example
///
/// ```
/// use mask_core::{FieldAnchor, MaskConfig, MaskConfigStore, MaskModifiers};
///
/// let mut store = MaskConfigStore::new();
/// let anchor = FieldAnchor::new(1u64);
/// store.set(&anchor, MaskConfig::new("##.##", MaskModifiers::NONE));
/// assert_eq!(store.get(anchor.id()).map(|c| c.pattern()), Some("##.##"));
///
/// let id = anchor.id();
/// drop(anchor);
/// assert!(store.get(id).is_none());
/// ```
#[derive(Debug, Default)]
pub struct MaskConfigStore {
    entries: HashMap<FieldId, Entry>,
    len_at_last_prune: usize,
}

impl MaskConfigStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            len_at_last_prune: 0,
        }
    }

    /// Associate `config` with the anchored field, replacing any previous
    /// entry. The recorded last result is reset.
    pub fn set(&mut self, anchor: &FieldAnchor, config: MaskConfig) {
        if self.entries.len() >= self.len_at_last_prune + PRUNE_GROWTH {
            self.prune();
        }
        log::debug!(target: "mask.store", "set {} -> {:?}", anchor.id(), config.pattern());
        self.entries.insert(
            anchor.id(),
            Entry {
                alive: anchor.watch(),
                config,
                last: MaskResult::default(),
            },
        );
    }

    fn live(&self, id: FieldId) -> Option<&Entry> {
        self.entries.get(&id).filter(|e| e.is_live())
    }

    fn live_mut(&mut self, id: FieldId) -> Option<&mut Entry> {
        self.entries.get_mut(&id).filter(|e| e.is_live())
    }

    /// Config for a live field; `None` if never bound, removed, or dropped.
    pub fn get(&self, id: FieldId) -> Option<&MaskConfig> {
        self.live(id).map(|e| &e.config)
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut MaskConfig> {
        self.live_mut(id).map(|e| &mut e.config)
    }

    /// Config and last written result together, for edit handling.
    pub fn get_with_last(&self, id: FieldId) -> Option<(&MaskConfig, &MaskResult)> {
        self.live(id).map(|e| (&e.config, &e.last))
    }

    pub fn is_live(&self, id: FieldId) -> bool {
        self.live(id).is_some()
    }

    /// Drop the entry eagerly, returning its config if it was still live.
    pub fn remove(&mut self, id: FieldId) -> Option<MaskConfig> {
        let entry = self.entries.remove(&id)?;
        log::debug!(target: "mask.store", "remove {id}");
        entry.is_live().then_some(entry.config)
    }

    /// Move a live entry, config and last result included, to a new anchor.
    ///
    /// Used when the host swaps the native element behind a bound field.
    /// Returns `false` if `from` is not live; nothing changes in that case.
    pub fn rekey(&mut self, from: FieldId, to: &FieldAnchor) -> bool {
        if !self.is_live(from) {
            return false;
        }
        let Some(entry) = self.entries.remove(&from) else {
            return false;
        };
        log::debug!(target: "mask.store", "rekey {from} -> {}", to.id());
        self.entries.insert(
            to.id(),
            Entry {
                alive: to.watch(),
                ..entry
            },
        );
        true
    }

    /// Last result written to the field.
    pub fn last_result(&self, id: FieldId) -> Option<&MaskResult> {
        self.live(id).map(|e| &e.last)
    }

    /// Record what was written to the field. Returns `false` if the field is
    /// not live.
    pub fn record_result(&mut self, id: FieldId, result: MaskResult) -> bool {
        match self.live_mut(id) {
            Some(entry) => {
                entry.last = result;
                true
            }
            None => false,
        }
    }

    /// Remove every entry whose field was dropped. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live());
        self.len_at_last_prune = self.entries.len();
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::debug!(target: "mask.store", "pruned {pruned} dead entries");
        }
        pruned
    }

    /// Number of entries, including dead ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.len_at_last_prune = 0;
    }
}
