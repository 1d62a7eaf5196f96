//! Field identity and liveness.
//!
//! [`FieldId`] is a plain `u64` key so the engine never couples to a DOM or
//! widget id type. [`FieldAnchor`] is the owning half of a liveness pair: the
//! host keeps the anchor next to its element, and the
//! [`MaskConfigStore`](crate::MaskConfigStore) only holds a `Weak` to it. When
//! the element (and with it the anchor) is dropped, the store entry goes stale
//! without any explicit teardown.

use std::rc::{Rc, Weak};

/// Opaque identifier for a bound text field.
///
/// The value has no meaning inside this crate; it is only a key. Integration
/// layers convert their native ids with `From`:
///
/// ```ignore
/// impl From<NodeId> for FieldId {
///     fn from(id: NodeId) -> Self {
///         FieldId::from_raw(id.0 as u64)
///     }
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u64);

impl FieldId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for FieldId {
    #[inline]
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<u32> for FieldId {
    #[inline]
    fn from(raw: u32) -> Self {
        Self::from_raw(raw as u64)
    }
}

impl From<FieldId> for u64 {
    #[inline]
    fn from(id: FieldId) -> Self {
        id.as_raw()
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// Liveness token owned by the host element a mask is bound to.
///
/// Not `Clone`: the anchor's lifetime is the element's lifetime as far as the
/// store is concerned.
#[derive(Debug)]
pub struct FieldAnchor {
    id: FieldId,
    alive: Rc<()>,
}

impl FieldAnchor {
    pub fn new(id: impl Into<FieldId>) -> Self {
        Self {
            id: id.into(),
            alive: Rc::new(()),
        }
    }

    #[inline]
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub(crate) fn watch(&self) -> Weak<()> {
        Rc::downgrade(&self.alive)
    }
}
