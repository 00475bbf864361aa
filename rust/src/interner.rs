//! Name interning in first-seen order.
//!
//! Aggregations keyed by name (per-supplier demand) keep their rows in a `Vec`
//! indexed by the interned slot, so output order follows traversal order
//! rather than hash order.

use rustc_hash::FxHashMap;

/// Interned name slot.
pub type NameSlot = usize;

#[derive(Debug, Clone, Default)]
pub struct NameInterner {
    to_slot: FxHashMap<String, NameSlot>,
}

impl NameInterner {
    /// Intern a name, returning its slot and whether it was new. Slots are
    /// handed out densely from 0.
    pub fn intern(&mut self, name: &str) -> (NameSlot, bool) {
        if let Some(&slot) = self.to_slot.get(name) {
            return (slot, false);
        }
        let slot = self.to_slot.len();
        self.to_slot.insert(name.to_string(), slot);
        (slot, true)
    }
}
