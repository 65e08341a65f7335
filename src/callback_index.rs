//! Slot arena and per-key ordering for registered callbacks.
//!
//! Entries live in a vector of slots owned by the registry. A slot is recycled
//! once its entry is removed, but every entry gets a fresh serial number from a
//! registry-wide counter, so an [`EntryId`] held by a dropped handle can never
//! match a newer entry that reused the same slot.
//!
//! The key index stores ids only. Looking up a key yields the callbacks whose
//! ids still resolve to a live entry and prunes the ones that do not.

use std::collections::HashMap;
use std::rc::Rc;

/// Shared, type-erased callback taking the registry parameter by reference.
pub type Callback<P> = Rc<dyn Fn(&P)>;

/// Identifies one registration inside one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EntryId {
    slot: usize,
    serial: u64,
}

pub(crate) struct Entry<P> {
    pub(crate) key: String,
    pub(crate) callback: Callback<P>,
}

struct Slot<P> {
    serial: u64,
    entry: Option<Entry<P>>,
}

pub(crate) struct CallbackIndex<P> {
    slots: Vec<Slot<P>>,
    free: Vec<usize>,
    next_serial: u64,
    keys: HashMap<String, Vec<EntryId>>,
}

impl<P> CallbackIndex<P> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            next_serial: 0,
            keys: HashMap::new(),
        }
    }

    /// Stores a new entry and appends its id to the tail of the key's list.
    pub(crate) fn insert(&mut self, key: String, callback: Callback<P>) -> EntryId {
        let serial = self.next_serial;
        self.next_serial += 1;

        let entry = Entry {
            key: key.clone(),
            callback,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Slot {
                    serial,
                    entry: Some(entry),
                };
                slot
            }
            None => {
                self.slots.push(Slot {
                    serial,
                    entry: Some(entry),
                });
                self.slots.len() - 1
            }
        };

        let id = EntryId { slot, serial };
        self.keys.entry(key).or_default().push(id);
        id
    }

    /// Removes the entry behind `id` and unlinks it from its key.
    ///
    /// Returns `None` when the id is stale or was already removed. The entry is
    /// handed back so the caller decides when its callback is dropped.
    pub(crate) fn remove(&mut self, id: EntryId) -> Option<Entry<P>> {
        let slot = self.slots.get_mut(id.slot)?;
        if slot.serial != id.serial {
            return None;
        }
        let entry = slot.entry.take()?;
        self.free.push(id.slot);

        if let Some(ids) = self.keys.get_mut(&entry.key) {
            ids.retain(|candidate| *candidate != id);
            if ids.is_empty() {
                self.keys.remove(&entry.key);
            }
        }

        Some(entry)
    }

    fn resolve(&self, id: EntryId) -> Option<&Entry<P>> {
        self.slots
            .get(id.slot)
            .filter(|slot| slot.serial == id.serial)
            .and_then(|slot| slot.entry.as_ref())
    }

    /// Drops ids that no longer resolve to a live entry from the key's list.
    ///
    /// Returns the number of ids removed.
    fn prune(&mut self, key: &str) -> usize {
        let Some(ids) = self.keys.get(key) else {
            return 0;
        };
        let stale = ids.iter().filter(|id| self.resolve(**id).is_none()).count();
        if stale == 0 {
            return 0;
        }

        let slots = &self.slots;
        if let Some(ids) = self.keys.get_mut(key) {
            ids.retain(|id| {
                slots
                    .get(id.slot)
                    .is_some_and(|slot| slot.serial == id.serial && slot.entry.is_some())
            });
            if ids.is_empty() {
                self.keys.remove(key);
            }
        }

        log::trace!("pruned {stale} stale entries for key {key:?}");
        stale
    }

    /// Live callbacks for `key`, in registration order.
    pub(crate) fn callbacks(&mut self, key: &str) -> Vec<Callback<P>> {
        self.prune(key);
        self.keys
            .get(key)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.resolve(*id))
                    .map(|entry| Rc::clone(&entry.callback))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of live callbacks for `key`.
    pub(crate) fn count(&mut self, key: &str) -> usize {
        self.prune(key);
        self.keys.get(key).map_or(0, Vec::len)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn noop() -> Callback<()> {
        Rc::new(|_: &()| {})
    }

    fn recording(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Callback<()> {
        let log = Rc::clone(log);
        Rc::new(move |_: &()| log.borrow_mut().push(name))
    }

    #[test]
    fn test_insert_preserves_order_per_key() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut index = CallbackIndex::with_capacity(4);

        index.insert("a".into(), recording(&log, "first"));
        index.insert("b".into(), recording(&log, "other"));
        index.insert("a".into(), recording(&log, "second"));

        for callback in index.callbacks("a") {
            callback(&());
        }
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_remove_drops_empty_key() {
        let mut index = CallbackIndex::with_capacity(0);
        let id = index.insert("a".into(), noop());

        assert_eq!(index.key_count(), 1);
        let removed = index.remove(id).expect("entry should be live");
        assert_eq!(removed.key, "a");
        assert_eq!(index.key_count(), 0);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut index = CallbackIndex::with_capacity(0);
        let id = index.insert("a".into(), noop());
        let _keep = index.insert("a".into(), noop());

        assert!(index.remove(id).is_some());
        assert!(index.remove(id).is_none());
        assert_eq!(index.count("a"), 1);
    }

    #[test]
    fn test_recycled_slot_rejects_old_id() {
        let mut index = CallbackIndex::with_capacity(0);
        let old = index.insert("a".into(), noop());
        index.remove(old);

        let new = index.insert("a".into(), noop());
        assert_eq!(old.slot, new.slot);
        assert_ne!(old, new);

        assert!(index.remove(old).is_none());
        assert_eq!(index.count("a"), 1);
    }

    #[test]
    fn test_lookup_prunes_stale_ids() {
        let mut index = CallbackIndex::with_capacity(0);
        let first = index.insert("a".into(), noop());
        let _second = index.insert("a".into(), noop());

        // Free the slot without unlinking it, leaving a dangling id behind.
        index.slots[first.slot].entry = None;
        index.free.push(first.slot);

        assert_eq!(index.keys["a"].len(), 2);
        assert_eq!(index.callbacks("a").len(), 1);
        assert_eq!(index.keys["a"].len(), 1);
    }

    #[test]
    fn test_lookup_prunes_key_when_all_stale() {
        let mut index = CallbackIndex::with_capacity(0);
        let only = index.insert("a".into(), noop());
        index.slots[only.slot].entry = None;
        index.free.push(only.slot);

        assert_eq!(index.count("a"), 0);
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_unknown_key_is_empty() {
        let mut index: CallbackIndex<()> = CallbackIndex::with_capacity(0);
        assert!(index.callbacks("missing").is_empty());
        assert_eq!(index.count("missing"), 0);
        assert_eq!(index.prune("missing"), 0);
    }

    #[test]
    fn test_keys_sorted() {
        let mut index = CallbackIndex::with_capacity(0);
        index.insert("zeta".into(), noop());
        index.insert("alpha".into(), noop());
        index.insert("alpha".into(), noop());

        assert_eq!(index.keys(), vec!["alpha".to_string(), "zeta".to_string()]);
        assert_eq!(index.len(), 3);
    }
}
