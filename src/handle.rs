//! Caller-owned registration handles.
//!
//! A [`CallbackHandle`] is the only thing keeping a registration alive. It
//! holds a weak back-reference to the registry that issued it, so it never
//! extends the registry's lifetime, and on drop it asks that registry to
//! remove its entry. If the registry is already gone the weak reference fails
//! to upgrade and the drop does nothing.

use std::fmt;
use std::rc::Weak;

use crate::callback_index::EntryId;

/// Receiving side of a handle drop.
///
/// Implemented by the registry's shared state. Handles store it as a trait
/// object so that one handle type serves registries of every parameter type.
pub(crate) trait Deregister {
    /// Removes the entry behind `id`. Unknown or already removed ids are ignored.
    fn remove_entry(&self, id: EntryId);
}

/// Opaque token returned by `register`.
///
/// Keep it for as long as the callback should stay registered. Dropping it, or
/// calling [`release`](CallbackHandle::release), removes the callback from its
/// registry immediately.
///
/// Handles compare equal only to themselves: two registrations with the same
/// key and callback yield two distinct handles.
#[must_use = "dropping the handle deregisters the callback immediately"]
pub struct CallbackHandle {
    id: EntryId,
    registry: Weak<dyn Deregister>,
}

impl CallbackHandle {
    pub(crate) fn new(id: EntryId, registry: Weak<dyn Deregister>) -> Self {
        Self { id, registry }
    }

    /// Deregisters the callback now.
    ///
    /// Equivalent to dropping the handle; provided so the intent reads
    /// explicitly at the call site.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for CallbackHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove_entry(self.id);
        }
    }
}

impl PartialEq for CallbackHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::addr_eq(self.registry.as_ptr(), other.registry.as_ptr())
    }
}

impl Eq for CallbackHandle {}

impl fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHandle")
            .field("id", &self.id)
            .field("registry_alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}
