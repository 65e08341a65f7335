//! A keyed callback registry whose registrations are owned by their handles.
//!
//! Callbacks are grouped under string keys and invoked together with a
//! parameter value. `register` returns a [`CallbackHandle`]; the callback stays
//! registered exactly as long as that handle is alive.
//!
//! # Examples
//!
//! ```
//! use keyed_callbacks::KeyedCallbacks;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let registry: KeyedCallbacks<u32> = KeyedCallbacks::new();
//! let total = Rc::new(Cell::new(0));
//!
//! let sink = Rc::clone(&total);
//! let handle = registry.register("tick", move |n| sink.set(sink.get() + *n));
//!
//! registry.invoke("tick", 5);
//! assert_eq!(total.get(), 5);
//!
//! drop(handle);
//! registry.invoke("tick", 5);
//! assert_eq!(total.get(), 5);
//! ```
//!
//! # Threading
//!
//! The registry and its handles are single-threaded (`!Send`, `!Sync`). Nothing
//! inside is locked; sharing registrations across threads requires a different
//! design guarded by an external lock.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::callback_index::{Callback, CallbackIndex, EntryId};
use crate::handle::{CallbackHandle, Deregister};
use crate::RegistryEvent;

/// User-supplied tracing callback, invoked with every [`RegistryEvent`].
pub type TraceCallback = dyn Fn(&RegistryEvent);

/// State shared between a registry and the weak back-references in its handles.
struct Shared<P> {
    index: RefCell<CallbackIndex<P>>,
    trace: RefCell<Option<Rc<TraceCallback>>>,
}

impl<P> Shared<P> {
    /// Emits an event to the trace callback, if one is set.
    ///
    /// The trace slot is not borrowed while the callback runs, so the callback
    /// may call back into the registry, including replacing itself.
    fn emit_event(&self, event: RegistryEvent) {
        let callback = self.trace.borrow().clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    fn lookup(&self, key: &str) -> Vec<Callback<P>> {
        let callbacks = self.index.borrow_mut().callbacks(key);
        log::trace!("lookup {key:?}: {} live callbacks", callbacks.len());
        callbacks
    }
}

impl<P> Deregister for Shared<P> {
    fn remove_entry(&self, id: EntryId) {
        // The borrow ends with this statement, before the entry is dropped. A
        // callback may own handles of this registry whose drop re-enters here.
        let removed = self.index.borrow_mut().remove(id);

        if let Some(entry) = removed {
            log::debug!("deregistered callback for key {:?}", entry.key);
            let key = entry.key.clone();
            drop(entry);
            self.emit_event(RegistryEvent::Deregister { key });
        }
    }
}

/// Keyed callback registry for callbacks taking a `&P`.
///
/// See the [module documentation](self) for an overview.
pub struct KeyedCallbacks<P> {
    shared: Rc<Shared<P>>,
}

impl<P: 'static> KeyedCallbacks<P> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty registry with room for `capacity` registrations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Rc::new(Shared {
                index: RefCell::new(CallbackIndex::with_capacity(capacity)),
                trace: RefCell::new(None),
            }),
        }
    }

    /// Registers `callback` under `key`.
    ///
    /// Callers must keep the returned handle alive for as long as they want
    /// the callback to be invoked. The callback is deregistered as soon as the
    /// handle is dropped.
    ///
    /// Every call creates a new registration, even for a key and callback that
    /// are already registered.
    pub fn register<F>(&self, key: impl Into<String>, callback: F) -> CallbackHandle
    where
        F: Fn(&P) + 'static,
    {
        self.register_rc(key, Rc::new(callback))
    }

    /// Registers an already shared callback under `key`.
    ///
    /// The same `Rc` may be registered several times; each registration is
    /// independent and owned by its own handle.
    pub fn register_rc(&self, key: impl Into<String>, callback: Callback<P>) -> CallbackHandle {
        let key = key.into();
        let id = self
            .shared
            .index
            .borrow_mut()
            .insert(key.clone(), callback);
        log::debug!("registered callback for key {key:?}");

        let back_reference: Weak<Shared<P>> = Rc::downgrade(&self.shared);
        let handle = CallbackHandle::new(id, back_reference);

        self.shared.emit_event(RegistryEvent::Register { key });
        handle
    }

    /// Invokes every live callback registered under `key`, in registration
    /// order, with `parameter`.
    ///
    /// The set of callbacks is captured before the first one runs: callbacks
    /// registered or dropped while this call is in progress take effect from
    /// the next call on. An unknown key is a no-op.
    pub fn invoke(&self, key: &str, parameter: P) {
        let callbacks = self.shared.lookup(key);
        log::trace!("invoking {} callbacks for key {key:?}", callbacks.len());
        self.shared.emit_event(RegistryEvent::Invoke {
            key: key.to_owned(),
            callbacks: callbacks.len(),
        });

        for callback in &callbacks {
            callback(&parameter);
        }
    }

    /// Returns the live callbacks registered under `key`, in registration order.
    pub fn callbacks_for_key(&self, key: &str) -> Vec<Callback<P>> {
        let callbacks = self.shared.lookup(key);
        self.shared.emit_event(RegistryEvent::Lookup {
            key: key.to_owned(),
            found: callbacks.len(),
        });
        callbacks
    }

    /// Number of live callbacks registered under `key`.
    ///
    /// Same view as [`callbacks_for_key`](Self::callbacks_for_key) without
    /// cloning the callbacks.
    pub fn callback_count(&self, key: &str) -> usize {
        let found = self.shared.index.borrow_mut().count(key);
        self.shared.emit_event(RegistryEvent::Lookup {
            key: key.to_owned(),
            found,
        });
        found
    }

    /// Checks whether `key` has at least one live callback.
    ///
    /// Emits the same `Lookup` event as [`callback_count`](Self::callback_count).
    pub fn contains_key(&self, key: &str) -> bool {
        self.callback_count(key) > 0
    }

    /// Live registrations across all keys.
    pub fn len(&self) -> usize {
        self.shared.index.borrow().len()
    }

    /// Checks whether no callback is registered under any key.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys with at least one live callback, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.shared.index.borrow().keys()
    }

    /// Sets a tracing callback invoked for every registry operation.
    ///
    /// Replaces any previously set callback. The callback runs with no internal
    /// state borrowed and may use the registry.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + 'static) {
        // The previous callback may own handles of this registry; drop it only
        // after the trace slot is no longer borrowed.
        let previous = self.shared.trace.replace(Some(Rc::new(callback)));
        drop(previous);
    }

    /// Clears the tracing callback.
    pub fn clear_trace_callback(&self) {
        let previous = self.shared.trace.replace(None);
        drop(previous);
    }
}

impl<P: 'static> Default for KeyedCallbacks<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for KeyedCallbacks<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = self.shared.index.borrow();
        f.debug_struct("KeyedCallbacks")
            .field("keys", &index.key_count())
            .field("entries", &index.len())
            .finish()
    }
}
