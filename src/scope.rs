//! Grouped ownership of callback handles.

use crate::CallbackHandle;

/// Holds handles for a group of registrations that share a lifetime.
///
/// Typical use is a component that registers several callbacks and wants all
/// of them gone when it goes away: store a `CallbackScope` as a field and
/// [`hold`](CallbackScope::hold) every handle in it.
///
/// Handles are released in the order they were added, either when the scope
/// is dropped or on [`release_all`](CallbackScope::release_all).
///
/// # Examples
///
/// ```
/// use keyed_callbacks::{CallbackScope, KeyedCallbacks};
///
/// let registry: KeyedCallbacks<()> = KeyedCallbacks::new();
/// {
///     let mut scope = CallbackScope::new();
///     scope.hold(registry.register("opened", |_| {}));
///     scope.hold(registry.register("closed", |_| {}));
///     assert_eq!(registry.len(), 2);
/// }
/// assert!(registry.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct CallbackScope {
    handles: Vec<CallbackHandle>,
}

impl CallbackScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `handle`, keeping its callback registered for the
    /// lifetime of this scope.
    pub fn hold(&mut self, handle: CallbackHandle) {
        self.handles.push(handle);
    }

    /// Number of handles currently held.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Checks whether the scope holds no handles.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drops every held handle now. The scope stays usable afterwards.
    pub fn release_all(&mut self) {
        self.handles.clear();
    }
}

impl Extend<CallbackHandle> for CallbackScope {
    fn extend<I: IntoIterator<Item = CallbackHandle>>(&mut self, iter: I) {
        self.handles.extend(iter);
    }
}

impl FromIterator<CallbackHandle> for CallbackScope {
    fn from_iter<I: IntoIterator<Item = CallbackHandle>>(iter: I) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}
