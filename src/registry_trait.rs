//! Core trait for named, thread-local callback registries.
//!
//! This module provides the `KeyedCallbacksApi` trait with default
//! implementations for registration, invocation, introspection and tracing.
//! Implementors only supply the thread-local that holds their registry; the
//! `define_callbacks!` macro generates such an implementor.

use std::thread::LocalKey;

use crate::{Callback, CallbackHandle, KeyedCallbacks, RegistryEvent};

/// Core trait defining named registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// the `registry` accessor to be implemented.
///
/// Each thread sees its own registry instance. Handles obtained on one thread
/// deregister from that thread's instance only.
pub trait KeyedCallbacksApi {
    /// Parameter type passed to the callbacks of this registry.
    type Params: 'static;

    /// Access the thread-local registry.
    ///
    /// This method must be implemented to provide access to the registry's storage.
    fn registry() -> &'static LocalKey<KeyedCallbacks<Self::Params>>;

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + 'static) {
        Self::registry().with(|registry| registry.set_trace_callback(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Note: This does not affect registered callbacks, only the tracing callback.
    fn clear_trace_callback(&self) {
        Self::registry().with(|registry| registry.clear_trace_callback());
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Register a callback under `key`.
    ///
    /// The callback stays registered while the returned handle is alive.
    fn register<F>(&self, key: impl Into<String>, callback: F) -> CallbackHandle
    where
        F: Fn(&Self::Params) + 'static,
    {
        Self::registry().with(|registry| registry.register(key, callback))
    }

    /// Register an already shared callback under `key`.
    fn register_rc(
        &self,
        key: impl Into<String>,
        callback: Callback<Self::Params>,
    ) -> CallbackHandle {
        Self::registry().with(|registry| registry.register_rc(key, callback))
    }

    /// Invoke the live callbacks registered under `key` with `parameter`.
    ///
    /// Callbacks may use this registry again while running.
    fn invoke(&self, key: &str, parameter: Self::Params) {
        // The thread-local is only borrowed shared, so a callback reentering
        // `with` on the same key is fine.
        Self::registry().with(|registry| registry.invoke(key, parameter));
    }

    /// Live callbacks registered under `key`, in registration order.
    fn callbacks_for_key(&self, key: &str) -> Vec<Callback<Self::Params>> {
        Self::registry().with(|registry| registry.callbacks_for_key(key))
    }

    /// Number of live callbacks registered under `key`.
    fn callback_count(&self, key: &str) -> usize {
        Self::registry().with(|registry| registry.callback_count(key))
    }

    /// Check if `key` has at least one live callback.
    fn contains_key(&self, key: &str) -> bool {
        Self::registry().with(|registry| registry.contains_key(key))
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
