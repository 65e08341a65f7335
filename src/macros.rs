//! Macros for creating named callback registries.
//!
//! This module provides a macro-based approach to create isolated,
//! thread-local keyed callback registries addressed by module path.

/// Creates a named callback registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - A thread-local `KeyedCallbacks` (hidden)
/// - An `Api` struct that implements `KeyedCallbacksApi`
/// - Free functions delegating to it
///
/// The second argument is the parameter type passed to callbacks. It is
/// resolved from the scope the macro is invoked in.
///
/// # Examples
///
/// ```rust
/// use keyed_callbacks::define_callbacks;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// define_callbacks!(events, u32);
///
/// let total = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&total);
/// let handle = events::register("tick", move |n| sink.set(sink.get() + *n));
///
/// events::invoke("tick", 3);
/// assert_eq!(total.get(), 3);
///
/// drop(handle);
/// assert_eq!(events::callback_count("tick"), 0);
/// ```
///
/// # Multiple Registries
///
/// Each invocation is isolated, even when the same keys are used:
///
/// ```rust
/// use keyed_callbacks::define_callbacks;
///
/// define_callbacks!(ui, String);
/// define_callbacks!(network, String);
///
/// let _handle = ui::register("status", |_| {});
///
/// assert_eq!(ui::callback_count("status"), 1);
/// assert_eq!(network::callback_count("status"), 0);
/// ```
///
/// # Trait-Based Usage
///
/// The `API` constant is available for trait-based access:
///
/// ```rust
/// use keyed_callbacks::{define_callbacks, KeyedCallbacksApi};
///
/// define_callbacks!(app, ());
///
/// let _handle = app::API.register("ready", |_| {});
/// app::API.invoke("ready", ());
/// ```
#[macro_export]
macro_rules! define_callbacks {
    ($name:ident, $params:ty) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;
            use std::thread::LocalKey;

            type Params = $params;

            thread_local! {
                // Registry for this thread (module-private)
                static STORAGE: $crate::KeyedCallbacks<Params> = $crate::KeyedCallbacks::new();
            }

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `KeyedCallbacksApi`
            /// trait's default implementations.
            pub struct Api;

            impl $crate::KeyedCallbacksApi for Api {
                type Params = Params;

                fn registry() -> &'static LocalKey<$crate::KeyedCallbacks<Params>> {
                    &STORAGE
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            // Free functions for ergonomic usage - they delegate to API

            /// Register a callback under `key`. Keep the handle to stay registered.
            pub fn register<F>(key: impl Into<String>, callback: F) -> $crate::CallbackHandle
            where
                F: Fn(&Params) + 'static,
            {
                use $crate::KeyedCallbacksApi;
                API.register(key, callback)
            }

            /// Register an already shared callback under `key`.
            pub fn register_rc(
                key: impl Into<String>,
                callback: $crate::Callback<Params>,
            ) -> $crate::CallbackHandle {
                use $crate::KeyedCallbacksApi;
                API.register_rc(key, callback)
            }

            /// Invoke the live callbacks registered under `key`.
            pub fn invoke(key: &str, parameter: Params) {
                use $crate::KeyedCallbacksApi;
                API.invoke(key, parameter)
            }

            /// Live callbacks registered under `key`, in registration order.
            pub fn callbacks_for_key(key: &str) -> Vec<$crate::Callback<Params>> {
                use $crate::KeyedCallbacksApi;
                API.callbacks_for_key(key)
            }

            /// Number of live callbacks registered under `key`.
            pub fn callback_count(key: &str) -> usize {
                use $crate::KeyedCallbacksApi;
                API.callback_count(key)
            }

            /// Check if `key` has at least one live callback.
            pub fn contains_key(key: &str) -> bool {
                use $crate::KeyedCallbacksApi;
                API.contains_key(key)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&$crate::RegistryEvent) + 'static) {
                use $crate::KeyedCallbacksApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::KeyedCallbacksApi;
                API.clear_trace_callback()
            }
        }
    };
}
