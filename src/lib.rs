#![forbid(unsafe_code)]

//! # Keyed Callbacks
//!
//! A keyed callback registry where the caller owns each registration.
//!
//! Callbacks are registered under a string key and invoked together with a
//! parameter value. Registering returns a [`CallbackHandle`]; dropping that
//! handle removes the callback from the registry immediately. There is no
//! explicit unregister call.
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_callbacks::KeyedCallbacks;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let registry: KeyedCallbacks<String> = KeyedCallbacks::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let handle = registry.register("saved", move |path: &String| {
//!     sink.borrow_mut().push(path.clone());
//! });
//!
//! registry.invoke("saved", "notes.txt".to_string());
//! assert_eq!(*seen.borrow(), vec!["notes.txt".to_string()]);
//!
//! // Dropping the handle deregisters the callback.
//! drop(handle);
//! assert_eq!(registry.callback_count("saved"), 0);
//! ```
//!
//! ## Features
//!
//! - **Handle-owned registrations**: a callback lives exactly as long as its handle
//! - **Ordered invocation**: callbacks for a key run in registration order
//! - **Reentrancy-safe**: callbacks may register or drop handles while being invoked
//! - **Tracing support**: optional callback for monitoring registry operations
//! - **Named registries**: [`define_callbacks!`] creates isolated thread-local registries
//!
//! ## Main Types
//!
//! - [`KeyedCallbacks`] - The registry
//! - [`CallbackHandle`] - Token returned by `register`; drop it to deregister
//! - [`CallbackScope`] - Holds a group of handles released together
//! - [`KeyedCallbacksApi`] - Trait behind [`define_callbacks!`] registries
//! - [`RegistryEvent`] - Events passed to the tracing callback
//!
//! ## Threading
//!
//! Everything here is single-threaded and `!Send`. Use from several threads
//! needs an external lock around a different, thread-safe design.

mod callback_index;
mod handle;
mod macros;
mod registry;
mod registry_event;
mod registry_trait;
mod scope;

pub use callback_index::Callback;
pub use handle::CallbackHandle;
pub use registry::{KeyedCallbacks, TraceCallback};
pub use registry_event::RegistryEvent;
pub use registry_trait::KeyedCallbacksApi;
pub use scope::CallbackScope;
