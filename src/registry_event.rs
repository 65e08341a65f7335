/// Events emitted by a callback registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use keyed_callbacks::RegistryEvent;
///
/// let event = RegistryEvent::Register { key: "saved".into() };
/// assert_eq!(event.to_string(), "register { key: saved }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A callback was registered under a key.
    Register {
        /// The key the callback was registered under
        key: String,
    },

    /// The live callbacks for a key were looked up.
    Lookup {
        /// The key that was looked up
        key: String,
        /// How many live callbacks the key had
        found: usize,
    },

    /// The callbacks for a key are about to be invoked.
    Invoke {
        /// The key being invoked
        key: String,
        /// Size of the snapshot that will be called
        callbacks: usize,
    },

    /// A dropped handle removed its callback.
    Deregister {
        /// The key the removed callback was registered under
        key: String,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { key } => write!(f, "register {{ key: {} }}", key),
            RegistryEvent::Lookup { key, found } => {
                write!(f, "lookup {{ key: {}, found: {} }}", key, found)
            }
            RegistryEvent::Invoke { key, callbacks } => {
                write!(f, "invoke {{ key: {}, callbacks: {} }}", key, callbacks)
            }
            RegistryEvent::Deregister { key } => write!(f, "deregister {{ key: {} }}", key),
        }
    }
}
