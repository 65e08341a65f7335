//! Integration tests for handle lifetimes and callbacks that use the registry
//! while it is invoking them.

use keyed_callbacks::{CallbackHandle, CallbackScope, KeyedCallbacks};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[test]
fn test_callback_registering_during_invoke() {
    let registry = Rc::new(KeyedCallbacks::<()>::new());
    let weak = Rc::downgrade(&registry);
    let spawned: Rc<RefCell<Vec<CallbackHandle>>> = Rc::new(RefCell::new(Vec::new()));
    let late_hits = Rc::new(Cell::new(0));

    let spawned_clone = Rc::clone(&spawned);
    let late_clone = Rc::clone(&late_hits);
    let _spawner = registry.register("key1", move |_| {
        let Some(registry) = weak.upgrade() else {
            return;
        };
        let late = Rc::clone(&late_clone);
        let handle = registry.register("key1", move |_| late.set(late.get() + 1));
        spawned_clone.borrow_mut().push(handle);
    });

    // The callback added during this pass is not part of it.
    registry.invoke("key1", ());
    assert_eq!(late_hits.get(), 0);
    assert_eq!(registry.callback_count("key1"), 2);

    // Next pass sees it, and spawns one more that again waits for the pass after.
    registry.invoke("key1", ());
    assert_eq!(late_hits.get(), 1);
    assert_eq!(registry.callback_count("key1"), 3);

    spawned.borrow_mut().clear();
    assert_eq!(registry.callback_count("key1"), 1);
}

#[test]
fn test_callback_dropping_later_handle_during_invoke() {
    let registry: KeyedCallbacks<()> = KeyedCallbacks::new();
    let victim_slot: Rc<RefCell<Option<CallbackHandle>>> = Rc::new(RefCell::new(None));
    let victim_hits = Rc::new(Cell::new(0));

    let slot_clone = Rc::clone(&victim_slot);
    let _killer = registry.register("key1", move |_| {
        slot_clone.borrow_mut().take();
    });

    let hits_clone = Rc::clone(&victim_hits);
    *victim_slot.borrow_mut() =
        Some(registry.register("key1", move |_| hits_clone.set(hits_clone.get() + 1)));

    // The victim was in the snapshot, so it still runs once in this pass.
    registry.invoke("key1", ());
    assert_eq!(victim_hits.get(), 1);
    assert_eq!(registry.callback_count("key1"), 1);

    registry.invoke("key1", ());
    assert_eq!(victim_hits.get(), 1);
}

#[test]
fn test_callback_dropping_own_handle_during_invoke() {
    let registry: KeyedCallbacks<()> = KeyedCallbacks::new();
    let own: Rc<RefCell<Option<CallbackHandle>>> = Rc::new(RefCell::new(None));
    let hits = Rc::new(Cell::new(0));

    let own_clone = Rc::clone(&own);
    let hits_clone = Rc::clone(&hits);
    let handle = registry.register("once", move |_| {
        hits_clone.set(hits_clone.get() + 1);
        own_clone.borrow_mut().take();
    });
    *own.borrow_mut() = Some(handle);

    registry.invoke("once", ());
    registry.invoke("once", ());

    assert_eq!(hits.get(), 1);
    assert!(!registry.contains_key("once"));
}

#[test]
fn test_removing_entry_whose_callback_owns_handles() {
    let registry: KeyedCallbacks<()> = KeyedCallbacks::new();

    let inner = registry.register("inner", |_| {});
    let mut nested = CallbackScope::new();
    nested.hold(registry.register("inner", |_| {}));

    let owner = registry.register("outer", move |_| {
        let _keep = (&inner, &nested);
    });
    assert_eq!(registry.len(), 3);

    // Freeing the outer entry drops its closure, which drops both inner handles.
    drop(owner);
    assert!(registry.is_empty());
    assert!(registry.keys().is_empty());
}

#[test]
fn test_handles_outliving_registry() {
    let registry: KeyedCallbacks<()> = KeyedCallbacks::new();
    let mut scope = CallbackScope::new();
    scope.hold(registry.register("key1", |_| {}));
    let loose = registry.register("key2", |_| {});

    drop(registry);

    loose.release();
    scope.release_all();
}

#[test]
fn test_registry_drop_releases_callbacks() {
    let state = Rc::new(());
    let registry: KeyedCallbacks<()> = KeyedCallbacks::new();
    let captured = Rc::clone(&state);
    let handle = registry.register("key1", move |_| {
        assert!(Rc::strong_count(&captured) > 1);
    });

    drop(registry);
    assert_eq!(Rc::strong_count(&state), 1);
    drop(handle);
}

#[test]
fn test_handle_does_not_keep_registry_alive() {
    let registry = Rc::new(KeyedCallbacks::<()>::new());
    let weak: Weak<KeyedCallbacks<()>> = Rc::downgrade(&registry);
    let handle = registry.register("key1", |_| {});

    drop(registry);
    assert!(weak.upgrade().is_none());
    drop(handle);
}

#[test]
fn test_trace_callback_using_registry() {
    let registry = Rc::new(KeyedCallbacks::<()>::new());
    let weak = Rc::downgrade(&registry);
    let counts = Rc::new(RefCell::new(Vec::new()));

    let counts_clone = Rc::clone(&counts);
    registry.set_trace_callback(move |event| {
        if let (Some(registry), keyed_callbacks::RegistryEvent::Register { key }) =
            (weak.upgrade(), event)
        {
            counts_clone.borrow_mut().push(registry.len());
            assert!(registry.keys().contains(key));
        }
    });

    let _a = registry.register("key1", |_| {});
    let _b = registry.register("key2", |_| {});

    assert_eq!(*counts.borrow(), vec![1, 2]);
}

#[test]
fn test_replacing_trace_callback_that_owns_handle() {
    let registry = KeyedCallbacks::<()>::new();
    let owned = registry.register("key1", |_| {});
    registry.set_trace_callback(move |_| {
        let _owned = &owned;
    });
    assert_eq!(registry.callback_count("key1"), 1);

    let deregistered = Rc::new(RefCell::new(Vec::new()));
    let deregistered_clone = Rc::clone(&deregistered);
    registry.set_trace_callback(move |event| {
        if let keyed_callbacks::RegistryEvent::Deregister { key } = event {
            deregistered_clone.borrow_mut().push(key.clone());
        }
    });

    assert_eq!(*deregistered.borrow(), vec!["key1"]);
    assert_eq!(registry.callback_count("key1"), 0);
}

#[test]
fn test_clearing_trace_callback_that_owns_handle() {
    let registry = KeyedCallbacks::<()>::new();
    let owned = registry.register("key1", |_| {});
    registry.set_trace_callback(move |_| {
        let _owned = &owned;
    });

    registry.clear_trace_callback();

    assert!(!registry.contains_key("key1"));
    assert!(registry.is_empty());
}
