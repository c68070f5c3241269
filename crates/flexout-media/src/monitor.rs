//! Synchronous observer hub for breakpoint activations.
//!
//! A [`MediaMonitor`] is a cheap, cloneable handle. Media sources publish
//! [`Activation`] snapshots into it; bindings subscribe callbacks and get
//! every snapshot delivered synchronously, in subscription order, before
//! `publish` returns.
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use flexout_media::{Activation, MediaMonitor};
//!
//! let monitor = MediaMonitor::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let subscription = monitor.subscribe(move |activation| {
//!     sink.borrow_mut().push(activation.alias().map(str::to_string));
//! });
//!
//! monitor.publish(Activation::single("md"));
//! drop(subscription);
//! monitor.publish(Activation::single("lg"));
//!
//! assert_eq!(*seen.borrow(), vec![Some("md".to_string())]);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::activation::Activation;

type Callback = Box<dyn FnMut(&Activation)>;

struct Listener {
    live: Cell<bool>,
    callback: RefCell<Callback>,
}

#[derive(Default)]
struct Hub {
    listeners: RefCell<Vec<Rc<Listener>>>,
    current: RefCell<Activation>,
}

/// Shared handle to the activation feed.
#[derive(Clone, Default)]
pub struct MediaMonitor {
    hub: Rc<Hub>,
}

impl MediaMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for every future activation.
    ///
    /// The callback stays registered until the returned [`Subscription`] is
    /// dropped or [`unsubscribe`](Subscription::unsubscribe)d.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Activation) + 'static,
    {
        let listener = Rc::new(Listener {
            live: Cell::new(true),
            callback: RefCell::new(Box::new(callback)),
        });
        self.hub.listeners.borrow_mut().push(Rc::clone(&listener));
        Subscription {
            listener: Rc::downgrade(&listener),
            hub: Rc::downgrade(&self.hub),
        }
    }

    /// Records `activation` as current and delivers it to every live subscriber.
    pub fn publish(&self, activation: Activation) {
        *self.hub.current.borrow_mut() = activation.clone();

        // Snapshot so callbacks may subscribe or unsubscribe while we iterate.
        let listeners: Vec<Rc<Listener>> = self.hub.listeners.borrow().clone();
        tracing::debug!(
            alias = activation.alias().unwrap_or("<none>"),
            overlaps = activation.overlaps(),
            subscribers = listeners.len(),
            "publishing media activation"
        );
        for listener in listeners {
            if !listener.live.get() {
                continue;
            }
            match listener.callback.try_borrow_mut() {
                Ok(mut callback) => (*callback)(&activation),
                Err(_) => tracing::warn!("skipping re-entrant activation callback"),
            }
        }
    }

    /// The most recently published activation.
    pub fn current(&self) -> Activation {
        self.hub.current.borrow().clone()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.hub
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.live.get())
            .count()
    }
}

impl fmt::Debug for MediaMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaMonitor")
            .field("current", &*self.hub.current.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle that keeps a callback registered with a [`MediaMonitor`].
///
/// Dropping the handle unsubscribes. A callback whose subscription ends
/// while an activation is being dispatched is not invoked for the rest of
/// that dispatch.
pub struct Subscription {
    listener: Weak<Listener>,
    hub: Weak<Hub>,
}

impl Subscription {
    /// Stops delivery to this subscription's callback.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Returns `true` while the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.listener.upgrade().map_or(false, |l| l.live.get()) && self.hub.upgrade().is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(listener) = self.listener.upgrade() else {
            return;
        };
        listener.live.set(false);
        if let Some(hub) = self.hub.upgrade() {
            if let Ok(mut listeners) = hub.listeners.try_borrow_mut() {
                listeners.retain(|l| !Rc::ptr_eq(l, &listener));
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
