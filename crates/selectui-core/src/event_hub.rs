#![forbid(unsafe_code)]

//! Scoped global listeners.
//!
//! Widgets that need to hear about events outside their own area (a click
//! anywhere on screen, a terminal resize) subscribe here. Each subscription
//! returns a [`ListenerGuard`]; releasing or dropping the guard removes the
//! listener. The runtime owns the hub and calls [`EventHub::dispatch`] for
//! every incoming event.
//!
//! # Invariants
//!
//! 1. `ListenerGuard::release` is idempotent
//! 2. Releasing after the hub is gone is a no-op
//! 3. Listeners may subscribe or release (their own guard or others') while
//!    being dispatched; a listener removed mid-dispatch is not called again

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::event::Event;

/// Which events a listener wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Any mouse button press, anywhere.
    PointerDown,
    /// Terminal resize.
    Resize,
}

impl ListenerKind {
    /// Whether `event` is delivered to listeners of this kind.
    #[must_use]
    pub fn matches(self, event: &Event) -> bool {
        match self {
            Self::PointerDown => event.is_pointer_down(),
            Self::Resize => matches!(event, Event::Resize { .. }),
        }
    }
}

type Listener = Box<dyn FnMut(&Event)>;

struct Entry {
    id: u64,
    kind: ListenerKind,
    /// `None` while the listener is being invoked.
    listener: Option<Listener>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    entries: Vec<Entry>,
}

impl HubInner {
    fn remove(&mut self, id: u64) -> Option<Entry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }
}

/// Single-threaded registry of global listeners.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    ///
    /// The listener stays registered until the returned guard is released
    /// or dropped.
    #[must_use = "dropping the guard immediately unsubscribes the listener"]
    pub fn subscribe(
        &self,
        kind: ListenerKind,
        listener: impl FnMut(&Event) + 'static,
    ) -> ListenerGuard {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.push(Entry {
            id,
            kind,
            listener: Some(Box::new(listener)),
        });
        crate::trace!(id, ?kind, "listener subscribed");
        ListenerGuard {
            hub: Rc::downgrade(&self.inner),
            id,
            released: false,
        }
    }

    /// Deliver `event` to every matching listener, in subscription order.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let targets: Vec<u64> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind.matches(event))
            .map(|e| e.id)
            .collect();

        let mut invoked = 0;
        for id in targets {
            let taken = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .entries
                    .iter_mut()
                    .find(|e| e.id == id)
                    .and_then(|e| e.listener.take())
            };
            let Some(mut listener) = taken else {
                continue;
            };
            listener(event);
            invoked += 1;

            let leftover = {
                let mut inner = self.inner.borrow_mut();
                match inner.entries.iter_mut().find(|e| e.id == id) {
                    Some(entry) => {
                        entry.listener = Some(listener);
                        None
                    }
                    None => Some(listener),
                }
            };
            // Released during its own call; drop outside the borrow.
            drop(leftover);
        }
        invoked
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Number of live listeners of one kind.
    #[must_use]
    pub fn listener_count_of(&self, kind: ListenerKind) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps a listener registered. Released on drop.
pub struct ListenerGuard {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
    released: bool,
}

impl ListenerGuard {
    /// Unregister the listener. Calling this more than once is harmless.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let Some(inner) = self.hub.upgrade() else {
            return;
        };
        let removed = inner.borrow_mut().remove(self.id);
        crate::trace!(id = self.id, found = removed.is_some(), "listener released");
        drop(removed);
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
