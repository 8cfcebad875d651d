#![forbid(unsafe_code)]

//! Measured element heights.
//!
//! The layout pass records the size it hands an element. Resize
//! notifications drop the record so stale numbers are not reused; callers
//! fall back to their defaults until the next layout pass.

use std::cell::Cell;
use std::rc::Rc;

use selectui_core::event_hub::{EventHub, ListenerGuard, ListenerKind};
use selectui_core::geometry::Size;

#[derive(Debug)]
pub struct Measured {
    name: &'static str,
    slot: Rc<Cell<Option<Size>>>,
    resize: Option<ListenerGuard>,
}

impl Measured {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Rc::new(Cell::new(None)),
            resize: None,
        }
    }

    /// Store the size layout assigned. Returns whether it changed.
    pub fn record(&self, size: Size) -> bool {
        let previous = self.slot.replace(Some(size));
        let changed = previous != Some(size);
        if changed {
            selectui_core::debug!(
                element = self.name,
                width = size.width,
                height = size.height,
                "measured"
            );
        }
        changed
    }

    pub fn invalidate(&self) {
        self.slot.set(None);
    }

    pub fn size(&self) -> Option<Size> {
        self.slot.get()
    }

    pub fn height(&self) -> Option<u16> {
        self.size().map(|s| s.height)
    }

    /// Measured height, or `default` when unmeasured.
    pub fn height_or(&self, default: u16) -> u16 {
        self.height().unwrap_or(default)
    }

    /// Invalidate on every terminal resize until [`release`](Self::release).
    ///
    /// Observing again replaces the previous subscription.
    pub fn observe(&mut self, hub: &EventHub) {
        let slot = Rc::clone(&self.slot);
        let name = self.name;
        self.resize = Some(hub.subscribe(ListenerKind::Resize, move |_| {
            selectui_core::trace!(element = name, "measurement invalidated by resize");
            slot.set(None);
        }));
    }

    pub fn release(&mut self) {
        if let Some(mut guard) = self.resize.take() {
            guard.release();
        }
    }

    pub fn is_observing(&self) -> bool {
        self.resize.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selectui_core::event::Event;

    #[test]
    fn record_and_fallback() {
        let m = Measured::new("container");
        assert_eq!(m.height_or(6), 6);
        assert!(m.record(Size::new(20, 4)));
        assert!(!m.record(Size::new(20, 4)));
        assert_eq!(m.height(), Some(4));
        m.invalidate();
        assert_eq!(m.height_or(6), 6);
    }

    #[test]
    fn resize_invalidates_while_observed() {
        let hub = EventHub::new();
        let mut m = Measured::new("item");
        m.observe(&hub);
        m.record(Size::new(10, 1));
        hub.dispatch(&Event::Resize {
            width: 80,
            height: 24,
        });
        assert_eq!(m.size(), None);

        m.release();
        assert!(!m.is_observing());
        m.record(Size::new(10, 1));
        hub.dispatch(&Event::Resize {
            width: 80,
            height: 24,
        });
        assert_eq!(m.height(), Some(1));
    }

    #[test]
    fn reobserve_replaces_subscription() {
        let hub = EventHub::new();
        let mut m = Measured::new("item");
        m.observe(&hub);
        m.observe(&hub);
        assert_eq!(hub.listener_count(), 1);
        drop(m);
        assert_eq!(hub.listener_count(), 0);
    }
}
