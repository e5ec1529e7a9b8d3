//! Host platform hooks: back gesture dispatch and soft keyboard control.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type BackListener = Rc<RefCell<dyn FnMut() -> bool>>;

#[derive(Default)]
struct ListenerTable {
    listeners: Vec<(u64, BackListener)>,
    next_id: u64,
}

impl ListenerTable {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// Back gesture dispatcher.
///
/// Semantics:
/// - Listeners run newest first; the first one returning `true` claims the event.
/// - A listener removed while a dispatch is in flight is not called.
/// - Unclaimed events report `false` so the host can fall back to its own navigation.
#[derive(Clone, Default)]
pub struct BackHandler {
    table: Rc<RefCell<ListenerTable>>,
}

impl BackHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: impl FnMut() -> bool + 'static) -> BackSubscription {
        let mut table = self.table.borrow_mut();
        let id = table.next_id;
        table.next_id += 1;
        let listener: BackListener = Rc::new(RefCell::new(listener));
        table.listeners.push((id, listener));
        BackSubscription {
            table: Rc::downgrade(&self.table),
            id,
        }
    }

    /// Delivers one back event. Returns whether a listener claimed it.
    pub fn dispatch(&self) -> bool {
        let listeners: Vec<(u64, BackListener)> = self
            .table
            .borrow()
            .listeners
            .iter()
            .rev()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            if !self.table.borrow().contains(id) {
                continue;
            }
            let claimed = match listener.try_borrow_mut() {
                Ok(mut listener) => (&mut *listener)(),
                // Re-entrant dispatch from inside the same listener.
                Err(_) => false,
            };
            if claimed {
                tracing::trace!(listener = id, "back press claimed");
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self) -> usize {
        self.table.borrow().listeners.len()
    }
}

/// Registration returned by [`BackHandler::add_listener`]. Dropping it unregisters.
#[must_use = "dropping the subscription removes the listener"]
pub struct BackSubscription {
    table: Weak<RefCell<ListenerTable>>,
    id: u64,
}

impl BackSubscription {
    pub fn remove(self) {}
}

impl Drop for BackSubscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            // Dropping a listener closure may drop another subscription.
            let removed = {
                let mut table = table.borrow_mut();
                let pos = table.listeners.iter().position(|(id, _)| *id == self.id);
                pos.map(|pos| table.listeners.remove(pos))
            };
            drop(removed);
        }
    }
}

/// Soft keyboard control; portals dismiss it when they open.
pub trait SoftKeyboard {
    fn dismiss(&self);
}

impl<F: Fn()> SoftKeyboard for F {
    fn dismiss(&self) {
        self()
    }
}

/// Keyboard hook for hosts without a soft keyboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeyboard;

impl SoftKeyboard for NoKeyboard {
    fn dismiss(&self) {}
}

#[cfg(test)]
mod tests {
    use super::BackHandler;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn newest_listener_runs_first() {
        let handler = BackHandler::new();
        let trace = Rc::new(RefCell::new(Vec::new()));

        let first_trace = Rc::clone(&trace);
        let _first = handler.add_listener(move || {
            first_trace.borrow_mut().push("first");
            true
        });
        let second_trace = Rc::clone(&trace);
        let _second = handler.add_listener(move || {
            second_trace.borrow_mut().push("second");
            false
        });

        assert!(handler.dispatch());
        assert_eq!(*trace.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let handler = BackHandler::new();
        let subscription = handler.add_listener(|| true);
        assert_eq!(handler.listener_count(), 1);
        subscription.remove();
        assert_eq!(handler.listener_count(), 0);
        assert!(!handler.dispatch());
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let handler = BackHandler::new();
        let lower_called = Rc::new(RefCell::new(false));
        let lower_flag = Rc::clone(&lower_called);
        let lower = handler.add_listener(move || {
            *lower_flag.borrow_mut() = true;
            true
        });
        let slot = Rc::new(RefCell::new(Some(lower)));
        let slot_in_listener = Rc::clone(&slot);
        let _upper = handler.add_listener(move || {
            slot_in_listener.borrow_mut().take();
            false
        });

        assert!(!handler.dispatch());
        assert!(!*lower_called.borrow());
    }

    #[test]
    fn keyboard_closure_hook() {
        use super::SoftKeyboard;
        let dismissed = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&dismissed);
        let keyboard = move || *counter.borrow_mut() += 1;
        keyboard.dismiss();
        assert_eq!(*dismissed.borrow(), 1);
    }
}
