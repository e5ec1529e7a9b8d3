//! Registry state: immutable snapshots and the sink they are published through.
//!
//! Invariants:
//! - A [`Snapshot`] is never mutated after construction; every change builds a new one.
//! - Observers detect changes with [`Snapshot::ptr_eq`].
//! - Names are unique keys; insertion order is preserved but carries no meaning for
//!   stacking, which is decided by `index` alone.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::core::component::Renderable;
use crate::core::error::PortalError;
use crate::core::ident::{top_by_index, PortalId};

/// Shared handle to mounted portal content.
pub type RenderableRc = Rc<RefCell<Box<dyn Renderable>>>;

type Dismiss = Rc<dyn Fn(PortalError) -> bool>;

/// One live portal as recorded in a snapshot.
#[derive(Clone)]
pub struct PortalEntry {
    id: PortalId,
    name: Rc<str>,
    index: i64,
    renderable: RenderableRc,
    dismiss: Dismiss,
}

impl PortalEntry {
    pub(crate) fn new(
        id: PortalId,
        name: &str,
        index: i64,
        renderable: Box<dyn Renderable>,
        dismiss: Dismiss,
    ) -> Self {
        Self {
            id,
            name: Rc::from(name),
            index,
            renderable: Rc::new(RefCell::new(renderable)),
            dismiss,
        }
    }

    pub fn id(&self) -> PortalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    /// Render identity; stays distinct when a name is reused at another index.
    pub fn key(&self) -> String {
        format!("{}_{}", self.name, self.index)
    }

    pub fn renderable(&self) -> &RenderableRc {
        &self.renderable
    }

    /// Settles this entry's result with a failure. Returns `false` if already settled.
    pub fn dismiss(&self, error: PortalError) -> bool {
        (self.dismiss)(error)
    }
}

impl fmt::Debug for PortalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// One immutable version of the name → entry mapping.
#[derive(Clone, Default, Debug)]
pub struct Snapshot {
    entries: Rc<IndexMap<Rc<str>, PortalEntry>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PortalEntry> {
        self.entries.get(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PortalEntry> {
        self.entries.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|name| &**name).collect()
    }

    /// Whether both values are the same snapshot (not merely equal contents).
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }

    /// Live entries sorted ascending by index; equal indices keep insertion order.
    pub fn render_order(&self) -> Vec<PortalEntry> {
        let mut ordered: Vec<PortalEntry> = self.entries.values().cloned().collect();
        ordered.sort_by_key(PortalEntry::index);
        ordered
    }

    /// Name of the entry with the greatest index.
    pub fn top_name(&self) -> Option<&str> {
        top_by_index(self.entries.values().map(|entry| (entry.name(), entry.index)))
    }

    pub(crate) fn with_inserted(&self, entry: PortalEntry) -> Snapshot {
        let mut next = (*self.entries).clone();
        next.insert(Rc::clone(&entry.name), entry);
        Snapshot {
            entries: Rc::new(next),
        }
    }

    /// Copy without `name`; the same snapshot when `name` is absent.
    pub(crate) fn without(&self, name: &str) -> Snapshot {
        if !self.contains(name) {
            return self.clone();
        }
        let mut next = (*self.entries).clone();
        next.shift_remove(name);
        Snapshot {
            entries: Rc::new(next),
        }
    }
}

/// Destination for registry state changes.
///
/// A sink owns the current snapshot; the registry only ever proposes a
/// replacement computed from it.
pub trait StateSink {
    /// Current snapshot.
    fn snapshot(&self) -> Snapshot;

    /// Replaces the current snapshot with `update(current)` and returns the result.
    fn update(&self, update: &mut dyn FnMut(&Snapshot) -> Snapshot) -> Snapshot;

    /// Replaces the current snapshot unconditionally.
    fn replace(&self, next: Snapshot) -> Snapshot {
        self.update(&mut |_| next.clone())
    }
}

impl<S: StateSink + ?Sized> StateSink for Rc<S> {
    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }

    fn update(&self, update: &mut dyn FnMut(&Snapshot) -> Snapshot) -> Snapshot {
        (**self).update(update)
    }
}

type Subscriber = Rc<dyn Fn(&Snapshot)>;

#[derive(Default)]
struct StoreInner {
    current: RefCell<Snapshot>,
    subscribers: RefCell<Vec<(u64, Subscriber)>>,
    next_subscriber: Cell<u64>,
}

/// In-memory [`StateSink`] with change notification.
///
/// One store backs one render surface; several stores (one per screen plus a
/// global one) can coexist.
#[derive(Clone, Default)]
pub struct PortalStore {
    inner: Rc<StoreInner>,
}

impl PortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` to run after every snapshot replacement.
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + 'static) -> StoreSubscription {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        let listener: Subscriber = Rc::new(listener);
        self.inner.subscribers.borrow_mut().push((id, listener));
        StoreSubscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn notify(&self, snapshot: &Snapshot) {
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in subscribers {
            listener(snapshot);
        }
    }
}

impl StateSink for PortalStore {
    fn snapshot(&self) -> Snapshot {
        self.inner.current.borrow().clone()
    }

    fn update(&self, update: &mut dyn FnMut(&Snapshot) -> Snapshot) -> Snapshot {
        let prev = self.snapshot();
        let next = update(&prev);
        if next.ptr_eq(&prev) {
            return next;
        }
        *self.inner.current.borrow_mut() = next.clone();
        self.notify(&next);
        next
    }
}

/// Registration returned by [`PortalStore::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping the subscription stops notifications"]
pub struct StoreSubscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_event::Area;

    struct Blank;

    impl Renderable for Blank {
        fn render(&mut self, _area: Area) -> Vec<String> {
            Vec::new()
        }
    }

    fn entry(name: &str, index: i64) -> PortalEntry {
        PortalEntry::new(
            PortalId::from_raw(index as u64),
            name,
            index,
            Box::new(Blank),
            Rc::new(|_: PortalError| false),
        )
    }

    #[test]
    fn insert_and_remove_build_new_snapshots() {
        let empty = Snapshot::empty();
        let one = empty.with_inserted(entry("a", 0));
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(!one.ptr_eq(&empty));

        let unchanged = one.without("missing");
        assert!(unchanged.ptr_eq(&one));

        let removed = one.without("a");
        assert!(removed.is_empty());
        assert_eq!(one.len(), 1, "older snapshot must stay intact");
    }

    #[test]
    fn render_order_sorts_by_index() {
        let snapshot = Snapshot::empty()
            .with_inserted(entry("five", 5))
            .with_inserted(entry("one", 1))
            .with_inserted(entry("three", 3));
        let order: Vec<i64> = snapshot.render_order().iter().map(PortalEntry::index).collect();
        assert_eq!(order, vec![1, 3, 5]);
        assert_eq!(snapshot.top_name(), Some("five"));
        assert_eq!(snapshot.names(), vec!["five", "one", "three"]);
    }

    #[test]
    fn store_notifies_only_on_change() {
        let store = PortalStore::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));

        store.update(&mut |prev| prev.with_inserted(entry("a", 0)));
        store.update(&mut |prev| prev.clone());
        assert_eq!(seen.get(), 1);

        drop(subscription);
        store.replace(Snapshot::empty());
        assert_eq!(seen.get(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn entry_key_combines_name_and_index() {
        assert_eq!(entry("dialog", 3).key(), "dialog_3");
    }
}
