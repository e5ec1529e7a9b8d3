//! Provider: one store, its registry, and the surface that renders it.
//!
//! Invariants:
//! - Store changes only mark the provider dirty; the surface is reconciled lazily at
//!   the start of `render`, `press`, `handle_event` and `back_press`.
//! - `use_portal` resolves to the innermost entered provider on the current thread.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::error::{ContextError, PortalError};
use crate::core::host::BackHandler;
use crate::core::input_event::{Area, PortalEvent};
use crate::render::surface::RenderedPortal;
use crate::runtime::manager::{ManagerOptions, PortalManager, PortalRequest, PortalShow};
use crate::runtime::store::{PortalStore, Snapshot, StateSink, StoreSubscription};
use crate::runtime::surface::PortalSurface;

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<PortalContext>> = const { RefCell::new(Vec::new()) };
}

/// The four portal operations, bound to one provider's registry.
#[derive(Clone)]
pub struct PortalContext {
    manager: PortalManager,
}

impl PortalContext {
    pub fn new(manager: PortalManager) -> Self {
        Self { manager }
    }

    /// Innermost entered provider on this thread.
    pub fn try_current() -> Result<Self, ContextError> {
        CONTEXT_STACK
            .with(|stack| stack.borrow().last().cloned())
            .ok_or(ContextError::MissingProvider)
    }

    pub fn manager(&self) -> &PortalManager {
        &self.manager
    }

    pub fn show<T: 'static>(&self, request: PortalRequest<T>) -> PortalShow<T> {
        self.manager.show(request)
    }

    pub fn show_with_overlay<T: 'static>(&self, request: PortalRequest<T>) -> PortalShow<T> {
        self.manager.show_with_overlay(request)
    }

    pub fn remove(&self, name: &str) {
        self.manager.remove(name);
    }

    pub fn remove_all(&self) {
        self.manager.remove_all();
    }

    /// Cancels the named portal on behalf of the user.
    pub fn cancel(&self, name: &str) -> bool {
        let snapshot = self.manager.snapshot();
        match snapshot.get(name) {
            Some(entry) => entry.dismiss(PortalError::user_cancel(format!("Portal {name} cancelled"))),
            None => false,
        }
    }
}

/// Portal context of the innermost entered [`PortalProvider`].
///
/// # Panics
/// Panics when no provider scope is active on the current thread.
pub fn use_portal() -> PortalContext {
    match PortalContext::try_current() {
        Ok(context) => context,
        Err(err) => panic!("{err}"),
    }
}

/// Guard returned by [`PortalProvider::enter`]. Dropping it leaves the scope.
#[must_use = "the provider scope ends when this guard is dropped"]
pub struct ProviderScope {
    depth: usize,
}

impl Drop for ProviderScope {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| stack.borrow_mut().truncate(self.depth));
    }
}

pub struct PortalProvider {
    store: PortalStore,
    manager: PortalManager,
    surface: RefCell<PortalSurface>,
    back_handler: BackHandler,
    dirty: Rc<Cell<bool>>,
    _subscription: StoreSubscription,
}

impl Default for PortalProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalProvider {
    pub fn new() -> Self {
        Self::with_host(BackHandler::new(), ManagerOptions::default())
    }

    /// Provider wired to a host's back handler and soft keyboard.
    pub fn with_host(back_handler: BackHandler, options: ManagerOptions) -> Self {
        let store = PortalStore::new();
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move |_| flag.set(true));
        let manager = PortalManager::with_options(store.clone(), options);
        Self {
            surface: RefCell::new(PortalSurface::new(back_handler.clone())),
            store,
            manager,
            back_handler,
            dirty,
            _subscription: subscription,
        }
    }

    pub fn context(&self) -> PortalContext {
        PortalContext::new(self.manager.clone())
    }

    /// Makes this provider's context the target of [`use_portal`] until the guard drops.
    pub fn enter(&self) -> ProviderScope {
        CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let depth = stack.len();
            stack.push(self.context());
            ProviderScope { depth }
        })
    }

    pub fn manager(&self) -> &PortalManager {
        &self.manager
    }

    pub fn store(&self) -> &PortalStore {
        &self.store
    }

    pub fn back_handler(&self) -> &BackHandler {
        &self.back_handler
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Whether the registry changed since the last render.
    pub fn needs_render(&self) -> bool {
        self.dirty.get()
    }

    fn sync(&self) {
        let snapshot = self.store.snapshot();
        self.surface.borrow_mut().sync(&snapshot);
    }

    /// Renders live portals ascending by index.
    pub fn render(&self, area: Area) -> Vec<RenderedPortal> {
        self.sync();
        self.dirty.set(false);
        self.surface.borrow_mut().render(area)
    }

    /// Routes a pointer press. Returns whether any portal consumed it.
    pub fn press(&self, row: usize, col: usize) -> bool {
        self.sync();
        self.surface.borrow_mut().press(row, col)
    }

    /// Routes input. A back key goes through the back handler first; when no
    /// listener claims it, the top entry receives it like any other key.
    pub fn handle_event(&self, event: &PortalEvent) -> bool {
        if event.is_back() && self.back_press() {
            return true;
        }
        self.sync();
        self.surface.borrow_mut().handle_event(event)
    }

    /// Dispatches a back gesture. Returns whether a listener claimed it.
    pub fn back_press(&self) -> bool {
        self.sync();
        let claimed = self.back_handler.dispatch();
        tracing::trace!(claimed, "back press dispatched");
        claimed
    }
}

impl From<&PortalProvider> for PortalContext {
    fn from(provider: &PortalProvider) -> Self {
        provider.context()
    }
}
