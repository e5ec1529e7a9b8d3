//! Portal registry.
//!
//! Invariants:
//! - A name maps to at most one live entry; a duplicate `show` fails its own result
//!   with `PortalAlreadyExists` and leaves the existing entry untouched.
//! - An entry's index is fixed at insertion and never compacted.
//! - Every inserted entry is removed once its result settles, by `remove`, or by
//!   `remove_all`. Settlement cleanup only removes the entry it was registered for,
//!   never a later entry that reused the name.
//! - Only the entry with the greatest index is "top"; overlays consult it before
//!   claiming a back press.

use std::cell::Cell;
use std::future::IntoFuture;
use std::rc::{Rc, Weak};

use crate::config::EnvConfig;
use crate::core::component::{CloseableRef, Closer, PortalComponent, PortalNode, PortalProps, Renderable};
use crate::core::deferred::{deferred, PortalResult};
use crate::core::error::PortalError;
use crate::core::host::{NoKeyboard, SoftKeyboard};
use crate::core::ident::{generate_name, PortalId, DEFAULT_NAME_PREFIX};
use crate::core::overlay_config::OverlayConfig;
use crate::render::overlay::Overlay;
use crate::runtime::store::{PortalEntry, Snapshot, StateSink};

/// Parameters for [`PortalManager::show`].
pub struct PortalRequest<T> {
    name: Option<String>,
    index: Option<i64>,
    component: Box<dyn PortalComponent<T>>,
    overlay: Option<OverlayConfig>,
}

impl<T> PortalRequest<T> {
    pub fn new(component: impl PortalComponent<T> + 'static) -> Self {
        Self {
            name: None,
            index: None,
            component: Box::new(component),
            overlay: None,
        }
    }

    /// Builds a request from a render closure; argument types are inferred.
    pub fn from_fn(render: impl FnMut(&PortalProps<T>, usize) -> Vec<String> + 'static) -> Self
    where
        T: 'static,
    {
        Self::new(render)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    /// Wraps the content in an overlay interceptor.
    pub fn overlay(mut self, overlay: OverlayConfig) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

/// Identity and close capability of a shown portal.
pub struct PortalHandle<T> {
    name: String,
    index: i64,
    close: Closer<T>,
}

impl<T> Clone for PortalHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            index: self.index,
            close: self.close.clone(),
        }
    }
}

impl<T> PortalHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn close(&self, outcome: Result<T, PortalError>) -> bool {
        self.close.close(outcome)
    }

    pub fn resolve(&self, value: T) -> bool {
        self.close.resolve(value)
    }

    pub fn reject(&self, error: PortalError) -> bool {
        self.close.reject(error)
    }
}

/// Value returned by `show`: the portal's handle plus its eventual result.
///
/// Awaiting a `PortalShow` directly awaits the result.
#[must_use = "the portal result is delivered through `result`"]
pub struct PortalShow<T> {
    pub handle: PortalHandle<T>,
    pub result: PortalResult<T>,
}

impl<T> PortalShow<T> {
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn index(&self) -> i64 {
        self.handle.index()
    }

    pub fn into_parts(self) -> (PortalHandle<T>, PortalResult<T>) {
        (self.handle, self.result)
    }
}

impl<T> IntoFuture for PortalShow<T> {
    type Output = Result<T, PortalError>;
    type IntoFuture = PortalResult<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.result
    }
}

/// Construction options for [`PortalManager`].
pub struct ManagerOptions {
    pub name_prefix: String,
    pub keyboard: Box<dyn SoftKeyboard>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            keyboard: Box::new(NoKeyboard),
        }
    }
}

impl ManagerOptions {
    pub fn from_env(config: &EnvConfig) -> Self {
        Self {
            name_prefix: config
                .name_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string()),
            ..Self::default()
        }
    }

    pub fn keyboard(mut self, keyboard: impl SoftKeyboard + 'static) -> Self {
        self.keyboard = Box::new(keyboard);
        self
    }
}

struct ManagerInner {
    sink: Box<dyn StateSink>,
    options: ManagerOptions,
}

/// Stateful portal registry bound to one [`StateSink`].
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct PortalManager {
    inner: Rc<ManagerInner>,
}

impl PortalManager {
    pub fn new(sink: impl StateSink + 'static) -> Self {
        Self::with_options(sink, ManagerOptions::default())
    }

    pub fn with_options(sink: impl StateSink + 'static, options: ManagerOptions) -> Self {
        Self {
            inner: Rc::new(ManagerInner {
                sink: Box::new(sink),
                options,
            }),
        }
    }

    fn downgrade(&self) -> Weak<ManagerInner> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(inner: &Weak<ManagerInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.sink.snapshot()
    }

    /// Name of the live entry with the greatest index in the sink's current state,
    /// including entries another manager sharing the sink inserted.
    pub fn top_name(&self) -> Option<String> {
        self.snapshot().top_name().map(str::to_string)
    }

    pub fn is_top(&self, name: &str) -> bool {
        self.snapshot().top_name() == Some(name)
    }

    fn set_portals(&self, update: &mut dyn FnMut(&Snapshot) -> Snapshot) -> Snapshot {
        self.inner.sink.update(update)
    }

    /// Registers a portal and returns its handle and pending result.
    ///
    /// Without an explicit index the entry is appended at the current live count.
    pub fn show<T: 'static>(&self, request: PortalRequest<T>) -> PortalShow<T> {
        let PortalRequest {
            name,
            index,
            component,
            overlay,
        } = request;
        let name = name.unwrap_or_else(|| generate_name(&self.inner.options.name_prefix));
        let id = PortalId::next();
        let (bridge, result) = deferred::<T>();
        let close = Closer::new(bridge.clone());
        let closeable_ref = CloseableRef::new();
        let inserted = Rc::new(Cell::new(false));

        // Registered before insertion so a result settled while the sink notifies
        // observers still cleans up.
        let cleanup_inserted = Rc::clone(&inserted);
        let cleanup_manager = self.downgrade();
        let cleanup_name = name.clone();
        bridge.on_settled(move || {
            if !cleanup_inserted.get() {
                return;
            }
            if let Some(manager) = Self::upgrade(&cleanup_manager) {
                manager.remove_entry(&cleanup_name, id);
            }
        });

        let mut resolved_index = index;
        let mut component = Some(component);
        self.set_portals(&mut |prev| {
            if prev.contains(&name) {
                return prev.clone();
            }
            let Some(component) = component.take() else {
                return prev.clone();
            };
            let index = *resolved_index.get_or_insert(prev.len() as i64);
            let props = PortalProps {
                name: name.clone(),
                index,
                close: close.clone(),
                closeable_ref: closeable_ref.clone(),
            };
            let node: Box<dyn Renderable> = Box::new(PortalNode::new(props, component));
            let renderable = match &overlay {
                Some(config) => self.wrap_overlay(&name, config, node, &close, &closeable_ref),
                None => node,
            };
            let dismiss_close = close.clone();
            inserted.set(true);
            prev.with_inserted(PortalEntry::new(
                id,
                &name,
                index,
                renderable,
                Rc::new(move |error: PortalError| dismiss_close.reject(error)),
            ))
        });

        let index = match resolved_index {
            Some(index) => index,
            None => self.snapshot().len() as i64,
        };
        if inserted.get() {
            self.inner.options.keyboard.dismiss();
            tracing::debug!(name = %name, index, overlay = overlay.is_some(), "portal shown");
        } else {
            tracing::warn!(name = %name, "portal already exists");
            bridge.reject(PortalError::already_exists(&name));
        }

        PortalShow {
            handle: PortalHandle { name, index, close },
            result,
        }
    }

    /// Same as [`show`](Self::show) but always wraps the content in an overlay.
    pub fn show_with_overlay<T: 'static>(&self, request: PortalRequest<T>) -> PortalShow<T> {
        let request = match request.overlay {
            Some(_) => request,
            None => request.overlay(OverlayConfig::default()),
        };
        self.show(request)
    }

    fn wrap_overlay<T: 'static>(
        &self,
        name: &str,
        config: &OverlayConfig,
        node: Box<dyn Renderable>,
        close: &Closer<T>,
        closeable_ref: &CloseableRef,
    ) -> Box<dyn Renderable> {
        let close = close.clone();
        let closeable_ref = closeable_ref.clone();
        let on_close = Rc::new(move |error: PortalError| {
            let close = close.clone();
            closeable_ref.close_then(move || {
                close.reject(error);
            });
        });

        let manager = self.downgrade();
        let top_name = name.to_string();
        let handle_back = Rc::new(move || {
            Self::upgrade(&manager).is_some_and(|manager| manager.is_top(&top_name))
        });

        Box::new(Overlay::new(name, config.clone(), node, on_close, handle_back))
    }

    /// Deletes the named entry if present. Does not settle its result.
    pub fn remove(&self, name: &str) {
        let mut removed = false;
        self.set_portals(&mut |prev| {
            let next = prev.without(name);
            removed = !next.ptr_eq(prev);
            next
        });
        if removed {
            tracing::debug!(name, "portal removed");
        }
    }

    fn remove_entry(&self, name: &str, id: PortalId) {
        let mut removed = false;
        self.set_portals(&mut |prev| match prev.get(name) {
            Some(entry) if entry.id() == id => {
                removed = true;
                prev.without(name)
            }
            _ => prev.clone(),
        });
        if removed {
            tracing::debug!(name, id = id.raw(), "settled portal cleaned up");
        }
    }

    /// Clears the registry, then fails every dropped entry's result with an
    /// `Ignore`-coded error so no caller waits forever.
    pub fn remove_all(&self) {
        let mut dropped = Snapshot::empty();
        self.set_portals(&mut |prev| {
            if prev.is_empty() {
                return prev.clone();
            }
            dropped = prev.clone();
            Snapshot::empty()
        });
        tracing::debug!(count = dropped.len(), "all portals removed");
        for entry in dropped.iter() {
            entry.dismiss(PortalError::ignore(format!(
                "Portal {} removed by remove_all",
                entry.name()
            )));
        }
    }
}
