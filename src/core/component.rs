//! Portal component contract.
//!
//! Application content implements [`PortalComponent`]; the registry erases the
//! result type by wrapping it into a [`Renderable`], which is what snapshots store
//! and what the render surface mounts.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::deferred::Deferred;
use crate::core::error::PortalError;
use crate::core::host::BackHandler;
use crate::core::input_event::{Area, PortalEvent};
use crate::core::overlay_config::OverlayConfig;

/// Imperative close capability, typically a pre-close animation.
///
/// Implementations must eventually call `done` exactly once.
pub trait Closeable {
    fn close(&mut self, done: Box<dyn FnOnce()>);
}

/// Slot through which content may expose a [`Closeable`].
///
/// The slot holds a weak reference: the content keeps ownership of the target,
/// and a dropped target behaves like an empty slot.
#[derive(Clone, Default)]
pub struct CloseableRef {
    slot: Rc<RefCell<Option<Weak<RefCell<dyn Closeable>>>>>,
}

impl CloseableRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach<C: Closeable + 'static>(&self, target: &Rc<RefCell<C>>) {
        let target: Rc<RefCell<dyn Closeable>> = target.clone();
        *self.slot.borrow_mut() = Some(Rc::downgrade(&target));
    }

    pub fn detach(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn get(&self) -> Option<Rc<RefCell<dyn Closeable>>> {
        self.slot.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Runs the attached closeable, then `done`; runs `done` directly when empty.
    pub fn close_then(&self, done: impl FnOnce() + 'static) {
        match self.get() {
            Some(target) => target.borrow_mut().close(Box::new(done)),
            None => done(),
        }
    }
}

/// Settles the result of one portal.
pub struct Closer<T> {
    bridge: Deferred<T>,
}

impl<T> Clone for Closer<T> {
    fn clone(&self) -> Self {
        Self {
            bridge: self.bridge.clone(),
        }
    }
}

impl<T> Closer<T> {
    pub(crate) fn new(bridge: Deferred<T>) -> Self {
        Self { bridge }
    }

    /// Settles with a value or a failure. Returns `false` if already settled.
    pub fn close(&self, outcome: Result<T, PortalError>) -> bool {
        self.bridge.settle(outcome)
    }

    pub fn resolve(&self, value: T) -> bool {
        self.bridge.resolve(value)
    }

    pub fn reject(&self, error: PortalError) -> bool {
        self.bridge.reject(error)
    }

    pub fn is_closed(&self) -> bool {
        self.bridge.is_settled()
    }
}

/// Input handed to portal content.
pub struct PortalProps<T> {
    pub name: String,
    pub index: i64,
    pub close: Closer<T>,
    pub closeable_ref: CloseableRef,
}

impl<T> Clone for PortalProps<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            index: self.index,
            close: self.close.clone(),
            closeable_ref: self.closeable_ref.clone(),
        }
    }
}

/// Content shown inside a portal.
pub trait PortalComponent<T> {
    /// Render to a list of lines at the given width.
    fn render(&mut self, props: &PortalProps<T>, width: usize) -> Vec<String>;

    /// Handle input routed to this portal. Returns whether the event was consumed.
    fn handle_event(&mut self, _props: &PortalProps<T>, _event: &PortalEvent) -> bool {
        false
    }
}

impl<T, F> PortalComponent<T> for F
where
    F: FnMut(&PortalProps<T>, usize) -> Vec<String>,
{
    fn render(&mut self, props: &PortalProps<T>, width: usize) -> Vec<String> {
        self(props, width)
    }
}

/// Outcome of routing a pointer press into a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The press landed on this layer.
    Consumed,
    /// The press should continue to the layer beneath.
    PassThrough,
}

/// Host services available while a renderable is mounted.
#[derive(Clone, Default)]
pub struct MountContext {
    pub back_handler: BackHandler,
}

/// Type-erased portal content as stored in registry snapshots.
pub trait Renderable {
    /// Render into the given area. Lines may be shorter than `area.cols`.
    fn render(&mut self, area: Area) -> Vec<String>;

    /// Non-pointer input. Returns whether the event was consumed.
    fn handle_event(&mut self, _event: &PortalEvent) -> bool {
        false
    }

    /// Pointer press at surface coordinates.
    fn press(&mut self, _row: usize, _col: usize) -> PressOutcome {
        PressOutcome::PassThrough
    }

    /// Called once when the render surface starts showing this entry.
    fn mount(&mut self, _ctx: &MountContext) {}

    /// Called once when the render surface stops showing this entry.
    fn unmount(&mut self) {}

    /// Backdrop presentation, for layers that paint one.
    fn backdrop(&self) -> Option<&OverlayConfig> {
        None
    }
}

/// Adapts a typed [`PortalComponent`] to [`Renderable`].
pub(crate) struct PortalNode<T> {
    props: PortalProps<T>,
    component: Box<dyn PortalComponent<T>>,
    rendered: Area,
}

impl<T> PortalNode<T> {
    pub(crate) fn new(props: PortalProps<T>, component: Box<dyn PortalComponent<T>>) -> Self {
        Self {
            props,
            component,
            rendered: Area::default(),
        }
    }
}

impl<T> Renderable for PortalNode<T> {
    fn render(&mut self, area: Area) -> Vec<String> {
        let lines = self.component.render(&self.props, area.cols);
        self.rendered = Area::new(area.cols, lines.len());
        lines
    }

    fn handle_event(&mut self, event: &PortalEvent) -> bool {
        self.component.handle_event(&self.props, event)
    }

    fn press(&mut self, row: usize, col: usize) -> PressOutcome {
        if !self.rendered.contains(row, col) {
            return PressOutcome::PassThrough;
        }
        self.component
            .handle_event(&self.props, &PortalEvent::press(row, col));
        PressOutcome::Consumed
    }
}
