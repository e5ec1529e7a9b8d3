//! Overlay interceptor: full-area backdrop with dismissal gestures.
//!
//! The backdrop covers the whole portal area and places its content at one of nine
//! orientations. While mounted and closeable it listens for back presses, but only
//! claims one when its portal is the top of the stack; lower overlays decline so the
//! event reaches whichever portal is actually on top.

use std::rc::Rc;

use crate::core::component::{MountContext, PressOutcome, Renderable};
use crate::core::error::PortalError;
use crate::core::host::BackSubscription;
use crate::core::input_event::{Area, PortalEvent};
use crate::core::overlay_config::{Align, Orientation, OverlayConfig, PointerEvents};
use crate::render::width::{fit_to_width, visible_width};

/// Where overlay content landed during the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBox {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl ContentBox {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row + self.height && col >= self.col && col < self.col + self.width
    }
}

fn resolve_offset(align: Align, size: usize, avail: usize) -> usize {
    match align {
        Align::Start => 0,
        Align::Center => avail.saturating_sub(size) / 2,
        Align::End => avail.saturating_sub(size),
    }
}

/// Places a `width` x `height` block inside `area` according to `orientation`.
pub fn resolve_content_box(orientation: Orientation, width: usize, height: usize, area: Area) -> ContentBox {
    let width = width.min(area.cols);
    let height = height.min(area.rows);
    ContentBox {
        row: resolve_offset(orientation.vertical(), height, area.rows),
        col: resolve_offset(orientation.horizontal(), width, area.cols),
        width,
        height,
    }
}

/// Backdrop wrapper around portal content.
pub(crate) struct Overlay {
    name: String,
    config: OverlayConfig,
    child: Box<dyn Renderable>,
    on_close: Rc<dyn Fn(PortalError)>,
    handle_back: Rc<dyn Fn() -> bool>,
    subscription: Option<BackSubscription>,
    content: Option<ContentBox>,
}

impl Overlay {
    pub(crate) fn new(
        name: &str,
        config: OverlayConfig,
        child: Box<dyn Renderable>,
        on_close: Rc<dyn Fn(PortalError)>,
        handle_back: Rc<dyn Fn() -> bool>,
    ) -> Self {
        Self {
            name: name.to_string(),
            config,
            child,
            on_close,
            handle_back,
            subscription: None,
            content: None,
        }
    }

    fn press_backdrop(&self) {
        if !self.config.dismisses_on_press() {
            return;
        }
        tracing::debug!(name = %self.name, "overlay backdrop pressed");
        (self.on_close)(PortalError::overlay_press(&self.name));
    }
}

impl Renderable for Overlay {
    fn render(&mut self, area: Area) -> Vec<String> {
        let mut lines = self.child.render(area);
        lines.truncate(area.rows);
        let width = lines.iter().map(|line| visible_width(line)).max().unwrap_or(0);
        let content = resolve_content_box(self.config.orientation, width, lines.len(), area);
        self.content = Some(content);

        let blank = " ".repeat(area.cols);
        let right_pad = area.cols - content.col - content.width;
        let mut out = Vec::with_capacity(area.rows);
        for row in 0..area.rows {
            if row < content.row || row >= content.row + content.height {
                out.push(blank.clone());
                continue;
            }
            let line = &lines[row - content.row];
            let mut composed = String::with_capacity(area.cols + line.len());
            composed.push_str(&blank[..content.col]);
            composed.push_str(&fit_to_width(line, content.width));
            composed.push_str(&blank[..right_pad]);
            out.push(composed);
        }
        out
    }

    fn handle_event(&mut self, event: &PortalEvent) -> bool {
        self.child.handle_event(event)
    }

    fn press(&mut self, row: usize, col: usize) -> PressOutcome {
        match self.config.effective_pointer_events() {
            PointerEvents::None => return PressOutcome::PassThrough,
            PointerEvents::BoxOnly => return PressOutcome::Consumed,
            PointerEvents::Auto | PointerEvents::BoxNone => {}
        }

        match self.content {
            Some(content) if content.contains(row, col) => {
                self.child.press(row - content.row, col - content.col);
            }
            _ => self.press_backdrop(),
        }
        PressOutcome::Consumed
    }

    fn mount(&mut self, ctx: &MountContext) {
        self.child.mount(ctx);
        if !self.config.closeable || self.subscription.is_some() {
            return;
        }

        let name = self.name.clone();
        let handle_back = Rc::clone(&self.handle_back);
        let on_close = Rc::clone(&self.on_close);
        self.subscription = Some(ctx.back_handler.add_listener(move || {
            let claimed = handle_back();
            tracing::trace!(name = %name, claimed, "overlay back press");
            if claimed {
                on_close(PortalError::hardware_back_press(&name));
            }
            claimed
        }));
    }

    fn unmount(&mut self) {
        self.subscription.take();
        self.child.unmount();
    }

    fn backdrop(&self) -> Option<&OverlayConfig> {
        Some(&self.config)
    }
}
