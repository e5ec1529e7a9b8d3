//! Render surface: mounts live portal entries and routes input to them.
//!
//! The surface never reads the store on its own; the owner hands it snapshots via
//! [`PortalSurface::sync`]. Syncing happens at the start of each render or input
//! dispatch, so content closing itself mid-dispatch never re-enters the surface.

use crate::core::component::{MountContext, PressOutcome};
use crate::core::host::BackHandler;
use crate::core::input_event::{Area, PortalEvent};
use crate::render::surface::RenderedPortal;
use crate::runtime::store::{PortalEntry, Snapshot};

pub struct PortalSurface {
    ctx: MountContext,
    last: Snapshot,
    /// Mounted entries, ascending by index.
    mounted: Vec<PortalEntry>,
}

impl PortalSurface {
    pub fn new(back_handler: BackHandler) -> Self {
        Self {
            ctx: MountContext { back_handler },
            last: Snapshot::empty(),
            mounted: Vec::new(),
        }
    }

    /// Reconciles mounted entries against `snapshot`.
    ///
    /// Entries are matched by identity, so a name reused after removal mounts
    /// fresh content even when it lands on the same key.
    pub fn sync(&mut self, snapshot: &Snapshot) {
        if snapshot.ptr_eq(&self.last) {
            return;
        }
        let next = snapshot.render_order();

        for entry in &self.mounted {
            if !next.iter().any(|live| live.id() == entry.id()) {
                tracing::trace!(key = %entry.key(), "portal unmounted");
                entry.renderable().borrow_mut().unmount();
            }
        }
        for entry in &next {
            if !self.mounted.iter().any(|mounted| mounted.id() == entry.id()) {
                tracing::trace!(key = %entry.key(), "portal mounted");
                entry.renderable().borrow_mut().mount(&self.ctx);
            }
        }

        self.mounted = next;
        self.last = snapshot.clone();
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Keys of mounted entries in render order.
    pub fn keys(&self) -> Vec<String> {
        self.mounted.iter().map(PortalEntry::key).collect()
    }

    /// Renders every mounted entry, bottom first. Empty when nothing is live.
    pub fn render(&mut self, area: Area) -> Vec<RenderedPortal> {
        self.mounted
            .iter()
            .map(|entry| {
                let mut renderable = entry.renderable().borrow_mut();
                let lines = renderable.render(area);
                RenderedPortal {
                    key: entry.key(),
                    name: entry.name().to_string(),
                    index: entry.index(),
                    lines,
                    backdrop: renderable.backdrop().cloned(),
                }
            })
            .collect()
    }

    /// Offers a press to each layer from the top down until one consumes it.
    pub fn press(&mut self, row: usize, col: usize) -> bool {
        for entry in self.mounted.iter().rev() {
            let outcome = entry.renderable().borrow_mut().press(row, col);
            if outcome == PressOutcome::Consumed {
                tracing::trace!(key = %entry.key(), row, col, "press consumed");
                return true;
            }
        }
        false
    }

    /// Routes a non-pointer event to the topmost entry.
    pub fn handle_event(&mut self, event: &PortalEvent) -> bool {
        if let PortalEvent::Press { row, col } = *event {
            return self.press(row, col);
        }
        match self.mounted.last() {
            Some(entry) => entry.renderable().borrow_mut().handle_event(event),
            None => false,
        }
    }
}

impl Drop for PortalSurface {
    fn drop(&mut self) {
        for entry in self.mounted.drain(..) {
            if let Ok(mut renderable) = entry.renderable().try_borrow_mut() {
                renderable.unmount();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::Renderable;
    use crate::core::error::PortalError;
    use crate::core::ident::PortalId;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        label: String,
        log: Log,
        absorb: bool,
    }

    impl Renderable for Recorder {
        fn render(&mut self, _area: Area) -> Vec<String> {
            vec![self.label.clone()]
        }

        fn handle_event(&mut self, event: &PortalEvent) -> bool {
            self.log.borrow_mut().push(format!("{}:{event:?}", self.label));
            true
        }

        fn press(&mut self, _row: usize, _col: usize) -> PressOutcome {
            self.log.borrow_mut().push(format!("{}:press", self.label));
            if self.absorb {
                PressOutcome::Consumed
            } else {
                PressOutcome::PassThrough
            }
        }

        fn mount(&mut self, _ctx: &MountContext) {
            self.log.borrow_mut().push(format!("mount {}", self.label));
        }

        fn unmount(&mut self) {
            self.log.borrow_mut().push(format!("unmount {}", self.label));
        }
    }

    fn entry(id: u64, name: &str, index: i64, absorb: bool, log: &Log) -> PortalEntry {
        PortalEntry::new(
            PortalId::from_raw(id),
            name,
            index,
            Box::new(Recorder {
                label: name.to_string(),
                log: Rc::clone(log),
                absorb,
            }),
            Rc::new(|_: PortalError| false),
        )
    }

    #[test]
    fn renders_ascending_by_index() {
        let log = Log::default();
        let snapshot = Snapshot::empty()
            .with_inserted(entry(1, "a", 5, true, &log))
            .with_inserted(entry(2, "b", 1, true, &log))
            .with_inserted(entry(3, "c", 3, true, &log));
        let mut surface = PortalSurface::new(BackHandler::new());
        surface.sync(&snapshot);

        let rendered = surface.render(Area::new(10, 4));
        let indices: Vec<i64> = rendered.iter().map(|portal| portal.index).collect();
        assert_eq!(indices, vec![1, 3, 5]);
        assert_eq!(surface.keys(), vec!["b_1", "c_3", "a_5"]);
    }

    #[test]
    fn empty_surface_renders_nothing() {
        let mut surface = PortalSurface::new(BackHandler::new());
        surface.sync(&Snapshot::empty());
        assert!(surface.is_empty());
        assert!(surface.render(Area::new(10, 4)).is_empty());
        assert!(!surface.press(0, 0));
    }

    #[test]
    fn sync_mounts_and_unmounts_by_identity() {
        let log = Log::default();
        let mut surface = PortalSurface::new(BackHandler::new());

        let first = Snapshot::empty().with_inserted(entry(1, "a", 0, true, &log));
        surface.sync(&first);
        surface.sync(&first);

        let removed = first.without("a");
        let reused = removed.with_inserted(entry(2, "a", 0, true, &log));
        surface.sync(&reused);
        surface.sync(&reused.without("a"));

        assert_eq!(
            *log.borrow(),
            vec!["mount a", "unmount a", "mount a", "unmount a"]
        );
    }

    #[test]
    fn press_falls_through_to_lower_layer() {
        let log = Log::default();
        let snapshot = Snapshot::empty()
            .with_inserted(entry(1, "low", 0, true, &log))
            .with_inserted(entry(2, "high", 1, false, &log));
        let mut surface = PortalSurface::new(BackHandler::new());
        surface.sync(&snapshot);
        log.borrow_mut().clear();

        assert!(surface.press(0, 0));
        assert_eq!(*log.borrow(), vec!["high:press", "low:press"]);
    }

    #[test]
    fn events_go_to_top_entry() {
        let log = Log::default();
        let snapshot = Snapshot::empty()
            .with_inserted(entry(1, "top", 9, true, &log))
            .with_inserted(entry(2, "below", 2, true, &log));
        let mut surface = PortalSurface::new(BackHandler::new());
        surface.sync(&snapshot);
        log.borrow_mut().clear();

        assert!(surface.handle_event(&PortalEvent::text("x")));
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].starts_with("top:"));
    }
}
