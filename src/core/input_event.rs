//! Input events routed to portal content.

/// Key id the host uses for the back gesture.
pub const BACK_KEY_ID: &str = "escape";

/// Input event delivered to portals.
///
/// Notes:
/// - `key_id` is a normalized identifier (`"escape"`, `"enter"`, `"ctrl+c"`, ..).
/// - `Press` coordinates are relative to the surface area, not the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    Key { key_id: String },
    Text { text: String },
    Press { row: usize, col: usize },
}

impl PortalEvent {
    pub fn key(key_id: impl Into<String>) -> Self {
        Self::Key {
            key_id: key_id.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn press(row: usize, col: usize) -> Self {
        Self::Press { row, col }
    }

    /// Whether the host should treat this event as a back gesture.
    pub fn is_back(&self) -> bool {
        matches!(self, Self::Key { key_id } if key_id == BACK_KEY_ID)
    }
}

/// Area available to the portal layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub cols: usize,
    pub rows: usize,
}

impl Area {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}
