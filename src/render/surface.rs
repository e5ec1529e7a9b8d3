//! Layer compositing.

use crate::core::input_event::Area;
use crate::core::overlay_config::OverlayConfig;
use crate::render::width::fit_to_width;

/// Output of one live portal for a single frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPortal {
    /// `"{name}_{index}"`; stable for as long as the entry is live.
    pub key: String,
    pub name: String,
    pub index: i64,
    pub lines: Vec<String>,
    /// Set for overlay layers, which cover every row of the area.
    pub backdrop: Option<OverlayConfig>,
}

/// Paints `layers` bottom-up over `base`.
///
/// Each layer replaces the rows it rendered; an overlay layer renders every row and
/// so hides everything below it. The result has exactly `area.rows` lines, each
/// padded or truncated to `area.cols`.
pub fn composite(base: &[String], layers: &[RenderedPortal], area: Area) -> Vec<String> {
    let mut out: Vec<String> = (0..area.rows)
        .map(|row| fit_to_width(base.get(row).map(String::as_str).unwrap_or(""), area.cols))
        .collect();

    for layer in layers {
        for (row, line) in layer.lines.iter().take(area.rows).enumerate() {
            out[row] = fit_to_width(line, area.cols);
        }
    }
    out
}
