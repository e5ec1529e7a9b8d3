//! Overlay presentation options.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default backdrop color.
pub const DEFAULT_BG_COLOR: &str = "rgba(0,0,0,0.4)";

/// Placement of overlay content along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// Content placement on the backdrop: horizontal position then vertical position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    LeftTop,
    LeftMiddle,
    LeftBottom,
    CenterTop,
    #[default]
    CenterMiddle,
    CenterBottom,
    RightTop,
    RightMiddle,
    RightBottom,
}

impl Orientation {
    pub const ALL: [Orientation; 9] = [
        Self::LeftTop,
        Self::LeftMiddle,
        Self::LeftBottom,
        Self::CenterTop,
        Self::CenterMiddle,
        Self::CenterBottom,
        Self::RightTop,
        Self::RightMiddle,
        Self::RightBottom,
    ];

    pub fn horizontal(self) -> Align {
        match self {
            Self::LeftTop | Self::LeftMiddle | Self::LeftBottom => Align::Start,
            Self::CenterTop | Self::CenterMiddle | Self::CenterBottom => Align::Center,
            Self::RightTop | Self::RightMiddle | Self::RightBottom => Align::End,
        }
    }

    pub fn vertical(self) -> Align {
        match self {
            Self::LeftTop | Self::CenterTop | Self::RightTop => Align::Start,
            Self::LeftMiddle | Self::CenterMiddle | Self::RightMiddle => Align::Center,
            Self::LeftBottom | Self::CenterBottom | Self::RightBottom => Align::End,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftTop => "leftTop",
            Self::LeftMiddle => "leftMiddle",
            Self::LeftBottom => "leftBottom",
            Self::CenterTop => "centerTop",
            Self::CenterMiddle => "centerMiddle",
            Self::CenterBottom => "centerBottom",
            Self::RightTop => "rightTop",
            Self::RightMiddle => "rightMiddle",
            Self::RightBottom => "rightBottom",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown overlay orientation '{0}'")]
pub struct ParseOrientationError(String);

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|orientation| orientation.as_str() == value)
            .ok_or_else(|| ParseOrientationError(value.to_string()))
    }
}

/// Pointer routing for the overlay layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerEvents {
    /// Backdrop and content both receive presses.
    #[default]
    Auto,
    /// The container is not a target; backdrop and content still are.
    BoxNone,
    /// The container absorbs presses; neither backdrop nor content receives them.
    BoxOnly,
    /// Presses fall through to lower layers.
    None,
}

/// Per-portal overlay presentation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Master switch for every dismissal gesture.
    pub closeable: bool,
    /// Whether pressing the backdrop dismisses (requires `closeable`).
    pub overlay_press_closeable: bool,
    pub orientation: Orientation,
    pub bg_color: String,
    /// `None` inherits the host default, which behaves like [`PointerEvents::Auto`].
    pub pointer_events: Option<PointerEvents>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            closeable: true,
            overlay_press_closeable: true,
            orientation: Orientation::default(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            pointer_events: None,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }

    pub fn overlay_press_closeable(mut self, closeable: bool) -> Self {
        self.overlay_press_closeable = closeable;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn bg_color(mut self, color: impl Into<String>) -> Self {
        self.bg_color = color.into();
        self
    }

    pub fn pointer_events(mut self, mode: PointerEvents) -> Self {
        self.pointer_events = Some(mode);
        self
    }

    pub fn dismisses_on_press(&self) -> bool {
        self.closeable && self.overlay_press_closeable
    }

    pub fn effective_pointer_events(&self) -> PointerEvents {
        self.pointer_events.unwrap_or_default()
    }
}
