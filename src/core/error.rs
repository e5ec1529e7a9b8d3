//! Portal failure taxonomy.

use std::fmt;

use thiserror::Error;

/// Classification attached to every [`PortalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortalErrorCode {
    /// Unclassified close; the default when content closes itself with an error.
    #[default]
    Ignore,
    /// A live portal already owns the requested name.
    PortalAlreadyExists,
    /// The backdrop of an overlay was pressed.
    CloseByOverlayPress,
    /// The platform back gesture (or its terminal equivalent) dismissed the overlay.
    CloseByHardwareBackPress,
    /// Application-defined cancel action.
    CloseByUserCancel,
}

impl PortalErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "Ignore",
            Self::PortalAlreadyExists => "PortalAlreadyExists",
            Self::CloseByOverlayPress => "CloseByOverlayPress",
            Self::CloseByHardwareBackPress => "CloseByHardwareBackPress",
            Self::CloseByUserCancel => "CloseByUserCancel",
        }
    }
}

impl fmt::Display for PortalErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure delivered through a portal's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PortalError {
    message: String,
    code: PortalErrorCode,
}

impl PortalError {
    #[must_use]
    pub fn new(message: impl Into<String>, code: PortalErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Error with the default [`PortalErrorCode::Ignore`] classification.
    #[must_use]
    pub fn ignore(message: impl Into<String>) -> Self {
        Self::new(message, PortalErrorCode::Ignore)
    }

    #[must_use]
    pub fn user_cancel(message: impl Into<String>) -> Self {
        Self::new(message, PortalErrorCode::CloseByUserCancel)
    }

    pub(crate) fn already_exists(name: &str) -> Self {
        Self::new(
            format!("Portal {name} already exists"),
            PortalErrorCode::PortalAlreadyExists,
        )
    }

    pub(crate) fn overlay_press(name: &str) -> Self {
        Self::new(
            format!("Overlay {name} closed by overlay press"),
            PortalErrorCode::CloseByOverlayPress,
        )
    }

    pub(crate) fn hardware_back_press(name: &str) -> Self {
        Self::new(
            format!("Overlay {name} closed by hardware back press"),
            PortalErrorCode::CloseByHardwareBackPress,
        )
    }

    pub fn code(&self) -> PortalErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ignore(&self) -> bool {
        self.code == PortalErrorCode::Ignore
    }

    pub fn is_portal_already_exists(&self) -> bool {
        self.code == PortalErrorCode::PortalAlreadyExists
    }

    pub fn is_close_by_overlay_press(&self) -> bool {
        self.code == PortalErrorCode::CloseByOverlayPress
    }

    pub fn is_close_by_hardware_back_press(&self) -> bool {
        self.code == PortalErrorCode::CloseByHardwareBackPress
    }

    pub fn is_close_by_user_cancel(&self) -> bool {
        self.code == PortalErrorCode::CloseByUserCancel
    }
}

impl Default for PortalError {
    fn default() -> Self {
        Self::ignore("Portal closed")
    }
}

/// Programming errors raised when the ambient portal context is misused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("You should use \"PortalProvider\" to wrap this component")]
    MissingProvider,
}
