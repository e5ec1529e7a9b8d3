//! Imperative portal layer for terminal UIs.
//!
//! A portal is a piece of content shown above the main UI (dialog, sheet, menu)
//! whose outcome the caller awaits:
//!
//! ```ignore
//! let provider = PortalProvider::new();
//! let _scope = provider.enter();
//! let answer = use_portal()
//!     .show_with_overlay(PortalRequest::from_fn(|props: &PortalProps<bool>, _width| {
//!         vec![format!("Delete {}?", props.name)]
//!     }))
//!     .await;
//! ```
//!
//! Invariants:
//! - Registry state is only ever replaced with a new [`Snapshot`]; observers compare
//!   snapshots by identity.
//! - A name identifies at most one live portal. Stacking is decided by index alone.
//! - Every result settles at most once; settling removes the portal from the registry.
//! - Only the top portal's overlay claims back presses.
//!
//! # Public API Overview
//! - Open and close portals through [`PortalContext`] / [`PortalManager`].
//! - Render and route input through [`PortalProvider`] (or a [`PortalSurface`] fed by
//!   any [`StateSink`]).
//! - Configure backdrops with [`OverlayConfig`].

#![allow(clippy::type_complexity)]

pub mod config;
pub mod logging;

pub mod core;
pub mod render;
pub mod runtime;

/// Errors carried by rejected portal results.
pub use crate::core::error::{ContextError, PortalError, PortalErrorCode};

/// Result bridge.
pub use crate::core::deferred::{deferred, Deferred, PortalResult};

/// Portal content contract.
pub use crate::core::component::{
    Closeable, CloseableRef, Closer, MountContext, PortalComponent, PortalProps, PressOutcome,
    Renderable,
};

/// Host hooks.
pub use crate::core::host::{BackHandler, BackSubscription, NoKeyboard, SoftKeyboard};

pub use crate::core::ident::{generate_name, PortalId, DEFAULT_NAME_PREFIX};
pub use crate::core::input_event::{Area, PortalEvent, BACK_KEY_ID};

/// Overlay presentation options.
pub use crate::core::overlay_config::{
    Align, Orientation, OverlayConfig, ParseOrientationError, PointerEvents, DEFAULT_BG_COLOR,
};

/// Layer compositing and layout.
pub use crate::render::overlay::{resolve_content_box, ContentBox};
pub use crate::render::surface::{composite, RenderedPortal};
pub use crate::render::width::{fit_to_width, visible_width};

/// Registry, state sinks, and providers.
pub use crate::runtime::manager::{
    ManagerOptions, PortalHandle, PortalManager, PortalRequest, PortalShow,
};
pub use crate::runtime::provider::{use_portal, PortalContext, PortalProvider, ProviderScope};
pub use crate::runtime::store::{PortalEntry, PortalStore, Snapshot, StateSink, StoreSubscription};
pub use crate::runtime::surface::PortalSurface;

pub use crate::config::EnvConfig;
