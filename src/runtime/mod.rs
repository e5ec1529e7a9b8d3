//! Stateful pieces: store, registry, render surface, provider.

pub mod manager;
pub mod provider;
pub mod store;
pub mod surface;

pub use manager::PortalManager;
pub use provider::{use_portal, PortalContext, PortalProvider};
