//! Rendering: overlay interceptor, layer compositing, width helpers.

pub mod overlay;
pub mod surface;
pub mod width;

pub use surface::{composite, RenderedPortal};
