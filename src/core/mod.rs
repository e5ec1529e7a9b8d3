//! Leaf types: errors, result bridge, identities, component contract, host hooks.

pub mod component;
pub mod deferred;
pub mod error;
pub mod host;
pub mod ident;
pub mod input_event;
pub mod overlay_config;
