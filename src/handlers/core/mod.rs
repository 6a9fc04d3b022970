//! Core handler infrastructure: the per-dispatch context and the registry.

pub mod context;
pub mod registry;

pub use context::{Context, Handler, HandlerError, HandlerResult};
pub use registry::Registry;
