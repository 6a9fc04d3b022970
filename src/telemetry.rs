//! Span constructors shared by the session loop and the handlers.

/// Standardized spans for session observability.
pub mod spans {
    use tracing::{debug_span, info_span, Span};

    /// Span for one accepted IRC connection and its bridge.
    pub fn session(id: u64, addr: &str) -> Span {
        info_span!("session", id = id, addr = %addr)
    }

    /// Span for one dispatched IRC command.
    pub fn command(name: &str, source: &str) -> Span {
        info_span!("command", name = %name, source = %source)
    }

    /// Span for one bridge event.
    pub fn event(kind: &str) -> Span {
        debug_span!("event", kind = %kind)
    }
}
