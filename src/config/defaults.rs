//! Default value functions for configuration.

pub fn default_server_name() -> String {
    "whapp-irc".to_string()
}

pub fn default_listen_address() -> std::net::SocketAddr {
    std::net::SocketAddr::from(([127, 0, 0, 1], 6060))
}

// =============================================================================
// Bridge Defaults
// =============================================================================

/// Largest single event line accepted from the bridge (chat payloads with
/// inline attachments can be big).
pub fn default_max_event_bytes() -> usize {
    64 * 1024 * 1024
}

// =============================================================================
// Blob Defaults
// =============================================================================

pub fn default_blob_path() -> String {
    "blobs".to_string()
}

pub fn default_blob_base_url() -> String {
    "http://localhost:3000".to_string()
}

pub fn default_blob_max_size() -> usize {
    32 * 1024 * 1024
}

// =============================================================================
// Limit Defaults
// =============================================================================

pub fn default_max_line_length() -> usize {
    slirc_wire::line::DEFAULT_MAX_LINE_LEN
}

pub fn default_send_queue() -> usize {
    1024
}
