//! Environment configuration.

/// Configuration for an [`Environment`](crate::env::Environment).
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Highest native client protocol version tried by `publish`
    pub latest_protocol_version: u32,
    /// Width of the character buffer used when rendering through the native client
    pub conversion_width: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            latest_protocol_version: 11, // IIAPI_VERSION_11
            conversion_width: 64,
        }
    }
}
