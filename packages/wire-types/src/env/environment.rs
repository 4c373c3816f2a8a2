use once_cell::unsync::OnceCell;

use super::client::{ConversionRequest, EnvHandle, NativeClient, Operand, OperandMut};
use crate::config::WireConfig;
use crate::error::{Result, WireError};
use crate::types::Descriptor;

/// Conversion context shared by every wire value.
///
/// Holds the native client and the environment handle it issued. The handle is
/// set at most once; later publications are ignored.
pub struct Environment {
    client: Box<dyn NativeClient>,
    config: WireConfig,
    handle: OnceCell<EnvHandle>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("config", &self.config)
            .field("handle", &self.handle.get())
            .finish_non_exhaustive()
    }
}

impl Environment {
    /// Creates an unpublished environment with the default configuration.
    pub fn new(client: impl NativeClient + 'static) -> Self {
        Self::with_config(client, WireConfig::default())
    }

    /// Creates an unpublished environment.
    pub fn with_config(client: impl NativeClient + 'static, config: WireConfig) -> Self {
        Self {
            client: Box::new(client),
            config,
            handle: OnceCell::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    /// Publishes the environment handle.
    ///
    /// With no handle, initializes the native client at the latest configured
    /// protocol version, falling back one version at a time down to 1.
    ///
    /// # Arguments
    /// * `handle` - Handle obtained elsewhere, or `None` to initialize here
    ///
    /// # Returns
    /// The published handle. Once a handle is set it is returned unchanged.
    pub fn publish(&self, handle: Option<EnvHandle>) -> Result<EnvHandle> {
        if let Some(current) = self.handle.get() {
            return Ok(*current);
        }

        let handle = match handle {
            Some(handle) => handle,
            None => self.initialize_latest()?,
        };
        let _ = self.handle.set(handle);
        Ok(handle)
    }

    fn initialize_latest(&self) -> Result<EnvHandle> {
        for version in (1..=self.config.latest_protocol_version).rev() {
            match self.client.initialize(version) {
                Some(handle) => {
                    tracing::debug!(version, handle = handle.raw(), "native client initialized");
                    return Ok(handle);
                }
                None => tracing::debug!(version, "protocol version rejected"),
            }
        }
        tracing::error!("native client rejected every protocol version");
        Err(WireError::Initialization {
            message: "can't initialize native client".to_string(),
        })
    }

    /// Returns the published handle, if any.
    pub fn current(&self) -> Option<EnvHandle> {
        self.handle.get().copied()
    }

    /// Converts `source` into `target` through the native client.
    pub fn format(&self, source: Operand<'_>, target: OperandMut<'_>) -> Result<()> {
        let handle = self.current().ok_or_else(|| WireError::Initialization {
            message: "environment handle not published".to_string(),
        })?;

        let from = source.descriptor.wire_type;
        let to = target.descriptor.wire_type;
        let status = self
            .client
            .format(handle, ConversionRequest { source, target });
        if status.is_failure() {
            tracing::warn!(%from, %to, ?status, "native conversion failed");
            return Err(WireError::ConversionFailed);
        }
        Ok(())
    }

    /// Renders a value into text through a character buffer.
    pub fn render(&self, source: Operand<'_>) -> Result<String> {
        let width = self.config.conversion_width;
        let descriptor = Descriptor::char(width);
        let mut buf = vec![b' '; width];
        self.format(source, OperandMut::new(&descriptor, &mut buf))?;
        let text = String::from_utf8_lossy(&buf);
        Ok(text.trim_end_matches([' ', '\0']).to_string())
    }

    /// Parses text into `target` through a character buffer.
    pub fn parse_into(&self, text: &str, target: OperandMut<'_>) -> Result<()> {
        let width = text.len().max(self.config.conversion_width);
        let mut buf = vec![b' '; width];
        buf[..text.len()].copy_from_slice(text.as_bytes());
        let descriptor = Descriptor::char(width);
        self.format(Operand::new(&descriptor, &buf), target)
    }
}
