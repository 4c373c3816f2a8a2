use crate::types::Descriptor;

/// Opaque environment handle returned by the native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvHandle(u64);

impl EnvHandle {
    /// Wraps a raw handle value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Completion status of a native call, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatStatus {
    Success,
    Message,
    Warning,
    NoData,
    Error,
    Failure,
    NotInitialized,
    InvalidHandle,
    OutOfMemory,
}

impl FormatStatus {
    /// True for statuses at or above `Error`.
    pub fn is_failure(self) -> bool {
        self >= FormatStatus::Error
    }
}

/// Read-only side of a conversion.
#[derive(Debug, Clone, Copy)]
pub struct Operand<'a> {
    pub descriptor: &'a Descriptor,
    pub data: &'a [u8],
}

impl<'a> Operand<'a> {
    pub fn new(descriptor: &'a Descriptor, data: &'a [u8]) -> Self {
        Self { descriptor, data }
    }
}

/// Writable side of a conversion.
#[derive(Debug)]
pub struct OperandMut<'a> {
    pub descriptor: &'a Descriptor,
    pub data: &'a mut [u8],
}

impl<'a> OperandMut<'a> {
    pub fn new(descriptor: &'a Descriptor, data: &'a mut [u8]) -> Self {
        Self { descriptor, data }
    }
}

/// A described source paired with a described destination.
#[derive(Debug)]
pub struct ConversionRequest<'a> {
    pub source: Operand<'a>,
    pub target: OperandMut<'a>,
}

/// Services consumed from the native client library.
///
/// Implementations block until the conversion completes.
pub trait NativeClient {
    /// Initializes the client at a protocol version.
    ///
    /// # Returns
    /// `Some(EnvHandle)` when the version is accepted, `None` otherwise.
    fn initialize(&self, version: u32) -> Option<EnvHandle>;

    /// Converts the source operand into the target operand's type.
    fn format(&self, env: EnvHandle, request: ConversionRequest<'_>) -> FormatStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_severity() {
        assert!(!FormatStatus::Success.is_failure());
        assert!(!FormatStatus::Warning.is_failure());
        assert!(FormatStatus::Error.is_failure());
        assert!(FormatStatus::InvalidHandle.is_failure());
    }
}
