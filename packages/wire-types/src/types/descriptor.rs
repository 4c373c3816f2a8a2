use serde::{Deserialize, Serialize};

use super::wire_type::WireType;

/// Type metadata for a single wire value.
///
/// Descriptors are produced when a container derives its layout from a host value,
/// or supplied by a collaborator describing a result column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Wire type code
    pub wire_type: WireType,
    /// Buffer length in bytes, including any length prefix
    pub length: usize,
    /// Decimal precision, or temporal resolution
    pub precision: u16,
    /// Decimal scale
    pub scale: u16,
    /// Whether the null marker may be assigned
    pub nullable: bool,
    /// Optional column name
    pub name: Option<String>,
}

impl Descriptor {
    /// Creates a not-nullable, unnamed descriptor with zero precision and scale.
    pub fn new(wire_type: WireType, length: usize) -> Self {
        Self {
            wire_type,
            length,
            precision: 0,
            scale: 0,
            nullable: false,
            name: None,
        }
    }

    /// Sets precision and scale.
    pub fn with_precision(mut self, precision: u16, scale: u16) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Sets the nullable flag.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the column name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Descriptor of a blank-padded character buffer, used for rendering.
    pub fn char(length: usize) -> Self {
        Self::new(WireType::Char, length)
    }
}
