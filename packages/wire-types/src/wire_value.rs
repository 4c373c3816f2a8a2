//! Wire value containers.
//!
//! A [`WireValue`] owns one descriptor, one buffer of exactly `descriptor.length`
//! bytes and a null flag. The buffer is never resized after construction.

use std::fmt;
use std::sync::Arc;

use crate::codec::{self, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

/// View of a value for parameter binding.
#[derive(Debug, Clone, Copy)]
pub struct DataValue<'a> {
    pub null: bool,
    pub data: &'a [u8],
}

/// Typed container holding one value in wire layout.
pub struct WireValue {
    descriptor: Descriptor,
    codec: Arc<dyn Codec>,
    buf: Vec<u8>,
    null: bool,
}

impl fmt::Debug for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireValue")
            .field("declaration", &self.declared_type())
            .field("name", &self.descriptor.name)
            .field("null", &self.null)
            .field("data", &hex::encode(&self.buf))
            .finish()
    }
}

/// Declaration and formatted value of a [`WireValue`], e.g. `VARCHAR(8) 'abc'`.
///
/// Nullable containers add `WITH NULL`; a null value renders as `NULL` and a
/// value the client cannot format as its hex dump.
#[derive(Debug, Clone, Copy)]
pub struct Displayed<'a> {
    value: &'a WireValue,
    env: &'a Environment,
}

impl fmt::Display for Displayed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.declared_type())?;
        if self.value.is_nullable() {
            f.write_str(" WITH NULL")?;
        }
        match self.value.formatted(self.env) {
            Ok(Some(text)) => write!(f, " '{text}'"),
            Ok(None) => f.write_str(" NULL"),
            Err(_) => write!(f, " 0x{}", hex::encode(&self.value.buf)),
        }
    }
}

impl WireValue {
    /// Starts building a value of `wire_type`.
    pub fn builder(wire_type: WireType) -> WireValueBuilder {
        WireValueBuilder::new(wire_type)
    }

    /// Allocates an empty container described by `descriptor`.
    ///
    /// The descriptor is cloned; nullability comes from the descriptor.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self> {
        Self::with_codec(codec::builtin(descriptor.wire_type), descriptor.clone())
    }

    pub(crate) fn with_codec(codec: Arc<dyn Codec>, descriptor: Descriptor) -> Result<Self> {
        codec.validate(&descriptor)?;
        let buf = vec![0u8; descriptor.length];
        Ok(Self {
            descriptor,
            codec,
            buf,
            null: false,
        })
    }

    /// Returns the descriptor.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Returns the column name, if any.
    pub fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    /// True when the null marker is set.
    pub fn is_null(&self) -> bool {
        self.null
    }

    /// True when the null marker may be assigned.
    pub fn is_nullable(&self) -> bool {
        self.descriptor.nullable
    }

    /// SQL type declaration, e.g. `DECIMAL(5,2)`.
    pub fn declared_type(&self) -> String {
        self.codec.declaration(&self.descriptor)
    }

    fn operand(&self) -> Operand<'_> {
        Operand::new(&self.descriptor, &self.buf)
    }

    /// Assigns a host value.
    ///
    /// On error the buffer and null flag keep their previous contents.
    ///
    /// # Returns
    /// `Err(WireError::NotNullable)` for null on a not-nullable container,
    /// `Err(WireError::Immutable)` for read-only types, or the codec's error.
    pub fn set(&mut self, env: &Environment, value: impl Into<Value>) -> Result<()> {
        if !self.codec.is_assignable() {
            return Err(WireError::Immutable {
                declaration: self.declared_type(),
            });
        }
        let value = value.into().resolved();
        if value.is_null() {
            if !self.descriptor.nullable {
                return Err(WireError::NotNullable);
            }
            self.null = true;
            return Ok(());
        }

        let mut scratch = self.buf.clone();
        self.codec
            .encode(env, OperandMut::new(&self.descriptor, &mut scratch), &value)?;
        self.buf = scratch;
        self.null = false;
        Ok(())
    }

    /// Assigns the value held by another container, converted by the native client.
    pub fn set_from(&mut self, env: &Environment, source: &WireValue) -> Result<()> {
        if !self.codec.is_assignable() {
            return Err(WireError::Immutable {
                declaration: self.declared_type(),
            });
        }
        if source.null {
            return self.set(env, Value::Null);
        }

        let mut scratch = self.buf.clone();
        env.format(
            source.operand(),
            OperandMut::new(&self.descriptor, &mut scratch),
        )?;
        self.buf = scratch;
        self.null = false;
        Ok(())
    }

    /// Reads the host value, or `Value::Null` when the null marker is set.
    pub fn get(&self, env: &Environment) -> Result<Value> {
        if self.null {
            return Ok(Value::Null);
        }
        self.codec.decode(env, self.operand())
    }

    /// Human-readable rendering, `None` when null.
    pub fn formatted(&self, env: &Environment) -> Result<Option<String>> {
        if self.null {
            return Ok(None);
        }
        self.codec.formatted(env, self.operand()).map(Some)
    }

    /// Renders declaration and value through `env`.
    pub fn display<'a>(&'a self, env: &'a Environment) -> Displayed<'a> {
        Displayed { value: self, env }
    }

    /// Hex dump of the buffer, empty when null.
    pub fn peek(&self) -> String {
        if self.null {
            return String::new();
        }
        hex::encode(&self.buf)
    }

    /// Overwrites the leading bytes of the buffer.
    ///
    /// Input longer than the buffer is cut; bytes past the input keep their
    /// contents. The null marker is left as it is.
    pub fn poke(&mut self, bytes: &[u8]) {
        let len = bytes.len().min(self.buf.len());
        self.buf[..len].copy_from_slice(&bytes[..len]);
    }

    /// Like [`poke`](Self::poke) with hexadecimal input, optionally `0x` prefixed.
    pub fn poke_hex(&mut self, text: &str) -> Result<()> {
        let digits = text.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        let type_name = self.descriptor.wire_type.name();
        let bytes = hex::decode(digits)
            .map_err(|_| WireError::domain(type_name, format!("'{text}' is not hexadecimal")))?;
        self.poke(&bytes);
        Ok(())
    }

    /// Resets the buffer to the type's blank pattern.
    pub fn clear(&mut self) {
        self.codec.clear(&self.descriptor, &mut self.buf);
    }

    /// Pointer to the buffer, for handing to the native client.
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }

    /// Buffer length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True for a zero-length buffer, which validation never allows.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Buffer contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Null flag and buffer, for parameter binding.
    pub fn data_value(&self) -> DataValue<'_> {
        DataValue {
            null: self.null,
            data: &self.buf,
        }
    }

    /// Writable buffer for result materialization.
    ///
    /// Sets the null marker to `null` before the caller fills the buffer.
    pub fn receive(&mut self, null: bool) -> &mut [u8] {
        self.null = null;
        &mut self.buf
    }
}

/// Builder for [`WireValue`].
///
/// Either a value (with the family's optional size, resolution, precision and
/// scale) or a descriptor must be given, never both.
#[derive(Debug)]
pub struct WireValueBuilder {
    wire_type: WireType,
    args: Args,
    descriptor: Option<Descriptor>,
    nullable: Option<bool>,
    name: Option<String>,
}

impl WireValueBuilder {
    fn new(wire_type: WireType) -> Self {
        Self {
            wire_type,
            args: Args::default(),
            descriptor: None,
            nullable: None,
            name: None,
        }
    }

    /// Initial value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.args.value = Some(value.into());
        self
    }

    /// Size in bytes (characters for wide strings).
    pub fn size(mut self, size: usize) -> Self {
        self.args.size = Some(size);
        self
    }

    /// Fractional-second digits.
    pub fn resolution(mut self, resolution: u16) -> Self {
        self.args.resolution = Some(resolution);
        self
    }

    /// Decimal precision.
    pub fn precision(mut self, precision: u16) -> Self {
        self.args.precision = Some(precision);
        self
    }

    /// Decimal scale.
    pub fn scale(mut self, scale: u16) -> Self {
        self.args.scale = Some(scale);
        self
    }

    /// External descriptor; excludes every other argument except nullability and name.
    pub fn descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = Some(descriptor.clone());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the container, assigning the initial value if one was given.
    pub fn build(self, env: &Environment) -> Result<WireValue> {
        let (codec, mut descriptor) = match self.descriptor {
            Some(_) if self.args.has_positionals() => {
                return Err(WireError::ConflictingConstruction)
            }
            Some(descriptor) => (codec::builtin(descriptor.wire_type), descriptor),
            None => {
                if self.args.value.is_none() {
                    return Err(WireError::NoInitialValue);
                }
                let codec = codec::builtin(self.wire_type);
                let descriptor = codec.describe(self.wire_type, &self.args)?;
                (codec, descriptor)
            }
        };
        if let Some(nullable) = self.nullable {
            descriptor.nullable = nullable;
        }
        if self.name.is_some() {
            descriptor.name = self.name;
        }

        let mut wire_value = WireValue::with_codec(codec, descriptor)?;
        if let Some(value) = self.args.value {
            wire_value.set(env, value)?;
        }
        Ok(wire_value)
    }
}
