//! Per-family encoding contracts.
//!
//! Every wire type is served by one [`Codec`]. Codecs are stateless; the
//! descriptor carried by each operand selects the exact layout.

pub mod decimal;
pub mod fixed;
pub mod ingresdate;
pub mod layout;
pub mod locator;
pub mod numeric;
pub mod temporal;
pub mod varlen;

use std::fmt;
use std::sync::Arc;

use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

/// Construction arguments supplied alongside an initial value.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub value: Option<Value>,
    pub size: Option<usize>,
    pub resolution: Option<u16>,
    pub precision: Option<u16>,
    pub scale: Option<u16>,
}

impl Args {
    /// True when any argument besides the value is present.
    pub fn has_positionals(&self) -> bool {
        self.value.is_some()
            || self.size.is_some()
            || self.resolution.is_some()
            || self.precision.is_some()
            || self.scale.is_some()
    }

    /// Rejects arguments the family does not take.
    pub(crate) fn accept_only(&self, type_name: &'static str, allowed: &[&str]) -> Result<()> {
        let present = [
            ("size", self.size.is_some()),
            ("resolution", self.resolution.is_some()),
            ("precision", self.precision.is_some()),
            ("scale", self.scale.is_some()),
        ];
        for (argument, is_present) in present {
            if is_present && !allowed.contains(&argument) {
                return Err(WireError::TooManyArguments {
                    type_name,
                    argument,
                });
            }
        }
        Ok(())
    }
}

/// Encoding contract shared by a family of wire types.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Derives a descriptor from construction arguments.
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor>;

    /// Checks a descriptor against the family's limits.
    fn validate(&self, descriptor: &Descriptor) -> Result<()>;

    /// SQL type declaration, e.g. `VARCHAR(20)`.
    fn declaration(&self, descriptor: &Descriptor) -> String;

    /// Writes a host value into the target buffer.
    ///
    /// The buffer may be left partially written on error; callers encode into a
    /// scratch copy.
    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()>;

    /// Reads the host value stored in the source buffer.
    fn decode(&self, env: &Environment, source: Operand<'_>) -> Result<Value>;

    /// Human-readable rendering, through the native client unless overridden.
    fn formatted(&self, env: &Environment, source: Operand<'_>) -> Result<String> {
        env.render(source)
    }

    /// Resets a buffer to the family's blank pattern.
    fn clear(&self, _descriptor: &Descriptor, data: &mut [u8]) {
        data.fill(0);
    }

    /// False for read-only types.
    fn is_assignable(&self) -> bool {
        true
    }
}

/// Returns the built-in codec for a wire type.
pub fn builtin(wire_type: WireType) -> Arc<dyn Codec> {
    match wire_type {
        WireType::Boolean => Arc::new(fixed::BooleanCodec),
        WireType::Date => Arc::new(fixed::AnsiDateCodec),
        WireType::Uuid => Arc::new(fixed::UuidCodec),
        WireType::Ipv4 | WireType::Ipv6 => Arc::new(fixed::IpCodec),
        WireType::Money => Arc::new(fixed::MoneyCodec),
        WireType::ObjectKey | WireType::TableKey => Arc::new(fixed::KeyCodec),
        WireType::IntervalYearToMonth => Arc::new(fixed::YearMonthCodec),
        WireType::IngresDate => Arc::new(ingresdate::IngresDateCodec),
        WireType::Byte
        | WireType::Char
        | WireType::C
        | WireType::Nchar
        | WireType::Nvarchar
        | WireType::Text
        | WireType::Varbyte
        | WireType::Varchar => Arc::new(varlen::VarlenCodec),
        WireType::Integer | WireType::Float => Arc::new(numeric::NumericCodec),
        WireType::IntervalDayToSecond
        | WireType::Time
        | WireType::TimeWithTimeZone
        | WireType::TimeWithoutTimeZone
        | WireType::Timestamp
        | WireType::TimestampWithTimeZone
        | WireType::TimestampWithoutTimeZone => Arc::new(temporal::TemporalCodec),
        WireType::Decimal => Arc::new(decimal::DecimalCodec),
        WireType::LongByteLocator
        | WireType::LongVarcharLocator
        | WireType::LongNvarcharLocator => Arc::new(locator::LocatorCodec),
    }
}

/// Describes a type whose length never varies and that takes only a value.
pub(crate) fn describe_fixed(wire_type: WireType, args: &Args) -> Result<Descriptor> {
    args.accept_only(wire_type.name(), &[])?;
    let length = wire_type
        .fixed_length()
        .ok_or(WireError::MissingSize {
            type_name: wire_type.name(),
        })?;
    Ok(Descriptor::new(wire_type, length))
}

/// Checks that a descriptor carries its type's fixed length.
pub(crate) fn validate_fixed(descriptor: &Descriptor) -> Result<()> {
    let wire_type = descriptor.wire_type;
    match wire_type.fixed_length() {
        Some(length) if length == descriptor.length => Ok(()),
        _ => Err(WireError::InvalidWidth {
            type_name: wire_type.name(),
            size: descriptor.length,
        }),
    }
}

/// Domain error for a host value the type cannot take.
pub(crate) fn unacceptable(wire_type: WireType, value: &Value) -> WireError {
    WireError::domain(
        wire_type.name(),
        format!("cannot assign a value of type {}", value.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_accept_only_rejects_extra_arguments() {
        let args = Args {
            value: Some(Value::Int(1)),
            size: Some(4),
            ..Default::default()
        };
        assert!(args.accept_only("Integer", &["size"]).is_ok());
        let err = args.accept_only("Boolean", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_every_wire_type_has_a_codec() {
        for wire_type in WireType::ALL {
            let codec = builtin(wire_type);
            if let Some(length) = wire_type.fixed_length() {
                let desc = Descriptor::new(wire_type, length);
                assert!(codec.validate(&desc).is_ok(), "{wire_type}");
            }
        }
    }
}
