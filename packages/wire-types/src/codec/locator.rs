//! Large object locators, read-only 4-byte handles.

use super::layout;
use super::{validate_fixed, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

#[derive(Debug, Default)]
pub struct LocatorCodec;

impl Codec for LocatorCodec {
    fn describe(&self, wire_type: WireType, _args: &Args) -> Result<Descriptor> {
        Err(WireError::DescriptorRequired {
            type_name: wire_type.name(),
        })
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        let kind = match descriptor.wire_type {
            WireType::LongByteLocator => "LONG BYTE",
            WireType::LongNvarcharLocator => "LONG NVARCHAR",
            _ => "LONG VARCHAR",
        };
        format!("<{kind} locator>")
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, _value: &Value) -> Result<()> {
        Err(WireError::Immutable {
            declaration: self.declaration(target.descriptor),
        })
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        Ok(Value::Int(i64::from(layout::read_i32(source.data, 0))))
    }

    fn formatted(&self, _env: &Environment, source: Operand<'_>) -> Result<String> {
        Ok(layout::read_i32(source.data, 0).to_string())
    }

    fn is_assignable(&self) -> bool {
        false
    }
}
