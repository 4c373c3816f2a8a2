//! Character and byte strings.
//!
//! CHAR and C are blank padded, BYTE and TEXT zero filled, VARCHAR, VARBYTE and
//! NVARCHAR carry a 2-byte length prefix. NCHAR and NVARCHAR store UTF-16LE.

use super::layout;
use super::{unacceptable, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

/// Largest payload of a narrow string, in bytes.
pub const MAX_NARROW: usize = 32_000;
/// Largest payload of a wide string, in characters.
pub const MAX_WIDE: usize = 16_000;

const PREFIX: usize = 2;
const WIDE_SPACE: [u8; 2] = [0x20, 0x00];

fn prefix_len(wire_type: WireType) -> usize {
    if wire_type.is_length_prefixed() {
        PREFIX
    } else {
        0
    }
}

fn unit_width(wire_type: WireType) -> usize {
    if wire_type.is_wide() {
        2
    } else {
        1
    }
}

/// Largest byte length, length prefix included.
fn max_length(wire_type: WireType) -> usize {
    if wire_type.is_wide() {
        MAX_WIDE * 2
    } else {
        MAX_NARROW
    }
}

/// Declared size range in characters (or bytes for narrow types).
fn unit_range(wire_type: WireType) -> (usize, usize) {
    let prefix = prefix_len(wire_type);
    let max = (max_length(wire_type) - prefix) / unit_width(wire_type);
    // the length prefix alone keeps an empty value addressable
    (if prefix > 0 { 0 } else { 1 }, max)
}

/// Declared size in characters (or bytes for narrow types).
fn declared_units(descriptor: &Descriptor) -> usize {
    let wire_type = descriptor.wire_type;
    descriptor.length.saturating_sub(prefix_len(wire_type)) / unit_width(wire_type)
}

fn declaration_for(wire_type: WireType, units: usize) -> String {
    match wire_type {
        WireType::Byte => format!("BYTE({units})"),
        WireType::C => format!("C({units})"),
        WireType::Nchar => format!("NCHAR({units})"),
        WireType::Nvarchar => format!("NVARCHAR({units})"),
        WireType::Text => format!("TEXT({units})"),
        WireType::Varbyte => format!("VARBYTE({units})"),
        WireType::Varchar => format!("VARCHAR({units})"),
        _ => format!("CHAR({units})"),
    }
}

/// Encodes a host value to payload bytes in the type's character scheme.
fn to_payload(wire_type: WireType, value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Str(text) if wire_type.is_wide() => {
            Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
        }
        Value::Str(text) => Ok(text.as_bytes().to_vec()),
        Value::Bytes(bytes) => Ok(bytes.clone()),
        other => Err(unacceptable(wire_type, other)),
    }
}

fn from_wide(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Payload bytes currently stored, honouring the length prefix.
fn stored_payload<'a>(source: &Operand<'a>) -> &'a [u8] {
    let data = source.data;
    if source.descriptor.wire_type.is_length_prefixed() {
        let capacity = data.len() - PREFIX;
        let length = usize::from(layout::read_u16(data, 0)).min(capacity);
        &data[PREFIX..PREFIX + length]
    } else {
        data
    }
}

/// Variable-length string family.
#[derive(Debug, Default)]
pub struct VarlenCodec;

impl Codec for VarlenCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        args.accept_only(wire_type.name(), &["size"])?;
        let units = match args.size {
            Some(size) => size,
            None => {
                let value = args.value.as_ref().ok_or(WireError::NoInitialValue)?;
                to_payload(wire_type, value)?.len() / unit_width(wire_type)
            }
        };
        let descriptor = Descriptor::new(
            wire_type,
            units * unit_width(wire_type) + prefix_len(wire_type),
        );
        self.validate(&descriptor)?;
        Ok(descriptor)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        let wire_type = descriptor.wire_type;
        let prefix = prefix_len(wire_type);
        let units = declared_units(descriptor);
        let (min, max) = unit_range(wire_type);
        if descriptor.length < prefix
            || !(min..=max).contains(&units)
            || (descriptor.length - prefix) % unit_width(wire_type) != 0
        {
            return Err(WireError::overflow(
                declaration_for(wire_type, units),
                format!("size not in {min} to {max}"),
            ));
        }
        Ok(())
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        declaration_for(descriptor.wire_type, declared_units(descriptor))
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let wire_type = target.descriptor.wire_type;
        let payload = to_payload(wire_type, value)?;
        let offset = prefix_len(wire_type);
        if payload.len() > target.data.len() - offset {
            return Err(WireError::capacity_exceeded(self.declaration(target.descriptor)));
        }

        self.clear(target.descriptor, target.data);
        if offset > 0 {
            layout::write_u16(target.data, 0, payload.len() as u16);
        }
        layout::write(target.data, offset, &payload);
        if wire_type == WireType::Text {
            for byte in &mut target.data[..payload.len()] {
                if *byte == 0 {
                    *byte = b' ';
                }
            }
        }
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let payload = stored_payload(&source);
        let value = match source.descriptor.wire_type {
            WireType::Byte | WireType::Varbyte => Value::Bytes(payload.to_vec()),
            WireType::Nchar | WireType::Nvarchar => Value::Str(from_wide(payload)),
            WireType::Text => {
                let end = payload.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
                Value::Str(String::from_utf8_lossy(&payload[..end]).into_owned())
            }
            _ => Value::Str(String::from_utf8_lossy(payload).into_owned()),
        };
        Ok(value)
    }

    fn formatted(&self, env: &Environment, source: Operand<'_>) -> Result<String> {
        match self.decode(env, source)? {
            Value::Bytes(bytes) => Ok(hex::encode_upper(bytes)),
            Value::Str(text) => Ok(text),
            _ => Ok(String::new()),
        }
    }

    fn clear(&self, descriptor: &Descriptor, data: &mut [u8]) {
        match descriptor.wire_type {
            WireType::Char | WireType::C => data.fill(b' '),
            WireType::Nchar => {
                for pair in data.chunks_exact_mut(2) {
                    pair.copy_from_slice(&WIDE_SPACE);
                }
            }
            _ => data.fill(0),
        }
    }
}
