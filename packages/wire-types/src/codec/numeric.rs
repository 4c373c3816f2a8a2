//! Fixed-width integers and floats.

use bigdecimal::ToPrimitive;

use super::layout;
use super::{unacceptable, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

fn allowed_widths(wire_type: WireType) -> &'static [usize] {
    match wire_type {
        WireType::Float => &[4, 8],
        _ => &[1, 2, 4, 8],
    }
}

/// Inclusive bounds of a signed integer of `width` bytes.
pub fn integer_bounds(width: usize) -> (i64, i64) {
    let bits = 8 * width as u32 - 1;
    let max = ((1i128 << bits) - 1) as i64;
    (-max - 1, max)
}

#[derive(Debug, Default)]
pub struct NumericCodec;

impl NumericCodec {
    fn encode_integer(&self, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let (min, max) = integer_bounds(target.data.len());
        let out_of_range = |number: String| {
            WireError::overflow(
                self.declaration(target.descriptor),
                format!("value {number} not in {min} to {max}"),
            )
        };
        let number = match value {
            Value::Int(number) => *number,
            // integral decimals stand in for integers wider than 64 bits
            Value::Decimal(number) if number.is_integer() => {
                number.to_i64().ok_or_else(|| out_of_range(number.to_string()))?
            }
            other => return Err(unacceptable(WireType::Integer, other)),
        };
        if !(min..=max).contains(&number) {
            return Err(out_of_range(number.to_string()));
        }
        match target.data.len() {
            1 => target.data[0] = (number as i8) as u8,
            2 => layout::write_i16(target.data, 0, number as i16),
            4 => layout::write_i32(target.data, 0, number as i32),
            _ => layout::write(target.data, 0, &number.to_ne_bytes()),
        }
        Ok(())
    }

    fn encode_float(&self, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let number = match value {
            Value::Float(number) => *number,
            Value::Int(number) => *number as f64,
            Value::Decimal(number) => match number.to_f64().filter(|n| n.is_finite()) {
                Some(number) => number,
                None => {
                    return Err(WireError::overflow(
                        self.declaration(target.descriptor),
                        format!("value {number} out of range"),
                    ))
                }
            },
            other => return Err(unacceptable(WireType::Float, other)),
        };
        if target.data.len() == 4 {
            if number.is_finite() && number.abs() > f64::from(f32::MAX) {
                return Err(WireError::overflow(
                    self.declaration(target.descriptor),
                    format!("value {number} out of range"),
                ));
            }
            layout::write(target.data, 0, &(number as f32).to_ne_bytes());
        } else {
            layout::write(target.data, 0, &number.to_ne_bytes());
        }
        Ok(())
    }
}

impl Codec for NumericCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        args.accept_only(wire_type.name(), &["size"])?;
        let size = args.size.ok_or(WireError::MissingSize {
            type_name: wire_type.name(),
        })?;
        let descriptor = Descriptor::new(wire_type, size);
        self.validate(&descriptor)?;
        Ok(descriptor)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        let wire_type = descriptor.wire_type;
        if !allowed_widths(wire_type).contains(&descriptor.length) {
            return Err(WireError::InvalidWidth {
                type_name: wire_type.name(),
                size: descriptor.length,
            });
        }
        Ok(())
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        let name = match (descriptor.wire_type, descriptor.length) {
            (WireType::Float, 4) => "FLOAT4",
            (WireType::Float, _) => "FLOAT",
            (_, 1) => "TINYINT",
            (_, 2) => "SMALLINT",
            (_, 4) => "INTEGER",
            _ => "BIGINT",
        };
        name.to_string()
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        match target.descriptor.wire_type {
            WireType::Float => self.encode_float(target, value),
            _ => self.encode_integer(target, value),
        }
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let data = source.data;
        let value = match (source.descriptor.wire_type, data.len()) {
            (WireType::Float, 4) => {
                Value::Float(f64::from(f32::from_ne_bytes(layout::read(data, 0))))
            }
            (WireType::Float, _) => Value::Float(f64::from_ne_bytes(layout::read(data, 0))),
            (_, 1) => Value::Int(i64::from(data[0] as i8)),
            (_, 2) => Value::Int(i64::from(layout::read_i16(data, 0))),
            (_, 4) => Value::Int(i64::from(layout::read_i32(data, 0))),
            _ => Value::Int(i64::from_ne_bytes(layout::read(data, 0))),
        };
        Ok(value)
    }

    fn formatted(&self, env: &Environment, source: Operand<'_>) -> Result<String> {
        match self.decode(env, source)? {
            Value::Int(number) => Ok(number.to_string()),
            Value::Float(number) => Ok(number.to_string()),
            _ => Ok(String::new()),
        }
    }
}
