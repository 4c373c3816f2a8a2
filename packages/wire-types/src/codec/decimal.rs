//! DECIMAL(p,s), packed by the native client.
//!
//! Host values are rendered to plain decimal text, truncated to the declared
//! scale and handed to the native client for packing.

use bigdecimal::BigDecimal;

use super::{Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

pub const MAX_PRECISION: u16 = 39;

const INTEGER_PRECISION: u16 = 19;
const FLOAT_PRECISION: u16 = 15;
const DECIMAL_PRECISION: u16 = 28;

/// Byte length of a packed decimal of `precision` digits.
pub fn packed_length(precision: u16) -> usize {
    usize::from(precision / 2 + 1)
}

/// Renders a big decimal without exponent notation.
fn plain_decimal(value: &BigDecimal) -> String {
    let (digits, exponent) = value.as_bigint_and_exponent();
    let digits = digits.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", digits),
    };
    if exponent <= 0 {
        return format!("{sign}{digits}{}", "0".repeat(exponent.unsigned_abs() as usize));
    }
    let exponent = exponent as usize;
    let digits = if digits.len() <= exponent {
        format!("{}{digits}", "0".repeat(exponent + 1 - digits.len()))
    } else {
        digits
    };
    let (whole, fraction) = digits.split_at(digits.len() - exponent);
    format!("{sign}{whole}.{fraction}")
}

/// Plain text of a numeric host value.
fn numeric_text(value: &Value) -> Result<String> {
    match value {
        Value::Int(number) => Ok(number.to_string()),
        Value::Float(number) if number.is_finite() => Ok(number.to_string()),
        Value::Float(_) => Err(WireError::domain("Decimal", "value must be finite")),
        Value::Decimal(number) => Ok(plain_decimal(number)),
        other => Err(WireError::domain(
            "Decimal",
            format!("cannot assign a value of type {}", other.type_name()),
        )),
    }
}

/// Truncates `text` to `scale` fraction digits.
///
/// # Returns
/// The truncated text and the number of integer digits.
fn truncate(text: &str, scale: usize) -> (String, usize) {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let integer_digits = whole
        .trim_start_matches('-')
        .trim_start_matches('0')
        .len();
    if scale == 0 {
        return (whole.to_string(), integer_digits);
    }
    let fraction: String = fraction.chars().take(scale).collect();
    (format!("{whole}.{fraction}"), integer_digits)
}

#[derive(Debug, Default)]
pub struct DecimalCodec;

impl DecimalCodec {
    fn check(precision: u16, scale: u16) -> Result<()> {
        let declaration = format!("DECIMAL({precision},{scale})");
        if precision == 0 || precision > MAX_PRECISION {
            return Err(WireError::overflow(
                declaration,
                format!("precision not in 1 to {MAX_PRECISION}"),
            ));
        }
        if scale > precision {
            return Err(WireError::overflow(
                declaration,
                format!("scale not in 0 to {precision}"),
            ));
        }
        Ok(())
    }
}

impl Codec for DecimalCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        args.accept_only(wire_type.name(), &["precision", "scale"])?;
        let precision = match args.precision {
            Some(precision) => precision,
            None => match args.value.as_ref().ok_or(WireError::NoInitialValue)? {
                Value::Int(_) => INTEGER_PRECISION,
                Value::Float(_) => FLOAT_PRECISION,
                Value::Decimal(_) => DECIMAL_PRECISION,
                other => {
                    return Err(WireError::domain(
                        "Decimal",
                        format!("cannot assign a value of type {}", other.type_name()),
                    ))
                }
            },
        };
        let scale = args.scale.unwrap_or(0);
        Self::check(precision, scale)?;
        Ok(Descriptor::new(wire_type, packed_length(precision)).with_precision(precision, scale))
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        Self::check(descriptor.precision, descriptor.scale)?;
        if descriptor.length != packed_length(descriptor.precision) {
            return Err(WireError::InvalidWidth {
                type_name: "Decimal",
                size: descriptor.length,
            });
        }
        Ok(())
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        format!("DECIMAL({},{})", descriptor.precision, descriptor.scale)
    }

    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let text = numeric_text(value)?;
        let descriptor = target.descriptor;
        let (text, integer_digits) = truncate(&text, usize::from(descriptor.scale));
        if integer_digits > usize::from(descriptor.precision - descriptor.scale) {
            return Err(WireError::overflow(
                self.declaration(descriptor),
                format!("value {text} out of range"),
            ));
        }
        env.parse_into(&text, target)
    }

    fn decode(&self, env: &Environment, source: Operand<'_>) -> Result<Value> {
        let text = self.formatted(env, source)?;
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| WireError::InvalidEncoding {
                message: format!("'{text}' is not a decimal"),
            })
    }
}
