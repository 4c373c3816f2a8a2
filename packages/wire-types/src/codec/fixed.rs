//! Fixed-size types taking a single value.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bigdecimal::ToPrimitive;
use chrono::{Datelike, Local, NaiveDate};
use uuid::Uuid;

use super::layout::{self, ansidate, interval_ym};
use super::{describe_fixed, unacceptable, validate_fixed, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

/// BOOLEAN, one byte.
#[derive(Debug, Default)]
pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "BOOLEAN".to_string()
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let flag = match value {
            Value::Bool(flag) => *flag,
            Value::Int(0) => false,
            Value::Int(1) => true,
            _ => {
                return Err(WireError::domain(
                    "Boolean",
                    "must be true, false, 1 or 0",
                ))
            }
        };
        target.data[0] = u8::from(flag);
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        Ok(Value::Bool(source.data[0] != 0))
    }

    fn formatted(&self, _env: &Environment, source: Operand<'_>) -> Result<String> {
        let text = if source.data[0] != 0 { "TRUE" } else { "FALSE" };
        Ok(text.to_string())
    }
}

/// ANSI DATE: year, month and day.
#[derive(Debug, Default)]
pub struct AnsiDateCodec;

impl AnsiDateCodec {
    fn parse(text: &str) -> Result<NaiveDate> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("today") {
            return Ok(Local::now().date_naive());
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| WireError::domain("Date", format!("'{text}' is not an ISO date")))
    }
}

impl Codec for AnsiDateCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "ANSIDATE".to_string()
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let date = match value {
            Value::Date(date) => *date,
            Value::Timestamp(timestamp) => timestamp.date(),
            Value::TimestampTz(timestamp) => timestamp.date_naive(),
            Value::Str(text) => Self::parse(text)?,
            other => return Err(unacceptable(WireType::Date, other)),
        };
        let year = i16::try_from(date.year())
            .map_err(|_| WireError::overflow("ANSIDATE", "year out of range"))?;
        layout::write_i16(target.data, ansidate::YEAR, year);
        target.data[ansidate::MONTH] = date.month() as u8;
        target.data[ansidate::DAY] = date.day() as u8;
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let year = layout::read_i16(source.data, ansidate::YEAR);
        let month = source.data[ansidate::MONTH];
        let day = source.data[ansidate::DAY];
        NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .map(Value::Date)
            .ok_or_else(|| WireError::InvalidEncoding {
                message: format!("invalid ANSI date {year}-{month}-{day}"),
            })
    }
}

/// UUID, 16 bytes stored in the order given.
#[derive(Debug, Default)]
pub struct UuidCodec;

impl Codec for UuidCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "UUID".to_string()
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let uuid = match value {
            Value::Uuid(uuid) => *uuid,
            Value::Bytes(bytes) => Uuid::from_slice(bytes)
                .map_err(|_| WireError::domain("Uuid", "value must be 16 bytes"))?,
            Value::Str(text) => Uuid::parse_str(text.trim())
                .map_err(|_| WireError::domain("Uuid", format!("'{text}' is not a UUID")))?,
            other => return Err(unacceptable(WireType::Uuid, other)),
        };
        target.data.copy_from_slice(uuid.as_bytes());
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        Ok(Value::Uuid(Uuid::from_bytes(layout::read(source.data, 0))))
    }

    fn formatted(&self, _env: &Environment, source: Operand<'_>) -> Result<String> {
        Ok(Uuid::from_bytes(layout::read(source.data, 0)).to_string())
    }
}

/// IPV4 and IPV6 addresses in network byte order.
#[derive(Debug, Default)]
pub struct IpCodec;

impl IpCodec {
    fn address(wire_type: WireType, value: &Value) -> Result<IpAddr> {
        let address = match value {
            Value::Ip(address) => *address,
            Value::Str(text) => text.trim().parse::<IpAddr>().map_err(|_| {
                WireError::domain(wire_type.name(), format!("'{text}' is not an address"))
            })?,
            Value::Bytes(bytes) => match bytes.len() {
                4 => IpAddr::V4(Ipv4Addr::from(layout::read::<4>(bytes, 0))),
                16 => IpAddr::V6(Ipv6Addr::from(layout::read::<16>(bytes, 0))),
                _ => {
                    return Err(WireError::domain(
                        wire_type.name(),
                        "packed address must be 4 or 16 bytes",
                    ))
                }
            },
            Value::Int(raw) if wire_type == WireType::Ipv4 => {
                let raw = u32::try_from(*raw)
                    .map_err(|_| WireError::overflow("IPV4", "address out of range"))?;
                IpAddr::V4(Ipv4Addr::from(raw))
            }
            other => return Err(unacceptable(wire_type, other)),
        };
        match (wire_type, address) {
            (WireType::Ipv4, IpAddr::V4(_)) | (WireType::Ipv6, IpAddr::V6(_)) => Ok(address),
            (WireType::Ipv4, _) => Err(WireError::domain("IPv4", "must be an IPv4 address")),
            _ => Err(WireError::domain("IPv6", "must be an IPv6 address")),
        }
    }

    fn read(source: Operand<'_>) -> IpAddr {
        match source.descriptor.wire_type {
            WireType::Ipv4 => IpAddr::V4(Ipv4Addr::from(layout::read::<4>(source.data, 0))),
            _ => IpAddr::V6(Ipv6Addr::from(layout::read::<16>(source.data, 0))),
        }
    }
}

impl Codec for IpCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        match descriptor.wire_type {
            WireType::Ipv4 => "IPV4".to_string(),
            _ => "IPV6".to_string(),
        }
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        match Self::address(target.descriptor.wire_type, value)? {
            IpAddr::V4(address) => target.data.copy_from_slice(&address.octets()),
            IpAddr::V6(address) => target.data.copy_from_slice(&address.octets()),
        }
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        Ok(Value::Ip(Self::read(source)))
    }

    fn formatted(&self, _env: &Environment, source: Operand<'_>) -> Result<String> {
        Ok(Self::read(source).to_string())
    }
}

/// MONEY, an f64 count of cents.
#[derive(Debug, Default)]
pub struct MoneyCodec;

impl Codec for MoneyCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "MONEY".to_string()
    }

    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let amount = match value {
            Value::Str(text) => return env.parse_into(text, target),
            Value::Int(amount) => *amount as f64,
            Value::Float(amount) => *amount,
            Value::Decimal(amount) => amount
                .to_f64()
                .ok_or_else(|| WireError::overflow("MONEY", "amount out of range"))?,
            other => return Err(unacceptable(WireType::Money, other)),
        };
        layout::write(target.data, 0, &(amount * 100.0).to_ne_bytes());
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let cents = f64::from_ne_bytes(layout::read(source.data, 0));
        Ok(Value::Float(cents / 100.0))
    }
}

/// OBJECT_KEY (16 bytes) and TABLE_KEY (8 bytes).
#[derive(Debug, Default)]
pub struct KeyCodec;

impl Codec for KeyCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        match descriptor.wire_type {
            WireType::ObjectKey => "LOGICAL_KEY".to_string(),
            _ => "TABLE_KEY".to_string(),
        }
    }

    fn encode(&self, _env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let wire_type = target.descriptor.wire_type;
        let bytes = match value {
            Value::Bytes(bytes) => bytes.clone(),
            Value::Str(text) => {
                let digits = text.trim().trim_start_matches("0x");
                hex::decode(digits).map_err(|_| {
                    WireError::domain(wire_type.name(), format!("'{text}' is not hexadecimal"))
                })?
            }
            other => return Err(unacceptable(wire_type, other)),
        };
        if bytes.len() != target.data.len() {
            return Err(WireError::domain(
                wire_type.name(),
                format!("value must be {} bytes", target.data.len()),
            ));
        }
        target.data.copy_from_slice(&bytes);
        Ok(())
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        Ok(Value::Bytes(source.data.to_vec()))
    }

    fn formatted(&self, _env: &Environment, source: Operand<'_>) -> Result<String> {
        Ok(hex::encode_upper(source.data))
    }
}

const YEARS_LIMIT: i64 = 9999;
const MONTHS_LIMIT: i64 = 11;
const DAYS_PER_MONTH: f64 = 30.4369;

/// INTERVAL YEAR TO MONTH.
#[derive(Debug, Default)]
pub struct YearMonthCodec;

impl YearMonthCodec {
    fn write(target: OperandMut<'_>, years: i64, months: i64) -> Result<()> {
        if !(-YEARS_LIMIT..=YEARS_LIMIT).contains(&years) {
            return Err(WireError::overflow(
                "INTERVAL YEAR TO MONTH",
                format!("years {years} not in -{YEARS_LIMIT} to {YEARS_LIMIT}"),
            ));
        }
        if !(-MONTHS_LIMIT..=MONTHS_LIMIT).contains(&months) {
            return Err(WireError::overflow(
                "INTERVAL YEAR TO MONTH",
                format!("months {months} not in -{MONTHS_LIMIT} to {MONTHS_LIMIT}"),
            ));
        }
        layout::write_i16(target.data, interval_ym::YEARS, years as i16);
        target.data[interval_ym::MONTHS] = (months as i8) as u8;
        Ok(())
    }
}

impl Codec for YearMonthCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "INTERVAL YEAR TO MONTH".to_string()
    }

    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        match value {
            Value::Str(text) => env.parse_into(text, target),
            Value::YearMonth(years, months) => {
                Self::write(target, i64::from(*years), i64::from(*months))
            }
            Value::Duration(duration) => {
                // approximate: a month is 30.4369 days
                let days = duration.num_days();
                let total = (days.abs() as f64 / DAYS_PER_MONTH) as i64 * days.signum();
                Self::write(target, total / 12, total % 12)
            }
            other => Err(unacceptable(WireType::IntervalYearToMonth, other)),
        }
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let years = layout::read_i16(source.data, interval_ym::YEARS);
        let months = source.data[interval_ym::MONTHS] as i8;
        Ok(Value::YearMonth(years, months))
    }
}
