//! TIME, TIMESTAMP and INTERVAL DAY TO SECOND with a fractional-second resolution.
//!
//! Values travel to the native client as ISO text and come back rendered. The
//! rendered fraction is cut to 0, 3 or 6 digits before parsing.

use chrono::{FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use super::layout::{self, interval_ds};
use super::{unacceptable, validate_fixed, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, SqlConstant, Value, WireType};

pub const MAX_RESOLUTION: u16 = 9;

const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Splits a trailing `±HH:MM` or `Z` zone suffix from ISO text.
pub fn split_offset(text: &str) -> (&str, Option<FixedOffset>) {
    let bytes = text.as_bytes();
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return (body, FixedOffset::east_opt(0));
    }
    if bytes.len() < 6 {
        return (text, None);
    }
    let at = bytes.len() - 6;
    let tail = &bytes[at..];
    let sign = match tail[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return (text, None),
    };
    let digits = [tail[1], tail[2], tail[4], tail[5]];
    if tail[3] != b':' || !digits.iter().all(u8::is_ascii_digit) {
        return (text, None);
    }
    let value = |hi: u8, lo: u8| i32::from(hi - b'0') * 10 + i32::from(lo - b'0');
    let seconds = value(digits[0], digits[1]) * 3600 + value(digits[2], digits[3]) * 60;
    match FixedOffset::east_opt(sign * seconds) {
        Some(offset) => (&text[..at], Some(offset)),
        None => (text, None),
    }
}

/// Formats a zone offset as `±HH:MM`.
pub fn format_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Cuts or pads the fraction of rendered text to the supported tier.
///
/// Resolutions above 3 keep 6 digits, above 0 keep 3 digits, otherwise none.
pub fn truncate_fraction(text: &str, resolution: u16) -> String {
    let digits = match resolution {
        0 => 0,
        1..=3 => 3,
        _ => 6,
    };
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if digits == 0 {
        return whole.to_string();
    }
    let mut fraction: String = fraction.chars().take(digits).collect();
    while fraction.len() < digits {
        fraction.push('0');
    }
    format!("{whole}.{fraction}")
}

fn default_resolution(wire_type: WireType) -> u16 {
    match wire_type {
        WireType::Timestamp
        | WireType::TimestampWithTimeZone
        | WireType::TimestampWithoutTimeZone => 6,
        _ => 0,
    }
}

fn is_time(wire_type: WireType) -> bool {
    matches!(
        wire_type,
        WireType::Time | WireType::TimeWithTimeZone | WireType::TimeWithoutTimeZone
    )
}

fn zone_not_allowed(wire_type: WireType) -> WireError {
    WireError::domain(wire_type.name(), "tzinfo not allowed")
}

fn invalid(text: &str) -> WireError {
    WireError::InvalidEncoding {
        message: format!("cannot parse rendered value '{text}'"),
    }
}

#[derive(Debug, Default)]
pub struct TemporalCodec;

impl TemporalCodec {
    /// ISO text for a time or timestamp host value.
    fn iso_text(wire_type: WireType, value: &Value) -> Result<String> {
        let zone_aware = wire_type.is_zone_aware();
        let text = match (is_time(wire_type), value) {
            (_, Value::Str(text)) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("now") && !zone_aware {
                    let constant = if is_time(wire_type) {
                        SqlConstant::LocalTime
                    } else {
                        SqlConstant::LocalTimestamp
                    };
                    return Ok(constant.render());
                }
                if !zone_aware && split_offset(text).1.is_some() {
                    return Err(zone_not_allowed(wire_type));
                }
                text.to_string()
            }
            (true, Value::Time(time)) => time.format(TIME_FORMAT).to_string(),
            (true, Value::TimeTz(time, offset)) if zone_aware => {
                format!("{}{}", time.format(TIME_FORMAT), format_offset(*offset))
            }
            (false, Value::Timestamp(timestamp)) => timestamp.format(TIMESTAMP_FORMAT).to_string(),
            (false, Value::Date(date)) => date.format("%Y-%m-%d 00:00:00").to_string(),
            (false, Value::TimestampTz(timestamp)) if zone_aware => {
                timestamp.format("%Y-%m-%d %H:%M:%S%.f%:z").to_string()
            }
            (_, Value::TimeTz(..)) | (_, Value::TimestampTz(_)) if !zone_aware => {
                return Err(zone_not_allowed(wire_type))
            }
            (_, other) => return Err(unacceptable(wire_type, other)),
        };
        Ok(text)
    }

    fn encode_interval(target: OperandMut<'_>, duration: TimeDelta) -> Result<()> {
        let nanos = duration
            .num_nanoseconds()
            .map(i128::from)
            .unwrap_or_else(|| i128::from(duration.num_microseconds().unwrap_or(0)) * 1000);
        let per_day = i128::from(86_400 * NANOS_PER_SECOND);
        // every field carries the sign of the duration
        let days = nanos / per_day;
        let rest = nanos % per_day;
        let days = i32::try_from(days).map_err(|_| {
            WireError::overflow("INTERVAL DAY TO SECOND", "day count out of range")
        })?;
        let seconds = (rest / i128::from(NANOS_PER_SECOND)) as i32;
        let nanoseconds = (rest % i128::from(NANOS_PER_SECOND)) as i32;

        layout::write_i32(target.data, interval_ds::DAYS, days);
        layout::write_i32(target.data, interval_ds::SECONDS, seconds);
        layout::write_i32(target.data, interval_ds::NANOSECONDS, nanoseconds);
        Ok(())
    }

    fn decode_interval(source: Operand<'_>) -> Value {
        let days = layout::read_i32(source.data, interval_ds::DAYS);
        let seconds = layout::read_i32(source.data, interval_ds::SECONDS);
        let nanoseconds = layout::read_i32(source.data, interval_ds::NANOSECONDS);
        Value::Duration(
            TimeDelta::days(i64::from(days))
                + TimeDelta::seconds(i64::from(seconds))
                + TimeDelta::microseconds(i64::from(nanoseconds / 1000)),
        )
    }
}

impl Codec for TemporalCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        args.accept_only(wire_type.name(), &["resolution"])?;
        let resolution = args.resolution.unwrap_or_else(|| default_resolution(wire_type));
        let length = wire_type.fixed_length().unwrap_or(0);
        let descriptor = Descriptor::new(wire_type, length).with_precision(resolution, 0);
        self.validate(&descriptor)?;
        Ok(descriptor)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)?;
        if descriptor.precision > MAX_RESOLUTION {
            return Err(WireError::overflow(
                self.declaration(descriptor),
                format!("resolution not in 0 to {MAX_RESOLUTION}"),
            ));
        }
        Ok(())
    }

    fn declaration(&self, descriptor: &Descriptor) -> String {
        let r = descriptor.precision;
        match descriptor.wire_type {
            WireType::IntervalDayToSecond => format!("INTERVAL DAY TO SECOND({r})"),
            WireType::Time => format!("TIME({r}) WITH LOCAL TIME ZONE"),
            WireType::TimeWithTimeZone => format!("TIME({r}) WITH TIME ZONE"),
            WireType::TimeWithoutTimeZone => format!("TIME({r})"),
            WireType::Timestamp => format!("TIMESTAMP({r}) WITH LOCAL TIME ZONE"),
            WireType::TimestampWithTimeZone => format!("TIMESTAMP({r}) WITH TIME ZONE"),
            _ => format!("TIMESTAMP({r})"),
        }
    }

    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        let wire_type = target.descriptor.wire_type;
        if wire_type == WireType::IntervalDayToSecond {
            return match value {
                Value::Duration(duration) => Self::encode_interval(target, *duration),
                Value::Str(text) => env.parse_into(text, target),
                other => Err(unacceptable(wire_type, other)),
            };
        }
        let text = Self::iso_text(wire_type, value)?;
        env.parse_into(&text, target)
    }

    fn decode(&self, env: &Environment, source: Operand<'_>) -> Result<Value> {
        let wire_type = source.descriptor.wire_type;
        if wire_type == WireType::IntervalDayToSecond {
            return Ok(Self::decode_interval(source));
        }

        let resolution = source.descriptor.precision;
        let rendered = env.render(source)?;
        let (body, offset) = if wire_type.is_zone_aware() {
            let (body, offset) = split_offset(&rendered);
            (body, Some(offset.ok_or_else(|| invalid(&rendered))?))
        } else {
            (rendered.as_str(), None)
        };
        let text = truncate_fraction(body, resolution);

        if is_time(wire_type) {
            let time = NaiveTime::parse_from_str(&text, TIME_FORMAT).map_err(|_| invalid(&text))?;
            return Ok(match offset {
                Some(offset) => Value::TimeTz(time, offset),
                None => Value::Time(time),
            });
        }
        let timestamp =
            NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(|_| invalid(&text))?;
        match offset {
            Some(offset) => offset
                .from_local_datetime(&timestamp)
                .single()
                .map(Value::TimestampTz)
                .ok_or_else(|| invalid(&text)),
            None => Ok(Value::Timestamp(timestamp)),
        }
    }
}
