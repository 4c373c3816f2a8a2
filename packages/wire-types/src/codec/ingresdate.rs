//! INGRESDATE, the legacy combined date, timestamp and duration.
//!
//! The first byte is a status discriminator. The day count is split into a
//! signed high byte and an unsigned low word.

use chrono::{Datelike, Local, NaiveDate, NaiveTime, TimeDelta, Timelike};

use super::layout::{self, ingresdate as dn};
use super::{describe_fixed, unacceptable, validate_fixed, Args, Codec};
use crate::env::{Environment, Operand, OperandMut};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, Value, WireType};

/// Largest duration magnitude in days.
pub const MAX_DURATION_DAYS: i64 = 3_652_047;

const DAYS_PER_YEAR: f64 = 365.2425;
const DAYS_PER_MONTH: f64 = 30.4369;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Splits a signed day count into the high byte and low word.
pub fn split_days(days: i32) -> (u8, u16) {
    (((days >> 16) & 0xFF) as u8, (days & 0xFFFF) as u16)
}

/// Joins the high byte and low word into a signed day count.
pub fn join_days(highday: u8, lowday: u16) -> i32 {
    (i32::from(highday as i8) << 16) | i32::from(lowday)
}

#[derive(Debug, Default)]
pub struct IngresDateCodec;

impl IngresDateCodec {
    pub(crate) fn write_absolute(
        data: &mut [u8],
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> Result<()> {
        let year = i16::try_from(date.year())
            .map_err(|_| WireError::overflow("INGRESDATE", "year out of range"))?;
        let mut status = dn::ABSOLUTE | dn::YEARSPEC | dn::MONTHSPEC | dn::DAYSPEC;
        let mut millis = 0;
        if let Some(time) = time {
            status |= dn::TIMESPEC;
            millis = (time.num_seconds_from_midnight() * 1000 + time.nanosecond() / 1_000_000)
                as i32;
        }

        data.fill(0);
        data[dn::STATUS] = status;
        layout::write_i16(data, dn::YEAR, year);
        layout::write_i16(data, dn::MONTH, date.month() as i16);
        layout::write_u16(data, dn::LOWDAY, date.day() as u16);
        layout::write_i32(data, dn::TIME, millis);
        Ok(())
    }

    fn write_duration(data: &mut [u8], duration: TimeDelta) -> Result<()> {
        let total = duration.num_milliseconds();
        let days = total / MILLIS_PER_DAY;
        let millis = total % MILLIS_PER_DAY;
        if days.abs() > MAX_DURATION_DAYS {
            return Err(WireError::overflow(
                "INGRESDATE",
                format!("duration of {days} days exceeds {MAX_DURATION_DAYS}"),
            ));
        }

        let mut status = dn::DURATION;
        if days != 0 {
            status |= dn::DAYSPEC;
        }
        if millis != 0 {
            status |= dn::TIMESPEC;
        }
        let (highday, lowday) = split_days(days as i32);

        data.fill(0);
        data[dn::STATUS] = status;
        data[dn::HIGHDAY] = highday;
        layout::write_u16(data, dn::LOWDAY, lowday);
        layout::write_i32(data, dn::TIME, millis as i32);
        Ok(())
    }

    fn read_absolute(data: &[u8], status: u8) -> Result<Value> {
        let year = layout::read_i16(data, dn::YEAR);
        let month = layout::read_i16(data, dn::MONTH);
        let day = join_days(data[dn::HIGHDAY], layout::read_u16(data, dn::LOWDAY));
        let invalid = || WireError::InvalidEncoding {
            message: format!("invalid INGRESDATE {year}-{month}-{day}"),
        };
        let date = NaiveDate::from_ymd_opt(
            i32::from(year),
            u32::try_from(month).map_err(|_| invalid())?,
            u32::try_from(day).map_err(|_| invalid())?,
        )
        .ok_or_else(invalid)?;

        if status & dn::TIMESPEC == 0 {
            return Ok(Value::Date(date));
        }
        let millis = layout::read_i32(data, dn::TIME);
        let millis = u32::try_from(millis).map_err(|_| invalid())?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(
            millis / 1000,
            (millis % 1000) * 1_000_000,
        )
        .ok_or_else(invalid)?;
        Ok(Value::TimestampTz(date.and_time(time).and_utc().fixed_offset()))
    }

    fn read_duration(data: &[u8]) -> Value {
        let years = layout::read_i16(data, dn::YEAR);
        let months = layout::read_i16(data, dn::MONTH);
        let days = join_days(data[dn::HIGHDAY], layout::read_u16(data, dn::LOWDAY));
        let millis = layout::read_i32(data, dn::TIME);

        // years and months each count as a whole number of days
        let year_days = (f64::from(years) * DAYS_PER_YEAR).round_ties_even() as i64;
        let month_days = (f64::from(months) * DAYS_PER_MONTH).round_ties_even() as i64;
        let days = year_days + month_days + i64::from(days);
        Value::Duration(TimeDelta::days(days) + TimeDelta::milliseconds(i64::from(millis)))
    }
}

impl Codec for IngresDateCodec {
    fn describe(&self, wire_type: WireType, args: &Args) -> Result<Descriptor> {
        describe_fixed(wire_type, args)
    }

    fn validate(&self, descriptor: &Descriptor) -> Result<()> {
        validate_fixed(descriptor)
    }

    fn declaration(&self, _descriptor: &Descriptor) -> String {
        "INGRESDATE".to_string()
    }

    fn encode(&self, env: &Environment, target: OperandMut<'_>, value: &Value) -> Result<()> {
        match value {
            Value::Str(text) => {
                let text = text.trim();
                if text.is_empty() {
                    target.data.fill(0);
                    return Ok(());
                }
                let text = if text.eq_ignore_ascii_case("now") {
                    Local::now().format("%d-%b-%Y %H:%M:%S").to_string()
                } else if text.eq_ignore_ascii_case("today") {
                    Local::now().format("%d-%b-%Y").to_string()
                } else {
                    text.to_string()
                };
                env.parse_into(&text, target)
            }
            Value::Date(date) => Self::write_absolute(target.data, *date, None),
            // naive timestamps are taken as UTC
            Value::Timestamp(timestamp) => {
                Self::write_absolute(target.data, timestamp.date(), Some(timestamp.time()))
            }
            Value::TimestampTz(timestamp) => {
                let utc = timestamp.naive_utc();
                Self::write_absolute(target.data, utc.date(), Some(utc.time()))
            }
            Value::Duration(duration) => Self::write_duration(target.data, *duration),
            other => Err(unacceptable(WireType::IngresDate, other)),
        }
    }

    fn decode(&self, _env: &Environment, source: Operand<'_>) -> Result<Value> {
        let status = source.data[dn::STATUS];
        if status == dn::NULL {
            Ok(Value::Null)
        } else if status & dn::ABSOLUTE != 0 {
            Self::read_absolute(source.data, status)
        } else if status & dn::DURATION != 0 {
            Ok(Self::read_duration(source.data))
        } else {
            Err(WireError::InvalidEncoding {
                message: format!("unknown INGRESDATE status {status:#04x}"),
            })
        }
    }
}
