//! In-process stand-in for the native client.
//!
//! Implements the conversions the codecs delegate: text to and from every
//! delegated type, plus INGRESDATE durations into the ANSI intervals. Used by
//! the test suites and by hosts that have no native library loaded.

mod clock;
mod legacy;
mod packed;

use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc};

use crate::codec::layout::{self, ansidate, interval_ym};
use crate::codec::numeric::integer_bounds;
use crate::env::{ConversionRequest, EnvHandle, FormatStatus, NativeClient, Operand, OperandMut};
use crate::types::WireType;

const LATEST_VERSION: u32 = 11;
const PREFIX: usize = 2;

/// Native client emulated in Rust.
#[derive(Debug, Clone)]
pub struct EmulatedClient {
    max_version: u32,
    session: FixedOffset,
    currency: String,
}

impl Default for EmulatedClient {
    fn default() -> Self {
        Self {
            max_version: LATEST_VERSION,
            session: Utc.fix(),
            currency: "$".to_string(),
        }
    }
}

impl EmulatedClient {
    /// Accepts protocol versions up to `max_version` only.
    pub fn with_max_version(mut self, max_version: u32) -> Self {
        self.max_version = max_version;
        self
    }

    /// Sets the session time zone used by local-zone types.
    pub fn with_time_zone(mut self, session: FixedOffset) -> Self {
        self.session = session;
        self
    }

    /// Sets the currency symbol used for MONEY text.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Session time zone.
    pub fn time_zone(&self) -> FixedOffset {
        self.session
    }

    fn parse(&self, text: &str, target: OperandMut<'_>) -> Option<()> {
        let descriptor = target.descriptor;
        let wire_type = descriptor.wire_type;
        let resolution = descriptor.precision;
        let data = target.data;
        match wire_type {
            _ if is_text(wire_type) => write_text(text, wire_type, data),
            WireType::Date => {
                let text = text.trim();
                let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .or_else(|| clock::parse_timestamp(text).map(|stamp| stamp.date()))?;
                layout::write_i16(data, ansidate::YEAR, i16::try_from(date.year()).ok()?);
                data[ansidate::MONTH] = date.month() as u8;
                data[ansidate::DAY] = date.day() as u8;
                Some(())
            }
            WireType::IngresDate => legacy::parse_into(text, self.session, data),
            WireType::Money => {
                let amount = self.parse_money(text)?;
                layout::write(data, 0, &(amount * 100.0).round().to_ne_bytes());
                Some(())
            }
            WireType::Decimal => packed::pack(
                text,
                usize::from(descriptor.precision),
                usize::from(descriptor.scale),
                data,
            ),
            WireType::Time | WireType::TimeWithTimeZone | WireType::TimeWithoutTimeZone => {
                clock::parse_time_into(text, wire_type, resolution, self.session, data)
            }
            WireType::Timestamp
            | WireType::TimestampWithTimeZone
            | WireType::TimestampWithoutTimeZone => {
                clock::parse_timestamp_into(text, wire_type, resolution, self.session, data)
            }
            WireType::IntervalYearToMonth => clock::parse_year_month_into(text, data),
            WireType::IntervalDayToSecond => clock::parse_day_second_into(text, resolution, data),
            WireType::Integer => {
                let number: i64 = text.trim().parse().ok()?;
                write_integer(number, data)
            }
            WireType::Float => {
                let number: f64 = text.trim().parse().ok()?;
                match data.len() {
                    4 => layout::write(data, 0, &(number as f32).to_ne_bytes()),
                    _ => layout::write(data, 0, &number.to_ne_bytes()),
                }
                Some(())
            }
            _ => None,
        }
    }

    fn render(&self, source: Operand<'_>) -> Option<String> {
        let descriptor = source.descriptor;
        let wire_type = descriptor.wire_type;
        let resolution = descriptor.precision;
        let data = source.data;
        match wire_type {
            _ if is_text(wire_type) => Some(read_text(wire_type, data)),
            WireType::Date => {
                let date = NaiveDate::from_ymd_opt(
                    i32::from(layout::read_i16(data, ansidate::YEAR)),
                    u32::from(data[ansidate::MONTH]),
                    u32::from(data[ansidate::DAY]),
                )?;
                Some(date.format("%Y-%m-%d").to_string())
            }
            WireType::IngresDate => legacy::render(data, self.session),
            WireType::Money => {
                let amount = f64::from_ne_bytes(layout::read(data, 0)) / 100.0;
                let sign = if amount < 0.0 { "-" } else { "" };
                Some(format!("{}{sign}{:.2}", self.currency, amount.abs()))
            }
            WireType::Decimal => packed::unpack(
                data,
                usize::from(descriptor.precision),
                usize::from(descriptor.scale),
            ),
            WireType::Time | WireType::TimeWithTimeZone | WireType::TimeWithoutTimeZone => {
                clock::render_time(data, wire_type, resolution, self.session)
            }
            WireType::Timestamp
            | WireType::TimestampWithTimeZone
            | WireType::TimestampWithoutTimeZone => {
                clock::render_timestamp(data, wire_type, resolution, self.session)
            }
            WireType::IntervalYearToMonth => Some(clock::render_year_month(data)),
            WireType::IntervalDayToSecond => Some(clock::render_day_second(data, resolution)),
            WireType::Integer => read_integer(data).map(|number| number.to_string()),
            WireType::Float => Some(match data.len() {
                4 => f32::from_ne_bytes(layout::read(data, 0)).to_string(),
                _ => f64::from_ne_bytes(layout::read(data, 0)).to_string(),
            }),
            WireType::Boolean => Some(if data[0] != 0 { "TRUE" } else { "FALSE" }.to_string()),
            _ => None,
        }
    }

    fn parse_money(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let rest = rest.strip_prefix(self.currency.as_str()).unwrap_or(rest);
        let amount: f64 = rest.trim().replace(',', "").parse().ok()?;
        Some(if negative { -amount } else { amount })
    }

    /// Conversions between two non-text types.
    fn convert(source: Operand<'_>, target: OperandMut<'_>) -> Option<()> {
        let from = source.descriptor.wire_type;
        let to = target.descriptor.wire_type;
        match (from, to) {
            (WireType::IngresDate, WireType::IntervalYearToMonth) => {
                let total = legacy::total_months(source.data)?;
                let years = i16::try_from(total / 12).ok()?;
                if years.abs() > 9999 {
                    return None;
                }
                layout::write_i16(target.data, interval_ym::YEARS, years);
                target.data[interval_ym::MONTHS] = ((total % 12) as i8) as u8;
                Some(())
            }
            (WireType::IngresDate, WireType::IntervalDayToSecond) => {
                let total = legacy::total_nanos(source.data)?;
                clock::write_day_second(total, target.descriptor.precision, target.data)
            }
            _ if from == to && source.data.len() == target.data.len() => {
                target.data.copy_from_slice(source.data);
                Some(())
            }
            _ => None,
        }
    }
}

impl NativeClient for EmulatedClient {
    fn initialize(&self, version: u32) -> Option<EnvHandle> {
        (version <= self.max_version).then(|| EnvHandle::new(u64::from(version)))
    }

    fn format(&self, env: EnvHandle, request: ConversionRequest<'_>) -> FormatStatus {
        if env.raw() == 0 {
            return FormatStatus::InvalidHandle;
        }
        let ConversionRequest { source, target } = request;
        let from = source.descriptor.wire_type;
        let to = target.descriptor.wire_type;

        let converted = if is_text(from) {
            let text = read_text(from, source.data);
            self.parse(&text, target)
        } else if is_text(to) {
            self.render(source)
                .and_then(|text| write_text(&text, to, target.data))
        } else {
            Self::convert(source, target)
        };

        match converted {
            Some(()) => FormatStatus::Success,
            None => {
                tracing::debug!(%from, %to, "emulated conversion rejected");
                FormatStatus::Error
            }
        }
    }
}

fn is_text(wire_type: WireType) -> bool {
    matches!(
        wire_type,
        WireType::Char
            | WireType::C
            | WireType::Varchar
            | WireType::Text
            | WireType::Nchar
            | WireType::Nvarchar
    )
}

fn wide_text(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

fn read_text(wire_type: WireType, data: &[u8]) -> String {
    let payload = if wire_type.is_length_prefixed() {
        let length = usize::from(layout::read_u16(data, 0)).min(data.len() - PREFIX);
        &data[PREFIX..PREFIX + length]
    } else {
        data
    };
    match wire_type {
        WireType::Nchar => wide_text(payload).trim_end_matches(' ').to_string(),
        WireType::Nvarchar => wide_text(payload),
        WireType::Text => String::from_utf8_lossy(payload)
            .trim_end_matches('\0')
            .to_string(),
        WireType::Varchar => String::from_utf8_lossy(payload).into_owned(),
        _ => String::from_utf8_lossy(payload)
            .trim_end_matches([' ', '\0'])
            .to_string(),
    }
}

fn write_text(text: &str, wire_type: WireType, data: &mut [u8]) -> Option<()> {
    let payload: Vec<u8> = if wire_type.is_wide() {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    } else {
        text.as_bytes().to_vec()
    };
    let offset = if wire_type.is_length_prefixed() { PREFIX } else { 0 };
    if payload.len() > data.len() - offset {
        return None;
    }

    match wire_type {
        WireType::Char | WireType::C => data.fill(b' '),
        WireType::Nchar => {
            for pair in data.chunks_exact_mut(2) {
                pair.copy_from_slice(&[b' ', 0]);
            }
        }
        _ => data.fill(0),
    }
    if offset > 0 {
        layout::write_u16(data, 0, payload.len() as u16);
    }
    layout::write(data, offset, &payload);
    Some(())
}

fn read_integer(data: &[u8]) -> Option<i64> {
    match data.len() {
        1 => Some(i64::from(data[0] as i8)),
        2 => Some(i64::from(layout::read_i16(data, 0))),
        4 => Some(i64::from(layout::read_i32(data, 0))),
        8 => Some(i64::from_ne_bytes(layout::read(data, 0))),
        _ => None,
    }
}

fn write_integer(number: i64, data: &mut [u8]) -> Option<()> {
    let (min, max) = integer_bounds(data.len());
    if number < min || number > max {
        return None;
    }
    match data.len() {
        1 => data[0] = (number as i8) as u8,
        2 => layout::write_i16(data, 0, number as i16),
        4 => layout::write_i32(data, 0, number as i32),
        8 => layout::write(data, 0, &number.to_ne_bytes()),
        _ => return None,
    }
    Some(())
}
