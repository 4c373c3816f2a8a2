//! TIME, TIMESTAMP and interval conversions.
//!
//! Zone-bearing variants store UTC wall-clock fields plus the zone offset in
//! minutes. Local-zone variants render in the session zone.

use chrono::{
    Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc,
};

use crate::codec::layout::{self, interval_ds, interval_ym, time, timestamp};
use crate::codec::temporal::{format_offset, split_offset};
use crate::types::WireType;

const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

/// Parses ISO date-time text; a bare date means midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Drops fraction digits beyond `resolution`.
pub fn truncate_nanos(nanos: u32, resolution: u16) -> u32 {
    if resolution >= 9 {
        return nanos;
    }
    let unit = 10u32.pow(9 - u32::from(resolution));
    nanos - nanos % unit
}

fn fraction(nanos: u32, resolution: u16) -> String {
    if resolution == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", &digits[..usize::from(resolution.min(9))])
}

fn offset_minutes(offset: FixedOffset) -> i16 {
    (offset.local_minus_utc() / 60) as i16
}

fn offset_from_minutes(minutes: i16) -> Option<FixedOffset> {
    FixedOffset::east_opt(i32::from(minutes) * 60)
}

/// Zone applied when storing and rendering a time or timestamp type.
///
/// # Returns
/// `None` for types without zone semantics.
fn storage_zone(
    wire_type: WireType,
    given: Option<FixedOffset>,
    session: FixedOffset,
) -> Option<FixedOffset> {
    match wire_type {
        WireType::TimeWithoutTimeZone | WireType::TimestampWithoutTimeZone => None,
        _ => Some(given.unwrap_or(session)),
    }
}

fn session_now(session: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&session).naive_local()
}

/// Parses time text into a TIME buffer.
pub fn parse_time_into(
    text: &str,
    wire_type: WireType,
    resolution: u16,
    session: FixedOffset,
    data: &mut [u8],
) -> Option<()> {
    let (body, given) = split_offset(text.trim());
    let wall = if body.eq_ignore_ascii_case("now") {
        session_now(session).time()
    } else {
        parse_time(body)?
    };
    let wall_seconds = i64::from(wall.num_seconds_from_midnight());
    let (seconds, zone) = match storage_zone(wire_type, given, session) {
        Some(offset) => (
            (wall_seconds - i64::from(offset.local_minus_utc())).rem_euclid(SECONDS_PER_DAY),
            offset_minutes(offset),
        ),
        None => (wall_seconds, 0),
    };

    layout::write_i32(data, time::SECONDS, seconds as i32);
    layout::write_i32(
        data,
        time::NANOSECONDS,
        truncate_nanos(wall.nanosecond(), resolution) as i32,
    );
    layout::write_i16(data, time::ZONE, zone);
    Some(())
}

/// Renders a TIME buffer.
pub fn render_time(
    data: &[u8],
    wire_type: WireType,
    resolution: u16,
    session: FixedOffset,
) -> Option<String> {
    let seconds = i64::from(layout::read_i32(data, time::SECONDS));
    let nanos = u32::try_from(layout::read_i32(data, time::NANOSECONDS)).ok()?;
    let stored = offset_from_minutes(layout::read_i16(data, time::ZONE))?;
    let (shift, suffix) = match wire_type {
        WireType::TimeWithoutTimeZone => (0, String::new()),
        WireType::TimeWithTimeZone => (stored.local_minus_utc(), format_offset(stored)),
        _ => (session.local_minus_utc(), String::new()),
    };
    let wall = (seconds + i64::from(shift)).rem_euclid(SECONDS_PER_DAY);
    let clock = NaiveTime::from_num_seconds_from_midnight_opt(wall as u32, 0)?;
    Some(format!(
        "{}{}{suffix}",
        clock.format("%H:%M:%S"),
        fraction(nanos, resolution)
    ))
}

/// Parses timestamp text into a TIMESTAMP buffer.
pub fn parse_timestamp_into(
    text: &str,
    wire_type: WireType,
    resolution: u16,
    session: FixedOffset,
    data: &mut [u8],
) -> Option<()> {
    let (body, given) = split_offset(text.trim());
    let wall = if body.eq_ignore_ascii_case("now") {
        session_now(session)
    } else {
        parse_timestamp(body)?
    };
    let (stored, zone) = match storage_zone(wire_type, given, session) {
        Some(offset) => (
            wall - TimeDelta::seconds(i64::from(offset.local_minus_utc())),
            offset_minutes(offset),
        ),
        None => (wall, 0),
    };
    let year = i16::try_from(stored.year()).ok()?;

    layout::write_i16(data, timestamp::YEAR, year);
    data[timestamp::MONTH] = stored.month() as u8;
    data[timestamp::DAY] = stored.day() as u8;
    layout::write_i32(
        data,
        timestamp::SECONDS,
        stored.num_seconds_from_midnight() as i32,
    );
    layout::write_i32(
        data,
        timestamp::NANOSECONDS,
        truncate_nanos(stored.nanosecond(), resolution) as i32,
    );
    layout::write_i16(data, timestamp::ZONE, zone);
    Some(())
}

/// Renders a TIMESTAMP buffer.
pub fn render_timestamp(
    data: &[u8],
    wire_type: WireType,
    resolution: u16,
    session: FixedOffset,
) -> Option<String> {
    let date = NaiveDate::from_ymd_opt(
        i32::from(layout::read_i16(data, timestamp::YEAR)),
        u32::from(data[timestamp::MONTH]),
        u32::from(data[timestamp::DAY]),
    )?;
    let seconds = u32::try_from(layout::read_i32(data, timestamp::SECONDS)).ok()?;
    let nanos = u32::try_from(layout::read_i32(data, timestamp::NANOSECONDS)).ok()?;
    let stored = date.and_time(NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)?);
    let zone = offset_from_minutes(layout::read_i16(data, timestamp::ZONE))?;
    let (shift, suffix) = match wire_type {
        WireType::TimestampWithoutTimeZone => (0, String::new()),
        WireType::TimestampWithTimeZone => (zone.local_minus_utc(), format_offset(zone)),
        _ => (session.local_minus_utc(), String::new()),
    };
    let wall = stored + TimeDelta::seconds(i64::from(shift));
    Some(format!(
        "{}{}{suffix}",
        wall.format("%Y-%m-%d %H:%M:%S"),
        fraction(nanos, resolution)
    ))
}

/// Parses `[-]Y-M` into an INTERVAL YEAR TO MONTH buffer.
pub fn parse_year_month_into(text: &str, data: &mut [u8]) -> Option<()> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (years, months) = unsigned.split_once('-').unwrap_or((unsigned, "0"));
    let years: i16 = years.trim().parse().ok()?;
    let months: i8 = months.trim().parse().ok()?;
    if !(0..=9999).contains(&years) || !(0..=11).contains(&months) {
        return None;
    }
    let (years, months) = if negative {
        (-years, -months)
    } else {
        (years, months)
    };
    layout::write_i16(data, interval_ym::YEARS, years);
    data[interval_ym::MONTHS] = months as u8;
    Some(())
}

/// Renders an INTERVAL YEAR TO MONTH buffer as `[-]Y-MM`.
pub fn render_year_month(data: &[u8]) -> String {
    let years = i32::from(layout::read_i16(data, interval_ym::YEARS));
    let months = i32::from(data[interval_ym::MONTHS] as i8);
    let total = years * 12 + months;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{sign}{}-{:02}", total / 12, total % 12)
}

/// Writes an INTERVAL DAY TO SECOND buffer from a signed nanosecond count.
pub fn write_day_second(total_nanos: i128, resolution: u16, data: &mut [u8]) -> Option<()> {
    let per_day = i128::from(SECONDS_PER_DAY * NANOS_PER_SECOND);
    let sign = if total_nanos < 0 { -1 } else { 1 };
    let magnitude = total_nanos.abs();
    let days = i32::try_from(magnitude / per_day).ok()?;
    let rest = magnitude % per_day;
    let seconds = (rest / i128::from(NANOS_PER_SECOND)) as i32;
    let nanos = truncate_nanos((rest % i128::from(NANOS_PER_SECOND)) as u32, resolution) as i32;

    layout::write_i32(data, interval_ds::DAYS, sign * days);
    layout::write_i32(data, interval_ds::SECONDS, sign * seconds);
    layout::write_i32(data, interval_ds::NANOSECONDS, sign * nanos);
    Some(())
}

/// Parses `[-]D HH:MM:SS[.f]` into an INTERVAL DAY TO SECOND buffer.
pub fn parse_day_second_into(text: &str, resolution: u16, data: &mut [u8]) -> Option<()> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let (days, clock) = match unsigned.split_once(' ') {
        Some((days, clock)) => (days.parse::<i64>().ok()?, clock.trim()),
        None => (0, unsigned),
    };
    let mut parts = clock.splitn(3, ':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds = parts.next().unwrap_or("0");
    let (seconds, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let seconds: i64 = seconds.parse().ok()?;
    let mut nanos_text: String = fraction.chars().take(9).collect();
    while nanos_text.len() < 9 {
        nanos_text.push('0');
    }
    let nanos: i64 = nanos_text.parse().ok()?;

    let whole = days
        .checked_mul(24)?
        .checked_add(hours)?
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?;
    let total = i128::from(whole) * i128::from(NANOS_PER_SECOND) + i128::from(nanos);
    write_day_second(if negative { -total } else { total }, resolution, data)
}

/// Renders an INTERVAL DAY TO SECOND buffer as `[-]D HH:MM:SS[.f]`.
pub fn render_day_second(data: &[u8], resolution: u16) -> String {
    let total = i128::from(layout::read_i32(data, interval_ds::DAYS))
        * i128::from(SECONDS_PER_DAY * NANOS_PER_SECOND)
        + i128::from(layout::read_i32(data, interval_ds::SECONDS)) * i128::from(NANOS_PER_SECOND)
        + i128::from(layout::read_i32(data, interval_ds::NANOSECONDS));
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    let nanos = (total % i128::from(NANOS_PER_SECOND)) as u32;
    let seconds = total / i128::from(NANOS_PER_SECOND);
    let days = seconds / i128::from(SECONDS_PER_DAY);
    let clock = seconds % i128::from(SECONDS_PER_DAY);
    format!(
        "{sign}{days} {:02}:{:02}:{:02}{}",
        clock / 3600,
        clock / 60 % 60,
        clock % 60,
        fraction(nanos, resolution)
    )
}
