//! INGRESDATE text conversions.
//!
//! Accepts ISO, `dd-mon-yyyy` and `mm/dd/yyyy` dates with an optional time,
//! and durations written as `<n> <unit>` pairs. Absolute timestamps are stored
//! in UTC and rendered in the session zone.

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::codec::ingresdate::{join_days, split_days, IngresDateCodec, MAX_DURATION_DAYS};
use crate::codec::layout::{self, ingresdate as dn};

const MILLIS_PER_DAY: i64 = 86_400_000;
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%b-%Y", "%m/%d/%Y"];
const DAYS_PER_YEAR: f64 = 365.2425;
const DAYS_PER_MONTH: f64 = 30.4369;

#[derive(Debug, Default, PartialEq)]
struct Interval {
    years: i64,
    months: i64,
    days: i64,
    millis: i64,
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

fn parse_interval(text: &str) -> Option<Interval> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return None;
    }
    let mut interval = Interval::default();
    for pair in tokens.chunks_exact(2) {
        let amount: i64 = pair[0].parse().ok()?;
        let unit = pair[1].to_ascii_lowercase();
        let (field, scale) = if unit.starts_with("mo") {
            (&mut interval.months, 1)
        } else if unit.starts_with('y') {
            (&mut interval.years, 1)
        } else if unit.starts_with('d') {
            (&mut interval.days, 1)
        } else if unit.starts_with('h') {
            (&mut interval.millis, 3_600_000)
        } else if unit.starts_with("mi") {
            (&mut interval.millis, 60_000)
        } else if unit.starts_with('s') {
            (&mut interval.millis, 1000)
        } else {
            return None;
        };
        *field = field.checked_add(amount.checked_mul(scale)?)?;
    }
    Some(interval)
}

fn write_interval(mut interval: Interval, data: &mut [u8]) -> Option<()> {
    interval.days = interval.days.checked_add(interval.millis / MILLIS_PER_DAY)?;
    interval.millis %= MILLIS_PER_DAY;
    interval.years = interval.years.checked_add(interval.months / 12)?;
    interval.months %= 12;
    if interval.days.unsigned_abs() > MAX_DURATION_DAYS.unsigned_abs() {
        return None;
    }

    let mut status = dn::DURATION;
    for (value, flag) in [
        (interval.years, dn::YEARSPEC),
        (interval.months, dn::MONTHSPEC),
        (interval.days, dn::DAYSPEC),
        (interval.millis, dn::TIMESPEC),
    ] {
        if value != 0 {
            status |= flag;
        }
    }
    let (highday, lowday) = split_days(interval.days as i32);

    data.fill(0);
    data[dn::STATUS] = status;
    data[dn::HIGHDAY] = highday;
    layout::write_i16(data, dn::YEAR, i16::try_from(interval.years).ok()?);
    layout::write_i16(data, dn::MONTH, interval.months as i16);
    layout::write_u16(data, dn::LOWDAY, lowday);
    layout::write_i32(data, dn::TIME, interval.millis as i32);
    Some(())
}

/// Parses INGRESDATE text into `data`.
pub fn parse_into(text: &str, session: FixedOffset, data: &mut [u8]) -> Option<()> {
    let text = text.trim();
    if text.is_empty() {
        data.fill(0);
        return Some(());
    }
    if let Some(interval) = parse_interval(text) {
        return write_interval(interval, data);
    }

    let (date, clock) = match text.split_once([' ', 'T']) {
        Some((date, clock)) => (date, Some(clock.trim())),
        None => (text, None),
    };
    let date = parse_date(date)?;
    match clock {
        None => IngresDateCodec::write_absolute(data, date, None).ok(),
        Some(clock) => {
            let wall = date.and_time(parse_clock(clock)?);
            let utc = wall - TimeDelta::seconds(i64::from(session.local_minus_utc()));
            IngresDateCodec::write_absolute(data, utc.date(), Some(utc.time())).ok()
        }
    }
}

fn pieces(value: i64, unit: &str, out: &mut Vec<String>) {
    if value != 0 {
        out.push(format!("{value} {unit}"));
    }
}

/// Renders an INGRESDATE buffer.
pub fn render(data: &[u8], session: FixedOffset) -> Option<String> {
    let status = data[dn::STATUS];
    let year = layout::read_i16(data, dn::YEAR);
    let month = layout::read_i16(data, dn::MONTH);
    let days = join_days(data[dn::HIGHDAY], layout::read_u16(data, dn::LOWDAY));
    let millis = layout::read_i32(data, dn::TIME);

    if status == dn::NULL {
        return Some(String::new());
    }
    if status & dn::ABSOLUTE != 0 {
        let date = NaiveDate::from_ymd_opt(
            i32::from(year),
            u32::try_from(month).ok()?,
            u32::try_from(days).ok()?,
        )?;
        if status & dn::TIMESPEC == 0 {
            return Some(date.format("%d-%b-%Y").to_string().to_lowercase());
        }
        let utc: NaiveDateTime =
            date.and_hms_opt(0, 0, 0)? + TimeDelta::milliseconds(i64::from(millis));
        let wall = utc + TimeDelta::seconds(i64::from(session.local_minus_utc()));
        return Some(wall.format("%d-%b-%Y %H:%M:%S").to_string().to_lowercase());
    }
    if status & dn::DURATION == 0 {
        return None;
    }

    let seconds = i64::from(millis) / 1000;
    let mut out = Vec::new();
    pieces(i64::from(year), "yrs", &mut out);
    pieces(i64::from(month), "mos", &mut out);
    pieces(i64::from(days), "days", &mut out);
    pieces(seconds / 3600, "hrs", &mut out);
    pieces(seconds / 60 % 60, "mins", &mut out);
    pieces(seconds % 60, "secs", &mut out);
    if out.is_empty() {
        return Some("0 secs".to_string());
    }
    Some(out.join(" "))
}

/// Reads a duration INGRESDATE as total months.
pub fn total_months(data: &[u8]) -> Option<i64> {
    if data[dn::STATUS] & dn::DURATION == 0 {
        return None;
    }
    let years = i64::from(layout::read_i16(data, dn::YEAR));
    let months = i64::from(layout::read_i16(data, dn::MONTH));
    let days = i64::from(join_days(data[dn::HIGHDAY], layout::read_u16(data, dn::LOWDAY)));
    Some(years * 12 + months + (days as f64 / DAYS_PER_MONTH) as i64)
}

/// Reads a duration INGRESDATE as total nanoseconds.
pub fn total_nanos(data: &[u8]) -> Option<i128> {
    if data[dn::STATUS] & dn::DURATION == 0 {
        return None;
    }
    let years = f64::from(layout::read_i16(data, dn::YEAR));
    let months = f64::from(layout::read_i16(data, dn::MONTH));
    let days = join_days(data[dn::HIGHDAY], layout::read_u16(data, dn::LOWDAY));
    let millis = layout::read_i32(data, dn::TIME);
    let approx =
        (years * DAYS_PER_YEAR).round_ties_even() + (months * DAYS_PER_MONTH).round_ties_even();
    let days = approx as i128 + i128::from(days);
    Some(days * 86_400 * 1_000_000_000 + i128::from(millis) * 1_000_000)
}
