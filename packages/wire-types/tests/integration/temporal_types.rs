//! Time, timestamp, interval and INGRESDATE containers.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use wire_types::{ErrorKind, Value, WireType, WireValue};

use super::helpers::{env, env_at};

#[test]
fn test_time_resolution_truncates() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::TimeWithoutTimeZone)
        .value("06:54:32.123")
        .resolution(2)
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("06:54:32.12"));
    assert_eq!(
        value.get(&env)?,
        Value::Time(NaiveTime::from_hms_milli_opt(6, 54, 32, 120).unwrap())
    );
    assert_eq!(value.declared_type(), "TIME(2)");
    Ok(())
}

#[test]
fn test_time_without_zone_ignores_session() -> anyhow::Result<()> {
    let utc = env_at(0);
    let east = env_at(5);
    let here = WireValue::builder(WireType::TimeWithoutTimeZone)
        .value("10:00:00")
        .build(&utc)?;
    let there = WireValue::builder(WireType::TimeWithoutTimeZone)
        .value("10:00:00")
        .build(&east)?;
    assert_eq!(here.peek(), there.peek());
    assert_eq!(here.formatted(&east)?.as_deref(), Some("10:00:00"));
    assert_eq!(there.formatted(&utc)?.as_deref(), Some("10:00:00"));
    Ok(())
}

#[test]
fn test_local_zone_timestamp_follows_session() -> anyhow::Result<()> {
    let paris = env_at(2);
    let value = WireValue::builder(WireType::Timestamp)
        .value("2024-06-11 10:59:10")
        .build(&paris)?;
    assert_eq!(
        value.formatted(&paris)?.as_deref(),
        Some("2024-06-11 10:59:10.000000")
    );
    assert_eq!(
        value.formatted(&env())?.as_deref(),
        Some("2024-06-11 08:59:10.000000")
    );
    let expected = NaiveDate::from_ymd_opt(2024, 6, 11)
        .unwrap()
        .and_hms_opt(10, 59, 10)
        .unwrap();
    assert_eq!(value.get(&paris)?, Value::Timestamp(expected));
    Ok(())
}

#[test]
fn test_zoned_timestamp_keeps_offset() -> anyhow::Result<()> {
    let env = env();
    let stamp: DateTime<FixedOffset> = DateTime::parse_from_rfc3339("2024-06-11T10:59:10+01:00")?;
    let value = WireValue::builder(WireType::TimestampWithTimeZone)
        .value(stamp)
        .build(&env)?;
    assert_eq!(
        value.formatted(&env)?.as_deref(),
        Some("2024-06-11 10:59:10.000000+01:00")
    );
    assert_eq!(value.get(&env)?, Value::TimestampTz(stamp));
    assert_eq!(value.declared_type(), "TIMESTAMP(6) WITH TIME ZONE");
    Ok(())
}

#[test]
fn test_zoned_time() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::TimeWithTimeZone)
        .value("10:00:00+01:00")
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("10:00:00+01:00"));
    assert_eq!(
        value.get(&env)?,
        Value::TimeTz(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            FixedOffset::east_opt(3600).unwrap()
        )
    );
    Ok(())
}

#[test]
fn test_naive_timestamp_rejects_offset() {
    let err = WireValue::builder(WireType::TimestampWithoutTimeZone)
        .value("2024-06-11 10:59:10+01:00")
        .build(&env())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert!(err.to_string().contains("tzinfo not allowed"));
}

#[test]
fn test_year_month_from_duration() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::IntervalYearToMonth)
        .value(TimeDelta::days(183))
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("0-06"));
    assert_eq!(value.get(&env)?, Value::YearMonth(0, 6));

    value.set(&env, TimeDelta::days(-183))?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("-0-06"));

    value.set(&env, "12-03")?;
    assert_eq!(value.get(&env)?, Value::YearMonth(12, 3));
    Ok(())
}

#[test]
fn test_day_second_interval() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::IntervalDayToSecond)
        .value(TimeDelta::days(2) + TimeDelta::seconds(5))
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("2 00:00:05"));

    value.set(&env, -(TimeDelta::days(1) + TimeDelta::hours(2)))?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("-1 02:00:00"));
    assert_eq!(
        value.get(&env)?,
        Value::Duration(-(TimeDelta::days(1) + TimeDelta::hours(2)))
    );
    Ok(())
}

#[test]
fn test_ingresdate_duration_text() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::IngresDate)
        .value(TimeDelta::seconds(36_102))
        .build(&env)?;
    assert_eq!(
        value.formatted(&env)?.as_deref(),
        Some("10 hrs 1 mins 42 secs")
    );
    assert_eq!(value.get(&env)?, Value::Duration(TimeDelta::seconds(36_102)));
    Ok(())
}

#[test]
fn test_ingresdate_dates_and_empty() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::IngresDate)
        .value("2024-06-03")
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("03-jun-2024"));
    assert_eq!(
        value.get(&env)?,
        Value::Date(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
    );

    value.set(&env, "")?;
    assert_eq!(value.peek(), "0".repeat(24));
    assert_eq!(value.get(&env)?, Value::Null);
    assert!(!value.is_null());
    Ok(())
}

#[test]
fn test_ingresdate_into_intervals() -> anyhow::Result<()> {
    let env = env();
    let months = WireValue::builder(WireType::IngresDate)
        .value("1 yrs 14 mos")
        .build(&env)?;
    let mut year_month = WireValue::builder(WireType::IntervalYearToMonth)
        .value(Value::YearMonth(0, 0))
        .build(&env)?;
    year_month.set_from(&env, &months)?;
    assert_eq!(year_month.formatted(&env)?.as_deref(), Some("2-02"));

    let days = WireValue::builder(WireType::IngresDate)
        .value("3 days 4 hrs")
        .build(&env)?;
    let mut day_second = WireValue::builder(WireType::IntervalDayToSecond)
        .value(TimeDelta::zero())
        .build(&env)?;
    day_second.set_from(&env, &days)?;
    assert_eq!(day_second.formatted(&env)?.as_deref(), Some("3 04:00:00"));
    Ok(())
}

#[test]
fn test_ingresdate_duration_limit() {
    let err = WireValue::builder(WireType::IngresDate)
        .value(TimeDelta::days(3_652_048))
        .build(&env())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn test_nullable_timestamp_round_trip() -> anyhow::Result<()> {
    let env = env();
    let stamp = NaiveDate::from_ymd_opt(2024, 6, 11)
        .unwrap()
        .and_hms_opt(10, 59, 10)
        .unwrap();
    let mut value = WireValue::builder(WireType::TimestampWithoutTimeZone)
        .value(stamp)
        .nullable(true)
        .build(&env)?;
    value.set(&env, None::<NaiveDate>)?;
    assert!(value.is_null());
    assert_eq!(value.get(&env)?, Value::Null);
    assert_eq!(value.formatted(&env)?, None);

    value.set(&env, stamp)?;
    assert_eq!(value.get(&env)?, Value::Timestamp(stamp));
    Ok(())
}

#[test]
fn test_oversized_interval_text_rejected() -> anyhow::Result<()> {
    let env = env();
    let mut day_second = WireValue::builder(WireType::IntervalDayToSecond)
        .value(TimeDelta::hours(1))
        .build(&env)?;
    let err = day_second
        .set(&env, "200000000000000 00:00:00")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(day_second.get(&env)?, Value::Duration(TimeDelta::hours(1)));

    let mut legacy = WireValue::builder(WireType::IngresDate)
        .value("2 hrs")
        .build(&env)?;
    let err = legacy.set(&env, "9000000000000000 hrs").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(legacy.get(&env)?, Value::Duration(TimeDelta::hours(2)));
    Ok(())
}

#[test]
fn test_ingresdate_month_decodes_to_whole_days() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::IngresDate)
        .value("1 mos")
        .build(&env)?;
    assert_eq!(value.get(&env)?, Value::Duration(TimeDelta::days(30)));

    // DURATION | YEARSPEC | MONTHSPEC, 1 year 6 months
    let mut raw = [0u8; 12];
    raw[0] = 0x0e;
    raw[2..4].copy_from_slice(&1i16.to_ne_bytes());
    raw[4..6].copy_from_slice(&6i16.to_ne_bytes());
    value.poke(&raw);
    assert_eq!(value.get(&env)?, Value::Duration(TimeDelta::days(365 + 183)));
    Ok(())
}
