//! DECIMAL containers: packed layout, truncation and range checks.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use wire_types::{Descriptor, ErrorKind, Value, WireType, WireValue};

use super::helpers::env;

#[test]
fn test_poked_packed_digits_read_back() -> anyhow::Result<()> {
    let env = env();
    let desc = Descriptor::new(WireType::Decimal, 3).with_precision(5, 2);
    let mut value = WireValue::builder(WireType::Decimal)
        .descriptor(&desc)
        .build(&env)?;
    value.poke_hex("00314c")?;

    assert_eq!(value.get(&env)?, Value::Float(3.14));
    assert_eq!(value.formatted(&env)?.as_deref(), Some("3.14"));
    assert_eq!(value.declared_type(), "DECIMAL(5,2)");
    Ok(())
}

#[test]
fn test_scale_pads_fraction() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Decimal)
        .value(3.14)
        .precision(5)
        .scale(4)
        .build(&env)?;
    assert_eq!(value.peek(), "31400c");
    assert_eq!(value.formatted(&env)?.as_deref(), Some("3.1400"));
    Ok(())
}

#[test]
fn test_excess_fraction_truncated() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Decimal)
        .value(3.14159265358)
        .precision(5)
        .scale(4)
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("3.1415"));
    Ok(())
}

#[test]
fn test_negative_sign_nibble() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Decimal)
        .value(BigDecimal::from_str("-12.5")?)
        .precision(5)
        .scale(2)
        .build(&env)?;
    assert_eq!(value.peek(), "01250d");
    assert_eq!(value.get(&env)?, Value::Float(-12.5));
    Ok(())
}

#[test]
fn test_integer_digits_overflow() {
    let env = env();
    let err = WireValue::builder(WireType::Decimal)
        .value(123.4)
        .precision(5)
        .scale(4)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert!(err.to_string().starts_with("DECIMAL(5,4)"));
}

#[test]
fn test_precision_inferred_from_value() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Decimal).value(42).build(&env)?;
    assert_eq!(value.declared_type(), "DECIMAL(19,0)");
    assert_eq!(value.len(), 10);
    assert_eq!(value.get(&env)?, Value::Float(42.0));

    let err = WireValue::builder(WireType::Decimal)
        .value("42")
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    Ok(())
}

#[test]
fn test_precision_limit() {
    let err = WireValue::builder(WireType::Decimal)
        .value(1)
        .precision(40)
        .build(&env())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn test_nullable_decimal_round_trip() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Decimal)
        .value(1.5)
        .precision(5)
        .scale(2)
        .nullable(true)
        .build(&env)?;
    value.set(&env, None::<f64>)?;
    assert!(value.is_null());
    assert_eq!(value.get(&env)?, Value::Null);
    assert_eq!(value.peek(), "");

    value.set(&env, 2.25)?;
    assert_eq!(value.get(&env)?, Value::Float(2.25));
    assert_eq!(value.formatted(&env)?.as_deref(), Some("2.25"));
    Ok(())
}
