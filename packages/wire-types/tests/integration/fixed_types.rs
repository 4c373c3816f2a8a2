//! Fixed-size types: boolean, money, keys, uuid, addresses and locators.

use std::net::{IpAddr, Ipv6Addr};

use uuid::Uuid;
use wire_types::{Descriptor, ErrorKind, Value, WireError, WireType, WireValue};

use super::helpers::env;

#[test]
fn test_boolean_formatting() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Boolean).value(true).build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("TRUE"));
    value.set(&env, 0)?;
    assert_eq!(value.get(&env)?, Value::Bool(false));
    assert_eq!(value.formatted(&env)?.as_deref(), Some("FALSE"));
    assert_eq!(value.declared_type(), "BOOLEAN");
    Ok(())
}

#[test]
fn test_boolean_extra_argument() {
    let err = WireValue::builder(WireType::Boolean)
        .value(true)
        .size(1)
        .build(&env())
        .unwrap_err();
    assert!(matches!(err, WireError::TooManyArguments { .. }));
}

#[test]
fn test_money_text_and_amounts() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Money)
        .value("$100.23")
        .build(&env)?;
    assert_eq!(value.get(&env)?, Value::Float(100.23));
    assert_eq!(value.formatted(&env)?.as_deref(), Some("$100.23"));

    value.set(&env, -100.23)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("$-100.23"));
    assert_eq!(value.declared_type(), "MONEY");
    Ok(())
}

#[test]
fn test_money_rejects_garbage_text() {
    let env = env();
    let mut value = WireValue::builder(WireType::Money).value(1).build(&env).unwrap();
    let err = value.set(&env, "lots").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(value.get(&env).unwrap(), Value::Float(1.0));
}

#[test]
fn test_table_key_hex() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::TableKey)
        .value("0x0102030405060708")
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("0102030405060708"));
    assert_eq!(value.declared_type(), "TABLE_KEY");

    let err = WireValue::builder(WireType::ObjectKey)
        .value("0102")
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    Ok(())
}

#[test]
fn test_uuid_round_trip() -> anyhow::Result<()> {
    let env = env();
    let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8")?;
    let value = WireValue::builder(WireType::Uuid)
        .value(uuid.to_string())
        .build(&env)?;
    assert_eq!(value.get(&env)?, Value::Uuid(uuid));
    assert_eq!(
        value.formatted(&env)?.as_deref(),
        Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
    );
    Ok(())
}

#[test]
fn test_ip_addresses() -> anyhow::Result<()> {
    let env = env();
    let v6 = WireValue::builder(WireType::Ipv6).value("::1").build(&env)?;
    assert_eq!(v6.get(&env)?, Value::Ip(IpAddr::V6(Ipv6Addr::LOCALHOST)));
    assert_eq!(v6.len(), 16);

    let err = WireValue::builder(WireType::Ipv6)
        .value("127.0.0.1")
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Domain);
    Ok(())
}

#[test]
fn test_locator_is_read_only() {
    let env = env();
    let err = WireValue::builder(WireType::LongByteLocator)
        .value(7)
        .build(&env)
        .unwrap_err();
    assert!(matches!(err, WireError::DescriptorRequired { .. }));

    let desc = Descriptor::new(WireType::LongByteLocator, 4);
    let mut locator = WireValue::from_descriptor(&desc).unwrap();
    locator.receive(false).copy_from_slice(&42i32.to_ne_bytes());
    assert_eq!(locator.get(&env).unwrap(), Value::Int(42));
    assert_eq!(locator.formatted(&env).unwrap().as_deref(), Some("42"));

    let err = locator.set(&env, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Immutable);
    assert_eq!(err.to_string(), "<LONG BYTE locator> is immutable");
}

#[test]
fn test_sql_constant_resolved_on_assignment() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Date)
        .value(wire_types::SqlConstant::CurrentDate)
        .build(&env)?;
    assert!(matches!(value.get(&env)?, Value::Date(_)));
    Ok(())
}

#[test]
fn test_money_stores_cents() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Money).value(100.23).build(&env)?;
    assert_eq!(value.as_bytes(), 10023.0f64.to_ne_bytes());
    let Value::Float(amount) = value.get(&env)? else {
        panic!("expected float");
    };
    assert!((amount - 100.23).abs() < 1e-4);

    value.set(&env, "$7.50")?;
    assert_eq!(value.as_bytes(), 750.0f64.to_ne_bytes());
    Ok(())
}
