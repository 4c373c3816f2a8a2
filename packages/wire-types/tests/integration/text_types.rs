//! Character, byte and numeric containers.

use bigdecimal::BigDecimal;
use wire_types::{Descriptor, ErrorKind, Value, WireType, WireValue};

use super::helpers::env;

#[test]
fn test_varchar_capacity_exceeded() {
    let env = env();
    let mut value = WireValue::builder(WireType::Varchar)
        .value("short")
        .size(20)
        .build(&env)
        .unwrap();
    let err = value.set(&env, "x".repeat(21)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(err.to_string(), "VARCHAR(20) capacity exceeded");
    assert_eq!(value.get(&env).unwrap(), Value::from("short"));
}

#[test]
fn test_size_limits() {
    let env = env();
    let err = WireValue::builder(WireType::Char)
        .value("a")
        .size(32_001)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);

    let err = WireValue::builder(WireType::Nvarchar)
        .value("a")
        .size(16_001)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn test_char_clear_blanks() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Char)
        .value("abc")
        .build(&env)?;
    value.clear();
    assert_eq!(value.peek(), "202020");
    Ok(())
}

#[test]
fn test_byte_formats_as_hex() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Varbyte)
        .value(vec![0xDEu8, 0xAD])
        .size(4)
        .build(&env)?;
    assert_eq!(value.formatted(&env)?.as_deref(), Some("DEAD"));
    assert_eq!(value.declared_type(), "VARBYTE(4)");
    Ok(())
}

#[test]
fn test_set_from_converts_between_text_types() -> anyhow::Result<()> {
    let env = env();
    let source = WireValue::builder(WireType::Char)
        .value("padded")
        .size(10)
        .build(&env)?;
    let mut target = WireValue::builder(WireType::Varchar)
        .value("")
        .size(10)
        .build(&env)?;
    target.set_from(&env, &source)?;
    assert_eq!(target.get(&env)?, Value::from("padded"));
    Ok(())
}

#[test]
fn test_set_from_text_into_integer() -> anyhow::Result<()> {
    let env = env();
    let source = WireValue::builder(WireType::Varchar).value("1234").build(&env)?;
    let mut target = WireValue::builder(WireType::Integer)
        .value(0)
        .size(2)
        .build(&env)?;
    target.set_from(&env, &source)?;
    assert_eq!(target.get(&env)?, Value::Int(1234));

    let too_big = WireValue::builder(WireType::Varchar).value("99999").build(&env)?;
    let err = target.set_from(&env, &too_big).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conversion);
    assert_eq!(target.get(&env)?, Value::Int(1234));
    Ok(())
}

#[test]
fn test_set_from_null_source() {
    let env = env();
    let desc = Descriptor::new(WireType::Varchar, 6).with_nullable(true);
    let mut source = WireValue::builder(WireType::Varchar)
        .descriptor(&desc)
        .build(&env)
        .unwrap();
    source.receive(true);

    let mut strict = WireValue::builder(WireType::Varchar)
        .value("keep")
        .build(&env)
        .unwrap();
    let err = strict.set_from(&env, &source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Nullability);

    let mut loose = WireValue::builder(WireType::Varchar)
        .value("keep")
        .nullable(true)
        .build(&env)
        .unwrap();
    loose.set_from(&env, &source).unwrap();
    assert!(loose.is_null());
}

#[test]
fn test_integer_widths() -> anyhow::Result<()> {
    let env = env();
    let value = WireValue::builder(WireType::Integer)
        .value(-32_768)
        .size(2)
        .build(&env)?;
    assert_eq!(value.declared_type(), "SMALLINT");
    assert_eq!(value.formatted(&env)?.as_deref(), Some("-32768"));

    let err = WireValue::builder(WireType::Integer)
        .value(1)
        .size(3)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}

#[test]
fn test_integer_bounds_per_width() -> anyhow::Result<()> {
    let env = env();
    for (size, min, max) in [
        (1, i64::from(i8::MIN), i64::from(i8::MAX)),
        (2, i64::from(i16::MIN), i64::from(i16::MAX)),
        (4, i64::from(i32::MIN), i64::from(i32::MAX)),
    ] {
        let mut value = WireValue::builder(WireType::Integer)
            .value(max)
            .size(size)
            .build(&env)?;
        value.set(&env, min)?;
        assert_eq!(value.get(&env)?, Value::Int(min));

        let err = value.set(&env, max + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = value.set(&env, min - 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        assert_eq!(value.get(&env)?, Value::Int(min));
    }

    let mut bigint = WireValue::builder(WireType::Integer)
        .value(i64::MIN)
        .size(8)
        .build(&env)?;
    assert_eq!(bigint.get(&env)?, Value::Int(i64::MIN));
    bigint.set(&env, i64::MAX)?;
    let err = bigint
        .set(&env, BigDecimal::from(i64::MAX) + BigDecimal::from(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    let err = bigint
        .set(&env, BigDecimal::from(i64::MIN) - BigDecimal::from(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(bigint.get(&env)?, Value::Int(i64::MAX));
    Ok(())
}

#[test]
fn test_char_pads_short_value() -> anyhow::Result<()> {
    let env = env();
    let text = "twenty-one characters";
    assert_eq!(text.len(), 21);
    let value = WireValue::builder(WireType::Char)
        .value(text)
        .size(25)
        .build(&env)?;
    assert_eq!(value.len(), 25);
    assert_eq!(value.as_bytes(), format!("{text}    ").as_bytes());
    assert_eq!(value.get(&env)?, Value::from(format!("{text}    ")));
    Ok(())
}

#[test]
fn test_empty_varchar_inferred() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Varchar).value("").build(&env)?;
    assert_eq!(value.len(), 2);
    assert_eq!(value.declared_type(), "VARCHAR(0)");
    assert_eq!(value.get(&env)?, Value::from(""));

    let err = value.set(&env, "x").unwrap_err();
    assert_eq!(err.to_string(), "VARCHAR(0) capacity exceeded");

    let value = WireValue::builder(WireType::Nvarchar).value("").build(&env)?;
    assert_eq!(value.len(), 2);
    assert_eq!(value.declared_type(), "NVARCHAR(0)");
    Ok(())
}

#[test]
fn test_varchar_limit_counts_prefix() {
    let env = env();
    assert!(WireValue::builder(WireType::Varchar)
        .value("")
        .size(31_998)
        .build(&env)
        .is_ok());
    let err = WireValue::builder(WireType::Varchar)
        .value("")
        .size(31_999)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);
}

#[test]
fn test_nullable_varchar_round_trip() -> anyhow::Result<()> {
    let env = env();
    let mut value = WireValue::builder(WireType::Varchar)
        .value("kept")
        .size(8)
        .nullable(true)
        .build(&env)?;
    value.set(&env, None::<&str>)?;
    assert!(value.is_null());
    assert_eq!(value.get(&env)?, Value::Null);
    assert_eq!(value.formatted(&env)?, None);

    value.set(&env, "back")?;
    assert!(!value.is_null());
    assert_eq!(value.get(&env)?, Value::from("back"));

    let mut strict = WireValue::builder(WireType::Nchar).value("ab").build(&env)?;
    let err = strict.set(&env, Value::Null).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Nullability);
    assert_eq!(strict.get(&env)?, Value::from("ab"));
    Ok(())
}
