//! Registry lookups and result row materialization.

use wire_types::{Descriptor, ErrorKind, TypeRegistry, Value, WireType};

use super::helpers::env;

#[test]
fn test_resolve_codes() {
    let registry = TypeRegistry::with_builtin().unwrap();
    assert_eq!(registry.resolve(10).unwrap(), WireType::Decimal);
    assert_eq!(registry.resolve(46).unwrap(), WireType::Ipv6);

    for code in [22, 25, 28, 41, 56, 64] {
        let err = registry.resolve(code).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}

#[test]
fn test_materialize_result_row() -> anyhow::Result<()> {
    let env = env();
    let registry = TypeRegistry::with_builtin()?;
    let columns = [
        Descriptor::new(WireType::Integer, 8).with_name("id"),
        Descriptor::new(WireType::Varchar, 12)
            .with_nullable(true)
            .with_name("label"),
        Descriptor::new(WireType::Decimal, 3)
            .with_precision(5, 2)
            .with_name("price"),
    ];
    let mut row = registry.allocate_row(&columns)?;

    row[0].receive(false).copy_from_slice(&9i64.to_ne_bytes());
    row[1].receive(true);
    row[2].receive(false).copy_from_slice(&[0x01, 0x99, 0x9c]);

    assert_eq!(row[0].get(&env)?, Value::Int(9));
    assert_eq!(row[1].get(&env)?, Value::Null);
    assert_eq!(row[1].name(), Some("label"));
    assert_eq!(row[2].formatted(&env)?.as_deref(), Some("19.99"));
    assert_eq!(row[2].declared_type(), "DECIMAL(5,2)");
    Ok(())
}

#[test]
fn test_allocate_unregistered_type() {
    let registry = TypeRegistry::new();
    let err = registry
        .allocate(&Descriptor::new(WireType::Boolean, 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_descriptor_serializes() -> anyhow::Result<()> {
    let desc = Descriptor::new(WireType::Decimal, 3).with_precision(5, 2);
    let json = serde_json::to_string(&desc)?;
    let back: Descriptor = serde_json::from_str(&json)?;
    assert_eq!(back, desc);
    Ok(())
}
