//! Environment publication and delegate failures.

use wire_types::{EmulatedClient, EnvHandle, Environment, ErrorKind, Value, WireType, WireValue};

#[test]
fn test_unpublished_environment() {
    let env = Environment::new(EmulatedClient::default());
    let err = WireValue::builder(WireType::Decimal)
        .value(1.5)
        .precision(5)
        .scale(2)
        .build(&env)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Initialization);

    // types that never delegate work without a handle
    let value = WireValue::builder(WireType::Integer)
        .value(7)
        .size(4)
        .build(&env)
        .unwrap();
    assert_eq!(value.get(&env).unwrap(), Value::Int(7));
}

#[test]
fn test_publish_negotiates_version() {
    let env = Environment::new(EmulatedClient::default().with_max_version(4));
    let handle = env.publish(None).unwrap();
    assert_eq!(handle, EnvHandle::new(4));
    assert_eq!(env.publish(None).unwrap(), handle);
}

#[test]
fn test_publish_external_handle() {
    let env = Environment::new(EmulatedClient::default());
    let handle = env.publish(Some(EnvHandle::new(77))).unwrap();
    assert_eq!(handle.raw(), 77);

    let value = WireValue::builder(WireType::Money)
        .value("$5.00")
        .build(&env)
        .unwrap();
    assert_eq!(value.get(&env).unwrap(), Value::Float(5.0));
}

#[test]
fn test_no_version_accepted() {
    let env = Environment::new(EmulatedClient::default().with_max_version(0));
    let err = env.publish(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert!(env.current().is_none());
}

#[test]
fn test_rejected_conversion_keeps_value() {
    let env = Environment::new(EmulatedClient::default());
    env.publish(None).unwrap();
    let mut value = WireValue::builder(WireType::Date)
        .value("2024-06-03")
        .build(&env)
        .unwrap();
    let before = value.peek();

    let source = WireValue::builder(WireType::Uuid)
        .value("67e55044-10b1-426f-9247-bb680e5fe0c8")
        .build(&env)
        .unwrap();
    let err = value.set_from(&env, &source).unwrap_err();
    assert_eq!(err.to_string(), "type conversion failed");
    assert_eq!(value.peek(), before);
}
