use std::net::IpAddr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use uuid::Uuid;

/// SQL clock markers resolved at assignment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlConstant {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    LocalTime,
    LocalTimestamp,
}

impl SqlConstant {
    /// Renders the constant as ISO text, taken from the local clock.
    ///
    /// `CURRENT_*` forms carry the local zone offset, `LOCAL_*` forms are naive.
    pub fn render(self) -> String {
        let now = Local::now();
        match self {
            SqlConstant::CurrentDate => now.format("%Y-%m-%d").to_string(),
            SqlConstant::CurrentTime => now.format("%H:%M:%S%.6f%:z").to_string(),
            SqlConstant::CurrentTimestamp => now.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string(),
            SqlConstant::LocalTime => now.format("%H:%M:%S%.6f").to_string(),
            SqlConstant::LocalTimestamp => now.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        }
    }
}

/// Host-side value assigned to or read from a wire container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null marker.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Str(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Time of day with an explicit zone offset.
    TimeTz(NaiveTime, FixedOffset),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<FixedOffset>),
    Duration(TimeDelta),
    /// Years and months of a year-to-month interval.
    YearMonth(i16, i8),
    Uuid(Uuid),
    Ip(IpAddr),
    Constant(SqlConstant),
}

impl Value {
    /// Returns true for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replaces SQL clock markers with their rendered text.
    pub fn resolved(self) -> Value {
        match self {
            Value::Constant(constant) => Value::Str(constant.render()),
            other => other,
        }
    }

    /// Host type name used in domain error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::TimeTz(..) => "time with offset",
            Value::Timestamp(_) => "datetime",
            Value::TimestampTz(_) => "datetime with offset",
            Value::Duration(_) => "duration",
            Value::YearMonth(..) => "year-month interval",
            Value::Uuid(_) => "uuid",
            Value::Ip(_) => "ip address",
            Value::Constant(_) => "sql constant",
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    BigDecimal => Decimal,
    String => Str,
    &str => Str,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    DateTime<FixedOffset> => TimestampTz,
    TimeDelta => Duration,
    Uuid => Uuid,
    IpAddr => Ip,
    SqlConstant => Constant,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
