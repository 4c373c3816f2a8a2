use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WireError};

/// Layout family a wire type belongs to.
///
/// Types within a family share a construction shape and an encoding contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Fixed-size types taking a single value.
    Fixed,
    /// Character and byte strings taking a value and an optional size.
    Varlen,
    /// Integers and floats taking a value and a mandatory width.
    Numeric,
    /// Time, timestamp and day-to-second interval taking a value and a resolution.
    Temporal,
    /// Packed decimal taking a value, precision and scale.
    Decimal,
    /// Read-only large object locators.
    Locator,
}

/// Wire type codes understood by the native client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    Boolean,
    Byte,
    Char,
    C,
    /// ANSI date.
    Date,
    Decimal,
    /// Legacy combined date, time and duration.
    IngresDate,
    Float,
    Integer,
    IntervalDayToSecond,
    IntervalYearToMonth,
    Ipv4,
    Ipv6,
    LongByteLocator,
    LongVarcharLocator,
    LongNvarcharLocator,
    ObjectKey,
    Money,
    Nchar,
    Nvarchar,
    TableKey,
    /// Time with local time zone.
    Time,
    TimeWithTimeZone,
    TimeWithoutTimeZone,
    /// Timestamp with local time zone.
    Timestamp,
    TimestampWithTimeZone,
    TimestampWithoutTimeZone,
    Text,
    Uuid,
    Varbyte,
    Varchar,
}

const LONG_VARCHAR: i16 = 22;
const LONG_BYTE: i16 = 25;
const LONG_NVARCHAR: i16 = 28;
const LONG_TEXT: i16 = 41;
const GEOSPATIAL: std::ops::RangeInclusive<i16> = 56..=64;

impl WireType {
    /// Every implemented wire type.
    pub const ALL: [WireType; 31] = [
        WireType::Boolean,
        WireType::Byte,
        WireType::Char,
        WireType::C,
        WireType::Date,
        WireType::Decimal,
        WireType::IngresDate,
        WireType::Float,
        WireType::Integer,
        WireType::IntervalDayToSecond,
        WireType::IntervalYearToMonth,
        WireType::Ipv4,
        WireType::Ipv6,
        WireType::LongByteLocator,
        WireType::LongVarcharLocator,
        WireType::LongNvarcharLocator,
        WireType::ObjectKey,
        WireType::Money,
        WireType::Nchar,
        WireType::Nvarchar,
        WireType::TableKey,
        WireType::Time,
        WireType::TimeWithTimeZone,
        WireType::TimeWithoutTimeZone,
        WireType::Timestamp,
        WireType::TimestampWithTimeZone,
        WireType::TimestampWithoutTimeZone,
        WireType::Text,
        WireType::Uuid,
        WireType::Varbyte,
        WireType::Varchar,
    ];

    /// Returns the numeric code used on the wire.
    pub fn code(self) -> i16 {
        match self {
            WireType::IngresDate => 3,
            WireType::Date => 4,
            WireType::Money => 5,
            WireType::TimeWithoutTimeZone => 6,
            WireType::TimeWithTimeZone => 7,
            WireType::Time => 8,
            WireType::TimestampWithoutTimeZone => 9,
            WireType::Decimal => 10,
            WireType::ObjectKey => 11,
            WireType::TableKey => 12,
            WireType::Uuid => 13,
            WireType::TimestampWithTimeZone => 18,
            WireType::Timestamp => 19,
            WireType::Char => 20,
            WireType::Varchar => 21,
            WireType::Byte => 23,
            WireType::Varbyte => 24,
            WireType::Nchar => 26,
            WireType::Nvarchar => 27,
            WireType::LongNvarcharLocator => 29,
            WireType::Integer => 30,
            WireType::Float => 31,
            WireType::C => 32,
            WireType::IntervalYearToMonth => 33,
            WireType::IntervalDayToSecond => 34,
            WireType::LongByteLocator => 35,
            WireType::LongVarcharLocator => 36,
            WireType::Text => 37,
            WireType::Boolean => 38,
            WireType::Ipv4 => 45,
            WireType::Ipv6 => 46,
        }
    }

    /// Resolves a wire code.
    ///
    /// Inline large objects and geospatial codes are recognised but rejected.
    ///
    /// # Returns
    /// `Ok(WireType)` for implemented codes, `Err(WireError::Unsupported)` otherwise.
    pub fn from_code(code: i16) -> Result<Self> {
        if let Some(wire_type) = Self::ALL.iter().copied().find(|t| t.code() == code) {
            return Ok(wire_type);
        }
        let reason = match code {
            LONG_VARCHAR | LONG_BYTE | LONG_NVARCHAR | LONG_TEXT => {
                "inline large objects are not supported, use a locator"
            }
            c if GEOSPATIAL.contains(&c) => "geospatial types are not supported",
            _ => "unknown wire type",
        };
        Err(WireError::Unsupported { code, reason })
    }

    /// Returns the layout family of this type.
    pub fn family(self) -> Family {
        match self {
            WireType::Boolean
            | WireType::Date
            | WireType::IngresDate
            | WireType::IntervalYearToMonth
            | WireType::Ipv4
            | WireType::Ipv6
            | WireType::ObjectKey
            | WireType::Money
            | WireType::TableKey
            | WireType::Uuid => Family::Fixed,
            WireType::Byte
            | WireType::Char
            | WireType::C
            | WireType::Nchar
            | WireType::Nvarchar
            | WireType::Text
            | WireType::Varbyte
            | WireType::Varchar => Family::Varlen,
            WireType::Integer | WireType::Float => Family::Numeric,
            WireType::IntervalDayToSecond
            | WireType::Time
            | WireType::TimeWithTimeZone
            | WireType::TimeWithoutTimeZone
            | WireType::Timestamp
            | WireType::TimestampWithTimeZone
            | WireType::TimestampWithoutTimeZone => Family::Temporal,
            WireType::Decimal => Family::Decimal,
            WireType::LongByteLocator
            | WireType::LongVarcharLocator
            | WireType::LongNvarcharLocator => Family::Locator,
        }
    }

    /// Byte length of types whose size never varies.
    pub fn fixed_length(self) -> Option<usize> {
        match self {
            WireType::Boolean => Some(1),
            WireType::Date => Some(4),
            WireType::IngresDate => Some(12),
            WireType::IntervalYearToMonth => Some(3),
            WireType::IntervalDayToSecond => Some(12),
            WireType::Ipv4 => Some(4),
            WireType::Ipv6 => Some(16),
            WireType::ObjectKey => Some(16),
            WireType::Money => Some(8),
            WireType::TableKey => Some(8),
            WireType::Uuid => Some(16),
            WireType::Time | WireType::TimeWithTimeZone | WireType::TimeWithoutTimeZone => {
                Some(10)
            }
            WireType::Timestamp
            | WireType::TimestampWithTimeZone
            | WireType::TimestampWithoutTimeZone => Some(14),
            WireType::LongByteLocator
            | WireType::LongVarcharLocator
            | WireType::LongNvarcharLocator => Some(4),
            _ => None,
        }
    }

    /// Short name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            WireType::Boolean => "Boolean",
            WireType::Byte => "Byte",
            WireType::Char => "Char",
            WireType::C => "C",
            WireType::Date => "Date",
            WireType::Decimal => "Decimal",
            WireType::IngresDate => "IngresDate",
            WireType::Float => "Float",
            WireType::Integer => "Integer",
            WireType::IntervalDayToSecond => "IntervalDayToSecond",
            WireType::IntervalYearToMonth => "IntervalYearToMonth",
            WireType::Ipv4 => "IPv4",
            WireType::Ipv6 => "IPv6",
            WireType::LongByteLocator => "LongByteLocator",
            WireType::LongVarcharLocator => "LongVarcharLocator",
            WireType::LongNvarcharLocator => "LongNvarcharLocator",
            WireType::ObjectKey => "ObjectKey",
            WireType::Money => "Money",
            WireType::Nchar => "Nchar",
            WireType::Nvarchar => "Nvarchar",
            WireType::TableKey => "TableKey",
            WireType::Time => "Time",
            WireType::TimeWithTimeZone => "TimeWithTimeZone",
            WireType::TimeWithoutTimeZone => "TimeWithoutTimeZone",
            WireType::Timestamp => "Timestamp",
            WireType::TimestampWithTimeZone => "TimestampWithTimeZone",
            WireType::TimestampWithoutTimeZone => "TimestampWithoutTimeZone",
            WireType::Text => "Text",
            WireType::Uuid => "Uuid",
            WireType::Varbyte => "Varbyte",
            WireType::Varchar => "Varchar",
        }
    }

    /// True for types using 16-bit code units.
    pub fn is_wide(self) -> bool {
        matches!(self, WireType::Nchar | WireType::Nvarchar)
    }

    /// True for types carrying a 2-byte length prefix.
    pub fn is_length_prefixed(self) -> bool {
        matches!(
            self,
            WireType::Varchar | WireType::Varbyte | WireType::Nvarchar
        )
    }

    /// True for time and timestamp types that carry an explicit zone offset.
    pub fn is_zone_aware(self) -> bool {
        matches!(
            self,
            WireType::TimeWithTimeZone | WireType::TimestampWithTimeZone
        )
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
