//! Byte offset accessors for fixed wire layouts.
//!
//! Fields are stored in host byte order unless noted.

/// Copies `N` bytes starting at `offset`.
pub fn read<const N: usize>(data: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[offset..offset + N]);
    out
}

/// Writes `bytes` starting at `offset`.
pub fn write(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

pub fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_ne_bytes(read(data, offset))
}

pub fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_ne_bytes(read(data, offset))
}

pub fn read_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_ne_bytes(read(data, offset))
}

pub fn write_i16(data: &mut [u8], offset: usize, value: i16) {
    write(data, offset, &value.to_ne_bytes());
}

pub fn write_u16(data: &mut [u8], offset: usize, value: u16) {
    write(data, offset, &value.to_ne_bytes());
}

pub fn write_i32(data: &mut [u8], offset: usize, value: i32) {
    write(data, offset, &value.to_ne_bytes());
}

/// Field offsets of a TIME value.
pub mod time {
    pub const SECONDS: usize = 0;
    pub const NANOSECONDS: usize = 4;
    pub const ZONE: usize = 8;
}

/// Field offsets of a TIMESTAMP value.
pub mod timestamp {
    pub const YEAR: usize = 0;
    pub const MONTH: usize = 2;
    pub const DAY: usize = 3;
    pub const SECONDS: usize = 4;
    pub const NANOSECONDS: usize = 8;
    pub const ZONE: usize = 12;
}

/// Field offsets of an ANSI date.
pub mod ansidate {
    pub const YEAR: usize = 0;
    pub const MONTH: usize = 2;
    pub const DAY: usize = 3;
}

/// Field offsets of an INTERVAL DAY TO SECOND value.
pub mod interval_ds {
    pub const DAYS: usize = 0;
    pub const SECONDS: usize = 4;
    pub const NANOSECONDS: usize = 8;
}

/// Field offsets of an INTERVAL YEAR TO MONTH value.
pub mod interval_ym {
    pub const YEARS: usize = 0;
    pub const MONTHS: usize = 2;
}

/// Field offsets and status flags of the legacy combined date.
pub mod ingresdate {
    pub const STATUS: usize = 0;
    pub const HIGHDAY: usize = 1;
    pub const YEAR: usize = 2;
    pub const MONTH: usize = 4;
    pub const LOWDAY: usize = 6;
    pub const TIME: usize = 8;

    pub const NULL: u8 = 0x00;
    pub const ABSOLUTE: u8 = 0x01;
    pub const DURATION: u8 = 0x02;
    pub const YEARSPEC: u8 = 0x04;
    pub const MONTHSPEC: u8 = 0x08;
    pub const DAYSPEC: u8 = 0x10;
    pub const TIMESPEC: u8 = 0x20;
    pub const AFTER_EPOCH: u8 = 0x40;
    pub const BEFORE_EPOCH: u8 = 0x80;
}
