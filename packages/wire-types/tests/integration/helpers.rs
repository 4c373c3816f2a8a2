//! Shared fixtures.

use chrono::FixedOffset;
use wire_types::{EmulatedClient, Environment};

/// Published environment whose session zone is UTC.
pub fn env() -> Environment {
    env_at(0)
}

/// Published environment whose session zone is `hours` east of UTC.
pub fn env_at(hours: i32) -> Environment {
    let offset = FixedOffset::east_opt(hours * 3600).unwrap();
    let env = Environment::new(EmulatedClient::default().with_time_zone(offset));
    env.publish(None).unwrap();
    env
}
