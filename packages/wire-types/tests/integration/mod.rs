//! Integration tests for wire value containers.
//!
//! Every suite runs against the emulated native client.

pub mod decimal_types;
pub mod environment_tests;
pub mod fixed_types;
pub mod helpers;
pub mod registry_tests;
pub mod temporal_types;
pub mod text_types;
