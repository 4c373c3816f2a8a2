//! Typed value containers for the Ingres OpenAPI column wire format.
//!
//! Provides per-type codecs, the environment that delegates conversions to the
//! native client, and a registry that materializes containers for described
//! result columns.

pub mod codec;
pub mod config;
pub mod emulated;
pub mod env;
pub mod error;
pub mod registry;
pub mod types;
pub mod wire_value;

pub use config::WireConfig;
pub use emulated::EmulatedClient;
pub use env::{EnvHandle, Environment, NativeClient};
pub use error::{ErrorKind, Result, WireError};
pub use registry::TypeRegistry;
pub use types::{Descriptor, SqlConstant, Value, WireType};
pub use wire_value::{DataValue, Displayed, WireValue, WireValueBuilder};
