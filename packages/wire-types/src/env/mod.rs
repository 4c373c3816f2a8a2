//! Environment handle and the native formatting seam.

pub mod client;
pub mod environment;

pub use client::{ConversionRequest, EnvHandle, FormatStatus, NativeClient, Operand, OperandMut};
pub use environment::Environment;
