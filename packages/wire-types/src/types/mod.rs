//! Wire type codes, descriptors and host values.

pub mod descriptor;
pub mod value;
pub mod wire_type;

pub use descriptor::Descriptor;
pub use value::{SqlConstant, Value};
pub use wire_type::{Family, WireType};
