//! Error types for wire value construction, assignment and conversion.

/// Broad category of a [`WireError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid construction arguments.
    Config,
    /// Host value of a type the container cannot accept.
    Domain,
    /// Value, size, precision or resolution out of range.
    Overflow,
    /// Null assigned to a not-nullable container.
    Nullability,
    /// The native formatting delegate rejected a conversion.
    Conversion,
    /// The environment handle could not be established or is missing.
    Initialization,
    /// Assignment to a read-only container.
    Immutable,
    /// Recognised wire type without an implementation.
    Unsupported,
    /// Shared state left unusable by a panicking thread.
    Internal,
}

/// Error type for wire values.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Descriptor given together with a value or sizing arguments
    #[error("conflicting construction mode: descriptor given together with positional arguments")]
    ConflictingConstruction,

    /// Neither a value nor a descriptor was given
    #[error("no initial value")]
    NoInitialValue,

    /// Builder argument the type does not take
    #[error("too many arguments for {type_name}: '{argument}' not accepted")]
    TooManyArguments {
        type_name: &'static str,
        argument: &'static str,
    },

    /// Fixed-width numeric built without a size
    #[error("{type_name} requires an explicit size")]
    MissingSize { type_name: &'static str },

    /// Size outside the widths the type allows
    #[error("invalid size {size} for {type_name}")]
    InvalidWidth { type_name: &'static str, size: usize },

    /// Read-only type built from a value
    #[error("{type_name} cannot be constructed from a value, a descriptor is required")]
    DescriptorRequired { type_name: &'static str },

    /// Host value the type cannot accept
    #[error("{type_name}: {message}")]
    Domain {
        type_name: &'static str,
        message: String,
    },

    /// Value or size too large for the declared type
    #[error("{declaration} {message}")]
    Overflow { declaration: String, message: String },

    /// Null assigned to a not-nullable container
    #[error("not nullable")]
    NotNullable,

    /// Native client rejected a conversion
    #[error("type conversion failed")]
    ConversionFailed,

    /// Stored bytes do not decode to a host value
    #[error("type conversion failed: {message}")]
    InvalidEncoding { message: String },

    /// Environment handle missing or refused
    #[error("initialization failed: {message}")]
    Initialization { message: String },

    /// Assignment to a read-only container
    #[error("{declaration} is immutable")]
    Immutable { declaration: String },

    /// Wire code recognised but not implemented
    #[error("wire type {code} is not supported: {reason}")]
    Unsupported { code: i16, reason: &'static str },

    /// Second codec registered for a wire type
    #[error("codec for {wire_type} already registered")]
    AlreadyRegistered { wire_type: crate::types::WireType },

    /// Lock poisoned (RwLock poisoned)
    #[error("lock poisoned")]
    LockPoisoned,
}

impl WireError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WireError::ConflictingConstruction
            | WireError::NoInitialValue
            | WireError::TooManyArguments { .. }
            | WireError::MissingSize { .. }
            | WireError::InvalidWidth { .. }
            | WireError::DescriptorRequired { .. }
            | WireError::AlreadyRegistered { .. } => ErrorKind::Config,
            WireError::Domain { .. } => ErrorKind::Domain,
            WireError::Overflow { .. } => ErrorKind::Overflow,
            WireError::NotNullable => ErrorKind::Nullability,
            WireError::ConversionFailed | WireError::InvalidEncoding { .. } => {
                ErrorKind::Conversion
            }
            WireError::Initialization { .. } => ErrorKind::Initialization,
            WireError::Immutable { .. } => ErrorKind::Immutable,
            WireError::Unsupported { .. } => ErrorKind::Unsupported,
            WireError::LockPoisoned => ErrorKind::Internal,
        }
    }

    pub(crate) fn domain(type_name: &'static str, message: impl Into<String>) -> Self {
        WireError::Domain {
            type_name,
            message: message.into(),
        }
    }

    pub(crate) fn overflow(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        WireError::Overflow {
            declaration: declaration.into(),
            message: message.into(),
        }
    }

    pub(crate) fn capacity_exceeded(declaration: impl Into<String>) -> Self {
        Self::overflow(declaration, "capacity exceeded")
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WireError>;
