use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::codec::{self, Codec};
use crate::error::{Result, WireError};
use crate::types::{Descriptor, WireType};
use crate::wire_value::WireValue;

/// Registry mapping wire types to codecs.
///
/// Used to materialize containers for result columns described by the engine.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    codecs: RwLock<HashMap<WireType, Arc<dyn Codec>>>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a registry holding every built-in codec.
    pub fn with_builtin() -> Result<Self> {
        let registry = Self::new();
        register_builtin_codecs(&registry)?;
        Ok(registry)
    }

    /// Registers a codec for a wire type.
    ///
    /// # Returns
    /// `Ok(())` if successful, `Err(WireError::AlreadyRegistered)` if taken.
    pub fn register(&self, wire_type: WireType, codec: Arc<dyn Codec>) -> Result<()> {
        let mut codecs = self.codecs.write().map_err(|_| WireError::LockPoisoned)?;
        if codecs.contains_key(&wire_type) {
            return Err(WireError::AlreadyRegistered { wire_type });
        }
        codecs.insert(wire_type, codec);
        Ok(())
    }

    /// Retrieves the codec for a wire type.
    pub fn get(&self, wire_type: WireType) -> Option<Arc<dyn Codec>> {
        let codecs = self.codecs.read().ok()?;
        codecs.get(&wire_type).cloned()
    }

    fn lookup(&self, wire_type: WireType) -> Result<Option<Arc<dyn Codec>>> {
        let codecs = self.codecs.read().map_err(|_| WireError::LockPoisoned)?;
        Ok(codecs.get(&wire_type).cloned())
    }

    /// Checks if a wire type is registered.
    pub fn contains(&self, wire_type: WireType) -> bool {
        match self.codecs.read() {
            Ok(codecs) => codecs.contains_key(&wire_type),
            Err(_) => false,
        }
    }

    /// Returns all registered wire types.
    pub fn wire_types(&self) -> Vec<WireType> {
        match self.codecs.read() {
            Ok(codecs) => codecs.keys().copied().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Removes a registration.
    ///
    /// # Returns
    /// `true` if the wire type was removed, `false` if it wasn't found.
    pub fn remove(&self, wire_type: WireType) -> bool {
        match self.codecs.write() {
            Ok(mut codecs) => codecs.remove(&wire_type).is_some(),
            Err(_) => false,
        }
    }

    /// Resolves a raw wire code to a registered type.
    pub fn resolve(&self, code: i16) -> Result<WireType> {
        let wire_type = WireType::from_code(code).inspect_err(|err| {
            tracing::warn!(code, error = %err, "unsupported wire type");
        })?;
        if self.lookup(wire_type)?.is_none() {
            return Err(WireError::Unsupported {
                code,
                reason: "no codec registered",
            });
        }
        Ok(wire_type)
    }

    /// Allocates an empty container for a described column.
    ///
    /// # Arguments
    /// * `descriptor` - Column description; cloned into the container
    pub fn allocate(&self, descriptor: &Descriptor) -> Result<WireValue> {
        let wire_type = descriptor.wire_type;
        let codec = self.lookup(wire_type)?.ok_or(WireError::Unsupported {
            code: wire_type.code(),
            reason: "no codec registered",
        })?;
        WireValue::with_codec(codec, descriptor.clone())
    }

    /// Allocates one container per described column.
    pub fn allocate_row(&self, descriptors: &[Descriptor]) -> Result<Vec<WireValue>> {
        let row = descriptors
            .iter()
            .map(|descriptor| self.allocate(descriptor))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(columns = row.len(), "allocated result row");
        Ok(row)
    }
}

/// Registers the codec of every implemented wire type.
pub fn register_builtin_codecs(registry: &TypeRegistry) -> Result<()> {
    for wire_type in WireType::ALL {
        registry.register(wire_type, codec::builtin(wire_type))?;
    }
    Ok(())
}
