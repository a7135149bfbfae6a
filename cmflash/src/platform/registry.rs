//! Global registry of supported device models.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use super::definition::ModelDefinition;
use super::models;
use crate::error::{PlatformError, Result};

/// Global model registry.
static REGISTRY: LazyLock<RwLock<PlatformRegistry>> = LazyLock::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_models();
    RwLock::new(registry)
});

/// Registry for device model definitions, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    models: HashMap<String, ModelDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
        }
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    fn register_builtin_models(&mut self) {
        for model in models::builtin() {
            self.models.insert(key(&model.name), model);
        }
    }

    /// Register a model definition.
    pub fn register(&mut self, model: ModelDefinition) -> Result<()> {
        let key = key(&model.name);
        if self.models.contains_key(&key) {
            return Err(PlatformError::AlreadyRegistered {
                name: model.name.clone(),
            }
            .into());
        }
        self.models.insert(key, model);
        Ok(())
    }

    /// Get a model by name.
    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(&key(name))
    }

    /// Check if a model is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(&key(name))
    }

    /// List all registered model names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.values().map(|m| m.name.as_str())
    }
}

fn key(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}
