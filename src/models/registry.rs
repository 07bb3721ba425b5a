// registry.rs - Model registry resolving names to substitution models

use std::collections::BTreeMap;
use crate::error::{DistError, Result};
use super::traits::{ModelOptions, SubstitutionModel};
use super::{F81Model, F84Model, JcModel, K2pModel, PDistModel, Tn93Model};

type ModelConstructor = fn(&ModelOptions) -> Box<dyn SubstitutionModel>;

/// Registry for available substitution models
pub struct ModelRegistry {
    models: BTreeMap<String, ModelConstructor>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            models: BTreeMap::new(),
        };

        // Register built-in models
        registry.register_model("pdist", |o| {
            Box::new(PDistModel::new(o.remove_gaps).with_gap_count(o.gap_count))
        });
        registry.register_model("jc", |o| Box::new(JcModel::new(o.remove_gaps)));
        registry.register_model("k2p", |o| Box::new(K2pModel::new(o.remove_gaps)));
        registry.register_model("f81", |o| Box::new(F81Model::new(o.remove_gaps)));
        registry.register_model("f84", |o| Box::new(F84Model::new(o.remove_gaps)));
        registry.register_model("tn93", |o| Box::new(Tn93Model::new(o.remove_gaps)));

        registry
    }

    /// Register a model constructor under a (case-insensitive) name
    pub fn register_model(&mut self, name: &str, constructor: ModelConstructor) {
        self.models.insert(name.to_lowercase(), constructor);
    }

    /// Build a configured, uninitialized model
    pub fn build(&self, name: &str, options: &ModelOptions) -> Result<Box<dyn SubstitutionModel>> {
        self.models
            .get(&name.to_lowercase())
            .map(|constructor| constructor(options))
            .ok_or_else(|| {
                DistError::config(format!(
                    "Unknown model '{}'. Available: {}",
                    name,
                    self.get_model_names().join(", ")
                ))
            })
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(&name.to_lowercase())
    }

    /// List all models as (name, description)
    pub fn list_models(&self) -> Vec<(&str, &'static str)> {
        let defaults = ModelOptions::default();
        self.models
            .iter()
            .map(|(name, constructor)| (name.as_str(), constructor(&defaults).description()))
            .collect()
    }

    /// All model names, sorted
    pub fn get_model_names(&self) -> Vec<&str> {
        self.models.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a model name to a configured, uninitialized model
pub fn model(name: &str, remove_gaps: bool) -> Result<Box<dyn SubstitutionModel>> {
    ModelRegistry::new().build(name, &ModelOptions::new(remove_gaps))
}
