//! # Provider Registry
//!
//! Startup-time registry resolving provider names to wrapped module
//! instances. Registration is explicit: the host maps each provider name to
//! a factory when the process starts, so which module backs a name is known
//! before the first transaction.
//!
//! A module is instantiated at most once per process per name, configured
//! from its settings section, wrapped, and shared from then on.

use crate::config::GatewayConfig;
use crate::error::PspError;
use crate::provider::BoxedProvider;
use crate::wrapper::ProviderWrapper;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Constructor for a provider module
pub type ProviderFactory =
    Box<dyn Fn(&GatewayConfig) -> Result<BoxedProvider, PspError> + Send + Sync>;

/// Registry of provider factories and their instantiated modules
pub struct ProviderRegistry {
    config: Arc<GatewayConfig>,
    factories: HashMap<String, ProviderFactory>,
    instances: RwLock<HashMap<String, Arc<ProviderWrapper>>>,
}

impl ProviderRegistry {
    pub fn new(config: Arc<GatewayConfig>) -> Self {
        Self {
            config,
            factories: HashMap::new(),
            instances: RwLock::new(HashMap::new()),
        }
    }

    /// Register a provider factory under a name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&GatewayConfig) -> Result<BoxedProvider, PspError> + Send + Sync + 'static,
    ) {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Register with builder pattern
    pub fn with_provider(
        mut self,
        name: impl Into<String>,
        factory: impl Fn(&GatewayConfig) -> Result<BoxedProvider, PspError> + Send + Sync + 'static,
    ) -> Self {
        self.register(name, factory);
        self
    }

    /// Resolve a provider name to its wrapped module instance.
    ///
    /// The factory runs at most once per process per name; later calls
    /// share the cached wrapper. The raw module never leaves the registry.
    pub fn get(&self, name: &str) -> Result<Arc<ProviderWrapper>, PspError> {
        {
            let instances = self.instances.read().expect("registry lock poisoned");
            if let Some(wrapper) = instances.get(name) {
                return Ok(wrapper.clone());
            }
        }

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| PspError::not_found(format!("provider '{name}'")))?;

        let mut instances = self.instances.write().expect("registry lock poisoned");

        // A concurrent caller may have built the instance while we waited
        // for the write lock
        if let Some(wrapper) = instances.get(name) {
            return Ok(wrapper.clone());
        }

        let mut module = factory(&self.config).map_err(|e| PspError::Load {
            provider: name.to_string(),
            message: e.to_string(),
        })?;

        if let Some(settings) = self.config.provider_settings(name) {
            module
                .configure(settings.clone())
                .map_err(|e| PspError::Load {
                    provider: name.to_string(),
                    message: format!("configuration rejected: {e}"),
                })?;
        }

        info!(provider = name, "provider module loaded");

        let wrapper = Arc::new(ProviderWrapper::new(module));
        instances.insert(name.to_string(), wrapper.clone());
        Ok(wrapper)
    }

    /// List all registered provider names
    pub fn providers(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn config(&self) -> &Arc<GatewayConfig> {
        &self.config
    }
}
