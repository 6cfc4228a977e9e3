//! Provider registry for lookup and discovery.

use crate::provider::{DynKernelProvider, KernelProvider, OptimizedKernels, ReferenceKernels};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<DynKernelProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(ReferenceKernels::new());
        registry.register(OptimizedKernels::new());
        registry
    }

    /// Adds `provider`, replacing any earlier one registered under the same name.
    pub fn register<P>(&mut self, provider: P)
    where
        P: KernelProvider + 'static,
    {
        self.providers.retain(|existing| existing.name() != provider.name());
        self.providers.push(Arc::new(provider));
    }

    pub fn providers(&self) -> &[DynKernelProvider] {
        &self.providers
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn find(&self, name: &str) -> Option<DynKernelProvider> {
        self.providers
            .iter()
            .find(|provider| provider.name() == name)
            .map(Arc::clone)
    }
}
