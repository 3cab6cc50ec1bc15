//! Tool Registry - central registration and lookup for all tools.
//!
//! This module provides:
//! - [`RegistryBuilder`], which assembles capabilities once at startup
//! - [`Registry`], the immutable, ordered, name-indexed result
//! - Tool metadata for listing, in registration order

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::RegistryError;
use super::handlers::{Capability, ToolDefinition};
use super::schema::Schema;

// ============================================================================
// Tool Registry
// ============================================================================

/// Immutable collection of capabilities.
///
/// Lookups are exact, case-sensitive matches. Listing preserves registration
/// order.
#[derive(Debug, Default)]
pub struct Registry {
    capabilities: Vec<Capability>,
    index: HashMap<String, usize>,
}

/// Metadata of a registered capability, as consumed by discovery.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "inputSchema")]
    pub schema: &'a Schema,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a capability by exact name.
    pub fn lookup(&self, name: &str) -> Option<&Capability> {
        self.index.get(name).map(|&i| &self.capabilities[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over capability metadata in registration order.
    ///
    /// Each call starts a fresh iteration.
    pub fn list(&self) -> impl Iterator<Item = CapabilityDescriptor<'_>> + '_ {
        self.capabilities.iter().map(|c| CapabilityDescriptor {
            name: c.name(),
            description: c.description(),
            schema: c.schema(),
        })
    }

    /// Iterate over the capabilities themselves in registration order.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    /// Get all tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.capabilities.iter().map(Capability::name).collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Assembles a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Register a capability.
    ///
    /// Fails if the name is taken; the earlier registration is kept.
    pub fn register(&mut self, capability: Capability) -> Result<&mut Self, RegistryError> {
        let registry = &mut self.registry;
        if registry.index.contains_key(capability.name()) {
            return Err(RegistryError::DuplicateName(capability.name().to_string()));
        }

        debug!("Registering tool: {}", capability.name());
        registry
            .index
            .insert(capability.name().to_string(), registry.capabilities.len());
        registry.capabilities.push(capability);
        Ok(self)
    }

    /// Register a struct-defined tool.
    pub fn register_definition<T: ToolDefinition>(
        &mut self,
        tool: T,
    ) -> Result<&mut Self, RegistryError> {
        self.register(Capability::from_definition(tool)?)
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        info!("Registry built with {} tools", self.registry.len());
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::envelope::ResponseEnvelope;
    use crate::domains::tools::schema::FieldSpec;

    fn stub(name: &str, description: &str) -> Capability {
        let text = description.to_string();
        Capability::from_fn(name, description, Schema::empty(), move |_| {
            Ok(ResponseEnvelope::text(text.clone()))
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut builder = Registry::builder();
        builder.register(stub("get_plan", "Plan")).unwrap();
        let registry = builder.build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("get_plan").unwrap().description(), "Plan");
        assert!(registry.lookup("Get_Plan").is_none());
        assert!(registry.lookup("get_pla").is_none());
    }

    #[test]
    fn test_duplicate_name_keeps_first() {
        let mut builder = Registry::builder();
        builder.register(stub("tool", "first")).unwrap();
        let err = builder.register(stub("tool", "second")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("tool".into()));

        let registry = builder.build();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("tool").unwrap().description(), "first");
    }

    #[test]
    fn test_list_preserves_registration_order() {
        let mut builder = Registry::builder();
        for name in ["zeta", "alpha", "mid"] {
            builder.register(stub(name, name)).unwrap();
        }
        let registry = builder.build();

        let first: Vec<_> = registry.list().map(|d| d.name).collect();
        let second: Vec<_> = registry.list().map(|d| d.name).collect();
        assert_eq!(first, vec!["zeta", "alpha", "mid"]);
        assert_eq!(first, second);
        assert_eq!(registry.names(), first);
    }

    #[test]
    fn test_descriptor_serializes_schema() {
        let schema = Schema::builder()
            .required("level", FieldSpec::string())
            .build()
            .unwrap();
        let mut builder = Registry::builder();
        builder
            .register(Capability::from_fn("t", "d", schema, |_| {
                Ok(ResponseEnvelope::default())
            }))
            .unwrap();
        let registry = builder.build();

        let descriptor = registry.list().next().unwrap();
        let json = serde_json::to_value(descriptor).unwrap();
        assert_eq!(json["name"], "t");
        assert_eq!(json["inputSchema"]["required"][0], "level");
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(registry.list().count(), 0);
    }
}
