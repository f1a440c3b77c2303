// src/llm/registry.rs
// Model registry: public model ids -> provider family and backend model

use crate::error::{CopilotError, Result};
use crate::llm::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Model used when neither the request nor the learner picks one
pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

/// Pricing tier shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Budget,
    Standard,
    Premium,
}

/// Static description of one selectable model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDescriptor {
    pub public_id: String,
    pub display_name: String,
    pub provider_kind: ProviderKind,
    pub backend_model_id: String,
    pub supports_vision: bool,
    pub tier: Tier,
    pub description: String,
}

impl ModelDescriptor {
    pub fn new(
        public_id: &str,
        display_name: &str,
        provider_kind: ProviderKind,
        backend_model_id: &str,
        tier: Tier,
        description: &str,
    ) -> Self {
        Self {
            public_id: public_id.to_string(),
            display_name: display_name.to_string(),
            provider_kind,
            backend_model_id: backend_model_id.to_string(),
            supports_vision: true,
            tier,
            description: description.to_string(),
        }
    }
}

/// Listing entry exposed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
    pub tier: Tier,
    pub supports_vision: bool,
    pub description: String,
}

impl From<&ModelDescriptor> for ModelInfo {
    fn from(d: &ModelDescriptor) -> Self {
        Self {
            id: d.public_id.clone(),
            display_name: d.display_name.clone(),
            tier: d.tier,
            supports_vision: d.supports_vision,
            description: d.description.clone(),
        }
    }
}

/// Read-only registry, built once at startup and shared by reference
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Build a registry from descriptors in display order
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(models.len());
        for (i, m) in models.iter().enumerate() {
            if index.insert(m.public_id.clone(), i).is_some() {
                return Err(CopilotError::Config(format!(
                    "duplicate model id in registry: {}",
                    m.public_id
                )));
            }
        }
        Ok(Self { models, index })
    }

    /// The models this deployment ships with
    pub fn builtin() -> Self {
        let models = vec![
            ModelDescriptor::new(
                "gpt-5.2",
                "GPT-5.2 (Premium)",
                ProviderKind::OpenAiResponses,
                "gpt-5.2",
                Tier::Premium,
                "Most capable model. Best reasoning but slowest (~30s). Use for complex or multi-step problems.",
            ),
            ModelDescriptor::new(
                "gpt-5-mini",
                "GPT-5 Mini",
                ProviderKind::OpenAiResponses,
                "gpt-5-mini",
                Tier::Standard,
                "Good balance of quality and speed (~15-20s). Suitable for most homework questions.",
            ),
            ModelDescriptor::new(
                "gpt-4o",
                "GPT-4o",
                ProviderKind::OpenAiChat,
                "gpt-4o",
                Tier::Standard,
                "Fast and reliable (~15-25s). Strong vision support. Recommended default.",
            ),
            ModelDescriptor::new(
                "gpt-4o-mini",
                "GPT-4o Mini (Budget)",
                ProviderKind::OpenAiChat,
                "gpt-4o-mini",
                Tier::Budget,
                "Fastest and cheapest (~5-10s). Good for simple questions. May struggle with complex problems.",
            ),
        ];

        let index = models
            .iter()
            .enumerate()
            .map(|(i, m)| (m.public_id.clone(), i))
            .collect();
        Self { models, index }
    }

    /// Look up a model, returning its descriptor and backend model string
    pub fn resolve(&self, public_id: &str) -> Result<(&ModelDescriptor, &str)> {
        let descriptor = self
            .index
            .get(public_id)
            .map(|&i| &self.models[i])
            .ok_or_else(|| CopilotError::UnknownModel {
                model_id: public_id.to_string(),
                available: self.ids(),
            })?;
        Ok((descriptor, descriptor.backend_model_id.as_str()))
    }

    /// Listing contract for UIs, in registration order
    pub fn model_infos(&self) -> Vec<ModelInfo> {
        self.models.iter().map(ModelInfo::from).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.models.iter().map(|m| m.public_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> ModelDescriptor {
        ModelDescriptor::new(id, id, ProviderKind::OpenAiChat, id, Tier::Standard, "")
    }

    // ============================================================================
    // resolve
    // ============================================================================

    #[test]
    fn test_resolve_builtin_default() {
        let registry = ModelRegistry::builtin();
        let (descriptor, backend) = registry.resolve(DEFAULT_MODEL_ID).unwrap();
        assert_eq!(descriptor.provider_kind, ProviderKind::OpenAiChat);
        assert_eq!(backend, "gpt-4o");
    }

    #[test]
    fn test_resolve_responses_family() {
        let registry = ModelRegistry::builtin();
        let (descriptor, backend) = registry.resolve("gpt-5.2").unwrap();
        assert_eq!(descriptor.provider_kind, ProviderKind::OpenAiResponses);
        assert_eq!(descriptor.tier, Tier::Premium);
        assert_eq!(backend, "gpt-5.2");
    }

    #[test]
    fn test_resolve_unknown_model() {
        let registry = ModelRegistry::builtin();
        let err = registry.resolve("nonexistent-model").unwrap_err();
        match err {
            CopilotError::UnknownModel {
                model_id,
                available,
            } => {
                assert_eq!(model_id, "nonexistent-model");
                assert_eq!(available.len(), 4);
            }
            other => panic!("expected UnknownModel, got {:?}", other),
        }
    }

    // ============================================================================
    // list
    // ============================================================================

    #[test]
    fn test_list_preserves_insertion_order() {
        let registry =
            ModelRegistry::new(vec![sample("d"), sample("a"), sample("c"), sample("b")]).unwrap();
        assert_eq!(registry.ids(), vec!["d", "a", "c", "b"]);
    }

    #[test]
    fn test_builtin_listing_order() {
        let infos = ModelRegistry::builtin().model_infos();
        let ids: Vec<&str> = infos.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["gpt-5.2", "gpt-5-mini", "gpt-4o", "gpt-4o-mini"]);
        assert!(infos.iter().all(|m| m.supports_vision));
    }

    #[test]
    fn test_model_info_wire_shape() {
        let infos = ModelRegistry::builtin().model_infos();
        let json = serde_json::to_value(&infos[3]).unwrap();
        assert_eq!(json["id"], "gpt-4o-mini");
        assert_eq!(json["display_name"], "GPT-4o Mini (Budget)");
        assert_eq!(json["tier"], "budget");
        assert_eq!(json["supports_vision"], true);
        assert!(json.get("backend_model_id").is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ModelRegistry::new(vec![sample("a"), sample("a")]);
        assert!(matches!(result, Err(CopilotError::Config(_))));
    }
}
