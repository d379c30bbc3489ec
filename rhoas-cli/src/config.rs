//! Configuration file loading
//!
//! ```json
//! {
//!   "provider": { "create_timeout_secs": 1800 },
//!   "backend": { "type": "local", "path": "rhoas.state.json" },
//!   "resources": [
//!     { "type": "kafka", "name": "events", "attributes": { "name": "events" } }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use rhoas_core::resource::{Resource, Value};
use rhoas_core::schema::ResourceSchema;
use rhoas_provider_kafka::ProviderConfig;
use rhoas_provider_kafka::schemas;
use rhoas_state::BackendConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub provider: ProviderConfig,
    pub backend: BackendConfig,
    pub resources: Vec<ResourceConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("Parse error: {}", e))
    }

    /// Provider settings with `OFFLINE_TOKEN`, `RHOAS_API_URL` and
    /// `RHOAS_AUTH_URL` applied
    pub fn provider_config(&self) -> ProviderConfig {
        self.provider.clone().with_env_overrides()
    }

    /// Declared resources; JSON nulls are treated as unset
    pub fn resources(&self) -> Result<Vec<Resource>, String> {
        let mut seen = HashSet::new();
        let mut resources = Vec::with_capacity(self.resources.len());

        for entry in &self.resources {
            let mut resource = Resource::new(&entry.resource_type, &entry.name);
            if !seen.insert(resource.id.clone()) {
                return Err(format!("Duplicate resource {}", resource.id));
            }
            for (key, value) in &entry.attributes {
                let value = Value::from_json(value)
                    .map_err(|e| format!("{}: attribute '{}': {}", resource.id, key, e))?;
                if let Some(value) = value {
                    resource.attributes.insert(key.clone(), value);
                }
            }
            resources.push(resource);
        }

        Ok(resources)
    }
}

pub fn get_schemas() -> HashMap<String, ResourceSchema> {
    schemas::all_schemas()
        .into_iter()
        .map(|schema| (schema.resource_type.clone(), schema))
        .collect()
}

/// Check every resource against its schema, collecting all errors
pub fn validate_resources(
    resources: &[Resource],
    schemas: &HashMap<String, ResourceSchema>,
) -> Result<(), String> {
    let mut all_errors = Vec::new();

    for resource in resources {
        let Some(schema) = schemas.get(&resource.id.resource_type) else {
            all_errors.push(format!(
                "{}: unknown resource type '{}'",
                resource.id, resource.id.resource_type
            ));
            continue;
        };
        if let Err(errors) = schema.validate(&resource.attributes) {
            for error in errors {
                all_errors.push(format!("{}: {}", resource.id, error));
            }
        }
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors.join("\n"))
    }
}
