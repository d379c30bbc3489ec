//! Persisted state of managed resources

use std::collections::HashMap;

use log::warn;
use rhoas_core::resource::{ResourceId, State, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// Format version of this file
    pub version: u32,
    /// Incremented on every write
    pub serial: u64,
    /// Identifies one history of this file; writes across lineages are refused
    pub lineage: String,
    pub rhoas_version: String,
    pub resources: Vec<ResourceState>,
}

impl StateFile {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            serial: 0,
            lineage: uuid::Uuid::new_v4().to_string(),
            rhoas_version: env!("CARGO_PKG_VERSION").to_string(),
            resources: Vec::new(),
        }
    }

    pub fn increment_serial(&mut self) {
        self.serial += 1;
        self.rhoas_version = env!("CARGO_PKG_VERSION").to_string();
    }

    pub fn find(&self, id: &ResourceId) -> Option<&ResourceState> {
        self.resources.iter().find(|r| r.matches(id))
    }

    /// Insert or replace the record for the same resource
    pub fn upsert(&mut self, record: ResourceState) {
        match self
            .resources
            .iter_mut()
            .find(|r| r.resource_type == record.resource_type && r.name == record.name)
        {
            Some(existing) => *existing = record,
            None => self.resources.push(record),
        }
    }

    pub fn remove(&mut self, id: &ResourceId) -> Option<ResourceState> {
        let pos = self.resources.iter().position(|r| r.matches(id))?;
        Some(self.resources.remove(pos))
    }

    /// Current states keyed by resource, as the planner consumes them
    pub fn current_states(&self) -> HashMap<ResourceId, State> {
        self.resources
            .iter()
            .map(|r| (r.id(), r.to_state()))
            .collect()
    }

    pub fn tainted(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.resources.iter().filter(|r| r.tainted).map(|r| r.id())
    }
}

impl Default for StateFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Record of one managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub resource_type: String,
    pub name: String,
    /// Remote identifier; absent only for records written by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    /// The create that produced this record did not complete
    #[serde(default)]
    pub tainted: bool,
}

impl ResourceState {
    pub fn from_state(state: &State) -> Self {
        Self {
            resource_type: state.id.resource_type.clone(),
            name: state.id.name.clone(),
            identifier: state.identifier.clone(),
            attributes: state
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
            tainted: false,
        }
    }

    /// A record for a resource whose create failed after it got `identifier`
    pub fn tainted(id: &ResourceId, identifier: impl Into<String>) -> Self {
        Self {
            resource_type: id.resource_type.clone(),
            name: id.name.clone(),
            identifier: Some(identifier.into()),
            attributes: HashMap::new(),
            tainted: true,
        }
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::new(&self.resource_type, &self.name)
    }

    fn matches(&self, id: &ResourceId) -> bool {
        self.resource_type == id.resource_type && self.name == id.name
    }

    pub fn to_state(&self) -> State {
        let attributes: HashMap<String, Value> = self
            .attributes
            .iter()
            .filter_map(|(k, v)| match Value::from_json(v) {
                Ok(value) => value.map(|v| (k.clone(), v)),
                Err(e) => {
                    warn!("dropping stored attribute {} of {}: {}", k, self.id(), e);
                    None
                }
            })
            .collect();
        let state = State::existing(self.id(), attributes);
        match &self.identifier {
            Some(identifier) => state.with_identifier(identifier),
            None => state,
        }
    }
}
