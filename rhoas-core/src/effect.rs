//! Effect - A single side effect against the remote system
//!
//! Effects are plain values; nothing happens until the CLI executes them
//! through a Provider.

use crate::resource::{Resource, ResourceId, State};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create a new resource and wait until it is usable
    Create(Resource),
    /// Destroy the existing resource, then create it again
    Replace {
        from: State,
        to: Resource,
        /// Attributes whose change forced the replacement
        changed_attributes: Vec<String>,
    },
    /// Destroy a resource that is no longer declared
    Delete { id: ResourceId, identifier: String },
}

impl Effect {
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Create(r) => &r.id,
            Effect::Replace { to, .. } => &to.id,
            Effect::Delete { id, .. } => id,
        }
    }

    /// Whether executing this effect destroys a remote resource
    pub fn is_destructive(&self) -> bool {
        matches!(self, Effect::Replace { .. } | Effect::Delete { .. })
    }
}
