//! Differ - Compare desired state with current state to generate a Plan
//!
//! Compares the resources declared in configuration with the state recorded
//! for them and produces the Effects needed to converge. Resources here have
//! no in-place update: a change to a `force_new` attribute replaces the
//! resource, other changes are ignored.

use std::collections::{HashMap, HashSet};

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Resource, ResourceId, State};
use crate::schema::ResourceSchema;

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists but a force-new attribute changed, or it is tainted
    Replace {
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
///
/// A `tainted` resource was left half-created by an earlier failure and is
/// always replaced.
pub fn diff(desired: &Resource, current: &State, schema: &ResourceSchema, tainted: bool) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let mut wanted = desired.attributes.clone();
    schema.apply_defaults(&mut wanted);

    let changed = find_changed_attributes(&wanted, current, schema);

    if tainted || !changed.is_empty() {
        Diff::Replace {
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    } else {
        Diff::NoChange(desired.id.clone())
    }
}

/// Force-new input attributes whose desired value differs from the current one
fn find_changed_attributes(
    wanted: &HashMap<String, crate::resource::Value>,
    current: &State,
    schema: &ResourceSchema,
) -> Vec<String> {
    let mut changed: Vec<String> = schema
        .attributes
        .values()
        .filter(|attr| attr.force_new && !attr.computed)
        .filter(|attr| wanted.get(&attr.name) != current.attributes.get(&attr.name))
        .map(|attr| attr.name.clone())
        .collect();
    changed.sort();
    changed
}

/// Compute Diff for multiple resources and generate a Plan
///
/// Resources present in `current_states` but no longer declared are deleted.
/// Resources whose type has no schema are skipped.
pub fn create_plan(
    desired: &[Resource],
    current_states: &HashMap<ResourceId, State>,
    schemas: &HashMap<String, ResourceSchema>,
    tainted: &HashSet<ResourceId>,
) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        let Some(schema) = schemas.get(&resource.id.resource_type) else {
            continue;
        };

        let current = current_states
            .get(&resource.id)
            .cloned()
            .unwrap_or_else(|| State::not_found(resource.id.clone()));

        match diff(resource, &current, schema, tainted.contains(&resource.id)) {
            Diff::Create(r) => plan.add(Effect::Create(r)),
            Diff::Replace {
                from,
                to,
                changed_attributes,
            } => plan.add(Effect::Replace {
                from,
                to,
                changed_attributes,
            }),
            Diff::NoChange(_) => {}
        }
    }

    let declared: HashSet<&ResourceId> = desired.iter().map(|r| &r.id).collect();
    let mut orphans: Vec<&State> = current_states
        .values()
        .filter(|s| !declared.contains(&s.id))
        .collect();
    orphans.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));

    for state in orphans {
        if let Some(identifier) = &state.identifier {
            plan.add(Effect::Delete {
                id: state.id.clone(),
                identifier: identifier.clone(),
            });
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Value;
    use crate::schema::{AttributeSchema, AttributeType};

    fn schema() -> ResourceSchema {
        ResourceSchema::new("kafka")
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .force_new(),
            )
            .attribute(
                AttributeSchema::new("region", AttributeType::String)
                    .with_default(Value::String("us-east-1".to_string()))
                    .force_new(),
            )
            .attribute(AttributeSchema::new("status", AttributeType::String).computed())
    }

    fn existing(name: &str, region: &str) -> State {
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String(name.to_string()));
        attrs.insert("region".to_string(), Value::String(region.to_string()));
        attrs.insert("status".to_string(), Value::String("ready".to_string()));
        State::existing(ResourceId::new("kafka", "events"), attrs).with_identifier("id-1")
    }

    #[test]
    fn diff_create_when_not_exists() {
        let desired = Resource::new("kafka", "events");
        let current = State::not_found(ResourceId::new("kafka", "events"));

        let result = diff(&desired, &current, &schema(), false);
        assert!(matches!(result, Diff::Create(_)));
    }

    #[test]
    fn diff_no_change_when_defaults_match() {
        let desired = Resource::new("kafka", "events")
            .with_attribute("name", Value::String("events".to_string()));

        let result = diff(&desired, &existing("events", "us-east-1"), &schema(), false);
        assert!(matches!(result, Diff::NoChange(_)));
        assert!(!result.is_change());
    }

    #[test]
    fn diff_replace_when_force_new_changes() {
        let desired = Resource::new("kafka", "events")
            .with_attribute("name", Value::String("events".to_string()))
            .with_attribute("region", Value::String("eu-west-1".to_string()));

        match diff(&desired, &existing("events", "us-east-1"), &schema(), false) {
            Diff::Replace {
                changed_attributes, ..
            } => assert_eq!(changed_attributes, vec!["region".to_string()]),
            other => panic!("Expected Replace, got {:?}", other),
        }
    }

    #[test]
    fn diff_replace_when_tainted() {
        let desired = Resource::new("kafka", "events")
            .with_attribute("name", Value::String("events".to_string()));

        match diff(&desired, &existing("events", "us-east-1"), &schema(), true) {
            Diff::Replace {
                changed_attributes, ..
            } => assert!(changed_attributes.is_empty()),
            other => panic!("Expected Replace, got {:?}", other),
        }
    }

    #[test]
    fn create_plan_creates_replaces_and_deletes() {
        let resources = vec![
            Resource::new("kafka", "new").with_attribute("name", Value::String("new".into())),
            Resource::new("kafka", "events")
                .with_attribute("name", Value::String("renamed".into())),
        ];

        let mut current_states = HashMap::new();
        current_states.insert(
            ResourceId::new("kafka", "events"),
            existing("events", "us-east-1"),
        );
        let orphan_id = ResourceId::new("kafka", "old");
        current_states.insert(
            orphan_id.clone(),
            State::existing(orphan_id.clone(), HashMap::new()).with_identifier("id-old"),
        );

        let mut schemas = HashMap::new();
        schemas.insert("kafka".to_string(), schema());

        let plan = create_plan(&resources, &current_states, &schemas, &HashSet::new());

        assert_eq!(plan.effects().len(), 3);
        assert!(matches!(plan.effects()[0], Effect::Create(_)));
        assert!(matches!(plan.effects()[1], Effect::Replace { .. }));
        assert!(matches!(
            &plan.effects()[2],
            Effect::Delete { id, identifier } if *id == orphan_id && identifier == "id-old"
        ));
    }
}
