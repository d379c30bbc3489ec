//! Executes plans and refreshes against a Provider, persisting state after
//! every step

use colored::Colorize;
use log::warn;
use rhoas_core::cancel::Cancellation;
use rhoas_core::effect::Effect;
use rhoas_core::plan::Plan;
use rhoas_core::provider::{Provider, ProviderError, ProviderErrorKind};
use rhoas_core::resource::{Resource, ResourceId};
use rhoas_provider_kafka::schemas::kafka::ACL_FIELD;
use rhoas_state::{ResourceState, StateBackend, StateFile};

use crate::display::format_effect;

/// Counts of an apply or destroy run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub succeeded: usize,
    pub failed: usize,
    /// The run stopped early because it was interrupted
    pub cancelled: bool,
}

impl Outcome {
    fn record(&mut self, label: &str, result: Result<(), ProviderError>) {
        match result {
            Ok(()) => {
                println!("  {} {}", "✓".green(), label);
                self.succeeded += 1;
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), label, e);
                self.failed += 1;
                if e.kind == ProviderErrorKind::Cancelled {
                    self.cancelled = true;
                }
            }
        }
    }
}

async fn persist(backend: &dyn StateBackend, state: &mut StateFile) -> Result<(), String> {
    state.increment_serial();
    backend
        .write_state(state)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))
}

/// Create `resource`, recording the result in `state`
///
/// A create that fails after the remote side assigned an identifier leaves a
/// tainted record behind so the next run can clean it up.
async fn create(
    provider: &dyn Provider,
    state: &mut StateFile,
    resource: &Resource,
) -> Result<(), ProviderError> {
    match provider.create(resource).await {
        Ok(created) => {
            state.upsert(ResourceState::from_state(&created));
            Ok(())
        }
        Err(e) => {
            if let Some(identifier) = &e.identifier {
                warn!("{} left behind as {}, marking tainted", resource.id, identifier);
                state.upsert(ResourceState::tainted(&resource.id, identifier));
            }
            Err(e)
        }
    }
}

async fn delete(
    provider: &dyn Provider,
    state: &mut StateFile,
    id: &ResourceId,
    identifier: &str,
) -> Result<(), ProviderError> {
    provider.delete(id, identifier).await?;
    state.remove(id);
    Ok(())
}

/// Execute every effect of `plan` in order, stopping once `cancellation`
/// fires
pub async fn apply_plan(
    provider: &dyn Provider,
    backend: &dyn StateBackend,
    state: &mut StateFile,
    plan: &Plan,
    cancellation: &Cancellation,
) -> Result<Outcome, String> {
    let mut outcome = Outcome::default();

    for effect in plan.effects() {
        outcome.cancelled |= cancellation.is_cancelled();
        if outcome.cancelled {
            break;
        }
        let label = format_effect(effect);

        let result = match effect {
            Effect::Create(resource) => create(provider, state, resource).await,
            Effect::Replace { from, to, .. } => {
                let deleted = match &from.identifier {
                    Some(identifier) => delete(provider, state, &from.id, identifier).await,
                    None => {
                        state.remove(&from.id);
                        Ok(())
                    }
                };
                match deleted {
                    Ok(()) => create(provider, state, to).await,
                    Err(e) => Err(e),
                }
            }
            Effect::Delete { id, identifier } => delete(provider, state, id, identifier).await,
        };

        outcome.record(&label, result);
        persist(backend, state).await?;
    }

    Ok(outcome)
}

/// Delete the recorded resources `ids`, last declared first
pub async fn destroy(
    provider: &dyn Provider,
    backend: &dyn StateBackend,
    state: &mut StateFile,
    ids: &[ResourceId],
    cancellation: &Cancellation,
) -> Result<Outcome, String> {
    let mut outcome = Outcome::default();

    for id in ids.iter().rev() {
        outcome.cancelled |= cancellation.is_cancelled();
        if outcome.cancelled {
            break;
        }
        let Some(record) = state.find(id).cloned() else {
            continue;
        };
        let label = format!("Delete {}", id);

        let result = match &record.identifier {
            Some(identifier) => delete(provider, state, id, identifier).await,
            None => {
                state.remove(id);
                Ok(())
            }
        };

        outcome.record(&label, result);
        persist(backend, state).await?;
    }

    Ok(outcome)
}

/// Result of a refresh
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Refreshed {
    pub updated: usize,
    /// Records dropped because the remote resource no longer exists
    pub removed: usize,
}

/// Re-read every recorded resource from the remote system
///
/// Records whose resource is gone are removed. Declared ACL bindings are not
/// readable remotely and are carried over from the previous record.
pub async fn refresh(
    provider: &dyn Provider,
    backend: &dyn StateBackend,
    state: &mut StateFile,
) -> Result<Refreshed, String> {
    let mut refreshed = Refreshed::default();
    let records = state.resources.clone();

    for record in records {
        let id = record.id();
        let Some(identifier) = &record.identifier else {
            continue;
        };

        match provider.read(&id, identifier).await {
            Ok(current) => {
                let mut updated = ResourceState::from_state(&current);
                updated.tainted = record.tainted;
                if let Some(acl) = record.attributes.get(ACL_FIELD) {
                    updated
                        .attributes
                        .insert(ACL_FIELD.to_string(), acl.clone());
                }
                state.upsert(updated);
                refreshed.updated += 1;
                println!("  {} {}", "✓".green(), id);
            }
            Err(e) if e.is_not_found() => {
                warn!("{} ({}) no longer exists, removing it from state", id, identifier);
                state.remove(&id);
                refreshed.removed += 1;
                println!("  {} {} (gone)", "-".red(), id);
            }
            Err(e) => return Err(format!("Failed to refresh {}: {}", id, e)),
        }
    }

    persist(backend, state).await?;
    Ok(refreshed)
}
