//! Translation between resource attributes and Kafka API shapes
//!
//! Every function here is pure. Failures are validation errors naming the
//! offending field.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rhoas_core::provider::{ProviderError, ProviderResult};
use rhoas_core::resource::{State, Value};

use crate::acl::{self, AclBindingSpec};
use crate::api::{KafkaRequest, KafkaRequestPayload};
use crate::schemas::kafka::{
    ACL_FIELD, BOOTSTRAP_SERVER_HOST_FIELD, CLOUD_PROVIDER_FIELD, CREATED_AT_FIELD,
    DEFAULT_CLOUD_PROVIDER, DEFAULT_REGION, HREF_FIELD, ID_FIELD, KIND_FIELD, NAME_FIELD,
    OWNER_FIELD, REGION_FIELD, STATUS_FIELD, UPDATED_AT_FIELD, VERSION_FIELD,
};

/// Read an optional string attribute, rejecting other value types
fn optional_string<'a>(
    attributes: &'a HashMap<String, Value>,
    field: &str,
) -> ProviderResult<Option<&'a str>> {
    match attributes.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ProviderError::validation(field, "expected a string")),
    }
}

/// Build the create payload from desired attributes
///
/// Only `name`, `cloud_provider` and `region` are inputs; everything else is
/// assigned by the API and ignored here.
pub fn payload_from_attributes(
    attributes: &HashMap<String, Value>,
) -> ProviderResult<KafkaRequestPayload> {
    let name = optional_string(attributes, NAME_FIELD)?
        .ok_or_else(|| ProviderError::validation(NAME_FIELD, "required attribute is missing"))?;
    if name.is_empty() {
        return Err(ProviderError::validation(NAME_FIELD, "must not be empty"));
    }

    let cloud_provider =
        optional_string(attributes, CLOUD_PROVIDER_FIELD)?.unwrap_or(DEFAULT_CLOUD_PROVIDER);
    let region = optional_string(attributes, REGION_FIELD)?.unwrap_or(DEFAULT_REGION);

    Ok(KafkaRequestPayload {
        name: name.to_string(),
        cloud_provider: cloud_provider.to_string(),
        region: region.to_string(),
    })
}

/// Rebuild the create payload from a hydrated state
pub fn payload_from_state(state: &State) -> ProviderResult<KafkaRequestPayload> {
    payload_from_attributes(&state.attributes)
}

/// Extract the ACL binding specifications, in declaration order
pub fn acl_specs_from_attributes(
    attributes: &HashMap<String, Value>,
) -> ProviderResult<Vec<AclBindingSpec>> {
    let entries = match attributes.get(ACL_FIELD) {
        None => return Ok(Vec::new()),
        Some(Value::List(entries)) => entries,
        Some(_) => {
            return Err(ProviderError::validation(
                ACL_FIELD,
                "expected a list of bindings",
            ));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Map(fields) = entry else {
                return Err(ProviderError::validation(
                    &format!("{}[{}]", ACL_FIELD, index),
                    "unable to retrieve ACL contents, expected a map",
                ));
            };

            let mut unknown: Vec<&String> = fields
                .keys()
                .filter(|key| !acl::FIELDS.contains(&key.as_str()))
                .collect();
            unknown.sort();
            if let Some(key) = unknown.first() {
                return Err(ProviderError::validation(
                    &format!("{}[{}].{}", ACL_FIELD, index, key),
                    "unknown ACL field",
                ));
            }

            let field = |name: &str| -> ProviderResult<String> {
                match fields.get(name) {
                    Some(Value::String(s)) => Ok(s.clone()),
                    Some(_) => Err(ProviderError::validation(
                        &format!("{}[{}].{}", ACL_FIELD, index, name),
                        "expected a string",
                    )),
                    None => Err(ProviderError::validation(
                        &format!("{}[{}].{}", ACL_FIELD, index, name),
                        "no value given",
                    )),
                }
            };

            Ok(AclBindingSpec {
                principal: field(acl::PRINCIPAL_FIELD)?,
                resource_type: field(acl::RESOURCE_TYPE_FIELD)?,
                resource_name: field(acl::RESOURCE_NAME_FIELD)?,
                pattern_type: field(acl::PATTERN_TYPE_FIELD)?,
                operation_type: field(acl::OPERATION_TYPE_FIELD)?,
                permission_type: field(acl::PERMISSION_TYPE_FIELD)?,
            })
        })
        .collect()
}

fn rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Hydrate resource attributes from an API response
pub fn attributes_from_kafka(kafka: &KafkaRequest) -> HashMap<String, Value> {
    let mut attributes = HashMap::new();
    let mut set = |field: &str, value: Option<String>| {
        if let Some(v) = value {
            attributes.insert(field.to_string(), Value::String(v));
        }
    };

    set(CLOUD_PROVIDER_FIELD, kafka.cloud_provider.clone());
    set(REGION_FIELD, kafka.region.clone());
    set(NAME_FIELD, kafka.name.clone());
    set(HREF_FIELD, Some(kafka.href.clone()));
    set(STATUS_FIELD, kafka.status.clone());
    set(OWNER_FIELD, kafka.owner.clone());
    set(
        BOOTSTRAP_SERVER_HOST_FIELD,
        kafka.bootstrap_server_host.clone(),
    );
    set(CREATED_AT_FIELD, kafka.created_at.as_ref().map(rfc3339));
    set(UPDATED_AT_FIELD, kafka.updated_at.as_ref().map(rfc3339));
    set(ID_FIELD, Some(kafka.id.clone()));
    set(KIND_FIELD, Some(kafka.kind.clone()));
    set(VERSION_FIELD, kafka.version.clone());

    attributes
}
