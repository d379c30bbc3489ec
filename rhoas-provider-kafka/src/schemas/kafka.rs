//! Kafka instance schema definition

use rhoas_core::resource::Value;
use rhoas_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::types;

pub const RESOURCE_TYPE: &str = "kafka";

pub const CLOUD_PROVIDER_FIELD: &str = "cloud_provider";
pub const REGION_FIELD: &str = "region";
pub const NAME_FIELD: &str = "name";
pub const HREF_FIELD: &str = "href";
pub const STATUS_FIELD: &str = "status";
pub const OWNER_FIELD: &str = "owner";
pub const BOOTSTRAP_SERVER_HOST_FIELD: &str = "bootstrap_server_host";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";
pub const ID_FIELD: &str = "id";
pub const KIND_FIELD: &str = "kind";
pub const VERSION_FIELD: &str = "version";
pub const ACL_FIELD: &str = "acl";

pub const DEFAULT_CLOUD_PROVIDER: &str = "aws";
pub const DEFAULT_REGION: &str = "us-east-1";

fn computed(name: &str, description: &str) -> AttributeSchema {
    AttributeSchema::new(name, AttributeType::String)
        .computed()
        .with_description(description)
}

/// Returns the schema for Kafka instances
pub fn kafka_schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("A managed Kafka instance")
        .attribute(
            AttributeSchema::new(NAME_FIELD, types::kafka_name())
                .required()
                .force_new()
                .with_description("The name of the Kafka instance"),
        )
        .attribute(
            AttributeSchema::new(CLOUD_PROVIDER_FIELD, AttributeType::String)
                .with_default(Value::String(DEFAULT_CLOUD_PROVIDER.to_string()))
                .force_new()
                .with_description("The cloud provider hosting the instance"),
        )
        .attribute(
            AttributeSchema::new(REGION_FIELD, AttributeType::String)
                .with_default(Value::String(DEFAULT_REGION.to_string()))
                .force_new()
                .with_description("The cloud region hosting the instance"),
        )
        .attribute(
            AttributeSchema::new(ACL_FIELD, types::acl_list())
                .force_new()
                .with_description("ACL bindings created once the instance is ready"),
        )
        .attribute(computed(HREF_FIELD, "The API path of the instance"))
        .attribute(computed(STATUS_FIELD, "The status of the instance"))
        .attribute(computed(OWNER_FIELD, "The account that owns the instance"))
        .attribute(computed(
            BOOTSTRAP_SERVER_HOST_FIELD,
            "The bootstrap server host clients connect to",
        ))
        .attribute(computed(CREATED_AT_FIELD, "Creation time (RFC3339)"))
        .attribute(computed(UPDATED_AT_FIELD, "Last update time (RFC3339)"))
        .attribute(computed(ID_FIELD, "The identifier of the instance"))
        .attribute(computed(KIND_FIELD, "The kind of the resource"))
        .attribute(computed(VERSION_FIELD, "The Kafka version of the instance"))
}
