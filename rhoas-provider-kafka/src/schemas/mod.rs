//! Resource schema definitions

pub mod kafka;
pub mod types;

use rhoas_core::schema::ResourceSchema;

/// Returns all schemas of this provider
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![kafka::kafka_schema()]
}
