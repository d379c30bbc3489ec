//! `Provider` implementation for Kafka instances

use std::sync::Arc;

use rhoas_core::cancel::Cancellation;
use rhoas_core::provider::{
    BoxFuture, Provider, ProviderError, ProviderErrorKind, ProviderResult, ResourceType,
};
use rhoas_core::resource::{Resource, ResourceId, State};
use rhoas_core::schema::ResourceSchema;

use crate::api::{KafkaAdminApi, KafkaMgmtApi};
use crate::client::RhoasClient;
use crate::config::{ProviderConfig, Timeouts};
use crate::kafka::KafkaController;
use crate::mapper;
use crate::schemas::kafka::{ACL_FIELD, RESOURCE_TYPE, kafka_schema};

/// Kafka instance resource type
pub struct KafkaType;

impl ResourceType for KafkaType {
    fn name(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn schema(&self) -> ResourceSchema {
        kafka_schema()
    }
}

pub struct KafkaProvider {
    controller: KafkaController,
}

impl KafkaProvider {
    pub fn new(
        mgmt: Arc<dyn KafkaMgmtApi>,
        admin: Arc<dyn KafkaAdminApi>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            controller: KafkaController::new(mgmt, admin, timeouts),
        }
    }

    /// Build a provider talking HTTP to the configured endpoints
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = RhoasClient::from_config(config).map_err(|e| {
            ProviderError::new(format!("failed to configure API client: {}", e)).with_cause(e)
        })?;
        let client = Arc::new(client);
        Ok(Self::new(client.clone(), client, config.timeouts()))
    }

    pub fn with_cancellation(self, cancellation: Cancellation) -> Self {
        Self {
            controller: self.controller.with_cancellation(cancellation),
        }
    }

    fn check_type(id: &ResourceId) -> ProviderResult<()> {
        if id.resource_type == RESOURCE_TYPE {
            Ok(())
        } else {
            Err(
                ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
                    .for_resource(id.clone()),
            )
        }
    }

    async fn create_kafka(&self, resource: Resource) -> ProviderResult<State> {
        let id = resource.id.clone();
        Self::check_type(&id)?;

        kafka_schema().validate(&resource.attributes).map_err(|errors| {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            ProviderError::new(message)
                .with_kind(ProviderErrorKind::Validation)
                .for_resource(id.clone())
        })?;

        let payload = mapper::payload_from_attributes(&resource.attributes)
            .map_err(|e| e.for_resource(id.clone()))?;
        let acls = mapper::acl_specs_from_attributes(&resource.attributes)
            .map_err(|e| e.for_resource(id.clone()))?;

        let kafka = self
            .controller
            .create(&payload, &acls)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;

        // ACLs are never read back; keep the declared bindings in state
        let mut attributes = mapper::attributes_from_kafka(&kafka);
        if let Some(acl) = resource.attributes.get(ACL_FIELD) {
            attributes.insert(ACL_FIELD.to_string(), acl.clone());
        }

        Ok(State::existing(id, attributes).with_identifier(kafka.id))
    }

    async fn read_kafka(&self, id: ResourceId, identifier: String) -> ProviderResult<State> {
        Self::check_type(&id)?;
        let kafka = self
            .controller
            .read(&identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;

        Ok(State::existing(id, mapper::attributes_from_kafka(&kafka)).with_identifier(identifier))
    }

    async fn delete_kafka(&self, id: ResourceId, identifier: String) -> ProviderResult<()> {
        Self::check_type(&id)?;
        self.controller
            .delete(&identifier)
            .await
            .map_err(|e| e.for_resource(id))
    }
}

impl Provider for KafkaProvider {
    fn name(&self) -> &'static str {
        "rhoas"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        vec![Box::new(KafkaType)]
    }

    fn read(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.read_kafka(id, identifier).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_kafka(resource).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_kafka(id, identifier).await })
    }
}
