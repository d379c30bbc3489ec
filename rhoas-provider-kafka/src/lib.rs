//! Rhoas Kafka Provider
//!
//! Manages Kafka instances and their ACL bindings through the Kafka
//! management API and the per-instance admin API.
//!
//! ## Module Structure
//!
//! - `api` - Wire types and the traits the remote APIs are consumed through
//! - `client` - `RhoasClient`, the HTTP implementation of those traits
//! - `auth` - Offline token exchange
//! - `config` - Provider configuration and timeouts
//! - `status` - Kafka instance status vocabulary
//! - `acl` - ACL binding specifications
//! - `mapper` - Translation between attributes and wire shapes
//! - `schemas` - Resource schemas
//! - `kafka` - Provisioning controller (create, read, delete)
//! - `provider` - `KafkaProvider` implementation of the Provider trait

pub mod acl;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod kafka;
pub mod mapper;
pub mod provider;
pub mod schemas;
pub mod status;

// Re-export main types
pub use client::RhoasClient;
pub use config::{ProviderConfig, Timeouts};
pub use kafka::KafkaController;
pub use provider::KafkaProvider;
pub use status::Status;
