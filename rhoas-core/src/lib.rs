//! Rhoas Core
//!
//! Provider-neutral building blocks for managing cloud resources whose
//! lifecycle is asynchronous: resources and observed state, attribute schemas,
//! the provider seam, plans, and the status poller that waits for a remote
//! resource to settle.

pub mod cancel;
pub mod differ;
pub mod effect;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod wait;
