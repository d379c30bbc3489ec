//! Rhoas State Management
//!
//! Persists the identifiers and attributes of managed resources between runs.
//! A record whose create failed after the remote side assigned an identifier
//! is kept as *tainted*, so a later run can destroy or replace it.
//!
//! # Overview
//!
//! - **StateFile**: all managed resources plus lineage and serial
//! - **StateBackend**: storage abstraction with locking
//! - **LocalBackend**: JSON file with a sibling `.lock` file
//! - **LockInfo**: who holds the lock and until when
//!
//! # Example
//!
//! ```ignore
//! use rhoas_state::{create_backend, BackendConfig};
//!
//! let backend = create_backend(&BackendConfig::default())?;
//! let lock = backend.acquire_lock("apply").await?;
//! let mut state = backend.read_state().await?.unwrap_or_default();
//! // ... record created resources ...
//! state.increment_serial();
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::{LocalBackend, create_backend};
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
