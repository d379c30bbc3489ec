//! Kafka instance status vocabulary

use std::fmt;

/// Status reported by the Kafka management API
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Accepted,
    Preparing,
    Provisioning,
    Ready,
    Failed,
    Deprovision,
    Deleting,
    Deleted,
    /// Local sentinel for an instance the API reports as absent
    NotFound,
    /// A status string outside the known vocabulary
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Accepted => "accepted",
            Status::Preparing => "preparing",
            Status::Provisioning => "provisioning",
            Status::Ready => "ready",
            Status::Failed => "failed",
            Status::Deprovision => "deprovision",
            Status::Deleting => "deleting",
            Status::Deleted => "deleted",
            Status::NotFound => "not-found",
            Status::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "accepted" => Status::Accepted,
            "preparing" => Status::Preparing,
            "provisioning" => Status::Provisioning,
            "ready" => Status::Ready,
            "failed" => Status::Failed,
            "deprovision" => Status::Deprovision,
            "deleting" => Status::Deleting,
            "deleted" => Status::Deleted,
            "not-found" => Status::NotFound,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
