//! ACL binding specifications
//!
//! Each element of the `acl` attribute describes one binding to create on a
//! Kafka instance once it is ready.

use crate::api::AclBinding;

pub const PRINCIPAL_FIELD: &str = "principal";
pub const RESOURCE_TYPE_FIELD: &str = "resource_type";
pub const RESOURCE_NAME_FIELD: &str = "resource_name";
pub const PATTERN_TYPE_FIELD: &str = "pattern_type";
pub const OPERATION_TYPE_FIELD: &str = "operation_type";
pub const PERMISSION_TYPE_FIELD: &str = "permission_type";

/// Fields every binding must carry
pub const FIELDS: [&str; 6] = [
    PRINCIPAL_FIELD,
    RESOURCE_TYPE_FIELD,
    RESOURCE_NAME_FIELD,
    PATTERN_TYPE_FIELD,
    OPERATION_TYPE_FIELD,
    PERMISSION_TYPE_FIELD,
];

/// The admin API expects principals as `User:<id>`; `User:*` matches everyone
pub const PRINCIPAL_PREFIX: &str = "User:";

/// One binding as written in configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclBindingSpec {
    pub principal: String,
    pub resource_type: String,
    pub resource_name: String,
    pub pattern_type: String,
    pub operation_type: String,
    pub permission_type: String,
}

impl AclBindingSpec {
    /// Request body for the admin API
    pub fn to_binding(&self) -> AclBinding {
        AclBinding {
            resource_type: self.resource_type.to_uppercase(),
            resource_name: self.resource_name.clone(),
            pattern_type: self.pattern_type.to_uppercase(),
            principal: format!("{}{}", PRINCIPAL_PREFIX, self.principal),
            operation: self.operation_type.to_uppercase(),
            permission: self.permission_type.to_uppercase(),
        }
    }
}
