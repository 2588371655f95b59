//! Trust policy validation for task execution roles.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use crate::cloud::IdentityService;
use crate::error::{DeployError, DeployResult};
use crate::status::{StatusSink, PHASE};

/// Principal that must be trusted by every task execution role.
pub const TASK_EXECUTION_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";

/// Principal type for service principals.
pub const SERVICE_PRINCIPAL_TYPE: &str = "Service";

/// One principal allowed to assume a role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrustRelationship {
    /// Principal type: `Service`, `AWS`, `Federated`, ...
    pub kind: String,
    /// Principal identifier.
    pub value: String,
}

impl TrustRelationship {
    fn new(kind: &str, value: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// Read the trust relationships granted by a trust policy document.
///
/// The identity service hands documents out URL-encoded; raw JSON is accepted
/// too. Only `Allow` statements grant trust.
pub fn trusted_entities(document: &str) -> Result<BTreeSet<TrustRelationship>, String> {
    let trimmed = document.trim();
    let decoded = if trimmed.starts_with('{') {
        trimmed.to_owned()
    } else {
        urlencoding::decode(trimmed)
            .map_err(|e| format!("document is not valid URL-encoded UTF-8: {e}"))?
            .into_owned()
    };

    let policy: Value =
        serde_json::from_str(&decoded).map_err(|e| format!("document is not JSON: {e}"))?;

    let statements = match policy.get("Statement") {
        Some(Value::Array(statements)) => statements.iter().collect::<Vec<_>>(),
        Some(statement @ Value::Object(_)) => vec![statement],
        Some(_) => return Err("Statement must be an object or an array".to_owned()),
        None => Vec::new(),
    };

    let mut relationships = BTreeSet::new();
    for statement in statements {
        let allows = statement
            .get("Effect")
            .and_then(Value::as_str)
            .is_some_and(|effect| effect == "Allow");
        if !allows {
            continue;
        }

        match statement.get("Principal") {
            Some(Value::String(value)) => {
                relationships.insert(TrustRelationship::new("AWS", value));
            }
            Some(Value::Object(principals)) => {
                for (kind, values) in principals {
                    match values {
                        Value::String(value) => {
                            relationships.insert(TrustRelationship::new(kind, value));
                        }
                        Value::Array(values) => {
                            for value in values.iter().filter_map(Value::as_str) {
                                relationships.insert(TrustRelationship::new(kind, value));
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    Ok(relationships)
}

/// Check that `role_name` can be assumed by running tasks.
///
/// Performs a single read against the identity service.
pub async fn check_role_trust(
    identity: &dyn IdentityService,
    status: &dyn StatusSink,
    role_name: &str,
) -> DeployResult<()> {
    status.update(
        PHASE,
        &format!("Checking role trust relations for: {role_name}"),
    );

    let role = identity.get_role(role_name).await?;
    let relationships =
        trusted_entities(&role.assume_role_policy_document).map_err(|reason| {
            DeployError::TrustPolicy {
                role: role_name.to_owned(),
                reason,
            }
        })?;

    let trusted_services: BTreeSet<&str> = relationships
        .iter()
        .filter(|relationship| relationship.kind == SERVICE_PRINCIPAL_TYPE)
        .map(|relationship| relationship.value.as_str())
        .collect();

    debug!(role = %role_name, services = ?trusted_services, "role trust relations");

    if !trusted_services.contains(TASK_EXECUTION_PRINCIPAL) {
        return Err(DeployError::UntrustedRole {
            role: role_name.to_owned(),
            principal: TASK_EXECUTION_PRINCIPAL,
        });
    }

    Ok(())
}
