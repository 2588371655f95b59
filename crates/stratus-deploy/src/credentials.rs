//! Credentials of the account performing the deployment.
//!
//! Only credentials obtained by assuming a role can name the role the
//! container service and the autoscaling controller act under. Each kind
//! reports that through [`AccountCredentials::assumed_role_name`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Capability view of the invoking credentials.
pub trait AccountCredentials: fmt::Debug + Send + Sync {
    /// Account the credentials belong to.
    fn account_id(&self) -> &str;

    /// Short name of the credential kind, used in error messages.
    fn kind(&self) -> &'static str;

    /// Role assumed by these credentials, e.g. `role/DeployRole`.
    fn assumed_role_name(&self) -> Option<&str> {
        None
    }
}

/// Credentials obtained by assuming a role directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssumeRoleCredentials {
    /// Account identifier.
    pub account_id: String,
    /// Assumed role.
    pub assume_role: String,
    /// Session name used when assuming the role.
    #[serde(default)]
    pub session_name: Option<String>,
}

impl AccountCredentials for AssumeRoleCredentials {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn kind(&self) -> &'static str {
        "assume_role"
    }

    fn assumed_role_name(&self) -> Option<&str> {
        Some(&self.assume_role)
    }
}

/// Credentials obtained by assuming a role through a federation broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedAssumeRoleCredentials {
    /// Account identifier.
    pub account_id: String,
    /// Assumed role.
    pub assume_role: String,
    /// Broker endpoint that vends the session.
    #[serde(default)]
    pub broker_url: Option<String>,
}

impl AccountCredentials for FederatedAssumeRoleCredentials {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn kind(&self) -> &'static str {
        "federated_assume_role"
    }

    fn assumed_role_name(&self) -> Option<&str> {
        Some(&self.assume_role)
    }
}

/// Assume-role credentials scoped to the container service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerServiceAssumeRoleCredentials {
    /// Account identifier.
    pub account_id: String,
    /// Assumed role.
    pub assume_role: String,
}

impl AccountCredentials for ContainerServiceAssumeRoleCredentials {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn kind(&self) -> &'static str {
        "container_service_assume_role"
    }

    fn assumed_role_name(&self) -> Option<&str> {
        Some(&self.assume_role)
    }
}

/// Long-lived access keys. They do not assume a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCredentials {
    /// Account identifier.
    pub account_id: String,
}

impl AccountCredentials for StaticCredentials {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}

/// Credentials as written in a configuration or sandbox file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialSource {
    /// See [`AssumeRoleCredentials`].
    AssumeRole(AssumeRoleCredentials),
    /// See [`FederatedAssumeRoleCredentials`].
    FederatedAssumeRole(FederatedAssumeRoleCredentials),
    /// See [`ContainerServiceAssumeRoleCredentials`].
    ContainerServiceAssumeRole(ContainerServiceAssumeRoleCredentials),
    /// See [`StaticCredentials`].
    Static(StaticCredentials),
}

impl CredentialSource {
    /// Turn the description into a credentials object.
    #[must_use]
    pub fn into_credentials(self) -> Arc<dyn AccountCredentials> {
        match self {
            Self::AssumeRole(c) => Arc::new(c),
            Self::FederatedAssumeRole(c) => Arc::new(c),
            Self::ContainerServiceAssumeRole(c) => Arc::new(c),
            Self::Static(c) => Arc::new(c),
        }
    }
}

/// Role ARN the container service and autoscaling controller act under.
///
/// Fails for credentials that did not assume a role.
pub fn assumed_role_arn(
    credentials: &dyn AccountCredentials,
    partition: &str,
) -> DeployResult<String> {
    let role = credentials
        .assumed_role_name()
        .ok_or_else(|| DeployError::UnsupportedCredentials(credentials.kind().to_owned()))?;

    Ok(format!(
        "arn:{partition}:iam::{}:{role}",
        credentials.account_id()
    ))
}
