//! Common test utilities for provisioning integration tests.

pub mod fixtures;

use std::sync::Arc;

use stratus_deploy::{
    AccountCredentials, AssumeRoleCredentials, CloudClients, CreateServiceOperation,
    DeployConfig, MemoryCloud, RecordingStatus,
};

/// Trust policy allowing running tasks to assume the role.
pub const TASK_TRUST_POLICY: &str = r#"{
    "Version": "2012-10-17",
    "Statement": [{
        "Effect": "Allow",
        "Principal": { "Service": "ecs-tasks.amazonaws.com" },
        "Action": "sts:AssumeRole"
    }]
}"#;

/// Complete provisioning setup wired to one in-memory cloud.
pub struct TestDeployer {
    pub cloud: Arc<MemoryCloud>,
    pub status: Arc<RecordingStatus>,
    pub operation: CreateServiceOperation,
}

impl TestDeployer {
    /// Creates a deployer with default configuration and assume-role credentials.
    pub fn new() -> Self {
        Self::with_cloud(MemoryCloud::new(), DeployConfig::default())
    }

    /// Creates a deployer over a prepared cloud.
    pub fn with_cloud(cloud: MemoryCloud, config: DeployConfig) -> Self {
        Self::with_credentials(cloud, config, deploy_credentials())
    }

    /// Creates a deployer acting with the given credentials.
    pub fn with_credentials(
        cloud: MemoryCloud,
        config: DeployConfig,
        credentials: Arc<dyn AccountCredentials>,
    ) -> Self {
        let cloud = Arc::new(cloud);
        let status = Arc::new(RecordingStatus::new());
        let clients = CloudClients::from_memory(cloud.clone()).with_status(status.clone());

        Self {
            cloud,
            status,
            operation: CreateServiceOperation::new(clients, credentials, config),
        }
    }
}

/// Credentials of the deployment account.
pub fn deploy_credentials() -> Arc<dyn AccountCredentials> {
    Arc::new(AssumeRoleCredentials {
        account_id: "123456789012".to_owned(),
        assume_role: "role/ecsDeploy".to_owned(),
        session_name: Some("stratus".to_owned()),
    })
}
