//! The provisioning operation.

use std::sync::Arc;

use tracing::{error, info};

use crate::autoscaling::register_autoscaling;
use crate::cloud::CloudClients;
use crate::config::DeployConfig;
use crate::credentials::{assumed_role_arn, AccountCredentials};
use crate::error::DeployResult;
use crate::result::{deployment_region, deployment_result};
use crate::service::create_service;
use crate::status::PHASE;
use crate::task_definition::register_task_definition;
use crate::types::{DeploymentResult, RevisionVersion, ServiceSpec};
use crate::validation::validate;
use crate::version::resolve_next_version;

/// Provisions one new revision of a service.
///
/// Stages run strictly in order and each waits for the previous one:
///
/// 1. Validate the spec
/// 2. Resolve the next revision of the family
/// 3. Register the task definition (checking the execution role's trust)
/// 4. Create the service behind its load balancer binding
/// 5. Register the scalable target and associate alarms
/// 6. Assemble the result
///
/// A failing stage aborts the rest. Resources created by earlier stages are
/// left in place; nothing is rolled back.
pub struct CreateServiceOperation {
    clients: CloudClients,
    credentials: Arc<dyn AccountCredentials>,
    config: DeployConfig,
}

impl CreateServiceOperation {
    /// Create an operation acting with `credentials` through `clients`.
    pub fn new(
        clients: CloudClients,
        credentials: Arc<dyn AccountCredentials>,
        config: DeployConfig,
    ) -> Self {
        Self {
            clients,
            credentials,
            config,
        }
    }

    /// Revision the next call to [`operate`](Self::operate) would create.
    ///
    /// Reads the live service list only; calling it never reserves a revision.
    pub async fn next_version(&self, spec: &ServiceSpec) -> DeployResult<RevisionVersion> {
        resolve_next_version(
            self.clients.containers.as_ref(),
            &spec.ecs_cluster_name,
            &spec.family_name(),
            self.config.versioning.family_match,
        )
        .await
    }

    /// Provision the service described by `spec`.
    pub async fn operate(&self, spec: &ServiceSpec) -> DeployResult<DeploymentResult> {
        let family = spec.family_name();

        info!(
            family = %family,
            cluster = %spec.ecs_cluster_name,
            account = %spec.credential_account,
            "starting service provisioning"
        );

        match self.execute(spec).await {
            Ok(result) => {
                info!(
                    family = %family,
                    server_groups = ?result.server_group_names,
                    "service provisioning completed"
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    family = %family,
                    error = %e,
                    configuration = e.is_configuration(),
                    "service provisioning failed"
                );
                Err(e)
            }
        }
    }

    async fn execute(&self, spec: &ServiceSpec) -> DeployResult<DeploymentResult> {
        let status = self.clients.status.as_ref();
        status.update(
            PHASE,
            "Initializing Create Amazon ECS Server Group Operation...",
        );

        validate(spec)?;
        let region = deployment_region(spec)?;
        let family = spec.family_name();

        let version = self.next_version(spec).await?;
        info!(family = %family, version = %version, "resolved next version");

        status.update(PHASE, "Creating Amazon ECS Task Definition...");
        let task_definition = register_task_definition(&self.clients, spec, &family, version).await?;
        status.update(PHASE, "Done creating Amazon ECS Task Definition...");

        let role_arn = assumed_role_arn(self.credentials.as_ref(), &self.config.identity.partition)?;

        let service = create_service(
            &self.clients,
            spec,
            &family,
            version,
            &task_definition,
            &role_arn,
        )
        .await?;

        register_autoscaling(&self.clients, spec, &region, &service, &role_arn).await?;

        Ok(deployment_result(&region, &service))
    }
}

impl std::fmt::Debug for CreateServiceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateServiceOperation")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cloud::MemoryCloud;
    use crate::credentials::{AssumeRoleCredentials, StaticCredentials};
    use crate::error::DeployError;
    use crate::status::RecordingStatus;
    use crate::test_support::orders_spec;

    fn deploy_credentials() -> Arc<dyn AccountCredentials> {
        Arc::new(AssumeRoleCredentials {
            account_id: "123456789012".to_owned(),
            assume_role: "role/ecsDeploy".to_owned(),
            session_name: None,
        })
    }

    #[tokio::test]
    async fn runs_stages_in_order() {
        let cloud = Arc::new(MemoryCloud::new());
        let status = Arc::new(RecordingStatus::new());
        let clients = CloudClients::from_memory(cloud.clone()).with_status(status.clone());
        let operation =
            CreateServiceOperation::new(clients, deploy_credentials(), DeployConfig::default());

        let result = operation.operate(&orders_spec()).await.unwrap();

        assert_eq!(result.server_group_names, vec!["us-east-1:orders-prod-v0001"]);
        assert_eq!(
            cloud.calls().unwrap(),
            vec![
                "ListServices",
                "RegisterTaskDefinition",
                "CreateService",
                "RegisterScalableTarget"
            ]
        );
        let messages = status.messages();
        assert_eq!(
            messages.first().map(String::as_str),
            Some("Initializing Create Amazon ECS Server Group Operation...")
        );
        assert_eq!(
            messages.last().map(String::as_str),
            Some("Done creating Amazon Application Auto Scaling Scalable Target Definition.")
        );
    }

    #[tokio::test]
    async fn invalid_spec_makes_no_remote_calls() {
        let cloud = Arc::new(MemoryCloud::new());
        let operation = CreateServiceOperation::new(
            CloudClients::from_memory(cloud.clone()),
            deploy_credentials(),
            DeployConfig::default(),
        );
        let mut spec = orders_spec();
        spec.capacity.min = 10;

        let err = operation.operate(&spec).await.unwrap_err();

        assert!(matches!(err, DeployError::InvalidSpec(_)));
        assert!(cloud.calls().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_credentials_leave_task_definition_behind() {
        let cloud = Arc::new(MemoryCloud::new());
        let operation = CreateServiceOperation::new(
            CloudClients::from_memory(cloud.clone()),
            Arc::new(StaticCredentials {
                account_id: "123456789012".to_owned(),
            }),
            DeployConfig::default(),
        );

        let err = operation.operate(&orders_spec()).await.unwrap_err();

        assert!(matches!(err, DeployError::UnsupportedCredentials(_)));
        let state = cloud.snapshot().unwrap();
        assert_eq!(state.task_definitions.len(), 1);
        assert!(state.services.is_empty());
        assert!(state.scalable_targets.is_empty());
    }

    #[tokio::test]
    async fn next_version_does_not_reserve() {
        let cloud = Arc::new(MemoryCloud::new());
        let operation = CreateServiceOperation::new(
            CloudClients::from_memory(cloud),
            deploy_credentials(),
            DeployConfig::default(),
        );
        let spec = orders_spec();

        let before = operation.next_version(&spec).await.unwrap();
        assert_eq!(before, operation.next_version(&spec).await.unwrap());

        operation.operate(&spec).await.unwrap();
        assert_eq!(operation.next_version(&spec).await.unwrap(), before.next().unwrap());
    }
}
