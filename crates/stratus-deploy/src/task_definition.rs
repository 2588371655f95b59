//! Task definition assembly and registration.

use tracing::info;

use crate::cloud::{
    CloudClients, ContainerDefinition, KeyValuePair, PortMapping, RegisterTaskDefinitionRequest,
    TaskDefinition,
};
use crate::error::DeployResult;
use crate::trust::check_role_trust;
use crate::types::{FamilyName, RevisionVersion, ServiceSpec};

/// Environment variable carrying the revision of the service.
pub const ENV_SERVER_GROUP: &str = "SERVER_GROUP";
/// Environment variable carrying the stack qualifier.
pub const ENV_CLOUD_STACK: &str = "CLOUD_STACK";
/// Environment variable carrying the free-form detail qualifier.
pub const ENV_CLOUD_DETAIL: &str = "CLOUD_DETAIL";

/// The single container of the task, named after the revision.
#[must_use]
pub fn container_definition(spec: &ServiceSpec, version: RevisionVersion) -> ContainerDefinition {
    let environment = vec![
        KeyValuePair::new(ENV_SERVER_GROUP, Some(version.to_string())),
        KeyValuePair::new(ENV_CLOUD_STACK, spec.stack.clone()),
        KeyValuePair::new(ENV_CLOUD_DETAIL, spec.free_form_details.clone()),
    ];

    let port_mapping = PortMapping {
        host_port: 0,
        container_port: spec.container_port,
        protocol: spec.port_protocol,
    };

    ContainerDefinition {
        name: version.to_string(),
        image: spec.docker_image_address.clone(),
        cpu: spec.compute_units,
        memory_reservation: spec.reserved_memory,
        port_mappings: vec![port_mapping],
        environment,
    }
}

/// Registration request for the family, without a task role.
#[must_use]
pub fn registration_request(
    spec: &ServiceSpec,
    family: &FamilyName,
    version: RevisionVersion,
) -> RegisterTaskDefinitionRequest {
    RegisterTaskDefinitionRequest {
        family: family.to_string(),
        container_definitions: vec![container_definition(spec, version)],
        task_role_arn: None,
    }
}

/// Register the task definition for `version`.
///
/// When the spec names an execution role its trust policy is checked first;
/// nothing is registered if the check fails.
pub async fn register_task_definition(
    clients: &CloudClients,
    spec: &ServiceSpec,
    family: &FamilyName,
    version: RevisionVersion,
) -> DeployResult<TaskDefinition> {
    let mut request = registration_request(spec, family, version);

    if let Some(role) = spec.execution_role() {
        check_role_trust(clients.identity.as_ref(), clients.status.as_ref(), role).await?;
        request.task_role_arn = Some(role.to_owned());
    }

    let definition = clients.containers.register_task_definition(&request).await?;

    info!(
        family = %family,
        revision = definition.revision,
        arn = %definition.task_definition_arn,
        "registered task definition"
    );

    Ok(definition)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cloud::MemoryCloud;
    use crate::error::DeployError;
    use crate::test_support::orders_spec;
    use crate::types::{PortProtocol, NO_ROLE_SENTINEL};

    #[test]
    fn container_carries_revision_environment_and_port() {
        let mut spec = orders_spec();
        spec.port_protocol = PortProtocol::Udp;
        let container = container_definition(&spec, RevisionVersion::new(3));

        assert_eq!(container.name, "v0003");
        assert_eq!(container.image, "repo/orders:42");
        assert_eq!(container.cpu, 256);
        assert_eq!(container.memory_reservation, 512);
        assert_eq!(
            container.port_mappings,
            vec![PortMapping {
                host_port: 0,
                container_port: 8080,
                protocol: PortProtocol::Udp,
            }]
        );
        assert_eq!(
            container.environment,
            vec![
                KeyValuePair::new("SERVER_GROUP", Some("v0003".to_owned())),
                KeyValuePair::new("CLOUD_STACK", Some("prod".to_owned())),
                KeyValuePair::new("CLOUD_DETAIL", None),
            ]
        );
    }

    #[tokio::test]
    async fn registers_without_role() {
        let cloud = Arc::new(MemoryCloud::new());
        let clients = CloudClients::from_memory(cloud.clone());
        let spec = orders_spec();

        let definition =
            register_task_definition(&clients, &spec, &spec.family_name(), RevisionVersion::FIRST)
                .await
                .unwrap();

        assert_eq!(definition.family, "orders-prod");
        assert_eq!(definition.task_role_arn, None);
        assert_eq!(cloud.calls().unwrap(), vec!["RegisterTaskDefinition"]);
    }

    #[tokio::test]
    async fn sentinel_role_skips_trust_check() {
        let cloud = Arc::new(MemoryCloud::new());
        let clients = CloudClients::from_memory(cloud.clone());
        let mut spec = orders_spec();
        spec.iam_role = Some(NO_ROLE_SENTINEL.to_owned());

        let definition =
            register_task_definition(&clients, &spec, &spec.family_name(), RevisionVersion::FIRST)
                .await
                .unwrap();

        assert_eq!(definition.task_role_arn, None);
        assert_eq!(cloud.calls().unwrap(), vec!["RegisterTaskDefinition"]);
    }

    #[tokio::test]
    async fn trusted_role_is_attached() {
        let cloud = Arc::new(MemoryCloud::new());
        cloud
            .seed_role(
                "orders-task",
                r#"{"Statement":[{"Effect":"Allow","Principal":{"Service":"ecs-tasks.amazonaws.com"}}]}"#,
            )
            .unwrap();
        let clients = CloudClients::from_memory(cloud.clone());
        let mut spec = orders_spec();
        spec.iam_role = Some("orders-task".to_owned());

        let definition =
            register_task_definition(&clients, &spec, &spec.family_name(), RevisionVersion::FIRST)
                .await
                .unwrap();

        assert_eq!(definition.task_role_arn.as_deref(), Some("orders-task"));
        assert_eq!(cloud.calls().unwrap(), vec!["GetRole", "RegisterTaskDefinition"]);
    }

    #[tokio::test]
    async fn untrusted_role_registers_nothing() {
        let cloud = Arc::new(MemoryCloud::new());
        cloud
            .seed_role("plain", r#"{"Statement":[]}"#)
            .unwrap();
        let clients = CloudClients::from_memory(cloud.clone());
        let mut spec = orders_spec();
        spec.iam_role = Some("plain".to_owned());

        let err =
            register_task_definition(&clients, &spec, &spec.family_name(), RevisionVersion::FIRST)
                .await
                .unwrap_err();

        assert!(matches!(err, DeployError::UntrustedRole { .. }));
        assert!(cloud.snapshot().unwrap().task_definitions.is_empty());
    }
}
