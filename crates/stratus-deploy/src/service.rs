//! Service creation.

use tracing::info;

use crate::cloud::{
    CloudClients, CreateServiceRequest, DeploymentConfiguration, Service, TaskDefinition,
};
use crate::error::DeployResult;
use crate::load_balancer::resolve_load_balancer;
use crate::status::PHASE;
use crate::types::{FamilyName, RevisionVersion, ServiceSpec};

/// Create the service running `task_definition` as revision `version`.
///
/// `service_role_arn` is the service-level role used to register tasks with
/// the load balancer, not the task's execution role. The call is not
/// idempotent: a retry after an ambiguous failure should resolve a new
/// revision rather than reuse this one.
pub async fn create_service(
    clients: &CloudClients,
    spec: &ServiceSpec,
    family: &FamilyName,
    version: RevisionVersion,
    task_definition: &TaskDefinition,
    service_role_arn: &str,
) -> DeployResult<Service> {
    let service_name = family.service_name(version);
    let load_balancer = resolve_load_balancer(
        clients.load_balancers.as_ref(),
        version,
        spec.container_port,
        spec.target_group.as_deref(),
    )
    .await?;

    let request = CreateServiceRequest {
        service_name: service_name.clone(),
        desired_count: spec.capacity.desired,
        cluster: spec.ecs_cluster_name.clone(),
        role: service_role_arn.to_owned(),
        load_balancers: vec![load_balancer],
        task_definition: task_definition.task_definition_arn.clone(),
        placement_strategy: spec.placement_strategy.clone(),
        deployment_configuration: DeploymentConfiguration::NO_DOWNTIME,
    };

    clients.status.update(
        PHASE,
        &format!(
            "Creating {} of {} with {} for {}.",
            request.desired_count,
            service_name,
            request.task_definition,
            spec.credential_account
        ),
    );

    let service = clients.containers.create_service(&request).await?;

    clients.status.update(
        PHASE,
        &format!(
            "Done creating {} of {} with {} for {}.",
            request.desired_count,
            service_name,
            request.task_definition,
            spec.credential_account
        ),
    );

    info!(
        service = %service.service_name,
        cluster = %spec.ecs_cluster_name,
        desired = request.desired_count,
        "created service"
    );

    Ok(service)
}
