//! Scalable target registration and alarm association.

use tracing::{debug, info};

use crate::cloud::model::{ECS_DESIRED_COUNT_DIMENSION, ECS_SERVICE_NAMESPACE};
use crate::cloud::{AlarmAssociationRequest, CloudClients, RegisterScalableTargetRequest, Service};
use crate::error::DeployResult;
use crate::status::PHASE;
use crate::types::ServiceSpec;

/// Scalable target identifier of a service.
#[must_use]
pub fn resource_id(cluster: &str, service_name: &str) -> String {
    format!("service/{cluster}/{service_name}")
}

/// Register `service` as a scalable target bounded by the spec's capacity,
/// then attach the spec's alarms to it. Returns the resource identifier.
///
/// The alarm association collaborator is only called when the spec declares
/// at least one alarm.
pub async fn register_autoscaling(
    clients: &CloudClients,
    spec: &ServiceSpec,
    region: &str,
    service: &Service,
    assumed_role_arn: &str,
) -> DeployResult<String> {
    let request = RegisterScalableTargetRequest {
        service_namespace: ECS_SERVICE_NAMESPACE.to_owned(),
        scalable_dimension: ECS_DESIRED_COUNT_DIMENSION.to_owned(),
        resource_id: resource_id(&spec.ecs_cluster_name, &service.service_name),
        role_arn: assumed_role_arn.to_owned(),
        min_capacity: spec.capacity.min,
        max_capacity: spec.capacity.max,
    };

    clients.status.update(
        PHASE,
        "Creating Amazon Application Auto Scaling Scalable Target Definition...",
    );
    clients.autoscaling.register_scalable_target(&request).await?;
    clients.status.update(
        PHASE,
        "Done creating Amazon Application Auto Scaling Scalable Target Definition.",
    );

    info!(
        resource_id = %request.resource_id,
        min = request.min_capacity,
        max = request.max_capacity,
        "registered scalable target"
    );

    let alarm_names = spec.alarm_names();
    if alarm_names.is_empty() {
        debug!(resource_id = %request.resource_id, "no alarms to associate");
    } else {
        let association = AlarmAssociationRequest {
            account: spec.credential_account.clone(),
            region: region.to_owned(),
            alarm_names,
            service_name: service.service_name.clone(),
            resource_id: request.resource_id.clone(),
        };
        clients.alarms.associate_alarms(&association).await?;
        info!(
            resource_id = %request.resource_id,
            alarms = association.alarm_names.len(),
            "associated alarms with scalable target"
        );
    }

    Ok(request.resource_id)
}
