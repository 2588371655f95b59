//! Request and response shapes exchanged with the remote collaborators.

use serde::{Deserialize, Serialize};

use crate::types::{PlacementStrategy, PortProtocol};

/// Namespace of scalable targets backed by container services.
pub const ECS_SERVICE_NAMESPACE: &str = "ecs";

/// Dimension scaled on container services.
pub const ECS_DESIRED_COUNT_DIMENSION: &str = "ecs:service:DesiredCount";

/// One page of a service listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListServicesRequest {
    /// Cluster to list.
    pub cluster: String,
    /// Token returned by the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One page of service identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListServicesPage {
    /// Fully-qualified service identifiers.
    pub service_arns: Vec<String>,
    /// Token for the next page; absent or empty on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Environment entry passed to the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Variable name.
    pub name: String,
    /// Variable value, absent when the qualifier was not declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl KeyValuePair {
    /// Create an environment entry.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Host to container port binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// Host port, 0 for an ephemeral port.
    pub host_port: u16,
    /// Port the container listens on.
    pub container_port: u16,
    /// Transport protocol.
    pub protocol: PortProtocol,
}

/// Container inside a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// CPU units.
    pub cpu: u32,
    /// Soft memory limit in MiB.
    pub memory_reservation: u32,
    /// Port bindings.
    pub port_mappings: Vec<PortMapping>,
    /// Environment variables.
    pub environment: Vec<KeyValuePair>,
}

/// Request to register a task definition revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTaskDefinitionRequest {
    /// Family the revision belongs to.
    pub family: String,
    /// Containers of the task.
    pub container_definitions: Vec<ContainerDefinition>,
    /// Role assumed by the running task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
}

/// A registered task definition revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Opaque handle used when creating services.
    pub task_definition_arn: String,
    /// Family the revision belongs to.
    pub family: String,
    /// Revision number within the family.
    pub revision: u32,
    /// Containers of the task.
    pub container_definitions: Vec<ContainerDefinition>,
    /// Role assumed by the running task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_role_arn: Option<String>,
}

/// Binding between a service's container and a load balancer target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerBinding {
    /// Container receiving traffic.
    pub container_name: String,
    /// Port on that container.
    pub container_port: u16,
    /// Target group, absent when the service is not attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_group_arn: Option<String>,
}

/// Rolling update policy of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfiguration {
    /// Lower bound of running tasks during a deployment, percent of desired.
    pub minimum_healthy_percent: u32,
    /// Upper bound of running tasks during a deployment, percent of desired.
    pub maximum_percent: u32,
}

impl DeploymentConfiguration {
    /// Never drop below the desired count while replacing tasks.
    pub const NO_DOWNTIME: Self = Self {
        minimum_healthy_percent: 100,
        maximum_percent: 200,
    };
}

impl Default for DeploymentConfiguration {
    fn default() -> Self {
        Self::NO_DOWNTIME
    }
}

/// Request to create a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    /// Service name, unique within the cluster.
    pub service_name: String,
    /// Tasks to start.
    pub desired_count: u32,
    /// Cluster to create the service in.
    pub cluster: String,
    /// Service-level role used to register tasks with the load balancer.
    pub role: String,
    /// Load balancer bindings.
    pub load_balancers: Vec<LoadBalancerBinding>,
    /// Task definition handle.
    pub task_definition: String,
    /// Placement strategy rules.
    pub placement_strategy: Vec<PlacementStrategy>,
    /// Rolling update policy.
    pub deployment_configuration: DeploymentConfiguration,
}

/// A service as reported by the container platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Service name.
    pub service_name: String,
    /// Fully-qualified service identifier.
    pub service_arn: String,
    /// Cluster the service runs in.
    pub cluster: String,
    /// Tasks requested.
    pub desired_count: u32,
    /// Service-level role.
    pub role_arn: String,
    /// Load balancer bindings.
    pub load_balancers: Vec<LoadBalancerBinding>,
    /// Task definition handle.
    pub task_definition: String,
    /// Placement strategy rules.
    pub placement_strategy: Vec<PlacementStrategy>,
    /// Rolling update policy.
    pub deployment_configuration: DeploymentConfiguration,
}

/// An identity role with its trust policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role name.
    pub role_name: String,
    /// Fully-qualified role identifier.
    #[serde(default)]
    pub arn: String,
    /// Trust policy document, URL-encoded or raw JSON.
    pub assume_role_policy_document: String,
}

/// A load balancer target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    /// Target group name.
    pub target_group_name: String,
    /// Canonical identifier.
    pub target_group_arn: String,
}

/// Request to register a scalable target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterScalableTargetRequest {
    /// Namespace of the scaled resource.
    pub service_namespace: String,
    /// Dimension that is scaled.
    pub scalable_dimension: String,
    /// Resource identifier, `service/<cluster>/<serviceName>`.
    pub resource_id: String,
    /// Role the autoscaling controller assumes.
    #[serde(rename = "roleARN")]
    pub role_arn: String,
    /// Lower bound.
    pub min_capacity: u32,
    /// Upper bound.
    pub max_capacity: u32,
}

/// Request to attach named metric alarms to a scalable target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmAssociationRequest {
    /// Credential account owning the alarms.
    pub account: String,
    /// Region of the alarms.
    pub region: String,
    /// Alarms to associate.
    pub alarm_names: Vec<String>,
    /// Service the alarms scale.
    pub service_name: String,
    /// Scalable target resource identifier.
    pub resource_id: String,
}
