//! Remote collaborators of the provisioning operation.
//!
//! Each remote service is an async trait so the orchestration can run against
//! real control planes or the in-memory [`MemoryCloud`]. Implementations own
//! their latency and retry behaviour; errors are returned as
//! [`DeployError::Remote`](crate::DeployError::Remote) and propagated verbatim.

mod memory;
pub mod model;

pub use memory::{MemoryCloud, SandboxSettings, SandboxState};
pub use model::{
    AlarmAssociationRequest, ContainerDefinition, CreateServiceRequest, DeploymentConfiguration,
    KeyValuePair, ListServicesPage, ListServicesRequest, LoadBalancerBinding, PortMapping,
    RegisterScalableTargetRequest, RegisterTaskDefinitionRequest, Role, Service, TargetGroup,
    TaskDefinition,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DeployResult;
use crate::status::{StatusSink, TracingStatus};

/// Container orchestration control plane.
#[async_trait]
pub trait ContainerPlatform: Send + Sync {
    /// List one page of service identifiers in a cluster.
    async fn list_services(&self, request: &ListServicesRequest)
        -> DeployResult<ListServicesPage>;

    /// Register a new task definition revision.
    async fn register_task_definition(
        &self,
        request: &RegisterTaskDefinitionRequest,
    ) -> DeployResult<TaskDefinition>;

    /// Create a service. Not idempotent.
    async fn create_service(&self, request: &CreateServiceRequest) -> DeployResult<Service>;
}

/// Identity service holding roles and their trust policies.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Fetch a role by name.
    async fn get_role(&self, role_name: &str) -> DeployResult<Role>;
}

/// Load balancer registry.
#[async_trait]
pub trait LoadBalancerRegistry: Send + Sync {
    /// Every target group carrying the given name.
    async fn describe_target_groups(&self, name: &str) -> DeployResult<Vec<TargetGroup>>;
}

/// Autoscaling control plane.
#[async_trait]
pub trait ScalableTargetRegistry: Send + Sync {
    /// Register a resource as a scalable target.
    async fn register_scalable_target(
        &self,
        request: &RegisterScalableTargetRequest,
    ) -> DeployResult<()>;
}

/// Metric alarm association service.
#[async_trait]
pub trait AlarmAssociation: Send + Sync {
    /// Point the named alarms at the scalable target of a service.
    async fn associate_alarms(&self, request: &AlarmAssociationRequest) -> DeployResult<()>;
}

/// Handles to every collaborator, built by the caller for one account and region.
#[derive(Clone)]
pub struct CloudClients {
    /// Container orchestration control plane.
    pub containers: Arc<dyn ContainerPlatform>,
    /// Identity service.
    pub identity: Arc<dyn IdentityService>,
    /// Load balancer registry.
    pub load_balancers: Arc<dyn LoadBalancerRegistry>,
    /// Autoscaling control plane.
    pub autoscaling: Arc<dyn ScalableTargetRegistry>,
    /// Metric alarm association.
    pub alarms: Arc<dyn AlarmAssociation>,
    /// Progress message side channel.
    pub status: Arc<dyn StatusSink>,
}

impl CloudClients {
    /// Point every collaborator at the same in-memory cloud.
    #[must_use]
    pub fn from_memory(cloud: Arc<MemoryCloud>) -> Self {
        Self {
            containers: cloud.clone(),
            identity: cloud.clone(),
            load_balancers: cloud.clone(),
            autoscaling: cloud.clone(),
            alarms: cloud,
            status: Arc::new(TracingStatus),
        }
    }

    /// Replace the status side channel.
    #[must_use]
    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }
}

impl std::fmt::Debug for CloudClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClients").finish_non_exhaustive()
    }
}
