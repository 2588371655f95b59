//! In-memory cloud for tests and local rehearsals.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

use super::model::{
    AlarmAssociationRequest, CreateServiceRequest, ListServicesPage, ListServicesRequest,
    RegisterScalableTargetRequest, RegisterTaskDefinitionRequest, Role, Service, TargetGroup,
    TaskDefinition,
};
use super::{
    AlarmAssociation, ContainerPlatform, IdentityService, LoadBalancerRegistry,
    ScalableTargetRegistry,
};

/// Where the sandbox pretends to live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxSettings {
    /// Partition used in generated identifiers.
    #[serde(default = "default_partition")]
    pub partition: String,
    /// Region used in generated identifiers.
    #[serde(default = "default_region")]
    pub region: String,
    /// Account used in generated identifiers.
    #[serde(default = "default_account_id")]
    pub account_id: String,
    /// Service identifiers returned per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_partition() -> String {
    "aws".to_owned()
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_account_id() -> String {
    "123456789012".to_owned()
}

const fn default_page_size() -> usize {
    10
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            partition: default_partition(),
            region: default_region(),
            account_id: default_account_id(),
            page_size: default_page_size(),
        }
    }
}

/// Every resource the sandbox holds. Serialisable so rehearsals can persist it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SandboxState {
    /// Services across all clusters, in creation order.
    pub services: Vec<Service>,
    /// Registered task definition revisions.
    pub task_definitions: Vec<TaskDefinition>,
    /// Identity roles.
    pub roles: Vec<Role>,
    /// Load balancer target groups. Names may repeat.
    pub target_groups: Vec<TargetGroup>,
    /// Registered scalable targets.
    pub scalable_targets: Vec<RegisterScalableTargetRequest>,
    /// Alarm associations made so far.
    pub alarm_associations: Vec<AlarmAssociationRequest>,
}

/// In-memory implementation of every remote collaborator.
///
/// Service names are unique per cluster, as on the real platform. Calls can
/// be made to fail by operation name to exercise partial failures.
#[derive(Debug, Default)]
pub struct MemoryCloud {
    settings: SandboxSettings,
    state: RwLock<SandboxState>,
    failing: RwLock<HashSet<String>>,
    calls: RwLock<Vec<&'static str>>,
}

impl MemoryCloud {
    /// Create an empty sandbox with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sandbox holding the given resources.
    #[must_use]
    pub fn with_state(settings: SandboxSettings, state: SandboxState) -> Self {
        Self {
            settings,
            state: RwLock::new(state),
            failing: RwLock::new(HashSet::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Settings the sandbox was created with.
    #[must_use]
    pub fn settings(&self) -> &SandboxSettings {
        &self.settings
    }

    /// Copy of every resource currently held.
    pub fn snapshot(&self) -> DeployResult<SandboxState> {
        let state = self
            .state
            .read()
            .map_err(|_| DeployError::internal("lock poisoned"))?;
        Ok(state.clone())
    }

    /// Add an existing service to a cluster.
    pub fn seed_service(&self, cluster: &str, service_name: &str) -> DeployResult<()> {
        let service = Service {
            service_name: service_name.to_owned(),
            service_arn: self.service_arn(cluster, service_name),
            cluster: cluster.to_owned(),
            ..Service::default()
        };
        self.write_state()?.services.push(service);
        Ok(())
    }

    /// Add a role with the given trust policy document.
    pub fn seed_role(&self, role_name: &str, policy_document: &str) -> DeployResult<()> {
        let role = Role {
            role_name: role_name.to_owned(),
            arn: format!(
                "arn:{}:iam::{}:role/{role_name}",
                self.settings.partition, self.settings.account_id
            ),
            assume_role_policy_document: policy_document.to_owned(),
        };
        self.write_state()?.roles.push(role);
        Ok(())
    }

    /// Add a target group. Adding the same name twice makes lookups ambiguous.
    pub fn seed_target_group(&self, name: &str) -> DeployResult<String> {
        let mut state = self.write_state()?;
        let arn = format!(
            "arn:{}:elasticloadbalancing:{}:{}:targetgroup/{name}/{:016x}",
            self.settings.partition,
            self.settings.region,
            self.settings.account_id,
            state.target_groups.len()
        );
        state.target_groups.push(TargetGroup {
            target_group_name: name.to_owned(),
            target_group_arn: arn.clone(),
        });
        Ok(arn)
    }

    /// Make every later call of the named operation fail.
    pub fn fail_operation(&self, operation: &str) -> DeployResult<()> {
        self.failing
            .write()
            .map_err(|_| DeployError::internal("lock poisoned"))?
            .insert(operation.to_owned());
        Ok(())
    }

    /// Operations invoked so far, in call order.
    pub fn calls(&self) -> DeployResult<Vec<&'static str>> {
        let calls = self
            .calls
            .read()
            .map_err(|_| DeployError::internal("lock poisoned"))?;
        Ok(calls.clone())
    }

    fn service_arn(&self, cluster: &str, service_name: &str) -> String {
        format!(
            "arn:{}:ecs:{}:{}:service/{cluster}/{service_name}",
            self.settings.partition, self.settings.region, self.settings.account_id
        )
    }

    fn write_state(&self) -> DeployResult<std::sync::RwLockWriteGuard<'_, SandboxState>> {
        self.state
            .write()
            .map_err(|_| DeployError::internal("lock poisoned"))
    }

    fn read_state(&self) -> DeployResult<std::sync::RwLockReadGuard<'_, SandboxState>> {
        self.state
            .read()
            .map_err(|_| DeployError::internal("lock poisoned"))
    }

    fn enter(&self, service: &'static str, operation: &'static str) -> DeployResult<()> {
        self.calls
            .write()
            .map_err(|_| DeployError::internal("lock poisoned"))?
            .push(operation);

        let failing = self
            .failing
            .read()
            .map_err(|_| DeployError::internal("lock poisoned"))?;
        if failing.contains(operation) {
            return Err(DeployError::remote(
                service,
                operation,
                "injected failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerPlatform for MemoryCloud {
    async fn list_services(
        &self,
        request: &ListServicesRequest,
    ) -> DeployResult<ListServicesPage> {
        self.enter("ecs", "ListServices")?;
        let state = self.read_state()?;

        let start = match request.next_token.as_deref() {
            None | Some("") => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                DeployError::remote("ecs", "ListServices", format!("invalid token: {token}"))
            })?,
        };

        let arns: Vec<String> = state
            .services
            .iter()
            .filter(|service| service.cluster == request.cluster)
            .map(|service| service.service_arn.clone())
            .collect();

        let page_size = self.settings.page_size.max(1);
        let end = start.saturating_add(page_size).min(arns.len());
        let service_arns = arns.get(start..end).map(<[String]>::to_vec).unwrap_or_default();
        let next_token = (end < arns.len()).then(|| end.to_string());

        Ok(ListServicesPage {
            service_arns,
            next_token,
        })
    }

    async fn register_task_definition(
        &self,
        request: &RegisterTaskDefinitionRequest,
    ) -> DeployResult<TaskDefinition> {
        self.enter("ecs", "RegisterTaskDefinition")?;
        let mut state = self.write_state()?;

        let previous = state
            .task_definitions
            .iter()
            .filter(|definition| definition.family == request.family)
            .map(|definition| definition.revision)
            .max()
            .unwrap_or(0);
        let revision = previous.saturating_add(1);

        let definition = TaskDefinition {
            task_definition_arn: format!(
                "arn:{}:ecs:{}:{}:task-definition/{}:{revision}",
                self.settings.partition, self.settings.region, self.settings.account_id,
                request.family
            ),
            family: request.family.clone(),
            revision,
            container_definitions: request.container_definitions.clone(),
            task_role_arn: request.task_role_arn.clone(),
        };
        state.task_definitions.push(definition.clone());

        Ok(definition)
    }

    async fn create_service(&self, request: &CreateServiceRequest) -> DeployResult<Service> {
        self.enter("ecs", "CreateService")?;
        let mut state = self.write_state()?;

        let exists = state.services.iter().any(|service| {
            service.cluster == request.cluster && service.service_name == request.service_name
        });
        if exists {
            return Err(DeployError::remote(
                "ecs",
                "CreateService",
                "Creation of service was not idempotent.",
            ));
        }

        let service = Service {
            service_name: request.service_name.clone(),
            service_arn: self.service_arn(&request.cluster, &request.service_name),
            cluster: request.cluster.clone(),
            desired_count: request.desired_count,
            role_arn: request.role.clone(),
            load_balancers: request.load_balancers.clone(),
            task_definition: request.task_definition.clone(),
            placement_strategy: request.placement_strategy.clone(),
            deployment_configuration: request.deployment_configuration,
        };
        state.services.push(service.clone());

        Ok(service)
    }
}

#[async_trait]
impl IdentityService for MemoryCloud {
    async fn get_role(&self, role_name: &str) -> DeployResult<Role> {
        self.enter("iam", "GetRole")?;
        let state = self.read_state()?;

        state
            .roles
            .iter()
            .find(|role| role.role_name == role_name)
            .cloned()
            .ok_or_else(|| {
                DeployError::remote(
                    "iam",
                    "GetRole",
                    format!("The role with name {role_name} cannot be found."),
                )
            })
    }
}

#[async_trait]
impl LoadBalancerRegistry for MemoryCloud {
    async fn describe_target_groups(&self, name: &str) -> DeployResult<Vec<TargetGroup>> {
        self.enter("elasticloadbalancing", "DescribeTargetGroups")?;
        let state = self.read_state()?;

        Ok(state
            .target_groups
            .iter()
            .filter(|group| group.target_group_name == name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScalableTargetRegistry for MemoryCloud {
    async fn register_scalable_target(
        &self,
        request: &RegisterScalableTargetRequest,
    ) -> DeployResult<()> {
        self.enter("application-autoscaling", "RegisterScalableTarget")?;
        let mut state = self.write_state()?;

        // Registering an existing target updates its bounds.
        state
            .scalable_targets
            .retain(|target| target.resource_id != request.resource_id);
        state.scalable_targets.push(request.clone());

        Ok(())
    }
}

#[async_trait]
impl AlarmAssociation for MemoryCloud {
    async fn associate_alarms(&self, request: &AlarmAssociationRequest) -> DeployResult<()> {
        self.enter("cloudwatch", "AssociateAlarms")?;
        self.write_state()?.alarm_associations.push(request.clone());
        Ok(())
    }
}
