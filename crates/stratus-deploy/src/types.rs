//! Core types for stratus-deploy.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Role value meaning "run the task without an execution role".
pub const NO_ROLE_SENTINEL: &str = "None (No IAM role)";

/// Logical grouping name under which revisions are versioned.
///
/// Built as `application[-stack][-detail]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyName(String);

impl FamilyName {
    /// Create a family name from an already joined string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Join the application with its optional qualifiers.
    #[must_use]
    pub fn from_parts(application: &str, stack: Option<&str>, detail: Option<&str>) -> Self {
        let mut name = application.to_owned();
        for part in [stack, detail].into_iter().flatten() {
            name.push('-');
            name.push_str(part);
        }
        Self(name)
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the service carrying the given revision.
    #[must_use]
    pub fn service_name(&self, version: RevisionVersion) -> String {
        format!("{}-{}", self.0, version)
    }
}

impl fmt::Display for FamilyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FamilyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monotonic revision number within a family, rendered as `v%04d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RevisionVersion(u32);

impl RevisionVersion {
    /// Revision handed out when a family has no deployed services.
    pub const FIRST: Self = Self(1);

    /// Create a revision from its number.
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// The revision number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }

    /// The revision following this one, `None` once the numbering is used up.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(number) => Some(Self(number)),
            None => None,
        }
    }
}

impl fmt::Display for RevisionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{:04}", self.0)
    }
}

/// Transport protocol of the container port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortProtocol {
    /// TCP.
    #[default]
    Tcp,
    /// UDP.
    Udp,
}

impl PortProtocol {
    /// Wire name of the protocol.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Desired task count with autoscaling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    /// Tasks to run right after creation.
    pub desired: u32,
    /// Lower autoscaling bound.
    pub min: u32,
    /// Upper autoscaling bound.
    pub max: u32,
}

/// How tasks are spread across container instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStrategyType {
    /// Place tasks randomly.
    Random,
    /// Spread tasks evenly over the values of `field`.
    Spread,
    /// Pack tasks onto the fewest instances by `field`.
    Binpack,
}

/// One placement strategy rule, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementStrategy {
    /// Strategy kind.
    #[serde(rename = "type")]
    pub strategy_type: PlacementStrategyType,
    /// Attribute the strategy applies to, e.g. `attribute:ecs.availability-zone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Binding of a metric alarm to a scaling policy of the new service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScalingAlarm {
    /// Name of the metric alarm.
    pub alarm_name: String,
}

/// Declarative description of the service to provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Application name, first part of the family name.
    pub application: String,
    /// Optional stack qualifier.
    #[serde(default)]
    pub stack: Option<String>,
    /// Optional free-form detail qualifier.
    #[serde(default)]
    pub free_form_details: Option<String>,
    /// Container image reference.
    pub docker_image_address: String,
    /// Port the container listens on.
    pub container_port: u16,
    /// Protocol of the container port.
    #[serde(default)]
    pub port_protocol: PortProtocol,
    /// CPU units reserved for the container.
    pub compute_units: u32,
    /// Memory reserved for the container, in MiB.
    pub reserved_memory: u32,
    /// Task execution role, or [`NO_ROLE_SENTINEL`].
    #[serde(default)]
    pub iam_role: Option<String>,
    /// Desired count and autoscaling bounds.
    pub capacity: Capacity,
    /// Placement strategy rules.
    #[serde(default)]
    pub placement_strategy: Vec<PlacementStrategy>,
    /// Target group to register tasks with.
    #[serde(default)]
    pub target_group: Option<String>,
    /// Alarm-driven scaling policies to attach.
    #[serde(default)]
    pub autoscaling_policies: BTreeSet<ScalingAlarm>,
    /// Cluster the service is created in.
    pub ecs_cluster_name: String,
    /// Account whose credentials perform the deployment.
    pub credential_account: String,
    /// Region to availability zones. Exactly one region is expected.
    pub availability_zones: BTreeMap<String, Vec<String>>,
}

impl ServiceSpec {
    /// Read a spec from a `.json` file, or TOML for any other extension.
    pub fn from_path(path: impl AsRef<Path>) -> DeployResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&contents)?)
        } else {
            toml::from_str(&contents).map_err(|e| DeployError::Serialisation(e.to_string()))
        }
    }

    /// Family name derived from the application and its qualifiers.
    #[must_use]
    pub fn family_name(&self) -> FamilyName {
        FamilyName::from_parts(
            &self.application,
            self.stack.as_deref(),
            self.free_form_details.as_deref(),
        )
    }

    /// Task execution role, unless absent or the "no role" sentinel.
    #[must_use]
    pub fn execution_role(&self) -> Option<&str> {
        self.iam_role
            .as_deref()
            .filter(|role| *role != NO_ROLE_SENTINEL)
    }

    /// Names of the alarms to associate with the scalable target.
    #[must_use]
    pub fn alarm_names(&self) -> Vec<String> {
        self.autoscaling_policies
            .iter()
            .map(|policy| policy.alarm_name.clone())
            .collect()
    }
}

/// Caller-visible outcome of a provisioning operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResult {
    /// Region-qualified service names, `region:serviceName`.
    pub server_group_names: Vec<String>,
    /// Service name keyed by region.
    pub server_group_name_by_region: BTreeMap<String, String>,
}
