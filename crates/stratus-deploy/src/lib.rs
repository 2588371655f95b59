//! Stratus service provisioning.
//!
//! This crate provisions one new revision of a container service: it picks
//! the next revision number of the service family, registers a task
//! definition, creates the service behind a load balancer binding and
//! registers it with the autoscaling controller.
//!
//! # Flow
//!
//! ```text
//! validate ──▶ resolve version ──▶ register task definition ──▶ create service ──▶ register scalable target ──▶ result
//!                                        │                           │                       │
//!                                        ▼                           ▼                       ▼
//!                                  trust policy                target group           alarm association
//! ```
//!
//! Every stage waits for the previous one. A failure aborts the remaining
//! stages and leaves already created resources untouched.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stratus_deploy::{
//!     AssumeRoleCredentials, CloudClients, CreateServiceOperation, DeployConfig, MemoryCloud,
//! };
//!
//! let cloud = Arc::new(MemoryCloud::new());
//! let operation = CreateServiceOperation::new(
//!     CloudClients::from_memory(cloud),
//!     Arc::new(AssumeRoleCredentials {
//!         account_id: "123456789012".to_owned(),
//!         assume_role: "role/ecsDeploy".to_owned(),
//!         session_name: None,
//!     }),
//!     DeployConfig::default(),
//! );
//!
//! let result = operation.operate(&spec).await?;
//! assert_eq!(result.server_group_names, vec!["us-east-1:orders-prod-v0001"]);
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

pub mod autoscaling;
pub mod cloud;
pub mod config;
pub mod credentials;
pub mod error;
pub mod load_balancer;
pub mod operation;
pub mod result;
pub mod service;
pub mod status;
pub mod task_definition;
pub mod trust;
pub mod types;
pub mod validation;
pub mod version;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at the crate root
pub use cloud::{CloudClients, MemoryCloud, SandboxSettings, SandboxState};
pub use config::{DeployConfig, FamilyMatch, LogFormat};
pub use credentials::{
    AccountCredentials, AssumeRoleCredentials, ContainerServiceAssumeRoleCredentials,
    CredentialSource, FederatedAssumeRoleCredentials, StaticCredentials,
};
pub use error::{DeployError, DeployResult};
pub use operation::CreateServiceOperation;
pub use status::{RecordingStatus, StatusSink, TracingStatus};
pub use types::{
    Capacity, DeploymentResult, FamilyName, PlacementStrategy, PlacementStrategyType,
    PortProtocol, RevisionVersion, ScalingAlarm, ServiceSpec, NO_ROLE_SENTINEL,
};
