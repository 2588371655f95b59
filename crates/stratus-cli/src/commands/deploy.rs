//! Implementation of the `stratus deploy` command.

use std::path::PathBuf;

use stratus_deploy::{
    CloudClients, CreateServiceOperation, DeployConfig, DeployResult, DeploymentResult,
    MemoryCloud,
};
use tracing::{info, warn};

use super::sandbox::{SandboxError, SandboxFile};
use super::validate::check;
use super::CliError;

/// Arguments for the deploy command.
pub struct DeployArgs {
    /// Service spec file
    pub spec: PathBuf,

    /// Sandbox state file
    pub state: PathBuf,

    /// Persist the sandbox after the attempt
    pub write_state: bool,
}

/// Provision against the sandbox and return the result.
///
/// With `write_state` the snapshot is written back even when provisioning
/// fails, so resources created before the failure stay visible. A failed
/// write never masks a provisioning error.
pub async fn execute(args: &DeployArgs, config: DeployConfig) -> Result<DeploymentResult, CliError> {
    let spec = check(&args.spec)?;
    let mut sandbox = SandboxFile::load(&args.state).await?;
    let (cloud, credentials) = sandbox.open();

    let operation =
        CreateServiceOperation::new(CloudClients::from_memory(cloud.clone()), credentials, config);
    let outcome = operation.operate(&spec).await;

    if !args.write_state {
        return Ok(outcome?);
    }

    let written = write_state(&mut sandbox, &cloud, args).await;
    settle(outcome, written)
}

async fn write_state(
    sandbox: &mut SandboxFile,
    cloud: &MemoryCloud,
    args: &DeployArgs,
) -> Result<(), SandboxError> {
    sandbox.capture(cloud)?;
    sandbox.save(&args.state).await?;
    info!(state = %args.state.display(), "wrote sandbox state");
    Ok(())
}

/// Combine the provisioning outcome with the state write.
///
/// A provisioning error always wins; a write failure is only reported on its
/// own when provisioning succeeded.
fn settle(
    outcome: DeployResult<DeploymentResult>,
    written: Result<(), SandboxError>,
) -> Result<DeploymentResult, CliError> {
    match (outcome, written) {
        (Ok(result), Ok(())) => Ok(result),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e.into()),
        (Err(e), Err(write_error)) => {
            warn!(error = %write_error, "failed to write sandbox state");
            Err(e.into())
        }
    }
}

pub async fn run(args: DeployArgs, config: DeployConfig) -> Result<(), CliError> {
    let result = execute(&args, config).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::commands::next_version::resolve;
    use stratus_deploy::DeployError;

    const SPEC: &str = r#"
        application = "orders"
        stack = "prod"
        docker_image_address = "repo/orders:42"
        container_port = 8080
        compute_units = 256
        reserved_memory = 512
        ecs_cluster_name = "main"
        credential_account = "prod"

        [capacity]
        desired = 3
        min = 2
        max = 6

        [availability_zones]
        us-east-1a = ["us-east-1a"]
    "#;

    const SANDBOX: &str = r#"{
        "credentials": {
            "kind": "assume_role",
            "account_id": "123456789012",
            "assume_role": "role/ecsDeploy"
        }
    }"#;

    fn write_inputs(dir: &Path, sandbox: &str) -> DeployArgs {
        let spec = dir.join("orders.toml");
        let state = dir.join("sandbox.json");
        std::fs::write(&spec, SPEC).unwrap();
        std::fs::write(&state, sandbox).unwrap();
        DeployArgs {
            spec,
            state,
            write_state: true,
        }
    }

    #[tokio::test]
    async fn deploys_and_records_state() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_inputs(dir.path(), SANDBOX);

        let result = execute(&args, DeployConfig::default()).await.unwrap();
        assert_eq!(result.server_group_names, vec!["us-east-1:orders-prod-v0001"]);

        let version = resolve(&args.spec, &args.state, DeployConfig::default())
            .await
            .unwrap();
        assert_eq!(version.to_string(), "v0002");

        let second = execute(&args, DeployConfig::default()).await.unwrap();
        assert_eq!(second.server_group_names, vec!["us-east-1:orders-prod-v0002"]);
    }

    #[tokio::test]
    async fn state_is_untouched_without_write_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = write_inputs(dir.path(), SANDBOX);
        args.write_state = false;

        execute(&args, DeployConfig::default()).await.unwrap();

        let saved = SandboxFile::load(&args.state).await.unwrap();
        assert!(saved.state.services.is_empty());
    }

    #[test]
    fn write_failure_does_not_mask_provisioning_error() {
        let write_error = || SandboxError::Write {
            path: "sandbox.json".into(),
            source: std::io::Error::other("disk full"),
        };

        let err = settle(
            Err(DeployError::UnsupportedCredentials("static".to_owned())),
            Err(write_error()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Deploy(DeployError::UnsupportedCredentials(_))
        ));

        let ok = DeploymentResult {
            server_group_names: vec!["us-east-1:orders-v0001".to_owned()],
            server_group_name_by_region: Default::default(),
        };
        let err = settle(Ok(ok), Err(write_error())).unwrap_err();
        assert!(matches!(err, CliError::Sandbox(SandboxError::Write { .. })));
    }

    #[tokio::test]
    async fn failed_deploy_still_records_created_resources() {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = r#"{
            "credentials": { "kind": "static", "account_id": "123456789012" }
        }"#;
        let args = write_inputs(dir.path(), sandbox);

        let err = execute(&args, DeployConfig::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Deploy(DeployError::UnsupportedCredentials(_))
        ));

        let saved = SandboxFile::load(&args.state).await.unwrap();
        assert_eq!(saved.state.task_definitions.len(), 1);
        assert!(saved.state.services.is_empty());
    }
}
