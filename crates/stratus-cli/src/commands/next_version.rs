//! Implementation of the `stratus next-version` command.

use std::path::Path;

use stratus_deploy::{CloudClients, CreateServiceOperation, DeployConfig, RevisionVersion};

use super::sandbox::SandboxFile;
use super::validate::check;
use super::CliError;

pub async fn resolve(
    spec_path: &Path,
    state_path: &Path,
    config: DeployConfig,
) -> Result<RevisionVersion, CliError> {
    let spec = check(spec_path)?;
    let sandbox = SandboxFile::load(state_path).await?;
    let (cloud, credentials) = sandbox.open();

    let operation = CreateServiceOperation::new(CloudClients::from_memory(cloud), credentials, config);
    Ok(operation.next_version(&spec).await?)
}

pub async fn run(spec_path: &Path, state_path: &Path, config: DeployConfig) -> Result<(), CliError> {
    let version = resolve(spec_path, state_path, config).await?;
    println!("{version}");
    Ok(())
}
