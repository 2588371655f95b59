//! Subcommands of the `stratus` binary.

pub mod deploy;
pub mod next_version;
pub mod sandbox;
pub mod validate;

use thiserror::Error;

use self::sandbox::SandboxError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Deploy(#[from] stratus_deploy::DeployError),

    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}
