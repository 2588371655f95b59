//! Implementation of the `stratus validate` command.

use std::path::Path;

use stratus_deploy::validation::validate;
use stratus_deploy::ServiceSpec;
use tracing::info;

use super::CliError;

/// Load and check a spec, returning it when valid.
pub fn check(spec_path: &Path) -> Result<ServiceSpec, CliError> {
    let spec = ServiceSpec::from_path(spec_path)?;
    validate(&spec)?;
    Ok(spec)
}

pub fn run(spec_path: &Path) -> Result<(), CliError> {
    let spec = check(spec_path)?;
    info!(spec = %spec_path.display(), "spec is valid");
    println!("{}: valid (family {})", spec_path.display(), spec.family_name());
    Ok(())
}
