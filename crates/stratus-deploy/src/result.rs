//! Caller-visible result of a provisioning operation.

use std::collections::BTreeMap;

use crate::cloud::Service;
use crate::error::{DeployError, DeployResult};
use crate::types::{DeploymentResult, ServiceSpec};

/// Region the spec deploys to.
///
/// Taken from the first key of the availability-zone mapping. A key naming a
/// zone (`us-east-1a`) is reduced to its region (`us-east-1`).
pub fn deployment_region(spec: &ServiceSpec) -> DeployResult<String> {
    let key = spec
        .availability_zones
        .keys()
        .next()
        .ok_or_else(|| DeployError::invalid_spec("availability zones name no region"))?;

    Ok(zone_region(key).to_owned())
}

fn zone_region(name: &str) -> &str {
    let mut chars = name.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(zone), Some(digit)) if zone.is_ascii_lowercase() && digit.is_ascii_digit() => {
            &name[..name.len() - 1]
        }
        _ => name,
    }
}

/// Globally addressable name of a service, `region:serviceName`.
#[must_use]
pub fn server_group_name(region: &str, service_name: &str) -> String {
    format!("{region}:{service_name}")
}

/// Result naming the created service once, keyed by its region.
#[must_use]
pub fn deployment_result(region: &str, service: &Service) -> DeploymentResult {
    DeploymentResult {
        server_group_names: vec![server_group_name(region, &service.service_name)],
        server_group_name_by_region: BTreeMap::from([(
            region.to_owned(),
            service.service_name.clone(),
        )]),
    }
}
