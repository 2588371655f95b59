//! Load balancer binding resolution.

use tracing::debug;

use crate::cloud::{LoadBalancerBinding, LoadBalancerRegistry};
use crate::error::{DeployError, DeployResult};
use crate::types::RevisionVersion;

/// Binding for the revision's container, attached to `target_group` when one
/// is named.
///
/// The name must resolve to exactly one target group. A missing or ambiguous
/// name is a configuration error; no group is picked silently.
pub async fn resolve_load_balancer(
    registry: &dyn LoadBalancerRegistry,
    version: RevisionVersion,
    container_port: u16,
    target_group: Option<&str>,
) -> DeployResult<LoadBalancerBinding> {
    let mut binding = LoadBalancerBinding {
        container_name: version.to_string(),
        container_port,
        target_group_arn: None,
    };

    let Some(name) = target_group else {
        return Ok(binding);
    };

    let mut groups = registry.describe_target_groups(name).await?;
    match groups.len() {
        0 => return Err(DeployError::TargetGroupNotFound(name.to_owned())),
        1 => {}
        count => {
            return Err(DeployError::AmbiguousTargetGroup {
                name: name.to_owned(),
                count,
            })
        }
    }

    let group = groups.remove(0);
    debug!(name = %name, arn = %group.target_group_arn, "resolved target group");
    binding.target_group_arn = Some(group.target_group_arn);

    Ok(binding)
}
