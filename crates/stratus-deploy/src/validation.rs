//! Service spec validation.
//!
//! Runs before any remote call so a malformed request never leaves partial
//! resources behind.

use crate::error::{DeployError, DeployResult};
use crate::types::ServiceSpec;

/// Check `spec` and report every problem found at once.
pub fn validate(spec: &ServiceSpec) -> DeployResult<()> {
    let mut problems = Vec::new();

    let required = [
        ("application", &spec.application),
        ("docker_image_address", &spec.docker_image_address),
        ("ecs_cluster_name", &spec.ecs_cluster_name),
        ("credential_account", &spec.credential_account),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            problems.push(format!("{field} must not be empty"));
        }
    }

    if spec.container_port == 0 {
        problems.push("container_port must be between 1 and 65535".to_owned());
    }
    if spec.availability_zones.is_empty() {
        problems.push("availability_zones must name a region".to_owned());
    }

    let capacity = spec.capacity;
    if capacity.min > capacity.max {
        problems.push(format!(
            "capacity.min ({}) must not exceed capacity.max ({})",
            capacity.min, capacity.max
        ));
    }

    if spec
        .autoscaling_policies
        .iter()
        .any(|policy| policy.alarm_name.trim().is_empty())
    {
        problems.push("autoscaling_policies must not contain empty alarm names".to_owned());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DeployError::InvalidSpec(problems))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_support::orders_spec;
    use crate::types::{Capacity, ScalingAlarm};

    fn problems(spec: &ServiceSpec) -> Vec<String> {
        match validate(spec) {
            Err(DeployError::InvalidSpec(problems)) => problems,
            other => panic!("expected InvalidSpec, got {other:?}"),
        }
    }

    #[test]
    fn orders_spec_is_valid() {
        validate(&orders_spec()).unwrap();
    }

    #[test]
    fn reports_every_problem() {
        let mut spec = orders_spec();
        spec.application = " ".to_owned();
        spec.container_port = 0;
        spec.availability_zones = BTreeMap::new();

        let problems = problems(&spec);
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0], "application must not be empty");
    }

    #[test]
    fn capacity_bounds_are_checked() {
        let mut spec = orders_spec();
        spec.capacity = Capacity {
            desired: 1,
            min: 4,
            max: 2,
        };

        assert_eq!(
            problems(&spec),
            vec!["capacity.min (4) must not exceed capacity.max (2)"]
        );
    }

    #[test]
    fn desired_outside_bounds_is_left_to_autoscaling() {
        let mut spec = orders_spec();
        spec.capacity = Capacity {
            desired: 0,
            min: 1,
            max: 4,
        };
        validate(&spec).unwrap();
    }

    #[test]
    fn zero_cpu_and_memory_pass_through() {
        let mut spec = orders_spec();
        spec.compute_units = 0;
        spec.reserved_memory = 0;
        validate(&spec).unwrap();
    }

    #[test]
    fn multiple_regions_are_accepted() {
        let mut spec = orders_spec();
        spec.availability_zones
            .insert("us-west-2".to_owned(), vec!["us-west-2a".to_owned()]);
        validate(&spec).unwrap();
    }

    #[test]
    fn empty_alarm_names_are_rejected() {
        let mut spec = orders_spec();
        spec.autoscaling_policies.insert(ScalingAlarm {
            alarm_name: String::new(),
        });
        assert_eq!(problems(&spec).len(), 1);
    }
}
