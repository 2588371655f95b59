//! Test fixtures for provisioning integration tests.

use std::collections::{BTreeMap, BTreeSet};

use stratus_deploy::{Capacity, PortProtocol, ScalingAlarm, ServiceSpec};

/// Builder for creating test ServiceSpec instances.
pub struct SpecBuilder {
    spec: ServiceSpec,
}

impl SpecBuilder {
    /// Creates a builder for the given application in cluster `main`.
    pub fn new(application: &str) -> Self {
        Self {
            spec: ServiceSpec {
                application: application.to_owned(),
                stack: None,
                free_form_details: None,
                docker_image_address: format!("repo/{application}:1"),
                container_port: 8080,
                port_protocol: PortProtocol::Tcp,
                compute_units: 256,
                reserved_memory: 512,
                iam_role: None,
                capacity: Capacity {
                    desired: 1,
                    min: 1,
                    max: 1,
                },
                placement_strategy: Vec::new(),
                target_group: None,
                autoscaling_policies: BTreeSet::new(),
                ecs_cluster_name: "main".to_owned(),
                credential_account: "prod".to_owned(),
                availability_zones: BTreeMap::from([(
                    "us-east-1".to_owned(),
                    vec!["us-east-1a".to_owned()],
                )]),
            },
        }
    }

    /// Sets the stack qualifier.
    pub fn with_stack(mut self, stack: &str) -> Self {
        self.spec.stack = Some(stack.to_owned());
        self
    }

    /// Sets the free-form detail qualifier.
    pub fn with_detail(mut self, detail: &str) -> Self {
        self.spec.free_form_details = Some(detail.to_owned());
        self
    }

    /// Sets the container image.
    pub fn with_image(mut self, image: &str) -> Self {
        self.spec.docker_image_address = image.to_owned();
        self
    }

    /// Sets the container port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.spec.container_port = port;
        self
    }

    /// Sets desired count and autoscaling bounds.
    pub fn with_capacity(mut self, desired: u32, min: u32, max: u32) -> Self {
        self.spec.capacity = Capacity { desired, min, max };
        self
    }

    /// Sets the execution role.
    pub fn with_role(mut self, role: &str) -> Self {
        self.spec.iam_role = Some(role.to_owned());
        self
    }

    /// Sets the target group name.
    pub fn with_target_group(mut self, name: &str) -> Self {
        self.spec.target_group = Some(name.to_owned());
        self
    }

    /// Adds an alarm-driven scaling policy.
    pub fn with_alarm(mut self, alarm_name: &str) -> Self {
        self.spec.autoscaling_policies.insert(ScalingAlarm {
            alarm_name: alarm_name.to_owned(),
        });
        self
    }

    /// Replaces the availability-zone mapping with a single entry.
    pub fn with_zone_key(mut self, key: &str) -> Self {
        self.spec.availability_zones = BTreeMap::from([(key.to_owned(), vec![key.to_owned()])]);
        self
    }

    /// Builds the spec.
    pub fn build(self) -> ServiceSpec {
        self.spec
    }
}
