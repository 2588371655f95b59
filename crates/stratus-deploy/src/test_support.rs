//! Fixtures shared by unit tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Capacity, PortProtocol, ServiceSpec};

/// The `orders` service in the `prod` stack, with no role and no target group.
pub(crate) fn orders_spec() -> ServiceSpec {
    ServiceSpec {
        application: "orders".to_owned(),
        stack: Some("prod".to_owned()),
        free_form_details: None,
        docker_image_address: "repo/orders:42".to_owned(),
        container_port: 8080,
        port_protocol: PortProtocol::Tcp,
        compute_units: 256,
        reserved_memory: 512,
        iam_role: None,
        capacity: Capacity {
            desired: 3,
            min: 2,
            max: 6,
        },
        placement_strategy: Vec::new(),
        target_group: None,
        autoscaling_policies: BTreeSet::new(),
        ecs_cluster_name: "main".to_owned(),
        credential_account: "prod".to_owned(),
        availability_zones: BTreeMap::from([(
            "us-east-1".to_owned(),
            vec!["us-east-1a".to_owned(), "us-east-1b".to_owned()],
        )]),
    }
}
