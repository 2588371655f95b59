//! Error types for stratus-deploy.

/// Result type alias using [`DeployError`].
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors that can abort a provisioning operation.
///
/// Configuration errors are fatal and never retried. Remote errors carry the
/// collaborator's message verbatim so the pipeline can apply its own retry
/// policy.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The service spec failed validation before any remote call was made.
    #[error("invalid service spec: {}", .0.join("; "))]
    InvalidSpec(Vec<String>),

    /// The execution role does not trust the task execution principal.
    #[error("the {role} role does not have a trust relationship to {principal}")]
    UntrustedRole {
        /// Role that was checked.
        role: String,
        /// Principal that was required.
        principal: &'static str,
    },

    /// A role's trust policy document could not be read.
    #[error("unreadable trust policy for role {role}: {reason}")]
    TrustPolicy {
        /// Role whose document failed to parse.
        role: String,
        /// Parser message.
        reason: String,
    },

    /// No target group matched the requested name.
    #[error("there is no target group with the name {0}")]
    TargetGroupNotFound(String),

    /// More than one target group matched the requested name.
    #[error("there are {count} target groups with the name {name}")]
    AmbiguousTargetGroup {
        /// Requested name.
        name: String,
        /// Number of matches returned.
        count: usize,
    },

    /// The invoking credentials cannot provide an assumed role.
    #[error("credentials of kind {0} cannot provide an assumed role")]
    UnsupportedCredentials(String),

    /// Every revision number of the family is taken.
    #[error("no revision left for family {0}")]
    RevisionsExhausted(String),

    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A remote collaborator rejected or failed the call.
    #[error("{service} {operation} failed: {message}")]
    Remote {
        /// Remote service name.
        service: &'static str,
        /// Operation that was attempted.
        operation: &'static str,
        /// Message returned by the collaborator.
        message: String,
    },

    /// Serialisation error.
    #[error("serialisation error: {0}")]
    Serialisation(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Create a remote call error.
    #[must_use]
    pub fn remote(
        service: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            service,
            operation,
            message: message.into(),
        }
    }

    /// Create a spec validation error with a single problem.
    #[must_use]
    pub fn invalid_spec(problem: impl Into<String>) -> Self {
        Self::InvalidSpec(vec![problem.into()])
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true for errors caused by the request or its environment
    /// rather than by a remote collaborator.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpec(_)
                | Self::UntrustedRole { .. }
                | Self::TrustPolicy { .. }
                | Self::TargetGroupNotFound(_)
                | Self::AmbiguousTargetGroup { .. }
                | Self::UnsupportedCredentials(_)
                | Self::RevisionsExhausted(_)
                | Self::Config(_)
        )
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialisation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_are_not_configuration() {
        let err = DeployError::remote("ecs", "CreateService", "throttled");
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "ecs CreateService failed: throttled");
    }

    #[test]
    fn invalid_spec_lists_every_problem() {
        let err = DeployError::InvalidSpec(vec!["a".to_owned(), "b".to_owned()]);
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "invalid service spec: a; b");
    }

    #[test]
    fn target_group_messages() {
        let missing = DeployError::TargetGroupNotFound("web".to_owned());
        assert_eq!(missing.to_string(), "there is no target group with the name web");

        let ambiguous = DeployError::AmbiguousTargetGroup {
            name: "web".to_owned(),
            count: 2,
        };
        assert!(ambiguous.is_configuration());
        assert_eq!(
            ambiguous.to_string(),
            "there are 2 target groups with the name web"
        );
    }
}
