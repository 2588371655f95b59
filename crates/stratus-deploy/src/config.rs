//! Configuration for stratus.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{DeployError, DeployResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Identity settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Revision numbering settings.
    #[serde(default)]
    pub versioning: VersioningConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeployConfig {
    /// Load configuration from the default sources.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `stratus.toml` in the current directory (if present)
    /// 3. Environment variables with `STRATUS_` prefix
    pub fn load() -> DeployResult<Self> {
        Self::from_file("stratus.toml")
    }

    /// Load configuration from a specific TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DeployResult<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("STRATUS_").split("__"))
            .extract()
            .map_err(|e| DeployError::Config(e.to_string()))
    }
}

/// Identity settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Partition used when building role ARNs.
    #[serde(default = "default_partition")]
    pub partition: String,
}

fn default_partition() -> String {
    "aws".to_owned()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            partition: default_partition(),
        }
    }
}

/// Revision numbering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// How existing service names are matched against the family.
    #[serde(default)]
    pub family_match: FamilyMatch,
}

/// Rule deciding whether an existing service belongs to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyMatch {
    /// The identifier contains the family name anywhere.
    ///
    /// Family `app-x` also matches `app-x2-v0003`.
    #[default]
    Contains,

    /// The service name is `<family>-<suffix>` with no further `-`.
    Strict,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "stratus_deploy=info,stratus_cli=info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}
