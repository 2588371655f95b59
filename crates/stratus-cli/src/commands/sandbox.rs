//! Sandbox state files.
//!
//! A sandbox file holds everything the in-memory cloud needs to stand in for
//! a real account: its settings, the credentials the deployment acts with,
//! and a snapshot of the existing resources.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stratus_deploy::{
    AccountCredentials, CredentialSource, DeployError, MemoryCloud, SandboxSettings, SandboxState,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("failed to read sandbox file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write sandbox file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid sandbox file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Cloud(#[from] DeployError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxFile {
    #[serde(default)]
    pub settings: SandboxSettings,

    pub credentials: CredentialSource,

    #[serde(default)]
    pub state: SandboxState,
}

impl SandboxFile {
    pub async fn load(path: &Path) -> Result<Self, SandboxError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SandboxError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|source| SandboxError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn save(&self, path: &Path) -> Result<(), SandboxError> {
        let contents = serde_json::to_string_pretty(self).map_err(|source| SandboxError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tokio::fs::write(path, contents)
            .await
            .map_err(|source| SandboxError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Stand up the in-memory cloud and the credentials it is used with.
    pub fn open(&self) -> (Arc<MemoryCloud>, Arc<dyn AccountCredentials>) {
        let cloud = MemoryCloud::with_state(self.settings.clone(), self.state.clone());
        (Arc::new(cloud), self.credentials.clone().into_credentials())
    }

    /// Replace the stored snapshot with the cloud's current contents.
    pub fn capture(&mut self, cloud: &MemoryCloud) -> Result<(), SandboxError> {
        self.state = cloud.snapshot()?;
        Ok(())
    }
}
