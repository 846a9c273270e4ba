//! Provider configuration.
//!
//! Built once at startup and passed by reference to the pipeline; nothing in
//! the crate mutates it afterwards.

use crate::error::{Error, Result};
use std::env;
use std::fmt;

/// Environment variable holding the provider region.
pub const ENV_REGION: &str = "UNTEXTRACT_REGION";
/// Environment variable holding the storage bucket.
pub const ENV_BUCKET: &str = "UNTEXTRACT_BUCKET";
/// Environment variable holding the object key prefix.
pub const ENV_PREFIX: &str = "UNTEXTRACT_PREFIX";
/// Environment variable holding the access key id.
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Provider credentials. `Debug` output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Read-only configuration shared by all jobs of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider region
    pub region: String,

    /// Storage bucket for uploaded documents
    pub bucket: String,

    /// Key prefix for uploaded documents
    pub prefix: String,

    /// Explicit credentials; `None` defers to the provider's default chain
    pub credentials: Option<Credentials>,

    /// Delete uploaded documents after a successful run
    pub cleanup_uploads: bool,
}

impl ProviderConfig {
    /// Create a configuration for a region and bucket.
    pub fn new(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            bucket: bucket.into(),
            prefix: String::new(),
            credentials: None,
            cleanup_uploads: false,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", key)))
        };

        let mut config = Self::new(required(ENV_REGION)?, required(ENV_BUCKET)?);
        if let Some(prefix) = lookup(ENV_PREFIX) {
            config = config.with_prefix(prefix);
        }
        if let (Some(id), Some(secret)) = (lookup(ENV_ACCESS_KEY_ID), lookup(ENV_SECRET_ACCESS_KEY)) {
            config = config.with_credentials(id, secret);
        }
        Ok(config)
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        });
        self
    }

    /// Enable or disable deleting uploads after a successful run.
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup_uploads = cleanup;
        self
    }

    /// Storage destination for an uploaded document name.
    pub fn destination(&self, name: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", self.bucket, name)
        } else {
            format!("{}/{}/{}", self.bucket, prefix, name)
        }
    }
}
