//! Runtime configuration for the bridge.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::messenger::WireEncoding;

/// Default time a wallet gets to answer a signing prompt
pub const DEFAULT_SIGNING_TIMEOUT_MS: u64 = 120_000;

/// Default upper bound on recipients per encrypt request
pub const DEFAULT_MAX_RECIPIENTS: usize = 256;

/// Configuration for a [`crate::bridge::Bridge`]
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommsConfig {
    /// How long to wait for the wallet before treating the request as
    /// rejected. `None` waits indefinitely.
    pub signing_timeout_ms: Option<u64>,
    /// Encoding of envelope fields in both directions
    pub wire_encoding: WireEncoding,
    /// Largest recipient list accepted by one encrypt request
    pub max_recipients: usize,
}

impl Default for CommsConfig {
    fn default() -> Self {
        Self {
            signing_timeout_ms: Some(DEFAULT_SIGNING_TIMEOUT_MS),
            wire_encoding: WireEncoding::default(),
            max_recipients: DEFAULT_MAX_RECIPIENTS,
        }
    }
}

impl CommsConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidRequest(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> Result<()> {
        if self.max_recipients == 0 {
            return Err(Error::InvalidRequest(
                "config: max_recipients must be at least 1".into(),
            ));
        }
        if self.signing_timeout_ms == Some(0) {
            return Err(Error::InvalidRequest(
                "config: signing_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The signing timeout as a `Duration`
    pub fn signing_timeout(&self) -> Option<Duration> {
        self.signing_timeout_ms.map(Duration::from_millis)
    }
}
