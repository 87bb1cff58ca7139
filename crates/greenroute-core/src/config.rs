use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, RouteError};
use crate::protocol::ProtocolVersion;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "GREENROUTE_BASE_URL";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub protocol: ProtocolVersion,
    pub timeouts: TimeoutConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            protocol: ProtocolVersion::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Applies an override, trimming a trailing slash so paths join cleanly.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RouteError::config(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        self.timeouts.validate()
    }
}

/// Per-call timeouts in seconds.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    pub legacy_authenticate_secs: u64,
    pub authenticate_secs: u64,
    pub request_secs: u64,
    pub photo_upload_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            legacy_authenticate_secs: 12,
            authenticate_secs: 30,
            request_secs: 30,
            photo_upload_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn legacy_authenticate(&self) -> Duration {
        Duration::from_secs(self.legacy_authenticate_secs)
    }

    pub fn authenticate(&self) -> Duration {
        Duration::from_secs(self.authenticate_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn photo_upload(&self) -> Duration {
        Duration::from_secs(self.photo_upload_secs)
    }

    fn validate(&self) -> Result<()> {
        let all = [
            ("legacy_authenticate_secs", self.legacy_authenticate_secs),
            ("authenticate_secs", self.authenticate_secs),
            ("request_secs", self.request_secs),
            ("photo_upload_secs", self.photo_upload_secs),
        ];
        match all.iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(RouteError::config(format!("{name} must be positive"))),
            None => Ok(()),
        }
    }
}
