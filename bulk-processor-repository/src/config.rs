//! Configuration types for backend clients.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::elastic::v6::DEFAULT_DOC_TYPE;
use crate::errors::ClientError;

/// Default cluster URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Supported backend major versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElasticVersion {
    V6,
    V7,
}

impl ElasticVersion {
    pub fn major(&self) -> u32 {
        match self {
            Self::V6 => 6,
            Self::V7 => 7,
        }
    }
}

impl fmt::Display for ElasticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.major())
    }
}

impl FromStr for ElasticVersion {
    type Err = ClientError;

    /// Accepts `6`, `v7`, or a full version number such as `7.10.2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let major = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed)
            .split('.')
            .next()
            .unwrap_or_default();

        match major {
            "6" => Ok(Self::V6),
            "7" => Ok(Self::V7),
            _ => Err(ClientError::unsupported_version(s)),
        }
    }
}

/// Connection settings for a backend cluster.
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub url: String,
    /// Major version to use. Detected from the cluster when `None`.
    pub version: Option<ElasticVersion>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Mapping type written by 6.x adapters.
    pub doc_type: String,
    pub request_timeout: Option<Duration>,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            version: None,
            username: None,
            password: None,
            doc_type: DEFAULT_DOC_TYPE.to_string(),
            request_timeout: None,
        }
    }
}

impl ElasticConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: ElasticVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Credentials, when a username is set. A missing password is sent empty.
    pub fn basic_auth(&self) -> Option<(String, String)> {
        self.username
            .clone()
            .map(|username| (username, self.password.clone().unwrap_or_default()))
    }
}
