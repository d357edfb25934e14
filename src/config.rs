//! Document settings
//!
//! Global document state (format version, leader/trailer text, shared service
//! definitions) can be kept in a JSON settings file instead of code. Loading
//! runs every service through the registry, so a settings file gets the same
//! validation as builder calls.
//!
//! ```json
//! {
//!   "version": 5,
//!   "leader_lines": ["FIREHOL_LOG_MODE=\"ULOG\""],
//!   "services": [
//!     { "name": "webapp", "server_ports": ["tcp/8080", "tcp/8443"] }
//!   ]
//! }
//! ```

use crate::core::document::{DEFAULT_VERSION, Document};
use crate::core::error::Result;
use crate::core::services::{DEFAULT_CLIENT_PORTS, ServiceDefinition};
use serde::{Deserialize, Serialize};

/// Settings applied to a new [`Document`] before any blocks are built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub leader_lines: Vec<String>,
    #[serde(default)]
    pub trailer_lines: Vec<String>,
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            leader_lines: Vec::new(),
            trailer_lines: Vec::new(),
            services: Vec::new(),
        }
    }
}

/// One service definition as stored in a settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub server_ports: Vec<String>,
    /// Defaults to `["default"]`
    #[serde(default = "default_client_ports")]
    pub client_ports: Vec<String>,
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

fn default_client_ports() -> Vec<String> {
    vec![DEFAULT_CLIENT_PORTS.to_string()]
}

impl From<&ServiceDefinition> for ServiceConfig {
    fn from(def: &ServiceDefinition) -> Self {
        Self {
            name: def.name().to_string(),
            server_ports: def.server_ports().map(str::to_string).collect(),
            client_ports: def.client_ports().map(str::to_string).collect(),
        }
    }
}

impl From<ServiceDefinition> for ServiceConfig {
    fn from(def: ServiceDefinition) -> Self {
        Self::from(&def)
    }
}

impl DocumentConfig {
    /// Parses settings from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed or has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes settings as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Captures the global state of an existing document (blocks are not included).
    pub fn from_document(doc: &Document) -> Self {
        Self {
            version: doc.version(),
            leader_lines: doc.leader_lines().to_vec(),
            trailer_lines: doc.trailer_lines().to_vec(),
            services: doc
                .services()
                .definitions()
                .map(ServiceConfig::from)
                .collect(),
        }
    }
}

impl Document {
    /// Creates a document from settings.
    ///
    /// # Errors
    ///
    /// Returns the first registry error (`InvalidName` or `Conflict`) raised
    /// while defining the configured services.
    pub fn from_config(config: &DocumentConfig) -> Result<Self> {
        let mut doc = Document::new().with_version(config.version);

        for line in &config.leader_lines {
            doc.push_leader_line(line.as_str());
        }
        for line in &config.trailer_lines {
            doc.push_trailer_line(line.as_str());
        }
        for service in &config.services {
            doc.define_service(
                &service.name,
                service.server_ports.as_slice(),
                service.client_ports.as_slice(),
            )?;
        }

        tracing::debug!(
            "Document created from config with {} services",
            config.services.len()
        );
        Ok(doc)
    }
}
