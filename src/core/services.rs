//! Service registry
//!
//! FireHOL ships a set of named services (`ssh`, `smtp`, ...) and lets a
//! configuration add its own by assigning `server_<name>_ports` and
//! `client_<name>_ports` shell variables. [`ServiceRegistry`] tracks both so that
//! server/client stanzas can be checked at construction time.
//!
//! # Redefinition
//!
//! Defining a name twice is allowed only when both definitions are identical.
//! Port tokens are sorted before comparison, so `["tcp/443", "tcp/80"]` and
//! `["tcp/80", "tcp/443"]` are the same definition.

use super::error::{Error, Result};
use super::node::Line;
use super::tokens::Tokens;
use crate::config::ServiceConfig;
use crate::validators::validate_name;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Client port specification used when none is given.
pub const DEFAULT_CLIENT_PORTS: &str = "default";

/// Services FireHOL knows without a definition, plus the `any`/`anystateless`/`all` sentinels.
#[rustfmt::skip]
pub const PREDEFINED_SERVICES: &[&str] = &[
    "any", "anystateless", "all",
    "AH", "apcupsd", "apcupsdnis", "aptproxy", "asterisk", "cups",
    "cvspserver", "darkstat", "daytime", "dcc", "dcpp", "dhcprelay", "dict",
    "distcc", "dns", "echo", "eserver", "ESP", "finger", "gift", "giftui",
    "gkrellmd", "GRE", "h323", "heartbeat", "http", "https", "iax", "iax2",
    "icmp", "ICMP", "icp", "ident", "imap", "imaps", "irc", "isakmp",
    "jabber", "jabberd", "ldap", "ldaps", "lpd", "mms", "msn", "msnp",
    "mysql", "netbackup", "nntp", "nntps", "ntp", "nut", "nxserver", "openvpn",
    "oracle", "OSPF", "pop3", "pop3s", "portmap", "postgres", "privoxy",
    "radius", "radiusold", "radiusoldproxy", "radiusproxy", "rdp", "rndc",
    "rsync", "rtp", "sip", "smtp", "smtps", "snmp", "snmptrap", "socks",
    "squid", "ssh", "stun", "submission", "sunrpc", "swat", "syslog", "telnet",
    "time", "upnp", "uucp", "vmware", "vmwareauth", "vmwareweb", "vnc",
    "webcache", "webmin", "whois", "xdmcp",
];

/// A user-defined service: a name plus server-side and client-side port specs.
///
/// Ordering is lexicographic on `(name, server_ports, client_ports)`, which is
/// also the order definitions are emitted in. Deserialization goes through
/// [`ServiceDefinition::new`], so names are validated either way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ServiceConfig", into = "ServiceConfig")]
pub struct ServiceDefinition {
    name: String,
    server_ports: BTreeSet<String>,
    client_ports: BTreeSet<String>,
}

impl ServiceDefinition {
    /// Builds a definition after validating `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is not a valid service name.
    pub fn new(
        name: &str,
        server_ports: impl Into<Tokens>,
        client_ports: impl Into<Tokens>,
    ) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            server_ports: server_ports.into().into_iter().collect(),
            client_ports: client_ports.into().into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn server_ports(&self) -> impl Iterator<Item = &str> {
        self.server_ports.iter().map(String::as_str)
    }

    pub fn client_ports(&self) -> impl Iterator<Item = &str> {
        self.client_ports.iter().map(String::as_str)
    }

    /// The two shell assignments FireHOL reads for this service.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        let server = format!("server_{}_ports=\"{}\"", self.name, join(&self.server_ports));
        let client = format!("client_{}_ports=\"{}\"", self.name, join(&self.client_ports));
        [(0_usize, Cow::Owned(server)), (0, Cow::Owned(client))].into_iter()
    }
}

impl TryFrom<ServiceConfig> for ServiceDefinition {
    type Error = Error;

    fn try_from(config: ServiceConfig) -> Result<Self> {
        Self::new(&config.name, config.server_ports, config.client_ports)
    }
}

impl fmt::Display for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] [{}]",
            self.name,
            join(&self.server_ports),
            join(&self.client_ports)
        )
    }
}

fn join(ports: &BTreeSet<String>) -> String {
    ports.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

/// Predefined and user-defined services known to one document.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    definitions: BTreeMap<String, ServiceDefinition>,
    known: BTreeSet<String>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
            known: PREDEFINED_SERVICES.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Returns `true` if `name` is one of FireHOL's built-in services.
    pub fn is_predefined(name: &str) -> bool {
        PREDEFINED_SERVICES.contains(&name)
    }

    /// Defines a service, or confirms an identical existing definition.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidName`] if `name` is not a valid service name
    /// - [`Error::Conflict`] if `name` is already known with a different definition,
    ///   or is a predefined service
    pub fn define(
        &mut self,
        name: &str,
        server_ports: impl Into<Tokens>,
        client_ports: impl Into<Tokens>,
    ) -> Result<&ServiceDefinition> {
        let candidate = ServiceDefinition::new(name, server_ports, client_ports)?;

        if self.known.contains(name) {
            return match self.definitions.get(name) {
                Some(existing) if *existing == candidate => {
                    tracing::debug!("Service {name} redefined identically");
                    Ok(existing)
                }
                Some(existing) => {
                    tracing::warn!("Conflicting definition for service {name}");
                    Err(Error::Conflict {
                        name: name.to_string(),
                        existing: existing.to_string(),
                        candidate: candidate.to_string(),
                    })
                }
                None => {
                    tracing::warn!("Attempt to redefine builtin service {name}");
                    Err(Error::Conflict {
                        name: name.to_string(),
                        existing: "builtin service".to_string(),
                        candidate: candidate.to_string(),
                    })
                }
            };
        }

        tracing::info!("Defined service {candidate}");
        self.known.insert(name.to_string());
        Ok(self.definitions.entry(name.to_string()).or_insert(candidate))
    }

    /// Returns `true` if a server/client stanza may reference `name`.
    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Checks that every service in `services` is known.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedService`] naming the first unknown service.
    pub fn require_all(&self, services: &Tokens) -> Result<()> {
        match services.iter().find(|s| !self.is_known(s)) {
            Some(missing) => {
                tracing::warn!("Reference to undefined service {missing}");
                Err(Error::UndefinedService(missing.clone()))
            }
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDefinition> {
        self.definitions.get(name)
    }

    /// User definitions in emission order.
    ///
    /// Names are unique, so name order equals `(name, server, client)` order.
    pub fn definitions(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.definitions.values()
    }

    /// Number of user definitions (predefined services are not counted).
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
