//! Document root
//!
//! A [`Document`] is one complete FireHOL configuration: the format version,
//! raw leader/trailer text, user service definitions, and the ordered list of
//! top-level interface and router blocks.
//!
//! The document is mutated only while it is being built. Emission borrows it
//! immutably, so a fully built document can be emitted any number of times.

use super::builder::{BlockMut, NodeSpec, attach};
use super::error::{Error, Result};
use super::kinds::NodeKind;
use super::node::{Block, Node};
use super::services::{DEFAULT_CLIENT_PORTS, ServiceDefinition, ServiceRegistry};
use super::tokens::Tokens;
use std::fmt;

/// FireHOL configuration format version written by default.
pub const DEFAULT_VERSION: u32 = 5;

#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Node>,
    services: ServiceRegistry,
    leader_lines: Vec<String>,
    trailer_lines: Vec<String>,
    version: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            services: ServiceRegistry::new(),
            leader_lines: Vec::new(),
            trailer_lines: Vec::new(),
            version: DEFAULT_VERSION,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Appends a raw line emitted right after the version header.
    pub fn push_leader_line(&mut self, line: impl Into<String>) {
        self.leader_lines.push(line.into());
    }

    /// Appends a raw line emitted at the very end of the configuration.
    pub fn push_trailer_line(&mut self, line: impl Into<String>) {
        self.trailer_lines.push(line.into());
    }

    pub fn leader_lines(&self) -> &[String] {
        &self.leader_lines
    }

    pub fn trailer_lines(&self) -> &[String] {
        &self.trailer_lines
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Defines a service usable by later server/client stanzas.
    ///
    /// # Errors
    ///
    /// See [`ServiceRegistry::define`].
    pub fn define_service(
        &mut self,
        name: &str,
        server_ports: impl Into<Tokens>,
        client_ports: impl Into<Tokens>,
    ) -> Result<&ServiceDefinition> {
        self.services.define(name, server_ports, client_ports)
    }

    /// Defines a service whose client side uses FireHOL's `default` ports.
    ///
    /// # Errors
    ///
    /// See [`ServiceRegistry::define`].
    pub fn define_service_default_client(
        &mut self,
        name: &str,
        server_ports: impl Into<Tokens>,
    ) -> Result<&ServiceDefinition> {
        self.services.define(name, server_ports, DEFAULT_CLIENT_PORTS)
    }

    /// Runs a root-level builder operation (`add_interface` or `add_router`).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedOperation` for any other operation, or the
    /// block constructor's error.
    pub fn attach(&mut self, operation: &str, spec: NodeSpec) -> Result<BlockMut<'_>> {
        let node = attach(
            NodeKind::Document,
            &mut self.blocks,
            &self.services,
            operation,
            spec,
        )?;
        let block = node
            .as_block_mut()
            .ok_or_else(|| Error::UnsupportedOperation {
                parent: NodeKind::Document.to_string(),
                operation: operation.to_string(),
            })?;
        Ok(BlockMut::new(block, &self.services))
    }

    /// Adds `interface "<devices>" <name>` and returns a builder for it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if `name` is invalid.
    pub fn add_interface(
        &mut self,
        name: &str,
        devices: impl Into<Tokens>,
    ) -> Result<BlockMut<'_>> {
        let spec = NodeSpec::Interface {
            name: name.to_string(),
            devices: devices.into(),
        };
        self.attach("add_interface", spec)
    }

    /// Adds `router <name> <rule params>` and returns a builder for it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if `name` is invalid.
    pub fn add_router(
        &mut self,
        name: &str,
        rule_params: impl Into<Tokens>,
    ) -> Result<BlockMut<'_>> {
        let spec = NodeSpec::Router {
            name: name.to_string(),
            rule_params: rule_params.into(),
        };
        self.attach("add_router", spec)
    }

    /// Top-level blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter_map(Node::as_block)
    }

    /// Re-opens the top-level block at `index` for further building.
    pub fn block_mut(&mut self, index: usize) -> Option<BlockMut<'_>> {
        let block = self.blocks.get_mut(index).and_then(Node::as_block_mut)?;
        Some(BlockMut::new(block, &self.services))
    }

    /// Finds a top-level block by name.
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.blocks().find(|block| block.name() == Some(name))
    }

    pub(crate) fn top_level(&self) -> &[Node] {
        &self.blocks
    }

    /// Renders the configuration text.
    pub fn emit(&self) -> String {
        super::emit::render(self)
    }

    /// Writes the configuration text to `out`.
    ///
    /// # Errors
    ///
    /// Returns the writer's error; emission itself cannot fail.
    pub fn write_to(&self, out: &mut impl fmt::Write) -> fmt::Result {
        super::emit::write_document(self, out)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let doc = Document::new();
        assert_eq!(doc.version(), 5);
        assert!(doc.leader_lines().is_empty());
        assert!(doc.trailer_lines().is_empty());
        assert_eq!(doc.blocks().count(), 0);
        assert!(doc.services().is_known("ssh"));
    }

    #[test]
    fn test_blocks_keep_insertion_order() {
        let mut doc = Document::new();
        doc.add_router("zeta", Tokens::none()).unwrap();
        doc.add_interface("alpha", "eth0").unwrap();
        let names: Vec<_> = doc.blocks().filter_map(Block::name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_invalid_interface_not_attached() {
        let mut doc = Document::new();
        let err = doc.add_interface("bad-name", "eth0").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert_eq!(doc.blocks().count(), 0);
    }

    #[test]
    fn test_root_rejects_stanza_operations() {
        let mut doc = Document::new();
        let err = doc
            .attach(
                "set_policy",
                NodeSpec::Policy {
                    action: "accept".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_defined_service_usable_in_stanzas() {
        let mut doc = Document::new();
        doc.define_service_default_client("webapp", ["tcp/8080", "tcp/8443"])
            .unwrap();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        iface.add_server("webapp", "accept").unwrap();
    }

    #[test]
    fn test_block_mut_reopens_interface() {
        let mut doc = Document::new();
        doc.add_interface("lan", "eth0").unwrap();
        doc.block_mut(0).unwrap().set_policy("drop").unwrap();
        assert_eq!(doc.find_block("lan").unwrap().children().len(), 1);
        assert!(doc.block_mut(1).is_none());
    }
}
