//! Fluent builder operations
//!
//! Every "add a child of kind X to a parent of kind Y" call goes through
//! [`attach`], which consults the [capability table](super::capabilities)
//! instead of per-pair glue code. [`BlockMut`] wraps a container together with
//! a shared reference to the document's service registry, so nested builders
//! can validate service names without owning anything above them.
//!
//! # Example
//!
//! ```
//! use firehol_builder::Document;
//!
//! let mut doc = Document::new();
//! let mut lan = doc.add_interface("lan", "eth1").unwrap();
//! lan.set_policy("accept").unwrap();
//! let mut trusted = lan.add_group("src 10.0.0.0/8").unwrap();
//! trusted.add_server("ssh", "accept").unwrap();
//! assert!(doc.emit().contains("    server ssh accept\n"));
//! ```

use super::capabilities::capabilities;
use super::error::{Error, Result};
use super::kinds::{Cardinality, NodeKind};
use super::node::{Block, Node, Stanza};
use super::services::ServiceRegistry;
use super::tokens::Tokens;

/// Constructor arguments for every kind reachable through a builder operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSpec {
    Interface {
        name: String,
        devices: Tokens,
    },
    Router {
        name: String,
        rule_params: Tokens,
    },
    Group {
        rule_params: Tokens,
    },
    Policy {
        action: String,
    },
    Protection {
        level: String,
    },
    Server {
        services: Tokens,
        action: String,
        rule_params: Tokens,
    },
    Client {
        services: Tokens,
        action: String,
        rule_params: Tokens,
    },
}

impl NodeSpec {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeSpec::Interface { .. } => NodeKind::Interface,
            NodeSpec::Router { .. } => NodeKind::Router,
            NodeSpec::Group { .. } => NodeKind::Group,
            NodeSpec::Policy { .. } => NodeKind::Policy,
            NodeSpec::Protection { .. } => NodeKind::Protection,
            NodeSpec::Server { .. } => NodeKind::Server,
            NodeSpec::Client { .. } => NodeKind::Client,
        }
    }

    /// Runs the kind's constructor, including all construction-time validation.
    fn build(self, services: &ServiceRegistry) -> Result<Node> {
        let node = match self {
            NodeSpec::Interface { name, devices } => Block::interface(&name, devices)?.into(),
            NodeSpec::Router { name, rule_params } => Block::router(&name, rule_params)?.into(),
            NodeSpec::Group { rule_params } => Block::group(rule_params).into(),
            NodeSpec::Policy { action } => Stanza::policy(&action).into(),
            NodeSpec::Protection { level } => Stanza::protection(&level).into(),
            NodeSpec::Server {
                services: names,
                action,
                rule_params,
            } => Stanza::server(services, names, &action, rule_params)?.into(),
            NodeSpec::Client {
                services: names,
                action,
                rule_params,
            } => Stanza::client(services, names, &action, rule_params)?.into(),
        };
        Ok(node)
    }
}

/// Constructs the child described by `spec` and appends it to `children`.
///
/// `parent` is the kind that owns `children`; `operation` must be registered
/// for it in the capability table and must construct `spec`'s kind. On any
/// error `children` is left untouched.
pub(crate) fn attach<'c>(
    parent: NodeKind,
    children: &'c mut Vec<Node>,
    services: &ServiceRegistry,
    operation: &str,
    spec: NodeSpec,
) -> Result<&'c mut Node> {
    let capability = capabilities()?.lookup(parent, operation)?;

    if capability.child != spec.kind() {
        return Err(Error::UnsupportedOperation {
            parent: parent.to_string(),
            operation: format!("{operation} with {} arguments", spec.kind()),
        });
    }

    if capability.cardinality == Cardinality::SetOnce
        && children.iter().any(|c| c.kind() == capability.child)
    {
        tracing::warn!("{} already set on {parent}", capability.child);
        return Err(Error::Cardinality {
            kind: capability.child.to_string(),
            parent: parent.to_string(),
        });
    }

    let node = spec.build(services)?;
    tracing::debug!("{parent}.{operation} -> {}", node.kind());

    let index = children.len();
    children.push(node);
    Ok(&mut children[index])
}

/// Mutable handle on one container while the tree is being built.
#[derive(Debug)]
pub struct BlockMut<'a> {
    block: &'a mut Block,
    services: &'a ServiceRegistry,
}

impl<'a> BlockMut<'a> {
    pub(crate) fn new(block: &'a mut Block, services: &'a ServiceRegistry) -> Self {
        Self { block, services }
    }

    pub fn kind(&self) -> NodeKind {
        self.block.kind()
    }

    pub fn block(&self) -> &Block {
        self.block
    }

    /// Runs any builder operation registered for this container's kind.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedOperation`] if the operation is not registered
    ///   here or does not construct `spec`'s kind
    /// - [`Error::Cardinality`] for a second `set_*` of the same kind
    /// - any construction error of the child itself
    pub fn attach(&mut self, operation: &str, spec: NodeSpec) -> Result<&mut Node> {
        attach(
            self.block.kind(),
            self.block.children_mut(),
            self.services,
            operation,
            spec,
        )
    }

    /// Adds a nested group and returns a builder for it.
    ///
    /// # Errors
    ///
    /// See [`BlockMut::attach`].
    pub fn add_group(&mut self, rule_params: impl Into<Tokens>) -> Result<BlockMut<'_>> {
        let services = self.services;
        let parent = self.block.kind();
        let node = self.attach(
            "add_group",
            NodeSpec::Group {
                rule_params: rule_params.into(),
            },
        )?;
        let block = node.as_block_mut().ok_or_else(|| Error::UnsupportedOperation {
            parent: parent.to_string(),
            operation: "add_group".to_string(),
        })?;
        Ok(BlockMut::new(block, services))
    }

    /// Sets this container's `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cardinality`] if a policy is already set.
    pub fn set_policy(&mut self, action: &str) -> Result<&Stanza> {
        let spec = NodeSpec::Policy {
            action: action.to_string(),
        };
        self.attach_stanza("set_policy", spec)
    }

    /// Sets this container's `protection` level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cardinality`] if a protection level is already set.
    pub fn set_protection(&mut self, level: &str) -> Result<&Stanza> {
        let spec = NodeSpec::Protection {
            level: level.to_string(),
        };
        self.attach_stanza("set_protection", spec)
    }

    /// Adds `server <services> <action>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedService`] if any service is unknown.
    pub fn add_server(&mut self, services: impl Into<Tokens>, action: &str) -> Result<&Stanza> {
        self.add_server_with_params(services, action, Tokens::none())
    }

    /// Adds `server <services> <action> <rule params>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedService`] if any service is unknown.
    pub fn add_server_with_params(
        &mut self,
        services: impl Into<Tokens>,
        action: &str,
        rule_params: impl Into<Tokens>,
    ) -> Result<&Stanza> {
        let spec = NodeSpec::Server {
            services: services.into(),
            action: action.to_string(),
            rule_params: rule_params.into(),
        };
        self.attach_stanza("add_server", spec)
    }

    /// Adds `client <services> <action>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedService`] if any service is unknown.
    pub fn add_client(&mut self, services: impl Into<Tokens>, action: &str) -> Result<&Stanza> {
        self.add_client_with_params(services, action, Tokens::none())
    }

    /// Adds `client <services> <action> <rule params>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedService`] if any service is unknown.
    pub fn add_client_with_params(
        &mut self,
        services: impl Into<Tokens>,
        action: &str,
        rule_params: impl Into<Tokens>,
    ) -> Result<&Stanza> {
        let spec = NodeSpec::Client {
            services: services.into(),
            action: action.to_string(),
            rule_params: rule_params.into(),
        };
        self.attach_stanza("add_client", spec)
    }

    /// Re-opens the nested container at `index` among this block's children.
    ///
    /// Returns `None` if there is no child at `index` or it is a stanza.
    pub fn block_mut(&mut self, index: usize) -> Option<BlockMut<'_>> {
        let services = self.services;
        self.block
            .children_mut()
            .get_mut(index)
            .and_then(Node::as_block_mut)
            .map(|block| BlockMut::new(block, services))
    }

    fn attach_stanza(&mut self, operation: &str, spec: NodeSpec) -> Result<&Stanza> {
        let parent = self.block.kind();
        let node = self.attach(operation, spec)?;
        node.as_stanza().ok_or_else(|| Error::UnsupportedOperation {
            parent: parent.to_string(),
            operation: operation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;

    #[test]
    fn test_second_policy_rejected() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        iface.set_policy("reject").unwrap();

        let err = iface.set_policy("accept").unwrap_err();
        assert!(matches!(err, Error::Cardinality { .. }));

        let policies: Vec<_> = iface
            .block()
            .children()
            .iter()
            .filter_map(Node::as_stanza)
            .map(Stanza::text)
            .collect();
        assert_eq!(policies, vec!["policy reject"]);
    }

    #[test]
    fn test_second_protection_rejected() {
        let mut doc = Document::new();
        let mut router = doc.add_router("r1", Tokens::none()).unwrap();
        router.set_protection("strong").unwrap();
        assert!(matches!(
            router.set_protection("weak"),
            Err(Error::Cardinality { .. })
        ));
        assert_eq!(router.block().children().len(), 1);
    }

    #[test]
    fn test_set_once_is_per_container() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        iface.set_policy("reject").unwrap();
        let mut group = iface.add_group("src 10.0.0.0/8").unwrap();
        assert!(group.set_policy("accept").is_ok());
    }

    #[test]
    fn test_multiple_servers_allowed() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        iface.add_server("ssh", "accept").unwrap();
        iface.add_server("http", "accept").unwrap();
        iface.add_client("all", "accept").unwrap();
        assert_eq!(iface.block().children().len(), 3);
    }

    #[test]
    fn test_undefined_service_leaves_block_unchanged() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        let err = iface.add_server("nosuchservice", "accept").unwrap_err();
        assert_eq!(err, Error::UndefinedService("nosuchservice".to_string()));
        assert!(iface.block().is_empty());
    }

    #[test]
    fn test_generic_attach_by_operation_name() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        let node = iface
            .attach(
                "set_protection",
                NodeSpec::Protection {
                    level: "strong".to_string(),
                },
            )
            .unwrap();
        assert_eq!(node.kind(), NodeKind::Protection);
    }

    #[test]
    fn test_unregistered_operation_rejected() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        let err = iface
            .attach(
                "add_interface",
                NodeSpec::Interface {
                    name: "nested".to_string(),
                    devices: Tokens::from("eth1"),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_operation_and_spec_must_agree() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        let err = iface
            .attach(
                "set_policy",
                NodeSpec::Protection {
                    level: "strong".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
        assert!(iface.block().is_empty());
    }

    #[test]
    fn test_block_mut_reopens_group() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        iface.set_policy("drop").unwrap();
        iface.add_group("src 192.168.0.0/16").unwrap();

        assert!(iface.block_mut(0).is_none());
        let mut group = iface.block_mut(1).unwrap();
        group.add_server("dns", "accept").unwrap();
        assert_eq!(iface.block().children()[1].as_block().unwrap().children().len(), 1);
    }
}
