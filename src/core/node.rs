//! Configuration tree nodes
//!
//! A tree is made of [`Block`]s (interfaces, routers, groups) that own an
//! ordered list of children, and [`Stanza`]s, single-line directives that
//! never have children. All validation happens in the constructors; once a
//! node exists it can always be emitted.
//!
//! # Line projection
//!
//! [`Node::lines`] yields `(indent, text)` pairs relative to the node itself.
//! Blocks add one indent level to everything their children yield. The
//! iterator is lazy and can be requested again at any time to restart.

use super::error::{Error, Result};
use super::kinds::NodeKind;
use super::services::ServiceRegistry;
use super::tokens::Tokens;
use crate::validators::validate_name;
use std::borrow::Cow;
use std::iter;

/// One emitted line: nesting depth and text.
pub type Line<'a> = (usize, Cow<'a, str>);

/// Boxed line iterator, needed because blocks recurse into their children.
pub type Lines<'a> = Box<dyn Iterator<Item = Line<'a>> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Block(Block),
    Stanza(Stanza),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Block(block) => block.kind,
            Node::Stanza(stanza) => stanza.kind,
        }
    }

    pub fn lines(&self) -> Lines<'_> {
        match self {
            Node::Block(block) => block.lines(),
            Node::Stanza(stanza) => Box::new(stanza.lines()),
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Stanza(_) => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Stanza(_) => None,
        }
    }

    pub fn as_stanza(&self) -> Option<&Stanza> {
        match self {
            Node::Block(_) => None,
            Node::Stanza(stanza) => Some(stanza),
        }
    }
}

/// A container: interface, router, or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: NodeKind,
    name: Option<String>,
    /// Header fragment between the label and the name
    before_name: String,
    /// Header fragment after the name
    after_name: String,
    rule_params: Tokens,
    children: Vec<Node>,
}

impl Block {
    /// `interface "<devices>" <name>`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if `name` is invalid.
    pub fn interface(name: &str, devices: impl Into<Tokens>) -> Result<Self> {
        validate_name(name)?;
        let devices = devices.into();
        Ok(Self {
            kind: NodeKind::Interface,
            name: Some(name.to_string()),
            before_name: format!("\"{}\"", devices.joined()),
            after_name: String::new(),
            rule_params: Tokens::none(),
            children: Vec::new(),
        })
    }

    /// `router <name> <rule params>`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidName` if `name` is invalid.
    pub fn router(name: &str, rule_params: impl Into<Tokens>) -> Result<Self> {
        validate_name(name)?;
        let rule_params = rule_params.into();
        Ok(Self {
            kind: NodeKind::Router,
            name: Some(name.to_string()),
            before_name: String::new(),
            after_name: rule_params.joined(),
            rule_params,
            children: Vec::new(),
        })
    }

    /// Anonymous group sharing `rule_params` (e.g. `src 10.0.0.0/8`).
    pub fn group(rule_params: impl Into<Tokens>) -> Self {
        Self {
            kind: NodeKind::Group,
            name: None,
            before_name: String::new(),
            after_name: String::new(),
            rule_params: rule_params.into(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rule_params(&self) -> &Tokens {
        &self.rule_params
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Header line for interfaces and routers; empty fragments are skipped.
    fn header(&self) -> String {
        join_fragments([
            self.kind.as_ref(),
            self.before_name.as_str(),
            self.name.as_deref().unwrap_or_default(),
            self.after_name.as_str(),
        ])
    }

    fn body(&self) -> impl Iterator<Item = Line<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.lines().map(|(indent, text)| (indent + 1, text)))
    }

    pub fn lines(&self) -> Lines<'_> {
        if self.kind == NodeKind::Group {
            // An empty group is transparent
            if self.children.is_empty() {
                return Box::new(iter::empty());
            }
            // A group without rule params opens with a bare `group with`
            let open = join_fragments(["group with", self.rule_params.joined().as_str()]);
            return Box::new(
                iter::once((0, Cow::Owned(open)))
                    .chain(self.body())
                    .chain(iter::once((0, Cow::Borrowed("group end")))),
            );
        }

        Box::new(iter::once((0, Cow::Owned(self.header()))).chain(self.body()))
    }
}

/// A single-line directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    kind: NodeKind,
    text: String,
}

impl Stanza {
    /// `policy <action>`
    pub fn policy(action: &str) -> Self {
        Self::simple(NodeKind::Policy, action)
    }

    /// `protection <level>`
    pub fn protection(level: &str) -> Self {
        Self::simple(NodeKind::Protection, level)
    }

    /// `server <services> <action> <rule params>`
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingServices` for an empty service list, or
    /// `Error::UndefinedService` if any service is unknown to `registry`.
    pub fn server(
        registry: &ServiceRegistry,
        services: impl Into<Tokens>,
        action: &str,
        rule_params: impl Into<Tokens>,
    ) -> Result<Self> {
        let (services, rule_params) = (services.into(), rule_params.into());
        Self::service_rule(NodeKind::Server, registry, services, action, &rule_params)
    }

    /// `client <services> <action> <rule params>`
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingServices` for an empty service list, or
    /// `Error::UndefinedService` if any service is unknown to `registry`.
    pub fn client(
        registry: &ServiceRegistry,
        services: impl Into<Tokens>,
        action: &str,
        rule_params: impl Into<Tokens>,
    ) -> Result<Self> {
        let (services, rule_params) = (services.into(), rule_params.into());
        Self::service_rule(NodeKind::Client, registry, services, action, &rule_params)
    }

    fn simple(kind: NodeKind, argument: &str) -> Self {
        Self {
            kind,
            text: format!("{kind} {argument}"),
        }
    }

    fn service_rule(
        kind: NodeKind,
        registry: &ServiceRegistry,
        services: Tokens,
        action: &str,
        rule_params: &Tokens,
    ) -> Result<Self> {
        if services.is_empty() {
            return Err(Error::MissingServices {
                kind: kind.to_string(),
            });
        }
        registry.require_all(&services)?;

        // Quote only a multi-service list
        let services = if services.len() > 1 {
            format!("\"{}\"", services.joined())
        } else {
            services.joined()
        };
        let params = rule_params.joined();

        let text = join_fragments([kind.as_ref(), services.as_str(), action, params.as_str()]);
        Ok(Self { kind, text })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        iter::once((0_usize, Cow::Borrowed(self.text.as_str())))
    }
}

/// Joins the non-empty fragments with single spaces.
fn join_fragments<const N: usize>(fragments: [&str; N]) -> String {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Block(block)
    }
}

impl From<Stanza> for Node {
    fn from(stanza: Stanza) -> Self {
        Node::Stanza(stanza)
    }
}
