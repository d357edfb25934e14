//! Node kind declarations
//!
//! Every element of a configuration tree has a [`NodeKind`]. The kind alone
//! decides the keyword it emits, which parents may host it, and whether a
//! parent may hold several of it. These declarations are static data; the
//! [`capabilities`](super::capabilities) table is derived from them once.

/// How many children of one kind a container may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Any number per container (`add_*` operations)
    Append,
    /// At most one per container (`set_*` operations)
    SetOnce,
}

impl Cardinality {
    /// Verb used to name the builder operation.
    pub const fn verb(self) -> &'static str {
        match self {
            Cardinality::Append => "add",
            Cardinality::SetOnce => "set",
        }
    }
}

/// Every kind of element in a configuration tree.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum NodeKind {
    /// The document root; hosts top-level blocks and service definitions
    #[strum(serialize = "document")]
    Document,
    #[strum(serialize = "interface")]
    Interface,
    #[strum(serialize = "router")]
    Router,
    /// Anonymous container sharing rule parameters across its children
    #[strum(serialize = "group")]
    Group,
    #[strum(serialize = "policy")]
    Policy,
    #[strum(serialize = "protection")]
    Protection,
    #[strum(serialize = "server")]
    Server,
    #[strum(serialize = "client")]
    Client,
    /// Produced only by the service registry, never through a builder operation
    #[strum(serialize = "service")]
    Service,
}

const CONTAINERS: &[NodeKind] = &[NodeKind::Interface, NodeKind::Router, NodeKind::Group];
const ROOT: &[NodeKind] = &[NodeKind::Document];

impl NodeKind {
    /// Keyword this kind emits, or `None` for kinds that get no builder operation.
    pub const fn label(self) -> Option<&'static str> {
        match self {
            NodeKind::Document | NodeKind::Service => None,
            NodeKind::Interface => Some("interface"),
            NodeKind::Router => Some("router"),
            NodeKind::Group => Some("group"),
            NodeKind::Policy => Some("policy"),
            NodeKind::Protection => Some("protection"),
            NodeKind::Server => Some("server"),
            NodeKind::Client => Some("client"),
        }
    }

    /// Parent kinds that may host this kind.
    pub const fn attachable_to(self) -> &'static [NodeKind] {
        match self {
            NodeKind::Document => &[],
            NodeKind::Interface | NodeKind::Router | NodeKind::Service => ROOT,
            NodeKind::Group
            | NodeKind::Policy
            | NodeKind::Protection
            | NodeKind::Server
            | NodeKind::Client => CONTAINERS,
        }
    }

    pub const fn cardinality(self) -> Cardinality {
        match self {
            NodeKind::Policy | NodeKind::Protection => Cardinality::SetOnce,
            _ => Cardinality::Append,
        }
    }

    /// Returns `true` for kinds that own children and add a nesting level.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Interface | NodeKind::Router | NodeKind::Group
        )
    }

    pub const fn declaration(self) -> KindDeclaration {
        KindDeclaration {
            kind: self,
            label: self.label(),
            attachable_to: self.attachable_to(),
            cardinality: self.cardinality(),
        }
    }
}

/// The static facts a kind declares about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDeclaration {
    pub kind: NodeKind,
    pub label: Option<&'static str>,
    pub attachable_to: &'static [NodeKind],
    pub cardinality: Cardinality,
}

impl KindDeclaration {
    /// Name of the builder operation this declaration registers, if any.
    pub fn operation_name(&self) -> Option<String> {
        self.label
            .map(|label| format!("{}_{}", self.cardinality.verb(), label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_set_once_kinds() {
        assert_eq!(NodeKind::Policy.cardinality(), Cardinality::SetOnce);
        assert_eq!(NodeKind::Protection.cardinality(), Cardinality::SetOnce);
        assert_eq!(NodeKind::Server.cardinality(), Cardinality::Append);
        assert_eq!(NodeKind::Group.cardinality(), Cardinality::Append);
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(
            NodeKind::Policy.declaration().operation_name().as_deref(),
            Some("set_policy")
        );
        assert_eq!(
            NodeKind::Interface.declaration().operation_name().as_deref(),
            Some("add_interface")
        );
        assert_eq!(NodeKind::Service.declaration().operation_name(), None);
    }

    #[test]
    fn test_only_blocks_host_stanzas() {
        for kind in NodeKind::iter() {
            for parent in kind.attachable_to() {
                assert!(
                    parent.is_container() || *parent == NodeKind::Document,
                    "{kind} declares non-container parent {parent}"
                );
            }
        }
    }

    #[test]
    fn test_labels_match_display() {
        for kind in NodeKind::iter() {
            if let Some(label) = kind.label() {
                assert_eq!(label, kind.as_ref());
            }
        }
    }
}
