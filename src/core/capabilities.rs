//! Builder capability table
//!
//! Maps `(parent kind, operation name)` to the child kind that operation
//! constructs. The table is derived from the [`NodeKind`] declarations the
//! first time it is needed and never changes afterwards:
//!
//! - each kind with a label registers `add_<label>` (append kinds) or
//!   `set_<label>` (set-once kinds) on every parent in its `attachable_to` set
//! - two declarations that register different operations under the same name
//!   on the same parent kind fail initialization
//!
//! # Example
//!
//! ```
//! use firehol_builder::core::capabilities::capabilities;
//! use firehol_builder::core::kinds::NodeKind;
//!
//! let table = capabilities().unwrap();
//! let cap = table.lookup(NodeKind::Group, "set_policy").unwrap();
//! assert_eq!(cap.child, NodeKind::Policy);
//! assert!(table.lookup(NodeKind::Group, "add_interface").is_err());
//! ```

use super::error::{Error, Result};
use super::kinds::{Cardinality, KindDeclaration, NodeKind};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use strum::IntoEnumIterator;

/// One registered builder operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub parent: NodeKind,
    pub child: NodeKind,
    pub cardinality: Cardinality,
    pub operation: String,
}

/// Lookup structure from parent kind to the operations it supports.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    entries: BTreeMap<NodeKind, BTreeMap<String, Capability>>,
}

impl CapabilityTable {
    /// Builds a table from kind declarations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InitializationConflict`] if two different declarations
    /// register the same operation name on the same parent kind.
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = KindDeclaration>,
    ) -> Result<Self> {
        let mut table = Self::default();

        for decl in declarations {
            let Some(operation) = decl.operation_name() else {
                continue;
            };

            for &parent in decl.attachable_to {
                let capability = Capability {
                    parent,
                    child: decl.kind,
                    cardinality: decl.cardinality,
                    operation: operation.clone(),
                };

                let ops = table.entries.entry(parent).or_default();
                match ops.get(&operation) {
                    Some(existing) if *existing == capability => {}
                    Some(_) => {
                        return Err(Error::InitializationConflict {
                            parent: parent.to_string(),
                            operation,
                        });
                    }
                    None => {
                        ops.insert(operation.clone(), capability);
                    }
                }
            }
        }

        Ok(table)
    }

    /// Finds the operation registered under `operation` for `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] if `parent` has no such operation.
    pub fn lookup(&self, parent: NodeKind, operation: &str) -> Result<&Capability> {
        self.entries
            .get(&parent)
            .and_then(|ops| ops.get(operation))
            .ok_or_else(|| Error::UnsupportedOperation {
                parent: parent.to_string(),
                operation: operation.to_string(),
            })
    }

    /// All operations a parent kind supports, sorted by name.
    pub fn operations_for(&self, parent: NodeKind) -> impl Iterator<Item = &Capability> {
        self.entries
            .get(&parent)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Total number of registered operations.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide table, built from every [`NodeKind`] on first use.
///
/// # Errors
///
/// Returns the initialization error on every call if the kind declarations collide.
pub fn capabilities() -> Result<&'static CapabilityTable> {
    static TABLE: OnceLock<Result<CapabilityTable>> = OnceLock::new();

    TABLE
        .get_or_init(|| {
            let table = CapabilityTable::from_declarations(
                NodeKind::iter().map(NodeKind::declaration),
            );
            if let Ok(ref t) = table {
                tracing::debug!("Capability table built with {} operations", t.len());
            }
            table
        })
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_builds() {
        let table = capabilities().unwrap();
        // 2 top-level kinds on the root + 5 child kinds on each of 3 containers
        assert_eq!(table.len(), 17);
    }

    #[test]
    fn test_root_operations() {
        let table = capabilities().unwrap();
        let ops: Vec<_> = table
            .operations_for(NodeKind::Document)
            .map(|c| c.operation.as_str())
            .collect();
        assert_eq!(ops, vec!["add_interface", "add_router"]);
    }

    #[test]
    fn test_container_operations() {
        let table = capabilities().unwrap();
        for parent in [NodeKind::Interface, NodeKind::Router, NodeKind::Group] {
            let ops: Vec<_> = table
                .operations_for(parent)
                .map(|c| c.operation.as_str())
                .collect();
            assert_eq!(
                ops,
                vec!["add_client", "add_group", "add_server", "set_policy", "set_protection"]
            );
        }
    }

    #[test]
    fn test_stanzas_have_no_operations() {
        let table = capabilities().unwrap();
        assert_eq!(table.operations_for(NodeKind::Policy).count(), 0);
        assert!(table.lookup(NodeKind::Server, "add_server").is_err());
    }

    #[test]
    fn test_no_add_variant_for_set_once_kinds() {
        let table = capabilities().unwrap();
        let err = table.lookup(NodeKind::Interface, "add_policy").unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_conflicting_declarations_rejected() {
        let impostor = KindDeclaration {
            kind: NodeKind::Protection,
            label: Some("policy"),
            attachable_to: &[NodeKind::Interface],
            cardinality: Cardinality::SetOnce,
        };
        let err = CapabilityTable::from_declarations([NodeKind::Policy.declaration(), impostor])
            .unwrap_err();
        assert_eq!(
            err,
            Error::InitializationConflict {
                parent: "interface".to_string(),
                operation: "set_policy".to_string(),
            }
        );
    }

    #[test]
    fn test_repeated_identical_declaration_allowed() {
        let table = CapabilityTable::from_declarations([
            NodeKind::Server.declaration(),
            NodeKind::Server.declaration(),
        ])
        .unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_same_label_different_cardinality_do_not_collide() {
        let appending = KindDeclaration {
            kind: NodeKind::Client,
            label: Some("policy"),
            attachable_to: &[NodeKind::Group],
            cardinality: Cardinality::Append,
        };
        let table =
            CapabilityTable::from_declarations([NodeKind::Policy.declaration(), appending])
                .unwrap();
        assert!(table.lookup(NodeKind::Group, "add_policy").is_ok());
        assert!(table.lookup(NodeKind::Group, "set_policy").is_ok());
    }
}
