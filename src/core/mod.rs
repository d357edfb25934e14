//! Configuration tree, service registry, and emission
//!
//! This module contains the core types for building FireHOL configurations.
//! It provides:
//!
//! - [`kinds`]: Static node kind declarations (label, parents, cardinality)
//! - [`capabilities`]: Builder operation table derived from the kind declarations
//! - [`node`]: Blocks and stanzas with construction-time validation
//! - [`builder`]: Fluent builder cursor and the generic attach operation
//! - [`document`]: The document root owning blocks and services
//! - [`services`]: Predefined and user-defined service registry
//! - [`emit`]: Deterministic text emission
//! - [`error`]: Error types for builder operations

pub mod builder;
pub mod capabilities;
pub mod document;
pub mod emit;
pub mod error;
pub mod kinds;
pub mod node;
pub mod services;
pub mod tokens;

#[cfg(test)]
pub mod test_helpers;
