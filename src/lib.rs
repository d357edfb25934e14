//! firehol-builder - FireHOL configurations as a validated tree
//!
//! Builds a FireHOL configuration (interfaces, routers, groups, policies,
//! services) in memory through a fluent builder API and emits it in the exact
//! text dialect FireHOL reads.
//!
//! # Architecture
//!
//! - [`core`] - Node kinds, capability table, tree, service registry, and emission
//! - [`validators`] - Name validation shared by blocks and services
//! - [`config`] - JSON settings for document-wide state
//!
//! # Validation
//!
//! Every check runs when a node is constructed, never at emission time:
//!
//! - Block and service names may not contain hyphens and must be shorter than 28 characters
//! - Server/client stanzas may only reference predefined or defined services
//! - A service may only be redefined with an identical port specification
//! - `policy` and `protection` can be set at most once per container
//!
//! # Example
//!
//! ```
//! use firehol_builder::Document;
//!
//! let mut doc = Document::new();
//! doc.define_service("webapp", ["tcp/8080"], "default").unwrap();
//!
//! let mut wan = doc.add_interface("wan", "eth0").unwrap();
//! wan.set_protection("strong").unwrap();
//! wan.set_policy("drop").unwrap();
//! wan.add_server(["http", "webapp"], "accept").unwrap();
//!
//! let text = doc.emit();
//! assert!(text.starts_with("version 5\n\n"));
//! assert!(text.contains("interface \"eth0\" wan\n  protection strong\n"));
//! ```

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod validators;

// Re-export commonly used types
pub use config::DocumentConfig;
pub use core::builder::{BlockMut, NodeSpec};
pub use core::document::Document;
pub use core::error::{Error, Result};
pub use core::services::ServiceDefinition;
pub use core::tokens::Tokens;
