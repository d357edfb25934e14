//! Shared test utilities for core module tests
//!
//! Provides the reference configuration used across test suites.
//! This module is only compiled in test mode.

use crate::core::document::Document;

/// Expected output of [`reference_document`].
pub const REFERENCE_OUTPUT: &str = "version 5

sysctl -w net.nf_conntrack_max=10

interface \"eth0\" foobar
  protection strong
  policy reject
  group with src 127.0.0.1
    policy accept
    server smtp accept
  group end

";

/// Builds the canonical single-interface document.
///
/// Includes a populated group and an empty one, so it also exercises group
/// transparency.
pub fn reference_document() -> Document {
    let mut doc = Document::new();
    doc.push_leader_line("sysctl -w net.nf_conntrack_max=10");

    let mut eth0 = doc.add_interface("foobar", "eth0").unwrap();
    eth0.set_protection("strong").unwrap();
    eth0.set_policy("reject").unwrap();

    let mut local = eth0.add_group("src 127.0.0.1").unwrap();
    local.set_policy("accept").unwrap();
    local.add_server("smtp", "accept").unwrap();

    eth0.add_group("src 10.0.0.0/8").unwrap();

    doc
}
