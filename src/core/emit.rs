//! Configuration text emission
//!
//! Emission is a read-only walk over a built [`Document`]. Output layout:
//!
//! 1. `version <N>` and a blank line
//! 2. leader lines verbatim, then a blank line (only if there are any)
//! 3. each user service definition in `(name, server, client)` order, each
//!    followed by a blank line
//! 4. each top-level block in insertion order, each followed by a blank line
//! 5. trailer lines verbatim, then a blank line (only if there are any)
//!
//! Nested lines are indented by [`INDENT`] per nesting level.

use super::document::Document;
use super::node::Line;
use std::fmt::{self, Write};

/// Indentation written once per nesting level.
pub const INDENT: &str = "  ";

/// Renders `doc` into a new string.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_document(doc, &mut out);
    tracing::debug!("Emitted configuration: {} lines", out.lines().count());
    out
}

/// Writes `doc` to any [`fmt::Write`] sink.
///
/// # Errors
///
/// Only errors from `out` itself are returned.
pub fn write_document(doc: &Document, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "version {}", doc.version())?;
    writeln!(out)?;

    write_raw(out, doc.leader_lines())?;

    for service in doc.services().definitions() {
        write_lines(out, service.lines())?;
        writeln!(out)?;
    }

    for block in doc.top_level() {
        write_lines(out, block.lines())?;
        writeln!(out)?;
    }

    write_raw(out, doc.trailer_lines())?;

    Ok(())
}

/// Writes `(indent, text)` pairs, one per line.
pub fn write_lines<'a>(
    out: &mut impl Write,
    lines: impl Iterator<Item = Line<'a>>,
) -> fmt::Result {
    for (indent, text) in lines {
        for _ in 0..indent {
            out.write_str(INDENT)?;
        }
        writeln!(out, "{text}")?;
    }
    Ok(())
}

fn write_raw(out: &mut impl Write, lines: &[String]) -> fmt::Result {
    if lines.is_empty() {
        return Ok(());
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokens::Tokens;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document() {
        assert_eq!(render(&Document::new()), "version 5\n\n");
    }

    #[test]
    fn test_custom_version() {
        let doc = Document::new().with_version(6);
        assert_eq!(render(&doc), "version 6\n\n");
    }

    #[test]
    fn test_trailer_lines() {
        let mut doc = Document::new();
        doc.push_trailer_line("# end of rules");
        doc.push_trailer_line("true");
        assert_eq!(render(&doc), "version 5\n\n# end of rules\ntrue\n\n");
    }

    #[test]
    fn test_service_definitions_sorted() {
        let mut doc = Document::new();
        doc.define_service("zebra", "tcp/9000", "default").unwrap();
        doc.define_service("apple", ["udp/53", "tcp/53"], "any").unwrap();

        let expected = "version 5

server_apple_ports=\"tcp/53 udp/53\"
client_apple_ports=\"any\"

server_zebra_ports=\"tcp/9000\"
client_zebra_ports=\"default\"

";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn test_router_block() {
        let mut doc = Document::new();
        let mut router = doc.add_router("lan2wan", ["inface eth0", "outface eth1"]).unwrap();
        router.add_client_with_params(["http", "https"], "accept", "dst 192.0.2.1").unwrap();

        let expected = "version 5

router lan2wan inface eth0 outface eth1
  client \"http https\" accept dst 192.0.2.1

";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn test_nested_groups_indent() {
        let mut doc = Document::new();
        let mut iface = doc.add_interface("lan", "eth0").unwrap();
        let mut outer = iface.add_group("src 10.0.0.0/8").unwrap();
        let mut inner = outer.add_group("proto tcp").unwrap();
        inner.add_server("ssh", "accept").unwrap();

        let expected = "version 5

interface \"eth0\" lan
  group with src 10.0.0.0/8
    group with proto tcp
      server ssh accept
    group end
  group end

";
        assert_eq!(render(&doc), expected);
    }

    #[test]
    fn test_write_lines_indentation() {
        let mut out = String::new();
        let lines = vec![
            (0_usize, std::borrow::Cow::Borrowed("a")),
            (2, std::borrow::Cow::Borrowed("b")),
        ];
        write_lines(&mut out, lines.into_iter()).unwrap();
        assert_eq!(out, "a\n    b\n");
    }

    #[test]
    fn test_display_matches_render() {
        let mut doc = Document::new();
        doc.add_router("r", Tokens::none()).unwrap();
        assert_eq!(doc.to_string(), render(&doc));
    }
}
