//! Input validation for names that end up in the generated configuration
//!
//! FireHOL turns service names into shell variables (`server_<name>_ports`) and
//! uses block names as chain name fragments, so both share the same rules.

use crate::core::error::{Error, Result};

/// Names must be strictly shorter than this many characters.
pub const MAX_NAME_LEN: usize = 28;

/// Validates a block or service name.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if:
/// - Name contains a hyphen
/// - Name is 28 characters or longer
///
/// # Examples
///
/// ```
/// use firehol_builder::validators::validate_name;
///
/// assert!(validate_name("lan_side").is_ok());
/// assert!(validate_name("lan-side").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.contains('-') {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: "hyphens are not allowed".to_string(),
        });
    }

    if name.chars().count() >= MAX_NAME_LEN {
        return Err(Error::InvalidName {
            name: name.to_string(),
            reason: format!("must be shorter than {MAX_NAME_LEN} characters"),
        });
    }

    Ok(())
}
