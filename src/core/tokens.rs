//! Normalized token lists
//!
//! Most builder arguments accept either one token (`"eth0"`) or a list of them
//! (`["eth0", "eth1"]`). [`Tokens`] is the single type both forms convert into.

use std::fmt;

/// An ordered list of configuration tokens.
///
/// A single string is always one token; it is never split on whitespace, so
/// `"src 10.0.0.0/8"` stays a single rule-parameter fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tokens(Vec<String>);

impl Tokens {
    /// The empty list, used where rule parameters are omitted.
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Joins all tokens with single spaces.
    pub fn joined(&self) -> String {
        self.0.join(" ")
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Tokens {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<&str> for Tokens {
    fn from(token: &str) -> Self {
        Self(vec![token.to_string()])
    }
}

impl From<String> for Tokens {
    fn from(token: String) -> Self {
        Self(vec![token])
    }
}

impl From<&String> for Tokens {
    fn from(token: &String) -> Self {
        Self(vec![token.clone()])
    }
}

impl From<Vec<String>> for Tokens {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl From<Vec<&str>> for Tokens {
    fn from(tokens: Vec<&str>) -> Self {
        Self(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Tokens {
    fn from(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| (*t).to_string()).collect())
    }
}

impl From<&[String]> for Tokens {
    fn from(tokens: &[String]) -> Self {
        Self(tokens.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Tokens {
    fn from(tokens: [&str; N]) -> Self {
        Self(tokens.iter().map(|t| (*t).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_is_not_split() {
        let tokens = Tokens::from("src 10.0.0.0/8");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.joined(), "src 10.0.0.0/8");
    }

    #[test]
    fn test_list_preserves_order() {
        let tokens = Tokens::from(["eth1", "eth0"]);
        assert_eq!(tokens.joined(), "eth1 eth0");
    }

    #[test]
    fn test_none_is_empty() {
        assert!(Tokens::none().is_empty());
        assert_eq!(Tokens::none().joined(), "");
    }
}
