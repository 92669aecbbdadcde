use std::fmt;

use convert_case::{Case, Casing};

use crate::error::{Error, Result};

/// Returns true if `c` may appear in a node name.
pub fn valid_nodename_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Returns true if every character of `name` may appear in a node name.
pub fn valid_nodename(name: &str) -> bool {
    !name.is_empty() && name.chars().all(valid_nodename_char)
}

/// A node name, which consists of lowercase ASCII alphanumeric characters,
/// plus underscores. Names make up the keys under which persisted widget
/// state is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// Validated name text.
    name: String,
}

impl NodeName {
    /// Create a new NodeName, returning an error if the string contains
    /// invalid characters.
    pub fn new(name: &str) -> Result<Self> {
        if !valid_nodename(name) {
            return Err(Error::Invalid(format!("node name {name:?}")));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Munge an arbitrary string into a valid node name: convert to snake
    /// case, then drop any remaining invalid characters. A name with nothing
    /// left becomes "node".
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|c| valid_nodename_char(*c)).collect();
        let name = if filtered.is_empty() {
            "node".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl TryFrom<&str> for NodeName {
    type Error = Error;
    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_snake_cases() {
        assert_eq!(NodeName::convert("PushButton"), "push_button");
        assert_eq!(NodeName::convert("Main Window!"), "main_window");
        assert_eq!(NodeName::convert("!!!"), "node");
        assert_eq!(NodeName::convert(""), "node");
    }

    #[test]
    fn new_rejects_invalid() {
        assert!(NodeName::new("ok_1").is_ok());
        assert!(NodeName::new("Nope").is_err());
        assert!(NodeName::new("").is_err());
    }
}
