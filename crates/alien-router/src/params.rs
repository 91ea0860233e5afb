//! Captured path parameters

use std::collections::HashMap;
use std::fmt;

/// Ordered (name, value) captures for one request
///
/// Order is left to right along the path. Names may repeat
/// (`/hell/:one/:one`); [`Params::get`] returns the last capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    /// Create an empty capture list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a capture
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value captured under `name`, later captures shadowing earlier ones
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate captures in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Captures as a HashMap (last capture per name wins)
    pub fn to_map(&self) -> HashMap<String, String> {
        self.pairs.iter().cloned().collect()
    }

    /// Borrow the raw pairs
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Comma-joined `name:value` list, in capture order
impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", name, value)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut params = Params::new();
        assert_eq!(params.to_string(), "");

        params.push("which", "bullet");
        assert_eq!(params.to_string(), "which:bullet");

        params.push("what", "fly");
        assert_eq!(params.to_string(), "which:bullet,what:fly");
    }

    #[test]
    fn test_get_last_wins() {
        let mut params = Params::new();
        params.push("one", "a");
        params.push("one", "b");

        assert_eq!(params.get("one"), Some("b"));
        assert_eq!(params.get("two"), None);
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_map().get("one"), Some(&"b".to_string()));
    }

    #[test]
    fn test_iter_order() {
        let params: Params = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
