//! Convenience builder for HTTP query parameters.
//!
//! This module provides a lightweight helper for constructing URL query pairs
//! in the order they are added.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn new_has_no_pairs() {
        assert!(QueryParams::new().into_pairs().is_empty());
    }

    #[test]
    fn push_keeps_order() {
        let mut params = QueryParams::new();
        params.push("vdom", "root");
        params.push("action", "move");
        params.push("after", 1);
        assert_eq!(
            params.into_pairs(),
            vec![
                ("vdom", "root".to_string()),
                ("action", "move".to_string()),
                ("after", "1".to_string())
            ]
        );
    }
}
