use std::collections::BTreeMap;

/// Path style options such as `color`, `weight` or `fill_opacity`.
///
/// Values are kept as the host passes them; merging later options over
/// earlier ones mirrors how hosts apply partial style updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style(BTreeMap<String, String>);

impl Style {
    /// Creates an empty style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the style with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value of a style option, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Overwrites options with those set in `other`.
    pub fn merge(&mut self, other: &Style) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Whether no option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overwrites_and_keeps() {
        let mut base = Style::new().with("color", "blue").with("weight", "3");
        base.merge(&Style::new().with("color", "red"));
        assert_eq!(base.get("color"), Some("red"));
        assert_eq!(base.get("weight"), Some("3"));
        assert_eq!(base.get("fill"), None);
    }
}
