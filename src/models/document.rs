// Document Root Model
// In-memory stand-in for the page's root element. The shell signals the
// resolved theme through both a class token and a data attribute, so
// stylesheets and tests can select on either.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentRoot {
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, token: &str) {
        self.classes.insert(token.to_string());
    }

    pub fn remove_class(&mut self, token: &str) {
        self.classes.remove(token);
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.classes.contains(token)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|value| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_membership() {
        let mut root = DocumentRoot::new();
        root.add_class("dark");
        assert!(root.has_class("dark"));
        assert!(!root.has_class("light"));

        root.remove_class("dark");
        assert!(!root.has_class("dark"));
    }

    #[test]
    fn test_attribute_overwrite() {
        let mut root = DocumentRoot::new();
        root.set_attribute("data-theme", "light");
        root.set_attribute("data-theme", "dark");
        assert_eq!(root.attribute("data-theme"), Some("dark"));
        assert_eq!(root.attribute("data-missing"), None);
    }
}
