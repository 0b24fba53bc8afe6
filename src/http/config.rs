use std::collections::HashSet;

use serde::Deserialize;

pub const DEFAULT_METHODS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

/// Construction options for a [`Router`](crate::http::router::Router).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix removed from the request target before matching, e.g. `/api`.
    pub base_path: String,
    /// `None` keeps the default set and accepts every method. `Some` replaces
    /// the set and answers anything outside it with `405`.
    pub allowed_methods: Option<Vec<String>>,
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_methods = Some(methods.into_iter().map(|m| m.as_ref().to_string()).collect());
        self
    }

    /// Lower-cased effective method set.
    pub fn method_set(&self) -> HashSet<String> {
        match &self.allowed_methods {
            Some(methods) => methods.iter().map(|m| m.to_ascii_lowercase()).collect(),
            None => DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn is_gated(&self) -> bool {
        self.allowed_methods.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let cfg = RouterConfig::default();
        assert!(!cfg.is_gated());
        let set = cfg.method_set();
        assert_eq!(set.len(), 5);
        assert!(set.contains("patch"));
    }

    #[test]
    fn test_custom_set_is_lowercased() {
        let cfg = RouterConfig::new().with_allowed_methods(["GET", "Options"]);
        assert!(cfg.is_gated());
        let set = cfg.method_set();
        assert!(set.contains("get"));
        assert!(set.contains("options"));
        assert!(!set.contains("post"));
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: RouterConfig = serde_json::from_str(r#"{"base_path": "/api"}"#).unwrap();
        assert_eq!(cfg.base_path, "/api");
        assert_eq!(cfg.allowed_methods, None);
    }
}
