use std::collections::HashMap;

use crate::http::{
    params::{parse_pairs, split_query},
    segment::to_owned_segments,
};

// Request state captured once when the router is built. Every route attempt
// reads from here; nothing is recomputed per registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Raw request target with the base path stripped, query included.
    pub original: String,
    /// `original` without the query string.
    pub path: String,
    pub query: HashMap<String, String>,
    pub segments: Vec<String>,
    /// Lower-cased request method.
    pub method: String,
}

impl RequestMeta {
    pub fn new(uri: &str, method: &str, base_path: &str) -> Self {
        // 1. strip the mount point, only when it is an actual prefix
        let original = uri.strip_prefix(base_path).unwrap_or(uri);

        // 2. query string after the first `?`
        let (path, query) = match split_query(original) {
            (path, Some(qs)) => (path, parse_pairs(qs)),
            (path, None) => (path, HashMap::new()),
        };

        Self {
            original: original.to_string(),
            path: path.to_string(),
            query,
            segments: to_owned_segments(path),
            method: method.to_ascii_lowercase(),
        }
    }
}
