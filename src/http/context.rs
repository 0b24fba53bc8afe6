use std::{collections::HashMap, net::SocketAddr};

use bytes::Bytes;
use http::{HeaderMap, header::AsHeaderName};
use serde::de::DeserializeOwned;

use crate::http::{meta::RequestMeta, params::parse_form, req::RawRequest};

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Read-only view of the request handed to a matched handler.
#[derive(Debug, Clone)]
pub struct Request {
    original_url: String,
    path: String,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    headers: HeaderMap,
    ip: String,
    body: Bytes,
}

impl Request {
    /// Assembles the handler view from the state captured at router
    /// construction plus the parameters of the route that just matched.
    pub fn build(meta: &RequestMeta, raw: &RawRequest, params: HashMap<String, String>) -> Self {
        Self {
            original_url: meta.original.clone(),
            path: meta.path.clone(),
            params,
            query: meta.query.clone(),
            headers: raw.headers.clone(),
            ip: client_ip(&raw.headers, raw.peer_addr),
            body: raw.body.clone(),
        }
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Path parameter, e.g. `id` for `/users/:id`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn queries(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, names are case-insensitive.
    pub fn header<K: AsHeaderName>(&self, key: K) -> Option<&str> {
        self.headers.get(key).and_then(|v| v.to_str().ok())
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Raw body exactly as received.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON. Never called implicitly.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }

    /// Decodes the body as an urlencoded form. Never called implicitly.
    pub fn form(&self) -> HashMap<String, String> {
        parse_form(&self.body)
    }
}

/// Leftmost `X-Forwarded-For` entry, else the peer address, else empty.
pub fn client_ip(headers: &HeaderMap, peer_addr: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer_addr) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => String::new(),
    }
}
