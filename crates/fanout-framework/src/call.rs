//! # Backend Calls
//!
//! A [`BackendCall`] is the immutable description of one outbound request:
//! which backend, which logical operation, and the method, path, query and
//! body to send. One is built per required backend per inbound request and
//! handed to exactly one adapter invocation.

use serde_json::Value;
use std::fmt;

/// Identifier of a backend service (e.g. `recipe`, `nutrition`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendId(&'static str);

impl BackendId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The subset of HTTP methods backends are called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// One outbound call, fully described before it is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCall {
    pub backend: BackendId,
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl BackendCall {
    fn new(
        backend: BackendId,
        operation: &'static str,
        method: HttpMethod,
        path: impl Into<String>,
        body: Option<Value>,
    ) -> Self {
        Self {
            backend,
            operation,
            method,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn get(backend: BackendId, operation: &'static str, path: impl Into<String>) -> Self {
        Self::new(backend, operation, HttpMethod::Get, path, None)
    }

    pub fn post(
        backend: BackendId,
        operation: &'static str,
        path: impl Into<String>,
        body: Value,
    ) -> Self {
        Self::new(backend, operation, HttpMethod::Post, path, Some(body))
    }

    pub fn put(
        backend: BackendId,
        operation: &'static str,
        path: impl Into<String>,
        body: Value,
    ) -> Self {
        Self::new(backend, operation, HttpMethod::Put, path, Some(body))
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders() {
        let recipe = BackendId::new("recipe");
        let call = BackendCall::get(recipe, "get_recipe", "/recipes/id/7/")
            .with_query("date", "2024-10-30");
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.query, vec![("date".to_string(), "2024-10-30".to_string())]);
        assert!(call.body.is_none());

        let call = BackendCall::put(recipe, "update_recipe", "/recipes/id/7/", json!({"name": "Stew"}));
        assert_eq!(call.method.as_str(), "PUT");
        assert_eq!(call.body, Some(json!({"name": "Stew"})));
    }
}
