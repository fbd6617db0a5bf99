//! Development server parameters.

use crate::error::PlanError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Development server settings handed to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub public_path: String,
    /// Directory served for static files, relative to the project root.
    pub content_base: String,
    /// Serve the index document for unknown routes.
    pub history_api_fallback: bool,
    /// Open a browser once the server is up.
    pub open: bool,
    /// Page opened when `open` is set.
    pub open_page: String,
    /// Proxy routes, tried in order.
    #[serde(default)]
    pub proxy: Vec<ProxyRoute>,
}

impl ServerConfig {
    /// Append a proxy route.
    #[must_use]
    pub fn with_proxy(mut self, route: ProxyRoute) -> Self {
        self.proxy.push(route);
        self
    }

    /// First proxy route whose pattern matches the request path.
    #[must_use]
    pub fn proxy_for(&self, request_path: &str) -> Option<&ProxyRoute> {
        self.proxy.iter().find(|r| r.path.matches(request_path))
    }

    /// URL a browser is pointed at when `open` is set.
    #[must_use]
    pub fn open_url(&self) -> String {
        format!(
            "http://{}:{}/{}",
            self.host,
            self.port,
            self.open_page.trim_start_matches('/')
        )
    }
}

/// Glob over request paths, e.g. `/api/**`.
#[derive(Debug, Clone)]
pub struct PathGlob {
    source: String,
    pattern: glob::Pattern,
}

impl PathGlob {
    pub fn new(source: &str) -> Result<Self, PlanError> {
        let pattern = glob::Pattern::new(source).map_err(|e| PlanError::InvalidProxyPattern {
            pattern: source.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, request_path: &str) -> bool {
        self.pattern.matches(request_path)
    }
}

impl PartialEq for PathGlob {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathGlob {}

impl Serialize for PathGlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for PathGlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(de::Error::custom)
    }
}

/// Forward requests matching `path` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRoute {
    pub path: PathGlob,
    pub target: String,
    /// Drop the first path segment before forwarding.
    #[serde(default)]
    pub strip_first_segment: bool,
}

impl ProxyRoute {
    pub fn new(path: &str, target: impl Into<String>) -> Result<Self, PlanError> {
        Ok(Self {
            path: PathGlob::new(path)?,
            target: target.into(),
            strip_first_segment: false,
        })
    }

    #[must_use]
    pub fn strip_first_segment(mut self) -> Self {
        self.strip_first_segment = true;
        self
    }

    /// Path sent upstream for `request_path`.
    #[must_use]
    pub fn rewrite<'a>(&self, request_path: &'a str) -> &'a str {
        if !self.strip_first_segment {
            return request_path;
        }
        let rest = request_path.strip_prefix('/').unwrap_or(request_path);
        match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "/",
        }
    }
}
