// src/client.rs

// The API client: one reqwest::Client pre-bound to the resolved base URL and
// timeout. Requests are built here and sent by the caller; whatever reqwest
// reports at send time is returned unchanged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use once_cell::sync::OnceCell;
use reqwest::{Method, RequestBuilder, StatusCode};

use crate::config::ClientConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build the underlying HTTP client. No connection is opened here.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        debug!(
            "Built HTTP client for {} with {:?} timeout",
            config.base_url(),
            config.timeout()
        );
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Full URL for `path`. Absolute URLs are returned as given; relative
    /// paths are appended to the base URL with exactly one `/` between them.
    pub fn url(&self, path: &str) -> String {
        join_url(self.base_url(), path)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    /// Status returned by the server's liveness endpoint.
    pub async fn liveness(&self) -> Result<StatusCode, reqwest::Error> {
        Ok(self.get("/liveness").send().await?.status())
    }
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    match path.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Lazily built client owned by the composition root.
///
/// The first successful `get` resolves and builds the client; every later
/// call hands out the same instance. A failed build leaves the cell empty.
pub struct SharedClient {
    cell: OnceCell<Arc<ApiClient>>,
    init: Box<dyn Fn() -> Result<ApiClient, ConfigError> + Send + Sync>,
}

impl SharedClient {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<ApiClient, ConfigError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(init),
        }
    }

    pub fn get(&self) -> Result<Arc<ApiClient>, ConfigError> {
        self.cell
            .get_or_try_init(|| (self.init)().map(Arc::new))
            .cloned()
    }

    #[cfg(test)]
    fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for SharedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedClient")
            .field("client", &self.cell.get())
            .finish_non_exhaustive()
    }
}
