//! HTTP client utilities.

use reqwest::{Client, IntoUrl, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpSettings;

/// Shared HTTP client with timeouts taken from settings
///
/// Cloning is cheap; every component holds a clone of the same pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client from settings
    pub fn new(settings: &HttpSettings) -> Result<Self, reqwest::Error> {
        let user_agent = settings.user_agent.clone().unwrap_or_else(default_user_agent);

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.client.post(url)
    }
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}
