use crate::error::Result;
use crate::protocol::{Command, Endpoint, Request};
use reqwest::Client;
use serde_json::Value;

/// Low-level SMOIP HTTP connection to one player
#[derive(Debug, Clone)]
pub struct Connection {
    host: String,
    client: Client,
}

impl Connection {
    /// Create a connection to `host` using a fresh HTTP client
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_client(host, Client::new())
    }

    /// Create a connection that shares an existing HTTP client
    pub fn with_client(host: impl Into<String>, client: Client) -> Self {
        Self {
            host: host.into(),
            client,
        }
    }

    /// Get the player's host
    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, request: &Request) -> String {
        format!("http://{}{}", self.host, request.path_and_query())
    }

    /// Issue a GET and return the response body
    pub async fn get(&self, request: &Request) -> Result<String> {
        tracing::debug!("Sending: {}", request);

        let body = self
            .client
            .get(self.url(request))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }

    /// Send a command, discarding the response body
    pub async fn send(&self, command: &Command) -> Result<()> {
        self.get(&command.to_request()).await?;
        Ok(())
    }

    /// Read an endpoint and return the `data` object of its JSON envelope.
    ///
    /// Transport failures are errors. A body that is not JSON or has no `data`
    /// member decodes as `Value::Null`, so every field read from it falls back
    /// to its default.
    pub async fn read(&self, endpoint: Endpoint) -> Result<Value> {
        let body = self.get(&Request::new(endpoint)).await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(mut envelope) => Ok(envelope
                .get_mut("data")
                .map(Value::take)
                .unwrap_or(Value::Null)),
            Err(e) => {
                tracing::warn!("Undecodable response from {}: {}", endpoint.path(), e);
                Ok(Value::Null)
            }
        }
    }
}
