use std::time::Duration;

use async_trait::async_trait;
use http::{Method, StatusCode};
use url::Url;

use crate::error::{Error, Result};

pub(crate) struct HttpResponse {
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

/// Transport seam: sends one HTTP request and returns status plus body
/// text. Implementations do not interpret AWS error codes and never
/// retry.
#[async_trait]
pub(crate) trait HttpSend: Send + Sync {
    async fn send(&self, method: Method, url: Url) -> Result<HttpResponse>;
}

pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new(user_agent: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder = builder.user_agent(user_agent.unwrap_or_else(default_user_agent));
        let client = builder
            .build()
            .map_err(|e| Error::transport("failed to build HTTP client", Some(Box::new(e))))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestTransport {
    async fn send(&self, method: Method, url: Url) -> Result<HttpResponse> {
        let resp = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(|e| Error::transport("request failed", Some(Box::new(e))))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::transport("failed to read response body", Some(Box::new(e))))?;

        Ok(HttpResponse { status, body })
    }
}

fn default_user_agent() -> String {
    format!("awsmq/{}", env!("CARGO_PKG_VERSION"))
}
