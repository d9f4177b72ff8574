use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use url::Url;

use crate::error::Error;

/// Raw HTTP outcome handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the actual GET request.
///
/// Timeouts, TLS and redirects belong to the implementation; the client never
/// retries.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: Url) -> Result<TransportResponse, Error>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: Url) -> Result<TransportResponse, Error> {
        let res = self.http.get(url).send().await.map_err(Error::transport)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(Error::transport)?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let ok = TransportResponse { status: 204, body: String::new() };
        let redirect = TransportResponse { status: 304, body: String::new() };
        let err = TransportResponse { status: 401, body: String::new() };

        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!err.is_success());
    }
}
