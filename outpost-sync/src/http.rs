//! HTTP replay backend.
//!
//! Posts action payloads as JSON to per-kind routes under a configurable
//! base URL. This is the only place that knows the remote API's shape; the
//! engine above it sees nothing but success or failure.

use crate::backend::RemoteBackend;
use crate::error::{ReplayError, SyncError, SyncResult};
use async_trait::async_trait;
use outpost_types::ActionKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. The engine itself enforces no replay timeout;
    /// this is the transport-level bound.
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Replay backend speaking JSON-over-HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpBackend {
    /// Creates a backend with its own connection pool.
    pub fn new(config: HttpConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SyncError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    const fn route(kind: ActionKind) -> &'static str {
        match kind {
            ActionKind::SaveCode => "/api/code/save",
            ActionKind::SaveProgress => "/api/progress/save",
            ActionKind::SubmitProject => "/api/projects/submit",
        }
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn replay(
        &self,
        kind: ActionKind,
        payload: &serde_json::Value,
    ) -> Result<(), ReplayError> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            Self::route(kind)
        );
        debug!(%kind, %url, "replaying action");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ReplayError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ReplayError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}
