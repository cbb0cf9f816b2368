use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::NotifyConfig;

/// Body accepted by the push-messaging endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub event_id: String,
    pub title: String,
    pub body: String,
    /// Epoch milliseconds.
    pub scheduled_time: i64,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, request: &NotificationRequest) -> anyhow::Result<()>;
}

/// POSTs each request as JSON to a single endpoint.
#[derive(Clone, Debug)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    pub fn new(cfg: &NotifyConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build notification http client")?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for HttpDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(256).collect();
            anyhow::bail!("push endpoint returned {status}: {snippet}");
        }
        debug!(event_id = %request.event_id, "notification dispatched");
        Ok(())
    }
}
