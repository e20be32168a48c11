//! HTTP implementation of the backend collaborators using reqwest
//!
//! Endpoints:
//! - POST /workflows/               create
//! - PUT  /workflows/{id}           update
//! - GET  /workflows/{id}           load
//! - POST /workflows/{id}/execute   start execution
//! - GET  /executions/{id}          execution status with step results
//! - GET  /tools/                   tool catalog

use crate::api::backend::{
    ExecutionHandle, ExecutionOverrides, ExecutionStatus, ToolSource, ToolSummary, WorkflowBackend,
    WorkflowRecord,
};
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::mapper::WorkflowConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// REST client for the workflow service
#[derive(Debug, Clone)]
pub struct HttpWorkflowBackend {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpWorkflowBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("X-API-Key", key),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body, mapping non-2xx to `BackendError::Status`
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, BackendError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Backend responded {}: {}", status, body);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WorkflowBackend for HttpWorkflowBackend {
    async fn save(&self, config: &WorkflowConfig) -> Result<WorkflowRecord, BackendError> {
        tracing::debug!("POST workflow '{}' ({} steps)", config.name, config.steps.len());
        self.send(self.http.post(self.url("workflows/")).json(config)).await
    }

    async fn update(
        &self,
        workflow_id: &str,
        config: &WorkflowConfig,
    ) -> Result<WorkflowRecord, BackendError> {
        tracing::debug!("PUT workflow {} ({} steps)", workflow_id, config.steps.len());
        self.send(self.http.put(self.url(&format!("workflows/{}", workflow_id))).json(config))
            .await
    }

    async fn load(&self, workflow_id: &str) -> Result<WorkflowRecord, BackendError> {
        self.send(self.http.get(self.url(&format!("workflows/{}", workflow_id))))
            .await
    }

    async fn execute(
        &self,
        workflow_id: &str,
        overrides: &ExecutionOverrides,
    ) -> Result<ExecutionHandle, BackendError> {
        tracing::debug!("POST execute workflow {}", workflow_id);
        self.send(
            self.http
                .post(self.url(&format!("workflows/{}/execute", workflow_id)))
                .json(overrides),
        )
        .await
    }

    async fn poll(&self, execution_id: &str) -> Result<ExecutionStatus, BackendError> {
        self.send(self.http.get(self.url(&format!("executions/{}", execution_id))))
            .await
    }
}

#[async_trait]
impl ToolSource for HttpWorkflowBackend {
    async fn list_tools(&self) -> Result<Vec<ToolSummary>, BackendError> {
        self.send(self.http.get(self.url("tools/"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let backend = HttpWorkflowBackend::new(&BackendConfig {
            base_url: "http://api.local/".to_string(),
            api_key: None,
            timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(backend.base_url(), "http://api.local");
        assert_eq!(backend.url("/workflows/"), "http://api.local/workflows/");
        assert_eq!(backend.url("executions/ex-1"), "http://api.local/executions/ex-1");
    }
}
