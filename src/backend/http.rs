// src/backend/http.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Instant;

use crate::backend::{AnalysisBackend, AnalysisRequest, RemoteResponse};
use crate::config::{BackendConfig, PayloadShape};
use crate::errors::{AnalyzerError, Result};

/// Calls the remote analysis function over HTTPS with the session token.
pub struct HttpAnalysisBackend {
    client: Client,
    config: BackendConfig,
}

#[derive(Serialize)]
#[serde(untagged)]
enum AnalysisPayload<'a> {
    Description { description: &'a str },
    Ingredients { ingredients: [&'a str; 1] },
}

impl<'a> AnalysisPayload<'a> {
    fn new(shape: PayloadShape, text: &'a str) -> Self {
        match shape {
            PayloadShape::Description => AnalysisPayload::Description { description: text },
            PayloadShape::LegacyIngredients => AnalysisPayload::Ingredients { ingredients: [text] },
        }
    }
}

impl HttpAnalysisBackend {
    /// Creates a new `HttpAnalysisBackend`.
    pub fn new(client: Client, config: BackendConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisBackend {
    async fn analyze(&self, request: AnalysisRequest) -> Result<RemoteResponse> {
        let url = &self.config.function_url;
        let body = AnalysisPayload::new(self.config.payload_shape, &request.description);

        log::info!(
            "📡 Calling remote analysis function: {} ({} chars)",
            url,
            request.description.chars().count()
        );

        let mut builder = self.client.post(url).json(&body);
        if let Some(token) = &self.config.session_token {
            builder = builder.bearer_auth(token);
        }

        let start = Instant::now();
        let resp = builder.send().await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("📥 Remote function response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(AnalyzerError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let raw = resp.text().await?;
        serde_json::from_str::<RemoteResponse>(&raw)
            .map_err(|e| AnalyzerError::UnexpectedResponse(format!("{}: {}", e, raw)))
    }
}
