// src/backend/mod.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub mod http;

pub use http::HttpAnalysisBackend;

/// One analysis request: the free-text description typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub description: String,
}

impl AnalysisRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }
}

/// What the remote function answers with once the call completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    #[serde(default)]
    pub data: Option<RemoteData>,
    #[serde(default)]
    pub errors: Option<Vec<RemoteErrorEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteData {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteErrorEntry {
    pub message: String,
}

impl RemoteResponse {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            data: Some(RemoteData { body: Some(body.into()) }),
            errors: None,
        }
    }

    pub fn with_errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: None,
            errors: Some(
                messages
                    .into_iter()
                    .map(|m| RemoteErrorEntry { message: m.into() })
                    .collect(),
            ),
        }
    }

    /// The body text, if the function produced a non-empty one.
    pub fn body(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.body.as_deref())
            .filter(|b| !b.is_empty())
    }

    /// Error messages; an empty list counts as no errors.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|e| e.message.clone())
            .collect()
    }
}

/// The outbound boundary to the remote analysis function.
///
/// Implementations make exactly one call per `analyze`: no retries, no
/// timeout of their own. An `Err` means the call itself failed; errors the
/// function reports about the request come back inside `RemoteResponse`.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<RemoteResponse>;
}
