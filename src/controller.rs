// src/controller.rs
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::backend::{AnalysisBackend, AnalysisRequest};
use crate::config::SubmissionPolicy;
use crate::errors::{AnalyzerError, Result};
use crate::models::{
    OutputPane, ViewSnapshot, FILE_PROMPT, NO_DATA_RETURNED, REMOTE_ERROR_MESSAGE, SUBMIT_LABEL,
    SUBMIT_LABEL_LOADING,
};

#[derive(Debug)]
struct FormState {
    result: Option<String>,
    file_name: Option<String>,
    in_flight: usize,
    last_access: Instant,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            result: None,
            file_name: None,
            in_flight: 0,
            last_access: Instant::now(),
        }
    }
}

impl FormState {
    fn loading(&self) -> bool {
        self.in_flight > 0
    }
}

/// Controller behind one open view of the analysis form.
///
/// The lock is never held across the remote call, so a view stays readable
/// while it is loading. Under `SubmissionPolicy::LastWriteWins` overlapping
/// submissions all run and whichever settles last owns the result slot.
pub struct FormController {
    id: Uuid,
    opened_at: DateTime<Utc>,
    backend: Arc<dyn AnalysisBackend>,
    policy: SubmissionPolicy,
    state: RwLock<FormState>,
}

impl FormController {
    pub fn new(backend: Arc<dyn AnalysisBackend>, policy: SubmissionPolicy) -> Self {
        Self {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            backend,
            policy,
            state: RwLock::new(FormState::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Send `raw_text` to the remote analysis function and record what comes back.
    ///
    /// Returns the text now shown in the output pane. The future must be
    /// driven to completion; callers that may be dropped early should spawn it.
    pub async fn submit(&self, raw_text: &str) -> Result<String> {
        {
            let mut state = self.state.write().await;
            if self.policy == SubmissionPolicy::RejectWhileLoading && state.loading() {
                log::debug!("View {} refused a submission while loading", self.id);
                return Err(AnalyzerError::SubmissionInFlight);
            }
            state.in_flight += 1;
            state.result = None;
            state.last_access = Instant::now();
        }

        let outcome = self.backend.analyze(AnalysisRequest::new(raw_text)).await;

        let mut state = self.state.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);
        state.last_access = Instant::now();

        match outcome {
            Ok(response) => {
                let errors = response.error_messages();
                if errors.is_empty() {
                    let text = response.body().unwrap_or(NO_DATA_RETURNED).to_string();
                    state.result = Some(text.clone());
                    Ok(text)
                } else {
                    log::error!("Remote analysis for view {} returned errors: {:?}", self.id, errors);
                    state.result = Some(REMOTE_ERROR_MESSAGE.to_string());
                    Err(AnalyzerError::RemoteErrorsReturned { errors })
                }
            }
            Err(e) => {
                log::warn!("Remote analysis call for view {} failed: {}", self.id, e);
                Err(AnalyzerError::CallThrew(e.to_string()))
            }
        }
    }

    /// Record the display name of a picked file. Nothing is uploaded.
    pub async fn select_file(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.state.write().await.file_name = Some(name.to_string());
    }

    /// Mark the view as used now.
    pub async fn touch(&self) {
        self.state.write().await.last_access = Instant::now();
    }

    /// Time since the view was last opened, read, or settled a call.
    pub async fn idle_for(&self) -> Duration {
        self.state.read().await.last_access.elapsed()
    }

    /// Number of remote calls this view is still waiting on.
    pub async fn pending_calls(&self) -> usize {
        self.state.read().await.in_flight
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.read().await;
        let loading = state.loading();
        ViewSnapshot {
            id: self.id,
            opened_at: self.opened_at,
            loading,
            result: state.result.clone(),
            file_name: state.file_name.clone(),
            output: OutputPane::from_state(loading, state.result.as_deref()),
            submit_label: if loading { SUBMIT_LABEL_LOADING } else { SUBMIT_LABEL }.to_string(),
            submit_disabled: loading,
            file_prompt: match &state.file_name {
                Some(name) => format!("Selected: {}", name),
                None => FILE_PROMPT.to_string(),
            },
        }
    }
}
