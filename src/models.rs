// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NO_DATA_RETURNED: &str = "No data returned";
pub const REMOTE_ERROR_MESSAGE: &str = "An error occurred. Check the console for details.";
pub const LOADING_TEXT: &str = "Analyzing media…";
pub const PLACEHOLDER_TEXT: &str =
    "No output yet. Describe a clip and click Run AI Analysis to see the response here.";
pub const SUBMIT_LABEL: &str = "Run AI Analysis";
pub const SUBMIT_LABEL_LOADING: &str = "Analyzing...";
pub const FILE_PROMPT: &str = "Click to choose a file or drag it here";

/// What the read-only output pane shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum OutputPane {
    Loading(String),
    Placeholder(String),
    Result(String),
}

impl OutputPane {
    pub fn from_state(loading: bool, result: Option<&str>) -> Self {
        match (loading, result) {
            (true, _) => OutputPane::Loading(LOADING_TEXT.to_string()),
            (false, Some(text)) if !text.is_empty() => OutputPane::Result(text.to_string()),
            (false, _) => OutputPane::Placeholder(PLACEHOLDER_TEXT.to_string()),
        }
    }
}

/// Everything the page needs to render one view.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub loading: bool,
    pub result: Option<String>,
    pub file_name: Option<String>,
    pub output: OutputPane,
    pub submit_label: String,
    pub submit_disabled: bool,
    pub file_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectFileRequest {
    #[serde(default)]
    pub name: String,
}

/// How the last submission through this request settled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Completed,
    RemoteErrorsReturned,
    CallThrew,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    pub message: String,
    /// Set only when this submission's own call threw.
    pub alert: Option<String>,
    pub view: ViewSnapshot,
}

#[derive(Serialize, Clone, Debug)]
pub struct ApiError {
    pub error: String,
}
