// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{AnalyzerError, Result};

/// Environment variable pointing at a TOML settings file.
pub const CONFIG_PATH_VAR: &str = "ANALYZER_CONFIG";

/// How the description is laid out in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// `{"description": "..."}`
    #[default]
    Description,
    /// `{"ingredients": ["..."]}`, for backends deployed before the rename.
    LegacyIngredients,
}

impl FromStr for PayloadShape {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "description" => Ok(PayloadShape::Description),
            "legacy_ingredients" | "ingredients" => Ok(PayloadShape::LegacyIngredients),
            other => Err(AnalyzerError::Config(format!("Unknown payload shape '{}'", other))),
        }
    }
}

/// What a view does when a submission arrives while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Both calls proceed; whichever settles last owns the result slot.
    #[default]
    LastWriteWins,
    /// The later submission is refused without touching the view.
    RejectWhileLoading,
}

impl FromStr for SubmissionPolicy {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "last_write_wins" => Ok(SubmissionPolicy::LastWriteWins),
            "reject_while_loading" => Ok(SubmissionPolicy::RejectWhileLoading),
            other => Err(AnalyzerError::Config(format!("Unknown submission policy '{}'", other))),
        }
    }
}

/// Where the remote analysis function lives and how to authenticate to it.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub function_url: String,
    /// Pre-established session token, sent as a bearer credential.
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub payload_shape: PayloadShape,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_view_ttl_secs() -> u64 {
    1800
}

/// High-level application configuration, built once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub submission_policy: SubmissionPolicy,
    /// Display name of the signed-in user, shown in the page header.
    #[serde(default)]
    pub username: Option<String>,
    /// Views idle for longer than this are dropped from the registry.
    #[serde(default = "default_view_ttl_secs")]
    pub view_ttl_secs: u64,
}

impl AppConfig {
    /// Load from the TOML file named by `ANALYZER_CONFIG`, or from the environment.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path),
            Err(_) => Self::from_env(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let function_url = lookup("ANALYZER_FUNCTION_URL").ok_or_else(|| {
            AnalyzerError::Config(
                "No remote function configured. Please set ANALYZER_FUNCTION_URL or ANALYZER_CONFIG."
                    .to_string(),
            )
        })?;

        let payload_shape = match lookup("ANALYZER_PAYLOAD_SHAPE") {
            Some(raw) => raw.parse()?,
            None => PayloadShape::default(),
        };

        let submission_policy = match lookup("ANALYZER_SUBMISSION_POLICY") {
            Some(raw) => raw.parse()?,
            None => SubmissionPolicy::default(),
        };

        let port = match lookup("ANALYZER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AnalyzerError::Config(format!("Invalid ANALYZER_PORT '{}'", raw)))?,
            None => default_port(),
        };

        let view_ttl_secs = match lookup("ANALYZER_VIEW_TTL_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AnalyzerError::Config(format!("Invalid ANALYZER_VIEW_TTL_SECS '{}'", raw))
            })?,
            None => default_view_ttl_secs(),
        };

        let config = AppConfig {
            backend: BackendConfig {
                function_url,
                session_token: lookup("ANALYZER_SESSION_TOKEN").filter(|t| !t.is_empty()),
                payload_shape,
            },
            server: ServerConfig {
                host: lookup("ANALYZER_HOST").unwrap_or_else(default_host),
                port,
            },
            submission_policy,
            username: lookup("ANALYZER_USERNAME").filter(|u| !u.is_empty()),
            view_ttl_secs,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = self.backend.function_url.trim();
        if url.is_empty() {
            return Err(AnalyzerError::Config("backend.function_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AnalyzerError::Config(format!(
                "backend.function_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.view_ttl_secs == 0 {
            return Err(AnalyzerError::Config("view_ttl_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}
