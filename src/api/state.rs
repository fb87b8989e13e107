// src/api/state.rs
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::{AnalysisBackend, HttpAnalysisBackend};
use crate::config::AppConfig;
use crate::controller::FormController;
use crate::errors::{AnalyzerError, Result};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn AnalysisBackend>,
    views: Arc<RwLock<HashMap<Uuid, Arc<FormController>>>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let backend = HttpAnalysisBackend::new(Client::new(), config.backend.clone());
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: AppConfig, backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            views: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Open a fresh view with empty form state.
    pub async fn open_view(&self) -> Arc<FormController> {
        self.prune_idle_views().await;
        let controller = Arc::new(FormController::new(
            self.backend.clone(),
            self.config.submission_policy,
        ));
        self.views.write().await.insert(controller.id(), controller.clone());
        log::debug!("Opened view {}", controller.id());
        controller
    }

    pub async fn view(&self, id: Uuid) -> Result<Arc<FormController>> {
        let controller = self
            .views
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AnalyzerError::ViewNotFound(id))?;
        controller.touch().await;
        Ok(controller)
    }

    /// Forget a view. Calls it still has in flight run to completion.
    pub async fn close_view(&self, id: Uuid) -> Result<()> {
        match self.views.write().await.remove(&id) {
            Some(_) => {
                log::debug!("Closed view {}", id);
                Ok(())
            }
            None => Err(AnalyzerError::ViewNotFound(id)),
        }
    }

    pub fn view_ttl(&self) -> Duration {
        Duration::from_secs(self.config.view_ttl_secs)
    }

    /// Drop views nobody has used for longer than the configured TTL.
    /// Views still waiting on a remote call are kept.
    pub async fn prune_idle_views(&self) -> usize {
        let ttl = self.view_ttl();
        let candidates: Vec<(Uuid, Arc<FormController>)> = self
            .views
            .read()
            .await
            .iter()
            .map(|(id, controller)| (*id, controller.clone()))
            .collect();

        let mut expired = Vec::new();
        for (id, controller) in candidates {
            if controller.pending_calls().await == 0 && controller.idle_for().await >= ttl {
                expired.push(id);
            }
        }

        if expired.is_empty() {
            return 0;
        }

        let mut views = self.views.write().await;
        for id in &expired {
            views.remove(id);
        }
        log::info!("Pruned {} idle view(s), {} remaining", expired.len(), views.len());
        expired.len()
    }

    pub async fn view_count(&self) -> usize {
        self.views.read().await.len()
    }

    pub fn username(&self) -> &str {
        self.config.username.as_deref().unwrap_or("unknown")
    }
}
