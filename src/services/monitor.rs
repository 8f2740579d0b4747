//! Owns a [`Session`] together with the two refresh loops that keep it in
//! sync with the backend.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::ClientError;
use crate::models::types::Analytics;
use crate::services::api::Backend;
use crate::services::scheduler::RepeatingTask;
use crate::services::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPeriods {
    /// Status-refresh loop, active only while monitoring.
    pub status: Duration,
    /// Ambient loop, active once an API key is registered.
    pub ambient: Duration,
}

impl Default for RefreshPeriods {
    fn default() -> Self {
        Self {
            status: Duration::from_secs(5),
            ambient: Duration::from_secs(10),
        }
    }
}

pub struct Monitor<B> {
    session: Arc<Mutex<Session<B>>>,
    periods: RefreshPeriods,
    status_task: Option<RepeatingTask>,
    ambient_task: Option<RepeatingTask>,
}

impl<B: Backend + 'static> Monitor<B> {
    pub fn new(session: Session<B>, periods: RefreshPeriods) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            periods,
            status_task: None,
            ambient_task: None,
        }
    }

    pub fn session(&self) -> Arc<Mutex<Session<B>>> {
        Arc::clone(&self.session)
    }

    pub fn status_refresh_running(&self) -> bool {
        self.status_task.as_ref().is_some_and(RepeatingTask::is_running)
    }

    pub fn ambient_refresh_running(&self) -> bool {
        self.ambient_task.as_ref().is_some_and(RepeatingTask::is_running)
    }

    pub async fn set_api_key(&mut self, api_key: &str) -> Result<(), ClientError> {
        self.session.lock().await.set_api_key(api_key).await?;
        if !self.ambient_refresh_running() {
            self.start_ambient_refresh();
        }
        Ok(())
    }

    pub async fn add_player(
        &mut self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<(), ClientError> {
        self.session
            .lock()
            .await
            .add_player(game_name, tag_line, region)
            .await
    }

    pub async fn add_pro_players(&mut self, region: &str) -> Result<(), ClientError> {
        self.session.lock().await.add_pro_players(region).await
    }

    pub async fn remove_player(&mut self, game_name: &str, tag_line: &str) -> Result<(), ClientError> {
        self.session
            .lock()
            .await
            .remove_player(game_name, tag_line)
            .await
    }

    pub async fn clear_players(&mut self) -> Result<(), ClientError> {
        self.session.lock().await.clear_players().await
    }

    pub async fn start_monitoring(&mut self) -> Result<(), ClientError> {
        self.session.lock().await.start_monitoring().await?;
        self.start_status_refresh();
        Ok(())
    }

    pub async fn stop_monitoring(&mut self) -> Result<(), ClientError> {
        self.session.lock().await.stop_monitoring().await?;
        self.stop_status_refresh();
        Ok(())
    }

    pub async fn analytics(&mut self) -> Result<Analytics, ClientError> {
        self.session.lock().await.analytics().await
    }

    pub async fn recent_games(
        &mut self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        self.session
            .lock()
            .await
            .recent_games(game_name, tag_line)
            .await
    }

    pub fn shutdown(&mut self) {
        self.stop_status_refresh();
        if let Some(task) = self.ambient_task.take() {
            task.cancel();
        }
        tracing::info!("Refresh loops stopped");
    }

    fn start_status_refresh(&mut self) {
        // never run two status loops at once
        self.stop_status_refresh();

        let session = Arc::clone(&self.session);
        self.status_task = Some(RepeatingTask::spawn(
            "status-refresh",
            self.periods.status,
            move || {
                let session = Arc::clone(&session);
                async move {
                    session.lock().await.refresh_status().await;
                }
            },
        ));
    }

    fn stop_status_refresh(&mut self) {
        if let Some(task) = self.status_task.take() {
            task.cancel();
        }
    }

    fn start_ambient_refresh(&mut self) {
        let session = Arc::clone(&self.session);
        self.ambient_task = Some(RepeatingTask::spawn(
            "ambient-refresh",
            self.periods.ambient,
            move || {
                let session = Arc::clone(&session);
                async move {
                    session.lock().await.refresh_ambient().await;
                }
            },
        ));
    }
}
