//! Client-side session state and the user-facing operations on it.
//!
//! The Watch Set is never edited locally: every mutation round-trips through
//! the backend and the returned snapshot replaces the local copy wholesale.

use futures::future::join_all;

use crate::error::ClientError;
use crate::models::types::{
    Analytics, AnalyticsResponse, ApiResponse, Player, RecentGamesResponse,
};
use crate::services::api::Backend;
use crate::services::poller::{diff_statuses, NotificationKind, StatusChange};
use crate::utils::activity_log::ActivityLog;

const KEY_REQUIRED: &str = "Register an API key first";

pub struct Session<B> {
    backend: B,
    log: ActivityLog,
    api_key_set: bool,
    watch_set: Vec<Player>,
    monitoring: bool,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, log: ActivityLog) -> Self {
        Self {
            backend,
            log,
            api_key_set: false,
            watch_set: Vec::new(),
            monitoring: false,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.watch_set
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    pub fn api_key_set(&self) -> bool {
        self.api_key_set
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub async fn set_api_key(&mut self, api_key: &str) -> Result<(), ClientError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(self.reject("API key is empty"));
        }

        match self.backend.set_api_key(api_key).await.and_then(ApiResponse::into_result) {
            Ok(_) => {
                self.api_key_set = true;
                self.log.success("API key registered");
                Ok(())
            }
            Err(e) => Err(self.report("API key registration", e)),
        }
    }

    pub async fn add_player(
        &mut self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<(), ClientError> {
        self.require_key()?;
        let (game_name, tag_line, region) = (game_name.trim(), tag_line.trim(), region.trim());
        if game_name.is_empty() || tag_line.is_empty() || region.is_empty() {
            return Err(self.reject("Game name, tag line and region are all required"));
        }

        self.log.info(format!("Looking up {}#{}...", game_name, tag_line));
        let result = self.backend.add_player(game_name, tag_line, region).await;
        self.apply_mutation("Adding player", result, false)
    }

    pub async fn add_pro_players(&mut self, region: &str) -> Result<(), ClientError> {
        self.require_key()?;
        let region = region.trim();
        if region.is_empty() {
            return Err(self.reject("Select a region"));
        }

        self.log.info(format!("Adding pro players from {}...", region));
        let result = self.backend.add_pro_players(region).await;
        self.apply_mutation("Adding pro players", result, false)
    }

    pub async fn remove_player(&mut self, game_name: &str, tag_line: &str) -> Result<(), ClientError> {
        let result = self.backend.remove_player(game_name, tag_line).await;
        self.apply_mutation("Removing player", result, true)
    }

    /// Removes every player of the current Watch Set. The removals are sent
    /// concurrently; responses are applied in Watch Set order.
    pub async fn clear_players(&mut self) -> Result<(), ClientError> {
        if self.watch_set.is_empty() {
            self.log.warning("There are no players to remove");
            return Ok(());
        }

        let targets: Vec<(String, String)> = self
            .watch_set
            .iter()
            .map(|p| (p.game_name.clone(), p.tag_line.clone()))
            .collect();
        let backend = &self.backend;
        let results = join_all(
            targets
                .iter()
                .map(|(name, tag)| backend.remove_player(name, tag)),
        )
        .await;

        let mut first_error = None;
        for result in results {
            if let Err(e) = self.apply_mutation("Removing player", result, true) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub async fn start_monitoring(&mut self) -> Result<(), ClientError> {
        self.require_key()?;
        if self.watch_set.is_empty() {
            return Err(self.reject("There are no players to monitor"));
        }

        match self
            .backend
            .start_monitoring()
            .await
            .and_then(ApiResponse::into_result)
        {
            Ok(resp) => {
                self.monitoring = true;
                self.log
                    .success(resp.message.unwrap_or_else(|| "Monitoring started".to_string()));
                Ok(())
            }
            Err(e) => Err(self.report("Starting monitoring", e)),
        }
    }

    pub async fn stop_monitoring(&mut self) -> Result<(), ClientError> {
        match self
            .backend
            .stop_monitoring()
            .await
            .and_then(ApiResponse::into_result)
        {
            Ok(resp) => {
                self.monitoring = false;
                self.log
                    .info(resp.message.unwrap_or_else(|| "Monitoring stopped".to_string()));
                Ok(())
            }
            Err(e) => Err(self.report("Stopping monitoring", e)),
        }
    }

    /// Status-refresh tick: fetches the list while monitoring and reports
    /// every status transition since the previous snapshot.
    pub async fn refresh_status(&mut self) -> Vec<StatusChange> {
        if !self.monitoring {
            return Vec::new();
        }

        let list = match self.backend.get_players().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Player status update failed: {}", e);
                return Vec::new();
            }
        };

        let previous = std::mem::replace(&mut self.watch_set, list.players);
        let log = &mut self.log;
        let changes: Vec<StatusChange> = diff_statuses(&previous, &self.watch_set)
            .map(|n| {
                match n.kind {
                    NotificationKind::EnteredActive => log.success(n.message()),
                    NotificationKind::ReturnedIdle => log.info(n.message()),
                }
                StatusChange::from(n)
            })
            .collect();

        if !changes.is_empty() {
            tracing::info!("{} status change(s) detected", changes.len());
        }
        changes
    }

    /// Ambient tick: mirrors the backend's list and monitoring flag once a key
    /// is registered. Failures are ignored until the next tick.
    pub async fn refresh_ambient(&mut self) {
        if !self.api_key_set {
            return;
        }

        match self.backend.get_players().await {
            Ok(list) => {
                self.watch_set = list.players;
                self.monitoring = list.monitoring;
            }
            Err(e) => tracing::debug!("Periodic update failed: {}", e),
        }
    }

    pub async fn analytics(&mut self) -> Result<Analytics, ClientError> {
        self.require_key()?;
        match self.backend.get_analytics().await {
            Ok(AnalyticsResponse::Data(data)) => Ok(data),
            Ok(AnalyticsResponse::Failed { error }) => {
                Err(self.report("Fetching analytics", ClientError::Backend(error)))
            }
            Err(e) => Err(self.report("Fetching analytics", e)),
        }
    }

    /// Recent match history of a watched player. Riot IDs compare
    /// case-insensitively.
    pub async fn recent_games(
        &mut self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Vec<serde_json::Value>, ClientError> {
        self.require_key()?;
        let (game_name, tag_line) = (game_name.trim(), tag_line.trim());
        let puuid = self
            .watch_set
            .iter()
            .find(|p| {
                p.game_name.eq_ignore_ascii_case(game_name)
                    && p.tag_line.eq_ignore_ascii_case(tag_line)
            })
            .map(|p| p.puuid.clone());

        let Some(puuid) = puuid else {
            return Err(self.reject(&format!(
                "{}#{} is not on the watch list",
                game_name, tag_line
            )));
        };

        match self.backend.get_recent_games(&puuid).await {
            Ok(RecentGamesResponse::Games { games }) => Ok(games),
            Ok(RecentGamesResponse::Failed { error }) => {
                Err(self.report("Fetching recent games", ClientError::Backend(error)))
            }
            Err(e) => Err(self.report("Fetching recent games", e)),
        }
    }

    fn apply_mutation(
        &mut self,
        action: &str,
        result: Result<ApiResponse, ClientError>,
        quiet: bool,
    ) -> Result<(), ClientError> {
        match result.and_then(ApiResponse::into_result) {
            Ok(resp) => {
                if let Some(players) = resp.players {
                    self.watch_set = players;
                }
                let message = resp.message.unwrap_or_else(|| format!("{} succeeded", action));
                if quiet {
                    self.log.info(message);
                } else {
                    self.log.success(message);
                }
                Ok(())
            }
            Err(e) => Err(self.report(action, e)),
        }
    }

    fn require_key(&mut self) -> Result<(), ClientError> {
        if self.api_key_set {
            Ok(())
        } else {
            Err(self.reject(KEY_REQUIRED))
        }
    }

    fn reject(&mut self, message: &str) -> ClientError {
        self.log.error(message);
        ClientError::Validation(message.to_string())
    }

    fn report(&mut self, action: &str, err: ClientError) -> ClientError {
        if err.is_transport() {
            self.log.error(format!("API call failed: {}", err));
        } else {
            self.log.error(format!("{} failed: {}", action, err));
        }
        err
    }
}
