#![allow(dead_code)]

pub mod http;

use soloq_watch::error::ClientError;
use soloq_watch::models::types::{
    Analytics, AnalyticsResponse, ApiResponse, BasicStats, Player, PlayerList, PlayerStatus,
    RecentGamesResponse,
};
use soloq_watch::services::api::Backend;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the dashboard backend.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    players: Vec<Player>,
    monitoring: bool,
    calls: Vec<String>,
    /// Errors handed out, in order, before the next calls succeed.
    failures: VecDeque<Failure>,
}

pub enum Failure {
    Backend(&'static str),
    Transport,
}

impl Failure {
    fn into_error(self) -> ClientError {
        match self {
            Failure::Backend(msg) => ClientError::Backend(msg.to_string()),
            Failure::Transport => ClientError::Decode(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            ),
        }
    }
}

pub fn player(puuid: &str, name: &str, status: PlayerStatus) -> Player {
    Player {
        game_name: name.to_string(),
        tag_line: "JP1".to_string(),
        region: "jp1".to_string(),
        status,
        puuid: puuid.to_string(),
        game_info: None,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().players = players;
        backend
    }

    pub fn fail_next(&self, failure: Failure) {
        self.state.lock().unwrap().failures.push_back(failure);
    }

    pub fn set_status(&self, puuid: &str, status: PlayerStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(p) = state.players.iter_mut().find(|p| p.puuid == puuid) {
            p.status = status;
        }
    }

    pub fn set_monitoring(&self, monitoring: bool) {
        self.state.lock().unwrap().monitoring = monitoring;
    }

    pub fn players(&self) -> Vec<Player> {
        self.state.lock().unwrap().players.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn begin(&self, call: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        match state.failures.pop_front() {
            Some(failure) => Err(failure.into_error()),
            None => Ok(state),
        }
    }

    fn snapshot(state: &FakeState, message: String) -> ApiResponse {
        ApiResponse {
            success: true,
            message: Some(message),
            error: None,
            players: Some(state.players.clone()),
        }
    }
}

impl Backend for FakeBackend {
    async fn set_api_key(&self, _api_key: &str) -> Result<ApiResponse, ClientError> {
        let _state = self.begin("set_api_key")?;
        Ok(ApiResponse {
            success: true,
            message: Some("API key set".to_string()),
            ..Default::default()
        })
    }

    async fn add_player(
        &self,
        game_name: &str,
        tag_line: &str,
        region: &str,
    ) -> Result<ApiResponse, ClientError> {
        let mut state = self.begin("add_player")?;
        let puuid = format!("puuid-{}", game_name);
        state.players.push(Player {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            region: region.to_string(),
            status: PlayerStatus::Waiting,
            puuid,
            game_info: None,
        });
        Ok(Self::snapshot(
            &state,
            format!("Added {}#{}", game_name, tag_line),
        ))
    }

    async fn add_pro_players(&self, region: &str) -> Result<ApiResponse, ClientError> {
        let mut state = self.begin("add_pro_players")?;
        for name in ["Faker", "Chovy"] {
            state.players.push(Player {
                game_name: name.to_string(),
                tag_line: "KR1".to_string(),
                region: region.to_string(),
                status: PlayerStatus::Waiting,
                puuid: format!("puuid-{}", name),
                game_info: None,
            });
        }
        Ok(Self::snapshot(&state, format!("Added 2 pro players from {}", region)))
    }

    async fn remove_player(&self, game_name: &str, tag_line: &str) -> Result<ApiResponse, ClientError> {
        let mut state = self.begin("remove_player")?;
        let before = state.players.len();
        state
            .players
            .retain(|p| !(p.game_name == game_name && p.tag_line == tag_line));
        if state.players.len() == before {
            return Ok(ApiResponse {
                success: false,
                error: Some("Player not found".to_string()),
                ..Default::default()
            });
        }
        Ok(Self::snapshot(
            &state,
            format!("Removed {}#{}", game_name, tag_line),
        ))
    }

    async fn start_monitoring(&self) -> Result<ApiResponse, ClientError> {
        let mut state = self.begin("start_monitoring")?;
        state.monitoring = true;
        Ok(ApiResponse {
            success: true,
            message: Some(format!("Monitoring {} players", state.players.len())),
            ..Default::default()
        })
    }

    async fn stop_monitoring(&self) -> Result<ApiResponse, ClientError> {
        let mut state = self.begin("stop_monitoring")?;
        state.monitoring = false;
        Ok(ApiResponse {
            success: true,
            message: Some("Monitoring stopped".to_string()),
            ..Default::default()
        })
    }

    async fn get_players(&self) -> Result<PlayerList, ClientError> {
        let state = self.begin("get_players")?;
        Ok(PlayerList {
            players: state.players.clone(),
            monitoring: state.monitoring,
        })
    }

    async fn get_analytics(&self) -> Result<AnalyticsResponse, ClientError> {
        let state = self.begin("get_analytics")?;
        Ok(AnalyticsResponse::Data(Analytics {
            basic_stats: BasicStats {
                total_games: 4,
                avg_duration: 1500.0,
                unique_players: state.players.len() as u64,
            },
            player_stats: Vec::new(),
        }))
    }

    async fn get_recent_games(&self, puuid: &str) -> Result<RecentGamesResponse, ClientError> {
        let state = self.begin(&format!("get_recent_games:{}", puuid))?;
        if !state.players.iter().any(|p| p.puuid == puuid) {
            return Ok(RecentGamesResponse::Failed {
                error: "Player not found".to_string(),
            });
        }
        Ok(RecentGamesResponse::Games {
            games: vec![
                serde_json::json!({"gameId": 1, "win": true}),
                serde_json::json!({"gameId": 2, "win": false}),
            ],
        })
    }
}
