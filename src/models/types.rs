use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub game_name: String,
    pub tag_line: String,
    pub region: String,
    pub status: PlayerStatus,
    pub puuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_info: Option<GameInfo>,
}

impl Player {
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} [{}] {}",
            self.game_name,
            self.tag_line,
            self.region.to_uppercase(),
            self.status
        )
    }
}

/// Live game details the backend attaches to players currently in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game_id: Option<u64>,
    #[serde(default)]
    pub game_length: u64,
    #[serde(default)]
    pub participants: u32,
}

/// Activity state reported by the backend. Unrecognised strings are kept
/// as-is so a newer backend can't break deserialization of the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerStatus {
    Playing,
    Waiting,
    Other(String),
}

impl PlayerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PlayerStatus::Playing => "playing",
            PlayerStatus::Waiting => "waiting",
            PlayerStatus::Other(s) => s,
        }
    }
}

impl From<String> for PlayerStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "playing" => PlayerStatus::Playing,
            "waiting" => PlayerStatus::Waiting,
            _ => PlayerStatus::Other(s),
        }
    }
}

impl From<PlayerStatus> for String {
    fn from(status: PlayerStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `game_name#tag_line` as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl FromStr for RiotId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (game_name, tag_line) = s
            .trim()
            .rsplit_once('#')
            .ok_or_else(|| ClientError::Validation(format!("'{}' is not a name#tag Riot ID", s)))?;

        let game_name = game_name.trim();
        let tag_line = tag_line.trim();
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(ClientError::Validation(format!(
                "'{}' is missing a game name or tag line",
                s
            )));
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
        })
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}

#[derive(Debug, Serialize)]
pub struct ApiKeyRequest<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddPlayerRequest<'a> {
    pub game_name: &'a str,
    pub tag_line: &'a str,
    pub region: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegionRequest<'a> {
    pub region: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RemovePlayerRequest<'a> {
    pub game_name: &'a str,
    pub tag_line: &'a str,
}

/// Envelope shared by every mutating endpoint. A bare `{"error": ...}` body
/// reads as `success: false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<Player>>,
}

impl ApiResponse {
    /// Turns a `success: false` envelope into a backend error.
    pub fn into_result(self) -> Result<Self, ClientError> {
        if self.success {
            Ok(self)
        } else {
            Err(ClientError::Backend(
                self.error.unwrap_or_else(|| "unknown backend error".to_string()),
            ))
        }
    }
}

/// Both fields are required: a body without them is not a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerList {
    pub players: Vec<Player>,
    pub monitoring: bool,
}

/// Error body sent alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analytics {
    pub basic_stats: BasicStats,
    #[serde(default)]
    pub player_stats: Vec<PlayerStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicStats {
    pub total_games: u64,
    pub avg_duration: f64,
    pub unique_players: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerStats {
    pub game_name: String,
    pub tag_line: String,
    pub games_played: u64,
}

/// The analytics endpoint answers either with data or with `{ "error": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnalyticsResponse {
    Failed { error: String },
    Data(Analytics),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecentGamesResponse {
    Failed { error: String },
    Games { games: Vec<serde_json::Value> },
}
