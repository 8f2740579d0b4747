//! Interactive command lines accepted on stdin.

use std::str::FromStr;

use crate::error::ClientError;
use crate::models::types::RiotId;

pub const HELP: &str = "\
Commands:
  key <api-key>          register a Riot API key
  add <name#tag> <region> add a player to the watch list
  pro <region>           add the pro player preset for a region
  remove <name#tag>      remove a player
  clear                  remove every player
  start                  start monitoring
  stop                   stop monitoring
  list                   show the watch list
  stats                  show monitoring analytics
  games <name#tag>       show a watched player's recent games
  help                   show this help
  quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetApiKey(String),
    AddPlayer { id: RiotId, region: String },
    AddProPlayers(String),
    RemovePlayer(RiotId),
    Clear,
    Start,
    Stop,
    List,
    Stats,
    RecentGames(RiotId),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ClientError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        let usage = |text: &str| ClientError::Validation(format!("usage: {}", text));

        match verb.to_lowercase().as_str() {
            "key" if !rest.is_empty() => Ok(Command::SetApiKey(rest.to_string())),
            "key" => Err(usage("key <api-key>")),
            "add" => {
                // the region is the last word; game names may contain spaces
                let (id, region) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or_else(|| usage("add <name#tag> <region>"))?;
                Ok(Command::AddPlayer {
                    id: id.parse()?,
                    region: region.to_lowercase(),
                })
            }
            "pro" if !rest.is_empty() => Ok(Command::AddProPlayers(rest.to_lowercase())),
            "pro" => Err(usage("pro <region>")),
            "remove" | "rm" => Ok(Command::RemovePlayer(rest.parse()?)),
            "clear" => Ok(Command::Clear),
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "list" | "ls" => Ok(Command::List),
            "stats" => Ok(Command::Stats),
            "games" if !rest.is_empty() => Ok(Command::RecentGames(rest.parse()?)),
            "games" => Err(usage("games <name#tag>")),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(ClientError::Validation("empty command".to_string())),
            other => Err(ClientError::Validation(format!(
                "unknown command '{}', type 'help'",
                other
            ))),
        }
    }
}
