//! Status-transition detection between two Watch Set snapshots.

use crate::models::types::{Player, PlayerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The player went from waiting to playing.
    EnteredActive,
    /// The player's game ended.
    ReturnedIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification<'a> {
    pub kind: NotificationKind,
    pub player: &'a Player,
}

impl Notification<'_> {
    pub fn message(&self) -> String {
        match self.kind {
            NotificationKind::EnteredActive => {
                format!("{} started a solo queue game!", self.player.riot_id())
            }
            NotificationKind::ReturnedIdle => {
                format!("{}'s game has ended", self.player.riot_id())
            }
        }
    }
}

/// Owned copy of a [`Notification`], for handing out past the snapshot's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub kind: NotificationKind,
    pub puuid: String,
    pub riot_id: String,
}

impl From<Notification<'_>> for StatusChange {
    fn from(n: Notification<'_>) -> Self {
        Self {
            kind: n.kind,
            puuid: n.player.puuid.clone(),
            riot_id: n.player.riot_id(),
        }
    }
}

/// Yields one notification per player of `current` whose status differs from
/// the first player in `previous` with the same puuid. Players absent from
/// `previous` are newly observed and yield nothing.
pub fn diff_statuses<'a>(
    previous: &'a [Player],
    current: &'a [Player],
) -> impl Iterator<Item = Notification<'a>> + 'a {
    current.iter().filter_map(move |player| {
        let old = previous.iter().find(|p| p.puuid == player.puuid)?;
        if old.status == player.status {
            return None;
        }

        let kind = match player.status {
            PlayerStatus::Playing => NotificationKind::EnteredActive,
            PlayerStatus::Waiting => NotificationKind::ReturnedIdle,
            PlayerStatus::Other(_) => return None,
        };
        Some(Notification { kind, player })
    })
}
