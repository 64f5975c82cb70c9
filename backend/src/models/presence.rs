use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Presence row. Absent row means offline, `space_id = None` means online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserStatus {
    pub id: Uuid,
    pub user_id: Uuid,
    pub space_id: Option<Uuid>,
    pub created_at: Option<NaiveDateTime>,
}

/// Position of a single user in the connect/join/leave/disconnect machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "space_id", rename_all = "snake_case")]
pub enum PresenceState {
    Offline,
    Online,
    InSpace(Uuid),
}

impl From<Option<&UserStatus>> for PresenceState {
    fn from(status: Option<&UserStatus>) -> Self {
        match status {
            None => Self::Offline,
            Some(UserStatus { space_id: None, .. }) => Self::Online,
            Some(UserStatus { space_id: Some(space_id), .. }) => Self::InSpace(*space_id),
        }
    }
}

/// Caller-facing status of a friend.
///
/// `UnknownSpace` carries the raw id of a space the friend is recorded in but
/// which could not be found anymore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FriendStatus {
    Offline,
    Online,
    InSpace { id: Uuid, name: String },
    UnknownSpace { id: Uuid },
}
