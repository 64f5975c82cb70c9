use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDateTime;
use uuid::Uuid;

use super::presence::FriendStatus;

/// One direction of a friendship. A mutual friendship is two edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FriendEdge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub created_at: Option<NaiveDateTime>,
}

impl FriendEdge {
    /// The party on the far side of this edge as seen from `user_id`.
    pub fn other_party(&self, user_id: Uuid) -> Uuid {
        if self.user_id == user_id {
            self.friend_id
        } else {
            self.user_id
        }
    }
}

/// Pending request from `user_id` (requester) to `friend_id` (target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FriendRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterProfile {
    pub id: Uuid,
    pub username: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingFriendRequest {
    pub id: Uuid,
    pub requester: Option<RequesterProfile>,
}

// Flat shape of `friend_requests LEFT JOIN users`.
#[derive(Debug, Clone, FromRow)]
pub struct IncomingFriendRequestRow {
    pub id: Uuid,
    pub requester_id: Option<Uuid>,
    pub requester_username: Option<String>,
    pub requester_profile_picture: Option<String>,
}

impl From<IncomingFriendRequestRow> for IncomingFriendRequest {
    fn from(row: IncomingFriendRequestRow) -> Self {
        Self {
            id: row.id,
            requester: row.requester_id.map(|id| RequesterProfile {
                id,
                username: row.requester_username,
                profile_picture: row.requester_profile_picture,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FriendProfile {
    pub id: Uuid,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendWithStatus {
    pub id: Uuid,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub profile_picture: Option<String>,
    pub status: FriendStatus,
}

impl FriendWithStatus {
    pub fn new(profile: FriendProfile, status: FriendStatus) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            nickname: profile.nickname,
            profile_picture: profile.profile_picture,
            status,
        }
    }
}
