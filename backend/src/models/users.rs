use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.nickname.is_none() && self.profile_picture.is_none()
    }

    /// Applies the present fields onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = Some(username.clone());
        }
        if let Some(nickname) = &self.nickname {
            user.nickname = Some(nickname.clone());
        }
        if let Some(picture) = &self.profile_picture {
            user.profile_picture = Some(picture.clone());
        }
    }
}
