use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceTheme {
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub fly_url: String,
    pub theme: SpaceTheme,
    pub thumbnail: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// The part of a space a friend list is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SpaceSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Space> for SpaceSummary {
    fn from(space: &Space) -> Self {
        Self {
            id: space.id,
            name: space.name.clone(),
        }
    }
}
