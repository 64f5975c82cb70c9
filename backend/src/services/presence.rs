//! Per-user presence: connected or not, and which space if any.
//!
//! ```text
//! Offline --set_online--> Online --set_space--> InSpace
//!    ^                      |  ^                  |  |
//!    +-----clear_online-----+  +----clear_space---+  |
//!    +-------------------clear_online----------------+
//! ```
//!
//! Each transition is one upsert keyed by user id; concurrent `set_space`
//! calls for one user are last-write-wins.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::db::SocialStore;
use crate::error::SocialResult;
use crate::models::PresenceState;

pub struct PresenceTracker<S> {
    store: Arc<S>,
}

impl<S: SocialStore> PresenceTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Idempotent: an existing row, with or without a space, is left alone.
    pub async fn set_online(&self, user_id: Uuid) -> SocialResult<()> {
        if self.store.insert_status_if_absent(user_id).await? {
            info!(%user_id, "User connected");
        } else {
            debug!(%user_id, "User already online");
        }
        Ok(())
    }

    pub async fn clear_online(&self, user_id: Uuid) -> SocialResult<()> {
        let removed = self.store.delete_status(user_id).await?;
        if removed > 0 {
            info!(%user_id, "User disconnected");
        }
        Ok(())
    }

    pub async fn set_space(&self, user_id: Uuid, space_id: Uuid) -> SocialResult<()> {
        self.store.upsert_status_space(user_id, space_id).await?;
        info!(%user_id, %space_id, "User joined space");
        Ok(())
    }

    /// Only the row of `user_id` is touched. A user with no row stays offline.
    pub async fn clear_space(&self, user_id: Uuid) -> SocialResult<()> {
        let touched = self.store.clear_status_space(user_id).await?;
        if touched > 0 {
            info!(%user_id, "User left space");
        } else {
            debug!(%user_id, "Left space while offline, nothing to clear");
        }
        Ok(())
    }

    pub async fn presence_of(&self, user_id: Uuid) -> SocialResult<PresenceState> {
        let statuses = self.store.find_statuses(&[user_id]).await?;
        Ok(PresenceState::from(statuses.first()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::ErrorKind;

    async fn setup() -> (Arc<MemoryStore>, PresenceTracker<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tracker = PresenceTracker::new(store.clone());
        (store, tracker)
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (store, tracker) = setup().await;
        let user = store.add_user(Some("ann"), None).await.unwrap();
        let lobby = store.add_space("Lobby", "lobby.fly.dev").await.unwrap();

        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::Offline);

        tracker.set_online(user.id).await.unwrap();
        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::Online);

        tracker.set_space(user.id, lobby.id).await.unwrap();
        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::InSpace(lobby.id));

        tracker.clear_space(user.id).await.unwrap();
        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::Online);

        tracker.clear_online(user.id).await.unwrap();
        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::Offline);
    }

    #[tokio::test]
    async fn test_disconnect_straight_from_space() {
        let (store, tracker) = setup().await;
        let user = store.add_user(Some("ann"), None).await.unwrap();
        let lobby = store.add_space("Lobby", "lobby.fly.dev").await.unwrap();

        tracker.set_online(user.id).await.unwrap();
        tracker.set_space(user.id, lobby.id).await.unwrap();
        tracker.clear_online(user.id).await.unwrap();

        assert!(store.statuses().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_online_is_idempotent_and_keeps_space() {
        let (store, tracker) = setup().await;
        let user = store.add_user(Some("ann"), None).await.unwrap();
        let lobby = store.add_space("Lobby", "lobby.fly.dev").await.unwrap();

        tracker.set_online(user.id).await.unwrap();
        tracker.set_online(user.id).await.unwrap();
        assert_eq!(store.statuses().await.len(), 1);

        tracker.set_space(user.id, lobby.id).await.unwrap();
        tracker.set_online(user.id).await.unwrap();
        assert_eq!(tracker.presence_of(user.id).await.unwrap(), PresenceState::InSpace(lobby.id));
    }

    #[tokio::test]
    async fn test_set_space_without_prior_connect_inserts_row() {
        let (store, tracker) = setup().await;
        let user = store.add_user(Some("ann"), None).await.unwrap();
        let lobby = store.add_space("Lobby", "lobby.fly.dev").await.unwrap();
        let garden = store.add_space("Garden", "garden.fly.dev").await.unwrap();

        tracker.set_space(user.id, lobby.id).await.unwrap();
        tracker.set_space(user.id, garden.id).await.unwrap();

        let statuses = store.statuses().await;
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].space_id, Some(garden.id));
    }

    #[tokio::test]
    async fn test_clear_space_only_touches_target_user() {
        let (store, tracker) = setup().await;
        let ann = store.add_user(Some("ann"), None).await.unwrap();
        let ben = store.add_user(Some("ben"), None).await.unwrap();
        let lobby = store.add_space("Lobby", "lobby.fly.dev").await.unwrap();

        tracker.set_space(ann.id, lobby.id).await.unwrap();
        tracker.set_space(ben.id, lobby.id).await.unwrap();
        tracker.clear_space(ann.id).await.unwrap();

        let statuses = store.statuses().await;
        let ann_row = statuses.iter().find(|s| s.user_id == ann.id).unwrap();
        let ben_row = statuses.iter().find(|s| s.user_id == ben.id).unwrap();
        assert_eq!(ann_row.space_id, None);
        assert_eq!(ben_row.space_id, Some(lobby.id));
    }

    #[tokio::test]
    async fn test_clear_space_while_offline_is_noop() {
        let (store, tracker) = setup().await;
        let user = store.add_user(Some("ann"), None).await.unwrap();

        tracker.clear_space(user.id).await.unwrap();
        tracker.clear_online(user.id).await.unwrap();
        assert!(store.statuses().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_cannot_connect() {
        let (_store, tracker) = setup().await;
        let err = tracker.set_online(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
