//! Single contract the transport layer talks to.
//!
//! Every operation returns [`SocialResult`]; failures are logged here, once,
//! at the boundary. Storage failures log at `error`, invalid input at `warn`,
//! refusals such as duplicates or missing rows at `debug`.

use std::sync::Arc;

use tracing::{debug, error, warn};
use uuid::Uuid;

use super::presence::PresenceTracker;
use super::relationships::Relationships;
use crate::db::SocialStore;
use crate::error::{ErrorKind, SocialError, SocialResult};
use crate::models::{
    FriendRequest, FriendWithStatus, IncomingFriendRequest, PresenceState, ProfileUpdate, User,
};
use crate::utils::validation::validate_profile_update;

fn report(operation: &'static str, err: &SocialError) {
    match err.kind() {
        ErrorKind::Storage => error!(operation, error = %err, "Storage failure"),
        ErrorKind::Validation => warn!(operation, error = %err, "Rejected invalid input"),
        ErrorKind::NotFound | ErrorKind::Conflict => debug!(operation, error = %err, "Operation refused"),
    }
}

pub struct SocialRepository<S> {
    store: Arc<S>,
    relationships: Relationships<S>,
    presence: PresenceTracker<S>,
}

impl<S: SocialStore> SocialRepository<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            relationships: Relationships::new(store.clone()),
            presence: PresenceTracker::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // Profiles

    pub async fn find_user(&self, user_id: Uuid) -> SocialResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await
            .and_then(|user| user.ok_or_else(|| SocialError::not_found(format!("user {user_id}"))))
            .inspect_err(|e| report("find_user", e))
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> SocialResult<User> {
        let result: SocialResult<User> = async {
            validate_profile_update(&update)?;
            self.store
                .update_user(user_id, &update)
                .await?
                .ok_or_else(|| SocialError::not_found(format!("user {user_id}")))
        }
        .await;
        result.inspect_err(|e| report("update_profile", e))
    }

    // Relationships

    pub async fn create_friend_request(&self, requester_id: Uuid, target_username: &str) -> SocialResult<FriendRequest> {
        self.relationships
            .create_friend_request(requester_id, target_username)
            .await
            .inspect_err(|e| report("create_friend_request", e))
    }

    pub async fn accept_friend_request(&self, accepter_id: Uuid, request_id: Uuid) -> SocialResult<()> {
        self.relationships
            .accept_friend_request(accepter_id, request_id)
            .await
            .inspect_err(|e| report("accept_friend_request", e))
    }

    pub async fn reject_friend_request(&self, request_id: Uuid) -> SocialResult<()> {
        self.relationships
            .reject_friend_request(request_id)
            .await
            .inspect_err(|e| report("reject_friend_request", e))
    }

    pub async fn list_incoming_friend_requests(&self, user_id: Uuid) -> SocialResult<Vec<IncomingFriendRequest>> {
        self.relationships
            .list_incoming_friend_requests(user_id)
            .await
            .inspect_err(|e| report("list_incoming_friend_requests", e))
    }

    pub async fn add_friend(&self, user_id: Uuid, username: &str) -> SocialResult<()> {
        self.relationships
            .add_friend(user_id, username)
            .await
            .inspect_err(|e| report("add_friend", e))
    }

    pub async fn remove_friendship(&self, user_id: Uuid, other_id: Uuid) -> SocialResult<()> {
        self.relationships
            .remove_friendship(user_id, other_id)
            .await
            .inspect_err(|e| report("remove_friendship", e))
    }

    pub async fn list_friends(&self, user_id: Uuid) -> SocialResult<Vec<FriendWithStatus>> {
        self.relationships
            .list_friends(user_id)
            .await
            .inspect_err(|e| report("list_friends", e))
    }

    // Presence

    pub async fn set_online(&self, user_id: Uuid) -> SocialResult<()> {
        self.presence
            .set_online(user_id)
            .await
            .inspect_err(|e| report("set_online", e))
    }

    pub async fn clear_online(&self, user_id: Uuid) -> SocialResult<()> {
        self.presence
            .clear_online(user_id)
            .await
            .inspect_err(|e| report("clear_online", e))
    }

    pub async fn set_space(&self, user_id: Uuid, space_id: Uuid) -> SocialResult<()> {
        self.presence
            .set_space(user_id, space_id)
            .await
            .inspect_err(|e| report("set_space", e))
    }

    pub async fn clear_space(&self, user_id: Uuid) -> SocialResult<()> {
        self.presence
            .clear_space(user_id)
            .await
            .inspect_err(|e| report("clear_space", e))
    }

    pub async fn presence_of(&self, user_id: Uuid) -> SocialResult<PresenceState> {
        self.presence
            .presence_of(user_id)
            .await
            .inspect_err(|e| report("presence_of", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::FriendStatus;

    async fn repository() -> (SocialRepository<MemoryStore>, User, User) {
        let repo = SocialRepository::new(MemoryStore::new());
        let alice = repo.store().add_user(Some("alice"), None).await.unwrap();
        let bob = repo.store().add_user(Some("bob"), None).await.unwrap();
        (repo, alice, bob)
    }

    async fn only_friend_status(repo: &SocialRepository<MemoryStore>, viewer: Uuid) -> FriendStatus {
        let mut friends = repo.list_friends(viewer).await.unwrap();
        assert_eq!(friends.len(), 1);
        friends.remove(0).status
    }

    #[tokio::test]
    async fn test_request_accept_scenario() {
        let (repo, alice, bob) = repository().await;

        repo.create_friend_request(alice.id, "bob").await.unwrap();
        let err = repo.create_friend_request(alice.id, "bob").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let incoming = repo.list_incoming_friend_requests(bob.id).await.unwrap();
        assert_eq!(incoming.len(), 1);
        let requester = incoming[0].requester.as_ref().unwrap();
        assert_eq!(requester.id, alice.id);
        assert_eq!(requester.username.as_deref(), Some("alice"));

        repo.accept_friend_request(bob.id, incoming[0].id).await.unwrap();
        let friends = repo.list_friends(alice.id).await.unwrap();
        assert_eq!(friends.iter().map(|f| f.id).collect::<Vec<_>>(), vec![bob.id]);
        let friends = repo.list_friends(bob.id).await.unwrap();
        assert_eq!(friends.iter().map(|f| f.id).collect::<Vec<_>>(), vec![alice.id]);
        assert!(repo.list_incoming_friend_requests(bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_friend_sees_presence_changes() {
        let (repo, alice, bob) = repository().await;
        let lobby = repo.store().add_space("Lobby", "lobby.fly.dev").await.unwrap();
        repo.add_friend(alice.id, "bob").await.unwrap();

        assert_eq!(only_friend_status(&repo, alice.id).await, FriendStatus::Offline);
        repo.set_online(bob.id).await.unwrap();
        assert_eq!(only_friend_status(&repo, alice.id).await, FriendStatus::Online);
        repo.set_space(bob.id, lobby.id).await.unwrap();
        assert_eq!(
            only_friend_status(&repo, alice.id).await,
            FriendStatus::InSpace { id: lobby.id, name: "Lobby".into() }
        );
        repo.clear_space(bob.id).await.unwrap();
        assert_eq!(repo.presence_of(bob.id).await.unwrap(), PresenceState::Online);
        repo.clear_online(bob.id).await.unwrap();
        assert_eq!(only_friend_status(&repo, alice.id).await, FriendStatus::Offline);
    }

    #[tokio::test]
    async fn test_set_space_then_clear_space_keeps_row() {
        let (repo, alice, _bob) = repository().await;
        let lobby = repo.store().add_space("Lobby", "lobby.fly.dev").await.unwrap();

        repo.set_space(alice.id, lobby.id).await.unwrap();
        repo.clear_space(alice.id).await.unwrap();

        let statuses = repo.store().statuses().await;
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].user_id, alice.id);
        assert_eq!(statuses[0].space_id, None);
    }

    #[tokio::test]
    async fn test_find_and_update_profile() {
        let (repo, alice, _bob) = repository().await;

        let found = repo.find_user(alice.id).await.unwrap();
        assert_eq!(found, alice);

        let updated = repo
            .update_profile(alice.id, ProfileUpdate {
                nickname: Some("Ally".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.nickname.as_deref(), Some("Ally"));
        assert_eq!(updated.username.as_deref(), Some("alice"));

        let err = repo.find_user(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_profile_error_kinds() {
        let (repo, alice, _bob) = repository().await;

        let taken = ProfileUpdate { username: Some("bob".into()), ..Default::default() };
        assert_eq!(repo.update_profile(alice.id, taken).await.unwrap_err().kind(), ErrorKind::Conflict);

        let invalid = ProfileUpdate { username: Some("a b".into()), ..Default::default() };
        assert_eq!(repo.update_profile(alice.id, invalid).await.unwrap_err().kind(), ErrorKind::Validation);

        let fine = ProfileUpdate { nickname: Some("Ghost".into()), ..Default::default() };
        assert_eq!(repo.update_profile(Uuid::new_v4(), fine).await.unwrap_err().kind(), ErrorKind::NotFound);

        assert_eq!(repo.find_user(alice.id).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn test_removed_user_disappears_from_friend_lists() {
        let (repo, alice, bob) = repository().await;
        repo.add_friend(alice.id, "bob").await.unwrap();
        repo.create_friend_request(bob.id, "alice").await.unwrap();

        assert!(repo.store().remove_user(bob.id).await);
        assert!(repo.list_friends(alice.id).await.unwrap().is_empty());
        assert!(repo.list_incoming_friend_requests(alice.id).await.unwrap().is_empty());
    }
}
