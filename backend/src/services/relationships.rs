//! Friend requests and the bidirectional friend edges they turn into.
//!
//! A mutual friendship is always the pair `(a, b)` + `(b, a)`; both edges are
//! written and removed inside a single transaction.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::status::StatusResolver;
use crate::db::{SocialStore, StoreTx};
use crate::error::{SocialError, SocialResult};
use crate::models::{FriendRequest, FriendWithStatus, IncomingFriendRequest, User};

pub struct Relationships<S> {
    store: Arc<S>,
    resolver: StatusResolver<S>,
}

impl<S: SocialStore> Relationships<S> {
    pub fn new(store: Arc<S>) -> Self {
        let resolver = StatusResolver::new(store.clone());
        Self { store, resolver }
    }

    async fn require_user(&self, user_id: Uuid) -> SocialResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| SocialError::not_found(format!("user {user_id}")))
    }

    async fn require_username(&self, username: &str) -> SocialResult<User> {
        self.store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| SocialError::not_found(format!("user named {username}")))
    }

    /// Only a request in the same direction counts as a duplicate. A pending
    /// request the other way, or an existing friendship, is not checked.
    pub async fn create_friend_request(&self, requester_id: Uuid, target_username: &str) -> SocialResult<FriendRequest> {
        let requester = self.require_user(requester_id).await?;
        let target = self.require_username(target_username).await?;

        if self.store.find_friend_request(requester.id, target.id).await?.is_some() {
            return Err(SocialError::conflict(format!(
                "request from {} to {} is already pending",
                requester.id, target.id
            )));
        }

        let request = self.store.insert_friend_request(requester.id, target.id).await?;
        info!(request_id = %request.id, requester_id = %requester.id, target_id = %target.id, "Friend request created");
        Ok(request)
    }

    /// Consumes the request and writes both edges atomically.
    ///
    /// The delete-returning step succeeds at most once per request, so racing
    /// accepts or an accept racing a reject leave exactly one winner; the rest
    /// get `NotFound`.
    pub async fn accept_friend_request(&self, accepter_id: Uuid, request_id: Uuid) -> SocialResult<()> {
        let mut tx = self.store.begin().await?;

        let Some(request) = tx.take_friend_request(request_id).await? else {
            // tx dropped here, rolled back
            return Err(SocialError::not_found(format!("friend request {request_id}")));
        };
        let requester_id = request.user_id;

        tx.insert_friend_edge(accepter_id, requester_id).await?;
        tx.insert_friend_edge(requester_id, accepter_id).await?;
        tx.commit().await?;

        info!(%request_id, %accepter_id, %requester_id, "Friend request accepted");
        Ok(())
    }

    /// Unconditional delete; rejecting an unknown request is not an error.
    pub async fn reject_friend_request(&self, request_id: Uuid) -> SocialResult<()> {
        let deleted = self.store.delete_friend_request(request_id).await?;
        debug!(%request_id, deleted, "Friend request rejected");
        Ok(())
    }

    pub async fn list_incoming_friend_requests(&self, user_id: Uuid) -> SocialResult<Vec<IncomingFriendRequest>> {
        self.store.list_incoming_friend_requests(user_id).await
    }

    /// Direct friendship without a request (legacy path).
    pub async fn add_friend(&self, user_id: Uuid, username: &str) -> SocialResult<()> {
        let user = self.require_user(user_id).await?;
        let friend = self.require_username(username).await?;

        if self.store.friendship_exists(user.id, friend.id).await? {
            return Err(SocialError::conflict(format!(
                "{} and {} are already friends",
                user.id, friend.id
            )));
        }

        let mut tx = self.store.begin().await?;
        tx.insert_friend_edge(user.id, friend.id).await?;
        tx.insert_friend_edge(friend.id, user.id).await?;
        tx.commit().await?;

        info!(user_id = %user.id, friend_id = %friend.id, "Friendship added directly");
        Ok(())
    }

    /// Deletes both directions. Removing a friendship that doesn't exist is `Ok`.
    pub async fn remove_friendship(&self, user_id: Uuid, other_id: Uuid) -> SocialResult<()> {
        let mut tx = self.store.begin().await?;
        let forward = tx.delete_friend_edge(user_id, other_id).await?;
        let backward = tx.delete_friend_edge(other_id, user_id).await?;
        tx.commit().await?;

        info!(%user_id, %other_id, removed = forward + backward, "Friendship removed");
        Ok(())
    }

    pub async fn list_friends(&self, user_id: Uuid) -> SocialResult<Vec<FriendWithStatus>> {
        let edges = self.store.list_friend_edges(user_id).await?;
        let friend_ids: Vec<Uuid> = edges
            .iter()
            .map(|edge| edge.other_party(user_id))
            .filter(|id| *id != user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let profiles = self
            .store
            .find_friend_profiles(&friend_ids)
            .await?
            .into_iter()
            .filter(|profile| profile.id != user_id)
            .collect();

        self.resolver.resolve_friend_statuses(profiles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::error::ErrorKind;
    use crate::models::FriendStatus;

    struct Fixture {
        store: Arc<MemoryStore>,
        relationships: Relationships<MemoryStore>,
        alice: User,
        bob: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let alice = store.add_user(Some("alice"), Some("Alice")).await.unwrap();
        let bob = store.add_user(Some("bob"), Some("Bob")).await.unwrap();
        let relationships = Relationships::new(store.clone());
        Fixture { store, relationships, alice, bob }
    }

    fn edge_exists(edges: &[crate::models::FriendEdge], from: Uuid, to: Uuid) -> bool {
        edges.iter().any(|e| e.user_id == from && e.friend_id == to)
    }

    #[tokio::test]
    async fn test_request_then_duplicate_is_conflict() {
        let f = fixture().await;

        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();
        assert_eq!(request.user_id, f.alice.id);
        assert_eq!(request.friend_id, f.bob.id);

        let err = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let requests = f.store.friend_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!((requests[0].user_id, requests[0].friend_id), (f.alice.id, f.bob.id));
    }

    #[tokio::test]
    async fn test_request_to_unknown_username_or_from_unknown_user() {
        let f = fixture().await;

        let err = f.relationships.create_friend_request(f.alice.id, "nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = f.relationships.create_friend_request(Uuid::new_v4(), "bob").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert!(f.store.friend_requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_reverse_direction_requests_coexist() {
        let f = fixture().await;
        f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();
        f.relationships.create_friend_request(f.bob.id, "alice").await.unwrap();
        assert_eq!(f.store.friend_requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_accept_creates_both_edges_and_consumes_request() {
        let f = fixture().await;
        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();

        f.relationships.accept_friend_request(f.bob.id, request.id).await.unwrap();

        let edges = f.store.friend_edges().await;
        assert_eq!(edges.len(), 2);
        assert!(edge_exists(&edges, f.alice.id, f.bob.id));
        assert!(edge_exists(&edges, f.bob.id, f.alice.id));
        assert!(f.store.friend_requests().await.is_empty());

        let friends = f.relationships.list_friends(f.alice.id).await.unwrap();
        assert_eq!(friends.len(), 1);
        assert_eq!(friends[0].id, f.bob.id);
        assert_eq!(friends[0].nickname.as_deref(), Some("Bob"));
        assert_eq!(friends[0].status, FriendStatus::Offline);
    }

    #[tokio::test]
    async fn test_accept_unknown_request_changes_nothing() {
        let f = fixture().await;
        f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();

        let err = f.relationships.accept_friend_request(f.bob.id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(f.store.friend_edges().await.is_empty());
        assert_eq!(f.store.friend_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_second_accept_loses() {
        let f = fixture().await;
        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();

        let (first, second) = tokio::join!(
            f.relationships.accept_friend_request(f.bob.id, request.id),
            f.relationships.accept_friend_request(f.bob.id, request.id),
        );
        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(f.store.friend_edges().await.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_second_edge_rolls_back_everything() {
        let f = fixture().await;
        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();

        f.store.fail_on_edge_insert(2);
        let err = f.relationships.accept_friend_request(f.bob.id, request.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);

        assert!(f.store.friend_edges().await.is_empty());
        assert_eq!(f.store.friend_requests().await, vec![request]);
    }

    #[tokio::test]
    async fn test_reject_is_unconditional() {
        let f = fixture().await;
        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();

        f.relationships.reject_friend_request(request.id).await.unwrap();
        assert!(f.store.friend_requests().await.is_empty());
        f.relationships.reject_friend_request(request.id).await.unwrap();

        let err = f.relationships.accept_friend_request(f.bob.id, request.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_incoming_requests_include_requester_profile() {
        let f = fixture().await;
        let carol = f.store.add_user(Some("carol"), None).await.unwrap();
        f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();
        f.relationships.create_friend_request(carol.id, "bob").await.unwrap();
        f.relationships.create_friend_request(f.bob.id, "alice").await.unwrap();

        let incoming = f.relationships.list_incoming_friend_requests(f.bob.id).await.unwrap();
        let mut requesters: Vec<Uuid> = incoming
            .iter()
            .map(|r| r.requester.as_ref().unwrap().id)
            .collect();
        requesters.sort();
        let mut expected = vec![f.alice.id, carol.id];
        expected.sort();
        assert_eq!(requesters, expected);
        assert!(incoming.iter().any(|r| r.requester.as_ref().unwrap().username.as_deref() == Some("carol")));
    }

    #[tokio::test]
    async fn test_remove_friendship_deletes_both_directions() {
        let f = fixture().await;
        let request = f.relationships.create_friend_request(f.alice.id, "bob").await.unwrap();
        f.relationships.accept_friend_request(f.bob.id, request.id).await.unwrap();

        f.relationships.remove_friendship(f.bob.id, f.alice.id).await.unwrap();
        assert!(f.store.friend_edges().await.is_empty());
        assert!(f.relationships.list_friends(f.alice.id).await.unwrap().is_empty());

        f.relationships.remove_friendship(f.bob.id, f.alice.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_friend_directly() {
        let f = fixture().await;
        f.relationships.add_friend(f.alice.id, "bob").await.unwrap();

        let edges = f.store.friend_edges().await;
        assert!(edge_exists(&edges, f.alice.id, f.bob.id));
        assert!(edge_exists(&edges, f.bob.id, f.alice.id));

        let err = f.relationships.add_friend(f.bob.id, "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(f.store.friend_edges().await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_friends_excludes_self_and_dedupes() {
        let f = fixture().await;
        let carol = f.store.add_user(Some("carol"), None).await.unwrap();
        f.relationships.add_friend(f.alice.id, "carol").await.unwrap();
        f.relationships.add_friend(f.alice.id, "bob").await.unwrap();
        // self-targeted request is allowed and, once accepted, leaves self edges
        let own = f.relationships.create_friend_request(f.alice.id, "alice").await.unwrap();
        f.relationships.accept_friend_request(f.alice.id, own.id).await.unwrap();

        let friends = f.relationships.list_friends(f.alice.id).await.unwrap();
        let ids: Vec<Uuid> = friends.iter().map(|friend| friend.id).collect();
        assert_eq!(ids, vec![f.bob.id, carol.id]);
    }

    #[tokio::test]
    async fn test_list_friends_resolves_presence() {
        let f = fixture().await;
        let carol = f.store.add_user(Some("carol"), None).await.unwrap();
        let lobby = f.store.add_space("Lobby", "lobby.fly.dev").await.unwrap();
        f.relationships.add_friend(f.alice.id, "bob").await.unwrap();
        f.relationships.add_friend(f.alice.id, "carol").await.unwrap();
        f.store.insert_status_if_absent(f.bob.id).await.unwrap();
        f.store.upsert_status_space(carol.id, lobby.id).await.unwrap();

        let friends = f.relationships.list_friends(f.alice.id).await.unwrap();
        assert_eq!(friends[0].status, FriendStatus::Online);
        assert_eq!(friends[1].status, FriendStatus::InSpace { id: lobby.id, name: "Lobby".into() });
    }
}
