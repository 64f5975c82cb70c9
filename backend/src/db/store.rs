//! Storage seam for the social core.
//!
//! Services are generic over [`SocialStore`] so the Postgres pool is injected
//! at construction rather than reached through a global. Operations that must
//! be atomic go through [`StoreTx`], obtained from [`SocialStore::begin`].

use std::future::Future;
use uuid::Uuid;

use crate::error::SocialResult;
use crate::models::{
    FriendEdge, FriendProfile, FriendRequest, IncomingFriendRequest, ProfileUpdate, SpaceSummary,
    User, UserStatus,
};

pub trait SocialStore: Send + Sync + 'static {
    type Tx: StoreTx;

    fn begin(&self) -> impl Future<Output = SocialResult<Self::Tx>> + Send;

    // Users
    fn find_user_by_id(&self, user_id: Uuid) -> impl Future<Output = SocialResult<Option<User>>> + Send;
    fn find_user_by_username(&self, username: &str) -> impl Future<Output = SocialResult<Option<User>>> + Send;
    /// Profiles for `ids`, ordered by username.
    fn find_friend_profiles(&self, ids: &[Uuid]) -> impl Future<Output = SocialResult<Vec<FriendProfile>>> + Send;
    /// Returns the updated row, or `None` when no user has `user_id`.
    fn update_user(&self, user_id: Uuid, update: &ProfileUpdate) -> impl Future<Output = SocialResult<Option<User>>> + Send;

    // Friend requests
    fn find_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> impl Future<Output = SocialResult<Option<FriendRequest>>> + Send;
    fn insert_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> impl Future<Output = SocialResult<FriendRequest>> + Send;
    /// Returns the number of rows deleted.
    fn delete_friend_request(&self, request_id: Uuid) -> impl Future<Output = SocialResult<u64>> + Send;
    fn list_incoming_friend_requests(&self, target_id: Uuid) -> impl Future<Output = SocialResult<Vec<IncomingFriendRequest>>> + Send;

    // Friend edges
    /// Edges where either side is `user_id`.
    fn list_friend_edges(&self, user_id: Uuid) -> impl Future<Output = SocialResult<Vec<FriendEdge>>> + Send;
    /// True when an edge exists in either direction between the two users.
    fn friendship_exists(&self, user_id: Uuid, other_id: Uuid) -> impl Future<Output = SocialResult<bool>> + Send;

    // Presence
    fn find_statuses(&self, user_ids: &[Uuid]) -> impl Future<Output = SocialResult<Vec<UserStatus>>> + Send;
    /// Inserts a row with no space unless one exists. Returns whether a row was inserted.
    fn insert_status_if_absent(&self, user_id: Uuid) -> impl Future<Output = SocialResult<bool>> + Send;
    /// Inserts or overwrites the space of the row keyed by `user_id`.
    fn upsert_status_space(&self, user_id: Uuid, space_id: Uuid) -> impl Future<Output = SocialResult<()>> + Send;
    /// Sets `space_id` to null on the row of `user_id` only. Returns rows touched.
    fn clear_status_space(&self, user_id: Uuid) -> impl Future<Output = SocialResult<u64>> + Send;
    fn delete_status(&self, user_id: Uuid) -> impl Future<Output = SocialResult<u64>> + Send;

    // Spaces
    fn find_space_summaries(&self, space_ids: &[Uuid]) -> impl Future<Output = SocialResult<Vec<SpaceSummary>>> + Send;
}

/// A transactional scope. Dropping it without [`StoreTx::commit`] rolls back.
pub trait StoreTx: Send {
    /// Deletes the request and returns it; `None` if no row matched.
    fn take_friend_request(&mut self, request_id: Uuid) -> impl Future<Output = SocialResult<Option<FriendRequest>>> + Send;
    fn insert_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> impl Future<Output = SocialResult<FriendEdge>> + Send;
    /// Deletes the directed edge `user_id -> friend_id`. Returns rows deleted.
    fn delete_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> impl Future<Output = SocialResult<u64>> + Send;
    fn commit(self) -> impl Future<Output = SocialResult<()>> + Send;
}
