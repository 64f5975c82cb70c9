//! [`SocialStore`] over a shared `PgPool`.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::store::{SocialStore, StoreTx};
use super::{friends, presence, spaces, users};
use crate::error::SocialResult;
use crate::models::{
    FriendEdge, FriendProfile, FriendRequest, IncomingFriendRequest, ProfileUpdate, SpaceSummary,
    User, UserStatus,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Rolls back on drop unless committed (sqlx semantics).
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

impl StoreTx for PgTx {
    async fn take_friend_request(&mut self, request_id: Uuid) -> SocialResult<Option<FriendRequest>> {
        friends::delete_friend_request_returning(&mut *self.tx, request_id).await
    }

    async fn insert_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> SocialResult<FriendEdge> {
        friends::create_friend_edge(&mut *self.tx, user_id, friend_id).await
    }

    async fn delete_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> SocialResult<u64> {
        friends::delete_friend_edge(&mut *self.tx, user_id, friend_id).await
    }

    async fn commit(self) -> SocialResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl SocialStore for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> SocialResult<PgTx> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> SocialResult<Option<User>> {
        users::get_user_by_id(&self.pool, user_id).await
    }

    async fn find_user_by_username(&self, username: &str) -> SocialResult<Option<User>> {
        users::get_user_by_username(&self.pool, username).await
    }

    async fn find_friend_profiles(&self, ids: &[Uuid]) -> SocialResult<Vec<FriendProfile>> {
        users::get_friend_profiles(&self.pool, ids).await
    }

    async fn update_user(&self, user_id: Uuid, update: &ProfileUpdate) -> SocialResult<Option<User>> {
        users::update_user(&self.pool, user_id, update).await
    }

    async fn find_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> SocialResult<Option<FriendRequest>> {
        friends::get_friend_request(&self.pool, requester_id, target_id).await
    }

    async fn insert_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> SocialResult<FriendRequest> {
        friends::create_friend_request(&self.pool, requester_id, target_id).await
    }

    async fn delete_friend_request(&self, request_id: Uuid) -> SocialResult<u64> {
        friends::delete_friend_request(&self.pool, request_id).await
    }

    async fn list_incoming_friend_requests(&self, target_id: Uuid) -> SocialResult<Vec<IncomingFriendRequest>> {
        friends::get_incoming_friend_requests(&self.pool, target_id).await
    }

    async fn list_friend_edges(&self, user_id: Uuid) -> SocialResult<Vec<FriendEdge>> {
        friends::get_friend_edges(&self.pool, user_id).await
    }

    async fn friendship_exists(&self, user_id: Uuid, other_id: Uuid) -> SocialResult<bool> {
        friends::check_friendship_exists(&self.pool, user_id, other_id).await
    }

    async fn find_statuses(&self, user_ids: &[Uuid]) -> SocialResult<Vec<UserStatus>> {
        presence::get_statuses(&self.pool, user_ids).await
    }

    async fn insert_status_if_absent(&self, user_id: Uuid) -> SocialResult<bool> {
        presence::insert_status_if_absent(&self.pool, user_id).await
    }

    async fn upsert_status_space(&self, user_id: Uuid, space_id: Uuid) -> SocialResult<()> {
        presence::upsert_status_space(&self.pool, user_id, space_id).await
    }

    async fn clear_status_space(&self, user_id: Uuid) -> SocialResult<u64> {
        presence::clear_status_space(&self.pool, user_id).await
    }

    async fn delete_status(&self, user_id: Uuid) -> SocialResult<u64> {
        presence::delete_status(&self.pool, user_id).await
    }

    async fn find_space_summaries(&self, space_ids: &[Uuid]) -> SocialResult<Vec<SpaceSummary>> {
        spaces::get_space_summaries(&self.pool, space_ids).await
    }
}
