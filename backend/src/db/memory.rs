//! In-process [`SocialStore`], used by the test suites.
//!
//! Mirrors the relational constraints the Postgres schema enforces: unique
//! usernames, unique fly urls, one presence row per user, foreign keys on
//! users and cascade on user removal. Deleting a space does not touch presence
//! rows, so dangling space references can be produced on purpose.
//!
//! A transaction takes the state lock for its whole lifetime and works on a
//! staged copy which replaces the live state only on commit.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::store::{SocialStore, StoreTx};
use crate::error::{SocialError, SocialResult};
use crate::models::{
    FriendEdge, FriendProfile, FriendRequest, IncomingFriendRequest, ProfileUpdate,
    RequesterProfile, Space, SpaceSummary, SpaceTheme, User, UserStatus,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<Uuid, User>,
    spaces: BTreeMap<Uuid, Space>,
    friends: Vec<FriendEdge>,
    friend_requests: Vec<FriendRequest>,
    // keyed by user id
    statuses: BTreeMap<Uuid, UserStatus>,
}

impl MemoryState {
    fn require_user(&self, user_id: Uuid) -> SocialResult<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(SocialError::not_found(format!("user {user_id}")))
        }
    }

    fn take_friend_request(&mut self, request_id: Uuid) -> Option<FriendRequest> {
        let index = self.friend_requests.iter().position(|r| r.id == request_id)?;
        Some(self.friend_requests.remove(index))
    }

    fn insert_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> SocialResult<FriendEdge> {
        self.require_user(user_id)?;
        self.require_user(friend_id)?;
        let edge = FriendEdge {
            id: Uuid::new_v4(),
            user_id,
            friend_id,
            created_at: Some(Utc::now().naive_utc()),
        };
        self.friends.push(edge.clone());
        Ok(edge)
    }

    fn delete_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> u64 {
        let before = self.friends.len();
        self.friends
            .retain(|e| !(e.user_id == user_id && e.friend_id == friend_id));
        (before - self.friends.len()) as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    // 0 disables; n fails the n-th transactional edge insert from now.
    edge_insert_failure: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, username: Option<&str>, nickname: Option<&str>) -> SocialResult<User> {
        let mut state = self.state.lock().await;
        if let Some(username) = username {
            if state.users.values().any(|u| u.username.as_deref() == Some(username)) {
                return Err(SocialError::conflict(format!("username {username} is taken")));
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.map(str::to_string),
            nickname: nickname.map(str::to_string),
            profile_picture: None,
            created_at: Some(Utc::now().naive_utc()),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Removes a user and cascades to edges, requests and presence.
    pub async fn remove_user(&self, user_id: Uuid) -> bool {
        let mut state = self.state.lock().await;
        if state.users.remove(&user_id).is_none() {
            return false;
        }
        state
            .friends
            .retain(|e| e.user_id != user_id && e.friend_id != user_id);
        state
            .friend_requests
            .retain(|r| r.user_id != user_id && r.friend_id != user_id);
        state.statuses.remove(&user_id);
        true
    }

    pub async fn add_space(&self, name: &str, fly_url: &str) -> SocialResult<Space> {
        let mut state = self.state.lock().await;
        if state.spaces.values().any(|s| s.fly_url == fly_url) {
            return Err(SocialError::conflict(format!("fly url {fly_url} is taken")));
        }

        let space = Space {
            id: Uuid::new_v4(),
            name: name.to_string(),
            password: String::new(),
            fly_url: fly_url.to_string(),
            theme: SpaceTheme::Default,
            thumbnail: None,
            created_at: Some(Utc::now().naive_utc()),
        };
        state.spaces.insert(space.id, space.clone());
        Ok(space)
    }

    /// Removes the space only; presence rows pointing at it are left dangling.
    pub async fn remove_space(&self, space_id: Uuid) -> bool {
        self.state.lock().await.spaces.remove(&space_id).is_some()
    }

    pub async fn friend_edges(&self) -> Vec<FriendEdge> {
        self.state.lock().await.friends.clone()
    }

    pub async fn friend_requests(&self) -> Vec<FriendRequest> {
        self.state.lock().await.friend_requests.clone()
    }

    pub async fn statuses(&self) -> Vec<UserStatus> {
        self.state.lock().await.statuses.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn fail_on_edge_insert(&self, nth: usize) {
        self.edge_insert_failure.store(nth, Ordering::SeqCst);
    }
}

pub struct MemoryTx {
    live: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    edge_insert_failure: Arc<AtomicUsize>,
}

impl MemoryTx {
    fn injected_failure(&self) -> bool {
        let remaining = self.edge_insert_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            return false;
        }
        self.edge_insert_failure.store(remaining - 1, Ordering::SeqCst);
        remaining == 1
    }
}

impl StoreTx for MemoryTx {
    async fn take_friend_request(&mut self, request_id: Uuid) -> SocialResult<Option<FriendRequest>> {
        Ok(self.staged.take_friend_request(request_id))
    }

    async fn insert_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> SocialResult<FriendEdge> {
        if self.injected_failure() {
            return Err(SocialError::Storage(sqlx::Error::Protocol(
                "injected edge insert failure".to_string(),
            )));
        }
        self.staged.insert_friend_edge(user_id, friend_id)
    }

    async fn delete_friend_edge(&mut self, user_id: Uuid, friend_id: Uuid) -> SocialResult<u64> {
        Ok(self.staged.delete_friend_edge(user_id, friend_id))
    }

    async fn commit(self) -> SocialResult<()> {
        let MemoryTx { mut live, staged, .. } = self;
        *live = staged;
        Ok(())
    }
}

impl SocialStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> SocialResult<MemoryTx> {
        let live = self.state.clone().lock_owned().await;
        let staged = live.clone();
        Ok(MemoryTx {
            live,
            staged,
            edge_insert_failure: self.edge_insert_failure.clone(),
        })
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> SocialResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> SocialResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned())
    }

    async fn find_friend_profiles(&self, ids: &[Uuid]) -> SocialResult<Vec<FriendProfile>> {
        let state = self.state.lock().await;
        let mut profiles: Vec<FriendProfile> = state
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .map(|u| FriendProfile {
                id: u.id,
                username: u.username.clone(),
                nickname: u.nickname.clone(),
                profile_picture: u.profile_picture.clone(),
            })
            .collect();
        profiles.sort_by(|a, b| {
            (a.username.is_none(), &a.username, a.id).cmp(&(b.username.is_none(), &b.username, b.id))
        });
        Ok(profiles)
    }

    async fn update_user(&self, user_id: Uuid, update: &ProfileUpdate) -> SocialResult<Option<User>> {
        let mut state = self.state.lock().await;
        if let Some(username) = update.username.as_deref() {
            let taken = state
                .users
                .values()
                .any(|u| u.id != user_id && u.username.as_deref() == Some(username));
            if taken {
                return Err(SocialError::conflict(format!("username {username} is taken")));
            }
        }

        Ok(state.users.get_mut(&user_id).map(|user| {
            update.apply_to(user);
            user.clone()
        }))
    }

    async fn find_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> SocialResult<Option<FriendRequest>> {
        let state = self.state.lock().await;
        Ok(state
            .friend_requests
            .iter()
            .find(|r| r.user_id == requester_id && r.friend_id == target_id)
            .cloned())
    }

    async fn insert_friend_request(&self, requester_id: Uuid, target_id: Uuid) -> SocialResult<FriendRequest> {
        let mut state = self.state.lock().await;
        state.require_user(requester_id)?;
        state.require_user(target_id)?;
        let request = FriendRequest {
            id: Uuid::new_v4(),
            user_id: requester_id,
            friend_id: target_id,
            created_at: Some(Utc::now().naive_utc()),
        };
        state.friend_requests.push(request.clone());
        Ok(request)
    }

    async fn delete_friend_request(&self, request_id: Uuid) -> SocialResult<u64> {
        let mut state = self.state.lock().await;
        Ok(state.take_friend_request(request_id).map_or(0, |_| 1))
    }

    async fn list_incoming_friend_requests(&self, target_id: Uuid) -> SocialResult<Vec<IncomingFriendRequest>> {
        let state = self.state.lock().await;
        Ok(state
            .friend_requests
            .iter()
            .filter(|r| r.friend_id == target_id)
            .map(|r| IncomingFriendRequest {
                id: r.id,
                requester: state.users.get(&r.user_id).map(|u| RequesterProfile {
                    id: u.id,
                    username: u.username.clone(),
                    profile_picture: u.profile_picture.clone(),
                }),
            })
            .collect())
    }

    async fn list_friend_edges(&self, user_id: Uuid) -> SocialResult<Vec<FriendEdge>> {
        let state = self.state.lock().await;
        Ok(state
            .friends
            .iter()
            .filter(|e| e.user_id == user_id || e.friend_id == user_id)
            .cloned()
            .collect())
    }

    async fn friendship_exists(&self, user_id: Uuid, other_id: Uuid) -> SocialResult<bool> {
        let state = self.state.lock().await;
        Ok(state.friends.iter().any(|e| {
            (e.user_id == user_id && e.friend_id == other_id)
                || (e.user_id == other_id && e.friend_id == user_id)
        }))
    }

    async fn find_statuses(&self, user_ids: &[Uuid]) -> SocialResult<Vec<UserStatus>> {
        let state = self.state.lock().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| state.statuses.get(id).cloned())
            .collect())
    }

    async fn insert_status_if_absent(&self, user_id: Uuid) -> SocialResult<bool> {
        let mut state = self.state.lock().await;
        state.require_user(user_id)?;
        if state.statuses.contains_key(&user_id) {
            return Ok(false);
        }
        state.statuses.insert(
            user_id,
            UserStatus {
                id: Uuid::new_v4(),
                user_id,
                space_id: None,
                created_at: Some(Utc::now().naive_utc()),
            },
        );
        Ok(true)
    }

    async fn upsert_status_space(&self, user_id: Uuid, space_id: Uuid) -> SocialResult<()> {
        let mut state = self.state.lock().await;
        state.require_user(user_id)?;
        if !state.spaces.contains_key(&space_id) {
            return Err(SocialError::not_found(format!("space {space_id}")));
        }
        state
            .statuses
            .entry(user_id)
            .and_modify(|s| s.space_id = Some(space_id))
            .or_insert_with(|| UserStatus {
                id: Uuid::new_v4(),
                user_id,
                space_id: Some(space_id),
                created_at: Some(Utc::now().naive_utc()),
            });
        Ok(())
    }

    async fn clear_status_space(&self, user_id: Uuid) -> SocialResult<u64> {
        let mut state = self.state.lock().await;
        Ok(match state.statuses.get_mut(&user_id) {
            Some(status) => {
                status.space_id = None;
                1
            }
            None => 0,
        })
    }

    async fn delete_status(&self, user_id: Uuid) -> SocialResult<u64> {
        let mut state = self.state.lock().await;
        Ok(state.statuses.remove(&user_id).map_or(0, |_| 1))
    }

    async fn find_space_summaries(&self, space_ids: &[Uuid]) -> SocialResult<Vec<SpaceSummary>> {
        let state = self.state.lock().await;
        Ok(space_ids
            .iter()
            .filter_map(|id| state.spaces.get(id).map(SpaceSummary::from))
            .collect())
    }
}
