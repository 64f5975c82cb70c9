//! Turns presence rows into caller-facing [`FriendStatus`] values.
//!
//! Works in two passes instead of joining users, presence and spaces: the
//! first pass classifies every friend from presence alone, the second fetches
//! the distinct spaces referenced and substitutes their summaries. A space
//! that no longer exists leaves the raw id behind as `UnknownSpace`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::db::SocialStore;
use crate::error::SocialResult;
use crate::models::{FriendProfile, FriendStatus, FriendWithStatus, PresenceState, SpaceSummary};

pub struct StatusResolver<S> {
    store: Arc<S>,
}

impl<S: SocialStore> StatusResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn resolve_friend_statuses(&self, friends: Vec<FriendProfile>) -> SocialResult<Vec<FriendWithStatus>> {
        if friends.is_empty() {
            return Ok(Vec::new());
        }

        // Pass one: presence only.
        let ids: Vec<Uuid> = friends.iter().map(|f| f.id).collect();
        let statuses = self.store.find_statuses(&ids).await?;
        let by_user: HashMap<Uuid, _> = statuses.iter().map(|s| (s.user_id, s)).collect();
        let classified: Vec<(FriendProfile, PresenceState)> = friends
            .into_iter()
            .map(|friend| {
                let state = PresenceState::from(by_user.get(&friend.id).copied());
                (friend, state)
            })
            .collect();

        // Pass two: resolve the spaces referenced above.
        let space_ids: Vec<Uuid> = classified
            .iter()
            .filter_map(|(_, state)| match state {
                PresenceState::InSpace(space_id) => Some(*space_id),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let spaces: HashMap<Uuid, SpaceSummary> = self
            .store
            .find_space_summaries(&space_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(classified
            .into_iter()
            .map(|(friend, state)| {
                let status = match state {
                    PresenceState::Offline => FriendStatus::Offline,
                    PresenceState::Online => FriendStatus::Online,
                    PresenceState::InSpace(space_id) => match spaces.get(&space_id) {
                        Some(space) => FriendStatus::InSpace {
                            id: space.id,
                            name: space.name.clone(),
                        },
                        None => {
                            debug!(friend_id = %friend.id, %space_id, "Presence points at a missing space");
                            FriendStatus::UnknownSpace { id: space_id }
                        }
                    },
                };
                FriendWithStatus::new(friend, status)
            })
            .collect())
    }
}
