pub mod friends;
pub mod presence;
pub mod spaces;
pub mod users;

pub use friends::{
    FriendEdge, FriendProfile, FriendRequest, FriendWithStatus, IncomingFriendRequest,
    IncomingFriendRequestRow, RequesterProfile,
};
pub use presence::{FriendStatus, PresenceState, UserStatus};
pub use spaces::{Space, SpaceSummary, SpaceTheme};
pub use users::{ProfileUpdate, User};
