pub mod presence;
pub mod relationships;
pub mod repository;
pub mod status;

pub use presence::PresenceTracker;
pub use relationships::Relationships;
pub use repository::SocialRepository;
pub use status::StatusResolver;
