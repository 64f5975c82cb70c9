pub mod models;
pub mod db;
pub mod services;
pub mod handlers;
pub mod utils;
pub mod constants;
pub mod error;

pub use utils::config::Config;
pub use db::connection::get_db_pool;
pub use db::{MemoryStore, PgStore, SocialStore};
pub use error::{ErrorKind, SocialError, SocialResult};
pub use services::SocialRepository;

// Re-export common types
pub use sqlx::PgPool;
pub use uuid::Uuid;
