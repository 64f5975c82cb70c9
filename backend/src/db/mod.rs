pub mod connection;
pub mod friends;
pub mod memory;
pub mod postgres;
pub mod presence;
pub mod spaces;
pub mod store;
pub mod users;

pub use connection::{get_db_pool, DatabaseConfig};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{SocialStore, StoreTx};
