pub mod store;
pub mod postgres;
pub mod memory;
pub mod timer;
pub mod user_info;
pub mod directory;

pub use store::Store;
pub use postgres::PgStore;
pub use memory::MemoryStore;
pub use timer::TaskTimer;
pub use user_info::{UserInfoClient, UserInfoLookup};
pub use directory::PassportDirectory;
