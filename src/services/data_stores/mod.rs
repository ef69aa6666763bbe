mod hashmap_password_reset_store;
mod hashmap_two_factor_store;
mod hashmap_user_store;
mod hashset_banned_token_store;
mod postgres_catalog_store;
mod postgres_my_list_store;
mod postgres_password_reset_store;
mod postgres_profile_store;
mod postgres_two_factor_store;
mod postgres_user_store;
mod postgres_watch_history_store;
mod redis_banned_token_store;

pub use hashmap_password_reset_store::*;
pub use hashmap_two_factor_store::*;
pub use hashmap_user_store::*;
pub use hashset_banned_token_store::*;
pub use postgres_catalog_store::*;
pub use postgres_my_list_store::*;
pub use postgres_password_reset_store::*;
pub use postgres_profile_store::*;
pub use postgres_two_factor_store::*;
pub use postgres_user_store::*;
pub use postgres_watch_history_store::*;
pub use redis_banned_token_store::*;
