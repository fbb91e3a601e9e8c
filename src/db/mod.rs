pub mod redis;
pub mod sqlite;

pub use self::redis::create_redis_client;
pub use self::redis::RedisSessionStore;
pub use self::sqlite::create_pool;
