//! Disposable backing services for integration tests.
//!
//! Starts single-node Redis and MySQL containers on random host ports so
//! storage tests run against real servers without touching shared state.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
pub use mysql::{MySqlServer, MysqlConfig};
pub use redis::RedisServer;
