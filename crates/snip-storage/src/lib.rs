//! [`MappingStore`](snip_core::MappingStore) backends for the Snip URL
//! shortener.
//!
//! Three implementations of the same conditional-insert contract:
//! a DashMap-backed store for tests and single-process use, a Redis store
//! built on `SET NX`, and a MySQL store built on a primary-key insert with
//! the duplicate-key error mapped to the lost-race outcome.

pub mod memory;
pub mod mysql;
pub mod redis;

pub use memory::InMemoryMappingStore;
pub use mysql::MySqlMappingStore;
pub use redis::RedisMappingStore;
