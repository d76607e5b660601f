//! # Memory Management
//!
//! Reuse allocators for entity and component instances.
//!
//! ## Design Philosophy
//!
//! Instances are never dropped while a room is running:
//! - Destroyed components go back to their type's pool
//! - Every release resets the instance first
//! - Pools grow on demand, there is no capacity ceiling

mod pool;

pub use pool::{Pool, PoolStats, Poolable};
