//! User and task storage for the task tracker.
//!
//! This crate provides a storage abstraction over users and the tasks they
//! own. It supports an in-memory backend (for demos and tests) and
//! PostgreSQL (for durable deployments), with identical semantics.

mod demo;
mod error;
mod input;
mod memory;
mod postgres;
mod store;
mod traits;

pub use demo::*;
pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use store::*;
pub use traits::*;
