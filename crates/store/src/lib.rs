//! Storage boundary for the storefront.
//!
//! [`StorefrontStore`] is the single trait every workflow talks to. Two
//! implementations are provided: [`MemoryStore`] for tests and local runs,
//! and [`PgStore`] backed by PostgreSQL. The multi-entity units of work
//! (checkout commit, status transition) are part of the trait so that both
//! backends give the same all-or-nothing guarantees.

mod error;
mod memory;
mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{StatusUpdate, StorefrontStore};
