//! Poll-based reactive primitives
//!
//! The aggregation layer recombines several live data sources into one feed.
//! Rather than callbacks, sources publish into a [`Dynamic`] and consumers
//! hold a [`Subscription`] they poll from their own loop. This keeps the core
//! runtime-agnostic: nothing here spawns tasks or assumes an executor.

mod dynamic;

pub use dynamic::{Dynamic, Subscription};
