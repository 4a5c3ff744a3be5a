//! # Vitrine Core
//!
//! Layer 1 of the Vitrine workspace: the pure types and contracts every other
//! crate builds on.
//!
//! - [`errors`]: the unified [`VitrineError`] type and `Result` alias
//! - [`types`]: identifiers, locales, and normalized chat shapes
//! - [`time`]: epoch-millis normalization from heterogeneous upstream encodings
//! - [`reactive`]: the poll-based [`Dynamic`](reactive::Dynamic) observable cell
//! - [`content`]: the nested content-draft document with path-addressed mutation
//! - [`effects`]: traits for the external collaborators (document store,
//!   realtime channel store, auth, object storage, translation, clock)
//!
//! This crate never talks to a backend itself; handlers for the effect traits
//! live in `vitrine-effects`, and the headless application state machine that
//! consumes them lives in `vitrine-app`.

pub mod content;
pub mod effects;
pub mod errors;
pub mod reactive;
pub mod time;
pub mod types;

pub use errors::{Result, VitrineError};
