//! Headless application core for the Vitrine admin console.
//!
//! Everything an admin-console frontend needs short of rendering: the
//! aggregated notification feed (chat + system sources), the toast queue, the
//! live-preview channel, and the content workflows (drafts, auto-translate,
//! assets, chat actions). The crate is UI-free and runtime-light: state is
//! exposed through `vitrine_core::reactive` handles that any shell (web,
//! terminal, tests) can poll from its own loop.
//!
//! Layering:
//! - [`views`] — plain data the UI renders (records, feed, formatting)
//! - [`feed`] — source adapters and the aggregator (the engine)
//! - [`toasts`] — transient notification queue
//! - [`preview`] — origin-checked channel to an embedded preview surface
//! - [`workflows`] — user-initiated operations over the effect traits

pub mod errors;
pub mod feed;
pub mod preview;
pub mod toasts;
pub mod views;
pub mod workflows;

pub use errors::AppError;
pub use toasts::{ToastLevel, ToastQueue};
