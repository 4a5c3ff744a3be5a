//! View data: what a frontend renders
//!
//! Plain records with no callbacks and no store handles. The feed adapters
//! produce them, the aggregator combines them, and any shell can display them.

pub mod display;
pub mod notifications;

pub use notifications::{
    aggregate, AggregatedFeed, NotificationKind, NotificationRecord, NotificationSource, RouteHint,
};
