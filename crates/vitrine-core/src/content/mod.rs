//! Path-addressed content drafts
//!
//! Site content lives in one JSON document per page, with per-locale copies
//! nested under locale keys. Editors address individual fields by dotted
//! path ("hero.title", "features.0.label") and the draft vivifies missing
//! intermediate containers on write.

mod draft;
mod path;

pub use draft::ContentDraft;
pub use path::{FieldPath, PathSegment};
