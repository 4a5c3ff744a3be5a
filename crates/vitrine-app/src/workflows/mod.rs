//! User-initiated operations over the effect traits.

mod assets;
mod chat;
mod draft;
mod translate;

pub use assets::AssetWorkflow;
pub use chat::ChatWorkflow;
pub use draft::DraftWorkflow;
pub use translate::{TranslateBatch, TranslateWorkflow};
