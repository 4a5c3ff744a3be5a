//! Effect traits for external collaborators
//!
//! Everything the application core needs from the outside world is named by a
//! trait here: the document store, the realtime channel store, auth, object
//! storage, the translation service, and the clock. Handlers live in
//! `vitrine-effects`; the core and the workflows only ever see these
//! contracts, which is what makes the whole stack runnable against in-memory
//! handlers in tests.
//!
//! All traits carry an `Arc<T>` blanket impl so call sites can hold
//! `Arc<dyn Trait>` without ceremony.

pub mod auth;
pub mod channel_store;
pub mod clock;
pub mod document_store;
pub mod object_storage;
pub mod translator;

pub use auth::AuthProvider;
pub use channel_store::ChannelStore;
pub use clock::Clock;
pub use document_store::{Document, DocumentStore, QuerySpec, Snapshot};
pub use object_storage::ObjectStorage;
pub use translator::Translator;
