//! Effect handlers for the Vitrine application core.
//!
//! Each module implements one `vitrine-core` effect trait. The in-memory
//! handlers are complete implementations of their contracts, not stubs: they
//! back local development and every integration test, and they expose the
//! same push-snapshot semantics a production backend would (watched queries
//! republish on every write). Production backends implement the same traits
//! out of tree.

pub mod auth;
pub mod channel_store;
pub mod clock;
pub mod document_store;
pub mod object_storage;
pub mod translator;

pub use auth::StaticAuthProvider;
pub use channel_store::MemoryChannelStore;
pub use clock::{SimulatedClock, SystemClock};
pub use document_store::MemoryDocumentStore;
pub use object_storage::MemoryObjectStorage;
pub use translator::{FailingTranslator, TaggingTranslator};
