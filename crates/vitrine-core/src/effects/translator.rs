//! Translation service contract.

use crate::errors::Result;
use crate::types::Locale;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Per-field translations keyed by dotted field path, then target locale.
pub type TranslationResult = BTreeMap<String, BTreeMap<Locale, String>>;

/// Machine-translation backend.
///
/// One call translates a whole batch of fields into every target locale.
/// The contract is all-or-nothing: a handler either returns a complete map
/// (every input key, every target locale) or an error, never a partial
/// result. Callers rely on that when they merge translations into a draft.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate each `texts` entry from `source` into all of `targets`.
    async fn translate(
        &self,
        texts: BTreeMap<String, String>,
        source: &Locale,
        targets: &[Locale],
    ) -> Result<TranslationResult>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for std::sync::Arc<T> {
    async fn translate(
        &self,
        texts: BTreeMap<String, String>,
        source: &Locale,
        targets: &[Locale],
    ) -> Result<TranslationResult> {
        (**self).translate(texts, source, targets).await
    }
}
