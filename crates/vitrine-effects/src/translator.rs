//! Translation handlers.

use async_trait::async_trait;
use std::collections::BTreeMap;
use vitrine_core::effects::{translator::TranslationResult, Translator};
use vitrine_core::types::Locale;
use vitrine_core::{Result, VitrineError};

/// Deterministic translator for development and tests.
///
/// "Translates" by tagging each text with its target locale
/// (`"[de] Welcome"`), which keeps outputs recognizable and makes merge
/// assertions trivial. Honors the all-or-nothing contract trivially since it
/// cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggingTranslator;

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(
        &self,
        texts: BTreeMap<String, String>,
        _source: &Locale,
        targets: &[Locale],
    ) -> Result<TranslationResult> {
        let mut result = TranslationResult::new();
        for (key, text) in texts {
            let mut per_locale = BTreeMap::new();
            for target in targets {
                per_locale.insert(target.clone(), format!("[{target}] {text}"));
            }
            result.insert(key, per_locale);
        }
        Ok(result)
    }
}

/// Translator that always fails, for exercising the no-partial-merge path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(
        &self,
        _texts: BTreeMap<String, String>,
        _source: &Locale,
        _targets: &[Locale],
    ) -> Result<TranslationResult> {
        Err(VitrineError::translation("translation backend unavailable"))
    }
}
