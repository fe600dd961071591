use futures::stream::{self, StreamExt};
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::BatchConfig;
use crate::error::{Result, SubrelayError};
use crate::language::Language;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::subtitle::SubtitleEntry;
use crate::translate::TranslationRouter;

/// Translated entries plus how many of them actually changed hands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub entries: Vec<SubtitleEntry>,
    pub translated: usize,
    pub passthrough: usize,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.entries.len()
    }
}

/// Translates every caption of a subtitle file independently
pub struct BatchTranslator {
    router: Arc<TranslationRouter>,
    max_entries: usize,
    progress_interval: usize,
    concurrency: usize,
}

impl BatchTranslator {
    pub fn new(router: Arc<TranslationRouter>, config: &BatchConfig) -> Self {
        let concurrency = if config.parallel {
            router.credential_count()
        } else {
            1
        };

        Self {
            router,
            max_entries: config.max_entries.max(1),
            progress_interval: config.progress_interval.max(1),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate the caption text of every entry, keeping order, sequence
    /// numbers and time ranges. Batches over the entry limit are rejected
    /// before any service is called.
    pub async fn translate_entries(
        &self,
        entries: Vec<SubtitleEntry>,
        language: &Language,
        reporter: &dyn ProgressReporter,
    ) -> Result<BatchOutcome> {
        let total = entries.len();
        if total > self.max_entries {
            return Err(SubrelayError::CapacityExceeded {
                entries: total,
                limit: self.max_entries,
            });
        }

        info!(
            "Translating {} entries to {} (concurrency {})",
            total, language.name, self.concurrency
        );
        reporter
            .report(ProgressEvent::Started {
                total,
                language: language.name.to_string(),
            })
            .await;

        let router = &self.router;
        let mut results = pin!(
            stream::iter(entries)
                .map(|entry| async move {
                    let translation = router.translate(&entry.text, language).await;
                    (entry, translation)
                })
                .buffered(self.concurrency)
        );

        let mut translated_entries = Vec::with_capacity(total);
        let mut translated = 0;
        let mut passthrough = 0;

        while let Some((entry, translation)) = results.next().await {
            if translation.is_translated() {
                translated += 1;
            } else {
                passthrough += 1;
            }
            debug!("Entry {}: {:?} -> {:?}", entry.sequence, entry.text, translation.text());
            translated_entries.push(entry.with_text(translation.into_text()));

            let done = translated_entries.len();
            if done % self.progress_interval == 0 {
                reporter.report(ProgressEvent::Advanced { done, total }).await;
            }
        }

        info!(
            "Batch finished: {} translated, {} passed through",
            translated, passthrough
        );
        reporter
            .report(ProgressEvent::Finished {
                translated,
                passthrough,
                total,
            })
            .await;

        Ok(BatchOutcome {
            entries: translated_entries,
            translated,
            passthrough,
        })
    }
}
