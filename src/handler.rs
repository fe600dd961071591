//! Request boundary.
//!
//! Every user interaction goes through [`RequestHandler`]. Errors raised
//! below it are turned into a message for the user with
//! [`RequestHandler::user_message`]; none of them stop the process.

use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::batch::BatchTranslator;
use crate::config::Config;
use crate::error::{Result, SubrelayError};
use crate::job::{SubtitleJob, TranslatedDocument, Upload};
use crate::language::{self, Language};
use crate::preferences::PreferenceStore;
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::translate::{Translation, TranslationRouter};

pub struct RequestHandler {
    preferences: Arc<dyn PreferenceStore>,
    router: Arc<TranslationRouter>,
    job: SubtitleJob,
    default_language: &'static Language,
}

impl RequestHandler {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        router: Arc<TranslationRouter>,
        batch: Arc<BatchTranslator>,
        default_language: &'static Language,
    ) -> Self {
        Self {
            preferences,
            router,
            job: SubtitleJob::new(batch),
            default_language,
        }
    }

    pub fn from_config(config: &Config, preferences: Arc<dyn PreferenceStore>) -> Result<Self> {
        let default_language = language::find(&config.languages.default_language).ok_or_else(|| {
            SubrelayError::Config(format!(
                "Unknown default language: {}",
                config.languages.default_language
            ))
        })?;

        let router = Arc::new(TranslationRouter::from_config(config)?);
        let batch = Arc::new(BatchTranslator::new(Arc::clone(&router), &config.batch));

        Ok(Self::new(preferences, router, batch, default_language))
    }

    /// Store the language picked by `user`. Accepts `fr` or `/fr`.
    pub async fn select_language(&self, user: &str, command: &str) -> Result<&'static Language> {
        let language = language::find(command)
            .ok_or_else(|| SubrelayError::UnknownLanguage(command.trim().to_string()))?;

        self.preferences.set(user, language.command).await;
        info!("User {} switched to {}", user, language.name);
        Ok(language)
    }

    /// Stored preference, or the default when there is none
    pub async fn language_for(&self, user: &str) -> &'static Language {
        match self.preferences.get(user).await {
            Some(command) => language::find(&command).unwrap_or_else(|| {
                warn!("Stored language {:?} for {} is no longer supported", command, user);
                self.default_language
            }),
            None => self.default_language,
        }
    }

    /// Translate a plain text message into the user's language
    pub async fn translate_message(&self, user: &str, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(SubrelayError::EmptyInput);
        }

        let language = self.language_for(user).await;
        let span = info_span!("message", request = %Uuid::new_v4(), user, language = language.code);

        async {
            match self.router.translate(text, language).await {
                Translation::Translated { text, service } => {
                    info!("Message translated by {}", service);
                    Ok(text)
                }
                Translation::Unavailable { .. } => Err(SubrelayError::ServiceUnavailable),
            }
        }
        .instrument(span)
        .await
    }

    /// Translate an uploaded subtitle file into the user's language.
    /// Failures are also pushed to the progress channel.
    pub async fn translate_document(
        &self,
        user: &str,
        upload: &Upload,
        reporter: &dyn ProgressReporter,
    ) -> Result<TranslatedDocument> {
        let language = self.language_for(user).await;
        let span = info_span!(
            "document",
            request = %Uuid::new_v4(),
            user,
            file = %upload.file_name,
            language = language.code
        );

        async {
            let result = self.job.run(upload, language, reporter).await;
            if let Err(e) = &result {
                warn!("Document translation failed: {}", e);
                reporter
                    .report(ProgressEvent::Failed {
                        message: Self::user_message(e),
                    })
                    .await;
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Listing shown to users choosing a language
    pub fn language_list(&self) -> String {
        format!(
            "🌐 Supported languages ({}):\n\n{}",
            language::LANGUAGES.len(),
            language::command_list()
        )
    }

    /// Message shown to the user for a failed request
    pub fn user_message(error: &SubrelayError) -> String {
        match error {
            SubrelayError::UnsupportedFormat(_) => {
                "Please send a subtitle file with the .srt extension.".to_string()
            }
            SubrelayError::UnreadableSubtitle(_) => {
                "The subtitle file could not be read. Check that it is a valid .srt file.".to_string()
            }
            SubrelayError::CapacityExceeded { entries, limit } => format!(
                "The subtitle file has {} entries; at most {} can be translated at once.",
                entries, limit
            ),
            SubrelayError::UnknownLanguage(command) => format!(
                "Unknown language '{}'. Use /list to see the supported languages.",
                command
            ),
            SubrelayError::EmptyInput => "Send some text to translate.".to_string(),
            SubrelayError::ServiceUnavailable => {
                "Translation is unavailable right now. Please try again later.".to_string()
            }
            _ => "A technical problem occurred. Please try again.".to_string(),
        }
    }
}
