use std::sync::Arc;
use tracing::{debug, warn};

use super::{ServiceFactory, Translation, TranslationService};
use crate::config::Config;
use crate::error::Result;
use crate::language::{Language, RegionalSet};

/// Chooses a backend per language and falls back once on failure.
///
/// Regional languages try the regional service first and the general
/// service on any error. Everything else goes straight to the general
/// service. When nothing answers, the original text is passed through.
pub struct TranslationRouter {
    regional: Option<Arc<dyn TranslationService>>,
    general: Option<Arc<dyn TranslationService>>,
    regional_languages: RegionalSet,
}

impl TranslationRouter {
    pub fn new(
        regional: Option<Arc<dyn TranslationService>>,
        general: Option<Arc<dyn TranslationService>>,
        regional_languages: RegionalSet,
    ) -> Self {
        Self {
            regional,
            general,
            regional_languages,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let regional = match &config.services.regional {
            Some(service) => ServiceFactory::create("regional", service)?,
            None => None,
        };
        let general = match &config.services.general {
            Some(service) => ServiceFactory::create("general", service)?,
            None => None,
        };

        if regional.is_none() && general.is_none() {
            warn!("No translation service configured, text will be passed through unchanged");
        }

        Ok(Self::new(
            regional,
            general,
            RegionalSet::new(&config.languages.regional),
        ))
    }

    /// Largest key pool among the configured services
    pub fn credential_count(&self) -> usize {
        [&self.regional, &self.general]
            .into_iter()
            .flatten()
            .map(|service| service.credential_count())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn has_service(&self) -> bool {
        self.regional.is_some() || self.general.is_some()
    }

    pub async fn translate(&self, text: &str, language: &Language) -> Translation {
        if self.regional_languages.contains(language) {
            if let Some(regional) = &self.regional {
                match regional.translate(text, language).await {
                    Ok(translated) => {
                        return Translation::Translated {
                            text: translated,
                            service: regional.name().to_string(),
                        };
                    }
                    Err(e) => {
                        warn!("{} failed for {}, falling back: {}", regional.name(), language.name, e);
                    }
                }
            }
        }

        if let Some(general) = &self.general {
            match general.translate(text, language).await {
                Ok(translated) => {
                    return Translation::Translated {
                        text: translated,
                        service: general.name().to_string(),
                    };
                }
                Err(e) => {
                    warn!("{} failed for {}: {}", general.name(), language.name, e);
                }
            }
        }

        debug!("No translation for {} text, passing original through", language.name);
        Translation::Unavailable {
            original: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;
    use crate::translate::stub::StubService;

    fn french() -> &'static Language {
        language::find("fr").unwrap()
    }

    #[tokio::test]
    async fn test_regional_language_uses_regional_service() {
        let regional = Arc::new(StubService::prefixing("regional"));
        let general = Arc::new(StubService::prefixing("general"));
        let router = TranslationRouter::new(
            Some(regional.clone()),
            Some(general.clone()),
            RegionalSet::new(["fr"]),
        );

        let result = router.translate("Hello", french()).await;
        assert_eq!(
            result,
            Translation::Translated {
                text: "[French] Hello".to_string(),
                service: "regional".to_string()
            }
        );
        assert_eq!(regional.calls(), 1);
        assert_eq!(general.calls(), 0);
    }

    #[tokio::test]
    async fn test_regional_failure_falls_back_once() {
        let regional = Arc::new(StubService::failing("regional"));
        let general = Arc::new(StubService::prefixing("general"));
        let router = TranslationRouter::new(
            Some(regional.clone()),
            Some(general.clone()),
            RegionalSet::new(["fr"]),
        );

        let result = router.translate("Hello", french()).await;
        assert_eq!(result.text(), "[French] Hello");
        assert_eq!(regional.calls(), 1);
        assert_eq!(general.seen(), vec!["Hello".to_string()]);
    }

    #[tokio::test]
    async fn test_other_languages_skip_regional_service() {
        let regional = Arc::new(StubService::prefixing("regional"));
        let general = Arc::new(StubService::prefixing("general"));
        let router = TranslationRouter::new(
            Some(regional.clone()),
            Some(general.clone()),
            RegionalSet::new(["km"]),
        );

        router.translate("Hello", french()).await;
        assert_eq!(regional.calls(), 0);
        assert_eq!(general.calls(), 1);
    }

    #[tokio::test]
    async fn test_regional_language_without_regional_service() {
        let general = Arc::new(StubService::prefixing("general"));
        let router = TranslationRouter::new(None, Some(general.clone()), RegionalSet::new(["fr"]));

        let result = router.translate("Hello", french()).await;
        assert!(result.is_translated());
        assert_eq!(general.calls(), 1);
    }

    #[tokio::test]
    async fn test_everything_failing_passes_original_through() {
        let router = TranslationRouter::new(
            Some(Arc::new(StubService::failing("regional"))),
            Some(Arc::new(StubService::failing("general"))),
            RegionalSet::new(["fr"]),
        );
        let result = router.translate("Hello", french()).await;
        assert_eq!(
            result,
            Translation::Unavailable {
                original: "Hello".to_string()
            }
        );

        let empty = TranslationRouter::new(None, None, RegionalSet::default());
        assert!(!empty.has_service());
        assert_eq!(empty.translate("Hello", french()).await.text(), "Hello");
    }

    #[test]
    fn test_credential_count() {
        let router = TranslationRouter::new(
            Some(Arc::new(StubService::prefixing("regional").with_credentials(3))),
            Some(Arc::new(StubService::prefixing("general"))),
            RegionalSet::default(),
        );
        assert_eq!(router.credential_count(), 3);

        let empty = TranslationRouter::new(None, None, RegionalSet::default());
        assert_eq!(empty.credential_count(), 1);
    }
}
