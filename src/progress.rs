use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::Mutex;
use tracing::{error, info};

/// Notification sent back to whoever asked for the translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started {
        total: usize,
        language: String,
    },
    Advanced {
        done: usize,
        total: usize,
    },
    Finished {
        translated: usize,
        passthrough: usize,
        total: usize,
    },
    Failed {
        message: String,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { total, language } => {
                write!(f, "⏳ Translating {} subtitle entries to {}...", total, language)
            }
            Self::Advanced { done, total } => write!(f, "🔄 {}/{} entries done", done, total),
            Self::Finished {
                translated,
                passthrough,
                total,
            } => {
                if *passthrough == 0 {
                    write!(f, "✅ Translated all {} entries", total)
                } else {
                    write!(
                        f,
                        "⚠️ Translated {} of {} entries; {} kept in the original language",
                        translated, total, passthrough
                    )
                }
            }
            Self::Failed { message } => write!(f, "❌ {}", message),
        }
    }
}

/// Progress channel for a single request
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, event: ProgressEvent);
}

/// Reports progress through the log
#[derive(Debug, Default)]
pub struct LogReporter;

#[async_trait]
impl ProgressReporter for LogReporter {
    async fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Failed { .. } => error!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Terminal progress bar
pub struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressReporter for ConsoleReporter {
    async fn report(&self, event: ProgressEvent) {
        let mut guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        match &event {
            ProgressEvent::Started { total, .. } => {
                let bar = ProgressBar::new(*total as u64);
                bar.set_style(Self::style());
                bar.set_message(event.to_string());
                *guard = Some(bar);
            }
            ProgressEvent::Advanced { done, .. } => {
                if let Some(bar) = guard.as_ref() {
                    bar.set_position(*done as u64);
                }
            }
            ProgressEvent::Finished { .. } | ProgressEvent::Failed { .. } => {
                match guard.take() {
                    Some(bar) => bar.finish_with_message(event.to_string()),
                    None => println!("{}", event),
                }
            }
        }
    }
}

/// Keeps every event, for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn advances(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Advanced { done, .. } => Some(done),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
