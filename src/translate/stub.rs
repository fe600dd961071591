//! Deterministic in-process services for tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::TranslationService;
use crate::error::{Result, SubrelayError};
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StubBehavior {
    /// Answer `[<language name>] <text>`
    Prefix,
    /// Answer from a fixed table, falling back to `Prefix`
    Table(&'static [(&'static str, &'static str)]),
    /// Every call fails
    Failing,
}

#[derive(Debug)]
pub struct StubService {
    name: String,
    behavior: StubBehavior,
    credentials: usize,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl StubService {
    pub fn new(name: &str, behavior: StubBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior,
            credentials: 1,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn prefixing(name: &str) -> Self {
        Self::new(name, StubBehavior::Prefix)
    }

    pub fn failing(name: &str) -> Self {
        Self::new(name, StubBehavior::Failing)
    }

    pub fn with_credentials(mut self, credentials: usize) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts received, in call order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationService for StubService {
    fn name(&self) -> &str {
        &self.name
    }

    fn credential_count(&self) -> usize {
        self.credentials
    }

    async fn translate(&self, text: &str, language: &Language) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());

        match self.behavior {
            StubBehavior::Failing => Err(SubrelayError::Translation(format!(
                "{} is down",
                self.name
            ))),
            StubBehavior::Table(table) => Ok(table
                .iter()
                .find(|(source, _)| *source == text)
                .map(|(_, target)| target.to_string())
                .unwrap_or_else(|| format!("[{}] {}", language.name, text))),
            StubBehavior::Prefix => Ok(format!("[{}] {}", language.name, text)),
        }
    }
}
