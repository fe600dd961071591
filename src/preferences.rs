use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Per-user target language storage. Values are language command tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, user: &str) -> Option<String>;

    /// Last write wins
    async fn set(&self, user: &str, command: &str);
}

/// Process-lifetime store; preferences are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferences {
    async fn get(&self, user: &str) -> Option<String> {
        self.entries.read().await.get(user).cloned()
    }

    async fn set(&self, user: &str, command: &str) {
        self.entries
            .write()
            .await
            .insert(user.to_string(), command.to_string());
    }
}
