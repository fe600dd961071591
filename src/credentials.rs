use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector over the API keys of one backend.
///
/// The cursor is an atomic counter so concurrent batch workers each get
/// the next key without a lock.
#[derive(Debug, Default)]
pub struct CredentialRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialRotator {
    /// Blank and duplicate keys are dropped, first occurrence wins
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into().trim().to_string();
            if !key.is_empty() && !unique.contains(&key) {
                unique.push(key);
            }
        }

        Self {
            keys: unique,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn next(&self) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        Some(&self.keys[index])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
