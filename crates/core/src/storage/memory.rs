//! Memory backend

use rustc_hash::FxHashMap;

use super::{StorageBackend, StorageError};

/// In-memory backend; the default for tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    values: FxHashMap<String, String>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reads_back_what_was_written() -> TestResult {
        let mut backend = MemoryBackend::new();

        backend.write("cart", "[]")?;

        assert_eq!(backend.read("cart")?, Some("[]".to_owned()));
        assert_eq!(backend.len(), 1);

        Ok(())
    }

    #[test]
    fn removal_is_idempotent() -> TestResult {
        let mut backend = MemoryBackend::new();

        backend.write("cart", "[]")?;
        backend.remove("cart")?;
        backend.remove("cart")?;

        assert!(backend.is_empty(), "expected the key to be gone");

        Ok(())
    }
}
