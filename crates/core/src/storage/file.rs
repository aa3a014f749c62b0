//! File backend

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// One-file-per-key backend storing each value as `<key>.json` under a
/// root directory.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    /// Opens the backend, creating the root directory if needed.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();

        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Returns the directory values are stored under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    // Keys become file names, so anything beyond alphanumerics is refused.
    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || !key.chars().all(char::is_alphanumeric) {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }

        Ok(self.root.join(format!("{key}.json")))
    }
}

impl StorageBackend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.value_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.value_path(key)?, value)?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.value_path(key)?) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn values_survive_reopening_the_directory() -> TestResult {
        let dir = tempfile::tempdir()?;

        let mut backend = JsonFileBackend::open(dir.path())?;
        backend.write("cart", r#"[{"id":1}]"#)?;

        let reopened = JsonFileBackend::open(dir.path())?;

        assert_eq!(reopened.read("cart")?, Some(r#"[{"id":1}]"#.to_owned()));

        Ok(())
    }

    #[test]
    fn missing_files_read_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let backend = JsonFileBackend::open(dir.path())?;

        assert_eq!(backend.read("orders")?, None);

        Ok(())
    }

    #[test]
    fn removing_a_missing_key_is_fine() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut backend = JsonFileBackend::open(dir.path())?;

        backend.remove("orders")?;

        Ok(())
    }

    #[test]
    fn path_like_keys_are_refused() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut backend = JsonFileBackend::open(dir.path())?;

        let result = backend.write("../escape", "{}");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(key)) if key == "../escape"),
            "keys with path separators must be rejected"
        );

        Ok(())
    }
}
