//! Shared command context.

use std::path::Path;

use till::{catalog::Catalog, fixtures, storage::JsonFileBackend, store::Store};

use crate::config::StoreConfig;

/// Everything a command needs: the persistent store and the catalog.
#[derive(Debug)]
pub(crate) struct CliContext {
    pub store: Store<JsonFileBackend>,
    pub catalog: Catalog,
}

impl CliContext {
    /// Opens the store under the configured data directory and loads the
    /// catalog, falling back to the built-in demo catalog when no catalog
    /// file is configured.
    ///
    /// A configured catalog file that fails to load degrades to an empty
    /// catalog with a logged error; the cart and order archive stay usable.
    pub(crate) fn open(config: &StoreConfig) -> Result<Self, String> {
        let backend = JsonFileBackend::open(&config.data_dir)
            .map_err(|error| format!("failed to open data directory: {error}"))?;

        let store =
            Store::open(backend).map_err(|error| format!("failed to load store state: {error}"))?;

        let catalog = match config.catalog.as_deref() {
            Some(path) => load_catalog(path),
            None => fixtures::demo_catalog()
                .map_err(|error| format!("failed to load built-in catalog: {error}"))?,
        };

        Ok(Self { store, catalog })
    }
}

fn load_catalog(path: &Path) -> Catalog {
    tracing::debug!(path = %path.display(), "loading catalog file");

    match Catalog::from_path(path) {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to load catalog");
            Catalog::from_products(Vec::new())
        }
    }
}
