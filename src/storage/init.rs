//! Storage provisioning
//!
//! First-run setup of the data directory and the three store files.
//! Provisioning is explicit rather than a side effect of opening a store,
//! so a caller can distinguish "fresh install" from "data directory lost".

use tracing::info;

use crate::config::{LedgerPaths, Settings};
use crate::error::LedgerError;

/// True when the data directory has not been provisioned yet
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.accounts_file().exists()
}

/// Create the data directory, the settings file, and empty store files.
///
/// Already-existing files are left alone, so re-running after a partial
/// first run completes it instead of wiping data.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<Settings, LedgerError> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    for path in [
        paths.accounts_file(),
        paths.transactions_file(),
        paths.failures_file(),
    ] {
        if !path.exists() {
            super::file_io::write_json_atomic(&path, &serde_json::json!({}))?;
        }
    }

    info!(data_dir = %paths.data_dir().display(), "Storage initialized");
    Ok(settings)
}
