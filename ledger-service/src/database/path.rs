use std::{fs, path::Path};

use anyhow::{bail, Result};

use super::constants::MEMORY_DB_PATH;

/// Reject database paths that could escape the working tree or clobber
/// something that is not a regular file.
pub fn validate_db_path(db_path: &str) -> Result<()> {
    if db_path == MEMORY_DB_PATH {
        return Ok(());
    }
    if db_path.is_empty() {
        bail!("DB_PATH is empty");
    }
    if db_path.chars().any(char::is_control) {
        bail!("DB_PATH contains control characters");
    }

    let path = Path::new(db_path);
    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        bail!("DB_PATH must not contain '..'");
    }
    if path.file_name().is_none() {
        bail!("DB_PATH must name a file");
    }

    if let Ok(meta) = fs::symlink_metadata(path) {
        if meta.file_type().is_symlink() {
            bail!("DB_PATH must not be a symlink");
        }
        if meta.is_dir() {
            bail!("DB_PATH points to a directory");
        }
    }

    Ok(())
}
