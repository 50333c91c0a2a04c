//! # Local Certificate Cache
//!
//! This module keeps downloaded certificate files on disk so that repeated catalog
//! loads do not hit the download point again.
//!
//! ## Cache Structure
//!
//! The cache mirrors the remote layout below a `data` subdirectory:
//!
//! ```text
//! <cache_directory>/data/ECC/ROOT-CA/GEM.RCA5_TEST-ONLY.der
//! ```
//!
//! Certificates are immutable once published, so cached entries never expire.
//! Directory listings and manifests are not cached.

use std::fs::{create_dir_all, remove_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::common::{RootCaError, RootCaResult};

/// A cache for storing certificate files locally
#[derive(Debug, Clone)]
pub struct Cache {
    /// The root directory where cache files are stored.
    pub cache_directory: String,
}

impl Cache {
    /// Creates a new cache instance with the specified root directory.
    ///
    /// # Errors
    ///
    /// Returns `RootCaError::FileNotFound` if the path cannot be converted to a string.
    pub fn new(cache_directory: &str) -> RootCaResult<Self> {
        let path = Path::new(cache_directory);
        Ok(Self {
            cache_directory: path.to_str().ok_or(RootCaError::FileNotFound)?.into(),
        })
    }

    /// Creates the `data` directory of the cache if it doesn't exist.
    pub fn initialize(&self) -> RootCaResult<()> {
        create_dir_all(self.data_directory())?;
        Ok(())
    }

    /// Gets the path where a file would be stored in the cache, without checking
    /// if it actually exists.
    pub fn add(&self, file_name: &str) -> PathBuf {
        self.data_directory().join(file_name.trim_start_matches('/'))
    }

    /// Retrieves the path to a file if it exists in the cache.
    pub fn get(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.add(file_name);
        if path.is_file() {
            return Some(path);
        }
        None
    }

    /// Writes a file into the cache, creating intermediate directories.
    ///
    /// The content is written to a temporary file next to the target and renamed
    /// into place, so readers never see a partially written entry.
    pub fn store(&self, file_name: &str, content: &[u8]) -> RootCaResult<PathBuf> {
        let path = self.add(file_name);
        let parent = path.parent().ok_or(RootCaError::FileNotFound)?;
        create_dir_all(parent)?;
        let mut temporary = NamedTempFile::new_in(parent)?;
        temporary.write_all(content)?;
        temporary.persist(&path).map_err(|e| RootCaError::from(e.error))?;
        log::debug!("Cached {file_name} at {}", path.display());
        Ok(path)
    }

    /// Clears the cache and re-initializes the directory structure.
    pub fn evict(&self) -> RootCaResult<()> {
        let data_path = self.data_directory();
        if data_path.exists() && data_path.is_dir() {
            remove_dir_all(data_path)?;
            self.initialize()?;
        }
        Ok(())
    }

    fn data_directory(&self) -> PathBuf {
        Path::new(&self.cache_directory).join("data")
    }
}
