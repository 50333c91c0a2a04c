use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

use crate::cache::Cache;
use crate::common::{RootCaError, RootCaResult, DER_SUFFIX};

const HREF_PATTERN: &str = r#"<a\s+href="([^"]*)""#;

#[derive(Debug, Clone)]
enum Source {
    Http(String),
    Local(PathBuf),
}

/// Retrieves certificate files and listings from a download point
///
/// The download point is either an HTTP(S) base URL or a local directory with
/// the same layout.
#[derive(Debug)]
pub struct Fetcher {
    cache: Option<Cache>,
    source: Source,
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(source: &str, cache_directory: Option<&str>) -> RootCaResult<Self> {
        Self::with_client(source, cache_directory, reqwest::blocking::Client::new())
    }

    /// Creates a fetcher that accepts any TLS certificate of the download point
    /// and gives up on requests after `timeout`.
    pub fn without_tls_verification(
        source: &str,
        cache_directory: Option<&str>,
        timeout: Option<Duration>,
    ) -> RootCaResult<Self> {
        let mut builder = reqwest::blocking::Client::builder().danger_accept_invalid_certs(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(source, cache_directory, builder.build()?)
    }

    pub fn with_client(
        source: &str,
        cache_directory: Option<&str>,
        client: reqwest::blocking::Client,
    ) -> RootCaResult<Self> {
        let local = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(local);
        let source = if path.exists() && path.is_dir() {
            Source::Local(path.to_path_buf())
        } else {
            Source::Http(source.trim_end_matches('/').into())
        };
        let cache = match cache_directory {
            Some(directory) => {
                let cache = Cache::new(directory)?;
                cache.initialize()?;
                Some(cache)
            }
            None => None,
        };
        Ok(Self {
            cache,
            source,
            client,
        })
    }

    /// Human readable locator of a file on the download point.
    pub fn locator(&self, file_name: &str) -> String {
        match &self.source {
            Source::Http(base) => format!("{base}/{}", file_name.trim_start_matches('/')),
            Source::Local(base) => base
                .join(file_name.trim_start_matches('/'))
                .display()
                .to_string(),
        }
    }

    /// Method to retrieve a file from the cache if exists, or from
    /// the download point if it doesn't. Downloaded files are cached.
    pub fn retrieve_file(&self, file_name: &str) -> RootCaResult<Vec<u8>> {
        if let Some(cached_file) = self.cache.as_ref().and_then(|cache| cache.get(file_name)) {
            log::debug!("Serving {file_name} from cache");
            return Ok(fs::read(cached_file)?);
        }
        let content = self.retrieve_raw_file(file_name)?;
        if let Some(cache) = &self.cache {
            cache.store(file_name, &content)?;
        }
        Ok(content)
    }

    /// Method to retrieve a file from the download point, bypassing the cache.
    pub fn retrieve_raw_file(&self, file_name: &str) -> RootCaResult<Vec<u8>> {
        let locator = self.locator(file_name);
        match &self.source {
            Source::Http(_) => {
                log::info!("Downloading {locator}");
                let response = self.client.get(&locator).send()?.error_for_status()?;
                Ok(response.bytes()?.to_vec())
            }
            Source::Local(_) => {
                log::info!("Reading {locator}");
                fs::read(&locator).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => RootCaError::FileNotFound,
                    _ => e.into(),
                })
            }
        }
    }

    /// Lists the names of the DER files published below a directory path.
    ///
    /// Remote directories are read from the `<a href="...">` anchors of their HTML
    /// listing, with percent-encoded names decoded. The names are sorted and free
    /// of duplicates.
    pub fn list_directory(&self, directory: &str) -> RootCaResult<Vec<String>> {
        let mut names = match &self.source {
            Source::Http(_) => {
                let listing = self.retrieve_raw_file(directory)?;
                Self::parse_listing(&String::from_utf8_lossy(&listing))?
            }
            Source::Local(_) => {
                let mut names = Vec::new();
                for entry in fs::read_dir(self.locator(directory))? {
                    let entry = entry?;
                    if !entry.file_type()?.is_file() {
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        names.push(name.to_string());
                    }
                }
                names
            }
        };
        names.retain(|name| name.ends_with(DER_SUFFIX));
        names.sort();
        names.dedup();
        log::debug!("Found {} certificates in {directory}", names.len());
        Ok(names)
    }

    fn parse_listing(listing: &str) -> RootCaResult<Vec<String>> {
        let pattern =
            Regex::new(HREF_PATTERN).map_err(|e| RootCaError::InvalidListing(e.to_string()))?;
        pattern
            .captures_iter(listing)
            .filter_map(|captures| captures.get(1))
            .map(|href| {
                let name = href.as_str().rsplit('/').next().unwrap_or_default();
                urlencoding::decode(name)
                    .map(|decoded| decoded.into_owned())
                    .map_err(|e| RootCaError::InvalidListing(format!("{name}: {e}")))
            })
            .collect()
    }
}
