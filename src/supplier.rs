//! # Certificate Authority Supplier
//!
//! Loads the certificate authorities of a trust service list download point and
//! turns them into a [`RootCaCatalog`]. Root CAs can be read in two ways:
//! - [`RootCaSource::DirectoryListing`]: every `.der` file of the `ROOT-CA`
//!   directory is fetched, the cross certificate pointers are derived from the
//!   issuer/subject relations of the files
//! - [`RootCaSource::Manifest`]: the `roots.json` manifest is fetched, it carries
//!   the next/previous cross certificates of each root explicitly
//!
//! Any certificate that cannot be decoded, or lacks a common name or generation,
//! aborts loading with an error naming that certificate.
//!
//! ## Usage
//!
//! ```no_run
//! use rootca::anchor::TiEnvironment;
//! use rootca::supplier::CertificateAuthoritySupplier;
//!
//! let catalog = CertificateAuthoritySupplier::builder()
//!     .with_environment_anchor(TiEnvironment::Ru)
//!     .get_root_cas_from_backend()
//!     .unwrap();
//! println!("Loaded {} root CAs", catalog.len());
//! ```

use std::time::Duration;

use crate::anchor::{
    CaType, CryptographySpecification, CustomAnchor, TiEnvironment, TrustedEnvironmentAnchor,
};
use crate::catalog::RootCaCatalog;
use crate::certificate::CertificateAuthority;
use crate::common::RootCaResult;
use crate::fetcher::Fetcher;
use crate::manifest::Manifest;

/// How the root CAs are read from the download point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootCaSource {
    #[default]
    DirectoryListing,
    Manifest,
}

#[derive(Debug)]
pub struct CertificateAuthoritySupplier {
    anchor: Box<dyn TrustedEnvironmentAnchor>,
    algorithm: CryptographySpecification,
    root_ca_source: RootCaSource,
    fetcher: Fetcher,
}

impl CertificateAuthoritySupplier {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Loads the root CA catalog the way the supplier was configured to.
    pub fn get_root_cas(&self) -> RootCaResult<RootCaCatalog> {
        match self.root_ca_source {
            RootCaSource::DirectoryListing => self.get_root_cas_from_listing(),
            RootCaSource::Manifest => self.get_root_cas_from_manifest(),
        }
    }

    /// Loads every certificate of the `ROOT-CA` directory listing.
    pub fn get_root_cas_from_listing(&self) -> RootCaResult<RootCaCatalog> {
        let authorities = self.get_authorities(CaType::RootCa)?;
        let catalog = RootCaCatalog::from_authorities(authorities)?;
        log::info!("Loaded {} root CA records from listing", catalog.len());
        Ok(catalog)
    }

    /// Loads the `roots.json` manifest.
    pub fn get_root_cas_from_manifest(&self) -> RootCaResult<RootCaCatalog> {
        let path = self.anchor.manifest_path(self.algorithm);
        let content = self.fetcher.retrieve_raw_file(&path)?;
        let catalog = Manifest::new(&content, &self.fetcher.locator(&path))?.into_catalog()?;
        log::info!("Loaded {} root CA records from manifest", catalog.len());
        Ok(catalog)
    }

    /// Loads every certificate of the `SUB-CA` directory listing.
    pub fn get_sub_cas(&self) -> RootCaResult<Vec<CertificateAuthority>> {
        let authorities = self.get_authorities(CaType::SubCa)?;
        log::info!("Loaded {} sub CAs", authorities.len());
        Ok(authorities)
    }

    fn get_authorities(&self, ca_type: CaType) -> RootCaResult<Vec<CertificateAuthority>> {
        let path = self.anchor.ca_download_path(ca_type, self.algorithm);
        self.fetcher
            .list_directory(&path)?
            .into_iter()
            .map(|name| {
                let file_name = format!("{path}{name}");
                let content = self.fetcher.retrieve_file(&file_name)?;
                CertificateAuthority::from_der(&content, &self.fetcher.locator(&file_name))
            })
            .collect()
    }
}

/// Configures a [`CertificateAuthoritySupplier`]
///
/// Defaults to the TU environment over the internet, ECC certificates, the
/// directory listing, no cache and TLS verification enabled.
#[derive(Debug)]
pub struct Builder {
    anchor: Box<dyn TrustedEnvironmentAnchor>,
    use_internet: bool,
    algorithm: CryptographySpecification,
    root_ca_source: RootCaSource,
    cache_directory: Option<String>,
    verify_tls: bool,
    timeout: Option<Duration>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            anchor: Box::new(TiEnvironment::default()),
            use_internet: true,
            algorithm: CryptographySpecification::default(),
            root_ca_source: RootCaSource::default(),
            cache_directory: None,
            verify_tls: true,
            timeout: None,
        }
    }
}

impl Builder {
    pub fn with_environment_anchor(mut self, anchor: impl TrustedEnvironmentAnchor + 'static) -> Self {
        self.anchor = Box::new(anchor);
        self
    }

    /// Reads from an arbitrary base URL or local directory instead of a TI environment.
    pub fn with_source(self, source: &str) -> Self {
        self.with_environment_anchor(CustomAnchor {
            source: source.into(),
        })
    }

    pub fn use_internet(mut self) -> Self {
        self.use_internet = true;
        self
    }

    pub fn use_ti(mut self) -> Self {
        self.use_internet = false;
        self
    }

    pub fn with_algorithm(mut self, algorithm: CryptographySpecification) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_root_ca_source(mut self, root_ca_source: RootCaSource) -> Self {
        self.root_ca_source = root_ca_source;
        self
    }

    pub fn with_cache_directory(mut self, cache_directory: &str) -> Self {
        self.cache_directory = Some(cache_directory.into());
        self
    }

    pub fn without_tls_verification(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> RootCaResult<CertificateAuthoritySupplier> {
        let url = self.anchor.url(self.use_internet);
        let cache_directory = self.cache_directory.as_deref();
        let fetcher = if self.verify_tls {
            let mut client = reqwest::blocking::Client::builder();
            if let Some(timeout) = self.timeout {
                client = client.timeout(timeout);
            }
            Fetcher::with_client(&url, cache_directory, client.build()?)?
        } else {
            Fetcher::without_tls_verification(&url, cache_directory, self.timeout)?
        };
        log::debug!("Certificate authority supplier for {url} ({})", self.algorithm);
        Ok(CertificateAuthoritySupplier {
            anchor: self.anchor,
            algorithm: self.algorithm,
            root_ca_source: self.root_ca_source,
            fetcher,
        })
    }

    pub fn get_root_cas_from_backend(self) -> RootCaResult<RootCaCatalog> {
        self.build()?.get_root_cas()
    }
}
