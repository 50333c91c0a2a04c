//! # Root CA Manifest
//!
//! Trust service list download points publish a `roots.json` manifest next to the
//! individual root CA files. It is a JSON array with one entry per root generation:
//!
//! ```json
//! [
//!   {
//!     "cert": "MIIC...",
//!     "cn": "CN=GEM.RCA5 TEST-ONLY,...",
//!     "name": "GEM.RCA5",
//!     "next": "MIIC...",
//!     "prev": "",
//!     "nvb": "...",
//!     "nva": "..."
//!   }
//! ]
//! ```
//!
//! `cert`, `next` and `prev` are base64 encoded DER certificates; an empty string
//! means the pointer is absent. Unknown fields are ignored.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use x509_certificate::CapturedX509Certificate;

use crate::catalog::RootCaCatalog;
use crate::certificate::CertificateAuthority;
use crate::common::{RootCaError, RootCaResult};
use crate::root_certificate::RootCertificateAuthority;

/// A single entry of the `roots.json` manifest
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    /// Short name of the root CA, e.g. `GEM.RCA5`.
    #[serde(default)]
    pub name: String,
    /// Distinguished name of the subject as text.
    #[serde(default)]
    pub cn: String,
    /// The self-signed root CA certificate.
    pub cert: String,
    /// Cross certificate towards the next generation.
    #[serde(default)]
    pub next: String,
    /// Cross certificate towards the previous generation.
    #[serde(default)]
    pub prev: String,
    /// Not valid before, as published.
    #[serde(default)]
    pub nvb: String,
    /// Not valid after, as published.
    #[serde(default)]
    pub nva: String,
}

/// Wraps the entries of a `roots.json` manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    /// Where the manifest was loaded from.
    pub locator: String,
}

impl Manifest {
    pub fn new(bytes: &[u8], locator: &str) -> RootCaResult<Self> {
        let entries: Vec<ManifestEntry> = serde_json::from_slice(bytes)
            .map_err(|e| RootCaError::Manifest(format!("{locator}: {e}")))?;
        Ok(Self {
            entries,
            locator: locator.into(),
        })
    }

    /// Decodes every entry into a root CA record with its cross certificate pointers.
    pub fn root_certificate_authorities(&self) -> RootCaResult<Vec<RootCertificateAuthority>> {
        self.entries
            .iter()
            .map(|entry| self.decode_entry(entry))
            .collect()
    }

    /// Decodes the manifest and builds the catalog from it.
    pub fn into_catalog(self) -> RootCaResult<RootCaCatalog> {
        Ok(RootCaCatalog::new(self.root_certificate_authorities()?))
    }

    fn decode_entry(&self, entry: &ManifestEntry) -> RootCaResult<RootCertificateAuthority> {
        let locator = format!("{}#{}", self.locator, entry.name);
        let der = STANDARD.decode(entry.cert.trim()).map_err(|e| {
            RootCaError::Certificate {
                locator: locator.clone(),
                reason: e.to_string(),
            }
        })?;
        let authority = CertificateAuthority::from_der(&der, &locator)?;
        let next = Self::decode_optional(&entry.next, &format!("{locator}/next"))?;
        let prev = Self::decode_optional(&entry.prev, &format!("{locator}/prev"))?;
        Ok(RootCertificateAuthority::new(authority)?.with_cross_certificates(next, prev))
    }

    fn decode_optional(value: &str, locator: &str) -> RootCaResult<Option<CapturedX509Certificate>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        let der = STANDARD.decode(value).map_err(|e| RootCaError::Certificate {
            locator: locator.into(),
            reason: e.to_string(),
        })?;
        let certificate = CapturedX509Certificate::from_der(der).map_err(|e| {
            RootCaError::Certificate {
                locator: locator.into(),
                reason: e.to_string(),
            }
        })?;
        Ok(Some(certificate))
    }
}
