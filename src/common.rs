//! # Common Types and Utilities
//!
//! This module provides the types shared by every part of the crate:
//! - The crate error type and result alias
//! - Constants describing the layout of a trust service list download point
//! - Small helpers to pull common names out of certificates

use x509_certificate::X509Certificate;

/// File suffix of DER encoded certificates published on the download point.
pub const DER_SUFFIX: &str = ".der";
/// Name of the JSON manifest listing every root CA with its cross certificates.
pub const ROOTS_MANIFEST_NAME: &str = "roots.json";
/// Cache directory used by the command line client when none is given.
pub const DEFAULT_CACHE_DIRECTORY: &str = "/tmp/rootca";

pub type RootCaResult<R> = Result<R, RootCaError>;

/// Represents errors that can occur while building or loading a root CA catalog
///
/// Identity and generation errors always carry the locator (URL or path) of the
/// certificate they were raised for.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RootCaError {
    #[error("Invalid certificate {locator}: {reason}")]
    Certificate { locator: String, reason: String },
    #[error("Certificate {locator} has no common name in its subject")]
    MissingSubjectCommonName { locator: String },
    #[error("Certificate {locator} has no common name in its issuer")]
    MissingIssuerCommonName { locator: String },
    #[error("Root CA {subject} ({locator}) carries no generation number")]
    MissingGeneration { subject: String, locator: String },
    #[error("Root CA {subject} ({locator}) has a generation number out of range")]
    InvalidGeneration { subject: String, locator: String },
    #[error("Invalid manifest: {0}")]
    Manifest(String),
    #[error("Invalid directory listing: {0}")]
    InvalidListing(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("IO error: {0}")]
    IO(String),
    #[error("File not found")]
    FileNotFound,
}

impl From<reqwest::Error> for RootCaError {
    fn from(e: reqwest::Error) -> Self {
        RootCaError::Http(format!("{:?}", e))
    }
}

impl From<std::io::Error> for RootCaError {
    fn from(e: std::io::Error) -> Self {
        RootCaError::IO(format!("{:?}", e))
    }
}

/// Returns the first common name of the certificate's subject, if any.
pub fn subject_common_name(certificate: &X509Certificate) -> Option<String> {
    certificate.subject_common_name()
}

/// Returns the first common name of the certificate's issuer, if any.
pub fn issuer_common_name(certificate: &X509Certificate) -> Option<String> {
    certificate.issuer_common_name()
}

/// Extracts the CA generation from a common name
///
/// All ASCII digits of the name are concatenated and read as a decimal number,
/// so `GEM.RCA7 TEST-ONLY` yields 7 and `GEM.RCA10` yields 10.
///
/// # Returns
///
/// `Ok(None)` when the name contains no digit at all, `Err` when the digits do
/// not fit into a `u32`.
pub fn parse_generation(common_name: &str) -> Result<Option<u32>, std::num::ParseIntError> {
    let digits: String = common_name.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some)
}
