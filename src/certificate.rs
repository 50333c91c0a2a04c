//! # Certificate Authority Records
//!
//! A [`CertificateAuthority`] wraps a decoded X.509 certificate together with the
//! identity derived from it: the common names of its subject and issuer. Both
//! names are resolved once at construction; a certificate lacking either of them
//! is rejected instead of being defaulted.

use chrono::{DateTime, Utc};
use hex::ToHex;
use sha1::{Digest, Sha1};
use x509_certificate::CapturedX509Certificate;

use crate::common::{issuer_common_name, subject_common_name, RootCaError, RootCaResult};

/// Immutable certificate authority record
#[derive(Clone, Debug)]
pub struct CertificateAuthority {
    /// The decoded certificate, keeping its original DER encoding.
    certificate: CapturedX509Certificate,
    /// URL or path the certificate was loaded from.
    locator: String,
    subject_cn: String,
    issuer_cn: String,
}

impl CertificateAuthority {
    /// Creates a new record from an already decoded certificate.
    ///
    /// # Errors
    ///
    /// * `RootCaError::MissingSubjectCommonName` if the subject has no CN attribute
    /// * `RootCaError::MissingIssuerCommonName` if the issuer has no CN attribute
    pub fn new(certificate: CapturedX509Certificate, locator: &str) -> RootCaResult<Self> {
        let subject_cn = subject_common_name(&certificate).ok_or_else(|| {
            RootCaError::MissingSubjectCommonName {
                locator: locator.into(),
            }
        })?;
        let issuer_cn =
            issuer_common_name(&certificate).ok_or_else(|| RootCaError::MissingIssuerCommonName {
                locator: locator.into(),
            })?;
        Ok(Self {
            certificate,
            locator: locator.into(),
            subject_cn,
            issuer_cn,
        })
    }

    /// Decodes a DER certificate and creates a record from it.
    pub fn from_der(bytes: &[u8], locator: &str) -> RootCaResult<Self> {
        let certificate = CapturedX509Certificate::from_der(bytes.to_vec()).map_err(|e| {
            RootCaError::Certificate {
                locator: locator.into(),
                reason: e.to_string(),
            }
        })?;
        Self::new(certificate, locator)
    }

    pub fn certificate(&self) -> &CapturedX509Certificate {
        &self.certificate
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn subject_cn(&self) -> &str {
        &self.subject_cn
    }

    pub fn issuer_cn(&self) -> &str {
        &self.issuer_cn
    }

    /// Whether subject and issuer carry the same common name.
    pub fn is_self_issued(&self) -> bool {
        self.subject_cn == self.issuer_cn
    }

    pub fn not_before(&self) -> DateTime<Utc> {
        self.certificate.validity_not_before()
    }

    pub fn not_after(&self) -> DateTime<Utc> {
        self.certificate.validity_not_after()
    }

    /// Lowercase hex SHA-1 thumbprint of the DER encoding.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.certificate.constructed_data());
        hasher.finalize().encode_hex()
    }

    /// Whether both records wrap byte-identical certificates.
    pub fn same_certificate(&self, other: &CertificateAuthority) -> bool {
        self.certificate.constructed_data() == other.certificate.constructed_data()
    }
}

impl<'a> TryFrom<&'a [u8]> for CertificateAuthority {
    type Error = RootCaError;

    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        Self::from_der(bytes, "<memory>")
    }
}
