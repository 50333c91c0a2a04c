//! # Root Certificate Authority Records
//!
//! A [`RootCertificateAuthority`] is a [`CertificateAuthority`] that belongs to the
//! root generations of the PKI. On top of the base identity it knows:
//! - its CA generation, read from the digits of the subject common name
//! - whether it is a cross certificate (subject and issuer common names differ)
//! - optionally the cross certificates leading to the next and previous generation
//!
//! The next/previous cross certificates are kept as plain certificates. They are
//! resolved into records by the [`RootCaCatalog`](crate::catalog::RootCaCatalog).

use std::cmp::Ordering;
use std::ops::Deref;

use x509_certificate::CapturedX509Certificate;

use crate::certificate::CertificateAuthority;
use crate::common::{parse_generation, RootCaError, RootCaResult};

#[derive(Clone, Debug)]
pub struct RootCertificateAuthority {
    authority: CertificateAuthority,
    generation: u32,
    next_cross: Option<CapturedX509Certificate>,
    prev_cross: Option<CapturedX509Certificate>,
}

impl RootCertificateAuthority {
    /// Creates a root CA record without cross certificate pointers.
    ///
    /// # Errors
    ///
    /// * `RootCaError::MissingGeneration` if the subject common name has no digit
    /// * `RootCaError::InvalidGeneration` if the digits do not fit into a `u32`
    pub fn new(authority: CertificateAuthority) -> RootCaResult<Self> {
        let generation = match parse_generation(authority.subject_cn()) {
            Ok(Some(generation)) => generation,
            Ok(None) => {
                return Err(RootCaError::MissingGeneration {
                    subject: authority.subject_cn().into(),
                    locator: authority.locator().into(),
                })
            }
            Err(_) => {
                return Err(RootCaError::InvalidGeneration {
                    subject: authority.subject_cn().into(),
                    locator: authority.locator().into(),
                })
            }
        };
        Ok(Self {
            authority,
            generation,
            next_cross: None,
            prev_cross: None,
        })
    }

    pub fn from_der(bytes: &[u8], locator: &str) -> RootCaResult<Self> {
        Self::new(CertificateAuthority::from_der(bytes, locator)?)
    }

    /// Attaches the cross certificates towards the next and previous generation.
    pub fn with_cross_certificates(
        mut self,
        next: Option<CapturedX509Certificate>,
        prev: Option<CapturedX509Certificate>,
    ) -> Self {
        self.next_cross = next;
        self.prev_cross = prev;
        self
    }

    pub fn authority(&self) -> &CertificateAuthority {
        &self.authority
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Structural classification: a record is a cross certificate when it was
    /// issued by a different CA than the one named in its subject.
    pub fn is_cross_certificate(&self) -> bool {
        !self.authority.is_self_issued()
    }

    /// Cross certificate signed by this CA over the key of the next generation.
    pub fn next_cross_certificate(&self) -> Option<&CapturedX509Certificate> {
        self.next_cross.as_ref()
    }

    /// Cross certificate signed by this CA over the key of the previous generation.
    pub fn previous_cross_certificate(&self) -> Option<&CapturedX509Certificate> {
        self.prev_cross.as_ref()
    }
}

impl Deref for RootCertificateAuthority {
    type Target = CertificateAuthority;

    fn deref(&self) -> &Self::Target {
        &self.authority
    }
}

/// Records compare by CA generation only. A root and a cross certificate of the
/// same generation are equal; use [`CertificateAuthority::same_certificate`] to
/// compare the encodings.
impl PartialEq for RootCertificateAuthority {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
    }
}

impl Eq for RootCertificateAuthority {}

impl PartialOrd for RootCertificateAuthority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RootCertificateAuthority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.generation.cmp(&other.generation)
    }
}
