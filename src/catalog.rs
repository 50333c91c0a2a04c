//! # Root CA Catalog
//!
//! The [`RootCaCatalog`] holds the complete, immutable set of root CA records of a
//! trust service list and answers navigation questions over it:
//! - which root CA issued a given certificate
//! - which root CA is reachable through a record's next/previous cross certificate
//! - which cross certificates bridge one root generation to another
//!
//! ## Graph model
//!
//! Every root CA record may point to a "next" and a "previous" cross certificate.
//! A cross certificate carries the subject common name of the generation it leads
//! to, so following an edge means resolving the cross certificate's subject
//! through [`RootCaCatalog::find_by_subject_of_cross_certificate`]. Edges that do
//! not resolve terminate the walk. The pointers of a well formed catalog are
//! acyclic; no cycle detection is performed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use x509_certificate::{CapturedX509Certificate, X509Certificate};

use crate::certificate::CertificateAuthority;
use crate::common::{issuer_common_name, subject_common_name, RootCaResult};
use crate::root_certificate::RootCertificateAuthority;

/// Immutable collection of root CA records
#[derive(Debug, Clone, Default)]
pub struct RootCaCatalog {
    records: Vec<RootCertificateAuthority>,
    /// Subject common name to the first non-cross record carrying it.
    roots_by_subject: HashMap<String, usize>,
}

impl RootCaCatalog {
    /// Creates a catalog from records that already carry their cross certificate
    /// pointers. Byte-identical certificates collapse into one record.
    pub fn new(records: Vec<RootCertificateAuthority>) -> Self {
        let mut unique: Vec<RootCertificateAuthority> = Vec::with_capacity(records.len());
        for record in records {
            if !unique.iter().any(|known| known.same_certificate(&record)) {
                unique.push(record);
            }
        }
        let mut roots_by_subject = HashMap::new();
        for (index, record) in unique.iter().enumerate() {
            if record.is_cross_certificate() {
                continue;
            }
            match roots_by_subject.entry(record.subject_cn().to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
                Entry::Occupied(_) => log::warn!(
                    "Root CA {} is published twice, ignoring {}",
                    record.subject_cn(),
                    record.locator()
                ),
            }
        }
        log::debug!(
            "Root CA catalog with {} records ({} roots)",
            unique.len(),
            roots_by_subject.len()
        );
        Self {
            records: unique,
            roots_by_subject,
        }
    }

    /// Creates a catalog from a flat set of certificate authorities, as found in a
    /// directory listing, deriving the cross certificate pointers structurally.
    ///
    /// For every self-signed root, the next pointer is the cross certificate it
    /// issued for the closest higher generation and the previous pointer the one
    /// it issued for the closest lower generation.
    ///
    /// # Errors
    ///
    /// Fails on the first authority whose generation cannot be derived.
    pub fn from_authorities(authorities: Vec<CertificateAuthority>) -> RootCaResult<Self> {
        let records = authorities
            .into_iter()
            .map(RootCertificateAuthority::new)
            .collect::<RootCaResult<Vec<_>>>()?;
        let linked = records
            .iter()
            .map(|record| {
                if record.is_cross_certificate() {
                    return record.clone();
                }
                let issued: Vec<&RootCertificateAuthority> = records
                    .iter()
                    .filter(|cross| {
                        cross.is_cross_certificate() && cross.issuer_cn() == record.subject_cn()
                    })
                    .collect();
                let next = lowest(issued.iter().copied().filter(|cross| *cross > record))
                    .map(|cross| cross.certificate().clone());
                let prev = highest(issued.iter().copied().filter(|cross| *cross < record))
                    .map(|cross| cross.certificate().clone());
                record.clone().with_cross_certificates(next, prev)
            })
            .collect();
        Ok(Self::new(linked))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RootCertificateAuthority> {
        self.records.iter()
    }

    /// Finds the self-signed root CA with the given subject common name.
    ///
    /// Cross certificates never match, so the subject of a cross certificate
    /// resolves to the root it leads to.
    pub fn find_by_subject_cn(&self, subject_cn: &str) -> Option<&RootCertificateAuthority> {
        self.roots_by_subject
            .get(subject_cn)
            .map(|index| &self.records[*index])
    }

    /// Finds the root CA that directly issued the given certificate.
    pub fn find_by_issuer_of_certificate(
        &self,
        certificate: &X509Certificate,
    ) -> Option<&RootCertificateAuthority> {
        self.find_by_subject_cn(&issuer_common_name(certificate)?)
    }

    /// Finds the root CA a cross certificate leads to.
    pub fn find_by_subject_of_cross_certificate(
        &self,
        certificate: &X509Certificate,
    ) -> Option<&RootCertificateAuthority> {
        self.find_by_subject_cn(&subject_common_name(certificate)?)
    }

    /// Resolves the issuing root CA of every certificate, dropping unresolved
    /// ones and duplicates while keeping the order of first appearance.
    pub fn find_all_by_issuer_of_certificates(
        &self,
        certificates: &[&X509Certificate],
    ) -> Vec<&RootCertificateAuthority> {
        let mut found: Vec<&RootCertificateAuthority> = Vec::new();
        for record in certificates
            .iter()
            .filter_map(|certificate| self.find_by_issuer_of_certificate(certificate))
        {
            if !found.iter().any(|known| std::ptr::eq(*known, record)) {
                found.push(record);
            }
        }
        found
    }

    /// All cross certificates issued by the given root CA.
    pub fn cross_certificates_issued_by(
        &self,
        record: &RootCertificateAuthority,
    ) -> Vec<&RootCertificateAuthority> {
        self.records
            .iter()
            .filter(|cross| cross.is_cross_certificate() && cross.issuer_cn() == record.subject_cn())
            .collect()
    }

    /// The root CA with the lowest generation.
    pub fn min_root_ca(&self) -> Option<&RootCertificateAuthority> {
        lowest(self.roots())
    }

    /// The root CA with the highest generation.
    pub fn max_root_ca(&self) -> Option<&RootCertificateAuthority> {
        highest(self.roots())
    }

    /// The root CA reached through the record's next cross certificate.
    pub fn next_root_ca(&self, record: &RootCertificateAuthority) -> Option<&RootCertificateAuthority> {
        self.find_by_subject_of_cross_certificate(record.next_cross_certificate()?)
    }

    /// The root CA reached through the record's previous cross certificate.
    pub fn prev_root_ca(&self, record: &RootCertificateAuthority) -> Option<&RootCertificateAuthority> {
        self.find_by_subject_of_cross_certificate(record.previous_cross_certificate()?)
    }

    /// Collects the cross certificates walked from `start` towards `target`
    ///
    /// The direction follows the generations: next pointers when `start` is
    /// older than `target`, previous pointers otherwise. The walk stops at
    /// `target` or at the first missing or unresolvable edge, so a target outside
    /// the catalog yields the chain up to the last reachable generation.
    ///
    /// # Returns
    ///
    /// The traversed cross certificates in walking order; empty if `start` and
    /// `target` share a generation.
    pub fn chain_between<'a>(
        &'a self,
        start: &'a RootCertificateAuthority,
        target: &RootCertificateAuthority,
    ) -> Vec<&'a CapturedX509Certificate> {
        let forward = start < target;
        let mut chain = Vec::new();
        let mut current = start;
        // Records compare by generation, so any record of the target generation ends the walk.
        while current != target {
            let edge = if forward {
                current.next_cross_certificate()
            } else {
                current.previous_cross_certificate()
            };
            let Some(cross) = edge else {
                break;
            };
            let Some(reached) = self.find_by_subject_of_cross_certificate(cross) else {
                log::debug!(
                    "Cross certificate {:?} of {} leaves the catalog",
                    subject_common_name(cross),
                    current.subject_cn()
                );
                break;
            };
            chain.push(cross);
            current = reached;
        }
        chain
    }

    /// Collects the cross certificates bridging `current` to the extreme generations
    ///
    /// Without candidates, the extremes are the lowest and highest root CA of the
    /// catalog. With candidates, they are the lowest and highest root CA issuing
    /// one of the candidate certificates; if none of them resolves, the result is
    /// empty.
    ///
    /// # Returns
    ///
    /// The chain towards the highest generation followed by the chain towards the
    /// lowest one, without duplicates and in order of first appearance.
    pub fn chain_to_extremes<'a>(
        &'a self,
        current: &'a RootCertificateAuthority,
        candidates: Option<&[&X509Certificate]>,
    ) -> Vec<&'a CapturedX509Certificate> {
        let (min, max) = match candidates {
            None => (self.min_root_ca(), self.max_root_ca()),
            Some(certificates) => {
                let issuers = self.find_all_by_issuer_of_certificates(certificates);
                (
                    lowest(issuers.iter().copied()),
                    highest(issuers.iter().copied()),
                )
            }
        };
        let (Some(min), Some(max)) = (min, max) else {
            return Vec::new();
        };
        let mut chain = self.chain_between(current, max);
        for certificate in self.chain_between(current, min) {
            if !chain
                .iter()
                .any(|known| known.constructed_data() == certificate.constructed_data())
            {
                chain.push(certificate);
            }
        }
        chain
    }

    fn roots(&self) -> impl Iterator<Item = &RootCertificateAuthority> {
        self.records.iter().filter(|record| !record.is_cross_certificate())
    }
}

impl<'a> IntoIterator for &'a RootCaCatalog {
    type Item = &'a RootCertificateAuthority;
    type IntoIter = std::slice::Iter<'a, RootCertificateAuthority>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// First record with the lowest generation.
fn lowest<'a>(
    records: impl Iterator<Item = &'a RootCertificateAuthority>,
) -> Option<&'a RootCertificateAuthority> {
    records.min()
}

/// First record with the highest generation.
fn highest<'a>(
    records: impl Iterator<Item = &'a RootCertificateAuthority>,
) -> Option<&'a RootCertificateAuthority> {
    records.reduce(|best, record| if record > best { record } else { best })
}
