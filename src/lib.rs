//! # rootca
//!
//! Catalog of the root certificate authorities of a cross-signed PKI and navigator
//! over their cross certificates.
//!
//! The [`catalog::RootCaCatalog`] answers which root CA issued a certificate and
//! which cross certificates bridge one root generation to another. It is built
//! once, usually by the [`supplier::CertificateAuthoritySupplier`] from a trust
//! service list download point, and is read-only afterwards.
//!
//! This crate does not validate certificates: signatures, revocation and
//! validity periods are never checked.

pub mod anchor;
pub mod cache;
pub mod catalog;
pub mod certificate;
pub mod common;
pub mod fetcher;
pub mod manifest;
pub mod root_certificate;
pub mod supplier;
