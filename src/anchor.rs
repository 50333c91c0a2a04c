//! # Trusted Environment Anchors
//!
//! Root and sub CAs of the telematics infrastructure are published on a download
//! point per environment. Each download point is reachable from the internet and
//! from inside the TI network under different base URLs, and publishes one tree per
//! cryptography specification:
//!
//! ```text
//! <base>/ECC/ROOT-CA/            directory listing of root and cross certificates
//! <base>/ECC/ROOT-CA/roots.json  manifest with explicit next/prev cross certificates
//! <base>/ECC/SUB-CA/             directory listing of sub CAs
//! ```

use std::fmt;

use crate::common::ROOTS_MANIFEST_NAME;

/// Kind of certificate authority published on a download point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaType {
    RootCa,
    SubCa,
}

impl fmt::Display for CaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaType::RootCa => write!(f, "ROOT-CA"),
            CaType::SubCa => write!(f, "SUB-CA"),
        }
    }
}

/// Cryptography specification of a published CA tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CryptographySpecification {
    #[default]
    Ecc,
    Rsa,
}

impl fmt::Display for CryptographySpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptographySpecification::Ecc => write!(f, "ECC"),
            CryptographySpecification::Rsa => write!(f, "RSA"),
        }
    }
}

/// Describes where the certificate authorities of an environment are published
pub trait TrustedEnvironmentAnchor: fmt::Debug + Send + Sync {
    /// Directory path of the given CA kind, with leading and trailing slash.
    fn ca_download_path(&self, ca_type: CaType, algorithm: CryptographySpecification) -> String {
        format!("/{algorithm}/{ca_type}/")
    }

    /// Path of the root CA manifest.
    fn manifest_path(&self, algorithm: CryptographySpecification) -> String {
        format!(
            "{}{}",
            self.ca_download_path(CaType::RootCa, algorithm),
            ROOTS_MANIFEST_NAME
        )
    }

    /// Base URL of the download point.
    fn url(&self, use_internet: bool) -> String;
}

/// Download points of the TI test, reference and production environments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiEnvironment {
    #[default]
    Tu,
    Ru,
    Pu,
}

impl TiEnvironment {
    pub const ALL: [TiEnvironment; 3] = [TiEnvironment::Tu, TiEnvironment::Ru, TiEnvironment::Pu];

    fn internet_url(&self) -> &'static str {
        match self {
            TiEnvironment::Tu => "https://download-test.tsl.ti-dienste.de",
            TiEnvironment::Ru => "https://download-ref.tsl.ti-dienste.de",
            TiEnvironment::Pu => "https://download.tsl.ti-dienste.de",
        }
    }

    fn ti_url(&self) -> &'static str {
        match self {
            TiEnvironment::Tu => "http://download-test.tsl.telematik-test",
            TiEnvironment::Ru => "http://download-ref.tsl.telematik-test",
            TiEnvironment::Pu => "http://download.tsl.telematik",
        }
    }
}

impl TrustedEnvironmentAnchor for TiEnvironment {
    fn url(&self, use_internet: bool) -> String {
        if use_internet {
            self.internet_url().into()
        } else {
            self.ti_url().into()
        }
    }
}

/// Anchor for a download point at an arbitrary base URL or local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAnchor {
    pub source: String,
}

impl TrustedEnvironmentAnchor for CustomAnchor {
    fn url(&self, _use_internet: bool) -> String {
        self.source.clone()
    }
}
