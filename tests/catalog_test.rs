use rootca::catalog::RootCaCatalog;
use rootca::certificate::CertificateAuthority;
use rootca::common::RootCaResult;
use rootca::root_certificate::RootCertificateAuthority;
use rootca::supplier::{CertificateAuthoritySupplier, RootCaSource};
use x509_certificate::{CapturedX509Certificate, X509Certificate};

const TSL_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/tsl");
const RCA2: &[u8] = include_bytes!("data/GEM.RCA2_TEST-ONLY.der");
const KOMP_CA51: &[u8] = include_bytes!("data/tsl/ECC/SUB-CA/GEM.KOMP-CA51_TEST-ONLY.der");
const KOMP_CA61: &[u8] = include_bytes!("data/tsl/ECC/SUB-CA/GEM.KOMP-CA61_TEST-ONLY.der");
const KOMP_CA71: &[u8] = include_bytes!("data/tsl/ECC/SUB-CA/GEM.KOMP-CA71_TEST-ONLY.der");

fn load(root_ca_source: RootCaSource) -> RootCaResult<RootCaCatalog> {
    CertificateAuthoritySupplier::builder()
        .with_source(TSL_PATH)
        .with_root_ca_source(root_ca_source)
        .get_root_cas_from_backend()
}

fn catalogs() -> Vec<RootCaCatalog> {
    vec![
        load(RootCaSource::DirectoryListing).unwrap(),
        load(RootCaSource::Manifest).unwrap(),
    ]
}

fn root(catalog: &RootCaCatalog, generation: u32) -> &RootCertificateAuthority {
    catalog
        .find_by_subject_cn(&format!("GEM.RCA{generation} TEST-ONLY"))
        .unwrap()
}

fn cross(catalog: &RootCaCatalog, subject: u32, issuer: u32) -> &RootCertificateAuthority {
    let (subject_cn, issuer_cn) = hop(subject, issuer);
    catalog
        .iter()
        .find(|r| r.subject_cn() == subject_cn && r.issuer_cn() == issuer_cn)
        .unwrap()
}

fn names(chain: &[&CapturedX509Certificate]) -> Vec<(String, String)> {
    chain
        .iter()
        .map(|c| {
            (
                c.subject_common_name().unwrap(),
                c.issuer_common_name().unwrap(),
            )
        })
        .collect()
}

fn hop(subject: u32, issuer: u32) -> (String, String) {
    (
        format!("GEM.RCA{subject} TEST-ONLY"),
        format!("GEM.RCA{issuer} TEST-ONLY"),
    )
}

fn certificate(bytes: &[u8]) -> CapturedX509Certificate {
    CertificateAuthority::try_from(bytes)
        .unwrap()
        .certificate()
        .clone()
}

#[test]
fn test_catalog_sizes() {
    let listing = load(RootCaSource::DirectoryListing).unwrap();
    assert_eq!(16, listing.len());
    assert_eq!(10, listing.iter().filter(|r| r.is_cross_certificate()).count());

    let manifest = load(RootCaSource::Manifest).unwrap();
    assert_eq!(6, manifest.len());
    assert!(manifest.iter().all(|r| !r.is_cross_certificate()));
}

#[test]
fn test_chain_up_through_all_generations() {
    for catalog in catalogs() {
        let chain = catalog.chain_between(root(&catalog, 3), root(&catalog, 8));
        assert_eq!(
            vec![hop(4, 3), hop(5, 4), hop(6, 5), hop(7, 6), hop(8, 7)],
            names(&chain)
        );
    }
}

#[test]
fn test_chain_down_through_all_generations() {
    for catalog in catalogs() {
        let chain = catalog.chain_between(root(&catalog, 8), root(&catalog, 3));
        assert_eq!(
            vec![hop(7, 8), hop(6, 7), hop(5, 6), hop(4, 5), hop(3, 4)],
            names(&chain)
        );
    }
}

#[test]
fn test_chain_stops_at_target_generation() {
    let catalog = load(RootCaSource::DirectoryListing).unwrap();
    let cross6 = cross(&catalog, 6, 5);
    let chain = catalog.chain_between(root(&catalog, 3), cross6);
    assert_eq!(vec![hop(4, 3), hop(5, 4), hop(6, 5)], names(&chain));

    let cross4 = cross(&catalog, 4, 5);
    let chain = catalog.chain_between(root(&catalog, 8), cross4);
    assert_eq!(vec![hop(7, 8), hop(6, 7), hop(5, 6), hop(4, 5)], names(&chain));
}

#[test]
fn test_chain_to_self_is_empty() {
    for catalog in catalogs() {
        for record in catalog.iter() {
            assert!(catalog.chain_between(record, record).is_empty());
        }
    }
}

#[test]
fn test_chain_to_generation_outside_catalog() {
    let detached = RootCertificateAuthority::from_der(RCA2, "GEM.RCA2_TEST-ONLY.der").unwrap();
    for catalog in catalogs() {
        let chain = catalog.chain_between(root(&catalog, 7), &detached);
        assert_eq!(vec![hop(6, 7), hop(5, 6), hop(4, 5), hop(3, 4)], names(&chain));
    }
}

#[test]
fn test_next_and_prev_are_inverse() {
    for catalog in catalogs() {
        for record in catalog.iter().filter(|r| !r.is_cross_certificate()) {
            if let Some(next) = catalog.next_root_ca(record) {
                assert_eq!(record.generation() + 1, next.generation());
                assert_eq!(Some(record), catalog.prev_root_ca(next));
            }
        }
    }
}

#[test]
fn test_extremes_have_no_outer_neighbour() {
    for catalog in catalogs() {
        let min = catalog.min_root_ca().unwrap();
        let max = catalog.max_root_ca().unwrap();
        assert_eq!(3, min.generation());
        assert_eq!(8, max.generation());
        assert!(catalog.prev_root_ca(min).is_none());
        assert!(catalog.next_root_ca(max).is_none());
    }
}

#[test]
fn test_chain_to_extremes_without_candidates() {
    for catalog in catalogs() {
        let chain = catalog.chain_to_extremes(root(&catalog, 5), None);
        assert_eq!(
            vec![hop(6, 5), hop(7, 6), hop(8, 7), hop(4, 5), hop(3, 4)],
            names(&chain)
        );

        let from_lowest = catalog.chain_to_extremes(root(&catalog, 3), None);
        assert_eq!(5, from_lowest.len());
    }
}

#[test]
fn test_chain_to_extremes_with_candidates() {
    let komp51 = certificate(KOMP_CA51);
    let komp61 = certificate(KOMP_CA61);
    let komp71 = certificate(KOMP_CA71);
    for catalog in catalogs() {
        let candidates: Vec<&X509Certificate> = vec![&*komp51, &*komp71];
        let chain = catalog.chain_to_extremes(root(&catalog, 6), Some(candidates.as_slice()));
        assert_eq!(vec![hop(7, 6), hop(5, 6)], names(&chain));

        let candidates: Vec<&X509Certificate> = vec![&*komp61, &*komp61];
        let chain = catalog.chain_to_extremes(root(&catalog, 3), Some(candidates.as_slice()));
        assert_eq!(vec![hop(4, 3), hop(5, 4), hop(6, 5)], names(&chain));
    }
}

#[test]
fn test_lookup_prefers_root_over_cross_certificate() {
    let catalog = load(RootCaSource::DirectoryListing).unwrap();
    for cross in catalog.iter().filter(|r| r.is_cross_certificate()) {
        let found = catalog.find_by_subject_cn(cross.subject_cn()).unwrap();
        assert!(!found.is_cross_certificate());
        assert_eq!(cross.generation(), found.generation());
    }
}

#[test]
fn test_issuer_lookup_of_sub_cas() {
    for catalog in catalogs() {
        let komp71 = certificate(KOMP_CA71);
        assert_eq!(
            7,
            catalog
                .find_by_issuer_of_certificate(&komp71)
                .unwrap()
                .generation()
        );
        let detached = certificate(RCA2);
        assert!(catalog.find_by_issuer_of_certificate(&detached).is_none());
    }
}

#[test]
fn test_listing_and_manifest_agree() {
    let listing = load(RootCaSource::DirectoryListing).unwrap();
    let manifest = load(RootCaSource::Manifest).unwrap();
    let from_listing = listing.chain_between(root(&listing, 4), root(&listing, 7));
    let from_manifest = manifest.chain_between(root(&manifest, 4), root(&manifest, 7));
    assert_eq!(from_listing.len(), from_manifest.len());
    for (a, b) in from_listing.iter().zip(from_manifest) {
        assert_eq!(a.constructed_data(), b.constructed_data());
    }
}
