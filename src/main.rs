use std::env;
use std::process::ExitCode;

use rootca::catalog::RootCaCatalog;
use rootca::common::{RootCaResult, DEFAULT_CACHE_DIRECTORY};
use rootca::supplier::{CertificateAuthoritySupplier, RootCaSource};

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let use_manifest = args.iter().any(|arg| arg == "--manifest");
    let positional: Vec<&String> = args.iter().skip(1).filter(|arg| !arg.starts_with("--")).collect();
    let Some(source) = positional.first() else {
        eprintln!("Usage: rootca-cli <source> [cache-directory] [--manifest]");
        return ExitCode::FAILURE;
    };
    let cache_directory = positional
        .get(1)
        .map(|directory| directory.as_str())
        .unwrap_or(DEFAULT_CACHE_DIRECTORY);
    let root_ca_source = if use_manifest {
        RootCaSource::Manifest
    } else {
        RootCaSource::DirectoryListing
    };

    match run(source, cache_directory, root_ca_source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:?}", e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(source: &str, cache_directory: &str, root_ca_source: RootCaSource) -> RootCaResult<()> {
    let catalog = CertificateAuthoritySupplier::builder()
        .with_source(source)
        .with_cache_directory(cache_directory)
        .with_root_ca_source(root_ca_source)
        .get_root_cas_from_backend()?;
    print_catalog(&catalog);
    Ok(())
}

fn print_catalog(catalog: &RootCaCatalog) {
    let mut records: Vec<_> = catalog.iter().collect();
    records.sort_by_key(|record| (record.generation(), record.is_cross_certificate()));
    for record in records {
        println!(
            "{:>3} {:<5} {} <- {} [{}]",
            record.generation(),
            if record.is_cross_certificate() { "CROSS" } else { "ROOT" },
            record.subject_cn(),
            record.issuer_cn(),
            record.fingerprint()
        );
    }
    if let (Some(max), Some(min)) = (catalog.max_root_ca(), catalog.min_root_ca()) {
        println!("Chain {} -> {}:", max.subject_cn(), min.subject_cn());
        for certificate in catalog.chain_between(max, min) {
            println!(
                "  {} <- {}",
                certificate.subject_common_name().unwrap_or_default(),
                certificate.issuer_common_name().unwrap_or_default()
            );
        }
    }
}
