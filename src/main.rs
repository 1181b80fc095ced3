//! Walks through one diff session end to end against an in-memory zone, to
//! exercise the spool writer, reader, and merge engine without a real
//! `namedb`/`ixfr_store` integration.
//!
//! Run with `IXFR_DIFF_CONFIG=path/to/ixfr-diff.yml ixfr-diff-demo`.

use std::path::PathBuf;
use std::process::exit;

use ixfr_diff::config::{Config, BASE_CONFIG_FILE};
use ixfr_diff::ixfr_store::RecordingIxfrStore;
use ixfr_diff::logger::Logger;
use ixfr_diff::name::DomainName;
use ixfr_diff::namedb::InMemoryZone;
use ixfr_diff::rdata::RData;
use ixfr_diff::rr::RR;
use ixfr_diff::session::DiffSession;

fn main() {
    let config_path = std::env::var("IXFR_DIFF_CONFIG").unwrap_or_else(|_| BASE_CONFIG_FILE.into());
    let config = match std::fs::read(&config_path) {
        Ok(bytes) => Config::try_from(bytes.as_slice()).unwrap_or_else(|e| {
            eprintln!("failed to parse config file at {}: {}", config_path, e);
            exit(1);
        }),
        Err(_) => Config::default(),
    };

    Logger::new()
        .with_level(config.log.level)
        .with_stderr(true)
        .init()
        .expect("failed to initialize logger");

    let apex: DomainName = "example.com.".parse().unwrap();
    let mut old_zone = InMemoryZone::new(apex.clone(), 2024090101);
    old_zone.insert_rr(a_rr("example.com.", 3600, [192, 0, 2, 1]));
    old_zone.insert_rr(a_rr("www.example.com.", 3600, [192, 0, 2, 1]));
    old_zone.insert_rr(a_rr("mail.example.com.", 300, [192, 0, 2, 2]));

    let zone_file = config
        .spool_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("example.com.zone");

    let mut session = match DiffSession::start(&old_zone, &zone_file, config.spool_dir.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            log::error!(target: "session", "start failed: {}", e);
            exit(1);
        }
    };

    let mut new_zone = old_zone.clone();
    new_zone.set_serial(2024090102);
    new_zone.insert_rr(a_rr("mail.example.com.", 60, [192, 0, 2, 2])); // ttl changed
    new_zone.insert_rr(a_rr("sub.example.com.", 60, [192, 0, 2, 3])); // new domain

    let mut store = RecordingIxfrStore::new();
    if let Err(e) = session.perform(&new_zone, &mut store) {
        log::error!(target: "session", "perform failed: {}", e);
        exit(1);
    }

    println!(
        "diffed serial {} -> {}",
        session.old_serial(),
        session.new_serial().unwrap()
    );
    println!("deletes:");
    for rr in &store.deletes {
        println!("  {} {} ttl={}", rr.owner, rr.rtype, rr.ttl);
    }
    println!("adds:");
    for rr in &store.adds {
        println!("  {} {} ttl={}", rr.owner, rr.rtype, rr.ttl);
    }

    session.free();
}

fn a_rr(owner: &str, ttl: u32, octets: [u8; 4]) -> RR {
    RR::new(
        owner.parse().unwrap(),
        1,
        1,
        ttl,
        RData::from_raw(octets.to_vec()),
    )
}
