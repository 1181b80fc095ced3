//! End-to-end coverage of the diff session against the invariants and
//! concrete scenarios laid out for this crate: apply-diff identity, ordering,
//! TTL sensitivity, and header validation.

use std::collections::BTreeSet;

use ixfr_diff::ixfr_store::RecordingIxfrStore;
use ixfr_diff::name::DomainName;
use ixfr_diff::namedb::{InMemoryZone, ZoneDatabase};
use ixfr_diff::rdata::RData;
use ixfr_diff::rr::RR;
use ixfr_diff::session::DiffSession;

fn a_rr(owner: &str, ttl: u32, octets: [u8; 4]) -> RR {
    RR::new(
        owner.parse().unwrap(),
        1,
        1,
        ttl,
        RData::from_raw(octets.to_vec()),
    )
}

fn diff(old: &InMemoryZone, new: &InMemoryZone) -> RecordingIxfrStore {
    let dir = tempfile::tempdir().unwrap();
    let zone_file = dir.path().join("example.com.zone");
    let mut session = DiffSession::start(old, &zone_file, Some(dir.path())).unwrap();
    let mut store = RecordingIxfrStore::new();
    session.perform(new, &mut store).unwrap();
    session.free();
    store
}

/// Applies a recorded diff to a fresh copy of `old` and checks the result
/// equals `new` as a multiset of RRs (invariant 1, apply-diff identity).
fn apply_and_compare(old: &InMemoryZone, new: &InMemoryZone, store: &RecordingIxfrStore) {
    let mut applied = old.clone();
    for del in &store.deletes {
        applied.remove_rr(&del.owner, del.rtype, del.ttl, &del.rdata);
    }
    for add in &store.adds {
        applied.insert_rr(RR::new(
            add.owner.clone(),
            add.rtype,
            add.rclass,
            add.ttl,
            RData::from_raw(add.rdata.clone()),
        ));
    }

    let mut applied_rrs: Vec<(DomainName, u16, u32, Vec<u8>)> = applied
        .domains()
        .flat_map(|n| n.rrsets.iter().flat_map(move |r| r.rrs.iter().map(move |rr| (n.name.clone(), rr.rtype, rr.ttl, rr.rdata.canonical_bytes()))))
        .collect();
    let mut new_rrs: Vec<(DomainName, u16, u32, Vec<u8>)> = new
        .domains()
        .flat_map(|n| n.rrsets.iter().flat_map(move |r| r.rrs.iter().map(move |rr| (n.name.clone(), rr.rtype, rr.ttl, rr.rdata.canonical_bytes()))))
        .collect();
    applied_rrs.sort();
    new_rrs.sort();
    assert_eq!(applied_rrs, new_rrs);
}

fn base_zone(serial: u32) -> InMemoryZone {
    let apex: DomainName = "example.com.".parse().unwrap();
    let mut zone = InMemoryZone::new(apex, serial);
    zone.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        6, // SOA
        1,
        3600,
        RData::from_raw(b"mname rname 2024090100 3600 900 604800 3600".to_vec()),
    ));
    zone.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        2, // NS
        1,
        3600,
        RData::from_raw(b"ns1.example.com.".to_vec()),
    ));
    zone
}

#[test]
fn invariant_no_op_diff_is_empty() {
    let zone = base_zone(1);
    let store = diff(&zone, &zone);
    assert!(store.is_empty());
}

#[test]
fn invariant_apply_diff_identity_for_a_mixed_change_set() {
    let old = base_zone(1);
    let mut new = old.clone();
    new.set_serial(2);
    new.insert_rr(a_rr("www.example.com.", 3600, [192, 0, 2, 1]));
    new.insert_rr(a_rr("mail.example.com.", 300, [192, 0, 2, 2]));

    let store = diff(&old, &new);
    apply_and_compare(&old, &new, &store);
}

#[test]
fn invariant_ordering_is_monotonic_in_canonical_order() {
    let mut old = base_zone(1);
    old.insert_rr(a_rr("z.example.com.", 60, [1, 1, 1, 1]));
    old.insert_rr(a_rr("a.example.com.", 60, [2, 2, 2, 2]));

    let mut new = base_zone(2);
    new.insert_rr(a_rr("m.example.com.", 60, [3, 3, 3, 3]));

    let store = diff(&old, &new);

    let seen: Vec<DomainName> = store.ops.iter().map(|op| op.owner().clone()).collect();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn invariant_ttl_change_yields_one_delete_and_one_add() {
    let mut old = base_zone(1);
    old.insert_rr(a_rr("a.example.com.", 3600, [10, 0, 0, 1]));

    let mut new = base_zone(2);
    new.insert_rr(a_rr("a.example.com.", 300, [10, 0, 0, 1]));

    let store = diff(&old, &new);
    assert_eq!(store.deletes.len(), 1);
    assert_eq!(store.adds.len(), 1);
    assert_eq!(store.deletes[0].ttl, 3600);
    assert_eq!(store.adds[0].ttl, 300);
    assert_eq!(store.deletes[0].rdata, store.adds[0].rdata);
}

#[test]
fn invariant_header_validation_rejects_a_tampered_spool_with_no_emissions() {
    let apex: DomainName = "example.com.".parse().unwrap();
    let old = base_zone(100);

    let dir = tempfile::tempdir().unwrap();
    let zone_file = dir.path().join("example.com.zone");
    let mut session = DiffSession::start(&old, &zone_file, Some(dir.path())).unwrap();

    // Simulates the spool being rewritten behind the session's back with a
    // serial that was never recorded at start().
    let mut tampered = InMemoryZone::new(apex, 99);
    tampered.insert_rr(a_rr("x.example.com.", 60, [9, 9, 9, 9]));
    ixfr_diff::spool::spool_zone(&tampered, session.spool_path(), 99).unwrap();

    let mut new = old.clone();
    new.set_serial(101);
    let mut store = RecordingIxfrStore::new();
    let result = session.perform(&new, &mut store);

    assert!(result.is_err());
    assert!(result.unwrap_err().is_stale_snapshot());
    assert!(store.is_empty());
}

#[test]
fn rrset_member_replace_leaves_shared_member_untouched() {
    let mut old = base_zone(1);
    old.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        15,
        1,
        3600,
        RData::from_raw(encode_mx(10, "mx1.example.com.")),
    ));
    old.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        15,
        1,
        3600,
        RData::from_raw(encode_mx(20, "mx2.example.com.")),
    ));

    let mut new = base_zone(2);
    new.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        15,
        1,
        3600,
        RData::from_raw(encode_mx(10, "mx1.example.com.")),
    ));
    new.insert_rr(RR::new(
        "example.com.".parse().unwrap(),
        15,
        1,
        3600,
        RData::from_raw(encode_mx(30, "mx3.example.com.")),
    ));

    let store = diff(&old, &new);
    assert_eq!(store.deletes.len(), 1);
    assert_eq!(store.adds.len(), 1);

    let surviving: BTreeSet<_> = old
        .domains()
        .flat_map(|n| n.rrsets.iter().flat_map(|r| r.rrs.iter()))
        .map(|rr| rr.rdata.canonical_bytes())
        .filter(|bytes| bytes == &encode_mx(10, "mx1.example.com."))
        .collect();
    assert_eq!(surviving.len(), 1);
}

fn encode_mx(preference: u16, exchange: &str) -> Vec<u8> {
    let name: DomainName = exchange.parse().unwrap();
    let mut out = preference.to_be_bytes().to_vec();
    out.extend_from_slice(name.as_wire());
    out
}
