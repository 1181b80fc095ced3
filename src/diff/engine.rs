//! The merge-join diff engine.

use std::collections::HashSet;
use std::io::Read;

use crate::error::Result;
use crate::ixfr_store::IxfrStore;
use crate::name::DomainName;
use crate::namedb::ZoneDatabase;
use crate::rr::{DomainNode, RRset};
use crate::spool::reader::{DnameIterator, SpooledRR, SpooledRRset};

/// A delete queued up for a domain, not yet handed to the store.
struct PendingDelete {
    rtype: u16,
    rclass: u16,
    ttl: u32,
    rdata: Vec<u8>,
}

/// An add queued up for a domain, not yet handed to the store. Borrows
/// straight from the live zone since adds never need to outlive one domain's
/// processing.
struct PendingAdd<'z> {
    rtype: u16,
    rclass: u16,
    rr: &'z crate::rr::RR,
}

/// Per-RR diff within one `(owner, type, class)` rrset.
///
/// Old RRs are matched against the new rrset by `(ttl, rdata)`. Anything
/// spooled but unmatched is queued as a delete; anything in the new rrset
/// left unmarked is queued as an add. A TTL-only change therefore always
/// yields one delete and one add for the same RR, never an in-place update.
fn diff_rrset<'z>(
    rtype: u16,
    rclass: u16,
    old_rrs: Vec<SpooledRR>,
    new_rrset: &'z RRset,
    deletes: &mut Vec<PendingDelete>,
    adds: &mut Vec<PendingAdd<'z>>,
) {
    let mut marked = vec![false; new_rrset.rrs.len()];

    for old_rr in old_rrs {
        let found = new_rrset
            .rrs
            .iter()
            .enumerate()
            .find(|(i, rr)| !marked[*i] && rr.ttl_rdata_eq(old_rr.ttl, &old_rr.rdata));
        match found {
            Some((i, _)) => marked[i] = true,
            None => deletes.push(PendingDelete {
                rtype,
                rclass,
                ttl: old_rr.ttl,
                rdata: old_rr.rdata,
            }),
        }
    }

    for (i, rr) in new_rrset.rrs.iter().enumerate() {
        if !marked[i] {
            adds.push(PendingAdd { rtype, rclass, rr });
        }
    }
}

/// Per-domain RRset diff: consumes the spooled rrset
/// headers for one domain, diffing each against its new-zone counterpart (or
/// deleting it wholesale if the type has disappeared), then emits whatever
/// new-zone rrsets were never mentioned in the spool as wholesale adds.
///
/// All deletes for the domain are flushed to the store before any add, per
/// the ordering contract below - the per-rrset diffs above only
/// queue their findings, they never call the store directly.
fn diff_domain(
    owner: &DomainName,
    spooled_rrsets: Vec<SpooledRRset>,
    new_node: &DomainNode,
    store: &mut dyn IxfrStore,
) -> Result<()> {
    let mut marked_types = HashSet::new();
    let mut deletes = Vec::new();
    let mut adds = Vec::new();

    for spooled in spooled_rrsets {
        marked_types.insert(spooled.rtype);
        match new_node.rrset(spooled.rtype) {
            Some(new_rrset) => diff_rrset(
                spooled.rtype,
                spooled.rclass,
                spooled.rrs,
                new_rrset,
                &mut deletes,
                &mut adds,
            ),
            None => {
                for rr in spooled.rrs {
                    deletes.push(PendingDelete {
                        rtype: spooled.rtype,
                        rclass: spooled.rclass,
                        ttl: rr.ttl,
                        rdata: rr.rdata,
                    });
                }
            }
        }
    }

    for rrset in new_node.rrsets.iter().filter(|r| !r.is_empty()) {
        if !marked_types.contains(&rrset.rtype) {
            for rr in &rrset.rrs {
                adds.push(PendingAdd {
                    rtype: rrset.rtype,
                    rclass: rrset.rclass,
                    rr,
                });
            }
        }
    }

    for d in deletes {
        store.del_rr_uncompressed(owner, d.rtype, d.rclass, d.ttl, &d.rdata)?;
    }
    for a in adds {
        store.add_rr(owner, a.rtype, a.rclass, a.rr.ttl, &a.rr.rdata)?;
    }
    Ok(())
}

fn delete_whole_domain(
    owner: &DomainName,
    rrsets: Vec<SpooledRRset>,
    store: &mut dyn IxfrStore,
) -> Result<()> {
    for rrset in rrsets {
        for rr in rrset.rrs {
            store.del_rr_uncompressed(owner, rrset.rtype, rrset.rclass, rr.ttl, &rr.rdata)?;
        }
    }
    Ok(())
}

fn add_whole_domain(node: &DomainNode, store: &mut dyn IxfrStore) -> Result<()> {
    for rrset in node.rrsets.iter().filter(|r| !r.is_empty()) {
        for rr in &rrset.rrs {
            store.add_rr(&node.name, rrset.rtype, rrset.rclass, rr.ttl, &rr.rdata)?;
        }
    }
    Ok(())
}

/// Outer domain merge: walks the new zone's domains in
/// canonical order, advancing the spool iterator in lockstep. A domain present
/// only in the spool is a wholesale delete, one present only in the new zone
/// is a wholesale add, and one present in both gets a per-rrset diff. Any
/// spool names left after the new zone's walk completes are trailing deletes.
pub fn walk_zone<R: Read>(
    zone: &dyn ZoneDatabase,
    spool: &mut DnameIterator<R>,
    store: &mut dyn IxfrStore,
) -> Result<()> {
    spool.advance()?;

    for node in zone.domains() {
        catch_up_spool_deletes(spool, &node.name, store)?;

        let equal = match spool.current() {
            Some(old_name) => *old_name == node.name,
            None => false,
        };

        if equal {
            let spooled = spool.take_rrsets()?;
            diff_domain(&node.name, spooled, node, store)?;
            spool.advance()?;
        } else {
            add_whole_domain(node, store)?;
        }
    }

    while let Some(name) = spool.current().cloned() {
        let rrsets = spool.take_rrsets()?;
        delete_whole_domain(&name, rrsets, store)?;
        spool.advance()?;
    }

    Ok(())
}

/// Consumes every spooled domain strictly before `new_name`, emitting each as
/// a wholesale delete. Stops once the spool is at EOF or at a name `>=
/// new_name`.
fn catch_up_spool_deletes<R: Read>(
    spool: &mut DnameIterator<R>,
    new_name: &DomainName,
    store: &mut dyn IxfrStore,
) -> Result<()> {
    loop {
        let Some(old_name) = spool.current() else {
            return Ok(());
        };
        if old_name >= new_name {
            return Ok(());
        }
        let name = old_name.clone();
        let rrsets = spool.take_rrsets()?;
        delete_whole_domain(&name, rrsets, store)?;
        spool.advance()?;
    }
}
