//! The `namedb` boundary.
//!
//! The real in-memory zone database - its domain tree, rrset layout, and
//! rdata atom representation - is an external collaborator and out of scope
//! for this crate. [`ZoneDatabase`] is the narrow contract the diff engine
//! actually needs: resolve the apex, and walk in-zone, non-empty domains in
//! canonical order. [`InMemoryZone`] is a reference implementation good
//! enough to test the engine against and to back the demo binary; a real
//! deployment is expected to adapt its own zone tree (the role
//! `domain::zonetree::Zone` plays in a production server) to this trait.

use std::collections::BTreeMap;

use crate::name::DomainName;
use crate::rr::{DomainNode, RR, RRset};

/// The operations the diff engine needs from the live ("new") zone.
///
/// Implementations must uphold the merge join's ordering contract:
/// `domains()` yields nodes in the same canonical DNS order the spool was
/// written in. Nodes outside the apex's
/// subtree (`domain_is_subdomain`) and nodes with no in-zone RRsets must
/// never be yielded.
pub trait ZoneDatabase {
    /// The zone's apex (SOA owner) at the time of the call.
    fn apex(&self) -> &DomainName;

    /// The zone's current serial number.
    fn serial(&self) -> u32;

    /// In-zone, non-empty domain nodes at or below the apex, in canonical
    /// DNS order.
    fn domains(&self) -> Box<dyn Iterator<Item = &DomainNode> + '_>;
}

/// A minimal in-memory zone, ordered by a `BTreeMap` keyed on canonical
/// [`DomainName`] so the ordering contract holds by construction rather than
/// by a separate sort pass.
#[derive(Debug, Clone)]
pub struct InMemoryZone {
    apex: DomainName,
    serial: u32,
    nodes: BTreeMap<DomainName, DomainNode>,
}

impl InMemoryZone {
    pub fn new(apex: DomainName, serial: u32) -> Self {
        InMemoryZone {
            apex,
            serial,
            nodes: BTreeMap::new(),
        }
    }

    pub fn set_serial(&mut self, serial: u32) {
        self.serial = serial;
    }

    pub fn node(&self, name: &DomainName) -> Option<&DomainNode> {
        self.nodes.get(name)
    }

    /// Inserts an RR, creating its domain node and RRset if they don't yet
    /// exist. The RR's owner must be the apex or a descendant of it.
    pub fn insert_rr(&mut self, rr: RR) {
        assert!(
            rr.owner.is_subdomain_of(&self.apex),
            "RR owner {} is not in the {} zone",
            rr.owner,
            self.apex
        );
        let node = self
            .nodes
            .entry(rr.owner.clone())
            .or_insert_with(|| DomainNode::new(rr.owner.clone()));
        match node.rrsets.iter_mut().find(|r| r.rtype == rr.rtype) {
            Some(rrset) => rrset.push(rr),
            None => {
                let mut rrset = RRset::new(rr.rtype, rr.rclass);
                rrset.push(rr);
                node.rrsets.push(rrset);
            }
        }
    }

    /// Removes an entire RRset at `owner`. Returns `true` if it existed.
    pub fn remove_rrset(&mut self, owner: &DomainName, rtype: u16) -> bool {
        let Some(node) = self.nodes.get_mut(owner) else {
            return false;
        };
        let before = node.rrsets.len();
        node.rrsets.retain(|r| r.rtype != rtype);
        if node.is_empty() {
            self.nodes.remove(owner);
        }
        before != node.rrsets.len() || !self.nodes.contains_key(owner)
    }

    /// Removes a single RR matching `ttl` and canonical rdata from the
    /// `(owner, rtype)` RRset.
    pub fn remove_rr(&mut self, owner: &DomainName, rtype: u16, ttl: u32, rdata: &[u8]) -> bool {
        let Some(node) = self.nodes.get_mut(owner) else {
            return false;
        };
        let Some(rrset) = node.rrsets.iter_mut().find(|r| r.rtype == rtype) else {
            return false;
        };
        let before = rrset.rrs.len();
        rrset.rrs.retain(|rr| !rr.ttl_rdata_eq(ttl, rdata));
        let removed = before != rrset.rrs.len();
        if node.is_empty() {
            self.nodes.remove(owner);
        }
        removed
    }
}

impl ZoneDatabase for InMemoryZone {
    fn apex(&self) -> &DomainName {
        &self.apex
    }

    fn serial(&self) -> u32 {
        self.serial
    }

    fn domains(&self) -> Box<dyn Iterator<Item = &DomainNode> + '_> {
        Box::new(
            self.nodes
                .values()
                .filter(|node| !node.is_empty() && node.name.is_subdomain_of(&self.apex)),
        )
    }
}
