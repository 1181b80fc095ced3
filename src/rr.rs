//! RRs and RRsets.

use crate::name::DomainName;
use crate::rdata::RData;

/// A single resource record: `(owner, type, class, ttl, rdata)`.
#[derive(Debug, Clone)]
pub struct RR {
    pub owner: DomainName,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: RData,
}

impl RR {
    pub fn new(owner: DomainName, rtype: u16, rclass: u16, ttl: u32, rdata: RData) -> Self {
        RR {
            owner,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Full RR equality: owner, type, class, ttl, and
    /// canonical rdata bytes must all match. A TTL-only change is therefore
    /// *not* equal - it surfaces as a delete of the old RR and an add of the
    /// new one.
    pub fn rr_eq(&self, other: &RR) -> bool {
        self.owner == other.owner
            && self.rtype == other.rtype
            && self.rclass == other.rclass
            && self.ttl == other.ttl
            && self.rdata.canonical_bytes() == other.rdata.canonical_bytes()
    }

    /// Compares `(ttl, rdata)` only - what the per-RR diff
    /// actually needs, since owner/type/class are already fixed by the
    /// enclosing rrset.
    pub fn ttl_rdata_eq(&self, ttl: u32, rdata: &[u8]) -> bool {
        self.ttl == ttl && self.rdata.matches_canonical(rdata)
    }
}

/// All RRs sharing an `(owner, type, class)` triple. Order is not
/// semantically significant.
#[derive(Debug, Clone, Default)]
pub struct RRset {
    pub rtype: u16,
    pub rclass: u16,
    pub rrs: Vec<RR>,
}

impl RRset {
    pub fn new(rtype: u16, rclass: u16) -> Self {
        RRset {
            rtype,
            rclass,
            rrs: Vec::new(),
        }
    }

    pub fn push(&mut self, rr: RR) {
        debug_assert_eq!(rr.rtype, self.rtype);
        debug_assert_eq!(rr.rclass, self.rclass);
        self.rrs.push(rr);
    }

    pub fn is_empty(&self) -> bool {
        self.rrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rrs.len()
    }
}

/// A named node in the zone tree: an owner name plus whatever RRsets it
/// carries in the current zone. Nodes with no in-zone RRsets are glue/empty
/// and must never reach the spool writer or the diff engine.
#[derive(Debug, Clone)]
pub struct DomainNode {
    pub name: DomainName,
    pub rrsets: Vec<RRset>,
}

impl DomainNode {
    pub fn new(name: DomainName) -> Self {
        DomainNode {
            name,
            rrsets: Vec::new(),
        }
    }

    pub fn rrset(&self, rtype: u16) -> Option<&RRset> {
        self.rrsets.iter().find(|r| r.rtype == rtype)
    }

    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty() || self.rrsets.iter().all(RRset::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::RData;

    fn a_rr(owner: &str, ttl: u32, octets: [u8; 4]) -> RR {
        RR::new(
            owner.parse().unwrap(),
            1,
            1,
            ttl,
            RData::from_raw(octets.to_vec()),
        )
    }

    #[test]
    fn rr_eq_requires_matching_ttl() {
        let a = a_rr("a.example.com.", 3600, [10, 0, 0, 1]);
        let b = a_rr("a.example.com.", 300, [10, 0, 0, 1]);
        assert!(!a.rr_eq(&b));
        assert!(a.ttl_rdata_eq(3600, &[10, 0, 0, 1]));
        assert!(!a.ttl_rdata_eq(300, &[10, 0, 0, 1]));
    }

    #[test]
    fn rr_eq_requires_matching_rdata() {
        let a = a_rr("a.example.com.", 3600, [10, 0, 0, 1]);
        let b = a_rr("a.example.com.", 3600, [10, 0, 0, 2]);
        assert!(!a.rr_eq(&b));
    }

    #[test]
    fn domain_node_empty_rrsets_are_glue() {
        let mut node = DomainNode::new("empty.example.com.".parse().unwrap());
        assert!(node.is_empty());
        node.rrsets.push(RRset::new(1, 1));
        assert!(node.is_empty());
        node.rrsets[0].push(a_rr("empty.example.com.", 60, [1, 1, 1, 1]));
        assert!(!node.is_empty());
    }
}
