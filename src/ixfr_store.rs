//! The `ixfr_store` boundary: the sink the diff engine hands RRs to.
//!
//! The real store packages deletions and additions into an RFC 1995 IXFR
//! response payload - framing that payload is out of scope here. What the
//! diff engine actually needs is a sink it can hand RRs to in order, with the
//! same add/delete asymmetry described above: adds carry a live, atom-aware
//! [`RData`]; deletes carry only the flat canonical bytes read back off the
//! spool.
//!
//! The trait's lifecycle is RAII rather than an explicit `free` - a session
//! builds one `Box<dyn IxfrStore>`, hands it to the engine, and drops it when
//! the diff is done or abandoned.

use crate::error::Result;
use crate::name::DomainName;
use crate::rdata::RData;

/// Sink for diff operations, bound to a zone and an `(old_serial, new_serial)`
/// pair for the life of one diff run.
///
/// Both methods return a [`Result`] so a bounded-buffer implementation can
/// fail with [`crate::error::ErrorKind::Oom`] and have that failure
/// propagate all the way up through the engine to `DiffSession::perform`,
/// aborting the session rather than silently dropping the operation.
pub trait IxfrStore {
    /// Adds one RR, rdata given as the in-memory atom array.
    fn add_rr(
        &mut self,
        owner: &DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: &RData,
    ) -> Result<()>;

    /// Deletes one RR, rdata given as a flat buffer read back from the spool.
    fn del_rr_uncompressed(
        &mut self,
        owner: &DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: &[u8],
    ) -> Result<()>;
}

/// One recorded operation, used by [`RecordingIxfrStore`] and by tests that
/// want to assert on the emitted diff directly rather than re-deriving a zone
/// from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRR {
    pub owner: DomainName,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

/// One call the engine made to the store, preserving the exact order calls
/// arrived in - the `deletes`/`adds` convenience fields on
/// [`RecordingIxfrStore`] split by kind and so lose that interleaving, which
/// is the only thing that can prove the domain-canonical ordering guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Delete(RecordedRR),
    Add(RecordedRR),
}

impl RecordedOp {
    pub fn owner(&self) -> &DomainName {
        match self {
            RecordedOp::Delete(rr) | RecordedOp::Add(rr) => &rr.owner,
        }
    }
}

/// An [`IxfrStore`] that just accumulates what it's given, in the order it's
/// given it. Good enough to test the engine against and to back the demo
/// binary; a real deployment would frame these into wire packets instead.
#[derive(Debug, Clone, Default)]
pub struct RecordingIxfrStore {
    pub deletes: Vec<RecordedRR>,
    pub adds: Vec<RecordedRR>,
    /// Every call in the exact order the engine made it.
    pub ops: Vec<RecordedOp>,
}

impl RecordingIxfrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.deletes.is_empty() && self.adds.is_empty()
    }
}

impl IxfrStore for RecordingIxfrStore {
    fn add_rr(
        &mut self,
        owner: &DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: &RData,
    ) -> Result<()> {
        let rr = RecordedRR {
            owner: owner.clone(),
            rtype,
            rclass,
            ttl,
            rdata: rdata.canonical_bytes(),
        };
        self.adds.push(rr.clone());
        self.ops.push(RecordedOp::Add(rr));
        Ok(())
    }

    fn del_rr_uncompressed(
        &mut self,
        owner: &DomainName,
        rtype: u16,
        rclass: u16,
        ttl: u32,
        rdata: &[u8],
    ) -> Result<()> {
        let rr = RecordedRR {
            owner: owner.clone(),
            rtype,
            rclass,
            ttl,
            rdata: rdata.to_vec(),
        };
        self.deletes.push(rr.clone());
        self.ops.push(RecordedOp::Delete(rr));
        Ok(())
    }
}
