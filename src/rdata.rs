//! Canonical, uncompressed rdata encoding.
//!
//! An [`RData`] is a type-dependent sequence of atoms, each either a domain
//! name or a raw octet run. Its canonical encoding is the concatenation of
//! those atoms in declaration order, with domain atoms written as raw
//! wire-format names - no compression pointers, ever.

use crate::name::DomainName;

/// One atom of an RR's rdata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RDataAtom {
    /// An embedded domain name, e.g. the target of a CNAME or NS record.
    Name(DomainName),
    /// A raw octet run, e.g. an A record's address or a TXT character-string.
    Raw(Vec<u8>),
}

impl RDataAtom {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            RDataAtom::Name(name) => out.extend_from_slice(name.as_wire()),
            RDataAtom::Raw(bytes) => out.extend_from_slice(bytes),
        }
    }

    fn canonical_len(&self) -> usize {
        match self {
            RDataAtom::Name(name) => name.wire_len(),
            RDataAtom::Raw(bytes) => bytes.len(),
        }
    }
}

/// The rdata of a single RR, as an ordered list of atoms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RData {
    atoms: Vec<RDataAtom>,
}

impl RData {
    pub fn new(atoms: Vec<RDataAtom>) -> Self {
        RData { atoms }
    }

    pub fn from_raw(bytes: impl Into<Vec<u8>>) -> Self {
        RData {
            atoms: vec![RDataAtom::Raw(bytes.into())],
        }
    }

    pub fn atoms(&self) -> &[RDataAtom] {
        &self.atoms
    }

    /// The canonical uncompressed encoding: atoms concatenated in order.
    /// This is what gets written to the spool and what `rdlen` measures.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.rdlen());
        for atom in &self.atoms {
            atom.write_canonical(&mut out);
        }
        out
    }

    /// Byte length of the canonical encoding.
    pub fn rdlen(&self) -> usize {
        self.atoms.iter().map(RDataAtom::canonical_len).sum()
    }

    /// Compares this rdata's canonical bytes against a flat buffer read from
    /// the spool, atom by atom. Equivalent to (but
    /// avoids allocating for) `self.canonical_bytes() == spooled`.
    pub fn matches_canonical(&self, spooled: &[u8]) -> bool {
        let mut cursor = 0;
        for atom in &self.atoms {
            let len = atom.canonical_len();
            let Some(window) = spooled.get(cursor..cursor + len) else {
                return false;
            };
            let matches = match atom {
                RDataAtom::Name(name) => name.as_wire() == window,
                RDataAtom::Raw(bytes) => bytes.as_slice() == window,
            };
            if !matches {
                return false;
            }
            cursor += len;
        }
        cursor == spooled.len()
    }
}
