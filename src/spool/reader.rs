//! Spool reader and dname iterator.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{error, Error, ErrorKind, Result};
use crate::name::DomainName;
use crate::spool::format::{read_dname, read_u16, read_u32};

/// An RR as read off the spool: `ttl` plus the flat canonical rdata bytes.
/// The spool never gives back an atom layout, only opaque canonical bytes -
/// this is the asymmetry between adds (live,
/// atom-aware) and deletes (spooled, byte-opaque).
#[derive(Debug, Clone)]
pub struct SpooledRR {
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SpooledRRset {
    pub rtype: u16,
    pub rclass: u16,
    pub rrs: Vec<SpooledRR>,
}

/// Opens `path`, reads the header, and validates it against the apex and
/// serial recorded at `start()` time. Returns `stale_snapshot` on any
/// mismatch.
pub fn open_validated(
    path: &Path,
    expected_apex: &DomainName,
    expected_old_serial: u32,
) -> Result<DnameIterator<BufReader<File>>> {
    let file = File::open(path).map_err(|e| Error::io(format!("{}: {}", path.display(), e)))?;
    let mut reader = BufReader::new(file);

    let apex = read_dname(&mut reader)?
        .ok_or_else(|| malformed("spool header missing apex name"))?;
    let old_serial = read_u32(&mut reader)?;

    if apex != *expected_apex {
        return Err(
            error!(StaleSnapshot => "spool apex {} does not match session apex {}", apex, expected_apex),
        );
    }
    if old_serial != expected_old_serial {
        return Err(
            error!(StaleSnapshot => "spool serial {} does not match session serial {}", old_serial, expected_old_serial),
        );
    }

    Ok(DnameIterator::new(reader))
}

#[derive(Debug)]
enum IterState {
    BeforeFirst,
    /// A name has been read and not yet consumed by the diff engine. The
    /// iterator will keep returning it from `current()` until `take_rrsets`
    /// or another `advance()` moves past it.
    Holding(DomainName),
    /// The held name's RRset body has been consumed; the next `advance()`
    /// reads the following domain header.
    Processed,
    Eof,
}

/// Streaming, one-step-lookahead cursor over the spool's domain sequence.
///
/// `advance()` and `take_rrsets()` are the only mutators; everything else is
/// observation-only, which is what lets the diff engine compare the
/// iterator's current name against the live zone's current domain without
/// consuming it.
pub struct DnameIterator<R> {
    reader: R,
    state: IterState,
}

impl<R: Read> DnameIterator<R> {
    pub fn new(reader: R) -> Self {
        DnameIterator {
            reader,
            state: IterState::BeforeFirst,
        }
    }

    /// Ensures a name is loaded (or EOF has been reached). Idempotent while
    /// a name is being held.
    pub fn advance(&mut self) -> Result<()> {
        match self.state {
            IterState::Holding(_) | IterState::Eof => Ok(()),
            IterState::BeforeFirst | IterState::Processed => {
                self.state = match read_dname(&mut self.reader)? {
                    Some(name) => IterState::Holding(name),
                    None => IterState::Eof,
                };
                Ok(())
            }
        }
    }

    /// The currently held name, if any. Does not consume it.
    pub fn current(&self) -> Option<&DomainName> {
        match &self.state {
            IterState::Holding(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.state, IterState::Eof)
    }

    /// Reads and returns the held domain's full RRset body, marking it
    /// processed. Must be called while `current()` is `Some`; the domain's
    /// body is always read in full since the stream cannot be seeked past.
    pub fn take_rrsets(&mut self) -> Result<Vec<SpooledRRset>> {
        if self.current().is_none() {
            return Err(malformed("take_rrsets called with no name held"));
        }
        let rrset_count = read_u32(&mut self.reader)?;
        let mut rrsets = Vec::with_capacity(rrset_count as usize);
        for _ in 0..rrset_count {
            let rtype = read_u16(&mut self.reader)?;
            let rclass = read_u16(&mut self.reader)?;
            let rr_count = read_u16(&mut self.reader)?;
            let mut rrs = Vec::with_capacity(rr_count as usize);
            for _ in 0..rr_count {
                let ttl = read_u32(&mut self.reader)?;
                let rdlen = read_u16(&mut self.reader)? as usize;
                let mut rdata = vec![0u8; rdlen];
                self.reader
                    .read_exact(&mut rdata)
                    .map_err(|_| malformed("short read mid-rdata"))?;
                rrs.push(SpooledRR { ttl, rdata });
            }
            rrsets.push(SpooledRRset { rtype, rclass, rrs });
        }
        self.state = IterState::Processed;
        Ok(rrsets)
    }
}

fn malformed(message: &str) -> Error {
    Error {
        kind: ErrorKind::MalformedSpool,
        message: Some(message.to_string()),
    }
}
