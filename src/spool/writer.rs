//! Spool writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, ErrorKind, Result};
use crate::namedb::ZoneDatabase;
use crate::spool::format::{write_dname, write_sentinel, write_u16, write_u32};

fn open_for_write(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| Error::io(format!("{}: {}", path.display(), e)))
}

/// Writes a complete snapshot of `zone` to `path`, tagged with `serial`, in
/// the on-disk snapshot format. On failure the file is left in an
/// undefined state - the caller must treat it as invalid and regenerate or
/// abort, never resume a partial write.
pub fn spool_zone(zone: &dyn ZoneDatabase, path: &Path, serial: u32) -> Result<()> {
    log::debug!(target: "spool", "writing snapshot of {} (serial {}) to {}", zone.apex(), serial, path.display());

    let file = open_for_write(path)?;
    let mut out = BufWriter::new(file);

    write_dname(&mut out, zone.apex())?;
    write_u32(&mut out, serial)?;

    let mut domain_count = 0u64;
    for node in zone.domains() {
        let rrsets: Vec<_> = node.rrsets.iter().filter(|r| !r.is_empty()).collect();
        if rrsets.is_empty() {
            continue;
        }

        write_dname(&mut out, &node.name)?;
        write_u32(&mut out, rrsets.len() as u32)?;

        for rrset in rrsets {
            write_u16(&mut out, rrset.rtype)?;
            write_u16(&mut out, rrset.rclass)?;
            if rrset.len() > u16::MAX as usize {
                return Err(malformed("rrset exceeds 65535 RRs"));
            }
            write_u16(&mut out, rrset.len() as u16)?;
            for rr in &rrset.rrs {
                write_u32(&mut out, rr.ttl)?;
                let rdata = rr.rdata.canonical_bytes();
                if rdata.len() > u16::MAX as usize {
                    return Err(malformed("rdlen exceeds 65535"));
                }
                write_u16(&mut out, rdata.len() as u16)?;
                out.write_all(&rdata)?;
            }
        }
        domain_count += 1;
    }

    write_sentinel(&mut out)?;
    out.flush()?;

    log::debug!(target: "spool", "wrote {} domains to {}", domain_count, path.display());
    Ok(())
}

fn malformed(message: &str) -> Error {
    Error {
        kind: ErrorKind::MalformedSpool,
        message: Some(message.to_string()),
    }
}
