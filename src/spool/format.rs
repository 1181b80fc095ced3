//! Low-level spool framing primitives.
//!
//! Every multi-byte integer is written in host byte order - the spool is a
//! transient, process-local artifact, never shipped across machines, so
//! there is no portability tax to pay for it.

use std::io::{Read, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, ErrorKind, Result};
use crate::name::DomainName;

pub fn write_u16<W: Write>(w: &mut W, value: u16) -> Result<()> {
    w.write_u16::<NativeEndian>(value).map_err(Into::into)
}

pub fn write_u32<W: Write>(w: &mut W, value: u32) -> Result<()> {
    w.write_u32::<NativeEndian>(value).map_err(Into::into)
}

/// Writes a length-prefixed, uncompressed wire-format name: `u16` length
/// then the raw bytes.
pub fn write_dname<W: Write>(w: &mut W, name: &DomainName) -> Result<()> {
    write_u16(w, name.wire_len() as u16)?;
    w.write_all(name.as_wire()).map_err(Into::into)
}

/// Writes the end-of-stream sentinel: a zero-length name.
pub fn write_sentinel<W: Write>(w: &mut W) -> Result<()> {
    write_u16(w, 0)
}

pub fn read_u16<R: Read>(r: &mut R) -> Result<u16> {
    r.read_u16::<NativeEndian>().map_err(map_read_error)
}

pub fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    r.read_u32::<NativeEndian>().map_err(map_read_error)
}

/// Reads one length-prefixed name. Returns `Ok(None)` when the length prefix
/// is the zero-length end-of-stream sentinel.
pub fn read_dname<R: Read>(r: &mut R) -> Result<Option<DomainName>> {
    let len = read_u16(r)? as usize;
    if len == 0 {
        return Ok(None);
    }
    if len > crate::name::MAX_NAME_LEN {
        return Err(malformed(&format!("dname length {} exceeds 255", len)));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).map_err(map_read_error)?;
    DomainName::from_wire_exact(buf)
}

fn map_read_error(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        malformed("short read mid-record")
    } else {
        err.into()
    }
}

fn malformed(message: &str) -> Error {
    Error {
        kind: ErrorKind::MalformedSpool,
        message: Some(message.to_string()),
    }
}
