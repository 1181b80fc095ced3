//! Domain names in DNS wire format.
//!
//! This is a core-owned type: spool framing, the dname iterator, and the
//! merge-join's ordering contract all depend on one unambiguous notion of
//! "canonical order", so this crate does not defer name comparison to
//! whatever the external zone database happens to do.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Maximum wire-format length of a domain name, including the terminating
/// root label, per RFC 1035 section 3.1.
pub const MAX_NAME_LEN: usize = 255;
/// Maximum length of a single label, per RFC 1035 section 3.1.
pub const MAX_LABEL_LEN: usize = 63;

/// A domain name stored as a sequence of length-prefixed labels, uncompressed,
/// terminated by the zero-length root label. Comparison follows DNS canonical
/// order (RFC 4034 section 6.1): label by label, starting at the root,
/// case-insensitive.
#[derive(Debug, Clone, Eq)]
pub struct DomainName {
    wire: Vec<u8>,
}

impl DomainName {
    /// The root name, a single zero-length label.
    pub fn root() -> Self {
        DomainName { wire: vec![0] }
    }

    /// Parses an uncompressed wire-format name starting at `bytes[0]`.
    /// Returns the name and the number of bytes it consumed.
    pub fn from_wire_prefix(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut offset = 0;
        loop {
            let len = *bytes
                .get(offset)
                .ok_or_else(|| malformed("truncated dname"))? as usize;
            offset += 1;
            if len == 0 {
                break;
            }
            if len > MAX_LABEL_LEN {
                return Err(malformed(&format!("label length {} exceeds 63", len)));
            }
            if offset + len > bytes.len() {
                return Err(malformed("truncated dname label"));
            }
            offset += len;
            if offset > MAX_NAME_LEN {
                return Err(malformed("dname exceeds 255 octets"));
            }
        }
        Ok((
            DomainName {
                wire: bytes[..offset].to_vec(),
            },
            offset,
        ))
    }

    /// Builds a name from an exact, already-validated wire buffer (e.g. one
    /// just read off the spool via [`crate::spool::format`]).
    pub fn from_wire_exact(bytes: Vec<u8>) -> Result<Self> {
        let (name, consumed) = Self::from_wire_prefix(&bytes)?;
        if consumed != bytes.len() {
            return Err(malformed("trailing bytes after dname"));
        }
        Ok(name)
    }

    /// Builds a name from a sequence of label octet strings (not including
    /// the root label, which is appended automatically).
    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut wire = Vec::new();
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(malformed("invalid label length"));
            }
            wire.push(label.len() as u8);
            wire.extend_from_slice(label);
        }
        wire.push(0);
        if wire.len() > MAX_NAME_LEN {
            return Err(malformed("dname exceeds 255 octets"));
        }
        Ok(DomainName { wire })
    }

    /// The raw, uncompressed wire-format bytes, including the root label.
    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }

    /// Wire length in octets, including the root label - this is what the
    /// spool format's `name_len` field records.
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Iterates labels from the leftmost (most specific) to the root,
    /// excluding the terminating root label itself.
    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        LabelIter {
            wire: &self.wire,
            offset: 0,
        }
    }

    /// True if `self` is equal to or a descendant of `ancestor` in the name
    /// tree (`domain_is_subdomain` in the external zone database's terms).
    pub fn is_subdomain_of(&self, ancestor: &DomainName) -> bool {
        let self_labels: Vec<&[u8]> = self.labels().collect();
        let anc_labels: Vec<&[u8]> = ancestor.labels().collect();
        if anc_labels.len() > self_labels.len() {
            return false;
        }
        let tail = &self_labels[self_labels.len() - anc_labels.len()..];
        tail.iter()
            .zip(anc_labels.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Labels from the root inward, each lowercased - the representation
    /// canonical ordering is computed over.
    fn canonical_labels(&self) -> Vec<Vec<u8>> {
        let mut labels: Vec<Vec<u8>> = self
            .labels()
            .map(|l| l.to_ascii_lowercase())
            .collect();
        labels.reverse();
        labels
    }
}

struct LabelIter<'a> {
    wire: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let len = *self.wire.get(self.offset)? as usize;
        if len == 0 {
            return None;
        }
        let start = self.offset + 1;
        let label = &self.wire[start..start + len];
        self.offset = start + len;
        Some(label)
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl std::hash::Hash for DomainName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for label in self.canonical_labels() {
            label.hash(state);
        }
    }
}

impl Ord for DomainName {
    /// RFC 4034 section 6.1 canonical order: labels compared root-first,
    /// case-insensitively, shorter-is-less on a common prefix.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let a = self.canonical_labels();
        let b = other.canonical_labels();
        a.cmp(&b)
    }
}

impl PartialOrd for DomainName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, ".");
        }
        for label in self.labels() {
            for &b in label {
                match b {
                    b'.' | b'\\' => {
                        write!(f, "\\{}", b as char)?;
                    }
                    0x21..=0x7e => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
            write!(f, ".")?;
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = Error;

    /// Parses the usual dotted presentation format, with `\.` and `\DDD`
    /// escapes. A lone `.` is the root name.
    fn from_str(s: &str) -> Result<Self> {
        if s == "." {
            return Ok(DomainName::root());
        }
        let bytes = s.as_bytes();
        let mut labels: Vec<Vec<u8>> = Vec::new();
        let mut current = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    labels.push(std::mem::take(&mut current));
                    i += 1;
                }
                b'\\' if i + 3 < bytes.len() && bytes[i + 1].is_ascii_digit() => {
                    let digits = std::str::from_utf8(&bytes[i + 1..i + 4])
                        .map_err(|_| malformed("invalid escape"))?;
                    let value: u16 = digits.parse().map_err(|_| malformed("invalid escape"))?;
                    current.push(value as u8);
                    i += 4;
                }
                b'\\' if i + 1 < bytes.len() => {
                    current.push(bytes[i + 1]);
                    i += 2;
                }
                c => {
                    current.push(c);
                    i += 1;
                }
            }
        }
        if !current.is_empty() || bytes.last() != Some(&b'.') {
            labels.push(current);
        }
        DomainName::from_labels(labels)
    }
}

fn malformed(message: &str) -> Error {
    Error {
        kind: ErrorKind::MalformedSpool,
        message: Some(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_single_zero_byte() {
        assert_eq!(DomainName::root().as_wire(), &[0]);
    }

    #[test]
    fn round_trips_through_wire_format() {
        let name: DomainName = "www.example.com.".parse().unwrap();
        let (parsed, consumed) = DomainName::from_wire_prefix(name.as_wire()).unwrap();
        assert_eq!(consumed, name.wire_len());
        assert_eq!(parsed, name);
        assert_eq!(parsed.to_string(), "www.example.com.");
    }

    #[test]
    fn canonical_order_is_case_insensitive() {
        let a: DomainName = "WWW.example.com.".parse().unwrap();
        let b: DomainName = "www.EXAMPLE.com.".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn parent_sorts_before_child() {
        let parent: DomainName = "example.com.".parse().unwrap();
        let child: DomainName = "a.example.com.".parse().unwrap();
        assert!(parent < child);
    }

    #[test]
    fn sibling_order_compares_leftmost_label_last() {
        // "b.example.com." and "a.example.com." differ only in their
        // leftmost (least significant) label, which is compared last.
        let a: DomainName = "a.example.com.".parse().unwrap();
        let b: DomainName = "b.example.com.".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn different_depth_names_order_by_shared_prefix() {
        let shallow: DomainName = "com.".parse().unwrap();
        let deep: DomainName = "example.com.".parse().unwrap();
        assert!(shallow < deep);
    }

    #[test]
    fn is_subdomain_of_checks_suffix() {
        let apex: DomainName = "example.com.".parse().unwrap();
        let sub: DomainName = "a.b.example.com.".parse().unwrap();
        let other: DomainName = "example.net.".parse().unwrap();
        assert!(sub.is_subdomain_of(&apex));
        assert!(apex.is_subdomain_of(&apex));
        assert!(!other.is_subdomain_of(&apex));
    }

    #[test]
    fn rejects_oversized_label() {
        let label = vec![b'a'; 64];
        assert!(DomainName::from_labels([label]).is_err());
    }

    #[test]
    fn rejects_truncated_wire_name() {
        assert!(DomainName::from_wire_prefix(&[3, b'w', b'w']).is_err());
    }
}
