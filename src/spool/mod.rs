//! On-disk snapshot of a zone, written by [`writer::spool_zone`] and streamed
//! back by [`reader::open_validated`].

pub mod format;
pub mod reader;
pub mod writer;

pub use reader::{open_validated, DnameIterator, SpooledRR, SpooledRRset};
pub use writer::spool_zone;
