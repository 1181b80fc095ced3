//! The diff engine: ordered merge of a spooled (old) zone against a live
//! (new) zone.

pub mod engine;

pub use engine::walk_zone;
