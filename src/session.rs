//! The orchestrator: diff session lifecycle.

use std::path::{Path, PathBuf};

use crate::diff::walk_zone;
use crate::error::Result;
use crate::ixfr_store::IxfrStore;
use crate::name::DomainName;
use crate::namedb::ZoneDatabase;
use crate::spool::{open_validated, spool_zone};

/// A diff session in progress: the apex and serial recorded at [`start`],
/// and the spool path that exclusively belongs to this session until it's
/// freed. Mirrors the `ixfr_create` handle.
pub struct DiffSession {
    zone_name: DomainName,
    old_serial: u32,
    new_serial: Option<u32>,
    spool_path: PathBuf,
}

impl DiffSession {
    /// Returns the spool path this session owns.
    pub fn spool_path(&self) -> &Path {
        &self.spool_path
    }

    pub fn old_serial(&self) -> u32 {
        self.old_serial
    }

    pub fn new_serial(&self) -> Option<u32> {
        self.new_serial
    }

    /// Captures a snapshot of `zone` as it stands right now and writes it to
    /// the spool. The spool path embeds the process id and the zone file
    /// name so concurrent sessions over different zones never collide.
    pub fn start(
        zone: &dyn ZoneDatabase,
        zone_file_path: &Path,
        spool_dir: Option<&Path>,
    ) -> Result<Self> {
        let spool_path = spool_path_for(zone_file_path, spool_dir);

        log::info!(
            target: "session",
            "starting diff session for {} (serial {}), spool {}",
            zone.apex(),
            zone.serial(),
            spool_path.display()
        );

        spool_zone(zone, &spool_path, zone.serial())?;

        Ok(DiffSession {
            zone_name: zone.apex().clone(),
            old_serial: zone.serial(),
            new_serial: None,
            spool_path,
        })
    }

    /// Reopens the spool, validates its header against what was recorded at
    /// `start`, and runs the merge-join diff engine against `new_zone`,
    /// writing deletes and adds to `store` in domain-canonical order.
    ///
    /// On any failure - I/O, a stale snapshot, or a malformed spool - no
    /// partial diff is left in `store` for the caller to trust; the error is
    /// the only signal that matters - the diff is all-or-nothing.
    pub fn perform(
        &mut self,
        new_zone: &dyn ZoneDatabase,
        store: &mut dyn IxfrStore,
    ) -> Result<()> {
        log::info!(
            target: "session",
            "performing diff for {} (old serial {}, new serial {})",
            self.zone_name,
            self.old_serial,
            new_zone.serial()
        );

        let mut spool = open_validated(&self.spool_path, &self.zone_name, self.old_serial)?;
        self.new_serial = Some(new_zone.serial());

        walk_zone(new_zone, &mut spool, store)
    }

    /// Releases the session's in-memory state. The spool file itself is
    /// unlinked here rather than left to the caller, since in Rust the
    /// natural place for that cleanup is `Drop`.
    pub fn free(self) {
        drop(self);
    }
}

impl Drop for DiffSession {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.spool_path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    target: "session",
                    "failed to remove spool file {}: {}",
                    self.spool_path.display(),
                    err
                );
            }
        }
    }
}

fn spool_path_for(zone_file_path: &Path, spool_dir: Option<&Path>) -> PathBuf {
    let file_name = zone_file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "zone".to_string());
    let spooled_name = format!("{}.spoolzone.{}", file_name, std::process::id());

    match spool_dir {
        Some(dir) => dir.join(spooled_name),
        None => zone_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(spooled_name),
    }
}
