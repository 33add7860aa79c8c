//! Holder for the current layout manifest.
//!
//! Every inventory refresh takes a ticket before computing a layout and
//! commits the result with it. Only the most recently issued ticket may
//! install its manifest, so a slow, older refresh finishing late never
//! replaces a newer layout. Readers get the installed manifest as an `Arc`
//! and keep it for as long as they like; installation swaps the pointer.

use std::sync::{Arc, RwLock};

use crate::manifest::LayoutManifest;

/// Proof that a refresh was started; pass it back to [`ManifestStore::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket {
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    issued: u64,
    installed: u64,
    manifest: Option<Arc<LayoutManifest>>,
}

#[derive(Debug, Default)]
pub struct ManifestStore {
    inner: RwLock<Slot>,
}

impl ManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh. Any ticket issued earlier becomes stale.
    pub fn begin_refresh(&self) -> RefreshTicket {
        match self.inner.write() {
            Ok(mut slot) => {
                slot.issued += 1;
                RefreshTicket {
                    generation: slot.issued,
                }
            }
            // A poisoned store never accepts commits again.
            Err(_) => RefreshTicket { generation: 0 },
        }
    }

    /// Install `manifest` if `ticket` is still the newest. Returns whether it was installed.
    pub fn commit(&self, ticket: RefreshTicket, manifest: LayoutManifest) -> bool {
        let Ok(mut slot) = self.inner.write() else {
            return false;
        };
        if ticket.generation == 0 || ticket.generation != slot.issued {
            log::debug!(
                "Discarding layout from refresh {} (latest is {})",
                ticket.generation,
                slot.issued
            );
            return false;
        }
        slot.installed = ticket.generation;
        slot.manifest = Some(Arc::new(manifest));
        true
    }

    /// The installed manifest, if any refresh has completed.
    pub fn current(&self) -> Option<Arc<LayoutManifest>> {
        self.inner.read().ok().and_then(|slot| slot.manifest.clone())
    }

    /// Generation of the installed manifest; 0 before the first commit.
    pub fn generation(&self) -> u64 {
        self.inner.read().map(|slot| slot.installed).unwrap_or(0)
    }
}
