//! Process-wide registry with explicit, rate-limited impulse refresh.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::impulses::scan_impulse_dir;

/// Inputs the registry is built from.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Directory scanned for impulse-response files.
    pub impulse_dir: PathBuf,
    /// Whether the external plugin host family is available.
    pub plugins_enabled: bool,
    /// Minimum time between two impulse rescans.
    pub rescan_interval: Duration,
}

/// Shared, read-mostly effect registry.
///
/// Readers take a [`Catalog`] snapshot with [`snapshot`](Self::snapshot); a
/// refresh publishes a new snapshot without disturbing ones already handed out.
pub struct EffectRegistry {
    options: RegistryOptions,
    current: ArcSwap<Catalog>,
    last_scan: Mutex<Instant>,
}

impl EffectRegistry {
    /// Scans the impulse directory and builds the initial catalog.
    pub fn new(options: RegistryOptions) -> Self {
        let impulses = scan_impulse_dir(&options.impulse_dir);
        info!(
            impulses = impulses.len(),
            plugins = options.plugins_enabled,
            "effect registry ready"
        );
        let catalog = Catalog::new(impulses, options.plugins_enabled);
        Self {
            current: ArcSwap::from_pointee(catalog),
            last_scan: Mutex::new(Instant::now()),
            options,
        }
    }

    /// The current catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.load_full()
    }

    /// Rescans the impulse directory unless the last scan is more recent
    /// than the configured interval. Returns whether a rescan happened.
    pub fn refresh_impulses(&self) -> bool {
        let mut last_scan = self.last_scan.lock();
        let elapsed = last_scan.elapsed();
        if elapsed < self.options.rescan_interval {
            debug!(?elapsed, "impulse refresh skipped");
            return false;
        }
        let impulses = scan_impulse_dir(&self.options.impulse_dir);
        info!(impulses = impulses.len(), "impulse directory rescanned");
        self.current
            .store(Arc::new(Catalog::new(impulses, self.options.plugins_enabled)));
        *last_scan = Instant::now();
        true
    }
}
