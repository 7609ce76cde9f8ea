use std::sync::Mutex;

use tracing::debug;

use crate::defaults::default_settings;
use crate::model::{resolve, Settings, SettingsLayer};

/// Injectable defaults object replacing a process-wide mutable default set.
///
/// Holds the base defaults plus the accumulated globally-overridden layer.
/// `set_defaults` merges with last-write-wins semantics; readers get
/// immutable snapshots, so a snapshot taken before an override is
/// unaffected by it.
#[derive(Debug)]
pub struct DefaultsProvider {
    base: Settings,
    overrides: Mutex<SettingsLayer>,
}

impl DefaultsProvider {
    pub fn new() -> Self {
        Self::with_base(default_settings())
    }

    pub fn with_base(base: Settings) -> Self {
        Self {
            base,
            overrides: Mutex::new(SettingsLayer::default()),
        }
    }

    /// Merge a partial layer into the globally-overridden defaults.
    ///
    /// Only keys the layer explicitly sets are overridden; concurrent
    /// writers are serialized by the lock, last write wins per key.
    pub fn set_defaults(&self, layer: SettingsLayer) {
        let mut overrides = self.overrides.lock().expect("defaults lock poisoned");
        overrides.merge_from(&layer);
        debug!("global default overrides updated");
    }

    /// Current effective defaults as an immutable value.
    pub fn snapshot(&self) -> Settings {
        let (base, overrides) = self.layers();
        resolve(
            &base,
            &overrides,
            &SettingsLayer::default(),
            &SettingsLayer::default(),
        )
    }

    /// The first two cascade layers, for a full four-layer resolution.
    pub fn layers(&self) -> (Settings, SettingsLayer) {
        let overrides = self.overrides.lock().expect("defaults lock poisoned");
        (self.base.clone(), overrides.clone())
    }
}

impl Default for DefaultsProvider {
    fn default() -> Self {
        Self::new()
    }
}
