use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use settings_cascade::Settings;
use wirebind_core_types::{BindingId, ElementRef};

/// One attached binding: resolved settings plus the in-flight flag.
///
/// Lives for the element's lifetime; there is no teardown.
#[derive(Debug)]
pub struct BindingEntry {
    pub id: BindingId,
    pub settings: Arc<Settings>,
    in_flight: Arc<AtomicBool>,
}

impl BindingEntry {
    fn new(settings: Arc<Settings>) -> Self {
        Self {
            id: BindingId::new(),
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Claim the element for one trigger; `None` while a request for this
    /// element is still outstanding.
    pub fn begin_flight(&self) -> Option<FlightGuard> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Some(FlightGuard {
                flag: Arc::clone(&self.in_flight),
            })
        } else {
            None
        }
    }
}

/// Releases the element's in-flight claim on drop.
pub struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Per-element attachment registry; the attachment marker of the data
/// model. At most one binding per element.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    entries: DashMap<ElementRef, Arc<BindingEntry>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, element: &ElementRef) -> Option<Arc<BindingEntry>> {
        self.entries.get(element).map(|entry| Arc::clone(entry.value()))
    }

    /// Attach once; a second attach for the same element returns the
    /// existing entry with `false`.
    pub fn attach(&self, element: ElementRef, settings: Arc<Settings>) -> (Arc<BindingEntry>, bool) {
        match self.entries.entry(element) {
            Entry::Occupied(occupied) => (Arc::clone(occupied.get()), false),
            Entry::Vacant(vacant) => {
                let entry = Arc::new(BindingEntry::new(settings));
                vacant.insert(Arc::clone(&entry));
                (entry, true)
            }
        }
    }
}
