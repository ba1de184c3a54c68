//! Per-kind reference accounting for leak hunting.
//!
//! Off by default. While off, each acquire or release costs one relaxed
//! atomic load. While on, handles report every reference they take or give
//! up, keyed by the resource kind's type name, and emit a `TRACE` event on
//! the `refcom::refs` target.
//!
//! Counters only balance for handles created after tracking was switched on.

use std::any::type_name;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, const_mutex};

static TRACKING: AtomicBool = AtomicBool::new(false);
static TABLE: Mutex<BTreeMap<&'static str, Counters>> = const_mutex(BTreeMap::new());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefEvent {
    /// A handle took over an existing reference.
    Adopt,
    AddRef,
    Release,
    /// A handle gave its reference back through `into_raw`.
    Detach,
}

impl RefEvent {
    fn as_str(self) -> &'static str {
        match self {
            RefEvent::Adopt => "adopt",
            RefEvent::AddRef => "add_ref",
            RefEvent::Release => "release",
            RefEvent::Detach => "detach",
        }
    }

    fn acquires(self) -> bool {
        matches!(self, RefEvent::Adopt | RefEvent::AddRef)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    acquired: u64,
    released: u64,
}

/// Counters for one resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindStats {
    pub kind: &'static str,
    /// References taken by handles (adoptions and increments).
    pub acquired: u64,
    /// References given up by handles (releases and detaches).
    pub released: u64,
    /// `acquired - released`: references handles currently hold.
    pub live: i64,
}

impl KindStats {
    fn new(kind: &'static str, counters: Counters) -> Self {
        Self {
            kind,
            acquired: counters.acquired,
            released: counters.released,
            live: counters.acquired as i64 - counters.released as i64,
        }
    }
}

pub fn set_tracking(enabled: bool) {
    TRACKING.store(enabled, Ordering::Relaxed);
    tracing::debug!(enabled, "reference tracking switched");
}

#[inline]
pub fn is_tracking() -> bool {
    TRACKING.load(Ordering::Relaxed)
}

#[inline]
pub(crate) fn record<T>(event: RefEvent, addr: *const T, count: Option<u32>) {
    if is_tracking() {
        record_slow(type_name::<T>(), event, addr as usize, count);
    }
}

#[cold]
fn record_slow(kind: &'static str, event: RefEvent, addr: usize, count: Option<u32>) {
    {
        let mut table = TABLE.lock();
        let counters = table.entry(kind).or_default();
        if event.acquires() {
            counters.acquired += 1;
        } else {
            counters.released += 1;
        }
    }
    tracing::trace!(
        target: "refcom::refs",
        kind,
        event = event.as_str(),
        addr = format_args!("{addr:#x}"),
        count = ?count,
        "reference event"
    );
}

/// All recorded kinds, sorted by type name.
pub fn snapshot() -> Vec<KindStats> {
    TABLE
        .lock()
        .iter()
        .map(|(kind, counters)| KindStats::new(kind, *counters))
        .collect()
}

pub fn stats_for<T>() -> Option<KindStats> {
    let kind = type_name::<T>();
    TABLE
        .lock()
        .get(kind)
        .map(|counters| KindStats::new(kind, *counters))
}

/// Kinds on which handles still hold references.
pub fn live_kinds() -> Vec<KindStats> {
    snapshot().into_iter().filter(|stats| stats.live > 0).collect()
}

/// Logs one warning per kind with outstanding references and returns them.
pub fn report_leaks() -> Vec<KindStats> {
    let leaks = live_kinds();
    for stats in &leaks {
        tracing::warn!(
            kind = stats.kind,
            live = stats.live,
            acquired = stats.acquired,
            released = stats.released,
            "handles still hold references"
        );
    }
    leaks
}

/// Forgets every counter.
pub fn clear() {
    TABLE.lock().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Counted, Handle};

    // Tracking is global to the test process: these tests only ever switch it
    // on, and each one uses its own payload type so counters don't mix.

    struct AdoptPayload;
    struct ClonePayload;
    struct DetachPayload;
    struct LeakPayload;

    #[test]
    fn test_adopt_and_release_balance() {
        set_tracking(true);
        let handle = Counted::new(AdoptPayload);
        let stats = stats_for::<Counted<AdoptPayload>>().unwrap();
        assert_eq!((stats.acquired, stats.released, stats.live), (1, 0, 1));

        drop(handle);
        let stats = stats_for::<Counted<AdoptPayload>>().unwrap();
        assert_eq!((stats.acquired, stats.released, stats.live), (1, 1, 0));
    }

    #[test]
    fn test_clones_are_counted() {
        set_tracking(true);
        let first = Counted::new(ClonePayload);
        let second = first.clone();
        let mut third = Handle::empty();
        third.clone_from(&second);

        let stats = stats_for::<Counted<ClonePayload>>().unwrap();
        assert_eq!(stats.live, 3);
        assert!(
            live_kinds()
                .iter()
                .any(|s| s.kind == type_name::<Counted<ClonePayload>>())
        );

        drop((first, second, third));
        assert_eq!(stats_for::<Counted<ClonePayload>>().unwrap().live, 0);
    }

    #[test]
    fn test_detach_gives_reference_back() {
        set_tracking(true);
        let raw = Counted::new(DetachPayload).into_raw();
        assert_eq!(stats_for::<Counted<DetachPayload>>().unwrap().live, 0);

        drop(unsafe { Handle::from_raw(raw) });
        let stats = stats_for::<Counted<DetachPayload>>().unwrap();
        assert_eq!((stats.acquired, stats.released), (2, 2));
    }

    #[test]
    fn test_report_leaks_lists_kinds_still_held() {
        set_tracking(true);
        let kind = type_name::<Counted<LeakPayload>>();
        let held = Counted::new(LeakPayload);

        let leak = report_leaks().into_iter().find(|s| s.kind == kind).unwrap();
        assert_eq!((leak.acquired, leak.released, leak.live), (1, 0, 1));

        drop(held);
        assert!(report_leaks().iter().all(|s| s.kind != kind));
    }
}
