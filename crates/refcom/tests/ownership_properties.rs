use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use refcom::{Counted, Handle};

struct Tracked {
    finalized: Arc<AtomicUsize>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.finalized.fetch_add(1, Ordering::SeqCst);
    }
}

type Resource = Handle<Counted<Tracked>>;

fn count_of(handle: &Resource) -> u32 {
    handle.resource().map_or(0, Counted::ref_count)
}

/// Small deterministic generator so failures replay.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

/// Every bound handle must observe a count equal to the number of handles
/// bound to the same resource.
fn assert_counts_match(slots: &[Resource]) {
    for (i, handle) in slots.iter().enumerate() {
        if handle.is_empty() {
            continue;
        }
        let sharing = slots.iter().filter(|other| Handle::ptr_eq(handle, other)).count();
        assert_eq!(count_of(handle) as usize, sharing, "slot {i}");
    }
}

fn distinct_live(slots: &[Resource]) -> usize {
    let mut seen: Vec<*mut Counted<Tracked>> = slots
        .iter()
        .filter(|h| h.is_bound())
        .map(|h| h.as_raw())
        .collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

#[test]
fn fresh_handle_is_empty() {
    let handle = Resource::default();
    assert!(handle.is_empty());
}

#[test]
fn copy_survives_original() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let a = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    let b = a.clone();
    drop(a);
    assert!(b.is_bound());
    assert_eq!(count_of(&b), 1);
    assert_eq!(finalized.load(Ordering::SeqCst), 0);
}

#[test]
fn move_transfers_without_count_change() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let mut a = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    let extra = a.clone();
    let raw = a.as_raw();

    let b = a.take();
    assert!(a.is_empty());
    assert_eq!(b.as_raw(), raw);
    assert_eq!(count_of(&b), 2);
    drop(extra);
    assert_eq!(count_of(&b), 1);
}

#[test]
fn move_assign_releases_previous_binding() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let mut target = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    let source = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    assert!(target.is_bound());
    target = source;
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
    assert_eq!(count_of(&target), 1);
}

#[test]
fn reset_twice_releases_once() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let mut a = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    let b = a.clone();
    a.reset();
    assert_eq!(count_of(&b), 1);
    a.reset();
    assert_eq!(count_of(&b), 1);
    assert_eq!(finalized.load(Ordering::SeqCst), 0);
}

#[test]
fn copy_assign_releases_old_before_sharing_new() {
    let finalized = Arc::new(AtomicUsize::new(0));
    let mut x = Counted::new(Tracked {
        finalized: finalized.clone(),
    });
    let y = Counted::new(Tracked {
        finalized: finalized.clone(),
    });

    x.clone_from(&y);
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
    assert_eq!(count_of(&y), 2);

    // Same resource on both sides: nothing moves.
    x.clone_from(&y);
    assert_eq!(count_of(&y), 2);
    assert_eq!(finalized.load(Ordering::SeqCst), 1);
}

#[test]
fn random_operation_sequences_keep_counts_exact() {
    const SLOTS: usize = 6;
    const STEPS: usize = 2_000;

    for seed in [0x9E37_79B9_7F4A_7C15, 0xDEAD_BEEF, 42, 7_777_777] {
        let finalized = Arc::new(AtomicUsize::new(0));
        let mut created = 0usize;
        let mut rng = XorShift(seed);
        let mut slots: Vec<Resource> = (0..SLOTS).map(|_| Resource::empty()).collect();

        for _ in 0..STEPS {
            let i = rng.below(SLOTS);
            let j = rng.below(SLOTS);
            match rng.below(6) {
                0 => {
                    slots[i] = Counted::new(Tracked {
                        finalized: finalized.clone(),
                    });
                    created += 1;
                }
                1 => {
                    let source = slots[j].clone();
                    slots[i].clone_from(&source);
                }
                2 => slots[i] = slots[j].clone(),
                3 => {
                    let moved = slots[j].take();
                    slots[i] = moved;
                }
                4 => slots[i].reset(),
                _ => slots.swap(i, j),
            }

            assert_counts_match(&slots);
            assert_eq!(
                created - finalized.load(Ordering::SeqCst),
                distinct_live(&slots),
                "seed {seed:#x}"
            );
        }

        slots.clear();
        assert_eq!(finalized.load(Ordering::SeqCst), created);
    }
}
