#![no_main]

use libfuzzer_sys::fuzz_target;
use s2o::CellId;

fuzz_target!(|cells: (CellId, CellId)| {
    let (a, b) = cells;

    assert_eq!(a.contains(b), a.range_min() <= b && b <= a.range_max());
    assert_eq!(a.intersects(b), b.intersects(a));

    match a.common_ancestor_level(b) {
        None => assert_ne!(a.face(), b.face()),
        Some(level) => {
            assert_eq!(a.parent(level), b.parent(level));
            if let Some(finer) = level.succ() {
                let still_shared = finer <= a.level()
                    && finer <= b.level()
                    && a.parent(finer) == b.parent(finer);
                assert!(!still_shared, "ancestor level is maximal");
            }
        }
    }
});
