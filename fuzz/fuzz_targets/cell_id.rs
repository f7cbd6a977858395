#![no_main]

use libfuzzer_sys::fuzz_target;
use s2o::{CellId, Level};

fuzz_target!(|cell: CellId| {
    assert!(cell.is_valid());
    assert_eq!(CellId::try_from(u64::from(cell)).ok(), Some(cell));

    // Token round-trip.
    assert_eq!(CellId::from_token(&cell.to_token()), cell);

    // Range laws.
    assert!(cell.range_min() <= cell && cell <= cell.range_max());
    assert!(cell.contains(cell));

    // Hierarchy.
    for level in Level::range(Level::MIN, cell.level()) {
        let parent = cell.parent(level).expect("parent");
        assert!(parent.contains(cell));
        assert_eq!(cell.common_ancestor_level(parent), Some(level));
    }
    if let Some(child) = cell.child(2) {
        assert_eq!(child.parent(cell.level()), Some(cell));
        assert_eq!(child.child_position(child.level()), 2);
    }

    // Decode/encode round-trip through face coordinates for leaves.
    if cell.is_leaf() {
        let (face, i, j) = cell.to_face_ij();
        assert_eq!(CellId::from_face_ij(face, i, j), cell);
    }
});
