use s2o::{CellId, Face, Level};

macro_rules! cell {
    ($id:literal) => {
        CellId::try_from($id).expect("cell id")
    };
}

fn level(value: u8) -> Level {
    Level::try_from(value).expect("level")
}

#[test]
fn origin_leaf() {
    let leaf = CellId::from_face_ij(Face::try_from(0).expect("face"), 0, 0);

    assert_eq!(u64::from(leaf), 0x0000000000000001);
    assert_eq!(leaf.level(), Level::MAX);
    assert!(leaf.is_leaf());
}

#[test]
fn face_five_cell() {
    let leaf = CellId::from_face_ij(
        Face::try_from(5).expect("face"),
        12345,
        54321,
    );
    let root = leaf.parent(Level::MIN).expect("parent");

    assert_eq!(u64::from(root), 0xb000000000000000);
    assert_eq!(root.to_token(), "b");
}

#[test]
fn constants() {
    assert_eq!(CellId::FACE_BITS, 3);
    assert_eq!(CellId::NUM_FACES, 6);
    assert_eq!(CellId::POS_BITS, 61);
    assert_eq!(CellId::MAX_SIZE, 1 << 30);
    assert_eq!(CellId::WRAP_OFFSET, 6 << 61);
}

#[test]
fn advance_at_level_five() {
    let begin = CellId::begin(level(5));
    let count = 6 * 4_i64.pow(5);

    let last = begin.advance(count - 1);
    assert_eq!(last, CellId::end(level(5)).prev());

    assert_eq!(last.advance(1), CellId::end(level(5)));
    assert_eq!(last.advance(12345), CellId::end(level(5)), "clamped");
}

#[test]
fn common_ancestor_level() {
    // Same face, same first two levels, divergent third level.
    let a = cell!(0x2c40000000000000);
    let b = cell!(0x2dc0000000000000);

    assert_eq!(a.common_ancestor_level(b), Level::try_from(2).ok());
    assert_eq!(b.common_ancestor_level(a), Level::try_from(2).ok());

    // Different faces.
    let c = cell!(0x5000000000000000);
    assert_eq!(a.common_ancestor_level(c), None);
}

#[test]
fn polar_face_neighbors() {
    let north = CellId::from_face(Face::try_from(2).expect("face"));
    let mut faces = north
        .edge_neighbors()
        .iter()
        .map(|cell| u8::from(cell.face()))
        .collect::<Vec<_>>();
    faces.sort_unstable();

    assert_eq!(faces, vec![0, 1, 3, 4], "every face but the south pole");
}

#[test]
fn neighbor_counts() {
    let cell = CellId::from_face_ij(
        Face::try_from(4).expect("face"),
        1 << 20,
        1 << 20,
    )
    .parent(level(10))
    .expect("cell");

    assert_eq!(cell.edge_neighbors().len(), 4);
    assert_eq!(cell.vertex_neighbors(level(9)).count(), 4);
    assert_eq!(cell.all_neighbors(level(10)).len(), 8);
}

#[test]
fn ordering_is_raw_id_order() {
    let mut cells = vec![
        cell!(0xb000000000000000),
        cell!(0x0000000000000001),
        cell!(0x5440000000000000),
        cell!(0x4000000000000001),
    ];
    cells.sort_unstable();

    let expected = vec![
        cell!(0x0000000000000001),
        cell!(0x4000000000000001),
        cell!(0x5440000000000000),
        cell!(0xb000000000000000),
    ];
    assert_eq!(cells, expected);
}

#[test]
fn debug_impl() {
    assert_eq!(format!("{:?}", cell!(0x5000000000000000)), "2/");
    assert_eq!(
        format!("{:?}", CellId::new(0xffffffffffffffff)),
        "Invalid: ffffffffffffffff"
    );
}

