use s2o::{CellId, LatLng, Level};

#[test]
fn to_cell() {
    let ll = LatLng::new(48.864716, 2.349014).expect("ll");
    let level = Level::try_from(8).expect("level");

    let cell = ll.to_cell(level);
    assert_eq!(cell.level(), level);

    let leaf = CellId::from_latlng(ll);
    assert_eq!(leaf.parent(level), Some(cell));
}

#[test]
fn leaf_center_accuracy() {
    let cases = [
        (0., 0.),
        (45., 45.),
        (-89.9, 179.9),
        (66.5622, 25.8461),
        (-33.8688, 151.2093),
    ];

    for (lat, lng) in cases {
        let ll = LatLng::new(lat, lng).expect("ll");
        let center = CellId::from_latlng(ll).to_latlng();

        assert!(
            ll.distance_rads(center) < 1e-8,
            "({lat}, {lng}) not within a leaf diagonal of its cell center"
        );
    }
}

#[test]
fn invalid_input() {
    assert!(LatLng::new(f64::NAN, 0.).is_err());
    assert!(LatLng::new(0., f64::NEG_INFINITY).is_err());
}
