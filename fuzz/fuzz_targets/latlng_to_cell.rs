#![no_main]

use libfuzzer_sys::fuzz_target;
use s2o::{CellId, LatLng};
use std::f64::consts::{FRAC_PI_2, PI};

fuzz_target!(|ll: LatLng| {
    let cell = CellId::from_latlng(ll);

    assert!(cell.is_valid());
    assert!(cell.is_leaf());

    // The distance check only makes sense for canonical coordinates.
    if ll.lat_radians().abs() <= FRAC_PI_2 && ll.lng_radians().abs() <= PI {
        let center = cell.to_latlng();
        assert!(ll.distance_rads(center) < 1e-8);
    }
});
