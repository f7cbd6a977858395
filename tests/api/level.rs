use s2o::Level;

#[test]
fn bounds() {
    assert_eq!(u8::from(Level::MIN), 0);
    assert_eq!(u8::from(Level::MAX), 30);
    assert!(Level::try_from(31).is_err());
}

#[test]
fn metrics() {
    let level = Level::try_from(10).expect("level");

    assert_eq!(level.size_ij(), 1 << 20);
    assert_eq!(level.cell_count(), 6 << 20);
}

#[test]
fn navigation() {
    let level = Level::try_from(10).expect("level");

    assert_eq!(level.succ(), Level::try_from(11).ok());
    assert_eq!(level.pred(), Level::try_from(9).ok());

    let all = Level::range(Level::MIN, Level::MAX).count();
    assert_eq!(all, 31);
}
