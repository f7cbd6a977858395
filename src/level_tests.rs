use super::*;
use float_eq::assert_float_eq;

#[test]
fn try_from() {
    assert!(Level::try_from(0).is_ok());
    assert!(Level::try_from(30).is_ok());
    assert!(Level::try_from(31).is_err(), "level out of range");
}

#[test]
fn succ_pred() {
    let level = Level::try_from(15).expect("level");

    assert_eq!(level.succ(), Level::try_from(16).ok());
    assert_eq!(level.pred(), Level::try_from(14).ok());
    assert!(Level::MAX.succ().is_none(), "no level below the leaves");
    assert!(Level::MIN.pred().is_none(), "no level above the faces");
}

#[test]
fn range() {
    let levels = Level::range(Level::MIN, Level::MAX).collect::<Vec<_>>();

    assert_eq!(levels.len(), 31);
    assert_eq!(levels.first(), Some(&Level::MIN));
    assert_eq!(levels.last(), Some(&Level::MAX));

    let reversed = Level::range(Level::MIN, Level::MAX)
        .rev()
        .collect::<Vec<_>>();
    assert_eq!(reversed.first(), Some(&Level::MAX));
}

#[test]
fn size_ij() {
    assert_eq!(Level::MIN.size_ij(), 1 << 30);
    assert_eq!(Level::MAX.size_ij(), 1);
    assert_eq!(Level::try_from(15).expect("level").size_ij(), 1 << 15);
}

#[test]
fn size_st() {
    assert_float_eq!(Level::MIN.size_st(), 1., abs <= f64::EPSILON);
    assert_float_eq!(
        Level::MAX.size_st(),
        1. / f64::from(1 << 30),
        abs <= f64::EPSILON
    );
}

#[test]
fn cell_count() {
    assert_eq!(Level::MIN.cell_count(), 6);
    assert_eq!(Level::try_from(1).expect("level").cell_count(), 24);
    assert_eq!(Level::try_from(5).expect("level").cell_count(), 6 * 1024);
    assert_eq!(Level::MAX.cell_count(), 6 << 60);
}

#[test]
fn display() {
    assert_eq!(Level::MIN.to_string(), "0");
    assert_eq!(Level::MAX.to_string(), "30");
}
