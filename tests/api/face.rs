use s2o::Face;

#[test]
fn try_from() {
    for value in 0..6 {
        assert!(Face::try_from(value).is_ok());
    }
    assert!(Face::try_from(6).is_err());
}

#[test]
fn iter() {
    let faces = Face::iter().map(u8::from).collect::<Vec<_>>();

    assert_eq!(faces, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn display() {
    let face = Face::try_from(3).expect("face");

    assert_eq!(face.to_string(), "3");
}
