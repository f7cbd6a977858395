use s2o::CellId;

macro_rules! test {
    ($name:ident, $id:literal, $token:literal) => {
        #[test]
        fn $name() {
            let cell = CellId::new($id);

            assert_eq!(cell.to_token(), $token);
            assert_eq!(CellId::from_token($token), cell);
        }
    };
}

test!(leaf_at_origin, 0x0000000000000001, "0000000000000001");
test!(face0, 0x1000000000000000, "1");
test!(face5, 0xb000000000000000, "b");
test!(level1, 0x5400000000000000, "54");
test!(level14, 0x4589000000000000, "4589");
test!(mid_level, 0x3b00f71d30000000, "3b00f71d3");
test!(none_id, 0x0000000000000000, "X");

#[test]
fn rejects_malformed() {
    assert_eq!(CellId::from_token(""), CellId::none());
    assert_eq!(CellId::from_token("not-hex"), CellId::none());
    assert_eq!(CellId::from_token("0123456789abcdef0"), CellId::none());
}

#[test]
fn case_insensitive() {
    assert_eq!(CellId::from_token("3B00F71D3"), CellId::from_token("3b00f71d3"));
}

#[test]
fn parse_and_display() {
    let cell: CellId = "3b00f71d3".parse().expect("token");

    assert_eq!(cell.to_string(), "3b00f71d3");
    assert!("zzz".parse::<CellId>().is_err());
}
