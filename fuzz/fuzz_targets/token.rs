#![no_main]

use libfuzzer_sys::fuzz_target;
use s2o::CellId;

fuzz_target!(|token: &str| {
    // Never panics, whatever the input.
    let cell = CellId::from_token(token);

    if cell != CellId::none() {
        // Anything that decodes re-encodes to the same (case-normalized)
        // token, modulo stripped zero digits.
        let canonical = cell.to_token();
        assert_eq!(CellId::from_token(&canonical), cell);
    }
});
