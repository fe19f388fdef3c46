#![no_main]

use libfuzzer_sys::fuzz_target;
use maxent_persist::io::{read_model, to_text, PlainTextModelReader};
use std::io::Cursor;

/// Fuzz target for the plain-text decoder
///
/// Arbitrary bytes must decode to a model or fail with an error, never panic.
/// Any model that decodes and re-encodes must decode to itself.
fuzz_target!(|data: &[u8]| {
    let Ok(model) = read_model(PlainTextModelReader::new(Cursor::new(data))) else {
        return;
    };

    // A lone '\r' inside a line decodes but is refused by the encoder
    let Ok(text) = to_text(&model) else {
        return;
    };
    let again = maxent_persist::io::from_text(&text).expect("encoded model must decode");
    assert_eq!(model, again);
});
