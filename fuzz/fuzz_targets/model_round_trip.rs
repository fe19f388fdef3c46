#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use maxent_persist::io::{from_text, to_text, ActiveOutcome, GisModel};

/// Fuzz target for encode/decode of generated models
#[derive(Arbitrary, Debug)]
struct FuzzModel {
    correction_constant: i64,
    correction_parameter: f64,
    outcomes: Vec<String>,
    predicates: Vec<(String, Vec<(u8, f64)>)>,
}

fuzz_target!(|input: FuzzModel| {
    let outcomes = input.outcomes;
    let n = outcomes.len();

    let mut labels = Vec::new();
    let mut tables = Vec::new();
    for (label, pairs) in input.predicates {
        let table: Vec<ActiveOutcome> = pairs
            .into_iter()
            .filter(|(o, _)| (*o as usize) < n)
            .map(|(o, w)| ActiveOutcome::new(o as usize, w))
            .collect();
        labels.push(label);
        tables.push(table);
    }

    // Duplicate labels are rejected up front
    let Ok(model) = GisModel::new(
        input.correction_constant,
        input.correction_parameter,
        outcomes,
        labels,
        tables,
    ) else {
        return;
    };

    // Labels with line terminators are rejected at write time
    let Ok(text) = to_text(&model) else {
        return;
    };
    assert_eq!(from_text(&text).expect("encoded model must decode"), model);
});
