//! Integration tests for GIS model persistence

use maxent_persist::io::{
    load_model, read_model, save_model, write_model, ActiveOutcome, Compression, GisModel,
    PlainTextModelReader, PlainTextModelWriter, SaveConfig,
};
use maxent_persist::{Error, MalformedError};
use std::io::Cursor;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn scenario_model() -> GisModel {
    GisModel::new(
        5,
        0.25,
        labels(&["yes", "no"]),
        labels(&["word=the"]),
        vec![vec![ActiveOutcome::new(0, 1.386294)]],
    )
    .unwrap()
}

#[test]
fn test_scenario_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.txt");

    save_model(&scenario_model(), &path, &SaveConfig::default()).unwrap();

    let lines: Vec<String> = std::fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(
        lines,
        labels(&["5", "0.25", "2", "yes", "no", "1", "word=the", "1", "0", "1.386294"])
    );

    let loaded = load_model(&path).unwrap();
    assert_eq!(loaded, scenario_model());
}

#[test]
fn test_generic_codec_over_in_memory_buffers() {
    let mut buf = Vec::new();
    write_model(&scenario_model(), PlainTextModelWriter::new(&mut buf)).unwrap();

    let loaded = read_model(PlainTextModelReader::new(Cursor::new(buf))).unwrap();
    assert_eq!(loaded, scenario_model());
}

#[test]
fn test_boundary_models_round_trip_through_every_transport() {
    let models = vec![
        GisModel::new(0, 0.0, vec![], vec![], vec![]).unwrap(),
        GisModel::new(1, 1.0, labels(&["only"]), vec![], vec![]).unwrap(),
        GisModel::new(
            3,
            0.5,
            labels(&["a", "b"]),
            labels(&["p", "q"]),
            vec![vec![], vec![]],
        )
        .unwrap(),
    ];

    let dir = tempfile::tempdir().unwrap();
    for (i, model) in models.iter().enumerate() {
        for suffix in ["txt", "txt.gz", "txt.zst"] {
            let path = dir.path().join(format!("m{i}.{suffix}"));
            save_model(model, &path, &SaveConfig::default()).unwrap();
            assert_eq!(&load_model(&path).unwrap(), model, "{}", path.display());
        }
    }
}

#[test]
fn test_unicode_labels_round_trip() {
    let model = GisModel::new(
        2,
        0.125,
        labels(&["positivo", "négatif", "中性"]),
        labels(&["w=café", "w=🙂", "w= spaced "]),
        vec![
            vec![ActiveOutcome::new(1, 0.5)],
            vec![ActiveOutcome::new(2, -0.5)],
            vec![ActiveOutcome::new(0, 3.0)],
        ],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unicode.txt.gz");
    save_model(&model, &path, &SaveConfig::default()).unwrap();
    assert_eq!(load_model(&path).unwrap(), model);
}

#[test]
fn test_truncated_stream_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.txt");
    std::fs::write(&path, "5\n0.25\n3\nyes\nno\n").unwrap();

    match load_model(&path) {
        Err(Error::Malformed(MalformedError::TruncatedOutcomes { expected, found })) => {
            assert_eq!(expected, 3);
            assert_eq!(found, 2);
        }
        other => panic!("expected truncated outcomes, got {other:?}"),
    }
}

#[test]
fn test_multiline_label_rejected_at_write_time() {
    let model = GisModel::new(1, 0.0, labels(&["ok"]), labels(&["bad\nlabel"]), vec![vec![]])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    let result = save_model(&model, &path, &SaveConfig::default());
    assert!(matches!(result, Err(Error::UnencodableToken(_))));
}

#[test]
fn test_convert_between_compressions() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("model.txt");
    let zstd = dir.path().join("model.zst");

    save_model(&scenario_model(), &plain, &SaveConfig::default()).unwrap();
    let model = load_model(&plain).unwrap();
    save_model(
        &model,
        &zstd,
        &SaveConfig::new().with_compression(Compression::Zstd).with_level(3),
    )
    .unwrap();

    assert_eq!(load_model(&zstd).unwrap(), scenario_model());
    assert_ne!(std::fs::read(&plain).unwrap(), std::fs::read(&zstd).unwrap());
}

#[test]
fn test_invalid_utf8_label_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.txt");
    std::fs::write(&path, b"1\n0.5\n1\n\xff\xfe\n0\n").unwrap();

    let err = load_model(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(matches!(
        err,
        Error::Malformed(MalformedError::InvalidUtf8 { line: 4 })
    ));
}
