//! Model persistence: drives a codec through the model layout

use super::codec::{ModelDecoder, ModelEncoder};
use super::format::SaveConfig;
use super::layout::{walk, Field, Kind, LayoutVisitor, MODEL_LAYOUT};
use super::model::{ActiveOutcome, GisModel};
use super::plain_text::{PlainTextModelReader, PlainTextModelWriter};
use super::transport::{open_source, Compression, FileSink};
use crate::error::{Error, MalformedError, Result};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Upper bound on capacity reserved from a count read off the stream
const MAX_PREALLOCATION: usize = 1 << 16;

/// Write `model` through `encoder`, then close it
///
/// The encoder is closed on every path; an encoding error takes precedence
/// over a close error.
pub fn write_model<E: ModelEncoder>(model: &GisModel, mut encoder: E) -> Result<()> {
    let result = walk(
        MODEL_LAYOUT,
        &mut ModelWriter {
            model,
            encoder: &mut encoder,
        },
    );
    let closed = encoder.close();
    result.and(closed)
}

/// Read a model from `decoder`, then close it
pub fn read_model<D: ModelDecoder>(mut decoder: D) -> Result<GisModel> {
    let result = {
        let mut reader = ModelReader::new(&mut decoder);
        walk(MODEL_LAYOUT, &mut reader).and_then(|()| reader.into_model())
    };
    let closed = decoder.close();
    let model = result?;
    closed?;
    Ok(model)
}

/// Save a model to `path` in plain text, compressed per `config` or suffix
///
/// # Example
///
/// ```no_run
/// use maxent_persist::io::{save_model, ActiveOutcome, GisModel, SaveConfig};
///
/// let model = GisModel::new(
///     5,
///     0.25,
///     vec!["yes".into(), "no".into()],
///     vec!["word=the".into()],
///     vec![vec![ActiveOutcome::new(0, 1.386294)]],
/// )
/// .unwrap();
///
/// save_model(&model, "model.txt.gz", &SaveConfig::default()).unwrap();
/// ```
pub fn save_model(model: &GisModel, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();
    let compression = config.compression_for(path);
    config.validate(compression)?;

    debug!(
        path = %path.display(),
        ?compression,
        outcomes = model.num_outcomes(),
        predicates = model.num_predicates(),
        "saving GIS model"
    );

    let sink = FileSink::create(path, compression, config.level)?;
    write_model(model, PlainTextModelWriter::new(sink))?;

    debug!(path = %path.display(), "saved GIS model");
    Ok(())
}

/// Load a model from `path`, detecting compression from the suffix
///
/// # Example
///
/// ```no_run
/// use maxent_persist::io::load_model;
///
/// let model = load_model("model.txt.gz").unwrap();
/// println!("{} outcomes", model.num_outcomes());
/// ```
pub fn load_model(path: impl AsRef<Path>) -> Result<GisModel> {
    let path = path.as_ref();
    load_model_with(path, Compression::from_path(path))
}

/// Load a model from `path` with an explicit compression
pub fn load_model_with(path: impl AsRef<Path>, compression: Compression) -> Result<GisModel> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?compression, "loading GIS model");

    let model = read_model(PlainTextModelReader::new(open_source(path, compression)?))?;

    debug!(
        path = %path.display(),
        outcomes = model.num_outcomes(),
        predicates = model.num_predicates(),
        parameters = model.num_active_parameters(),
        "loaded GIS model"
    );
    Ok(model)
}

/// Encode a model to its plain-text form in memory
pub fn to_text(model: &GisModel) -> Result<String> {
    let mut buf = Vec::new();
    write_model(model, PlainTextModelWriter::new(&mut buf))?;
    String::from_utf8(buf).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Decode a model from its plain-text form
pub fn from_text(text: &str) -> Result<GisModel> {
    read_model(PlainTextModelReader::new(Cursor::new(text.as_bytes())))
}

enum Value<'a> {
    Token(&'a str),
    Int(i64),
    Double(f64),
}

impl Value<'_> {
    fn kind(&self) -> Kind {
        match self {
            Value::Token(_) => Kind::Token,
            Value::Int(_) => Kind::Int,
            Value::Double(_) => Kind::Double,
        }
    }
}

struct ModelWriter<'a, E> {
    model: &'a GisModel,
    encoder: &'a mut E,
}

impl<E: ModelEncoder> LayoutVisitor for ModelWriter<'_, E> {
    fn field(&mut self, field: Field, index: &[usize]) -> Result<()> {
        let model = self.model;
        let value = match (field, index) {
            (Field::CorrectionConstant, []) => Value::Int(model.correction_constant()),
            (Field::CorrectionParameter, []) => Value::Double(model.correction_parameter()),
            (Field::OutcomeLabel, [o]) => Value::Token(&model.outcome_labels()[*o]),
            (Field::PredicateLabel, [p]) => Value::Token(&model.predicate_labels()[*p]),
            (Field::OutcomeId, [p, k]) => Value::Int(model.parameters()[*p][*k].outcome as i64),
            (Field::Weight, [p, k]) => Value::Double(model.parameters()[*p][*k].weight),
            _ => unreachable!("{field} at {index:?} is not in the model layout"),
        };
        debug_assert_eq!(value.kind(), field.kind());

        match value {
            Value::Token(s) => self.encoder.write_token(s),
            Value::Int(i) => self.encoder.write_int(i),
            Value::Double(d) => self.encoder.write_double(d),
        }
    }

    fn count(&mut self, field: Field, index: &[usize]) -> Result<usize> {
        let n = match (field, index) {
            (Field::OutcomeCount, []) => self.model.num_outcomes(),
            (Field::PredicateCount, []) => self.model.num_predicates(),
            (Field::ActiveOutcomeCount, [p]) => self.model.parameters()[*p].len(),
            _ => unreachable!("{field} at {index:?} is not a count in the model layout"),
        };
        self.encoder.write_int(n as i64)?;
        Ok(n)
    }
}

/// Accumulates decoded fields; counts are remembered to report truncation
struct ModelReader<'a, D> {
    decoder: &'a mut D,
    correction_constant: i64,
    correction_parameter: f64,
    outcome_count: usize,
    outcome_labels: Vec<String>,
    predicate_count: usize,
    predicate_labels: Vec<String>,
    active_count: usize,
    parameters: Vec<Vec<ActiveOutcome>>,
    pending_outcome: usize,
}

impl<'a, D: ModelDecoder> ModelReader<'a, D> {
    fn new(decoder: &'a mut D) -> Self {
        Self {
            decoder,
            correction_constant: 0,
            correction_parameter: 0.0,
            outcome_count: 0,
            outcome_labels: Vec::new(),
            predicate_count: 0,
            predicate_labels: Vec::new(),
            active_count: 0,
            parameters: Vec::new(),
            pending_outcome: 0,
        }
    }

    fn read_field(&mut self, field: Field, index: &[usize]) -> Result<()> {
        match field {
            Field::CorrectionConstant => {
                self.correction_constant = self.decoder.read_int()?;
            }
            Field::CorrectionParameter => {
                self.correction_parameter = self.decoder.read_double()?;
            }
            Field::OutcomeLabel => {
                let label = self.decoder.read_token()?;
                self.outcome_labels.push(label);
            }
            Field::PredicateLabel => {
                let label = self.decoder.read_token()?;
                self.predicate_labels.push(label);
                self.parameters.push(Vec::new());
            }
            Field::OutcomeId => {
                let id = self.decoder.read_int()?;
                self.pending_outcome = usize::try_from(id)
                    .ok()
                    .filter(|&o| o < self.outcome_count)
                    .ok_or(MalformedError::OutcomeOutOfRange {
                        line: self.decoder.position(),
                        id,
                        outcomes: self.outcome_count,
                    })?;
            }
            Field::Weight => {
                let weight = self.decoder.read_double()?;
                self.parameters[index[0]].push(ActiveOutcome::new(self.pending_outcome, weight));
            }
            _ => unreachable!("{field} is not a scalar in the model layout"),
        }
        Ok(())
    }

    fn read_count(&mut self, field: Field, index: &[usize]) -> Result<usize> {
        let value = self.decoder.read_int()?;
        let n = usize::try_from(value).map_err(|_| MalformedError::NegativeCount {
            line: self.decoder.position(),
            field,
            value,
        })?;
        let reserve = n.min(MAX_PREALLOCATION);

        match field {
            Field::OutcomeCount => {
                self.outcome_count = n;
                self.outcome_labels.reserve(reserve);
            }
            Field::PredicateCount => {
                self.predicate_count = n;
                self.predicate_labels.reserve(reserve);
                self.parameters.reserve(reserve);
            }
            Field::ActiveOutcomeCount => {
                self.active_count = n;
                self.parameters[index[0]].reserve(reserve);
            }
            _ => unreachable!("{field} is not a count in the model layout"),
        }
        Ok(n)
    }

    /// Replace a bare end-of-stream with the count it cut short
    fn truncated(&self, field: Field, index: &[usize], err: Error) -> Error {
        if !matches!(err, Error::Malformed(MalformedError::UnexpectedEof { .. })) {
            return err;
        }
        let malformed = match (field, index) {
            (Field::OutcomeLabel, [o]) => MalformedError::TruncatedOutcomes {
                expected: self.outcome_count,
                found: *o,
            },
            (Field::PredicateLabel | Field::ActiveOutcomeCount, [p]) => {
                MalformedError::TruncatedPredicates {
                    expected: self.predicate_count,
                    found: *p,
                }
            }
            (Field::OutcomeId | Field::Weight, [p, k]) => MalformedError::TruncatedParameters {
                predicate: self.predicate_labels[*p].clone(),
                expected: self.active_count,
                found: *k,
            },
            _ => MalformedError::MissingField { field },
        };
        malformed.into()
    }

    fn into_model(self) -> Result<GisModel> {
        GisModel::new(
            self.correction_constant,
            self.correction_parameter,
            self.outcome_labels,
            self.predicate_labels,
            self.parameters,
        )
        .map_err(|e| match e {
            Error::InvalidModel(invariant) => MalformedError::Invariant(invariant).into(),
            other => other,
        })
    }
}

impl<D: ModelDecoder> LayoutVisitor for ModelReader<'_, D> {
    fn field(&mut self, field: Field, index: &[usize]) -> Result<()> {
        self.read_field(field, index)
            .map_err(|e| self.truncated(field, index, e))
    }

    fn count(&mut self, field: Field, index: &[usize]) -> Result<usize> {
        self.read_count(field, index)
            .map_err(|e| self.truncated(field, index, e))
    }
}
