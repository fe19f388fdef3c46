//! Error types for maxent-persist

use thiserror::Error;

use crate::io::Field;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model: {0}")]
    Malformed(#[from] MalformedError),

    #[error("Invalid model: {0}")]
    InvalidModel(#[from] ModelInvariant),

    #[error("Token cannot be encoded on a single line: {0:?}")]
    UnencodableToken(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Structural failures found while decoding a persisted model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedError {
    #[error("unexpected end of stream at line {line}")]
    UnexpectedEof { line: usize },

    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("stream ended before {field}")]
    MissingField { field: Field },

    #[error("line {line}: {token:?} is not a valid integer")]
    InvalidInt { line: usize, token: String },

    #[error("line {line}: {token:?} is not a valid floating-point value")]
    InvalidDouble { line: usize, token: String },

    #[error("line {line}: {field} must be non-negative, got {value}")]
    NegativeCount { line: usize, field: Field, value: i64 },

    #[error("line {line}: outcome id {id} is out of range for {outcomes} outcomes")]
    OutcomeOutOfRange { line: usize, id: i64, outcomes: usize },

    #[error("expected {expected} outcome labels, found {found}")]
    TruncatedOutcomes { expected: usize, found: usize },

    #[error("expected {expected} predicates, found {found}")]
    TruncatedPredicates { expected: usize, found: usize },

    #[error("expected {expected} active-outcome entries for predicate {predicate:?}, found {found}")]
    TruncatedParameters {
        predicate: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Invariant(#[from] ModelInvariant),
}

/// Invariants every [`GisModel`](crate::GisModel) upholds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelInvariant {
    #[error("duplicate {kind} label {label:?}")]
    DuplicateLabel { kind: &'static str, label: String },

    #[error("predicate {predicate:?} references outcome {id}, but only {outcomes} outcomes exist")]
    OutcomeOutOfRange {
        predicate: String,
        id: usize,
        outcomes: usize,
    },

    #[error("{predicates} predicate labels but {tables} parameter tables")]
    ParameterTableMismatch { predicates: usize, tables: usize },
}

impl Error {
    /// True for structural/content failures, false for transport failures
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
