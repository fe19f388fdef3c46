//! GIS model structure for persistence

use crate::error::{ModelInvariant, Result};
use std::collections::HashSet;

/// One stored weight of a predicate: the outcome it votes for and how strongly
#[derive(Debug, Clone, Copy)]
pub struct ActiveOutcome {
    /// Index into the model's outcome labels
    pub outcome: usize,

    /// Trained parameter weight
    pub weight: f64,
}

impl ActiveOutcome {
    pub fn new(outcome: usize, weight: f64) -> Self {
        Self { outcome, weight }
    }
}

impl PartialEq for ActiveOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.outcome == other.outcome && same_value(self.weight, other.weight)
    }
}

/// Equality as persisted: bit-identical, with every NaN equal to every other
///
/// The text form writes all NaNs as `NaN`, so payload bits do not survive.
fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/// A trained maximum-entropy model as produced by Generalized Iterative Scaling
///
/// Outcome ids and predicate ids are positions in `outcome_labels` and
/// `predicate_labels`. `parameters[p]` lists the active outcomes of predicate
/// `p` in the order the trainer produced them.
///
/// Two models are equal when they persist to the same text: weights and the
/// correction parameter compare by bits, and NaN equals NaN.
#[derive(Debug, Clone)]
pub struct GisModel {
    correction_constant: i64,
    correction_parameter: f64,
    outcome_labels: Vec<String>,
    predicate_labels: Vec<String>,
    parameters: Vec<Vec<ActiveOutcome>>,
}

impl GisModel {
    /// Create a model, checking label uniqueness and outcome references
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`](crate::Error::InvalidModel) if a label
    /// is duplicated, a parameter references an unknown outcome, or the
    /// parameter table count differs from the predicate count.
    pub fn new(
        correction_constant: i64,
        correction_parameter: f64,
        outcome_labels: Vec<String>,
        predicate_labels: Vec<String>,
        parameters: Vec<Vec<ActiveOutcome>>,
    ) -> Result<Self> {
        check_model(&outcome_labels, &predicate_labels, &parameters)?;
        Ok(Self {
            correction_constant,
            correction_parameter,
            outcome_labels,
            predicate_labels,
            parameters,
        })
    }

    /// Upper bound on active features per event used during training
    pub fn correction_constant(&self) -> i64 {
        self.correction_constant
    }

    pub fn correction_parameter(&self) -> f64 {
        self.correction_parameter
    }

    pub fn outcome_labels(&self) -> &[String] {
        &self.outcome_labels
    }

    pub fn predicate_labels(&self) -> &[String] {
        &self.predicate_labels
    }

    /// Per-predicate active outcome tables, indexed by predicate id
    pub fn parameters(&self) -> &[Vec<ActiveOutcome>] {
        &self.parameters
    }

    pub fn num_outcomes(&self) -> usize {
        self.outcome_labels.len()
    }

    pub fn num_predicates(&self) -> usize {
        self.predicate_labels.len()
    }

    /// Total number of stored (outcome, weight) pairs across all predicates
    pub fn num_active_parameters(&self) -> usize {
        self.parameters.iter().map(Vec::len).sum()
    }

    pub fn outcome_index(&self, label: &str) -> Option<usize> {
        self.outcome_labels.iter().position(|l| l == label)
    }

    pub fn predicate_index(&self, label: &str) -> Option<usize> {
        self.predicate_labels.iter().position(|l| l == label)
    }

    /// Active outcomes of the predicate with the given label
    pub fn predicate_parameters(&self, label: &str) -> Option<&[ActiveOutcome]> {
        self.predicate_index(label)
            .map(|p| self.parameters[p].as_slice())
    }

    /// Decompose into `(constant, parameter, outcomes, predicates, parameters)`
    pub fn into_parts(self) -> (i64, f64, Vec<String>, Vec<String>, Vec<Vec<ActiveOutcome>>) {
        (
            self.correction_constant,
            self.correction_parameter,
            self.outcome_labels,
            self.predicate_labels,
            self.parameters,
        )
    }
}

impl PartialEq for GisModel {
    fn eq(&self, other: &Self) -> bool {
        self.correction_constant == other.correction_constant
            && same_value(self.correction_parameter, other.correction_parameter)
            && self.outcome_labels == other.outcome_labels
            && self.predicate_labels == other.predicate_labels
            && self.parameters == other.parameters
    }
}

fn check_model(
    outcome_labels: &[String],
    predicate_labels: &[String],
    parameters: &[Vec<ActiveOutcome>],
) -> std::result::Result<(), ModelInvariant> {
    check_unique("outcome", outcome_labels)?;
    check_unique("predicate", predicate_labels)?;

    if parameters.len() != predicate_labels.len() {
        return Err(ModelInvariant::ParameterTableMismatch {
            predicates: predicate_labels.len(),
            tables: parameters.len(),
        });
    }

    for (label, table) in predicate_labels.iter().zip(parameters) {
        if let Some(bad) = table.iter().find(|a| a.outcome >= outcome_labels.len()) {
            return Err(ModelInvariant::OutcomeOutOfRange {
                predicate: label.clone(),
                id: bad.outcome,
                outcomes: outcome_labels.len(),
            });
        }
    }

    Ok(())
}

fn check_unique(kind: &'static str, labels: &[String]) -> std::result::Result<(), ModelInvariant> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(ModelInvariant::DuplicateLabel {
                kind,
                label: label.clone(),
            });
        }
    }
    Ok(())
}
