//! Field order of a persisted GIS model
//!
//! The format has no framing besides position: every count precedes the
//! payload it bounds. [`MODEL_LAYOUT`] is the one place that order is written
//! down; the writer and the reader are both visitors of [`walk`].

use crate::Result;
use std::fmt;

/// The primitive kind a field is encoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Token,
    Int,
    Double,
}

/// A logical field of the persisted model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CorrectionConstant,
    CorrectionParameter,
    OutcomeCount,
    OutcomeLabel,
    PredicateCount,
    PredicateLabel,
    ActiveOutcomeCount,
    OutcomeId,
    Weight,
}

impl Field {
    pub fn kind(self) -> Kind {
        match self {
            Field::OutcomeLabel | Field::PredicateLabel => Kind::Token,
            Field::CorrectionParameter | Field::Weight => Kind::Double,
            Field::CorrectionConstant
            | Field::OutcomeCount
            | Field::PredicateCount
            | Field::ActiveOutcomeCount
            | Field::OutcomeId => Kind::Int,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::CorrectionConstant => "correction constant",
            Field::CorrectionParameter => "correction parameter",
            Field::OutcomeCount => "outcome count",
            Field::OutcomeLabel => "outcome label",
            Field::PredicateCount => "predicate count",
            Field::PredicateLabel => "predicate label",
            Field::ActiveOutcomeCount => "active outcome count",
            Field::OutcomeId => "outcome id",
            Field::Weight => "weight",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One element of the layout: a single field, or a count followed by that
/// many repetitions of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Field(Field),
    Repeat {
        count: Field,
        body: &'static [Step],
    },
}

/// Canonical field order shared by every encoder and decoder
pub const MODEL_LAYOUT: &[Step] = &[
    Step::Field(Field::CorrectionConstant),
    Step::Field(Field::CorrectionParameter),
    Step::Repeat {
        count: Field::OutcomeCount,
        body: &[Step::Field(Field::OutcomeLabel)],
    },
    Step::Repeat {
        count: Field::PredicateCount,
        body: &[
            Step::Field(Field::PredicateLabel),
            Step::Repeat {
                count: Field::ActiveOutcomeCount,
                body: &[Step::Field(Field::OutcomeId), Step::Field(Field::Weight)],
            },
        ],
    },
];

/// Receives the fields of [`MODEL_LAYOUT`] in order
///
/// `index` holds the repetition index of every enclosing `Repeat`, outermost
/// first: an outcome label sees `[o]`, a weight sees `[p, k]`.
pub(crate) trait LayoutVisitor {
    fn field(&mut self, field: Field, index: &[usize]) -> Result<()>;

    /// Handle a count field and return the number of repetitions that follow
    fn count(&mut self, field: Field, index: &[usize]) -> Result<usize>;
}

/// Drive `visitor` through `steps` in order
pub(crate) fn walk<V: LayoutVisitor>(steps: &[Step], visitor: &mut V) -> Result<()> {
    let mut index = Vec::with_capacity(2);
    walk_steps(steps, visitor, &mut index)
}

fn walk_steps<V: LayoutVisitor>(
    steps: &[Step],
    visitor: &mut V,
    index: &mut Vec<usize>,
) -> Result<()> {
    for step in steps {
        match *step {
            Step::Field(field) => visitor.field(field, index)?,
            Step::Repeat { count, body } => {
                let n = visitor.count(count, index)?;
                for i in 0..n {
                    index.push(i);
                    let result = walk_steps(body, visitor, index);
                    index.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}
