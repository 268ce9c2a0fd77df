//! Error types for walk operations.

use crate::weight::WeightVector;

/// Errors arising from an invalid walk request or a broken walk invariant.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Rejected before the walk starts.
    #[error("invalid input: {description}")]
    InvalidInput { description: String },

    /// No strategy could move the weight off the current point.
    #[error("walk stalled at weight {weight}")]
    Stalled { weight: WeightVector },

    /// An initial-ideal element did not reduce to zero against the initial forms.
    #[error("lift inconsistency: {description}")]
    LiftInconsistency { description: String },

    /// Fractal recursion went deeper than the configured bound.
    #[error("fractal recursion exhausted at depth {depth}")]
    RecursionExhausted { depth: usize },

    /// A weight vector left the i64 range.
    #[error("weight overflow: {description}")]
    WeightOverflow { description: String },

    /// The standard-basis oracle gave up.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl WalkError {
    pub(crate) fn invalid(description: impl Into<String>) -> Self {
        Self::InvalidInput {
            description: description.into(),
        }
    }

    /// Stable machine-readable class, used in CLI payloads.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::InvalidInput { .. } => FailureClass::InvalidInput,
            Self::Stalled { .. } => FailureClass::Stalled,
            Self::LiftInconsistency { .. } => FailureClass::LiftInconsistency,
            Self::RecursionExhausted { .. } => FailureClass::RecursionExhausted,
            Self::WeightOverflow { .. } => FailureClass::WeightOverflow,
            Self::Oracle(_) => FailureClass::Oracle,
        }
    }
}

/// Errors from a standard-basis oracle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle budget exhausted after {pairs} critical pairs")]
    BudgetExhausted { pairs: usize },

    #[error("oracle received a malformed ideal: {0}")]
    Malformed(String),
}

/// Errors parsing polynomial text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown variable `{name}`")]
    UnknownVariable { name: String },

    #[error("unexpected character `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("malformed number `{text}`")]
    Number { text: String },

    #[error("empty polynomial")]
    Empty,

    #[error("invalid ring: {0}")]
    Ring(String),
}

/// Which walk failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    InvalidInput,
    Stalled,
    LiftInconsistency,
    RecursionExhausted,
    WeightOverflow,
    Oracle,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidInput => "invalid_input",
            Self::Stalled => "stalled",
            Self::LiftInconsistency => "lift_inconsistency",
            Self::RecursionExhausted => "recursion_exhausted",
            Self::WeightOverflow => "weight_overflow",
            Self::Oracle => "oracle",
        };
        f.write_str(name)
    }
}
