//! # Grobwalk Kernel
//!
//! Gröbner walks: convert a Gröbner basis under one monomial order into the
//! basis of the same ideal under another by crossing the Gröbner fan one
//! cone at a time. Each crossing only needs a basis of an initial ideal,
//! which is far cheaper than starting over under the target order.
//!
//! Every walk variant is one [`WalkEngine`] with different strategies
//! plugged in; the named entry points live in [`walk`].
//!
//! ## Architecture
//!
//! ```text
//! Monomial / WeightVector   ← Exponents and integer weights
//!     │
//! MonomialOrder             ← Weight rows with a lex tie-break
//!     │
//! Polynomial / Ideal        ← Exact rational arithmetic, division
//!     │
//! StandardBasis             ← The oracle seam (Buchberger reference)
//!     │
//! GroebnerCone              ← Facets, dimension, membership
//!     │
//! next_weight / perturb     ← Where to step next
//!     │
//! initial / lift            ← Crossing a facet
//!     │
//! WalkFrame                 ← One walk as a resumable state machine
//!     │
//! WalkEngine / FractalWalk  ← Rounds, stalls, recursion
//! ```

pub mod config;
pub mod cone;
pub mod engine;
pub mod error;
pub mod fractal;
pub mod frame;
pub mod ideal;
pub mod initial;
pub mod lift;
pub mod monomial;
pub mod next_weight;
pub mod oracle;
pub mod order;
pub mod perturb;
pub mod poly;
pub mod random;
pub mod report;
pub mod samples;
pub mod walk;
pub mod weight;

pub use cone::{GroebnerCone, PolyhedralCone};
pub use config::{ConfigError, SolveError, WalkParams, WalkProblem};
pub use engine::{Recursion, TargetSchedule, WalkEngine, WalkOutcome};
pub use error::{FailureClass, OracleError, ParseError, WalkError};
pub use fractal::FractalWalk;
pub use frame::{FrameEvent, InitialRequest, WalkFrame};
pub use ideal::Ideal;
pub use lift::{BasisLift, GeneralLift, MinimalLift};
pub use monomial::Monomial;
pub use next_weight::{DeterministicStep, InterreducedStep, WeightStep, next_weight};
pub use oracle::{Buchberger, BuchbergerConfig, StandardBasis};
pub use order::{MonomialOrder, OrderKind};
pub use poly::{Polynomial, Ring};
pub use random::RandomStep;
pub use report::{StepRecord, Variant, WalkReport};
pub use walk::{
    maltwalk1, maltwalk2, mfrwalk, mfwalk, mpwalk, mrwalk, mwalk, run_variant, tran_mimprovwalk,
    tran_mr_improvwalk,
};
pub use weight::WeightVector;
