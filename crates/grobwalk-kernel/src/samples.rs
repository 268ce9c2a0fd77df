//! Named toy problems, all walking from the degree order to lex.
//!
//! - **intro**: `x^2 + y^3 - 1, xy - 2`. Three steps, one binomial crossing
//!   per facet.
//! - **twisted_cubic**: the parametrised curve `(t, t^2, t^3)`.
//! - **cyclic3**: cyclic 3-roots; the lex basis is triangular.
//! - **circle_line**: unit circle cut by the diagonal. A linear generator
//!   has a non-monomial initial form at the start weight.

use crate::config::{WalkParams, WalkProblem};
use crate::oracle::BuchbergerConfig;
use crate::weight::WeightVector;

const NAMES: [&str; 4] = ["intro", "twisted_cubic", "cyclic3", "circle_line"];

pub fn sample_names() -> &'static [&'static str] {
    &NAMES
}

/// Get a sample problem by name.
pub fn sample(name: &str) -> Option<WalkProblem> {
    match name {
        "intro" => Some(problem(&["x", "y"], &["x^2 + y^3 - 1", "x*y - 2"])),
        "twisted_cubic" => Some(problem(&["x", "y", "z"], &["y - x^2", "z - x^3"])),
        "cyclic3" => Some(problem(
            &["x", "y", "z"],
            &["x + y + z", "x*y + y*z + z*x", "x*y*z - 1"],
        )),
        "circle_line" => Some(problem(&["x", "y"], &["x^2 + y^2 - 1", "x - y"])),
        _ => None,
    }
}

fn problem(variables: &[&str], generators: &[&str]) -> WalkProblem {
    let n = variables.len();
    WalkProblem {
        variables: variables.iter().map(|v| v.to_string()).collect(),
        generators: generators.iter().map(|g| g.to_string()).collect(),
        start: WeightVector::ones(n),
        target: WeightVector::lex(n),
        walk: WalkParams::default(),
        oracle: BuchbergerConfig::default(),
    }
}
