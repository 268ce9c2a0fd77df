//! Walk problems as files.
//!
//! A problem is a ring, generators, start and target weights, and optional
//! `[walk]` and `[oracle]` tables. TOML and JSON are both accepted; the
//! format is picked from the file extension.
//!
//! ```toml
//! variables = ["x", "y"]
//! generators = ["x^2 + y^3 - 1", "x*y - 2"]
//! start = [1, 1]
//! target = [1, 0]
//!
//! [walk]
//! variant = "fractal"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::WalkOutcome;
use crate::error::{ParseError, WalkError};
use crate::ideal::Ideal;
use crate::oracle::{Buchberger, BuchbergerConfig};
use crate::poly::Ring;
use crate::report::Variant;
use crate::walk::run_variant;
use crate::weight::WeightVector;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Polynomial(#[from] ParseError),

    #[error("contract violation: {0}")]
    Contract(String),
}

/// Strategy parameters shared by every variant.
///
/// A missing degree means the number of variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WalkParams {
    pub variant: Variant,
    pub start_degree: Option<usize>,
    pub target_degree: Option<usize>,
    pub perturbation_vars: Option<usize>,
    pub weight_radius: u32,
    pub seed: u64,
    pub max_depth: Option<usize>,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            variant: Variant::Plain,
            start_degree: None,
            target_degree: None,
            perturbation_vars: None,
            weight_radius: 5,
            seed: 0,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WalkProblem {
    pub variables: Vec<String>,
    pub generators: Vec<String>,
    pub start: WeightVector,
    pub target: WeightVector,
    #[serde(default)]
    pub walk: WalkParams,
    #[serde(default)]
    pub oracle: BuchbergerConfig,
}

impl WalkProblem {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: display.clone(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text).map_err(|source| ConfigError::ParseJson {
                path: display,
                source,
            })
        } else {
            toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
                path: display,
                source,
            })
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn ring(&self) -> Result<Ring, ConfigError> {
        Ok(Ring::new(self.variables.clone())?)
    }

    /// The generators parsed over [`WalkProblem::ring`], after checking the
    /// weights fit the ring.
    pub fn ideal(&self) -> Result<Ideal, ConfigError> {
        let ring = self.ring()?;
        for (name, w) in [("start", &self.start), ("target", &self.target)] {
            if w.len() != ring.nvars() {
                return Err(ConfigError::Contract(format!(
                    "{name} weight {w} does not match {} variables",
                    ring.nvars()
                )));
            }
        }
        if self.generators.is_empty() {
            return Err(ConfigError::Contract("no generators".to_string()));
        }
        Ok(Ideal::parse(&ring, &self.generators)?)
    }

    /// Runs the configured variant against the reference oracle and fills in
    /// the report's basis digest.
    pub fn solve(&self) -> Result<(Ring, WalkOutcome), SolveError> {
        let ring = self.ring()?;
        let ideal = self.ideal()?;
        let oracle = Buchberger::new(self.oracle.clone());
        let mut outcome = run_variant(&ideal, &self.start, &self.target, &self.walk, &oracle)?;
        outcome.report.basis_digest = Some(outcome.basis.basis_digest(&ring));
        Ok((ring, outcome))
    }
}

/// Either half of [`WalkProblem::solve`] failing.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Walk(#[from] WalkError),
}
