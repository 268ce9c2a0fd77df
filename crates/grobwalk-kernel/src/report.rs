//! What a walk did, in a serializable form.
//!
//! The basis digest is `b1_` followed by the lowercase, unpadded base32hex
//! encoding of SHA-256 over the rendered generators sorted lexically and
//! joined by newlines. Two runs that end in the same reduced basis report
//! the same digest whatever path they took.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::weight::WeightVector;

/// Which walk variant produced a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Deterministic steps, general lift.
    #[default]
    Plain,
    /// Random steps with a bounded radius.
    Random,
    /// Perturbed start and target.
    Perturbation,
    /// Recursive walks over initial ideals.
    Fractal,
    FractalRandom,
    /// Target perturbation recomputed from the current basis.
    Tran,
    TranRandom,
    /// Descending target perturbation with minimal lifts.
    Alt1,
    /// Full perturbation, then the exact target, with minimal lifts.
    Alt2,
}

impl Variant {
    pub const ALL: [Self; 9] = [
        Self::Plain,
        Self::Random,
        Self::Perturbation,
        Self::Fractal,
        Self::FractalRandom,
        Self::Tran,
        Self::TranRandom,
        Self::Alt1,
        Self::Alt2,
    ];

    pub fn uses_randomness(self) -> bool {
        matches!(self, Self::Random | Self::FractalRandom | Self::TranRandom)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Random => "random",
            Self::Perturbation => "perturbation",
            Self::Fractal => "fractal",
            Self::FractalRandom => "fractal_random",
            Self::Tran => "tran",
            Self::TranRandom => "tran_random",
            Self::Alt1 => "alt1",
            Self::Alt2 => "alt2",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "plain" | "mwalk" => Ok(Self::Plain),
            "random" | "mrwalk" => Ok(Self::Random),
            "perturbation" | "pert" | "mpwalk" => Ok(Self::Perturbation),
            "fractal" | "mfwalk" => Ok(Self::Fractal),
            "fractal_random" | "mfrwalk" => Ok(Self::FractalRandom),
            "tran" | "tranmimprovwalk" => Ok(Self::Tran),
            "tran_random" | "tranmrimprovwalk" => Ok(Self::TranRandom),
            "alt1" | "maltwalk1" => Ok(Self::Alt1),
            "alt2" | "maltwalk2" => Ok(Self::Alt2),
            _ => Err(format!("unknown walk variant: {s}")),
        }
    }
}

/// One accepted weight change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub weight: WeightVector,
    /// 0 for the outer walk, deeper for fractal sub-walks.
    pub depth: usize,
    pub basis_size: usize,
    /// Generators with more than one initial term at `weight`.
    pub binding: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkReport {
    pub variant: Variant,
    pub steps: Vec<StepRecord>,
    pub rounds: usize,
    pub stalls: usize,
    pub deepest_level: usize,
    pub oracle_calls: usize,
    /// The last round did not land in the target cone and the oracle
    /// finished the conversion.
    pub oracle_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis_digest: Option<String>,
}

impl WalkReport {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            steps: Vec::new(),
            rounds: 0,
            stalls: 0,
            deepest_level: 0,
            oracle_calls: 0,
            oracle_fallback: false,
            basis_digest: None,
        }
    }

    /// Steps taken by the outer walk only.
    pub fn outer_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.depth == 0).count()
    }
}

/// Digest over rendered generators, independent of their order.
pub fn compute_basis_digest(rendered: &[String]) -> String {
    let mut sorted: Vec<&String> = rendered.iter().collect();
    sorted.sort();
    let mut hasher = Sha256::new();
    for (i, g) in sorted.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(g.as_bytes());
    }
    format!("b1_{}", base32hex_lower_no_pad(&hasher.finalize()))
}

/// RFC 4648 base32hex, lowercase, no padding.
fn base32hex_lower_no_pad(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

    let mut result = String::new();
    let mut bits: u64 = 0;
    let mut num_bits: u32 = 0;

    for &byte in data {
        bits = (bits << 8) | u64::from(byte);
        num_bits += 8;
        while num_bits >= 5 {
            num_bits -= 5;
            result.push(char::from(ALPHABET[((bits >> num_bits) & 0x1f) as usize]));
        }
    }
    if num_bits > 0 {
        result.push(char::from(ALPHABET[((bits << (5 - num_bits)) & 0x1f) as usize]));
    }
    result
}
