//! Integer weight vectors and the stall guards over them.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::WalkError;
use crate::monomial::Monomial;

/// An integer linear functional on exponent vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WeightVector(pub Vec<i64>);

impl WeightVector {
    pub fn new(entries: Vec<i64>) -> Self {
        Self(entries)
    }

    /// The all-ones vector (degree weight).
    pub fn ones(n: usize) -> Self {
        Self(vec![1; n])
    }

    /// The first unit vector (lexicographic leading weight).
    pub fn lex(n: usize) -> Self {
        Self::unit(n, 0)
    }

    /// The unit vector `e_index` in `n` coordinates.
    pub fn unit(n: usize, index: usize) -> Self {
        let mut entries = vec![0; n];
        if let Some(slot) = entries.get_mut(index) {
            *slot = 1;
        }
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[i64] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0)
    }

    pub fn is_non_negative(&self) -> bool {
        self.0.iter().all(|&x| x >= 0)
    }

    pub fn max_abs(&self) -> u64 {
        self.0.iter().map(|x| x.unsigned_abs()).max().unwrap_or(0)
    }

    /// `self · exponent`.
    pub fn dot(&self, monomial: &Monomial) -> i128 {
        self.0
            .iter()
            .zip(monomial.exponents())
            .map(|(w, e)| i128::from(*w) * i128::from(*e))
            .sum()
    }

    /// `self · v` for a signed exponent difference.
    pub fn dot_signed(&self, v: &[i64]) -> i128 {
        self.0
            .iter()
            .zip(v)
            .map(|(w, e)| i128::from(*w) * i128::from(*e))
            .sum()
    }

    /// The vector divided by the gcd of its entries.
    pub fn primitive(&self) -> Self {
        let g = self
            .0
            .iter()
            .fold(0i64, |acc, x| acc.gcd(x));
        if g <= 1 {
            return self.clone();
        }
        Self(self.0.iter().map(|x| x / g).collect())
    }

    pub fn to_big(&self) -> Vec<BigInt> {
        self.0.iter().map(|&x| BigInt::from(x)).collect()
    }

    /// Primitive i64 vector from big entries, failing when an entry does not fit.
    pub fn from_big(entries: &[BigInt]) -> Result<Self, WalkError> {
        let g = entries
            .iter()
            .fold(BigInt::zero(), |acc, x| acc.gcd(x));
        let out = entries
            .iter()
            .map(|x| {
                let reduced = if g.is_zero() { x.clone() } else { x / &g };
                reduced.to_i64().ok_or_else(|| WalkError::WeightOverflow {
                    description: format!("entry {} does not fit in i64", reduced.abs()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(out))
    }
}

impl std::fmt::Display for WeightVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, ")")
    }
}

impl std::str::FromStr for WeightVector {
    type Err = String;

    /// Accepts `1,2,3` with optional surrounding parentheses or brackets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches(['(', '['])
            .trim_end_matches([')', ']']);
        if inner.trim().is_empty() {
            return Err("empty weight vector".to_string());
        }
        inner
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|e| format!("bad weight entry `{}`: {e}", part.trim()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Component-wise identity. A stall guard, not an approximate test.
pub fn same_vector(u: &WeightVector, v: &WeightVector) -> bool {
    u.0 == v.0
}

/// Which of two reference vectors a freshly computed vector repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    First,
    Second,
    Neither,
}

/// Compares `next` against two prior vectors, e.g. the raw and the
/// perturbed weight of a perturbation walk.
pub fn same_vector_triple(next: &WeightVector, u: &WeightVector, v: &WeightVector) -> Repeat {
    if same_vector(next, u) {
        Repeat::First
    } else if same_vector(next, v) {
        Repeat::Second
    } else {
        Repeat::Neither
    }
}

/// Primitive form of an integer vector.
pub fn simple_iv(v: &WeightVector) -> WeightVector {
    v.primitive()
}
