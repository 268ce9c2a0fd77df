//! Exponent vectors.

use crate::weight::WeightVector;

/// A monomial x1^e1 * ... * xn^en, stored as its exponent vector.
///
/// The derived `Ord` is the lexicographic order with x1 > x2 > ... > xn,
/// which every [`MonomialOrder`](crate::order::MonomialOrder) uses as its
/// final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(pub Vec<u32>);

impl Monomial {
    /// The constant monomial 1 in `n` variables.
    pub fn one(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// The monomial of variable `index` in `n` variables.
    pub fn variable(n: usize, index: usize) -> Self {
        let mut exps = vec![0; n];
        exps[index] = 1;
        Self(exps)
    }

    pub fn nvars(&self) -> usize {
        self.0.len()
    }

    pub fn exponents(&self) -> &[u32] {
        &self.0
    }

    pub fn is_one(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    pub fn total_degree(&self) -> u64 {
        self.0.iter().map(|&e| u64::from(e)).sum()
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }

    /// True iff `self` divides `other`.
    pub fn divides(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a <= b)
    }

    /// `other / self`, if `self` divides `other`.
    pub fn quotient_of(&self, other: &Self) -> Option<Self> {
        if !self.divides(other) {
            return None;
        }
        Some(Self(other.0.iter().zip(&self.0).map(|(a, b)| a - b).collect()))
    }

    pub fn lcm(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| *a.max(b)).collect())
    }

    pub fn is_coprime(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| *a == 0 || *b == 0)
    }

    /// `w · exponent`, accumulated in i128.
    pub fn weighted_degree(&self, weight: &WeightVector) -> i128 {
        weight.dot(self)
    }

    /// Signed exponent difference `self - other`.
    pub fn difference(&self, other: &Self) -> Vec<i64> {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| i64::from(*a) - i64::from(*b))
            .collect()
    }

    /// l1 distance between two exponent vectors.
    pub fn spread(&self, other: &Self) -> u64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisibility_and_quotient() {
        let a = Monomial(vec![1, 2]);
        let b = Monomial(vec![3, 2]);
        assert!(a.divides(&b));
        assert!(!b.divides(&a));
        assert_eq!(a.quotient_of(&b), Some(Monomial(vec![2, 0])));
        assert_eq!(b.quotient_of(&a), None);
    }

    #[test]
    fn lcm_and_coprimality() {
        let a = Monomial(vec![2, 0, 1]);
        let b = Monomial(vec![0, 3, 0]);
        assert_eq!(a.lcm(&b), Monomial(vec![2, 3, 1]));
        assert!(a.is_coprime(&b));
        assert!(!a.is_coprime(&Monomial(vec![1, 0, 0])));
    }

    #[test]
    fn derived_order_is_lex() {
        assert!(Monomial(vec![1, 0]) > Monomial(vec![0, 5]));
        assert!(Monomial(vec![1, 2]) > Monomial(vec![1, 1]));
    }

    #[test]
    fn spread_and_difference() {
        let a = Monomial(vec![2, 0]);
        let b = Monomial(vec![0, 3]);
        assert_eq!(a.difference(&b), vec![2, -3]);
        assert_eq!(a.spread(&b), 5);
    }
}
