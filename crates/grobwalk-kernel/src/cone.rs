//! Polyhedral cones cut out by homogeneous inequalities `a · w >= 0`.
//!
//! All queries are exact: feasibility goes through Fourier–Motzkin
//! elimination over big integers and ranks through fraction-free
//! elimination. The walk itself only needs [`PolyhedralCone::contains`];
//! the remaining queries describe the cone a basis sits in.

use std::collections::BTreeSet;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::ideal::Ideal;
use crate::order::MonomialOrder;
use crate::weight::WeightVector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolyhedralCone {
    ambient: usize,
    rows: Vec<Vec<BigInt>>,
}

/// Cone of a basis: one inequality `(lm(g) - m) · w >= 0` for every
/// non-leading term `m` of every generator `g`.
pub struct GroebnerCone;

impl GroebnerCone {
    pub fn of(basis: &Ideal, order: &MonomialOrder) -> PolyhedralCone {
        let mut rows = Vec::new();
        for g in basis.generators() {
            let Some(lm) = g.leading_monomial(order) else {
                continue;
            };
            for m in g.monomials().filter(|m| *m != lm) {
                rows.push(lm.difference(m).into_iter().map(BigInt::from).collect());
            }
        }
        PolyhedralCone::from_inequalities(basis.nvars(), rows)
    }
}

impl PolyhedralCone {
    /// Rows are gcd-normalized and deduplicated; zero rows are dropped.
    pub fn from_inequalities(ambient: usize, rows: Vec<Vec<BigInt>>) -> Self {
        let unique: BTreeSet<Vec<BigInt>> = rows
            .into_iter()
            .filter_map(|mut row| {
                row.resize(ambient, BigInt::zero());
                normalize(&mut row).then_some(row)
            })
            .collect();
        Self {
            ambient,
            rows: unique.into_iter().collect(),
        }
    }

    pub fn inequalities(&self) -> &[Vec<BigInt>] {
        &self.rows
    }

    pub fn ambient_dimension(&self) -> usize {
        self.ambient
    }

    /// Membership in the closed cone.
    pub fn contains(&self, w: &WeightVector) -> bool {
        let w = w.to_big();
        self.rows.iter().all(|row| !dot(row, &w).is_negative())
    }

    /// Inequalities that hold with equality on the whole cone.
    pub fn implicit_equalities(&self) -> Vec<Vec<BigInt>> {
        (0..self.rows.len())
            .filter(|&i| self.is_implicit_equality(i))
            .map(|i| self.rows[i].clone())
            .collect()
    }

    pub fn dimension(&self) -> usize {
        self.ambient - rank(self.implicit_equalities())
    }

    pub fn codimension(&self) -> usize {
        self.ambient - self.dimension()
    }

    /// Inward normals of the facets, primitive and deduplicated.
    pub fn facet_normals(&self) -> Vec<WeightVector> {
        let equalities: Vec<bool> = (0..self.rows.len())
            .map(|i| self.is_implicit_equality(i))
            .collect();
        let mut kept: Vec<bool> = vec![true; self.rows.len()];
        for i in 0..self.rows.len() {
            if equalities[i] {
                continue;
            }
            kept[i] = false;
            let mut system: Vec<(Vec<BigInt>, BigInt)> = self
                .rows
                .iter()
                .zip(&kept)
                .filter(|(_, k)| **k)
                .map(|(row, _)| (row.clone(), BigInt::zero()))
                .collect();
            system.push((self.rows[i].iter().map(|x| -x).collect(), BigInt::one()));
            // Redundant exactly when the others force `a_i · w >= 0`.
            kept[i] = feasible(system, self.ambient);
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, _)| kept[*i] && !equalities[*i])
            .filter_map(|(_, row)| {
                let as_i64: Option<Vec<i64>> = row.iter().map(num_traits::ToPrimitive::to_i64).collect();
                as_i64.map(WeightVector::new)
            })
            .collect()
    }

    fn is_implicit_equality(&self, i: usize) -> bool {
        let mut system: Vec<(Vec<BigInt>, BigInt)> = self
            .rows
            .iter()
            .map(|row| (row.clone(), BigInt::zero()))
            .collect();
        system.push((self.rows[i].clone(), BigInt::one()));
        !feasible(system, self.ambient)
    }
}

fn dot(a: &[BigInt], b: &[BigInt]) -> BigInt {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Divides by the gcd of the entries. Returns false for the zero row.
fn normalize(row: &mut [BigInt]) -> bool {
    let g = row.iter().fold(BigInt::zero(), |acc, x| acc.gcd(x));
    if g.is_zero() {
        return false;
    }
    if !g.is_one() {
        for x in row.iter_mut() {
            *x = &*x / &g;
        }
    }
    true
}

/// Is `{ w : a · w >= b for every (a, b) }` nonempty over the rationals?
fn feasible(mut system: Vec<(Vec<BigInt>, BigInt)>, ambient: usize) -> bool {
    for var in 0..ambient {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        let mut next: BTreeSet<(Vec<BigInt>, BigInt)> = BTreeSet::new();
        for (a, b) in system {
            if a[var].is_positive() {
                positive.push((a, b));
            } else if a[var].is_negative() {
                negative.push((a, b));
            } else {
                next.insert((a, b));
            }
        }
        for (pa, pb) in &positive {
            for (na, nb) in &negative {
                let p = &pa[var];
                let q = -&na[var];
                let a: Vec<BigInt> = pa.iter().zip(na).map(|(x, y)| &q * x + p * y).collect();
                let b = &q * pb + p * nb;
                next.insert(reduce_constraint(a, b));
            }
        }
        system = Vec::with_capacity(next.len());
        for (a, b) in next {
            if a.iter().all(Zero::is_zero) {
                if b.is_positive() {
                    return false;
                }
            } else {
                system.push((a, b));
            }
        }
    }
    system.iter().all(|(_, b)| !b.is_positive())
}

fn reduce_constraint(mut a: Vec<BigInt>, mut b: BigInt) -> (Vec<BigInt>, BigInt) {
    let g = a.iter().fold(b.abs(), |acc, x| acc.gcd(x));
    if !g.is_zero() && !g.is_one() {
        for x in a.iter_mut() {
            *x = &*x / &g;
        }
        b = &b / &g;
    }
    (a, b)
}

/// Fraction-free row reduction.
fn rank(mut rows: Vec<Vec<BigInt>>) -> usize {
    let cols = rows.first().map_or(0, Vec::len);
    let mut rank = 0;
    for col in 0..cols {
        let Some(pivot) = (rank..rows.len()).find(|&r| !rows[r][col].is_zero()) else {
            continue;
        };
        rows.swap(rank, pivot);
        let pivot_row = rows[rank].clone();
        for row in rows.iter_mut().skip(rank + 1) {
            if row[col].is_zero() {
                continue;
            }
            let a = pivot_row[col].clone();
            let b = row[col].clone();
            for (x, p) in row.iter_mut().zip(&pivot_row) {
                *x = &*x * &a - p * &b;
            }
            normalize(row);
        }
        rank += 1;
    }
    rank
}
