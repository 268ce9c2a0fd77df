//! Perturbed weight vectors.
//!
//! A perturbation of degree `k` of a matrix order collapses its first `k`
//! rows into the single weight `Σ_{i<k} e^(k-1-i) · row_i`. When `e` exceeds
//! every `|row_i · d|` for the exponent differences `d` that matter, the
//! weight orders those differences exactly as the first `k` rows do, so a
//! walk toward it ends in the cone of the original order without ever
//! sitting on a lower-dimensional face.

use num_bigint::BigInt;
use num_traits::Zero;
use tracing::debug;

use crate::error::WalkError;
use crate::ideal::Ideal;
use crate::order::MonomialOrder;
use crate::weight::WeightVector;

pub use crate::weight::simple_iv;

/// The degree-`degree` perturbation of `order`, sized from the term
/// spread of `basis`. Degrees are clamped to `1..=rows`.
pub fn perturb(
    order: &MonomialOrder,
    degree: usize,
    basis: &Ideal,
) -> Result<WeightVector, WalkError> {
    let rows = order.rows();
    let k = degree.clamp(1, rows.len());
    if k == 1 {
        return Ok(rows[0].clone());
    }
    let spread = basis.max_exponent_spread().max(1);
    let max_entry = rows[1..k]
        .iter()
        .map(WeightVector::max_abs)
        .max()
        .unwrap_or(1)
        .max(1);
    let inverse_epsilon = BigInt::from(spread) * BigInt::from(max_entry) + 1;
    let mut u = vec![BigInt::zero(); order.nvars()];
    for row in &rows[..k] {
        for (acc, x) in u.iter_mut().zip(row.entries()) {
            *acc = &*acc * &inverse_epsilon + *x;
        }
    }
    WeightVector::from_big(&u)
}

/// A walk target for `target_order`, perturbed to `degree` from the
/// structure of the current basis. Falls back to the order's first row
/// when the perturbation leaves the positive orthant.
pub fn pert_target(
    basis: &Ideal,
    target_order: &MonomialOrder,
    degree: usize,
) -> Result<WeightVector, WalkError> {
    let u = perturb(target_order, degree, basis)?;
    if u.is_non_negative() && !u.is_zero() {
        Ok(u)
    } else {
        debug!(%u, "perturbed target left the orthant; using the leading row");
        Ok(target_order.leading_weight().clone())
    }
}

/// A perturbed start weight for a basis that is Gröbner under `order`.
///
/// Tries degrees `degree` down to 2 and keeps the first perturbation under
/// which every leading monomial stays put; otherwise the order's first row.
pub fn pert_next_weight(basis: &Ideal, order: &MonomialOrder, degree: usize) -> WeightVector {
    let top = degree.min(order.rows().len());
    for d in (2..=top).rev() {
        let Ok(u) = perturb(order, d, basis) else {
            continue;
        };
        if u.is_non_negative()
            && !u.is_zero()
            && basis.leading_monomials_agree(order, &MonomialOrder::refine(&u, order))
        {
            return u;
        }
    }
    order.leading_weight().clone()
}
