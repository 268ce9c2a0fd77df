//! The ratio test that finds where a segment leaves a Gröbner cone.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::error::WalkError;
use crate::ideal::Ideal;
use crate::order::MonomialOrder;
use crate::weight::WeightVector;

/// Parameter `t` in `[0, 1]` where `(1 - t)·current + t·target` first
/// leaves the closed cone of `basis` under `order`, or `None` when the
/// whole segment stays inside.
///
/// For each non-leading term `m` of a generator with leading monomial
/// `lm`, with `d = lm - m`, `a = d·current` and `b = d·target`, the term
/// binds when `b < 0` and does so at `t = a / (a - b)`.
pub fn boundary_parameter(
    current: &WeightVector,
    target: &WeightVector,
    basis: &Ideal,
    order: &MonomialOrder,
) -> Option<BigRational> {
    let mut best: Option<BigRational> = None;
    for g in basis.generators() {
        let Some(lm) = g.leading_monomial(order) else {
            continue;
        };
        for m in g.monomials().filter(|m| *m != lm) {
            let d = lm.difference(m);
            let a = current.dot_signed(&d);
            let b = target.dot_signed(&d);
            if b >= 0 {
                continue;
            }
            // a <= 0 means current already sits on this boundary.
            let t = if a <= 0 {
                BigRational::zero()
            } else {
                BigRational::new(BigInt::from(a), BigInt::from(a - b))
            };
            if best.as_ref().is_none_or(|known| t < *known) {
                best = Some(t);
            }
        }
    }
    best.filter(|t| *t < BigRational::one())
}

/// The point `(1 - t)·current + t·target`, scaled to a primitive integer vector.
pub fn interpolate(
    current: &WeightVector,
    target: &WeightVector,
    t: &BigRational,
) -> Result<WeightVector, WalkError> {
    if t.is_zero() {
        return Ok(current.clone());
    }
    if t.is_one() {
        return Ok(target.clone());
    }
    let p = t.numer();
    let q = t.denom();
    let entries: Vec<BigInt> = current
        .to_big()
        .iter()
        .zip(target.to_big())
        .map(|(c, g)| (q - p) * c + p * g)
        .collect();
    WeightVector::from_big(&entries)
}

/// The farthest point of `[current, target]` still in the closed cone of
/// `basis`; `target` itself when nothing binds.
pub fn next_weight(
    current: &WeightVector,
    target: &WeightVector,
    basis: &Ideal,
    order: &MonomialOrder,
) -> Result<WeightVector, WalkError> {
    match boundary_parameter(current, target, basis, order) {
        None => Ok(target.clone()),
        Some(t) => interpolate(current, target, &t),
    }
}

/// [`next_weight`] on the interreduced basis.
pub fn next_weight_interreduced(
    current: &WeightVector,
    target: &WeightVector,
    basis: &Ideal,
    order: &MonomialOrder,
) -> Result<WeightVector, WalkError> {
    next_weight(current, target, &basis.interreduce(order), order)
}

/// Number of generators whose initial form at `w` has more than one term.
pub fn binding_generators(basis: &Ideal, w: &WeightVector) -> usize {
    basis
        .generators()
        .iter()
        .filter(|g| {
            let top = g.monomials().map(|m| w.dot(m)).max();
            g.monomials().filter(|m| Some(w.dot(m)) == top).count() > 1
        })
        .count()
}

/// The STEP behaviour of a walk frame.
pub trait WeightStep {
    fn name(&self) -> &'static str;

    fn next(
        &mut self,
        current: &WeightVector,
        target: &WeightVector,
        basis: &Ideal,
        order: &MonomialOrder,
    ) -> Result<WeightVector, WalkError>;
}

/// Stops exactly on the nearest facet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicStep;

impl WeightStep for DeterministicStep {
    fn name(&self) -> &'static str {
        "deterministic"
    }

    fn next(
        &mut self,
        current: &WeightVector,
        target: &WeightVector,
        basis: &Ideal,
        order: &MonomialOrder,
    ) -> Result<WeightVector, WalkError> {
        next_weight(current, target, basis, order)
    }
}

/// [`DeterministicStep`] on the interreduced basis. Minimal lifts leave
/// tails unreduced, and their extra terms can cut the cone short.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterreducedStep;

impl WeightStep for InterreducedStep {
    fn name(&self) -> &'static str {
        "interreduced"
    }

    fn next(
        &mut self,
        current: &WeightVector,
        target: &WeightVector,
        basis: &Ideal,
        order: &MonomialOrder,
    ) -> Result<WeightVector, WalkError> {
        next_weight_interreduced(current, target, basis, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Ring;

    fn intro_deglex() -> (Ideal, MonomialOrder) {
        let ring = Ring::parse_list("x,y").unwrap();
        let basis =
            Ideal::parse(&ring, &["x^3 - x + 2*y^2", "x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        let order = MonomialOrder::refine(
            &WeightVector::ones(2),
            &MonomialOrder::lex(2),
        );
        (basis, order)
    }

    #[test]
    fn first_facet_of_intro_walk() {
        let (basis, order) = intro_deglex();
        let w = next_weight(
            &WeightVector::ones(2),
            &WeightVector::lex(2),
            &basis,
            &order,
        )
        .unwrap();
        assert_eq!(w, WeightVector::new(vec![3, 2]));
        assert_eq!(binding_generators(&basis, &w), 1);
    }

    #[test]
    fn target_inside_cone_is_returned() {
        let (basis, order) = intro_deglex();
        let target = WeightVector::new(vec![3, 2]);
        let w = next_weight(&WeightVector::ones(2), &target, &basis, &order).unwrap();
        assert_eq!(w, target);
    }

    #[test]
    fn boundary_is_strictly_inside_segment() {
        let (basis, order) = intro_deglex();
        let t = boundary_parameter(
            &WeightVector::ones(2),
            &WeightVector::lex(2),
            &basis,
            &order,
        )
        .unwrap();
        assert_eq!(t, BigRational::new(1.into(), 3.into()));
    }

    #[test]
    fn interreduced_step_ignores_unreduced_tails() {
        let ring = Ring::parse_list("x,y").unwrap();
        let (reduced, order) = intro_deglex();
        // y*(x*y - 2) added to the first generator
        let padded = Ideal::parse(
            &ring,
            &["x^3 + x*y^2 - x + 2*y^2 - 2*y", "x^2 + y^3 - 1", "x*y - 2"],
        )
        .unwrap();
        let (ones, lex) = (WeightVector::ones(2), WeightVector::lex(2));
        let exact = next_weight(&ones, &lex, &reduced, &order).unwrap();
        assert_eq!(exact, WeightVector::new(vec![3, 2]));
        assert_eq!(
            InterreducedStep.next(&ones, &lex, &padded, &order).unwrap(),
            exact
        );
    }

    #[test]
    fn interpolation_endpoints() {
        let a = WeightVector::new(vec![1, 1]);
        let b = WeightVector::new(vec![1, 0]);
        assert_eq!(interpolate(&a, &b, &BigRational::zero()).unwrap(), a);
        assert_eq!(interpolate(&a, &b, &BigRational::one()).unwrap(), b);
    }
}
