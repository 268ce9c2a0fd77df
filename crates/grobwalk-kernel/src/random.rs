//! Randomized stepping: stop somewhere before the nearest facet.

use num_rational::BigRational;
use num_traits::{One, Zero};
use rand::Rng;
use tracing::debug;

use crate::cone::GroebnerCone;
use crate::error::WalkError;
use crate::ideal::Ideal;
use crate::next_weight::{WeightStep, boundary_parameter, interpolate};
use crate::order::MonomialOrder;
use crate::weight::{WeightVector, same_vector};

/// Advances a random fraction `k / radius` of the way to the nearest facet.
///
/// `k = radius` lands on the facet itself, which is also where every
/// rejected candidate falls back to. After `radius` consecutive interior
/// steps the facet step is forced, so a walk always makes it to the target.
#[derive(Debug, Clone)]
pub struct RandomStep<R> {
    rng: R,
    radius: u32,
    interior_streak: u32,
}

impl<R: Rng> RandomStep<R> {
    pub fn new(rng: R, radius: u32) -> Result<Self, WalkError> {
        if radius == 0 {
            return Err(WalkError::invalid("weight radius must be at least 1"));
        }
        Ok(Self {
            rng,
            radius,
            interior_streak: 0,
        })
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    fn facet_step(&mut self, step: WeightVector) -> Result<WeightVector, WalkError> {
        self.interior_streak = 0;
        Ok(step)
    }
}

impl<R: Rng> WeightStep for RandomStep<R> {
    fn name(&self) -> &'static str {
        "random"
    }

    fn next(
        &mut self,
        current: &WeightVector,
        target: &WeightVector,
        basis: &Ideal,
        order: &MonomialOrder,
    ) -> Result<WeightVector, WalkError> {
        let boundary = boundary_parameter(current, target, basis, order);
        let facet = match &boundary {
            None => target.clone(),
            Some(t) => interpolate(current, target, t)?,
        };
        let reach = boundary.unwrap_or_else(BigRational::one);
        if reach.is_zero() || self.interior_streak >= self.radius {
            return self.facet_step(facet);
        }

        let k = self.rng.gen_range(1..=self.radius);
        if k == self.radius {
            return self.facet_step(facet);
        }
        let fraction = reach * BigRational::new(k.into(), self.radius.into());
        let candidate = match interpolate(current, target, &fraction) {
            Ok(candidate) => candidate,
            Err(e) => {
                debug!(error = %e, "random candidate overflowed; taking the facet step");
                return self.facet_step(facet);
            }
        };
        if same_vector(&candidate, current)
            || !candidate.is_non_negative()
            || !GroebnerCone::of(basis, order).contains(&candidate)
        {
            debug!(%candidate, "random candidate rejected; taking the facet step");
            return self.facet_step(facet);
        }
        self.interior_streak += 1;
        debug!(%candidate, k, radius = self.radius, "random interior step");
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Ring;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn intro_deglex() -> (Ideal, MonomialOrder) {
        let ring = Ring::parse_list("x,y").unwrap();
        let basis =
            Ideal::parse(&ring, &["x^3 - x + 2*y^2", "x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        (basis, MonomialOrder::refine(&WeightVector::ones(2), &MonomialOrder::lex(2)))
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(RandomStep::new(ChaCha8Rng::seed_from_u64(1), 0).is_err());
    }

    #[test]
    fn random_steps_stay_in_the_cone_and_advance() {
        let (basis, order) = intro_deglex();
        let cone = GroebnerCone::of(&basis, &order);
        let mut step = RandomStep::new(ChaCha8Rng::seed_from_u64(7), 4).unwrap();
        let current = WeightVector::ones(2);
        for _ in 0..32 {
            let w = step
                .next(&current, &WeightVector::lex(2), &basis, &order)
                .unwrap();
            assert!(cone.contains(&w), "{w} left the cone");
            assert!(!same_vector(&w, &current));
        }
    }

    #[test]
    fn radius_one_is_deterministic() {
        let (basis, order) = intro_deglex();
        let mut step = RandomStep::new(ChaCha8Rng::seed_from_u64(3), 1).unwrap();
        let w = step
            .next(&WeightVector::ones(2), &WeightVector::lex(2), &basis, &order)
            .unwrap();
        assert_eq!(w, WeightVector::new(vec![3, 2]));
    }

    #[test]
    fn same_seed_same_sequence() {
        let (basis, order) = intro_deglex();
        let run = |seed| {
            let mut step = RandomStep::new(ChaCha8Rng::seed_from_u64(seed), 5).unwrap();
            (0..8)
                .map(|_| {
                    step.next(&WeightVector::ones(2), &WeightVector::lex(2), &basis, &order)
                        .unwrap()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}
