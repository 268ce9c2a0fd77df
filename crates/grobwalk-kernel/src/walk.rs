//! Named walk entry points.
//!
//! Each entry point assembles a [`WalkEngine`] from strategy objects; none of
//! them runs a loop of its own. Perturbation degrees above the number of
//! variables are clamped, a degree of 0 is rejected.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::WalkParams;
use crate::engine::{
    AdaptivePerturbation, DescendingPerturbation, DirectTarget, FixedPerturbation, Recursion,
    WalkEngine, WalkOutcome,
};
use crate::error::WalkError;
use crate::fractal::FractalWalk;
use crate::ideal::Ideal;
use crate::lift::{GeneralLift, MinimalLift};
use crate::next_weight::{DeterministicStep, InterreducedStep};
use crate::oracle::StandardBasis;
use crate::random::RandomStep;
use crate::report::Variant;
use crate::weight::WeightVector;

fn degree(name: &str, value: usize, nvars: usize) -> Result<usize, WalkError> {
    if value == 0 {
        return Err(WalkError::invalid(format!("{name} must be at least 1")));
    }
    Ok(value.min(nvars.max(1)))
}

fn fractal_depth(input: &Ideal) -> Recursion {
    Recursion::Fractal {
        max_depth: FractalWalk::default_depth(input.nvars()),
    }
}

/// Plain Gröbner walk.
pub fn mwalk(
    input: &Ideal,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    WalkEngine::new(
        Variant::Plain,
        oracle,
        Box::new(DeterministicStep),
        Box::new(GeneralLift),
        Box::new(DirectTarget),
    )
    .run(input, curr_weight, target_weight)
}

/// Random walk: each step stops a random fraction of the way to the next
/// facet, toward a target perturbed to `pert_deg`.
pub fn mrwalk<R: Rng + ?Sized>(
    input: &Ideal,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    weight_radius: u32,
    pert_deg: usize,
    rng: &mut R,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let pert_deg = degree("perturbation degree", pert_deg, input.nvars())?;
    WalkEngine::new(
        Variant::Random,
        oracle,
        Box::new(RandomStep::new(rng, weight_radius)?),
        Box::new(GeneralLift),
        Box::new(FixedPerturbation { degree: pert_deg }),
    )
    .run(input, curr_weight, target_weight)
}

/// Perturbation walk: start perturbed to `op_deg`, target to
/// `min(tp_deg, n_p)`.
pub fn mpwalk(
    input: &Ideal,
    op_deg: usize,
    tp_deg: usize,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    n_p: usize,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars();
    let op_deg = degree("start perturbation degree", op_deg, n)?;
    let tp_deg = degree("target perturbation degree", tp_deg, n)?;
    let n_p = degree("number of perturbation variables", n_p, n)?;
    WalkEngine::new(
        Variant::Perturbation,
        oracle,
        Box::new(DeterministicStep),
        Box::new(GeneralLift),
        Box::new(FixedPerturbation {
            degree: tp_deg.min(n_p),
        }),
    )
    .with_start_degree(op_deg)
    .run(input, curr_weight, target_weight)
}

/// Fractal walk.
pub fn mfwalk(
    input: &Ideal,
    start_weight: &WeightVector,
    target_weight: &WeightVector,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    mfwalk_bounded(input, start_weight, target_weight, fractal_depth(input), oracle)
}

/// [`mfwalk`] with an explicit recursion bound.
pub fn mfwalk_bounded(
    input: &Ideal,
    start_weight: &WeightVector,
    target_weight: &WeightVector,
    recursion: Recursion,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    WalkEngine::new(
        Variant::Fractal,
        oracle,
        Box::new(DeterministicStep),
        Box::new(GeneralLift),
        Box::new(DirectTarget),
    )
    .with_recursion(recursion)
    .run(input, start_weight, target_weight)
}

/// Fractal walk with random steps at every level.
pub fn mfrwalk<R: Rng + ?Sized>(
    input: &Ideal,
    start_weight: &WeightVector,
    target_weight: &WeightVector,
    weight_radius: u32,
    rng: &mut R,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    WalkEngine::new(
        Variant::FractalRandom,
        oracle,
        Box::new(RandomStep::new(rng, weight_radius)?),
        Box::new(GeneralLift),
        Box::new(DirectTarget),
    )
    .with_recursion(fractal_depth(input))
    .run(input, start_weight, target_weight)
}

/// Improved perturbation walk: the target perturbation is recomputed from
/// the basis each round, starting at degree `n_p`.
pub fn tran_mimprovwalk(
    input: &Ideal,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    n_p: usize,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars();
    let n_p = degree("number of perturbation variables", n_p, n)?;
    WalkEngine::new(
        Variant::Tran,
        oracle,
        Box::new(DeterministicStep),
        Box::new(GeneralLift),
        Box::new(AdaptivePerturbation::new(n_p, n)),
    )
    .run(input, curr_weight, target_weight)
}

/// [`tran_mimprovwalk`] with random steps.
#[allow(clippy::too_many_arguments)]
pub fn tran_mr_improvwalk<R: Rng + ?Sized>(
    input: &Ideal,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    n_p: usize,
    weight_radius: u32,
    pert_deg: usize,
    rng: &mut R,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars();
    let n_p = degree("number of perturbation variables", n_p, n)?;
    let pert_deg = degree("perturbation degree", pert_deg, n)?;
    WalkEngine::new(
        Variant::TranRandom,
        oracle,
        Box::new(RandomStep::new(rng, weight_radius)?),
        Box::new(GeneralLift),
        Box::new(AdaptivePerturbation::new(n_p.max(pert_deg), n)),
    )
    .run(input, curr_weight, target_weight)
}

/// Alternative walk 1: minimal lifts stepped on their interreduced form,
/// target perturbation lowered from `tp_deg` to 1 one round at a time.
pub fn maltwalk1(
    input: &Ideal,
    op_deg: usize,
    tp_deg: usize,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars();
    let op_deg = degree("start perturbation degree", op_deg, n)?;
    let tp_deg = degree("target perturbation degree", tp_deg, n)?;
    WalkEngine::new(
        Variant::Alt1,
        oracle,
        Box::new(InterreducedStep),
        Box::new(MinimalLift),
        Box::new(DescendingPerturbation::from_degree(tp_deg)),
    )
    .with_start_degree(op_deg)
    .run(input, curr_weight, target_weight)
}

/// Alternative walk 2: minimal lifts, a fully perturbed round and then the
/// exact target.
pub fn maltwalk2(
    input: &Ideal,
    curr_weight: &WeightVector,
    target_weight: &WeightVector,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars().max(1);
    let degrees = if n > 1 { vec![n, 1] } else { vec![1] };
    WalkEngine::new(
        Variant::Alt2,
        oracle,
        Box::new(InterreducedStep),
        Box::new(MinimalLift),
        Box::new(DescendingPerturbation::new(degrees)),
    )
    .run(input, curr_weight, target_weight)
}

/// Runs whichever variant `params` names. Random variants draw from a
/// ChaCha8 generator seeded with `params.seed`.
pub fn run_variant(
    input: &Ideal,
    start: &WeightVector,
    target: &WeightVector,
    params: &WalkParams,
    oracle: &dyn StandardBasis,
) -> Result<WalkOutcome, WalkError> {
    let n = input.nvars();
    let start_degree = params.start_degree.unwrap_or(n);
    let target_degree = params.target_degree.unwrap_or(n);
    let perturbation_vars = params.perturbation_vars.unwrap_or(n);
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let radius = params.weight_radius;

    match params.variant {
        Variant::Plain => mwalk(input, start, target, oracle),
        Variant::Random => mrwalk(input, start, target, radius, target_degree, &mut rng, oracle),
        Variant::Perturbation => mpwalk(
            input,
            start_degree,
            target_degree,
            start,
            target,
            perturbation_vars,
            oracle,
        ),
        Variant::Fractal => {
            let recursion = Recursion::Fractal {
                max_depth: params
                    .max_depth
                    .unwrap_or_else(|| FractalWalk::default_depth(n)),
            };
            mfwalk_bounded(input, start, target, recursion, oracle)
        }
        Variant::FractalRandom => mfrwalk(input, start, target, radius, &mut rng, oracle),
        Variant::Tran => tran_mimprovwalk(input, start, target, perturbation_vars, oracle),
        Variant::TranRandom => tran_mr_improvwalk(
            input,
            start,
            target,
            perturbation_vars,
            radius,
            target_degree,
            &mut rng,
            oracle,
        ),
        Variant::Alt1 => maltwalk1(input, start_degree, target_degree, start, target, oracle),
        Variant::Alt2 => maltwalk2(input, start, target, oracle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Buchberger;
    use crate::order::MonomialOrder;
    use crate::poly::Ring;

    fn intro() -> (Ring, Ideal) {
        let ring = Ring::parse_list("x,y").unwrap();
        let ideal = Ideal::parse(&ring, &["x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        (ring, ideal)
    }

    #[test]
    fn mwalk_reaches_the_lex_basis() {
        let (ring, ideal) = intro();
        let outcome = mwalk(
            &ideal,
            &WeightVector::ones(2),
            &WeightVector::lex(2),
            &Buchberger::default(),
        )
        .unwrap();
        insta::assert_snapshot!(
            outcome.basis.render(&ring).join(", "),
            @"x + 1/2*y^4 - 1/2*y, y^5 - y^2 + 4"
        );
        let weights: Vec<String> = outcome
            .report
            .steps
            .iter()
            .map(|s| s.weight.to_string())
            .collect();
        assert_eq!(weights, vec!["(3,2)", "(4,1)", "(1,0)"]);
    }

    #[test]
    fn seeded_random_walk_agrees_with_plain_walk() {
        let (ring, ideal) = intro();
        let oracle = Buchberger::default();
        let plain = mwalk(&ideal, &WeightVector::ones(2), &WeightVector::lex(2), &oracle).unwrap();
        for seed in [0, 7, 42] {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let random = mrwalk(
                &ideal,
                &WeightVector::ones(2),
                &WeightVector::lex(2),
                3,
                1,
                &mut rng,
                &oracle,
            )
            .unwrap();
            assert_eq!(random.basis.render(&ring), plain.basis.render(&ring));
        }
    }

    #[test]
    fn every_variant_matches_the_oracle() {
        let ring = Ring::parse_list("x,y,z").unwrap();
        let ideal = Ideal::parse(&ring, &["x + y + z", "x*y + y*z + z*x", "x*y*z - 1"]).unwrap();
        let oracle = Buchberger::default();
        let expected = oracle
            .standard_basis(&ideal, &MonomialOrder::lex(3))
            .unwrap()
            .render(&ring);
        for variant in Variant::ALL {
            let params = WalkParams {
                variant,
                seed: 3,
                ..WalkParams::default()
            };
            let outcome = run_variant(
                &ideal,
                &WeightVector::ones(3),
                &WeightVector::lex(3),
                &params,
                &oracle,
            )
            .unwrap_or_else(|e| panic!("{variant}: {e}"));
            assert_eq!(outcome.basis.render(&ring), expected, "{variant}");
            assert_eq!(outcome.report.variant, variant);
        }
    }

    #[test]
    fn zero_degrees_and_radius_are_rejected() {
        let (_, ideal) = intro();
        let oracle = Buchberger::default();
        let (ones, lex) = (WeightVector::ones(2), WeightVector::lex(2));
        assert!(matches!(
            mpwalk(&ideal, 0, 2, &ones, &lex, 2, &oracle),
            Err(WalkError::InvalidInput { .. })
        ));
        assert!(matches!(
            maltwalk1(&ideal, 2, 0, &ones, &lex, &oracle),
            Err(WalkError::InvalidInput { .. })
        ));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            mrwalk(&ideal, &ones, &lex, 0, 1, &mut rng, &oracle),
            Err(WalkError::InvalidInput { .. })
        ));
    }
}
