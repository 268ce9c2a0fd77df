//! Lifting a basis of an initial ideal back to the ideal itself.
//!
//! Let `G` be a Gröbner basis under an order `O`, `w` a weight in the closed
//! cone of `G`, and `M` a Gröbner basis of `in_w(G)` under the new order
//! `N`. Each `m` in `M` is written as `Σ h_j in_w(g_j)` by dividing it by
//! the initial forms under `[w] ++ O`; then `Σ h_j g_j` has `m` as its
//! initial form, and these sums form a Gröbner basis of the ideal under `N`.

use crate::error::WalkError;
use crate::ideal::{Ideal, combine};
use crate::order::MonomialOrder;
use crate::poly::Polynomial;

/// Quotients expressing each element of `initial_gb` in `initial_forms`.
pub fn lift_quotients(
    initial_gb: &Ideal,
    initial_forms: &Ideal,
    division_order: &MonomialOrder,
) -> Result<Vec<Vec<Polynomial>>, WalkError> {
    initial_gb
        .generators()
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let division = initial_forms.divide(m, division_order);
            if division.is_exact() {
                Ok(division.quotients)
            } else {
                Err(WalkError::LiftInconsistency {
                    description: format!(
                        "element {i} of the initial basis leaves a remainder with {} terms",
                        division.remainder.len()
                    ),
                })
            }
        })
        .collect()
}

/// `Σ_j q_ij g_j` for every quotient row `i`; zero results are dropped.
pub fn apply_quotients(quotients: &[Vec<Polynomial>], basis: &Ideal) -> Ideal {
    Ideal::new(
        basis.nvars(),
        quotients
            .iter()
            .map(|row| combine(row, basis.generators()))
            .filter(|p| !p.is_zero())
            .collect(),
    )
}

/// The general lift; its result may carry redundant generators.
pub fn lift(
    initial_gb: &Ideal,
    initial_forms: &Ideal,
    basis: &Ideal,
    division_order: &MonomialOrder,
) -> Result<Ideal, WalkError> {
    let quotients = lift_quotients(initial_gb, initial_forms, division_order)?;
    Ok(apply_quotients(&quotients, basis))
}

/// The general lift with divisible leading monomials under `new_order` removed.
pub fn lift_minimal(
    initial_gb: &Ideal,
    initial_forms: &Ideal,
    basis: &Ideal,
    division_order: &MonomialOrder,
    new_order: &MonomialOrder,
) -> Result<Ideal, WalkError> {
    Ok(lift(initial_gb, initial_forms, basis, division_order)?.minimalize(new_order))
}

/// How a walk frame turns a lifted set into its next basis.
pub trait BasisLift {
    fn name(&self) -> &'static str;

    fn lift(
        &self,
        initial_gb: &Ideal,
        initial_forms: &Ideal,
        basis: &Ideal,
        division_order: &MonomialOrder,
        new_order: &MonomialOrder,
    ) -> Result<Ideal, WalkError>;
}

/// General lift followed by full interreduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneralLift;

impl BasisLift for GeneralLift {
    fn name(&self) -> &'static str {
        "general"
    }

    fn lift(
        &self,
        initial_gb: &Ideal,
        initial_forms: &Ideal,
        basis: &Ideal,
        division_order: &MonomialOrder,
        new_order: &MonomialOrder,
    ) -> Result<Ideal, WalkError> {
        Ok(lift(initial_gb, initial_forms, basis, division_order)?.interreduce(new_order))
    }
}

/// Minimal lift, made monic; tails stay unreduced.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalLift;

impl BasisLift for MinimalLift {
    fn name(&self) -> &'static str {
        "minimal"
    }

    fn lift(
        &self,
        initial_gb: &Ideal,
        initial_forms: &Ideal,
        basis: &Ideal,
        division_order: &MonomialOrder,
        new_order: &MonomialOrder,
    ) -> Result<Ideal, WalkError> {
        let minimal =
            lift_minimal(initial_gb, initial_forms, basis, division_order, new_order)?;
        let mut monic = Ideal::new(
            minimal.nvars(),
            minimal
                .generators()
                .iter()
                .map(|g| g.monic(new_order))
                .collect(),
        );
        monic.sort_by_leading(new_order);
        Ok(monic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial::initial_form;
    use crate::oracle::{Buchberger, StandardBasis};
    use crate::poly::Ring;
    use crate::weight::WeightVector;

    struct Step {
        ring: Ring,
        basis: Ideal,
        forms: Ideal,
        initial_gb: Ideal,
        division_order: MonomialOrder,
        new_order: MonomialOrder,
    }

    /// The intro basis under deglex, crossing the facet at (3,2) toward lex.
    fn crossing() -> Step {
        let ring = Ring::parse_list("x,y").unwrap();
        let basis =
            Ideal::parse(&ring, &["x^3 - x + 2*y^2", "x^2 + y^3 - 1", "x*y - 2"]).unwrap();
        let w = WeightVector::new(vec![3, 2]);
        let old = MonomialOrder::weighted(&WeightVector::ones(2));
        let new_order = MonomialOrder::refine(&w, &MonomialOrder::lex(2));
        let forms = initial_form(&basis, &w);
        let initial_gb = Buchberger::default()
            .standard_basis(&forms, &new_order)
            .unwrap();
        Step {
            ring,
            basis,
            forms,
            initial_gb,
            division_order: MonomialOrder::refine(&w, &old),
            new_order,
        }
    }

    #[test]
    fn lift_produces_the_new_basis() {
        let s = crossing();
        let lifted = GeneralLift
            .lift(&s.initial_gb, &s.forms, &s.basis, &s.division_order, &s.new_order)
            .unwrap();
        assert_eq!(
            lifted.render(&s.ring),
            vec!["2*x + y^4 - y", "x^2 + y^3 - 1", "x*y - 2"]
        );
    }

    #[test]
    fn lifted_elements_reduce_to_zero_against_the_old_basis() {
        let s = crossing();
        let lifted = lift(&s.initial_gb, &s.forms, &s.basis, &s.division_order).unwrap();
        let oracle = Buchberger::default();
        let old_gb = oracle.standard_basis(&s.basis, &s.new_order).unwrap();
        for f in lifted.generators() {
            assert!(old_gb.normal_form(f, &s.new_order).is_zero());
        }
    }

    #[test]
    fn minimal_lift_is_idempotent() {
        let s = crossing();
        let once = lift_minimal(
            &s.initial_gb,
            &s.forms,
            &s.basis,
            &s.division_order,
            &s.new_order,
        )
        .unwrap();
        assert_eq!(once.minimalize(&s.new_order), once);
    }

    #[test]
    fn foreign_initial_element_is_an_inconsistency() {
        let s = crossing();
        let stray = Ideal::new(2, vec![s.ring.parse("x + y").unwrap()]);
        let err = lift_quotients(&stray, &s.forms, &s.division_order).unwrap_err();
        assert!(matches!(err, WalkError::LiftInconsistency { .. }));
    }
}
