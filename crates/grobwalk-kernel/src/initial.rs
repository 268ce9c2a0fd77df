//! Initial forms with respect to a weight.

use crate::ideal::Ideal;
use crate::poly::Polynomial;
use crate::weight::WeightVector;

/// Terms of `p` of maximal weighted degree. Ties are all kept.
pub fn initial_term_set(p: &Polynomial, weight: &WeightVector) -> Polynomial {
    let Some(top) = p.monomials().map(|m| weight.dot(m)).max() else {
        return Polynomial::zero();
    };
    p.filter_terms(|m| weight.dot(m) == top)
}

/// The initial form of every nonzero generator, in generator order.
pub fn initial_form(basis: &Ideal, weight: &WeightVector) -> Ideal {
    Ideal::new(
        basis.nvars(),
        basis
            .generators()
            .iter()
            .filter(|g| !g.is_zero())
            .map(|g| initial_term_set(g, weight))
            .collect(),
    )
}

/// Every initial form is a single term, so the initial ideal is monomial.
pub fn initial_form_is_monomial(basis: &Ideal, weight: &WeightVector) -> bool {
    initial_form(basis, weight).is_monomial_ideal()
}
