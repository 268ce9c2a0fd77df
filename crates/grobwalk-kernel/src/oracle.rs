//! The standard-basis oracle the walk consults inside each lift.
//!
//! The walk only ever asks the oracle for bases under orders it already
//! knows to be compatible, so any correct Gröbner engine can stand in.
//! [`Buchberger`] is the reference engine.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::error::OracleError;
use crate::ideal::Ideal;
use crate::monomial::Monomial;
use crate::order::MonomialOrder;
use crate::poly::Polynomial;

/// A Gröbner engine for a fixed order.
pub trait StandardBasis {
    fn name(&self) -> &str;

    /// The reduced Gröbner basis of `ideal` under `order`.
    fn standard_basis(&self, ideal: &Ideal, order: &MonomialOrder) -> Result<Ideal, OracleError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BuchbergerConfig {
    /// Skip pairs with coprime leading monomials.
    pub product_criterion: bool,
    /// Give up after this many critical pairs. `None` never gives up.
    pub max_pairs: Option<usize>,
}

impl Default for BuchbergerConfig {
    fn default() -> Self {
        Self {
            product_criterion: true,
            max_pairs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuchbergerStats {
    pub pairs_processed: usize,
    pub pairs_skipped_product: usize,
    pub zero_reductions: usize,
    pub polynomials_added: usize,
}

/// Critical pair, popped smallest lcm degree first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CriticalPair {
    i: usize,
    j: usize,
    degree: u64,
}

impl Ord for CriticalPair {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .degree
            .cmp(&self.degree)
            .then_with(|| other.j.cmp(&self.j))
            .then_with(|| other.i.cmp(&self.i))
    }
}

impl PartialOrd for CriticalPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Buchberger {
    pub config: BuchbergerConfig,
}

impl Buchberger {
    pub fn new(config: BuchbergerConfig) -> Self {
        Self { config }
    }

    /// Runs the completion and reports statistics alongside the basis.
    pub fn run(
        &self,
        ideal: &Ideal,
        order: &MonomialOrder,
    ) -> Result<(Ideal, BuchbergerStats), OracleError> {
        let n = ideal.nvars();
        if ideal
            .generators()
            .iter()
            .flat_map(Polynomial::monomials)
            .any(|m| m.nvars() != n)
        {
            return Err(OracleError::Malformed(format!(
                "generator arity differs from the ring's {n} variables"
            )));
        }

        let mut stats = BuchbergerStats::default();
        let mut basis: Vec<Polynomial> = Vec::new();
        let mut leads: Vec<Monomial> = Vec::new();
        let mut pairs = BinaryHeap::new();

        for g in ideal.generators() {
            let reduced = Ideal::new(n, basis.clone()).normal_form(g, order);
            if let Some(lm) = reduced.leading_monomial(order).cloned() {
                push_polynomial(&mut basis, &mut leads, &mut pairs, reduced.monic(order), lm);
            }
        }

        while let Some(pair) = pairs.pop() {
            if let Some(limit) = self.config.max_pairs {
                if stats.pairs_processed >= limit {
                    return Err(OracleError::BudgetExhausted {
                        pairs: stats.pairs_processed,
                    });
                }
            }
            stats.pairs_processed += 1;
            let (a, b) = (&leads[pair.i], &leads[pair.j]);
            if self.config.product_criterion && a.is_coprime(b) {
                stats.pairs_skipped_product += 1;
                continue;
            }
            let s = s_polynomial(&basis[pair.i], a, &basis[pair.j], b, order);
            let r = Ideal::new(n, basis.clone()).normal_form(&s, order);
            match r.leading_monomial(order).cloned() {
                None => stats.zero_reductions += 1,
                Some(lm) => {
                    trace!(pair_i = pair.i, pair_j = pair.j, "new basis element");
                    stats.polynomials_added += 1;
                    push_polynomial(&mut basis, &mut leads, &mut pairs, r.monic(order), lm);
                }
            }
        }

        Ok((Ideal::new(n, basis).interreduce(order), stats))
    }
}

impl StandardBasis for Buchberger {
    fn name(&self) -> &str {
        "buchberger"
    }

    fn standard_basis(&self, ideal: &Ideal, order: &MonomialOrder) -> Result<Ideal, OracleError> {
        self.run(ideal, order).map(|(basis, _)| basis)
    }
}

fn push_polynomial(
    basis: &mut Vec<Polynomial>,
    leads: &mut Vec<Monomial>,
    pairs: &mut BinaryHeap<CriticalPair>,
    p: Polynomial,
    lm: Monomial,
) {
    let j = basis.len();
    for (i, other) in leads.iter().enumerate() {
        pairs.push(CriticalPair {
            i,
            j,
            degree: other.lcm(&lm).total_degree(),
        });
    }
    basis.push(p);
    leads.push(lm);
}

fn s_polynomial(
    f: &Polynomial,
    lf: &Monomial,
    g: &Polynomial,
    lg: &Monomial,
    order: &MonomialOrder,
) -> Polynomial {
    let lcm = lf.lcm(lg);
    let (Some((_, cf)), Some((_, cg))) = (f.leading_term(order), g.leading_term(order)) else {
        return Polynomial::zero();
    };
    let (Some(mf), Some(mg)) = (lf.quotient_of(&lcm), lg.quotient_of(&lcm)) else {
        return Polynomial::zero();
    };
    f.mul_term(&mf, &cf.recip())
        .sub(&g.mul_term(&mg, &cg.recip()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Ring;

    fn basis(vars: &str, gens: &[&str], order: &MonomialOrder) -> Vec<String> {
        let ring = Ring::parse_list(vars).unwrap();
        let ideal = Ideal::parse(&ring, gens).unwrap();
        Buchberger::default()
            .standard_basis(&ideal, order)
            .unwrap()
            .render(&ring)
    }

    #[test]
    fn lex_basis_of_intro_ideal() {
        assert_eq!(
            basis("x,y", &["x^2 + y^3 - 1", "x*y - 2"], &MonomialOrder::lex(2)),
            vec!["x + 1/2*y^4 - 1/2*y", "y^5 - y^2 + 4"]
        );
    }

    #[test]
    fn deglex_basis_of_intro_ideal() {
        let order = MonomialOrder::weighted(&crate::WeightVector::ones(2));
        assert_eq!(
            basis("x,y", &["x^2 + y^3 - 1", "x*y - 2"], &order),
            vec!["x^3 - x + 2*y^2", "x^2 + y^3 - 1", "x*y - 2"]
        );
    }

    #[test]
    fn twisted_cubic_lex() {
        assert_eq!(
            basis("x,y,z", &["y - x^2", "z - x^3"], &MonomialOrder::lex(3)),
            vec!["x^2 - y", "x*y - z", "x*z - y^2", "y^3 - z^2"]
        );
    }

    #[test]
    fn unit_ideal_collapses_to_one() {
        assert_eq!(
            basis("x,y", &["x", "x + 1"], &MonomialOrder::lex(2)),
            vec!["1"]
        );
    }

    #[test]
    fn budget_is_enforced() {
        let ring = Ring::parse_list("x,y,z").unwrap();
        let ideal = Ideal::parse(&ring, &["x + y + z", "x*y + y*z + z*x", "x*y*z - 1"]).unwrap();
        let oracle = Buchberger::new(BuchbergerConfig {
            product_criterion: true,
            max_pairs: Some(1),
        });
        let err = oracle
            .standard_basis(&ideal, &MonomialOrder::lex(3))
            .unwrap_err();
        assert_eq!(err, OracleError::BudgetExhausted { pairs: 1 });
    }
}
